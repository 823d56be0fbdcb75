use crate::stmt::{Type, Value};

use arc_swap::ArcSwap;
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock},
};

static DEFAULTS: LazyLock<DefaultValues> = LazyLock::new(DefaultValues::new);

/// Returns the zero value for `ty` from the process-wide cache.
pub fn default_value(ty: &Type) -> Value {
    DEFAULTS.get(ty)
}

/// Cache of per-type zero values.
///
/// Readers load an immutable snapshot without locking. A miss computes the
/// value and publishes a new snapshot containing it with a compare-and-swap
/// loop, so concurrent first-touch of the same type converges on the single
/// value that made it into the published snapshot.
#[derive(Debug)]
pub struct DefaultValues {
    snapshot: ArcSwap<HashMap<Type, Value>>,
}

impl DefaultValues {
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    pub fn get(&self, ty: &Type) -> Value {
        if let Some(value) = self.snapshot.load().get(ty) {
            return value.clone();
        }

        let computed = ty.zero();

        self.snapshot.rcu(|current| {
            if current.contains_key(ty) {
                Arc::clone(current)
            } else {
                let mut next = HashMap::clone(current);
                next.insert(*ty, computed.clone());
                Arc::new(next)
            }
        });

        // Another writer may have won the race; the published value is the
        // one every reader sees from now on.
        self.snapshot.load().get(ty).cloned().unwrap_or(computed)
    }

    /// Number of cached types.
    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DefaultValues {
    fn default() -> Self {
        Self::new()
    }
}
