use std::sync::atomic::{AtomicU32, Ordering};

/// Generates unique table prefixes so tests sharing a database server never
/// touch each other's tables.
///
/// Prefixes have the form `test_{process_id}_{test_counter}_`.
#[derive(Clone)]
#[allow(dead_code)] // Only used when server database features are enabled
pub struct TestIsolation {
    process_id: u32,
    test_counter: u32,
}

#[allow(dead_code)]
static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

#[allow(dead_code)]
impl TestIsolation {
    pub fn new() -> Self {
        Self {
            process_id: std::process::id(),
            test_counter: TEST_COUNTER.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn table_prefix(&self) -> String {
        format!("test_{}_{}_", self.process_id, self.test_counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_unique() {
        let a = TestIsolation::new().table_prefix();
        let b = TestIsolation::new().table_prefix();

        assert_ne!(a, b);
        assert!(a.starts_with("test_"));
        assert!(a.ends_with('_'));
    }
}
