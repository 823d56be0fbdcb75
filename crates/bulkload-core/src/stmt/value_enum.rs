use std::borrow::Cow;

/// A value of an enumerated type.
///
/// Batches store enums by their integral code; the variant name is kept only
/// for diagnostics and does not take part in equality.
#[derive(Debug, Clone)]
pub struct ValueEnum {
    /// Integral code of the variant
    pub code: i64,

    /// Name of the variant, when known
    pub name: Option<Cow<'static, str>>,
}

impl ValueEnum {
    pub fn new(code: i64, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            name: Some(name.into()),
        }
    }

    pub fn from_code(code: i64) -> Self {
        Self { code, name: None }
    }
}

impl PartialEq for ValueEnum {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}
