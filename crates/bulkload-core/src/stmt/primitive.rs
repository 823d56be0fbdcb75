use super::{Type, Value, ValueEnum};
use crate::Result;

/// A Rust type that can be stored in a batch column.
///
/// `Option<T>` is the nullable form of `T`: it reports the same [`Type`] and
/// sets [`NULLABLE`](Primitive::NULLABLE).
pub trait Primitive: Sized {
    const TYPE: Type;
    const NULLABLE: bool = false;

    fn load(value: Value) -> Result<Self>;

    fn into_value(self) -> Value;
}

macro_rules! primitive {
    ( $( $ty:ty => $variant:ident ),* ) => {
        $(
            impl Primitive for $ty {
                const TYPE: Type = Type::$variant;

                fn load(value: Value) -> Result<Self> {
                    value.try_into()
                }

                fn into_value(self) -> Value {
                    self.into()
                }
            }
        )*
    };
}

primitive!(
    bool => Bool,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f64 => F64,
    String => String,
    Vec<u8> => Bytes
);

impl Primitive for ValueEnum {
    const TYPE: Type = Type::Enum;

    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Enum(value) => Ok(value),
            value => Ok(ValueEnum::from_code(value.try_into()?)),
        }
    }

    fn into_value(self) -> Value {
        Value::Enum(self)
    }
}

impl<T: Primitive> Primitive for Option<T> {
    const TYPE: Type = T::TYPE;
    const NULLABLE: bool = true;

    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            value => Ok(Some(T::load(value)?)),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Some(value) => value.into_value(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_is_nullable_form() {
        assert_eq!(<Option<i32>>::TYPE, Type::I32);
        assert!(<Option<i32>>::NULLABLE);
        assert!(!<i32>::NULLABLE);
    }

    #[test]
    fn load_null_into_option() {
        assert_eq!(<Option<String>>::load(Value::Null).unwrap(), None);
        assert_eq!(
            <Option<String>>::load(Value::from("a")).unwrap(),
            Some("a".to_string())
        );
    }

    #[test]
    fn load_null_into_non_nullable_fails() {
        assert!(i32::load(Value::Null).is_err());
    }
}
