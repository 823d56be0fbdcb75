mod name;
pub use name::Name;

mod primitive;
pub use primitive::Primitive;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

mod value_enum;
pub use value_enum::ValueEnum;
