pub mod serializer;
pub use serializer::{Params, Placeholder, Serializer};

pub mod stmt;
pub use stmt::Statement;

pub mod template;
pub use template::{BoundCommand, CommandTemplate, Parameter};
