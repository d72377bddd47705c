//! Built-in type definitions.
//!
//! - [`Any`]: structureless values, the default element type.
//! - [`ArrayType`]: ordered sequences, one child per index.
//! - [`ObjectType`]: mappings, one child per entry.
//! - [`StructType`]: records with declared fields.

mod any;
mod array;
mod object;
mod structure;

pub use any::{any, Any};
pub use array::{ArrayOp, ArrayTransitions, ArrayType};
pub use object::{ObjectOp, ObjectTransitions, ObjectType};
pub use structure::StructType;
