use crate::{TypeDefinition, TypeRef};
use std::sync::{Arc, OnceLock};

/// A value with no declared structure. Nodes of this type have no children.
#[derive(Debug, Default, Clone, Copy)]
pub struct Any;

impl TypeDefinition for Any {
    fn name(&self) -> String {
        "Any".to_string()
    }
}

static ANY: OnceLock<TypeRef> = OnceLock::new();

/// The shared [`Any`] definition.
///
/// Every call returns the same allocation, so it lifts to the same type in a
/// given runtime.
pub fn any() -> TypeRef {
    ANY.get_or_init(|| Arc::new(Any)).clone()
}
