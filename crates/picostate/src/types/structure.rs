use crate::{Field, TypeDefinition, TypeRef, Value};
use std::fmt;
use std::sync::Arc;

/// A record with declared fields, assembled field by field.
///
/// ```
/// use picostate::{any, Runtime, StructType};
/// use serde_json::json;
///
/// let text = any();
/// let record = StructType::named("Record").field("content", &text).build();
/// let node = Runtime::new().create(&record, json!({"content": "Herro"}))?;
/// assert_eq!(node.get("content").unwrap().state(), &json!("Herro"));
/// # Ok::<(), picostate::PicoError>(())
/// ```
#[derive(Clone)]
pub struct StructType {
    name: String,
    fields: Vec<Field>,
    supertype: Option<TypeRef>,
}

impl StructType {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            supertype: None,
        }
    }

    /// Refine `parent`: inherit its fields and record it as the supertype.
    pub fn extends(mut self, parent: &TypeRef) -> Self {
        for field in parent.fields() {
            self = self.with(field.clone());
        }
        self.supertype = Some(parent.clone());
        self
    }

    pub fn field(self, name: impl Into<String>, ty: &TypeRef) -> Self {
        self.with(Field::new(name, ty))
    }

    pub fn field_with_default(
        self,
        name: impl Into<String>,
        ty: &TypeRef,
        default: impl Into<Value>,
    ) -> Self {
        self.with(Field::new(name, ty).with_default(default))
    }

    /// Add a field, replacing a declared one of the same name in place.
    pub fn with(mut self, field: Field) -> Self {
        match self.fields.iter_mut().find(|f| f.name() == field.name()) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn build(self) -> TypeRef {
        Arc::new(self)
    }
}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("supertype", &self.supertype.as_ref().map(|ty| ty.name()))
            .finish()
    }
}

impl TypeDefinition for StructType {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn supertype(&self) -> Option<TypeRef> {
        self.supertype.clone()
    }
}
