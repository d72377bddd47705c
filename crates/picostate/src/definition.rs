//! Type definitions and the transitions bound to them.
//!
//! A [`TypeDefinition`] describes the shape of a raw value: which children a
//! node of that type has and how they are derived. It knows nothing about
//! parents or propagation. Domain logic lives in [`Transition`]s: pure
//! functions from a receiver to a new [`Candidate`], which
//! [`Picostate::transition`] folds back into the tree.

use crate::assemble::Assembler;
use crate::node::Node;
use crate::{Candidate, PicoResult, Picostate, Value};
use std::sync::Arc;

/// Shared handle to a type definition. Its allocation is its identity.
pub type TypeRef = Arc<dyn TypeDefinition>;

/// Upcast to `std::any::Any`, used to bind transitions to their type.
pub trait AsAny {
    fn as_any(&self) -> &dyn std::any::Any;
}

impl<T: std::any::Any> AsAny for T {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// A declared, typed child of an object-shaped type.
#[derive(Clone)]
pub struct Field {
    name: String,
    ty: TypeRef,
    default: Value,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: &TypeRef) -> Self {
        Self {
            name: name.into(),
            ty: ty.clone(),
            default: Value::Null,
        }
    }

    /// Raw value used when the assembled input has no value for this field.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    #[inline]
    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("type", &self.ty.name())
            .field("default", &self.default)
            .finish()
    }
}

/// The shape of a value, and how to decompose it into child nodes.
///
/// The default assembly is object-shaped: one child per declared field.
/// Collections override [`TypeDefinition::assemble`]; an override must turn a
/// null input into a well-formed empty aggregate.
pub trait TypeDefinition: AsAny + Send + Sync + 'static {
    /// Display name, used in lifted type names and logs.
    fn name(&self) -> String;

    /// Declared fields, in assembly order.
    fn fields(&self) -> &[Field] {
        &[]
    }

    /// Type this one refines, if any. Followed by [`Picostate::is_a`].
    fn supertype(&self) -> Option<TypeRef> {
        None
    }

    /// Populate a fresh node from the input it was created with.
    ///
    /// `node` carries the input's raw value as state and no children.
    fn assemble(
        &self,
        asm: &Assembler<'_>,
        node: Arc<Node>,
        input: &Candidate,
    ) -> PicoResult<Arc<Node>> {
        asm.assemble_fields(node, input, self.fields())
    }

    /// Post-assembly hook.
    ///
    /// Returning a candidate replaces the assembled node with
    /// `node.set(candidate)`. It must eventually return `None` for the value
    /// it produces, or assembly fails with `DepthExceeded`.
    fn initialize(&self, _node: &Picostate, _input: &Candidate) -> PicoResult<Option<Candidate>> {
        Ok(None)
    }
}

/// A transition request against nodes of one type definition.
///
/// `apply` receives the node's source (the node detached from its parent),
/// so transitions performed on its children inside `apply` fold into the
/// receiver, not into the surrounding tree.
pub trait Transition {
    /// The definition this transition operates on.
    type Target: TypeDefinition;

    fn name(&self) -> &'static str;

    fn apply(self, ty: &Self::Target, this: &Picostate) -> PicoResult<Candidate>;
}
