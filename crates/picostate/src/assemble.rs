//! The assembly protocol: decomposing a raw value into child nodes.

use crate::lens::{Lens, SubstateAt};
use crate::node::Node;
use crate::{Candidate, Field, PicoResult, Runtime, Seg, TypeRef};
use std::sync::Arc;

/// Context handed to [`crate::TypeDefinition::assemble`].
///
/// Children are built through the assembler so nesting depth is tracked
/// against [`crate::RuntimeConfig::max_depth`].
pub struct Assembler<'a> {
    runtime: &'a Runtime,
    depth: usize,
}

impl<'a> Assembler<'a> {
    pub(crate) fn new(runtime: &'a Runtime, depth: usize) -> Self {
        Self { runtime, depth }
    }

    #[inline]
    pub fn runtime(&self) -> &Runtime {
        self.runtime
    }

    /// Nesting depth of the node being assembled; the root is 0.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Build the child node for one member.
    ///
    /// An existing node is adopted as-is, whatever its type. Anything else is
    /// assembled as an instance of `ty`.
    pub fn adopt(&self, ty: &TypeRef, member: Candidate) -> PicoResult<Arc<Node>> {
        match member {
            Candidate::Node(existing) => Ok(existing.node().clone()),
            input => {
                let lifted = self.runtime.lift(ty)?;
                let child = self.runtime.build(&lifted, input, self.depth + 1)?;
                Ok(child.node().clone())
            }
        }
    }

    /// Install `child` at `name`, writing its state into the parent's state.
    pub fn install(
        &self,
        node: Arc<Node>,
        name: impl Into<Seg>,
        child: Arc<Node>,
    ) -> PicoResult<Arc<Node>> {
        SubstateAt::new(name).set(child, &node)
    }

    /// Object-shaped assembly: one child per declared field.
    ///
    /// A field takes the input's member at its name when present and
    /// non-null, and its default otherwise.
    pub fn assemble_fields(
        &self,
        node: Arc<Node>,
        input: &Candidate,
        fields: &[Field],
    ) -> PicoResult<Arc<Node>> {
        fields.iter().try_fold(node, |node, field| {
            let member = input
                .member(&Seg::key(field.name()))
                .filter(|member| !member.is_null())
                .unwrap_or_else(|| Candidate::Value(field.default_value().clone()));
            let child = self.adopt(field.ty(), member)?;
            self.install(node, field.name(), child)
        })
    }
}
