//! Handles to nodes at a position in a tree, and transition folding.

use crate::lens::{Lens, SubstateAt, SubstatePath};
use crate::node::Node;
use crate::runtime::LiftedType;
use crate::{AsAny, Candidate, Meta, Path, PicoError, PicoResult, Runtime, Seg, Transition, TypeRef, Value};
use std::fmt;
use std::sync::Arc;

/// A node together with the tree it was reached from.
///
/// A handle is a snapshot: the tree it points into never changes. `set` and
/// transitions return a handle to the root of a new tree; the old handle keeps
/// seeing the old tree.
#[derive(Clone)]
pub struct Picostate {
    runtime: Runtime,
    root: Arc<Node>,
    path: Path,
    node: Arc<Node>,
}

impl Picostate {
    pub(crate) fn root(runtime: Runtime, node: Arc<Node>) -> Self {
        Self {
            runtime,
            root: node.clone(),
            path: Path::root(),
            node,
        }
    }

    /// The raw value at this position.
    #[inline]
    pub fn state(&self) -> &Value {
        self.node.state()
    }

    #[inline]
    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }

    #[inline]
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Location relative to the root of the tree.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    #[inline]
    pub fn lifted_type(&self) -> &Arc<LiftedType> {
        self.node.lifted_type()
    }

    #[inline]
    pub fn type_name(&self) -> &str {
        self.node.lifted_type().name()
    }

    /// Whether this node's type is exactly `ty`.
    pub fn is(&self, ty: &TypeRef) -> bool {
        self.lifted_type().is(ty)
    }

    /// Whether this node's type is `ty` or refines it.
    pub fn is_a(&self, ty: &TypeRef) -> bool {
        self.lifted_type().is_a(ty)
    }

    /// Child handle at `name`.
    pub fn get(&self, name: impl Into<Seg>) -> Option<Picostate> {
        let name = name.into();
        let child = self.node.child(&name)?.clone();
        Some(Picostate {
            runtime: self.runtime.clone(),
            root: self.root.clone(),
            path: self.path.child(name),
            node: child,
        })
    }

    /// Descendant handle at `path`, relative to this one.
    pub fn at(&self, path: &Path) -> PicoResult<Picostate> {
        let node = SubstatePath::new(path.clone())
            .view(&self.node)
            .ok_or_else(|| PicoError::path_not_found(path.clone()))?;
        let mut full = self.path.clone();
        for seg in path {
            full.push(seg.clone());
        }
        Ok(Picostate {
            runtime: self.runtime.clone(),
            root: self.root.clone(),
            path: full,
            node,
        })
    }

    /// Child handles in slot order.
    pub fn children(&self) -> impl Iterator<Item = Picostate> + '_ {
        self.node.children().map(move |(seg, child)| Picostate {
            runtime: self.runtime.clone(),
            root: self.root.clone(),
            path: self.path.child(seg.clone()),
            node: child.clone(),
        })
    }

    /// Handle to the root of the tree this handle belongs to.
    pub fn top(&self) -> Picostate {
        Picostate::root(self.runtime.clone(), self.root.clone())
    }

    pub fn meta(&self) -> Meta {
        Meta::of(self)
    }

    pub fn parent(&self) -> PicoResult<Option<Picostate>> {
        self.meta().parent()
    }

    /// The same node as the root of its own tree.
    pub fn detach(&self) -> Picostate {
        Picostate::root(self.runtime.clone(), self.node.clone())
    }

    /// Identity: same node reached the same way in the same tree.
    pub fn same(&self, other: &Picostate) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
            && Arc::ptr_eq(&self.root, &other.root)
            && self.path == other.path
    }

    /// Replace this node and fold the change up to the root.
    ///
    /// Setting the current state (or the current node) returns this handle
    /// unchanged. Otherwise the returned handle is the root of a new tree in
    /// which only the path from this node to the root was rebuilt.
    pub fn set(&self, value: impl Into<Candidate>) -> PicoResult<Picostate> {
        self.set_within(value.into(), 0)
    }

    pub(crate) fn set_within(&self, candidate: Candidate, depth: usize) -> PicoResult<Picostate> {
        let subtree = match candidate {
            Candidate::Value(value) if value.same(self.state()) => return Ok(self.clone()),
            Candidate::Node(other) if Arc::ptr_eq(&other.node, &self.node) => {
                return Ok(self.clone())
            }
            Candidate::Node(other) => other.node,
            input => self
                .runtime
                .build(self.node.lifted_type(), input, depth)?
                .node,
        };
        self.fold(subtree)
    }

    fn fold(&self, subtree: Arc<Node>) -> PicoResult<Picostate> {
        let meta = Meta::lookup(Some(self))?;
        let (parent, name) = match (meta.parent()?, meta.name()) {
            (Some(parent), Some(name)) => (parent, name),
            _ => return Ok(Picostate::root(self.runtime.clone(), subtree)),
        };
        tracing::trace!(path = %self.path, ty = self.type_name(), "folding into parent");
        let next = SubstateAt::new(name).set(subtree, parent.node())?;
        if Arc::ptr_eq(&next, parent.node()) {
            return Ok(self.top());
        }
        parent.set(Picostate::root(self.runtime.clone(), next))
    }

    /// Run a transition against this node's source and fold its result in.
    ///
    /// Fails with `TypeMismatch` when this node's definition is not the
    /// transition's target type.
    pub fn transition<T: Transition>(&self, transition: T) -> PicoResult<Picostate> {
        let meta = Meta::lookup(Some(self))?;
        let name = transition.name();
        let ty = AsAny::as_any(self.lifted_type().definition())
            .downcast_ref::<T::Target>()
            .ok_or_else(|| PicoError::TypeMismatch {
                transition: name,
                expected: std::any::type_name::<T::Target>(),
                found: self.type_name().to_string(),
            })?;
        tracing::debug!(transition = name, ty = self.type_name(), path = %self.path, "running transition");

        let result = transition.apply(ty, meta.source())?;
        if self.runtime.config().trace_transitions {
            tracing::debug!(
                transition = name,
                before = %self.state(),
                after = %result.to_value(),
                "transition result"
            );
        }
        self.set(result)
    }
}

impl fmt::Debug for Picostate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Picostate")
            .field("type", &self.type_name())
            .field("path", &format_args!("{}", self.path))
            .field("state", &format_args!("{}", self.state()))
            .finish()
    }
}
