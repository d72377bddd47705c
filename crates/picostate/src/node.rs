//! Immutable tree nodes.

use crate::runtime::LiftedType;
use crate::{Seg, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// One position of a typed tree: its lifted type, its raw state and its named
/// children.
///
/// Nodes are never mutated once shared. Every write produces a new node that
/// reuses the untouched children of the old one by reference. A node does not
/// know its parent; see [`crate::Meta`].
pub struct Node {
    ty: Arc<LiftedType>,
    state: Value,
    children: BTreeMap<Seg, Arc<Node>>,
}

impl Node {
    pub(crate) fn fresh(ty: Arc<LiftedType>, state: Value) -> Arc<Node> {
        Arc::new(Node {
            ty,
            state,
            children: BTreeMap::new(),
        })
    }

    /// The lifted type this node is an instance of.
    #[inline]
    pub fn lifted_type(&self) -> &Arc<LiftedType> {
        &self.ty
    }

    /// The raw value at this position.
    #[inline]
    pub fn state(&self) -> &Value {
        &self.state
    }

    #[inline]
    pub fn child(&self, seg: &Seg) -> Option<&Arc<Node>> {
        self.children.get(seg)
    }

    /// Children in slot order: keys first, then indices ascending.
    pub fn children(&self) -> impl Iterator<Item = (&Seg, &Arc<Node>)> {
        self.children.iter()
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// A copy of this node with a different raw state and the same children.
    ///
    /// Meant for assembly, where a fresh node's state is normalized before its
    /// children are installed.
    pub fn with_state(&self, state: Value) -> Arc<Node> {
        Arc::new(Node {
            ty: self.ty.clone(),
            state,
            children: self.children.clone(),
        })
    }

    pub(crate) fn with_child(&self, seg: Seg, child: Arc<Node>, state: Value) -> Arc<Node> {
        let mut children = self.children.clone();
        children.insert(seg, child);
        Arc::new(Node {
            ty: self.ty.clone(),
            state,
            children,
        })
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("type", &self.ty.name())
            .field("state", &format_args!("{}", self.state))
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .finish()
    }
}
