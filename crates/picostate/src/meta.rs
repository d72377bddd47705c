//! Parent/child linkage of a node handle.

use crate::{Path, PicoError, PicoResult, Picostate, Seg};

/// Side record of a node: its name under its parent, the parent itself and
/// its source.
///
/// The parent is not stored; it is resolved from the root of the tree the
/// handle belongs to when asked for. After a subtree is installed under a new
/// parent, handles obtained from the new root therefore see the new parent.
#[derive(Clone, Debug)]
pub struct Meta {
    name: Option<Seg>,
    parent_path: Option<Path>,
    context: Picostate,
    source: Picostate,
}

impl Meta {
    /// Meta of a handle, failing on an absent context.
    pub fn lookup(context: Option<&Picostate>) -> PicoResult<Meta> {
        context.map(Meta::of).ok_or(PicoError::MissingContext)
    }

    pub fn of(context: &Picostate) -> Meta {
        let (parent_path, name) = match context.path().split_last() {
            Some((parent, name)) => (Some(parent), Some(name.clone())),
            None => (None, None),
        };
        Meta {
            name,
            parent_path,
            context: context.clone(),
            source: context.detach(),
        }
    }

    /// The source of a handle: the same node, detached from any parent.
    pub fn source_of(context: &Picostate) -> Picostate {
        context.detach()
    }

    /// Slot name under the parent; `None` at the root.
    #[inline]
    pub fn name(&self) -> Option<&Seg> {
        self.name.as_ref()
    }

    #[inline]
    pub fn source(&self) -> &Picostate {
        &self.source
    }

    /// Resolve the parent from the root; `None` at the root.
    pub fn parent(&self) -> PicoResult<Option<Picostate>> {
        match &self.parent_path {
            None => Ok(None),
            Some(path) => self
                .context
                .top()
                .at(path)
                .map(Some)
                .map_err(|_| PicoError::MissingContext),
        }
    }
}
