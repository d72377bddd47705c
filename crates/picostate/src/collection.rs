//! Filter and map over the children of a node.
//!
//! Both operate on child *sources*: each child detached from the node, so
//! transitions performed inside the callback produce standalone results that
//! can be installed back as elements.

use crate::{Candidate, PicoResult, Picostate};

/// Child sources in slot order.
pub fn members(node: &Picostate) -> Vec<Picostate> {
    node.children().map(|child| child.detach()).collect()
}

/// Child sources for which `predicate` holds.
pub fn filter<P>(predicate: P, node: &Picostate) -> Vec<Picostate>
where
    P: Fn(&Picostate) -> bool,
{
    members(node).into_iter().filter(|member| predicate(member)).collect()
}

/// Apply `f` to every child source, stopping at the first error.
pub fn map<F, R>(f: F, node: &Picostate) -> PicoResult<Vec<R>>
where
    F: Fn(Picostate) -> PicoResult<R>,
{
    members(node).into_iter().map(f).collect()
}

/// [`map`] into candidates, ready to be installed as a sequence.
pub(crate) fn map_candidates<F, R>(f: F, node: &Picostate) -> PicoResult<Candidate>
where
    F: Fn(Picostate) -> PicoResult<R>,
    R: Into<Candidate>,
{
    let items = map(|member| f(member).map(Into::into), node)?;
    Ok(Candidate::Sequence(items))
}
