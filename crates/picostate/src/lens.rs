//! Composable location lenses.
//!
//! A lens is a pure get/set pair over a context value. Setting through a lens
//! never mutates the context; it returns a new context that shares every
//! untouched part with the old one. All lenses here satisfy the usual laws:
//!
//! - get-after-set: `view(l, set(l, v, c)) == v`
//! - set-after-get: `set(l, view(l, c), c)` returns `c` itself
//! - set-after-set: `set(l, b, set(l, a, c)) == set(l, b, c)`
//!
//! Two families address tree positions: [`ValueAt`] for raw value slots and
//! [`SubstateAt`] for typed child nodes.

use crate::node::Node;
use crate::{Map, Path, PicoError, PicoResult, Seg, Value};
use std::marker::PhantomData;
use std::sync::Arc;

/// A get/set pair focusing on one part of a context.
pub trait Lens {
    /// The value the lens is applied to.
    type Context;
    /// The part of the context the lens looks at.
    type Focus;

    /// Read the focus, if the context has one.
    fn view(&self, context: &Self::Context) -> Option<Self::Focus>;

    /// Return a new context with the focus replaced.
    fn set(&self, focus: Self::Focus, context: &Self::Context) -> PicoResult<Self::Context>;

    /// Replace the focus with a function of its current value.
    fn over<F>(&self, f: F, context: &Self::Context) -> PicoResult<Self::Context>
    where
        F: FnOnce(Option<Self::Focus>) -> PicoResult<Self::Focus>,
    {
        let focus = f(self.view(context))?;
        self.set(focus, context)
    }

    /// Compose with a lens focusing inside this lens's focus.
    fn then<L>(self, inner: L) -> Compose<Self, L>
    where
        Self: Sized,
        L: Lens<Context = Self::Focus>,
    {
        Compose { outer: self, inner }
    }
}

/// Read through a lens.
#[inline]
pub fn view<L: Lens>(lens: &L, context: &L::Context) -> Option<L::Focus> {
    lens.view(context)
}

/// Write through a lens.
#[inline]
pub fn set<L: Lens>(lens: &L, focus: L::Focus, context: &L::Context) -> PicoResult<L::Context> {
    lens.set(focus, context)
}

/// Modify through a lens.
#[inline]
pub fn over<L, F>(lens: &L, f: F, context: &L::Context) -> PicoResult<L::Context>
where
    L: Lens,
    F: FnOnce(Option<L::Focus>) -> PicoResult<L::Focus>,
{
    lens.over(f, context)
}

/// Lens built from a getter and a setter closure.
pub struct FnLens<C, A, G, S> {
    getter: G,
    setter: S,
    _marker: PhantomData<fn(&C) -> A>,
}

/// Build a lens from a getter and a setter.
///
/// ```
/// use picostate::lens::{lens, set, view};
///
/// let first = lens(
///     |pair: &(i64, i64)| Some(pair.0),
///     |value, pair: &(i64, i64)| Ok((value, pair.1)),
/// );
/// assert_eq!(view(&first, &(1, 2)), Some(1));
/// assert_eq!(set(&first, 5, &(1, 2)).unwrap(), (5, 2));
/// ```
pub fn lens<C, A, G, S>(getter: G, setter: S) -> FnLens<C, A, G, S>
where
    G: Fn(&C) -> Option<A>,
    S: Fn(A, &C) -> PicoResult<C>,
{
    FnLens {
        getter,
        setter,
        _marker: PhantomData,
    }
}

impl<C, A, G, S> Lens for FnLens<C, A, G, S>
where
    G: Fn(&C) -> Option<A>,
    S: Fn(A, &C) -> PicoResult<C>,
{
    type Context = C;
    type Focus = A;

    fn view(&self, context: &C) -> Option<A> {
        (self.getter)(context)
    }

    fn set(&self, focus: A, context: &C) -> PicoResult<C> {
        (self.setter)(focus, context)
    }
}

/// Two lenses applied one after the other.
#[derive(Clone, Debug)]
pub struct Compose<O, I> {
    outer: O,
    inner: I,
}

impl<O, I> Lens for Compose<O, I>
where
    O: Lens,
    I: Lens<Context = O::Focus>,
{
    type Context = O::Context;
    type Focus = I::Focus;

    fn view(&self, context: &O::Context) -> Option<I::Focus> {
        self.outer
            .view(context)
            .and_then(|middle| self.inner.view(&middle))
    }

    fn set(&self, focus: I::Focus, context: &O::Context) -> PicoResult<O::Context> {
        let middle = self.outer.view(context).ok_or(PicoError::FocusNotFound)?;
        let middle = self.inner.set(focus, &middle)?;
        self.outer.set(middle, context)
    }
}

/// Addresses one child slot of a raw value, cloning on write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueAt {
    seg: Seg,
}

impl ValueAt {
    pub fn new(seg: impl Into<Seg>) -> Self {
        Self { seg: seg.into() }
    }
}

impl Lens for ValueAt {
    type Context = Value;
    type Focus = Value;

    fn view(&self, context: &Value) -> Option<Value> {
        context.get(&self.seg).cloned()
    }

    fn set(&self, focus: Value, context: &Value) -> PicoResult<Value> {
        write_slot(context, &self.seg, focus)
    }
}

/// Shallow clone-on-write of one slot.
///
/// A null context behaves as an empty container of the shape the slot asks
/// for. An absent object key counts as null for the no-op check.
fn write_slot(context: &Value, seg: &Seg, value: Value) -> PicoResult<Value> {
    match (context, seg) {
        (Value::Object(entries), Seg::Key(key)) => {
            let unchanged = match entries.get(key) {
                Some(current) => current.same(&value),
                None => value.is_null(),
            };
            if unchanged {
                return Ok(context.clone());
            }
            let mut next = Map::clone(entries);
            next.insert(key.clone(), value);
            Ok(Value::object(next))
        }
        (Value::Array(items), Seg::Index(index)) => match items.get(*index) {
            Some(current) if current.same(&value) => Ok(context.clone()),
            Some(_) => {
                let mut next = Vec::clone(items);
                next[*index] = value;
                Ok(Value::array(next))
            }
            None if *index == items.len() => {
                let mut next = Vec::with_capacity(items.len() + 1);
                next.extend(items.iter().cloned());
                next.push(value);
                Ok(Value::array(next))
            }
            None => Err(PicoError::index_out_of_bounds(*index, items.len())),
        },
        (Value::Null, Seg::Key(_)) => write_slot(&Value::object(Map::new()), seg, value),
        (Value::Null, Seg::Index(_)) => write_slot(&Value::array(Vec::new()), seg, value),
        (other, seg) => Err(PicoError::slot_mismatch(seg.clone(), other.kind())),
    }
}

/// Addresses the typed child node installed at one slot of a node.
///
/// Writing a new child builds a new parent whose raw state is updated through
/// [`ValueAt`] and whose other children are shared with the old parent.
/// Handles obtained from the returned node resolve their parents through it,
/// so the installed subtree is re-linked under the new parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubstateAt {
    seg: Seg,
}

impl SubstateAt {
    pub fn new(seg: impl Into<Seg>) -> Self {
        Self { seg: seg.into() }
    }
}

impl Lens for SubstateAt {
    type Context = Arc<Node>;
    type Focus = Arc<Node>;

    fn view(&self, context: &Arc<Node>) -> Option<Arc<Node>> {
        context.child(&self.seg).cloned()
    }

    fn set(&self, substate: Arc<Node>, context: &Arc<Node>) -> PicoResult<Arc<Node>> {
        if let Some(current) = context.child(&self.seg) {
            if Arc::ptr_eq(current, &substate) {
                return Ok(context.clone());
            }
        }
        let state = write_slot(context.state(), &self.seg, substate.state().clone())?;
        tracing::trace!(
            slot = %self.seg,
            parent = context.lifted_type().name(),
            "installing substate"
        );
        Ok(context.with_child(self.seg.clone(), substate, state))
    }
}

/// [`SubstateAt`] along a whole path.
///
/// The empty path focuses on the context itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubstatePath {
    path: Path,
}

impl SubstatePath {
    pub fn new(path: Path) -> Self {
        Self { path }
    }

    fn install(&self, node: &Arc<Node>, segments: &[Seg], focus: Arc<Node>) -> PicoResult<Arc<Node>> {
        match segments {
            [] => Ok(focus),
            [seg, rest @ ..] => {
                let child = node
                    .child(seg)
                    .ok_or_else(|| PicoError::path_not_found(self.path.clone()))?;
                let next = self.install(child, rest, focus)?;
                SubstateAt::new(seg).set(next, node)
            }
        }
    }
}

impl Lens for SubstatePath {
    type Context = Arc<Node>;
    type Focus = Arc<Node>;

    fn view(&self, context: &Arc<Node>) -> Option<Arc<Node>> {
        let mut node = context;
        for seg in &self.path {
            node = node.child(seg)?;
        }
        Some(node.clone())
    }

    fn set(&self, focus: Arc<Node>, context: &Arc<Node>) -> PicoResult<Arc<Node>> {
        self.install(context, self.path.segments(), focus)
    }
}
