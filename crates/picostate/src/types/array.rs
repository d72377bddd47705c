use crate::assemble::Assembler;
use crate::collection;
use crate::node::Node;
use crate::types::any;
use crate::{Candidate, PicoResult, Picostate, Transition, TypeDefinition, TypeRef, Value};
use std::fmt;
use std::sync::{Arc, OnceLock};

static ANY_ARRAY: OnceLock<TypeRef> = OnceLock::new();

/// Ordered sequence of `element` values.
///
/// Assembly accepts any input: null becomes `[]`, a non-sequence becomes a
/// one-element sequence, and each element is built with
/// [`Assembler::adopt`], so existing nodes keep their own type.
pub struct ArrayType {
    element: TypeRef,
}

impl ArrayType {
    /// A new sequence definition. Each call is a distinct type.
    pub fn of(element: TypeRef) -> TypeRef {
        Arc::new(ArrayType { element })
    }

    /// Sequence of [`any`], shared: every call returns the same definition.
    pub fn any() -> TypeRef {
        ANY_ARRAY.get_or_init(|| Self::of(any())).clone()
    }

    pub fn element(&self) -> &TypeRef {
        &self.element
    }
}

impl fmt::Debug for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayType")
            .field("element", &self.element.name())
            .finish()
    }
}

impl TypeDefinition for ArrayType {
    fn name(&self) -> String {
        format!("Array<{}>", self.element.name())
    }

    fn assemble(
        &self,
        asm: &Assembler<'_>,
        node: Arc<Node>,
        input: &Candidate,
    ) -> PicoResult<Arc<Node>> {
        let elements = match input.elements() {
            Some(elements) => elements,
            None if input.to_value().is_null() => Vec::new(),
            None => vec![input.clone()],
        };
        let node = if node.state().as_array().is_some() {
            node
        } else {
            node.with_state(Value::array(
                elements.iter().map(Candidate::to_value).collect(),
            ))
        };
        elements
            .into_iter()
            .enumerate()
            .try_fold(node, |node, (index, member)| {
                let child = asm.adopt(&self.element, member)?;
                asm.install(node, index, child)
            })
    }
}

/// Transitions of [`ArrayType`].
///
/// `Push`, `Unshift`, `Shift` and `Clear` produce a new raw sequence, from
/// which every element node is rebuilt. Element values themselves are shared.
pub enum ArrayOp<'a> {
    Push(Value),
    Unshift(Value),
    Shift,
    Clear,
    /// Keep the elements whose source satisfies the predicate.
    Filter(Box<dyn Fn(&Picostate) -> bool + 'a>),
    /// Replace every element by what the function returns for its source.
    ///
    /// A returned node is installed as-is, keeping its type.
    Map(Box<dyn Fn(Picostate) -> PicoResult<Candidate> + 'a>),
}

impl fmt::Debug for ArrayOp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayOp::Push(value) => f.debug_tuple("Push").field(value).finish(),
            ArrayOp::Unshift(value) => f.debug_tuple("Unshift").field(value).finish(),
            ArrayOp::Shift => f.write_str("Shift"),
            ArrayOp::Clear => f.write_str("Clear"),
            ArrayOp::Filter(_) => f.write_str("Filter(..)"),
            ArrayOp::Map(_) => f.write_str("Map(..)"),
        }
    }
}

impl Transition for ArrayOp<'_> {
    type Target = ArrayType;

    fn name(&self) -> &'static str {
        match self {
            ArrayOp::Push(_) => "push",
            ArrayOp::Unshift(_) => "unshift",
            ArrayOp::Shift => "shift",
            ArrayOp::Clear => "clear",
            ArrayOp::Filter(_) => "filter",
            ArrayOp::Map(_) => "map",
        }
    }

    fn apply(self, _ty: &ArrayType, this: &Picostate) -> PicoResult<Candidate> {
        let current = this.state().as_array().unwrap_or_default();
        let mut items = current.to_vec();
        match self {
            ArrayOp::Push(value) => items.push(value),
            ArrayOp::Unshift(value) => items.insert(0, value),
            ArrayOp::Shift | ArrayOp::Clear if items.is_empty() => {
                return Ok(Candidate::Value(this.state().clone()))
            }
            ArrayOp::Shift => {
                items.remove(0);
            }
            ArrayOp::Clear => items.clear(),
            ArrayOp::Filter(predicate) => {
                let kept = collection::filter(predicate, this)
                    .into_iter()
                    .map(|member| Candidate::Value(member.state().clone()))
                    .collect();
                let tree = this
                    .runtime()
                    .create(this.lifted_type().definition_ref(), Candidate::Sequence(kept))?;
                return Ok(Candidate::Node(tree));
            }
            ArrayOp::Map(f) => return collection::map_candidates(f, this),
        }
        Ok(Candidate::Value(Value::array(items)))
    }
}

/// Array transitions as methods on a handle.
pub trait ArrayTransitions {
    fn push(&self, value: impl Into<Value>) -> PicoResult<Picostate>;

    fn unshift(&self, value: impl Into<Value>) -> PicoResult<Picostate>;

    /// Drop the first element. No-op on an empty sequence.
    fn shift(&self) -> PicoResult<Picostate>;

    fn clear(&self) -> PicoResult<Picostate>;

    fn filter<P>(&self, predicate: P) -> PicoResult<Picostate>
    where
        P: Fn(&Picostate) -> bool;

    fn map<F, R>(&self, f: F) -> PicoResult<Picostate>
    where
        F: Fn(Picostate) -> PicoResult<R>,
        R: Into<Candidate>;
}

impl ArrayTransitions for Picostate {
    fn push(&self, value: impl Into<Value>) -> PicoResult<Picostate> {
        self.transition(ArrayOp::Push(value.into()))
    }

    fn unshift(&self, value: impl Into<Value>) -> PicoResult<Picostate> {
        self.transition(ArrayOp::Unshift(value.into()))
    }

    fn shift(&self) -> PicoResult<Picostate> {
        self.transition(ArrayOp::Shift)
    }

    fn clear(&self) -> PicoResult<Picostate> {
        self.transition(ArrayOp::Clear)
    }

    fn filter<P>(&self, predicate: P) -> PicoResult<Picostate>
    where
        P: Fn(&Picostate) -> bool,
    {
        self.transition(ArrayOp::Filter(Box::new(predicate)))
    }

    fn map<F, R>(&self, f: F) -> PicoResult<Picostate>
    where
        F: Fn(Picostate) -> PicoResult<R>,
        R: Into<Candidate>,
    {
        self.transition(ArrayOp::Map(Box::new(move |member| f(member).map(Into::into))))
    }
}
