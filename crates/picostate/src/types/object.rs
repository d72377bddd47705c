use crate::assemble::Assembler;
use crate::lens::{Lens, ValueAt};
use crate::node::Node;
use crate::types::any;
use crate::{Candidate, Map, PicoError, PicoResult, Picostate, Transition, TypeDefinition, TypeRef, Value};
use std::fmt;
use std::sync::{Arc, OnceLock};

static ANY_OBJECT: OnceLock<TypeRef> = OnceLock::new();

/// Mapping from string keys to `member` values.
pub struct ObjectType {
    member: TypeRef,
}

impl ObjectType {
    /// A new mapping definition. Each call is a distinct type.
    pub fn of(member: TypeRef) -> TypeRef {
        Arc::new(ObjectType { member })
    }

    /// Mapping of [`any`], shared: every call returns the same definition.
    pub fn any() -> TypeRef {
        ANY_OBJECT.get_or_init(|| Self::of(any())).clone()
    }

    pub fn member(&self) -> &TypeRef {
        &self.member
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectType")
            .field("member", &self.member.name())
            .finish()
    }
}

impl TypeDefinition for ObjectType {
    fn name(&self) -> String {
        format!("Object<{}>", self.member.name())
    }

    fn assemble(
        &self,
        asm: &Assembler<'_>,
        node: Arc<Node>,
        input: &Candidate,
    ) -> PicoResult<Arc<Node>> {
        let raw = input.to_value();
        if raw.is_null() {
            return Ok(node.with_state(Value::object(Map::new())));
        }
        let entries = input.entries().ok_or_else(|| {
            PicoError::invalid_operation(format!(
                "{} cannot hold {} values",
                self.name(),
                raw.kind()
            ))
        })?;
        entries.into_iter().try_fold(node, |node, (key, member)| {
            let child = asm.adopt(&self.member, member)?;
            asm.install(node, key, child)
        })
    }
}

/// Transitions of [`ObjectType`], applied to the raw mapping.
#[derive(Debug, Clone)]
pub enum ObjectOp {
    /// Merge entries, overwriting existing keys.
    Assign(Map),
    Put(String, Value),
    /// Remove a key. No-op when it is absent.
    Delete(String),
}

impl Transition for ObjectOp {
    type Target = ObjectType;

    fn name(&self) -> &'static str {
        match self {
            ObjectOp::Assign(_) => "assign",
            ObjectOp::Put(..) => "put",
            ObjectOp::Delete(_) => "delete",
        }
    }

    fn apply(self, _ty: &ObjectType, this: &Picostate) -> PicoResult<Candidate> {
        let state = this.state();
        let next = match self {
            ObjectOp::Assign(entries) => entries
                .into_iter()
                .try_fold(state.clone(), |state, (key, value)| {
                    ValueAt::new(key).set(value, &state)
                })?,
            ObjectOp::Put(key, value) => ValueAt::new(key).set(value, state)?,
            ObjectOp::Delete(key) => match state.as_object() {
                Some(entries) if entries.contains_key(&key) => {
                    let mut entries = entries.clone();
                    entries.remove(&key);
                    Value::object(entries)
                }
                _ => state.clone(),
            },
        };
        Ok(Candidate::Value(next))
    }
}

/// Object transitions as methods on a handle.
pub trait ObjectTransitions {
    fn put(&self, key: impl Into<String>, value: impl Into<Value>) -> PicoResult<Picostate>;

    fn assign(&self, entries: Map) -> PicoResult<Picostate>;

    fn delete(&self, key: impl Into<String>) -> PicoResult<Picostate>;
}

impl ObjectTransitions for Picostate {
    fn put(&self, key: impl Into<String>, value: impl Into<Value>) -> PicoResult<Picostate> {
        self.transition(ObjectOp::Put(key.into(), value.into()))
    }

    fn assign(&self, entries: Map) -> PicoResult<Picostate> {
        self.transition(ObjectOp::Assign(entries))
    }

    fn delete(&self, key: impl Into<String>) -> PicoResult<Picostate> {
        self.transition(ObjectOp::Delete(key.into()))
    }
}
