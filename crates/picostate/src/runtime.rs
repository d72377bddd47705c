//! The runtime: type-lifting registry and the `create` entry point.
//!
//! Lifting is memoized per runtime, keyed by the identity of the
//! [`TypeRef`] allocation. The registry only holds weak references: a lifted
//! type lives as long as some node (or caller) holds it, and an unused
//! definition is not kept alive by the runtime. A runtime is cheap to clone;
//! clones share one registry. Independent runtimes never share lifted types,
//! which keeps tests isolated from each other.

use crate::assemble::Assembler;
use crate::node::Node;
use crate::{Candidate, PicoError, PicoResult, Picostate, RuntimeConfig, TypeDefinition, TypeRef};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};

/// Identity of a type definition: the address of its allocation.
///
/// A live lifted type holds its definition, so an address cannot be reused
/// while the entry keyed by it can still be upgraded.
fn type_key(ty: &TypeRef) -> usize {
    Arc::as_ptr(ty) as *const () as usize
}

/// A type definition lifted into the tree machinery.
///
/// Every node carries its lifted type. Two nodes have the same type exactly
/// when they carry the same `Arc<LiftedType>`.
pub struct LiftedType {
    id: u64,
    name: String,
    definition: TypeRef,
}

impl LiftedType {
    /// Registry-unique id, in lifting order.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// `Picostate<Name>`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn definition(&self) -> &dyn TypeDefinition {
        self.definition.as_ref()
    }

    #[inline]
    pub fn definition_ref(&self) -> &TypeRef {
        &self.definition
    }

    /// Whether this was lifted from exactly `ty`.
    pub fn is(&self, ty: &TypeRef) -> bool {
        type_key(&self.definition) == type_key(ty)
    }

    /// Whether this was lifted from `ty` or from a type refining it.
    pub fn is_a(&self, ty: &TypeRef) -> bool {
        let mut current = Some(self.definition.clone());
        while let Some(definition) = current {
            if type_key(&definition) == type_key(ty) {
                return true;
            }
            current = definition.supertype();
        }
        false
    }
}

impl fmt::Debug for LiftedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiftedType")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Default)]
struct Registry {
    lifted: HashMap<usize, Weak<LiftedType>>,
    next_id: u64,
}

impl Registry {
    fn get(&self, ty: &TypeRef) -> Option<Arc<LiftedType>> {
        self.lifted
            .get(&type_key(ty))
            .and_then(Weak::upgrade)
            .filter(|lifted| lifted.is(ty))
    }

    fn prune(&mut self) {
        self.lifted.retain(|_, lifted| lifted.strong_count() > 0);
    }
}

struct RuntimeInner {
    config: RuntimeConfig,
    registry: Mutex<Registry>,
}

/// Owner of the lifting cache; entry point for building trees.
///
/// ```
/// use picostate::{ArrayType, Runtime};
/// use serde_json::json;
///
/// let rt = Runtime::new();
/// let list = rt.create(&ArrayType::any(), json!(["a", "b"]))?;
/// assert_eq!(list.state(), &json!(["a", "b"]));
/// assert_eq!(list.type_name(), "Picostate<Array<Any>>");
/// # Ok::<(), picostate::PicoError>(())
/// ```
#[derive(Clone)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            inner: Arc::new(RuntimeInner {
                config,
                registry: Mutex::new(Registry::default()),
            }),
        }
    }

    #[inline]
    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// Lift a type definition, memoized by identity.
    ///
    /// Lifting the same `TypeRef` twice returns the same `Arc<LiftedType>`
    /// as long as the first one is still alive.
    pub fn lift(&self, ty: &TypeRef) -> PicoResult<Arc<LiftedType>> {
        let mut registry = self
            .inner
            .registry
            .lock()
            .map_err(|_| PicoError::invalid_operation("type registry mutex poisoned"))?;
        if let Some(lifted) = registry.get(ty) {
            return Ok(lifted);
        }
        registry.prune();
        registry.next_id += 1;
        let lifted = Arc::new(LiftedType {
            id: registry.next_id,
            name: format!("Picostate<{}>", ty.name()),
            definition: ty.clone(),
        });
        registry.lifted.insert(type_key(ty), Arc::downgrade(&lifted));
        tracing::debug!(id = lifted.id, name = %lifted.name, "lifted type");
        Ok(lifted)
    }

    /// Number of lifted types still in use.
    pub fn lifted_count(&self) -> PicoResult<usize> {
        let registry = self
            .inner
            .registry
            .lock()
            .map_err(|_| PicoError::invalid_operation("type registry mutex poisoned"))?;
        Ok(registry
            .lifted
            .values()
            .filter(|lifted| lifted.strong_count() > 0)
            .count())
    }

    /// Assemble a tree of `ty` from `value`.
    ///
    /// Passing an existing node as `value` re-types it: the new root keeps the
    /// node's state and reuses its children where `ty` declares them.
    pub fn create(&self, ty: &TypeRef, value: impl Into<Candidate>) -> PicoResult<Picostate> {
        let lifted = self.lift(ty)?;
        self.build(&lifted, value.into(), 0)
    }

    pub(crate) fn build(
        &self,
        lifted: &Arc<LiftedType>,
        input: Candidate,
        depth: usize,
    ) -> PicoResult<Picostate> {
        let limit = self.inner.config.max_depth;
        if depth > limit {
            return Err(PicoError::DepthExceeded { limit });
        }
        tracing::trace!(ty = lifted.name(), depth, "assembling");

        let definition = lifted.definition();
        let node = Node::fresh(lifted.clone(), input.to_value());
        let node = definition.assemble(&Assembler::new(self, depth), node, &input)?;
        let root = Picostate::root(self.clone(), node);
        match definition.initialize(&root, &input)? {
            Some(next) => root.set_within(next, depth + 1),
            None => Ok(root),
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
