//! Typed node trees over immutable values, with structurally shared updates.
//!
//! `picostate` wraps a raw JSON-shaped [`Value`] in a parallel tree of typed
//! nodes. A transition on any node produces a new tree in which only the path
//! from that node to the root is rebuilt; everything else is shared by
//! reference with the old tree, which stays valid and unchanged.
//!
//! # Core Concepts
//!
//! - **TypeDefinition**: describes a value's shape and how it decomposes into children
//! - **Runtime**: lifts type definitions (memoized) and creates trees
//! - **Picostate**: handle to a node at a position in a tree
//! - **Transition**: a typed request (`push`, `put`, ...) bound to one definition
//! - **Meta**: a node's name under its parent, its parent and its source
//! - **Lens**: composable addressing of nested slots, used for all writes
//!
//! # Transition Folding
//!
//! ```text
//! root' = fold(node, apply(transition, source(node)))
//! ```
//!
//! - A transition reads its receiver and returns a candidate value
//! - Setting a node to its current value returns the same handle
//! - Siblings of every rebuilt node are shared with the previous tree
//!
//! # Quick Start
//!
//! ```
//! use picostate::{any, ArrayTransitions, ArrayType, Runtime, StructType};
//! use serde_json::json;
//!
//! let text = any();
//! let record = StructType::named("Record").field("content", &text).build();
//! let dataset = StructType::named("Dataset")
//!     .field_with_default("records", &ArrayType::of(record), json!([]))
//!     .build();
//!
//! let rt = Runtime::new();
//! let root = rt.create(&dataset, json!({"records": [{"content": "Herro"}]}))?;
//!
//! let next = root.get("records").unwrap().push(json!({"content": "Hi!"}))?;
//! assert_eq!(next.state()["records"][1]["content"].as_str(), Some("Hi!"));
//! assert_eq!(root.state()["records"].len(), 1); // Original unchanged
//!
//! // The untouched record is shared, not copied.
//! assert!(next.state()["records"][0].same(&root.state()["records"][0]));
//! # Ok::<(), picostate::PicoError>(())
//! ```

mod assemble;
mod candidate;
pub mod collection;
mod config;
mod definition;
mod error;
pub mod lens;
mod meta;
mod node;
mod path;
mod picostate;
mod runtime;
mod types;
mod value;

// Core types
pub use candidate::Candidate;
pub use error::{PicoError, PicoResult};
pub use path::{Path, Seg};
pub use value::{Map, Value};

// Tree machinery
pub use assemble::Assembler;
pub use config::RuntimeConfig;
pub use lens::{Lens, SubstateAt, SubstatePath, ValueAt};
pub use meta::Meta;
pub use node::Node;
pub use picostate::Picostate;
pub use runtime::{LiftedType, Runtime};

// Type definitions
pub use definition::{AsAny, Field, Transition, TypeDefinition, TypeRef};
pub use types::{
    any, Any, ArrayOp, ArrayTransitions, ArrayType, ObjectOp, ObjectTransitions, ObjectType,
    StructType,
};
