//! Inputs accepted by `create` and `set`.

use crate::{Picostate, Seg, Value};

/// What a node can be set to.
///
/// A raw value is assembled into a fresh subtree. An existing node is
/// installed as-is, keeping its type. A sequence mixes both, one entry per
/// element, and is how a collection installs nodes of other types.
#[derive(Clone, Debug)]
pub enum Candidate {
    Value(Value),
    Node(Picostate),
    Sequence(Vec<Candidate>),
}

impl Candidate {
    /// The raw value this candidate stands for.
    pub fn to_value(&self) -> Value {
        match self {
            Candidate::Value(value) => value.clone(),
            Candidate::Node(node) => node.state().clone(),
            Candidate::Sequence(items) => Value::array(items.iter().map(Candidate::to_value).collect()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Candidate::Value(Value::Null))
    }

    /// The candidate for one named member, if present.
    ///
    /// Members of a node are its existing child nodes where it has them, so
    /// re-typing a node keeps its children.
    pub fn member(&self, seg: &Seg) -> Option<Candidate> {
        match self {
            Candidate::Value(value) => value.get(seg).cloned().map(Candidate::Value),
            Candidate::Node(node) => node
                .get(seg)
                .map(Candidate::Node)
                .or_else(|| node.state().get(seg).cloned().map(Candidate::Value)),
            Candidate::Sequence(items) => seg.as_index().and_then(|i| items.get(i)).cloned(),
        }
    }

    /// Ordered members, if this candidate is sequence-shaped.
    pub fn elements(&self) -> Option<Vec<Candidate>> {
        match self {
            Candidate::Sequence(items) => Some(items.clone()),
            Candidate::Value(Value::Array(items)) => {
                Some(items.iter().cloned().map(Candidate::Value).collect())
            }
            Candidate::Node(node) => {
                let len = node.state().as_array()?.len();
                (0..len).map(|i| self.member(&Seg::index(i))).collect()
            }
            Candidate::Value(_) => None,
        }
    }

    /// Keyed members, if this candidate is mapping-shaped.
    pub fn entries(&self) -> Option<Vec<(String, Candidate)>> {
        let keys: Vec<String> = self.to_value().as_object()?.keys().cloned().collect();
        keys.into_iter()
            .map(|key| {
                let member = self.member(&Seg::key(key.as_str()))?;
                Some((key, member))
            })
            .collect()
    }
}

impl Default for Candidate {
    fn default() -> Self {
        Candidate::Value(Value::Null)
    }
}

impl From<Value> for Candidate {
    fn from(value: Value) -> Self {
        Candidate::Value(value)
    }
}

impl From<serde_json::Value> for Candidate {
    fn from(value: serde_json::Value) -> Self {
        Candidate::Value(value.into())
    }
}

impl From<&str> for Candidate {
    fn from(s: &str) -> Self {
        Candidate::Value(s.into())
    }
}

impl From<String> for Candidate {
    fn from(s: String) -> Self {
        Candidate::Value(s.into())
    }
}

impl From<Picostate> for Candidate {
    fn from(node: Picostate) -> Self {
        Candidate::Node(node)
    }
}

impl From<&Picostate> for Candidate {
    fn from(node: &Picostate) -> Self {
        Candidate::Node(node.clone())
    }
}

impl From<Vec<Candidate>> for Candidate {
    fn from(items: Vec<Candidate>) -> Self {
        Candidate::Sequence(items)
    }
}
