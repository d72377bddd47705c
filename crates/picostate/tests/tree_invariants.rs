//! Sharing, identity and linkage guarantees of transitions.

use picostate::lens::{self, Lens};
use picostate::{
    any, path, ArrayTransitions, ArrayType, Assembler, Candidate, Map, Meta, Node,
    ObjectTransitions, ObjectType, PicoError, PicoResult, Picostate, Runtime, RuntimeConfig,
    StructType, TypeDefinition, TypeRef, Value, ValueAt,
};
use serde_json::json;
use std::sync::Arc;

fn dataset_type() -> TypeRef {
    let record = StructType::named("Record").field("content", &any()).build();
    StructType::named("Dataset")
        .field_with_default("records", &ArrayType::of(record), json!([]))
        .field_with_default("tags", &ObjectType::any(), json!({}))
        .build()
}

fn dataset(rt: &Runtime) -> Picostate {
    rt.create(
        &dataset_type(),
        json!({
            "records": [{"content": "Herro"}, {"content": "Sweet"}, {"content": "Woooo"}],
            "tags": {"lang": "en"}
        }),
    )
    .unwrap()
}

/// Every child's state is the very value its parent holds at its name.
fn assert_linked(node: &Picostate) {
    for child in node.children() {
        let name = child.meta().name().cloned().unwrap();
        let held = node.state().get(&name).unwrap();
        assert!(held.same(child.state()), "{} not linked", child.path());
        assert_linked(&child);
    }
}

// ============================================================================
// Idempotence and sharing
// ============================================================================

#[test]
fn test_set_current_state_returns_same_handle() {
    let rt = Runtime::new();
    let root = dataset(&rt);
    for path in [path!(), path!("records"), path!("records", 2, "content")] {
        let node = root.at(&path).unwrap();
        let next = node.set(node.state().clone()).unwrap();
        assert!(next.same(&node));
    }
}

#[test]
fn test_set_current_node_returns_same_handle() {
    let rt = Runtime::new();
    let root = dataset(&rt);
    let records = root.get("records").unwrap();
    assert!(records.set(&records).unwrap().same(&records));
}

#[test]
fn test_set_shares_untouched_subtrees() {
    let rt = Runtime::new();
    let root = dataset(&rt);
    let next = root
        .at(&path!("records", 1, "content"))
        .unwrap()
        .set("Sour")
        .unwrap();

    let before = root.get("records").unwrap();
    let after = next.get("records").unwrap();
    assert!(!Arc::ptr_eq(before.node(), after.node()));
    for i in [0, 2] {
        assert!(Arc::ptr_eq(
            before.get(i).unwrap().node(),
            after.get(i).unwrap().node()
        ));
    }
    assert!(Arc::ptr_eq(
        root.get("tags").unwrap().node(),
        next.get("tags").unwrap().node()
    ));
    assert!(next.state()["tags"].same(&root.state()["tags"]));
}

#[test]
fn test_states_stay_linked_after_transitions() {
    let rt = Runtime::new();
    let root = dataset(&rt);
    assert_linked(&root);

    let next = root
        .get("records")
        .unwrap()
        .push(json!({"content": "Hi!"}))
        .unwrap();
    assert_linked(&next);

    let next = next
        .at(&path!("records", 3, "content"))
        .unwrap()
        .set("Hello!")
        .unwrap();
    assert_linked(&next);

    let next = next.get("tags").unwrap().put("mood", "sweet").unwrap();
    assert_linked(&next);
}

#[test]
fn test_round_trip_addressing() {
    let rt = Runtime::new();
    let root = dataset(&rt);
    let content = root.at(&path!("records", 0, "content")).unwrap();
    assert_eq!(content.path(), &path!("records", 0, "content"));

    let resolved = content.top().at(content.path()).unwrap();
    assert!(resolved.same(&content));
}

// ============================================================================
// Meta and re-linking
// ============================================================================

#[test]
fn test_parent_chain_reaches_new_root() {
    let rt = Runtime::new();
    let root = dataset(&rt);
    let next = root
        .get("records")
        .unwrap()
        .push(json!({"content": "Hi!"}))
        .unwrap();

    let mut current = next.at(&path!("records", 3, "content")).unwrap();
    let mut hops = 0;
    while let Some(parent) = current.parent().unwrap() {
        current = parent;
        hops += 1;
    }
    assert_eq!(hops, 3);
    assert!(Arc::ptr_eq(current.node(), next.node()));
    assert!(!Arc::ptr_eq(current.node(), root.node()));
}

#[test]
fn test_reused_subtree_is_relinked() {
    let rt = Runtime::new();
    let root = dataset(&rt);
    let next = root.get("tags").unwrap().put("mood", "sweet").unwrap();

    // The records subtree is shared, but reached from the new root it
    // resolves its parent to the new root.
    let record = next.at(&path!("records", 0)).unwrap();
    assert!(Arc::ptr_eq(
        record.node(),
        root.at(&path!("records", 0)).unwrap().node()
    ));
    let top = record.parent().unwrap().unwrap().parent().unwrap().unwrap();
    assert!(Arc::ptr_eq(top.node(), next.node()));
}

#[test]
fn test_meta_lookup_without_context() {
    let err = Meta::lookup(None).unwrap_err();
    assert!(matches!(err, PicoError::MissingContext));
    assert_eq!(err.to_string(), "cannot look up meta of a missing context");
}

#[test]
fn test_meta_source_is_canonical_wrapper() {
    let rt = Runtime::new();
    let root = dataset(&rt);
    let record = root.at(&path!("records", 1)).unwrap();
    let source = Meta::source_of(&record);
    assert!(source.is_root());
    assert!(source.parent().unwrap().is_none());
    assert!(source.state().same(record.state()));
}

// ============================================================================
// Lifting
// ============================================================================

#[test]
fn test_lifting_is_memoized() {
    let rt = Runtime::new();
    let ty = dataset_type();
    let a = rt.create(&ty, Value::Null).unwrap();
    let b = rt.create(&ty, json!({"records": [{"content": "x"}]})).unwrap();
    assert!(Arc::ptr_eq(a.lifted_type(), b.lifted_type()));

    let count = rt.lifted_count().unwrap();
    rt.create(&ty, Value::Null).unwrap();
    assert_eq!(rt.lifted_count().unwrap(), count);
}

#[test]
fn test_rebuilt_elements_share_lifted_type() {
    let rt = Runtime::new();
    let root = dataset(&rt);
    let next = root.get("records").unwrap().push(json!({"content": "Hi!"})).unwrap();
    let old = root.at(&path!("records", 0)).unwrap();
    let new = next.at(&path!("records", 3)).unwrap();
    assert!(Arc::ptr_eq(old.lifted_type(), new.lifted_type()));
}

// ============================================================================
// Object transitions
// ============================================================================

#[test]
fn test_object_put_assign_delete() {
    let rt = Runtime::new();
    let root = dataset(&rt);
    let tags = root.get("tags").unwrap();

    let put = tags.put("mood", "sweet").unwrap();
    assert_eq!(put.state()["tags"], json!({"lang": "en", "mood": "sweet"}));
    assert_eq!(
        put.at(&path!("tags", "mood")).unwrap().type_name(),
        "Picostate<Any>"
    );

    let mut entries = Map::new();
    entries.insert("lang".to_string(), Value::from("fr"));
    entries.insert("level".to_string(), Value::from(3i64));
    let assigned = put.get("tags").unwrap().assign(entries).unwrap();
    assert_eq!(
        assigned.state()["tags"],
        json!({"lang": "fr", "level": 3, "mood": "sweet"})
    );

    let deleted = assigned.get("tags").unwrap().delete("lang").unwrap();
    assert_eq!(deleted.state()["tags"], json!({"level": 3, "mood": "sweet"}));
    assert!(deleted.at(&path!("tags", "lang")).is_err());
    assert!(deleted.state()["records"].same(&root.state()["records"]));
}

// ============================================================================
// Assembly hooks and limits
// ============================================================================

/// A counter whose label is derived from its count.
struct Counter {
    fields: Vec<picostate::Field>,
}

impl Counter {
    fn new() -> TypeRef {
        Arc::new(Counter {
            fields: vec![picostate::Field::new("count", &any()).with_default(0i64)],
        })
    }
}

impl TypeDefinition for Counter {
    fn name(&self) -> String {
        "Counter".to_string()
    }

    fn fields(&self) -> &[picostate::Field] {
        &self.fields
    }

    fn initialize(&self, node: &Picostate, _input: &Candidate) -> PicoResult<Option<Candidate>> {
        if !node.state()["label"].is_null() {
            return Ok(None);
        }
        let count = node.state()["count"].as_i64().unwrap_or_default();
        let state = ValueAt::new("label").set(format!("count: {count}").into(), node.state())?;
        Ok(Some(state.into()))
    }
}

#[test]
fn test_initialize_derives_defaults() {
    let rt = Runtime::new();
    let counter = rt.create(&Counter::new(), json!({"count": 2})).unwrap();
    assert_eq!(counter.state(), &json!({"count": 2, "label": "count: 2"}));

    let empty = rt.create(&Counter::new(), Value::Null).unwrap();
    assert_eq!(empty.state(), &json!({"count": 0, "label": "count: 0"}));
}

#[test]
fn test_initialize_runs_for_nested_nodes() {
    let rt = Runtime::new();
    let list = rt
        .create(&ArrayType::of(Counter::new()), json!([{"count": 1}]))
        .unwrap();
    let next = list.push(json!({"count": 5})).unwrap();
    assert_eq!(next.state()[1]["label"].as_str(), Some("count: 5"));
    assert_eq!(next.state()[0]["label"].as_str(), Some("count: 1"));
}

/// A definition whose every instance contains another, freshly defined one.
struct Matryoshka;

impl TypeDefinition for Matryoshka {
    fn name(&self) -> String {
        "Matryoshka".to_string()
    }

    fn assemble(
        &self,
        asm: &Assembler<'_>,
        node: Arc<Node>,
        _input: &Candidate,
    ) -> PicoResult<Arc<Node>> {
        let inner: TypeRef = Arc::new(Matryoshka);
        let child = asm.adopt(&inner, Candidate::default())?;
        asm.install(node, "inner", child)
    }
}

#[test]
fn test_runaway_assembly_hits_depth_limit() {
    let rt = Runtime::with_config(RuntimeConfig::default().with_max_depth(16));
    let ty: TypeRef = Arc::new(Matryoshka);
    let err = rt.create(&ty, Value::Null).unwrap_err();
    assert!(matches!(err, PicoError::DepthExceeded { limit: 16 }));
}

/// A definition that never settles.
struct Restless;

impl TypeDefinition for Restless {
    fn name(&self) -> String {
        "Restless".to_string()
    }

    fn initialize(&self, node: &Picostate, _input: &Candidate) -> PicoResult<Option<Candidate>> {
        let n = node.state().as_i64().unwrap_or_default();
        Ok(Some(Value::from(n + 1).into()))
    }
}

#[test]
fn test_restless_initialize_hits_depth_limit() {
    let rt = Runtime::with_config(RuntimeConfig::default().with_max_depth(8));
    let ty: TypeRef = Arc::new(Restless);
    let err = rt.create(&ty, json!(0)).unwrap_err();
    assert!(matches!(err, PicoError::DepthExceeded { limit: 8 }));
}

// ============================================================================
// Lenses over the tree
// ============================================================================

#[test]
fn test_value_lenses_compose_over_state() {
    let rt = Runtime::new();
    let root = dataset(&rt);
    let content = ValueAt::new("records")
        .then(ValueAt::new(1))
        .then(ValueAt::new("content"));

    assert_eq!(
        lens::view(&content, root.state()).unwrap(),
        json!("Sweet")
    );
    let raw = lens::set(&content, Value::from("Sour"), root.state()).unwrap();
    let next = root.set(raw).unwrap();
    assert_eq!(next.at(&path!("records", 1, "content")).unwrap().state(), &json!("Sour"));
    assert!(next.state()["records"][0].same(&root.state()["records"][0]));
}

#[test]
fn test_trace_transitions_logs() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("picostate=trace"))
        .with_test_writer()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let rt = Runtime::with_config(RuntimeConfig::default().with_trace_transitions(true));
    let list = rt.create(&ArrayType::any(), json!([1])).unwrap();
    let next = list.push(2i64).unwrap();
    assert_eq!(next.state(), &json!([1, 2]));
}
