//! Performance benchmarks for picostate operations.
//!
//! Run with: cargo bench --package picostate

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use picostate::{
    any, path, ArrayTransitions, ArrayType, Path, Runtime, Seg, StructType, TypeRef,
};
use serde_json::{json, Value};

// ============================================================================
// Helper functions to generate test data
// ============================================================================

/// Generate `num_records` records of the form `{"content": "record_i"}`
fn generate_records(num_records: usize) -> Value {
    let records: Vec<Value> = (0..num_records)
        .map(|i| json!({"content": format!("record_{}", i)}))
        .collect();
    json!({ "records": records })
}

/// Generate a chain of `depth` nested objects ending in `{"value": 42}`
fn generate_nested_doc(depth: usize) -> Value {
    let mut current = json!({"value": 42});
    for i in (0..depth).rev() {
        let mut obj = serde_json::Map::new();
        obj.insert(format!("level_{}", i), current);
        current = json!(obj);
    }
    current
}

/// A struct type for every level of [`generate_nested_doc`]
fn nested_type(depth: usize) -> TypeRef {
    let mut ty = StructType::named("Leaf").field("value", &any()).build();
    for i in (0..depth).rev() {
        ty = StructType::named(format!("Level{}", i))
            .field(format!("level_{}", i), &ty)
            .build();
    }
    ty
}

fn dataset_type() -> TypeRef {
    let record = StructType::named("Record").field("content", &any()).build();
    StructType::named("Dataset")
        .field_with_default("records", &ArrayType::of(record), json!([]))
        .build()
}

// ============================================================================
// Benchmark: create with varying tree sizes
// ============================================================================

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_dataset");
    let rt = Runtime::new();
    let ty = dataset_type();

    for num_records in [10, 100, 1000] {
        group.throughput(Throughput::Elements(num_records as u64));
        let doc = generate_records(num_records);

        group.bench_with_input(
            BenchmarkId::from_parameter(num_records),
            &num_records,
            |b, _| {
                b.iter(|| {
                    let root = rt.create(black_box(&ty), black_box(doc.clone()));
                    black_box(root)
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Benchmark: set a leaf in wide and deep trees
// ============================================================================

fn bench_set_leaf_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_leaf_wide");
    let rt = Runtime::new();
    let ty = dataset_type();

    for num_records in [10, 100, 1000, 10000] {
        let root = rt.create(&ty, generate_records(num_records)).unwrap();
        let leaf = root.at(&path!("records", num_records / 2, "content")).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(num_records),
            &num_records,
            |b, _| {
                b.iter(|| {
                    let result = leaf.set(black_box("changed"));
                    black_box(result)
                });
            },
        );
    }

    group.finish();
}

fn bench_set_leaf_deep(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_leaf_deep");
    let rt = Runtime::new();

    for depth in [5, 10, 20, 50] {
        let root = rt
            .create(&nested_type(depth), generate_nested_doc(depth))
            .unwrap();
        let mut leaf_path: Path = (0..depth).map(|i| Seg::key(format!("level_{}", i))).collect();
        leaf_path.push(Seg::key("value"));
        let leaf = root.at(&leaf_path).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| {
                let result = leaf.set(black_box(json!(999)));
                black_box(result)
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: sequence transitions
// ============================================================================

fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_record");
    let rt = Runtime::new();
    let ty = dataset_type();

    for num_records in [10, 100, 1000] {
        let root = rt.create(&ty, generate_records(num_records)).unwrap();
        let records = root.get("records").unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(num_records),
            &num_records,
            |b, _| {
                b.iter(|| {
                    let result = records.push(black_box(json!({"content": "new"})));
                    black_box(result)
                });
            },
        );
    }

    group.finish();
}

fn bench_set_unchanged(c: &mut Criterion) {
    let rt = Runtime::new();
    let root = rt.create(&dataset_type(), generate_records(1000)).unwrap();
    let records = root.get("records").unwrap();
    let state = records.state().clone();

    c.bench_function("set_unchanged", |b| {
        b.iter(|| {
            let result = records.set(black_box(state.clone()));
            black_box(result)
        });
    });
}

criterion_group!(
    benches,
    bench_create,
    bench_set_leaf_wide,
    bench_set_leaf_deep,
    bench_push,
    bench_set_unchanged,
);

criterion_main!(benches);
