use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use siam_db::{Collection, FieldType, IdStrategy, Schema};
use std::time::Duration;

const BULK_SIZE: usize = 1_000;

fn setup(strategy: IdStrategy) -> Collection {
    let schema = Schema::new()
        .field("name", FieldType::String)
        .field("age", FieldType::Number);
    let mut users = Collection::new(schema, strategy);
    for i in 0..BULK_SIZE {
        users
            .create(json!({"name": format!("user_{}", i), "age": (i % 90) as i64}))
            .unwrap();
    }
    users
}

fn bench_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("writes");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("create_autoinc", |b| {
        let mut users = setup(IdStrategy::AutoIncrement);
        b.iter(|| {
            users
                .create(black_box(json!({"name": "bench", "age": 30})))
                .unwrap()
        })
    });

    group.bench_function("create_uuid", |b| {
        let mut users = setup(IdStrategy::RandomUnique);
        b.iter(|| {
            users
                .create(black_box(json!({"name": "bench", "age": 30})))
                .unwrap()
        })
    });

    group.bench_function("update_by_id", |b| {
        let mut users = setup(IdStrategy::AutoIncrement);
        let filter = json!({"id": "500"});
        b.iter(|| {
            users
                .update(black_box(&filter), json!({"age": 31}))
                .unwrap()
        })
    });

    group.finish();
}

fn bench_reads(c: &mut Criterion) {
    let users = setup(IdStrategy::AutoIncrement);
    let mut group = c.benchmark_group("reads");

    let by_id = json!({"id": "500"});
    group.bench_function("find_by_id", |b| b.iter(|| users.find(black_box(&by_id))));

    let equality = json!({"name": "user_500"});
    group.bench_function("find_equality_scan", |b| {
        b.iter(|| users.find(black_box(&equality)))
    });

    let range = json!({
        "$or": [{"name": "user_1"}, {"age": {"$gte": 30, "$lt": 40}}],
        "$and": [{"age": {"$ne": 35}}]
    });
    group.bench_function("find_operator_scan", |b| {
        b.iter(|| users.find(black_box(&range)))
    });

    group.finish();
}

criterion_group!(benches, bench_writes, bench_reads);
criterion_main!(benches);
