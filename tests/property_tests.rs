//! Property tests for the collection engine: reads are idempotent, versions
//! only move forward by one, and schema violations never reach storage.

use proptest::prelude::*;
use serde_json::{json, Value};
use siam_db::{Collection, FieldType, IdStrategy, Schema};

fn users() -> Collection {
    Collection::new(
        Schema::new()
            .field("name", FieldType::String)
            .field("age", FieldType::Number),
        IdStrategy::AutoIncrement,
    )
}

fn person() -> impl Strategy<Value = Value> {
    ("[a-z]{1,6}", 0i64..100).prop_map(|(name, age)| json!({"name": name, "age": age}))
}

fn filter() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!({})),
        (0i64..100).prop_map(|age| json!({"age": age})),
        (0i64..100).prop_map(|age| json!({"age": {"$gte": age}})),
        (0i64..100, 0i64..100).prop_map(|(lo, hi)| json!({"age": {"$gt": lo, "$lt": hi}})),
        "[a-z]{1,2}".prop_map(|name| json!({"$or": [{"name": name}, {"age": {"$lt": 10}}]})),
        (1usize..20).prop_map(|id| json!({"id": id.to_string()})),
    ]
}

proptest! {
    #[test]
    fn find_is_idempotent(people in prop::collection::vec(person(), 0..20), filter in filter()) {
        let mut users = users();
        for p in people {
            users.create(p).unwrap();
        }

        let first = users.find(&filter);
        let second = users.find(&filter);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn update_bumps_version_by_one(updates in prop::collection::vec(0i64..100, 1..10)) {
        let mut users = users();
        let id = users.create(json!({"name": "Beavis", "age": 20})).unwrap();
        prop_assert_eq!(users.get(&id).unwrap().version, 1);

        for (n, age) in updates.iter().enumerate() {
            let updated = users.update(&json!({"id": id}), json!({"age": age})).unwrap();
            prop_assert_eq!(updated.len(), 1);
            prop_assert_eq!(updated[0].version, n as u64 + 2);
        }
    }

    #[test]
    fn invalid_content_never_mutates(
        people in prop::collection::vec(person(), 1..10),
        bad_age in "[a-z]{1,6}",
    ) {
        let mut users = users();
        for p in people {
            users.create(p).unwrap();
        }
        let before = users.find(&json!({}));

        let mismatch = users.create(json!({"name": "John", "age": bad_age})).unwrap_err();
        prop_assert!(mismatch.is_validation());
        let bad_update = users.update(&json!({"id": "1"}), json!({"age": bad_age})).unwrap_err();
        prop_assert!(bad_update.is_validation());
        let empty = users.create(json!({})).unwrap_err();
        prop_assert!(empty.is_validation());

        let after = users.find(&json!({}));
        prop_assert_eq!(after, before);
    }

    #[test]
    fn schemaless_accepts_any_object(fields in prop::collection::hash_map("[a-z]{1,5}", any::<i32>(), 0..6)) {
        let mut foo = Collection::default();
        let content: serde_json::Map<String, Value> =
            fields.into_iter().map(|(k, v)| (k, json!(v))).collect();
        let id = foo.create(Value::Object(content.clone())).unwrap();
        prop_assert_eq!(foo.get(&id).unwrap().content, content);
    }
}
