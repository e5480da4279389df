use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use serde_json::json;
use zodkit::prelude::*;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn schemas_are_send_and_sync() {
    assert_send_sync::<ZString>();
    assert_send_sync::<ZObject>();
    assert_send_sync::<ZUnion>();
    assert_send_sync::<ZLazy>();
    assert_send_sync::<SchemaRef>();
    assert_send_sync::<ZodError>();
}

#[test]
fn concurrent_parses_share_one_schema() {
    let schema = Arc::new(
        zodkit::object()
            .field("id", zodkit::int().positive())
            .field("name", zodkit::string().min(1).trim()),
    );

    let handles: Vec<_> = (0..8i64)
        .map(|t| {
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                for i in 0..200i64 {
                    let id = t * 1000 + i + 1;
                    let out = schema
                        .parse(&json!({"id": id, "name": format!(" user{} ", id)}))
                        .unwrap();
                    assert_eq!(out.get("id"), Some(&Value::Int(id)));
                    assert_eq!(out.get("name"), Some(&Value::from(format!("user{}", id))));
                    assert!(schema.parse(&json!({"id": -id, "name": ""})).is_err());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn lazy_getter_runs_once_under_contention() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let schema = zodkit::lazy(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        zodkit::slice(zodkit::int())
    });
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let schema = schema.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                schema.parse(&json!([1, 2, 3])).is_ok()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_registry_writes() {
    let schemas: Vec<_> = (0..16).map(|_| zodkit::string()).collect();
    let handles: Vec<_> = schemas
        .into_iter()
        .enumerate()
        .map(|(i, schema)| {
            thread::spawn(move || {
                let described = schema.describe(format!("schema {}", i));
                assert_eq!(described.description(), Some(format!("schema {}", i)));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
