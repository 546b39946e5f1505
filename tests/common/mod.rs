#![allow(dead_code)]

use tracing_subscriber::{EnvFilter, FmtSubscriber};
use viewtpl::{Value, Vars};

#[ctor::ctor]
fn init_tests() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Variables from a JSON object literal, keys in written order.
pub fn vars(json: serde_json::Value) -> Vars {
    match Value::from(json) {
        Value::Object(vars) => vars,
        other => panic!("expected an object, got {:?}", other),
    }
}
