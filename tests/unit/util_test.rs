//! Tests for telemetry helpers

use konofan_pipeline::util::{init_tracing, init_tracing_with};

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing_with("debug");
    tracing::info!("subscriber installed once");
}
