//! Integration-test glue over the engine's `testkit`.

#![allow(dead_code)]

pub use skinvault_engine::testkit::{Harness, START, randomness};

/// Installs a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// An `items`-item inventory published as batch 1 with treasury floor
/// `floor`, logging to the test writer.
pub fn world(items: usize, floor: u64) -> Harness {
    init_tracing();
    Harness::with_inventory(items, floor)
}
