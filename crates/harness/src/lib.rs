pub mod host;
pub mod workflow;

pub use host::TestHost;
pub use workflow::{Reply, SimulatedWorkflow};

/// Install a fmt subscriber filtered by `RUST_LOG`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
