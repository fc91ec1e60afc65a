/// Logging setup shared by both binaries
///
/// `RUST_LOG` refines the filter; INFO is always enabled.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();
}
