use anyhow::Result;

/// Initialise structured JSON logging. Level controlled via `RUST_LOG`,
/// with `sparkify=info` added on top.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sparkify=info".parse()?),
        )
        .json()
        .init();
    Ok(())
}
