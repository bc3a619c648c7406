use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::LoggingConfig;

/// Initialize structured logging.
///
/// RUST_LOG wins when set; otherwise `logging.level` is the default directive.
/// Logs go to stderr so stdout carries only the rendered description.
pub fn init_telemetry(logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)?,
    };

    if logging.json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init()?;
    }

    tracing::debug!(json = logging.json, "Launcher telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for one description build
pub fn generate_launch_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping a single description build
pub fn create_launch_span(launch_id: &str, node_name: Option<&str>) -> tracing::Span {
    tracing::info_span!(
        "launch_description",
        launch.id = launch_id,
        node.name = node_name,
        otel.kind = "internal"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_ids_are_unique() {
        let a = generate_launch_id();
        let b = generate_launch_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }
}
