//! Tracing subscriber setup for the embedding service.

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `log_level` (e.g. `"info"` or a
/// full filter directive) is used. Call once at process startup.
///
/// # Errors
///
/// Returns an error if `log_level` is not a valid filter directive or a
/// global subscriber is already installed.
pub fn init_tracing(log_level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installs_once_then_refuses_a_second_subscriber() {
        assert!(init_tracing("info").is_ok());
        assert!(init_tracing("debug").is_err());
    }
}
