use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable overriding the log filter, e.g. `APIGRADE_LOG=apigrade=trace`.
pub const LOG_ENV: &str = "APIGRADE_LOG";

/// Initialize stderr logging. Progress narration is logged at `info`.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("apigrade={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .try_init()?;

    Ok(())
}
