use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level set through Lambda's advanced logging controls.
pub const LAMBDA_LOG_LEVEL_VAR: &str = "AWS_LAMBDA_LOG_LEVEL";

const CRATE_TARGET: &str = "myth_relay";

/// Directive used when `RUST_LOG` is absent. `level` is an optional
/// override such as Lambda's `DEBUG`/`WARN`; unknown values are ignored.
pub fn default_directive(verbose: bool, level: Option<&str>) -> String {
    let crate_level = level
        .map(|level| level.trim().to_ascii_lowercase())
        .filter(|level| matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error"))
        .unwrap_or_else(|| if verbose { "debug" } else { "info" }.to_string());

    if verbose {
        format!("{}={},info", CRATE_TARGET, crate_level)
    } else {
        format!("{}={}", CRATE_TARGET, crate_level)
    }
}

fn filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, level)))
}

/// Human-readable lines on stderr, so the Verdict printed on stdout stays
/// pipeable.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(filter(verbose, None))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .compact(),
        )
        .init();
}

/// One JSON object per line. The Lambda platform stamps each line itself.
pub fn init_lambda_logger() {
    let level = std::env::var(LAMBDA_LOG_LEVEL_VAR).ok();

    tracing_subscriber::registry()
        .with(filter(false, level.as_deref()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .json()
                .flatten_event(true)
                .with_current_span(false),
        )
        .init();
}
