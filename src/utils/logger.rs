use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins; otherwise only this crate logs, at `level`.
fn crate_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("iron_nation={}", level)))
}

/// Terminal output. Quiet unless `verbose`, since the CLI prints its own results.
pub fn init_cli_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(crate_filter(level))
        .with(fmt::layer().with_target(verbose).without_time().compact())
        .init();
}

/// JSON 格式，方便導入其他工具
pub fn init_json_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(crate_filter(level))
        .with(
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false),
        )
        .init();
}
