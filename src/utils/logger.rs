use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Console output shape. `Json` emits one event per line for log shippers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "horo_scan=debug,info"
    } else {
        "horo_scan=info"
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
/// A second call leaves the first subscriber in place.
pub fn init_logger(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Compact => registry
            .with(fmt::layer().with_target(false).compact())
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_target(false).json().flatten_event(true))
            .try_init(),
    };

    if let Err(e) = installed {
        tracing::debug!("Logger already installed: {}", e);
    }
}
