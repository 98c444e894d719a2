// Local crates
use crate::helpers::load_config::LoggingConfig;

// External crates
use std::panic;
use tracing::error;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    filter::{Directive, EnvFilter},
    fmt,
    prelude::*,
    registry::Registry,
};

/// Environment variable overriding the configured log filter
pub const LOG_FILTER_ENV: &str = "CF_DRAIN_LOG";

/// Route tracing events to a daily rolling file in the configured log directory.
///
/// The terminal is left to `cf` output and the final diagnostic. The returned guard
/// flushes the non-blocking writer and must live until the process exits.
pub fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(&config.directory) {
        eprintln!(
            "cf-drain: logging disabled, cannot create {}: {}",
            config.directory.display(),
            e
        );
        return None;
    }

    let file_appender = rolling::daily(&config.directory, "cf-drain.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let mut filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    // Span and event noise from the process/runtime machinery is never useful here
    if let Ok(tokio_directive) = "tokio=warn".parse::<Directive>() {
        filter = filter.add_directive(tokio_directive);
    }

    let json_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(non_blocking_writer)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let error_layer = ErrorLayer::default();

    let subscriber = Registry::default()
        .with(filter)
        .with(json_layer)
        .with(error_layer);

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("cf-drain: failed to set global tracing subscriber: {}", e);
        return None;
    }

    Some(guard)
}

pub fn init_panic_handler() {
    panic::set_hook(Box::new(|panic_info| {
        let msg = match panic_info.payload().downcast_ref::<&str>() {
            Some(s) => *s,
            None => match panic_info.payload().downcast_ref::<String>() {
                Some(s) => s.as_str(),
                None => "Unknown panic",
            },
        };

        let location = panic_info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());

        error!(
            message = %msg,
            location = %location,
            "cf-drain panicked!"
        );
        eprintln!("cf-drain panicked at {}: {}", location, msg);
    }));
}
