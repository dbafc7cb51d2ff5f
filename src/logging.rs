use crate::error::{InfraError, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt,
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// How a binary wants its tracing output
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Filter used when RUST_LOG is unset, e.g. `infra_manager=warn`
    pub default_directive: String,
    /// json, pretty or compact
    pub format: Option<String>,
    /// Include thread ids, files and line numbers
    pub verbose_source: bool,
    /// Also write combined.log and error.log into this directory
    pub file_dir: Option<PathBuf>,
}

/// Install the global subscriber.
///
/// Keep the returned guards alive until exit, otherwise buffered file logs are lost.
pub fn init_logging(options: &LogOptions) -> Result<Vec<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.default_directive));

    let debug = options.verbose_source;
    let console_layer: BoxedLayer = match options.format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(debug)
            .with_file(debug)
            .with_line_number(debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(debug)
                .with_file(debug)
                .with_line_number(debug)
                .boxed()
        }
    };

    let mut layers = vec![console_layer];
    let mut guards = Vec::new();

    if let Some(dir) = &options.file_dir {
        let (combined, combined_guard) =
            tracing_appender::non_blocking(file_appender(dir, "combined")?);
        let (errors, errors_guard) =
            tracing_appender::non_blocking(file_appender(dir, "error")?);

        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(combined)
                .boxed(),
        );
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(errors)
                .with_filter(LevelFilter::ERROR)
                .boxed(),
        );
        guards.push(combined_guard);
        guards.push(errors_guard);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(|e| InfraError::system(format!("Failed to initialize logging: {}", e)))?;

    Ok(guards)
}

fn file_appender(dir: &Path, name: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .filename_suffix("log")
        .build(dir)
        .map_err(|e| {
            InfraError::system(format!(
                "Failed to open {}.log in {}: {}",
                name,
                dir.display(),
                e
            ))
        })
}
