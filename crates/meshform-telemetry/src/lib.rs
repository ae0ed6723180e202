//! Logging initialisation shared by meshform provider binaries.
//!
//! Console output is always configured through an environment variable (for example
//! `MESHFORM_LOG=debug`), falling back to `INFO` when the variable is unset or unparsable.
//! File output is opt-in via [`TelemetryOptions::file_log_directory`] and is written as JSON
//! by a rolling appender.
//!
//! ```
//! use meshform_telemetry::{TelemetryOptions, initialize_logging};
//!
//! # fn main() -> Result<(), meshform_telemetry::Error> {
//! initialize_logging("MESHFORM_LOG", "meshform", &TelemetryOptions::default())?;
//! tracing::info!("log a message");
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use snafu::{ResultExt as _, Snafu};
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, filter::Directive, layer::SubscriberExt as _,
    util::{SubscriberInitExt as _, TryInitError},
};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Maximum number of rotated log files kept in the log directory.
const MAX_LOG_FILES: usize = 6;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to initialize rolling file appender"))]
    InitRollingFileAppender { source: InitError },

    #[snafu(display("unable to set the global default subscriber"))]
    SetGlobalDefaultSubscriber { source: TryInitError },
}

/// Logging options, usable as CLI arguments when the `clap` feature is enabled.
#[cfg_attr(feature = "clap", derive(clap::Args))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TelemetryOptions {
    /// Disable console logs.
    #[cfg_attr(feature = "clap", arg(long, env))]
    pub console_log_disabled: bool,

    /// Enable logging to files located in the specified DIRECTORY.
    #[cfg_attr(
        feature = "clap",
        arg(long, env, value_name = "DIRECTORY", group = "file_log")
    )]
    pub file_log_directory: Option<PathBuf>,

    /// Time PERIOD after which log files are rolled over.
    #[cfg_attr(
        feature = "clap",
        arg(long, env, value_name = "PERIOD", requires = "file_log")
    )]
    pub file_log_rotation_period: Option<RotationPeriod>,
}

/// Supported periods when the log file is rolled over.
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Clone, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "PascalCase")]
#[allow(missing_docs)]
pub enum RotationPeriod {
    Minutely,
    Hourly,
    Daily,

    #[default]
    Never,
}

impl From<RotationPeriod> for Rotation {
    fn from(value: RotationPeriod) -> Self {
        match value {
            RotationPeriod::Minutely => Self::MINUTELY,
            RotationPeriod::Hourly => Self::HOURLY,
            RotationPeriod::Daily => Self::DAILY,
            RotationPeriod::Never => Self::NEVER,
        }
    }
}

/// Initializes `tracing` logging with the level filter taken from the environment variable
/// `env`.
///
/// We force callers to provide a variable name so it can differ per provider binary.
/// `app_name` is used as the prefix of rolled log files.
pub fn initialize_logging(env: &str, app_name: &str, options: &TelemetryOptions) -> Result<()> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if !options.console_log_disabled {
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_filter(env_filter_builder(env, LevelFilter::INFO))
                .boxed(),
        );
    }

    if let Some(log_dir) = &options.file_log_directory {
        let rotation = options
            .file_log_rotation_period
            .clone()
            .unwrap_or_default();

        let file_appender = RollingFileAppender::builder()
            .rotation(rotation.into())
            .filename_prefix(app_name)
            .filename_suffix("tracing-rs.json")
            .max_log_files(MAX_LOG_FILES)
            .build(log_dir)
            .context(InitRollingFileAppenderSnafu)?;

        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(file_appender)
                .with_filter(env_filter_builder(env, LevelFilter::INFO))
                .boxed(),
        );
    }

    Registry::default()
        .with(layers)
        .try_init()
        .context(SetGlobalDefaultSubscriberSnafu)?;

    // need to delay logging until after tracing is initialized
    match &options.file_log_directory {
        Some(dir) => tracing::info!(directory = %dir.display(), "file logging enabled"),
        None => tracing::debug!("file logging disabled, because no log directory set"),
    }

    Ok(())
}

fn env_filter_builder(env_var: &str, default_directive: impl Into<Directive>) -> EnvFilter {
    EnvFilter::builder()
        .with_env_var(env_var)
        .with_default_directive(default_directive.into())
        .from_env_lossy()
}
