//! Logging config and utilities
//!
//! This module is only used by the main binary and provides logging config structures and setup
//! helper functions

mod defaults;
mod format_style;
mod log_rotation_kind;
mod parsers;

use format_style::FormatStyle;
use log_rotation_kind::LogRotationKind;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Layer as LayerTrait, Registry};

/// Prefix for log files written to `logging.path`
const LOG_FILE_PREFIX: &str = "shopify_mcp_server";

/// Logging related options
#[derive(Debug, Deserialize)]
pub struct Logging {
    /// The log level to use for tracing
    #[serde(
        default = "defaults::log_level",
        deserialize_with = "parsers::from_str"
    )]
    pub level: Level,

    /// Directory to write log files to instead of stderr
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Log file rotation period to use when log file path provided
    /// [default: Hourly]
    #[serde(default = "defaults::default_rotation")]
    pub rotation: LogRotationKind,

    #[serde(default)]
    pub format: FormatStyle,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            path: None,
            rotation: defaults::default_rotation(),
            format: Default::default(),
        }
    }
}

type LoggingLayerResult = (
    Box<dyn LayerTrait<Registry> + Send + Sync>,
    Option<WorkerGuard>,
);

pub struct LoggingLayerBuilder {
    writer: Option<BoxMakeWriter>,
    worker_guard: Option<WorkerGuard>,
    ansi_enabled: bool,
}

impl LoggingLayerBuilder {
    pub fn new() -> Self {
        Self {
            writer: None,
            worker_guard: None,
            ansi_enabled: false,
        }
    }

    // Used by unit tests to inject a writer. Without one, build() derives it and its ANSI
    // setting from the config.
    #[allow(dead_code)]
    pub fn with_writer<W>(mut self, mw: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.writer = Some(BoxMakeWriter::new(mw));
        self
    }

    #[allow(dead_code)]
    pub fn with_ansi_enabled(mut self, enabled: bool) -> Self {
        self.ansi_enabled = enabled;
        self
    }

    pub fn build(mut self, logging: &Logging) -> Result<LoggingLayerResult, anyhow::Error> {
        if self.writer.is_none() {
            let (writer, guard, with_ansi) = self.build_writer(logging);
            self.writer = Some(writer);
            self.worker_guard = guard;
            self.ansi_enabled = with_ansi;
        }

        let Some(writer) = self.writer else {
            return Err(anyhow::Error::msg("No log writer set"));
        };

        let layer = tracing_subscriber::fmt::layer();
        let formatted_layer = match logging.format {
            FormatStyle::Full => layer
                .with_writer(writer)
                .with_ansi(self.ansi_enabled)
                .with_target(false)
                .boxed(),
            FormatStyle::Compact => layer
                .compact()
                .with_writer(writer)
                .with_ansi(self.ansi_enabled)
                .with_target(false)
                .boxed(),
            FormatStyle::Json => layer
                .json()
                .with_writer(writer)
                .with_ansi(self.ansi_enabled)
                .with_target(false)
                .boxed(),
            FormatStyle::Pretty => layer
                .pretty()
                .with_writer(writer)
                .with_ansi(self.ansi_enabled)
                .with_target(false)
                .boxed(),
        };

        Ok((formatted_layer, self.worker_guard))
    }

    /// stdout carries the MCP protocol, so logs only ever go to stderr or files.
    /// Colors are used on stderr and never in files.
    fn build_writer(&self, logging: &Logging) -> (BoxMakeWriter, Option<WorkerGuard>, bool) {
        macro_rules! log_error {
            () => {
                |e| eprintln!("Failed to setup logging: {e:?}")
            };
        }

        match logging.path.clone() {
            Some(path) => std::fs::create_dir_all(&path)
                .map(|_| path)
                .inspect_err(log_error!())
                .ok()
                .and_then(|path| {
                    RollingFileAppender::builder()
                        .rotation(logging.rotation.clone().into())
                        .filename_prefix(LOG_FILE_PREFIX)
                        .filename_suffix("log")
                        .build(path)
                        .inspect_err(log_error!())
                        .ok()
                })
                .map(|appender| {
                    let (non_blocking_appender, guard) = tracing_appender::non_blocking(appender);
                    (BoxMakeWriter::new(non_blocking_appender), Some(guard), false)
                })
                .unwrap_or_else(|| {
                    eprintln!("Log file setup failed - falling back to stderr");
                    (BoxMakeWriter::new(std::io::stderr), None, true)
                }),
            None => (BoxMakeWriter::new(std::io::stderr), None, true),
        }
    }
}

impl Logging {
    pub fn env_filter(logging: &Logging) -> Result<EnvFilter, anyhow::Error> {
        let mut env_filter = EnvFilter::from_default_env().add_directive(logging.level.into());

        if logging.level == Level::INFO {
            env_filter = env_filter
                .add_directive("rmcp=warn".parse()?)
                .add_directive("reqwest=warn".parse()?);
        }
        Ok(env_filter)
    }
}
