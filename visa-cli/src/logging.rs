//! Log output for the CLI.
//!
//! Logs go to stderr so stdout carries nothing but reports. Everything is
//! decided from the command line before the first event, so the subscriber
//! is built once and never reconfigured.

use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::{self, FmtContext};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging switches from the command line.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// A bare level or any `RUST_LOG` directive. `None` falls back to
    /// `RUST_LOG`, then `info`.
    pub level: Option<String>,
    /// Append a copy of every log line to this file.
    pub file: Option<PathBuf>,
    /// Drop the stderr output. The log file, if any, is unaffected.
    pub quiet: bool,
}

/// `HH:MM:SS LEVEL target: fields`, with the level coloured on a terminal.
struct LogLine;

impl<S, N> FormatEvent<S, N> for LogLine
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let level = *meta.level();
        let colour = match level {
            Level::ERROR => "31",
            Level::WARN => "33",
            Level::INFO => "32",
            Level::DEBUG => "34",
            Level::TRACE => "35",
        };
        let time = Local::now().format("%H:%M:%S");

        if writer.has_ansi_escapes() {
            write!(writer, "\x1b[2m{time}\x1b[0m \x1b[{colour}m{level:>5}\x1b[0m ")?;
        } else {
            write!(writer, "{time} {level:>5} ")?;
        }
        write!(writer, "{}: ", meta.target())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Parses the level option, or reads `RUST_LOG` when it is absent.
pub fn build_filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log level '{directives}'")),
        None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))),
    }
}

fn console_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .event_format(LogLine)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
}

fn file_layer<S>(path: &Path) -> Result<impl Layer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;
    Ok(fmt::layer()
        .event_format(LogLine)
        .with_ansi(false)
        .with_writer(Mutex::new(file)))
}

/// Installs the global subscriber. Call once, before the first log line.
pub fn init(options: &LogOptions) -> Result<()> {
    let filter = build_filter(options.level.as_deref())?;
    let console = (!options.quiet).then(console_layer);
    let file = match &options.file {
        Some(path) => Some(file_layer(path)?),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .context("logging already initialised")
}
