use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// How much the importer reports.
///
/// Each level maps onto a tracing filter: per-file summaries are `info`,
/// progress (files read, stats written) is `debug`, cache traffic is `trace`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Deserialize,
    Serialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Silent,
    Errors,
    #[default]
    Complete,
    Info,
    Debug,
}

impl Verbosity {
    pub fn directive(&self) -> &'static str {
        match self {
            Verbosity::Silent => "off",
            Verbosity::Errors => "error",
            Verbosity::Complete => "info",
            Verbosity::Info => "debug",
            Verbosity::Debug => "trace",
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()))
    }
}

/// Initialize console (or file) logging for the CLI.
///
/// - `RUST_LOG` overrides the verbosity when set
/// - Human-readable output on a terminal, flattened JSON otherwise
/// - With `log_file`, events go through a non-blocking appender; keep the
///   returned guard alive until exit so buffered lines are flushed
pub fn init_logging(
    verbosity: Verbosity,
    log_file: Option<&Path>,
) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = verbosity.filter();

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("log file has no file name: {}", path.display()))?;
        std::fs::create_dir_all(dir)?;

        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
        fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .json()
            .flatten_event(true)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(Some(guard));
    }

    if io::stdout().is_terminal() {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
    } else {
        fmt()
            .with_env_filter(filter)
            .json()
            .flatten_event(true)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    Ok(None)
}

/// Run `f` with its events routed into a fresh [`MemoryLog`] instead of a
/// console, for callers that embed the importer and collect its messages
/// afterwards.
///
/// The subscriber is only the default for the duration of `f`, so a host
/// process can do this any number of times.
pub fn with_memory_log<T>(verbosity: Verbosity, f: impl FnOnce() -> T) -> (T, MemoryLog) {
    let log = MemoryLog::default();
    let subscriber =
        tracing_subscriber::registry().with(log.clone().with_filter(verbosity.filter()));

    let out = tracing::subscriber::with_default(subscriber, f);
    (out, log)
}

/// In-memory message log: one line per event, `message key=value ...`.
#[derive(Clone, Default)]
pub struct MemoryLog {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemoryLog {
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Drain everything collected so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<S> Layer<S> for MemoryLog
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let line = visitor.finish();
        if !line.is_empty() {
            self.lock().push(line);
        }
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn finish(self) -> String {
        format!("{}{}", self.message, self.fields).trim().to_string()
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}
