//! Tracing setup for the binary.
//!
//! One formatting layer always writes to stderr (stdout is reserved for
//! command output). A second, non-blocking layer is added when a log file is
//! configured and safe to open. Both share the format picked by `json`.

use anyhow::Result;
use chrono::Local;
use std::fmt;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::{Layer, Layered, SubscriberExt};
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;

use fsops::LogLevel;
use fsops::config::path_has_symlink_ancestor;
use fsops::output as out;
use fsops::platform::open_log_file_secure_append;

type Filtered = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync>;

/// DD/MM/YY HH:MM:SS in local time.
struct LocalStamp;

impl FormatTime for LocalStamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

/// Our levels are one notch chattier than their names suggest: `info`
/// shows debug events and `debug` shows everything.
fn directive(level: &LogLevel) -> &'static str {
    match level {
        LogLevel::Quiet => "error",
        LogLevel::Normal => "info",
        LogLevel::Info => "debug",
        LogLevel::Debug => "trace",
    }
}

fn format_layer<W>(json: bool, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tsfmt::layer()
        .with_timer(LocalStamp)
        .with_level(true)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(writer);
    if json {
        layer.json().boxed()
    } else {
        layer.compact().boxed()
    }
}

/// Open `path` for appending behind a non-blocking writer, or explain on
/// stderr why not. Paths under a symlinked ancestor are refused.
fn open_file_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(false) => {}
        Ok(true) => {
            out::print_warn(&format!(
                "refusing file logging: an ancestor of {} is a symlink",
                path.display()
            ));
            return None;
        }
        Err(e) => {
            out::print_warn(&format!("could not check log path {} for symlinks: {e}", path.display()));
            return None;
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let _ = std::fs::create_dir_all(parent);
    }

    match open_log_file_secure_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            out::print_warn(&format!("failed to open log file {}: {e}", path.display()));
            None
        }
    }
}

/// Install the global subscriber. The returned guard (present only with a
/// file layer) must live until exit so buffered lines get flushed.
pub fn init_tracing(level: &LogLevel, log_file: Option<&Path>, json: bool) -> Result<Option<WorkerGuard>> {
    let mut layers = vec![format_layer(json, std::io::stderr)];
    let mut guard = None;

    if let Some(path) = log_file {
        match open_file_writer(path) {
            Some((writer, g)) => {
                layers.push(format_layer(json, writer));
                guard = Some(g);
            }
            None => out::print_warn(&format!(
                "file logging to '{}' was not enabled; logs continue on stderr only",
                path.display()
            )),
        }
    }

    tracing_subscriber::registry()
        .with(EnvFilter::new(directive(level)))
        .with(layers)
        .try_init()?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_one_step_down() {
        assert_eq!(directive(&LogLevel::Quiet), "error");
        assert_eq!(directive(&LogLevel::Normal), "info");
        assert_eq!(directive(&LogLevel::Info), "debug");
        assert_eq!(directive(&LogLevel::Debug), "trace");
    }
}
