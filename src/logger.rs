use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{self, Write};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
};

struct NotifierLogger;

static LOGGER: NotifierLogger = NotifierLogger;
static LOGGING_ENABLED: std::sync::LazyLock<Mutex<bool>> =
    std::sync::LazyLock::new(|| Mutex::new(false));
static LOG_FILE: std::sync::LazyLock<Mutex<Option<std::fs::File>>> =
    std::sync::LazyLock::new(|| Mutex::new(None));
static LOG_TO_STDERR: std::sync::LazyLock<Mutex<bool>> =
    std::sync::LazyLock::new(|| Mutex::new(false));
static VERBOSE_LOGGING: std::sync::LazyLock<Mutex<bool>> =
    std::sync::LazyLock::new(|| Mutex::new(false));

/// Routes tracing output into the log file, if one is configured
#[derive(Clone)]
struct FileWriter;

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(file) = LOG_FILE.lock().as_mut() {
            let _ = file.write_all(buf);
            let _ = file.flush();
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(file) = LOG_FILE.lock().as_mut() {
            let _ = file.flush();
        }
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for FileWriter {
    type Writer = FileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriter
    }
}

/// Targets that flood the log with connection chatter unless verbose logging is on
fn is_noisy_target(target: &str) -> bool {
    ["reqwest", "hyper", "h2", "rustls", "want", "mio", "tokio_retry"]
        .iter()
        .any(|prefix| target.starts_with(prefix))
}

impl log::Log for NotifierLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let ours = metadata.target().starts_with("ci_notifier");

        // Warnings and errors from this crate always surface
        if ours && metadata.level() <= Level::Warn {
            return true;
        }

        if !is_logging_enabled() {
            return false;
        }

        if ours {
            return metadata.level() <= Level::Debug;
        }

        if !*VERBOSE_LOGGING.lock() && is_noisy_target(metadata.target()) {
            return false;
        }

        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let message = format!(
                "{} {} [{}] - {}\n",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            );

            if let Some(file) = LOG_FILE.lock().as_mut() {
                let _ = file.write_all(message.as_bytes());
                let _ = file.flush();
            }

            // CI logs capture stderr; stdout stays clean for piping
            if *LOG_TO_STDERR.lock() || record.level() <= Level::Warn {
                eprint!("{message}");
            }
        }
    }

    fn flush(&self) {}
}

/// Initialize the `log` facade and the tracing subscriber.
///
/// `log` records go to [`NotifierLogger`]; tracing events from dependencies
/// go to the log file. Safe to call more than once; only the first call
/// installs anything.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    use std::sync::{Once, OnceLock};
    static INIT: Once = Once::new();
    static INIT_RESULT: OnceLock<Result<(), String>> = OnceLock::new();

    INIT.call_once(|| {
        let verbose_from_env = std::env::var("CI_NOTIFIER_VERBOSE").is_ok()
            || std::env::var("RUST_LOG").is_ok_and(|v| v.contains("debug") || v.contains("trace"));

        if verbose_from_env {
            set_verbose_logging(true);
            enable_logging();
            set_log_to_stderr(true);
        }

        // Claim the `log` facade before tracing can bridge it
        let log_result = log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Debug));

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "ci_notifier=debug,warn".into());

        let fmt_layer = fmt::Layer::new()
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::ChronoUtc::rfc_3339())
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(FileWriter);

        // `set_global_default` leaves the `log` facade alone, unlike `try_init`
        let subscriber = Registry::default().with(env_filter).with(fmt_layer);
        let tracing_result = tracing::subscriber::set_global_default(subscriber);

        let result = match (log_result, tracing_result) {
            (Ok(()), Ok(())) => Ok(()),
            (Ok(()), Err(tracing_err)) => {
                eprintln!("Note: Using log-only logging (tracing setup failed: {tracing_err})");
                Ok(())
            }
            (Err(log_err), _) => Err(format!("Failed to install the log backend: {log_err}")),
        };

        let _ = INIT_RESULT.set(result);
    });

    match INIT_RESULT.get() {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => Err(e.clone().into()),
        None => Err("Initialization failed unexpectedly".into()),
    }
}

pub fn enable_logging() {
    *LOGGING_ENABLED.lock() = true;
}

pub fn is_logging_enabled() -> bool {
    *LOGGING_ENABLED.lock()
}

pub fn set_verbose_logging(enabled: bool) {
    *VERBOSE_LOGGING.lock() = enabled;
}

pub fn set_log_file(file_path: &str) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file_path)?;

    *LOG_FILE.lock() = Some(file);
    Ok(())
}

pub fn set_log_to_stderr(enabled: bool) {
    *LOG_TO_STDERR.lock() = enabled;
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_client_targets_are_noisy() {
        assert!(is_noisy_target("reqwest::connect"));
        assert!(is_noisy_target("hyper_util::client"));
        assert!(!is_noisy_target("ci_notifier::coordinator"));
    }

    #[test]
    fn own_warnings_pass_while_debug_waits_for_enable() {
        use log::{Log, MetadataBuilder};

        let warn = MetadataBuilder::new()
            .target("ci_notifier::range")
            .level(Level::Warn)
            .build();
        let foreign_warn = MetadataBuilder::new()
            .target("hyper_util::client")
            .level(Level::Warn)
            .build();
        assert!(LOGGER.enabled(&warn));
        if !is_logging_enabled() {
            assert!(!LOGGER.enabled(&foreign_warn));
        }

        enable_logging();
        let debug = MetadataBuilder::new()
            .target("ci_notifier::range")
            .level(Level::Debug)
            .build();
        assert!(LOGGER.enabled(&debug));
    }
}
