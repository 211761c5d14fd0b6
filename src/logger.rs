use chrono::Local;
use fern::Dispatch;
use log::LevelFilter;
use std::fs;
use std::sync::Once;

const LOG_FILE: &str = "planner.log";

static INIT: Once = Once::new();

/// Initializes the global logger.
///
/// Log level is taken from `level` unless the `RUST_LOG` environment variable
/// is set, in which case `RUST_LOG` wins. Unparsable levels fall back to `info`.
/// Logs go to stderr (colored) and to `<log_dir>/planner.log`.
///
/// Only the first call has an effect, so tests may call this freely.
pub fn init(level: &str, log_dir: &str) {
    INIT.call_once(|| apply(level, log_dir));
}

fn apply(level: &str, log_dir: &str) {
    if let Err(e) = fs::create_dir_all(log_dir) {
        eprintln!("Failed to create log directory at '{}': {}", log_dir, e);
    }

    let log_file_path = format!("{}/{}", log_dir, LOG_FILE);

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());
    let log_level_filter = log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);

    let base_config = Dispatch::new().level(log_level_filter).level_for("serde", LevelFilter::Warn);

    let console_config = Dispatch::new()
        .format(|out, message, record| {
            let colors = fern::colors::ColoredLevelConfig::new()
                .error(fern::colors::Color::Red)
                .warn(fern::colors::Color::Yellow)
                .info(fern::colors::Color::Green)
                .debug(fern::colors::Color::Blue)
                .trace(fern::colors::Color::BrightBlack);

            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut dispatch = base_config.chain(console_config);

    match fern::log_file(&log_file_path) {
        Ok(file) => {
            let file_config = Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!("[{} {} {}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), record.level(), record.target(), message))
                })
                .chain(file);
            dispatch = dispatch.chain(file_config);
        }
        Err(e) => eprintln!("Failed to open log file '{}': {}", log_file_path, e),
    }

    // Another logger may already be installed (e.g. by an embedding binary).
    if let Err(e) = dispatch.apply() {
        eprintln!("Failed to apply logger configuration: {}", e);
        return;
    }

    log::info!("Logger initialized. Logging to console and '{}'.", log_file_path);
}
