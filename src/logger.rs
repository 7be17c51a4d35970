use env_logger::Builder;
use log::info;
use std::env;
use std::io::Write;

/// Installs the colored `[time] LEVEL [file:line] message` logger.
///
/// `default_filter` (from `LOG_LEVEL`) applies first; `RUST_LOG` overrides it.
pub fn setup_logger(default_filter: &str) {
    let mut builder = Builder::new();
    builder.parse_filters(default_filter);
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    builder.format(|buf, record| {
        let level_color = match record.level() {
            log::Level::Error => "\x1B[1;31m", // Bold Red
            log::Level::Warn => "\x1B[1;33m",  // Bold Yellow
            log::Level::Info => "\x1B[1;32m",  // Bold Green
            log::Level::Debug => "\x1B[1;36m", // Bold Cyan
            log::Level::Trace => "\x1B[1;35m", // Bold Magenta
        };
        let reset = "\x1B[0m";

        writeln!(
            buf,
            "[{}] {}{}{} [{}:{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            level_color,
            record.level(),
            reset,
            record.file().unwrap_or("unknown"),
            record.line().unwrap_or(0),
            record.args()
        )
    });

    if builder.try_init().is_ok() {
        info!("Logger initialized with filter '{}'", default_filter);
    }
}
