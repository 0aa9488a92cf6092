use std::io::Write;

use env_logger::Env;

/// Install the process-wide logger. `RUST_LOG` overrides the default `info` filter.
pub fn init() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .try_init();
}

/// Log an error together with the chain of its sources.
pub fn log_error(prefix: &str, e: &dyn std::error::Error) {
    let mut line = format!("{}: {}", prefix, e);
    let mut source = e.source();
    while let Some(cause) = source {
        line.push_str(&format!(" (caused by: {})", cause));
        source = cause.source();
    }
    log::error!("{}", line);
}
