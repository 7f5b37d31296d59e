use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g.
/// `ARGV_READER_LOG=argv_reader::reader=trace`.
pub const LOG_ENV: &str = "ARGV_READER_LOG";

/// Initialize tracing on stderr.
///
/// `ARGV_READER_LOG` wins when set; otherwise the level follows the
/// `-v` count. Stdout stays reserved for command output.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
