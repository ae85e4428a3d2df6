use tracing_subscriber::EnvFilter;

mod command;
mod util;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "SIGMA_TASTE_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    command::run()
}
