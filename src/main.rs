use std::env;

use resonance::cli::run_with_args;
use resonance::config::{AppConfig, DEFAULT_LOG_FILTER};

fn main() {
    let config = AppConfig::from_env();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    std::process::exit(run_with_args(&args));
}
