use std::env;
use std::error::Error;
use tracing_subscriber::EnvFilter;

/// Application entry point: sets up error reporting and logging, then
/// hands the arguments to the CLI dispatcher.
fn main() -> Result<(), Box<dyn Error>> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    snipkeep::cli::execute_cli(&args)
}
