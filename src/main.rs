use clap::Parser;
use taskboard::cli::commands::Cli;
use taskboard::cli::handlers;
use taskboard::logging::{LogConfig, init_logging};

fn main() {
    let cli = Cli::parse();

    // A subscriber may already be installed when embedded; keep going without ours
    let _ = init_logging(&LogConfig::from_verbosity(cli.verbose));

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
