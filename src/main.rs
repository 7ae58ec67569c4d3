use clap::Parser;
use dayline::cli::commands::Cli;
use dayline::cli::{handlers, logging};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose, cli.quiet) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
