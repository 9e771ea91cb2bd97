use clap::Parser;

use storepulse::args::Args;
use storepulse::logging::{init_logger, level_for};
use storepulse::CliApp;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logger(level_for(args.verbose, args.quiet));

    let mut app = CliApp::new(args);
    let outcome = match app.initialize() {
        Ok(()) => app.run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
