use std::io;
use std::process::ExitCode;

use clap::Parser;

use digestive::cli::Cli;
use digestive::{logging, Config};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Control log level with -v or the RUST_LOG env var:
    //   RUST_LOG=digestive::engine=trace digestive -m disk.dd
    logging::init(cli.verbose, cli.quiet);

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("digestive: {}", err);
            return ExitCode::from(2);
        }
    };

    let mut stdout = io::stdout().lock();
    match digestive::run(&config, &mut stdout) {
        Ok(summary) => ExitCode::from(summary.exit_code()),
        Err(err) => {
            eprintln!("digestive: {}", err);
            ExitCode::from(if err.is_config() { 2 } else { 1 })
        }
    }
}
