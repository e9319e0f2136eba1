//! apppage CLI: drive a mobile app through its page object
//!
//! ## Usage
//!
//! ```bash
//! apppage smoke                                  # open then close the calculator
//! apppage -c suite.yaml open --dialect legacy    # Appium 1 server
//! apppage close --session-id 4f1c...             # reuse a session someone else owns
//! apppage config                                 # print the resolved configuration
//! ```

use apppage_cli::{logging, render_config, Action, Cli, CliConfig, CliResult, SessionRunner};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli)?;
    logging::init(config.verbosity);

    let Some(action) = Action::from_command(cli.command) else {
        print!("{}", render_config(&config)?);
        return Ok(());
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(SessionRunner::new(config).run(action))
}
