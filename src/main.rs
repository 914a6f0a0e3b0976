use clap::Parser;

use gator::cli::{default_commands, AppState, Cli, Command};
use gator::config::Config;
use gator::errors::GatorResult;
use gator::logging;
use gator::storage::SqliteStorage;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> GatorResult<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };
    logging::init(cli.verbose);

    // Load configuration
    let config = Config::read()?;

    // Initialize storage
    let storage = SqliteStorage::new(config.database_path())?;
    let mut state = AppState::new(config, storage);

    let commands = default_commands()?;
    commands.dispatch(&mut state, &Command::new(cli.command, cli.args))
}
