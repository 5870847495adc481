use std::{process::ExitCode, rc::Rc};

use clap::Parser;
use console::style;
use log::{debug, info};

use stickies::{App, Board, Cli, Config, FileStore, Result};

fn initialize_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let store = FileStore::open(&config.data_dir)?;
    let board = Board::open(Rc::new(store));

    let mut app = App::new(board, config, config_path);
    app.run(cli.command)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    info!("Application starting up");
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Command failed: {:?}", e);
            eprintln!("{} {}", style("warning:").for_stderr().yellow().bold(), e);
            ExitCode::FAILURE
        }
    }
}
