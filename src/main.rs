use clap::Parser;
use std::{io, process};
use tracing::info;

mod cli;
mod error;
mod menu;
mod prompt;
mod records;
mod roster;
mod student;

use cli::{setup_logging, Args};
use menu::Menu;
use records::SaveMode;
use roster::Roster;

fn main() {
    let args = Args::parse();
    setup_logging(args.log_level());

    if let Err(err) = run(&args) {
        tracing::error!("{}", err);
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: &Args) -> error::Result<()> {
    let config = args.to_config()?;
    let mut roster = Roster::new(&config.file, config.save_mode);

    // A file that cannot be read still leaves a usable, empty session.
    match roster.load(config.load_policy) {
        Ok(count) => info!("Loaded {} students from {}", count, config.file.display()),
        Err(err) => {
            if err.is_parse_error() {
                println!("An error occurred while parsing the file: {err}");
            } else {
                println!("An error occurred while reading the file: {err}");
            }
            if config.save_mode == SaveMode::Overwrite {
                println!(
                    "{} will not be overwritten this session; use --append or --skip-malformed to keep changes.",
                    config.file.display()
                );
            }
        }
    }

    let stdin = io::stdin();
    let mut menu = Menu::new(roster, stdin.lock(), io::stdout());
    menu.run()
}
