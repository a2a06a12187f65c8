mod calendar;
mod charts;
mod cli;
mod db;
mod error;
mod fmt;
mod levels;
mod logging;
mod queries;
mod reconciler;
mod report;
mod settings;
mod table;
mod workbook;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    logging::init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        None => cli::menu::run(),
        Some(Commands::Init { data_dir }) => cli::init::run(data_dir),
        Some(Commands::Demo { year }) => cli::demo::run(year),
        Some(Commands::Levels) => cli::levels::run(),
        Some(Commands::Generate {
            level,
            year,
            output,
        }) => cli::generate::run(&level, year, output),
        Some(Commands::Summary { level, year }) => cli::summary::run(&level, year),
        Some(Commands::Reconcile {
            year,
            income,
            expense,
        }) => cli::reconcile::run(&year, &income, &expense),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
