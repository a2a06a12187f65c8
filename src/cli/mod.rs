pub mod demo;
pub mod generate;
pub mod init;
pub mod levels;
pub mod menu;
pub mod reconcile;
pub mod summary;

use clap::{Parser, Subcommand};

use crate::calendar::TargetYear;
use crate::error::Result;

/// Parse an optional year argument, falling back to the current year.
pub(crate) fn year_or_current(year: Option<&str>) -> Result<TargetYear> {
    match year {
        Some(y) => TargetYear::parse(y),
        None => TargetYear::new(chrono::Datelike::year(&chrono::Local::now()).into()),
    }
}

#[derive(Parser)]
#[command(
    name = "edubalance",
    about = "Yearly income/expense balance workbooks for school levels.",
    long_about = "Yearly income/expense balance workbooks for school levels.\n\n\
                  Run without a subcommand to pick a level and year interactively."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for edubalance data (default: ~/Documents/edubalance)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Load sample students, fees and expenses for one year.
    Demo {
        /// Year for the sample data (default: current year)
        #[arg(long)]
        year: Option<String>,
    },
    /// List the configured levels.
    Levels,
    /// Write the balance workbook for a level and year.
    Generate {
        /// Level name or number, e.g. 'Primaria' or 2
        #[arg(long)]
        level: String,
        /// Report year: YYYY (default: current year)
        #[arg(long)]
        year: Option<String>,
        /// Output .xlsx path (default: <data_dir>/exports/<level>-<dd-mm-YYYY>-<year>.xlsx)
        #[arg(long)]
        output: Option<String>,
    },
    /// Print the reconciled monthly balance for a level and year.
    Summary {
        /// Level name or number
        #[arg(long)]
        level: String,
        /// Report year: YYYY (default: current year)
        #[arg(long)]
        year: Option<String>,
    },
    /// Reconcile two CSV files of monthly totals (columns: year,month,amount).
    Reconcile {
        /// Report year: YYYY
        #[arg(long)]
        year: String,
        /// Monthly income CSV
        #[arg(long)]
        income: String,
        /// Monthly expense CSV
        #[arg(long)]
        expense: String,
    },
}
