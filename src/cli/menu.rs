use chrono::Datelike;
use dialoguer::{Input, Select};

use crate::calendar::TargetYear;
use crate::cli::generate::write_report;
use crate::error::{ReportError, Result};
use crate::settings::load_settings;

/// Interactive run: pick a level, pick a year, write the workbook.
pub fn run() -> Result<()> {
    let settings = load_settings();
    if settings.levels.is_empty() {
        return Err(ReportError::Settings("no levels configured".to_string()));
    }

    let items: Vec<String> = settings
        .levels
        .iter()
        .map(|l| format!("{}. {}", l.id, l.name))
        .collect();
    let choice = Select::new()
        .with_prompt("Select the level")
        .items(&items)
        .default(0)
        .interact()?;
    let level = &settings.levels[choice];

    let current_year = chrono::Local::now().year();
    let input: String = Input::new()
        .with_prompt("Year")
        .default(current_year.to_string())
        .validate_with(|s: &String| -> std::result::Result<(), String> {
            TargetYear::parse(s).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;
    let year = TargetYear::parse(&input)?;

    write_report(&settings, level, year, None)?;
    Ok(())
}
