use std::path::PathBuf;

use colored::Colorize;

use crate::calendar::TargetYear;
use crate::cli::{summary, year_or_current};
use crate::error::Result;
use crate::levels::{find_level, Level};
use crate::report;
use crate::settings::{load_settings, Settings};

pub fn write_report(
    settings: &Settings,
    level: &Level,
    year: TargetYear,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let generated = report::generate(settings, level, year, output)?;

    for sheet in &generated.data.sheets {
        let status = if sheet.is_empty() {
            "skipped (no rows)".dimmed().to_string()
        } else {
            format!("{} rows", sheet.len())
        };
        println!("  {:<24}{status}", sheet.name());
    }
    summary::print(
        &summary::title(
            settings,
            &format!("Resumen {} {}", generated.data.level.name, generated.data.year),
        ),
        &generated.data.summary,
    )?;
    println!(
        "{} {}",
        "Wrote".green().bold(),
        generated.path.display()
    );
    Ok(generated.path)
}

pub fn run(level: &str, year: Option<String>, output: Option<String>) -> Result<()> {
    let settings = load_settings();
    let level = find_level(&settings.levels, level)?;
    let year = year_or_current(year.as_deref())?;
    write_report(&settings, level, year, output.map(PathBuf::from))?;
    Ok(())
}
