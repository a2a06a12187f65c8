use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::year_or_current;
use crate::error::Result;
use crate::fmt::money;
use crate::levels::find_level;
use crate::reconciler::ReconciledTable;
use crate::report::{open_database, ReportData};
use crate::settings::{load_settings, Settings};

fn amount_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Heading for a printed summary, prefixed by the institution when one is set.
pub fn title(settings: &Settings, label: &str) -> String {
    match settings.institution_name.trim() {
        "" => label.to_string(),
        name => format!("{name}: {label}"),
    }
}

/// Render a reconciled year as a terminal table with a totals row.
pub fn render(summary: &ReconciledTable) -> Result<String> {
    let mut table = Table::new();
    table.set_header(vec!["Month", "Income", "Expense", "Balance"]);
    for r in summary.rows() {
        let balance = if r.balance.is_sign_negative() && !r.balance.is_zero() {
            money(r.balance).red().to_string()
        } else {
            money(r.balance)
        };
        table.add_row(vec![
            Cell::new(r.month_name),
            amount_cell(money(r.income)),
            amount_cell(money(r.expense)),
            amount_cell(balance),
        ]);
    }

    let totals = summary.totals()?;
    let net = if totals.balance.is_sign_negative() && !totals.balance.is_zero() {
        money(totals.balance).red().bold().to_string()
    } else {
        money(totals.balance).green().bold().to_string()
    };
    table.add_row(vec![
        Cell::new("Total".bold()),
        amount_cell(money(totals.income)),
        amount_cell(money(totals.expense)),
        amount_cell(net),
    ]);
    Ok(table.to_string())
}

pub fn print(title: &str, summary: &ReconciledTable) -> Result<()> {
    println!("{title}\n{}", render(summary)?);
    if summary.is_empty_input() {
        println!(
            "{}",
            format!("No income or expense recorded for {}.", summary.year()).yellow()
        );
    }
    Ok(())
}

pub fn run(level: &str, year: Option<String>) -> Result<()> {
    let settings = load_settings();
    let level = find_level(&settings.levels, level)?;
    let year = year_or_current(year.as_deref())?;

    let data = {
        let conn = open_database(&settings)?;
        ReportData::collect(&conn, level, year, &settings.month_names())?
    };
    print(
        &title(&settings, &format!("Balance {} {year}", level.name)),
        &data.summary,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{MonthNames, TargetYear};
    use crate::reconciler::{AggregateRow, Reconciler};
    use rust_decimal_macros::dec;

    #[test]
    fn test_render_lists_months_and_totals() {
        colored::control::set_override(false);
        let summary = Reconciler::new(&MonthNames::SPANISH)
            .reconcile(
                TargetYear::new(2024).unwrap(),
                &[AggregateRow::new(2024, 3, dec!(1500.50))],
                &[AggregateRow::new(2024, 7, dec!(100))],
            )
            .unwrap();
        let out = render(&summary).unwrap();
        assert!(out.contains("Marzo"));
        assert!(out.contains("Diciembre"));
        assert!(out.contains("$1,500.50"));
        assert!(out.contains("-$100.00"));
        assert!(out.contains("$1,400.50"));
    }

    #[test]
    fn test_title_includes_institution() {
        let mut settings = Settings::default();
        assert_eq!(title(&settings, "Balance 2024"), "Balance 2024");
        settings.institution_name = "Colegio San Martín".to_string();
        assert_eq!(
            title(&settings, "Balance 2024"),
            "Colegio San Martín: Balance 2024"
        );
    }
}
