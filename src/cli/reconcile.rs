use std::path::Path;

use crate::calendar::TargetYear;
use crate::cli::summary;
use crate::error::Result;
use crate::reconciler::{parse_rows, AggregateRow, RawAggregate, Reconciler, Series};
use crate::settings::load_settings;

/// Read a `year,month,amount` CSV. Values stay text until [`parse_rows`].
pub fn read_aggregates(path: &Path, series: Series) -> Result<Vec<AggregateRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;
    let raw = reader
        .deserialize::<RawAggregate>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    parse_rows(series, &raw)
}

pub fn run(year: &str, income: &str, expense: &str) -> Result<()> {
    let year = TargetYear::parse(year)?;
    let income = read_aggregates(Path::new(income), Series::Income)?;
    let expense = read_aggregates(Path::new(expense), Series::Expense)?;

    let settings = load_settings();
    let table = Reconciler::new(&settings.month_names()).reconcile(year, &income, &expense)?;
    summary::print(&summary::title(&settings, &format!("Balance {year}")), &table)
}
