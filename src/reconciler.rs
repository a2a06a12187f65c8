//! Monthly reconciliation of income against expense.
//!
//! Both inputs are sparse: a month with no activity has no row at all. The
//! reconciler lays each series over the calendar scaffold, fills the gaps
//! with zero and merges them into one 12-row table. All arithmetic stays in
//! [`Decimal`]; conversion to floats happens only at the spreadsheet edge.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::calendar::{CalendarScaffold, MonthNames, TargetYear};
use crate::error::{ReportError, Result};
use crate::table::{Cell, Table};

pub const SUMMARY_SHEET: &str = "Resumen";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Income,
    Expense,
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Series::Income => write!(f, "income"),
            Series::Expense => write!(f, "expense"),
        }
    }
}

/// One (year, month, amount) observation from a monthly summary query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRow {
    pub year: i32,
    pub month: u32,
    pub amount: Decimal,
}

impl AggregateRow {
    pub fn new(year: i32, month: u32, amount: Decimal) -> Self {
        Self {
            year,
            month,
            amount,
        }
    }
}

/// Untyped aggregate as read from a CSV file or other text source. Blank or
/// absent fields are `None` and rejected by [`RawAggregate::parse`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAggregate {
    pub year: Option<String>,
    pub month: Option<String>,
    pub amount: Option<String>,
}

impl RawAggregate {
    pub fn parse(&self, series: Series, index: usize) -> Result<AggregateRow> {
        let invalid = |reason: String| ReportError::InvalidAggregateRow {
            series: series.to_string(),
            index,
            reason,
        };
        let year = required(&self.year).ok_or_else(|| invalid("missing year".into()))?;
        let month = required(&self.month).ok_or_else(|| invalid("missing month".into()))?;
        let amount = required(&self.amount).ok_or_else(|| invalid("missing amount".into()))?;

        let year: i32 = year
            .parse()
            .map_err(|_| invalid(format!("year {year:?} is not an integer")))?;
        let month: u32 = month
            .parse()
            .map_err(|_| invalid(format!("month {month:?} is not an integer")))?;
        if !(1..=12).contains(&month) {
            return Err(invalid(format!("month {month} is outside 1-12")));
        }
        let amount = Decimal::from_str(amount)
            .map_err(|_| invalid(format!("amount {amount:?} is not numeric")))?;
        Ok(AggregateRow::new(year, month, amount))
    }
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn parse_rows(series: Series, raw: &[RawAggregate]) -> Result<Vec<AggregateRow>> {
    raw.iter()
        .enumerate()
        .map(|(i, r)| r.parse(series, i))
        .collect()
}

/// Columns of the summary table, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryColumn {
    Year,
    Month,
    MonthName,
    Income,
    Expense,
    Balance,
}

impl SummaryColumn {
    pub const ALL: [SummaryColumn; 6] = [
        SummaryColumn::Year,
        SummaryColumn::Month,
        SummaryColumn::MonthName,
        SummaryColumn::Income,
        SummaryColumn::Expense,
        SummaryColumn::Balance,
    ];

    pub fn header(self) -> &'static str {
        match self {
            SummaryColumn::Year => "Año",
            SummaryColumn::Month => "Mes",
            SummaryColumn::MonthName => "Mes_Nombre",
            SummaryColumn::Income => "Monto_Ingresos",
            SummaryColumn::Expense => "Monto_Egresos",
            SummaryColumn::Balance => "Balance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledMonth {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledTable {
    year: TargetYear,
    rows: Vec<ReconciledMonth>,
    empty_input: bool,
}

impl ReconciledTable {
    pub fn year(&self) -> TargetYear {
        self.year
    }

    pub fn rows(&self) -> &[ReconciledMonth] {
        &self.rows
    }

    /// True when both input series were empty; every amount is zero.
    pub fn is_empty_input(&self) -> bool {
        self.empty_input
    }

    pub fn totals(&self) -> Result<Totals> {
        self.rows.iter().try_fold(Totals::default(), |acc, r| -> Result<Totals> {
            let add = |a: Decimal, b: Decimal, what: &str| {
                a.checked_add(b).ok_or_else(|| {
                    ReportError::AmountOverflow(format!("{what} total for {}", self.year))
                })
            };
            Ok(Totals {
                income: add(acc.income, r.income, "income")?,
                expense: add(acc.expense, r.expense, "expense")?,
                balance: add(acc.balance, r.balance, "balance")?,
            })
        })
    }

    pub fn to_table(&self) -> Result<Table> {
        let mut table = Table::new(SUMMARY_SHEET, SummaryColumn::ALL.map(SummaryColumn::header));
        for r in &self.rows {
            table.push_row(vec![
                Cell::Integer(r.year.into()),
                Cell::Integer(r.month.into()),
                Cell::Text(r.month_name.to_string()),
                Cell::Amount(r.income),
                Cell::Amount(r.expense),
                Cell::Amount(r.balance),
            ])?;
        }
        Ok(table)
    }
}

pub struct Reconciler<'a> {
    months: &'a MonthNames,
}

impl<'a> Reconciler<'a> {
    pub fn new(months: &'a MonthNames) -> Self {
        Self { months }
    }

    pub fn reconcile(
        &self,
        year: TargetYear,
        income: &[AggregateRow],
        expense: &[AggregateRow],
    ) -> Result<ReconciledTable> {
        validate(Series::Income, income)?;
        validate(Series::Expense, expense)?;

        let scaffold = CalendarScaffold::build(year);
        let income_filled = fill(&scaffold, Series::Income, income);
        let expense_filled = fill(&scaffold, Series::Expense, expense);

        // Outer join on (year, month); the BTreeMap keeps keys sorted.
        let mut merged: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
        for (key, amount) in income_filled {
            merged.entry(key).or_default().0 = amount;
        }
        for (key, amount) in expense_filled {
            merged.entry(key).or_default().1 = amount;
        }

        let rows = merged
            .into_iter()
            .map(|((y, m), (inc, exp))| {
                let month_name = self.months.name(m).ok_or_else(|| {
                    ReportError::Other(format!("no month name for month {m}"))
                })?;
                let balance = inc.checked_sub(exp).ok_or_else(|| {
                    ReportError::AmountOverflow(format!("balance for {y}-{m:02}"))
                })?;
                Ok(ReconciledMonth {
                    year: y,
                    month: m,
                    month_name,
                    income: inc,
                    expense: exp,
                    balance,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(year = %year, rows = rows.len(), "reconciled monthly series");

        Ok(ReconciledTable {
            year,
            rows,
            empty_input: income.is_empty() && expense.is_empty(),
        })
    }
}

fn validate(series: Series, rows: &[AggregateRow]) -> Result<()> {
    let mut seen: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for (index, row) in rows.iter().enumerate() {
        if !(1..=12).contains(&row.month) {
            return Err(ReportError::InvalidAggregateRow {
                series: series.to_string(),
                index,
                reason: format!("month {} is outside 1-12", row.month),
            });
        }
        if let Some(first) = seen.insert((row.year, row.month), index) {
            return Err(ReportError::InvalidAggregateRow {
                series: series.to_string(),
                index,
                reason: format!(
                    "duplicate {}-{:02} (first seen at row #{first})",
                    row.year, row.month
                ),
            });
        }
    }
    Ok(())
}

/// Left join of `rows` onto the scaffold, zero where a month has no row.
fn fill(
    scaffold: &CalendarScaffold,
    series: Series,
    rows: &[AggregateRow],
) -> BTreeMap<(i32, u32), Decimal> {
    let by_key: BTreeMap<(i32, u32), Decimal> =
        rows.iter().map(|r| ((r.year, r.month), r.amount)).collect();

    for row in rows.iter().filter(|r| r.year != scaffold.year().get()) {
        warn!(
            %series,
            year = row.year,
            month = row.month,
            target = %scaffold.year(),
            "ignoring aggregate row outside the report year"
        );
    }

    scaffold
        .months()
        .iter()
        .map(|m| {
            let key = (m.year, m.month);
            (key, by_key.get(&key).copied().unwrap_or(Decimal::ZERO))
        })
        .collect()
}
