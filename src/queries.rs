use rusqlite::{Connection, Params};

use crate::calendar::TargetYear;
use crate::error::{ReportError, Result};
use crate::fmt::cents;
use crate::levels::Level;
use crate::reconciler::{AggregateRow, Series};
use crate::table::{Cell, Table};

pub const INCOME_SHEET: &str = "Ingresos";
pub const EXPENSE_SHEET: &str = "Egresos";
pub const MONTHLY_INCOME_SHEET: &str = "Ingresos Mensuales";
pub const MONTHLY_EXPENSE_SHEET: &str = "Egresos Mensuales";
pub const ENROLLMENT_SHEET: &str = "Matricula";
pub const ROSTER_SHEET: &str = "Nomina de Estudiantes";

// ---------------------------------------------------------------------------
// Ledgers
// ---------------------------------------------------------------------------

const INCOME_LEDGER_SQL: &str = "\
    SELECT i.created, s.last_name || ', ' || s.first_name, s.grade, i.concept, i.amount_cents \
    FROM income i JOIN students s ON i.student_id = s.id \
    WHERE s.level_id = ?1 AND CAST(strftime('%Y', i.created) AS INTEGER) = ?2";

pub fn income_ledger(conn: &Connection, level: &Level, year: TargetYear) -> Result<Table> {
    let sql = format!("{INCOME_LEDGER_SQL} ORDER BY i.created, i.id");
    income_table(conn, INCOME_SHEET, &sql, rusqlite::params![level.id, year.get()])
}

/// Income rows whose concept mentions the enrollment fee.
pub fn enrollment_fees(conn: &Connection, level: &Level, year: TargetYear) -> Result<Table> {
    let sql = format!(
        "{INCOME_LEDGER_SQL} AND i.concept LIKE '%matricula%' ORDER BY i.created, i.id"
    );
    income_table(conn, ENROLLMENT_SHEET, &sql, rusqlite::params![level.id, year.get()])
}

fn income_table(conn: &Connection, name: &str, sql: &str, params: impl Params) -> Result<Table> {
    let mut table = Table::new(name, ["Fecha", "Alumno", "Sala / Grado", "Concepto", "Monto"]);
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| {
            Ok(vec![
                Cell::Text(row.get(0)?),
                Cell::Text(row.get(1)?),
                Cell::Text(row.get(2)?),
                Cell::Text(row.get(3)?),
                Cell::Amount(cents(row.get(4)?)),
            ])
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    for row in rows {
        table.push_row(row)?;
    }
    Ok(table)
}

pub fn expense_ledger(conn: &Connection, level: &Level, year: TargetYear) -> Result<Table> {
    let mut table = Table::new(EXPENSE_SHEET, ["Fecha", "Concepto", "Beneficiario", "Monto"]);
    let mut stmt = conn.prepare(
        "SELECT e.paid_on, e.concept, e.payee, e.amount_cents \
         FROM expenses e \
         WHERE e.level_id = ?1 AND CAST(strftime('%Y', e.paid_on) AS INTEGER) = ?2 \
         ORDER BY e.paid_on, e.id",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![level.id, year.get()], |row| {
            Ok(vec![
                Cell::Text(row.get(0)?),
                Cell::Text(row.get(1)?),
                Cell::from(row.get::<_, Option<String>>(2)?),
                Cell::Amount(cents(row.get(3)?)),
            ])
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    for row in rows {
        table.push_row(row)?;
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Monthly aggregates
// ---------------------------------------------------------------------------

pub fn monthly_income(
    conn: &Connection,
    level: &Level,
    year: TargetYear,
) -> Result<Vec<AggregateRow>> {
    aggregate_rows(
        conn,
        Series::Income,
        "SELECT CAST(strftime('%Y', i.created) AS INTEGER) AS y, \
                CAST(strftime('%m', i.created) AS INTEGER) AS m, \
                SUM(i.amount_cents) \
         FROM income i JOIN students s ON i.student_id = s.id \
         WHERE s.level_id = ?1 AND CAST(strftime('%Y', i.created) AS INTEGER) = ?2 \
         GROUP BY y, m ORDER BY y, m",
        rusqlite::params![level.id, year.get()],
    )
}

pub fn monthly_expense(
    conn: &Connection,
    level: &Level,
    year: TargetYear,
) -> Result<Vec<AggregateRow>> {
    aggregate_rows(
        conn,
        Series::Expense,
        "SELECT CAST(strftime('%Y', e.paid_on) AS INTEGER) AS y, \
                CAST(strftime('%m', e.paid_on) AS INTEGER) AS m, \
                SUM(e.amount_cents) \
         FROM expenses e \
         WHERE e.level_id = ?1 AND CAST(strftime('%Y', e.paid_on) AS INTEGER) = ?2 \
         GROUP BY y, m ORDER BY y, m",
        rusqlite::params![level.id, year.get()],
    )
}

fn aggregate_rows(
    conn: &Connection,
    series: Series,
    sql: &str,
    params: impl Params,
) -> Result<Vec<AggregateRow>> {
    let mut stmt = conn.prepare(sql)?;
    let raw: Vec<(Option<i64>, Option<i64>, i64)> = stmt
        .query_map(params, |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    raw.into_iter()
        .enumerate()
        .map(|(index, (y, m, total))| {
            let year = y.and_then(|y| i32::try_from(y).ok());
            let month = m.and_then(|m| u32::try_from(m).ok());
            match (year, month) {
                (Some(year), Some(month)) => Ok(AggregateRow::new(year, month, cents(total))),
                _ => Err(ReportError::InvalidAggregateRow {
                    series: series.to_string(),
                    index,
                    reason: format!("unreadable date group (year {y:?}, month {m:?})"),
                }),
            }
        })
        .collect()
}

pub fn aggregates_table(name: &str, rows: &[AggregateRow]) -> Result<Table> {
    let mut table = Table::new(name, ["Año", "Mes", "Monto"]);
    for r in rows {
        table.push_row(vec![
            Cell::Integer(r.year.into()),
            Cell::Integer(r.month.into()),
            Cell::Amount(r.amount),
        ])?;
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Enrollment roster
// ---------------------------------------------------------------------------

pub fn student_roster(conn: &Connection, level: &Level) -> Result<Table> {
    let mut table = Table::new(
        ROSTER_SHEET,
        ["Nivel", "Sala / Grado", "Apellido", "Nombre", "DNI / CUIL"],
    );
    let mut stmt = conn.prepare(
        "SELECT l.name, s.grade, s.last_name, s.first_name, s.national_id \
         FROM students s JOIN levels l ON s.level_id = l.id \
         WHERE s.level_id = ?1 \
         ORDER BY s.grade, s.last_name, s.first_name",
    )?;
    let rows = stmt
        .query_map([level.id], |row| {
            Ok(vec![
                Cell::Text(row.get(0)?),
                Cell::Text(row.get(1)?),
                Cell::Text(row.get(2)?),
                Cell::Text(row.get(3)?),
                Cell::from(row.get::<_, Option<String>>(4)?),
            ])
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    for row in rows {
        table.push_row(row)?;
    }
    Ok(table)
}
