use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_xlsxwriter::{DocProperties, Workbook};
use tracing::{info, warn};

use crate::calendar::{MonthNames, TargetYear};
use crate::charts::{bind_charts, SummaryLayout};
use crate::db::get_connection;
use crate::error::{ReportError, Result};
use crate::levels::Level;
use crate::queries;
use crate::reconciler::{ReconciledTable, Reconciler};
use crate::settings::Settings;
use crate::table::Table;
use crate::workbook::write_table;

/// Everything one report run needs, gathered before any file is touched.
pub struct ReportData {
    pub level: Level,
    pub year: TargetYear,
    pub sheets: Vec<Table>,
    pub summary: ReconciledTable,
}

impl ReportData {
    pub fn collect(
        conn: &Connection,
        level: &Level,
        year: TargetYear,
        months: &MonthNames,
    ) -> Result<Self> {
        let income = queries::monthly_income(conn, level, year)?;
        let expense = queries::monthly_expense(conn, level, year)?;

        let sheets = vec![
            queries::income_ledger(conn, level, year)?,
            queries::expense_ledger(conn, level, year)?,
            queries::aggregates_table(queries::MONTHLY_INCOME_SHEET, &income)?,
            queries::aggregates_table(queries::MONTHLY_EXPENSE_SHEET, &expense)?,
            queries::enrollment_fees(conn, level, year)?,
            queries::student_roster(conn, level)?,
        ];
        for sheet in &sheets {
            info!(sheet = sheet.name(), rows = sheet.len(), "query finished");
        }

        if income.is_empty() || expense.is_empty() {
            warn!(
                level = %level.name,
                %year,
                income_months = income.len(),
                expense_months = expense.len(),
                "monthly income or expense series is empty"
            );
        }

        let summary = Reconciler::new(months).reconcile(year, &income, &expense)?;

        Ok(Self {
            level: level.clone(),
            year,
            sheets,
            summary,
        })
    }
}

/// Assemble the workbook: one sheet per non-empty query, then the summary
/// sheet with its charts.
pub fn render(data: &ReportData, settings: &Settings) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    workbook.set_properties(&properties(data, settings));
    for sheet in data.sheets.iter().filter(|s| !s.is_empty()) {
        write_table(&mut workbook, sheet, &settings.currency_format)?;
    }

    let summary = data.summary.to_table()?;
    write_table(&mut workbook, &summary, &settings.currency_format)?;
    bind_charts(
        &mut workbook,
        &SummaryLayout::resolve(&summary)?,
        &settings.currency_label,
    )?;
    Ok(workbook)
}

fn properties(data: &ReportData, settings: &Settings) -> DocProperties {
    let title = format!("Balance {} {}", data.level.name, data.year);
    let properties = DocProperties::new().set_title(&title);
    match settings.institution_name.trim() {
        "" => properties,
        name => properties.set_company(name),
    }
}

/// `<level>-<dd-mm-YYYY>-<year>.xlsx`
pub fn default_file_name(level: &Level, year: TargetYear, today: NaiveDate) -> String {
    format!(
        "{}-{}-{}.xlsx",
        level.name.to_lowercase(),
        today.format("%d-%m-%Y"),
        year
    )
}

pub struct GeneratedReport {
    pub path: PathBuf,
    pub data: ReportData,
}

pub fn generate(
    settings: &Settings,
    level: &Level,
    year: TargetYear,
    output: Option<PathBuf>,
) -> Result<GeneratedReport> {
    let data = {
        let conn = open_database(settings)?;
        ReportData::collect(&conn, level, year, &settings.month_names())?
    };

    let mut workbook = render(&data, settings)?;
    let path = output.unwrap_or_else(|| {
        let today = chrono::Local::now().date_naive();
        settings
            .exports_dir()
            .join(default_file_name(level, year, today))
    });
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    workbook.save(&path)?;
    info!(path = %path.display(), "report written");

    Ok(GeneratedReport { path, data })
}

pub fn open_database(settings: &Settings) -> Result<Connection> {
    let path = settings.db_path();
    ensure_exists(&path)?;
    get_connection(&path)
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ReportError::Other(format!(
            "No database at {}. Run `edubalance init` first.",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_db, test_db};
    use crate::levels::default_levels;
    use crate::queries::fixtures::*;
    use rust_decimal_macros::dec;

    fn primaria() -> Level {
        Level::new(2, "Primaria")
    }

    fn year(y: i64) -> TargetYear {
        TargetYear::new(y).unwrap()
    }

    #[test]
    fn test_default_file_name() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert_eq!(
            default_file_name(&primaria(), year(2024), today),
            "primaria-03-03-2025-2024.xlsx"
        );
    }

    #[test]
    fn test_collect_reconciles_monthly_series() {
        let (_dir, conn) = test_db();
        let s = student(&conn, 2, "3A", "Pérez", "Ana");
        income(&conn, s, "2024-03-05", "Cuota marzo", 150_050);
        expense(&conn, 2, "2024-03-20", "Limpieza", 40_025);
        expense(&conn, 2, "2024-07-01", "Luz", 10_000);

        let data = ReportData::collect(&conn, &primaria(), year(2024), &MonthNames::SPANISH).unwrap();
        let names: Vec<&str> = data.sheets.iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            [
                "Ingresos",
                "Egresos",
                "Ingresos Mensuales",
                "Egresos Mensuales",
                "Matricula",
                "Nomina de Estudiantes"
            ]
        );
        let rows = data.summary.rows();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[2].balance, dec!(1100.25));
        assert_eq!(rows[6].balance, dec!(-100.00));
    }

    #[test]
    fn test_collect_without_activity() {
        let (_dir, conn) = test_db();
        let data = ReportData::collect(&conn, &primaria(), year(2025), &MonthNames::SPANISH).unwrap();
        assert!(data.summary.is_empty_input());
        assert!(data.sheets.iter().all(|t| t.is_empty()));

        let mut wb = render(&data, &Settings::default()).unwrap();
        assert!(wb.worksheet_from_name("Resumen").is_ok());
        assert!(wb.worksheet_from_name("Ingresos").is_err());
    }

    #[test]
    fn test_render_with_institution_name() {
        let (_dir, conn) = test_db();
        let data = ReportData::collect(&conn, &primaria(), year(2024), &MonthNames::SPANISH).unwrap();
        let settings = Settings {
            institution_name: "Colegio San Martín".to_string(),
            ..Settings::default()
        };
        let mut wb = render(&data, &settings).unwrap();
        assert!(wb.save_to_buffer().unwrap().starts_with(b"PK"));
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            data_dir: dir.path().to_string_lossy().to_string(),
            ..Settings::default()
        };
        let conn = get_connection(&settings.db_path()).unwrap();
        init_db(&conn, &default_levels()).unwrap();
        let s = student(&conn, 2, "1A", "Ruiz", "Juan");
        income(&conn, s, "2024-02-01", "Matricula", 2_000_000);
        drop(conn);

        let out = dir.path().join("out").join("report.xlsx");
        let report = generate(&settings, &primaria(), year(2024), Some(out.clone())).unwrap();
        assert_eq!(report.path, out);
        assert!(out.exists());
        assert_eq!(report.data.summary.totals().unwrap().income, dec!(20000.00));
    }

    #[test]
    fn test_generate_without_database() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            data_dir: dir.path().join("missing").to_string_lossy().to_string(),
            ..Settings::default()
        };
        let out = dir.path().join("report.xlsx");
        assert!(generate(&settings, &primaria(), year(2024), Some(out.clone())).is_err());
        assert!(!out.exists());
    }
}
