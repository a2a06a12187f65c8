use rusqlite::Connection;

use crate::calendar::{MonthNames, TargetYear};
use crate::cli::year_or_current;
use crate::error::Result;
use crate::levels::Level;
use crate::report::open_database;
use crate::settings::load_settings;

struct DemoStudent {
    grade: &'static str,
    last_name: &'static str,
    first_name: &'static str,
    national_id: &'static str,
}

const STUDENTS: &[DemoStudent] = &[
    DemoStudent { grade: "1A", last_name: "Acosta", first_name: "Valentina", national_id: "47.112.908" },
    DemoStudent { grade: "1A", last_name: "Benítez", first_name: "Tomás", national_id: "47.301.552" },
    DemoStudent { grade: "2A", last_name: "Córdoba", first_name: "Martina", national_id: "46.870.214" },
    DemoStudent { grade: "2B", last_name: "Domínguez", first_name: "Lautaro", national_id: "46.655.093" },
];

/// Monthly fee per level id, in cents. Ids past the end use the last entry.
const MONTHLY_FEES: &[i64] = &[3_500_000, 4_200_000, 4_875_050, 5_310_025];

/// (month, concept, amount in cents) charged to every level.
const EXPENSES: &[(u32, &str, i64)] = &[
    (1, "Mantenimiento edificio", 1_250_000),
    (2, "Útiles y materiales", 380_075),
    (4, "Servicios (luz y gas)", 92_340),
    (6, "Servicios (luz y gas)", 118_910),
    (7, "Mantenimiento edificio", 845_500),
    (8, "Servicios (luz y gas)", 131_205),
    (10, "Servicios (luz y gas)", 97_860),
    (12, "Aguinaldo", 6_400_000),
];

const PAYROLL_CENTS: i64 = 9_800_000;

fn date(year: TargetYear, month: u32, day: u32) -> String {
    format!("{:04}-{month:02}-{day:02}", year.get())
}

fn enrollment_concept(year: TargetYear) -> String {
    format!("Matricula {year}")
}

fn insert_level(conn: &Connection, level: &Level, year: TargetYear) -> Result<usize> {
    let months = MonthNames::SPANISH;
    let fee_idx = usize::try_from(level.id - 1).unwrap_or(0).min(MONTHLY_FEES.len() - 1);
    let fee = MONTHLY_FEES[fee_idx];
    let mut rows = 0;

    for s in STUDENTS {
        conn.execute(
            "INSERT INTO students (level_id, grade, last_name, first_name, national_id) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![level.id, s.grade, s.last_name, s.first_name, s.national_id],
        )?;
        let student_id = conn.last_insert_rowid();

        conn.execute(
            "INSERT INTO income (student_id, created, concept, amount_cents) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![student_id, date(year, 2, 15), enrollment_concept(year), fee],
        )?;
        rows += 1;

        // School year runs March to December; no fees are collected in July.
        for month in (3..=12).filter(|m| *m != 7) {
            let concept = format!("Cuota {}", months.name(month).unwrap_or_default());
            conn.execute(
                "INSERT INTO income (student_id, created, concept, amount_cents) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![student_id, date(year, month, 10), concept, fee],
            )?;
            rows += 1;
        }
    }

    for month in 1..=12 {
        conn.execute(
            "INSERT INTO expenses (level_id, paid_on, concept, payee, amount_cents) \
             VALUES (?1, ?2, 'Sueldos docentes', 'Personal', ?3)",
            rusqlite::params![level.id, date(year, month, 5), PAYROLL_CENTS * level.id.max(1)],
        )?;
        rows += 1;
    }
    for (month, concept, cents) in EXPENSES {
        conn.execute(
            "INSERT INTO expenses (level_id, paid_on, concept, payee, amount_cents) \
             VALUES (?1, ?2, ?3, NULL, ?4)",
            rusqlite::params![level.id, date(year, *month, 20), concept, cents],
        )?;
        rows += 1;
    }
    Ok(rows)
}

pub fn insert_demo_data(conn: &mut Connection, levels: &[Level], year: TargetYear) -> Result<usize> {
    let tx = conn.transaction()?;
    let mut rows = 0;
    for level in levels {
        rows += insert_level(&tx, level, year)?;
    }
    tx.commit()?;
    Ok(rows)
}

fn already_loaded(conn: &Connection, year: TargetYear) -> Result<bool> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM income WHERE concept = ?1)",
        [enrollment_concept(year)],
        |r| r.get(0),
    )?)
}

pub fn run(year: Option<String>) -> Result<()> {
    let settings = load_settings();
    let year = year_or_current(year.as_deref())?;
    let mut conn = open_database(&settings)?;

    if already_loaded(&conn, year)? {
        println!("Demo data for {year} already loaded.");
        return Ok(());
    }

    let rows = insert_demo_data(&mut conn, &settings.levels, year)?;
    tracing::info!(%year, rows, "demo data inserted");

    println!("Demo data loaded for {year}!");
    println!("  Levels:   {}", settings.levels.len());
    println!("  Students: {}", STUDENTS.len() * settings.levels.len());
    println!("  Records:  {rows}");
    println!();
    println!("Try these next:");
    println!("  edubalance summary --level Primaria --year {year}");
    println!("  edubalance generate --level Primaria --year {year}");
    println!("  edubalance");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;
    use crate::levels::default_levels;
    use crate::report::ReportData;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_demo_data_reconciles() {
        let (_dir, mut conn) = test_db();
        let year = TargetYear::new(2024).unwrap();
        insert_demo_data(&mut conn, &default_levels(), year).unwrap();
        assert!(already_loaded(&conn, year).unwrap());
        assert!(!already_loaded(&conn, TargetYear::new(2023).unwrap()).unwrap());

        let inicial = Level::new(1, "Inicial");
        let data = ReportData::collect(&conn, &inicial, year, &MonthNames::SPANISH).unwrap();
        let rows = data.summary.rows();

        // January: payroll plus building maintenance, no fees.
        assert_eq!(rows[0].income, Decimal::ZERO);
        assert_eq!(rows[0].expense, dec!(110500.00));
        assert_eq!(rows[0].balance, dec!(-110500.00));
        // February: four enrollment fees.
        assert_eq!(rows[1].income, dec!(140000.00));
        // July: no fees collected.
        assert_eq!(rows[6].income, Decimal::ZERO);
        assert_eq!(data.sheets[5].len(), STUDENTS.len());
    }
}
