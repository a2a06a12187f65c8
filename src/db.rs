use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;
use crate::levels::Level;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS levels (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY,
    level_id INTEGER NOT NULL,
    grade TEXT NOT NULL,
    last_name TEXT NOT NULL,
    first_name TEXT NOT NULL,
    national_id TEXT,
    FOREIGN KEY (level_id) REFERENCES levels(id)
);

CREATE TABLE IF NOT EXISTS income (
    id INTEGER PRIMARY KEY,
    student_id INTEGER NOT NULL,
    created TEXT NOT NULL,
    concept TEXT NOT NULL,
    amount_cents INTEGER NOT NULL,
    FOREIGN KEY (student_id) REFERENCES students(id)
);

CREATE TABLE IF NOT EXISTS expenses (
    id INTEGER PRIMARY KEY,
    level_id INTEGER NOT NULL,
    paid_on TEXT NOT NULL,
    concept TEXT NOT NULL,
    payee TEXT,
    amount_cents INTEGER NOT NULL,
    FOREIGN KEY (level_id) REFERENCES levels(id)
);

CREATE INDEX IF NOT EXISTS idx_income_created ON income(created);
CREATE INDEX IF NOT EXISTS idx_expenses_paid_on ON expenses(paid_on);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection, levels: &[Level]) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    for level in levels {
        conn.execute(
            "INSERT OR IGNORE INTO levels (id, name) VALUES (?1, ?2)",
            rusqlite::params![level.id, level.name],
        )?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_db() -> (tempfile::TempDir, Connection) {
    let dir = tempfile::tempdir().unwrap();
    let conn = get_connection(&dir.path().join("test.db")).unwrap();
    init_db(&conn, &crate::levels::default_levels()).unwrap();
    (dir, conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["levels", "students", "income", "expenses"] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn, &crate::levels::default_levels()).unwrap();
        let count: i64 = conn.query_row("SELECT count(*) FROM levels", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_init_db_seeds_levels() {
        let (_dir, conn) = test_db();
        let name: String = conn
            .query_row("SELECT name FROM levels WHERE id = 3", [], |r| r.get(0))
            .unwrap();
        assert_eq!(name, "Secundaria");
    }
}
