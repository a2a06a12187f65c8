use rust_decimal::Decimal;

use crate::error::{ReportError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Amount(Decimal),
    Empty,
}

impl Cell {
    /// Text as it would appear in a cell, used for column sizing.
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Integer(n) => n.to_string(),
            Cell::Amount(d) => d.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<Option<String>> for Cell {
    fn from(s: Option<String>) -> Self {
        s.map(Cell::Text).unwrap_or(Cell::Empty)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Integer(n)
    }
}

impl From<Decimal> for Cell {
    fn from(d: Decimal) -> Self {
        Cell::Amount(d)
    }
}

/// A named sheet worth of data: fixed column order, finalized rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(name: &str, columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ReportError::Other(format!(
                "table '{}' expects {} columns, got {}",
                self.name,
                self.columns.len(),
                row.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_push_row_checks_arity() {
        let mut t = Table::new("Egresos", ["Fecha", "Monto"]);
        t.push_row(vec!["2024-03-01".into(), dec!(10.50).into()]).unwrap();
        assert!(t.push_row(vec!["2024-03-02".into()]).is_err());
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_column_index() {
        let t = Table::new("Resumen", ["Año", "Mes", "Balance"]);
        assert_eq!(t.column_index("Balance"), Some(2));
        assert_eq!(t.column_index("Monto"), None);
        assert!(t.is_empty());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::from(dec!(1500.50)).display(), "1500.50");
        assert_eq!(Cell::from(7_i64).display(), "7");
        assert_eq!(Cell::from(None::<String>).display(), "");
    }
}
