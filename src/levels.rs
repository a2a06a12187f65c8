use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// An institutional level, e.g. "Primaria". The name is what the ledgers store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: i64,
    pub name: String,
}

impl Level {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

pub fn default_levels() -> Vec<Level> {
    vec![
        Level::new(1, "Inicial"),
        Level::new(2, "Primaria"),
        Level::new(3, "Secundaria"),
        Level::new(4, "Terciario"),
    ]
}

/// Resolve a level by numeric id or by case-insensitive name.
pub fn find_level<'a>(levels: &'a [Level], key: &str) -> Result<&'a Level> {
    let key = key.trim();
    let found = match key.parse::<i64>() {
        Ok(id) => levels.iter().find(|l| l.id == id),
        Err(_) => levels.iter().find(|l| l.name.eq_ignore_ascii_case(key)),
    };
    found.ok_or_else(|| ReportError::UnknownLevel(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_id_and_name() {
        let levels = default_levels();
        assert_eq!(find_level(&levels, "2").unwrap().name, "Primaria");
        assert_eq!(find_level(&levels, "secundaria").unwrap().id, 3);
        assert_eq!(find_level(&levels, " Terciario ").unwrap().id, 4);
    }

    #[test]
    fn test_unknown_level() {
        let levels = default_levels();
        assert!(matches!(find_level(&levels, "5"), Err(ReportError::UnknownLevel(_))));
        assert!(matches!(find_level(&levels, "Universidad"), Err(ReportError::UnknownLevel(_))));
    }
}
