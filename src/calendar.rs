use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// A validated report year: a strictly positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetYear(i32);

impl TargetYear {
    pub fn new(year: i64) -> Result<Self> {
        match i32::try_from(year) {
            Ok(y) if y > 0 => Ok(Self(y)),
            _ => Err(ReportError::InvalidYear(year.to_string())),
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let year: i64 = trimmed
            .parse()
            .map_err(|_| ReportError::InvalidYear(input.to_string()))?;
        Self::new(year).map_err(|_| ReportError::InvalidYear(input.to_string()))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for TargetYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Locale selector for [`MonthNames`], as stored in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MonthLocale {
    #[default]
    Es,
    En,
}

/// Fixed month-number to display-name table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthNames([&'static str; 12]);

impl MonthNames {
    pub const SPANISH: MonthNames = MonthNames([
        "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio",
        "Julio", "Agosto", "Septiembre", "Octubre", "Noviembre", "Diciembre",
    ]);

    pub const ENGLISH: MonthNames = MonthNames([
        "January", "February", "March", "April", "May", "June",
        "July", "August", "September", "October", "November", "December",
    ]);

    pub fn for_locale(locale: MonthLocale) -> Self {
        match locale {
            MonthLocale::Es => Self::SPANISH,
            MonthLocale::En => Self::ENGLISH,
        }
    }

    /// Name for `month` in 1..=12, `None` otherwise.
    pub fn name(&self, month: u32) -> Option<&'static str> {
        match month {
            1..=12 => Some(self.0[month as usize - 1]),
            _ => None,
        }
    }
}

impl Default for MonthNames {
    fn default() -> Self {
        Self::SPANISH
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScaffoldMonth {
    pub year: i32,
    pub month: u32,
}

/// The twelve months of one year, January first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarScaffold {
    year: TargetYear,
    months: Vec<ScaffoldMonth>,
}

impl CalendarScaffold {
    pub fn build(year: TargetYear) -> Self {
        let months = (1..=12)
            .map(|month| ScaffoldMonth {
                year: year.get(),
                month,
            })
            .collect();
        Self { year, months }
    }

    pub fn year(&self) -> TargetYear {
        self.year
    }

    pub fn months(&self) -> &[ScaffoldMonth] {
        &self.months
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_padded_year() {
        assert_eq!(TargetYear::parse(" 2024 ").unwrap().get(), 2024);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "abc", "20x4", "0", "-2024", "2024.5", "99999999999"] {
            let err = TargetYear::parse(bad).unwrap_err();
            assert!(matches!(err, ReportError::InvalidYear(_)), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_scaffold_has_twelve_ordered_months() {
        let scaffold = CalendarScaffold::build(TargetYear::new(2025).unwrap());
        let months: Vec<u32> = scaffold.months().iter().map(|m| m.month).collect();
        assert_eq!(months, (1..=12).collect::<Vec<_>>());
        assert!(scaffold.months().iter().all(|m| m.year == 2025));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(MonthNames::SPANISH.name(1), Some("Enero"));
        assert_eq!(MonthNames::SPANISH.name(9), Some("Septiembre"));
        assert_eq!(MonthNames::ENGLISH.name(12), Some("December"));
        assert_eq!(MonthNames::SPANISH.name(0), None);
        assert_eq!(MonthNames::SPANISH.name(13), None);
    }

    #[test]
    fn test_locale_roundtrip() {
        let locale: MonthLocale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(MonthNames::for_locale(locale), MonthNames::ENGLISH);
    }
}
