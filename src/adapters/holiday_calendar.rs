//! Exchange holiday calendar.
//!
//! Closed on weekends, on every configured holiday, and (optionally) on
//! December 31st, which the exchange closes every year.

use crate::domain::error::SignalError;
use crate::ports::calendar_port::CalendarPort;
use crate::ports::config_port::ConfigPort;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    holidays: BTreeSet<NaiveDate>,
    year_end_closed: bool,
}

impl HolidayCalendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>, year_end_closed: bool) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
            year_end_closed,
        }
    }

    /// Holidays from `[market] holidays` (comma list) and the optional
    /// `[market] holidays_file` CSV.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SignalError> {
        let mut holidays = BTreeSet::new();
        for raw in config.get_list("market", "holidays") {
            holidays.insert(parse_holiday(&raw)?);
        }
        if let Some(path) = config.get_string("market", "holidays_file") {
            holidays.extend(load_holiday_file(Path::new(path.trim()))?);
        }
        Ok(Self {
            holidays,
            year_end_closed: config.get_bool("market", "year_end_closed", true),
        })
    }

    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }
}

fn parse_holiday(raw: &str) -> Result<NaiveDate, SignalError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        SignalError::invalid(
            "market",
            "holidays",
            format!("invalid holiday {raw}, expected YYYY-MM-DD"),
        )
    })
}

/// Reads a CSV whose first column is a holiday date; extra columns
/// (names, notes) are ignored.
fn load_holiday_file(path: &Path) -> Result<Vec<NaiveDate>, SignalError> {
    let mut rdr = csv::Reader::from_path(path).map_err(|e| {
        SignalError::invalid(
            "market",
            "holidays_file",
            format!("failed to read {}: {}", path.display(), e),
        )
    })?;

    let mut dates = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| {
            SignalError::invalid("market", "holidays_file", format!("CSV parse error: {e}"))
        })?;
        if let Some(raw) = record.get(0) {
            dates.push(parse_holiday(raw)?);
        }
    }
    Ok(dates)
}

impl CalendarPort for HolidayCalendar {
    fn is_business_day(&self, date: NaiveDate) -> bool {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        if self.year_end_closed && date.month() == 12 && date.day() == 31 {
            return false;
        }
        !self.holidays.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use crate::domain::calendar::next_business_day;
    use std::io::Write;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weekends_closed() {
        let cal = HolidayCalendar::default();
        assert!(!cal.is_business_day(d(2025, 6, 7)));
        assert!(!cal.is_business_day(d(2025, 6, 8)));
        assert!(cal.is_business_day(d(2025, 6, 9)));
    }

    #[test]
    fn year_end_closure() {
        let closed = HolidayCalendar::new([], true);
        let open = HolidayCalendar::new([], false);
        // 2025-12-31 is a Wednesday.
        assert!(!closed.is_business_day(d(2025, 12, 31)));
        assert!(open.is_business_day(d(2025, 12, 31)));
    }

    #[test]
    fn year_end_rolls_into_new_year_holiday() {
        let cal = HolidayCalendar::new([d(2026, 1, 1)], true);
        assert_eq!(next_business_day(d(2025, 12, 30), &cal), d(2026, 1, 2));
    }

    #[test]
    fn from_config_inline_list() {
        let config = FileConfigAdapter::from_string(
            "[market]\nholidays = 2025-10-03, 2025-10-06\nyear_end_closed = false\n",
        )
        .unwrap();
        let cal = HolidayCalendar::from_config(&config).unwrap();
        assert_eq!(cal.holiday_count(), 2);
        assert!(!cal.is_business_day(d(2025, 10, 3)));
        assert!(cal.is_business_day(d(2025, 12, 31)));
    }

    #[test]
    fn from_config_with_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "date,name\n2025-05-05,Children's Day\n2025-05-06,Substitute\n").unwrap();
        file.flush().unwrap();

        let ini = format!(
            "[market]\nholidays = 2025-05-05\nholidays_file = {}\n",
            file.path().display()
        );
        let config = FileConfigAdapter::from_string(&ini).unwrap();
        let cal = HolidayCalendar::from_config(&config).unwrap();

        assert_eq!(cal.holiday_count(), 2);
        // Friday 2 May -> skips weekend and both holidays
        assert_eq!(next_business_day(d(2025, 5, 2), &cal), d(2025, 5, 7));
    }

    #[test]
    fn from_config_rejects_bad_date() {
        let config = FileConfigAdapter::from_string("[market]\nholidays = 2025/05/05\n").unwrap();
        let err = HolidayCalendar::from_config(&config).unwrap_err();
        assert!(matches!(err, SignalError::ConfigInvalid { ref key, .. } if key == "holidays"));
    }

    #[test]
    fn from_config_missing_file() {
        let config = FileConfigAdapter::from_string(
            "[market]\nholidays_file = /nonexistent/holidays.csv\n",
        )
        .unwrap();
        let err = HolidayCalendar::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            SignalError::ConfigInvalid { ref key, .. } if key == "holidays_file"
        ));
    }
}
