//! Business-day stepping over a calendar oracle.

use chrono::NaiveDate;

use crate::ports::calendar_port::CalendarPort;

/// The first business day strictly after `date`.
pub fn next_business_day(date: NaiveDate, calendar: &dyn CalendarPort) -> NaiveDate {
    let mut next = date.succ_opt().unwrap_or(date);
    while !calendar.is_business_day(next) {
        match next.succ_opt() {
            Some(d) => next = d,
            None => break,
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};

    struct WeekdaysExcept(Vec<NaiveDate>);

    impl CalendarPort for WeekdaysExcept {
        fn is_business_day(&self, date: NaiveDate) -> bool {
            !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.0.contains(&date)
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weekday_to_next_weekday() {
        let cal = WeekdaysExcept(vec![]);
        // Tuesday -> Wednesday
        assert_eq!(next_business_day(d(2025, 6, 3), &cal), d(2025, 6, 4));
    }

    #[test]
    fn friday_skips_weekend() {
        let cal = WeekdaysExcept(vec![]);
        assert_eq!(next_business_day(d(2025, 6, 6), &cal), d(2025, 6, 9));
    }

    #[test]
    fn skips_holidays_after_weekend() {
        let cal = WeekdaysExcept(vec![d(2025, 6, 9), d(2025, 6, 10)]);
        assert_eq!(next_business_day(d(2025, 6, 6), &cal), d(2025, 6, 11));
    }

    #[test]
    fn always_moves_forward() {
        let cal = WeekdaysExcept(vec![]);
        // Saturday is not a business day, but the next one is Monday.
        assert_eq!(next_business_day(d(2025, 6, 7), &cal), d(2025, 6, 9));
    }
}
