//! Business-calendar oracle port trait.

use chrono::NaiveDate;

pub trait CalendarPort {
    fn is_business_day(&self, date: NaiveDate) -> bool;
}
