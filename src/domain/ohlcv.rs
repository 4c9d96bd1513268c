//! Daily OHLCV bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyBar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl DailyBar {
    /// high - low
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// high - open (UR)
    pub fn upside_range(&self) -> f64 {
        self.high - self.open
    }

    /// open - low (LR)
    pub fn downside_range(&self) -> f64 {
        self.open - self.low
    }

    /// max(0, close - open); down-days contribute nothing.
    pub fn day_gain(&self) -> f64 {
        (self.close - self.open).max(0.0)
    }

    /// Whether `price` lies within [low, high].
    pub fn spans(&self, price: f64) -> bool {
        self.low <= price && price <= self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> DailyBar {
        DailyBar {
            ticker: "122630".into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            open: 100.0,
            high: 108.0,
            low: 97.0,
            close: 105.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn ranges_from_open() {
        let bar = sample_bar();
        assert!((bar.range() - 11.0).abs() < f64::EPSILON);
        assert!((bar.upside_range() - 8.0).abs() < f64::EPSILON);
        assert!((bar.downside_range() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn day_gain_up_day() {
        assert!((sample_bar().day_gain() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn day_gain_down_day_is_zero() {
        let bar = DailyBar {
            close: 98.0,
            ..sample_bar()
        };
        assert_eq!(bar.day_gain(), 0.0);
    }

    #[test]
    fn spans_is_inclusive() {
        let bar = sample_bar();
        assert!(bar.spans(97.0));
        assert!(bar.spans(108.0));
        assert!(!bar.spans(108.5));
        assert!(!bar.spans(96.0));
    }
}
