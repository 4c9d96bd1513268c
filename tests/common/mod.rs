#![allow(dead_code)]

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Weekday};
use lvsignal::domain::error::SignalError;
pub use lvsignal::domain::ohlcv::DailyBar;
use lvsignal::ports::calendar_port::CalendarPort;
use lvsignal::ports::data_port::DataPort;
use std::collections::{HashMap, HashSet};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<DailyBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<DailyBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyBar>, SignalError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(SignalError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SignalError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(SignalError::DataSource {
                reason: reason.clone(),
            });
        }
        match self.data.get(ticker) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

/// Weekdays are business days unless listed as holidays.
pub struct MockCalendar {
    pub holidays: HashSet<NaiveDate>,
}

impl MockCalendar {
    pub fn weekdays() -> Self {
        Self {
            holidays: HashSet::new(),
        }
    }

    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.insert(date);
        self
    }
}

impl CalendarPort for MockCalendar {
    fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}

/// `count` weekdays ending on `last` (inclusive), ascending.
pub fn trading_days(last: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut d = last;
    while days.len() < count {
        if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(d);
        }
        d -= Duration::days(1);
    }
    days.reverse();
    days
}

pub fn make_bar(
    ticker: &str,
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
) -> DailyBar {
    DailyBar {
        ticker: ticker.to_string(),
        date,
        open,
        high,
        low,
        close,
        volume,
    }
}

/// Quiet primary series: open = close = 100, range 99..101, constant volume.
/// Every day classifies as hold-cash and no overnight upgrade fires.
pub fn flat_primary(ticker: &str, last: NaiveDate, count: usize) -> Vec<DailyBar> {
    trading_days(last, count)
        .into_iter()
        .map(|d| make_bar(ticker, d, 100.0, 101.0, 99.0, 100.0, 1_000.0))
        .collect()
}

/// Secondary series that opens at 9950, closes at 10050 and ranges
/// 9900..10100: buys on the first evaluated day and never touches its
/// sell level afterwards.
pub fn trending_secondary(ticker: &str, last: NaiveDate, count: usize) -> Vec<DailyBar> {
    trading_days(last, count)
        .into_iter()
        .map(|d| make_bar(ticker, d, 9_950.0, 10_100.0, 9_900.0, 10_050.0, 50_000.0))
        .collect()
}

/// Replaces the last bar of `bars`, keeping its ticker and date.
pub fn set_last(bars: &mut [DailyBar], open: f64, high: f64, low: f64, close: f64, volume: f64) {
    if let Some(last) = bars.last_mut() {
        *last = make_bar(&last.ticker.clone(), last.date, open, high, low, close, volume);
    }
}

pub const LEVERAGE: &str = "122630";
pub const INVERSE: &str = "252670";
pub const SECONDARY: &str = "233740";

/// Market with the default tickers and `count` bars ending on `last`.
pub fn quiet_market(last: NaiveDate, count: usize) -> MockDataPort {
    MockDataPort::new()
        .with_bars(LEVERAGE, flat_primary(LEVERAGE, last, count))
        .with_bars(INVERSE, flat_primary(INVERSE, last, count))
        .with_bars(SECONDARY, trending_secondary(SECONDARY, last, count))
}

/// Writes `<dir>/<ticker>.csv` in the layout the CSV adapter reads.
pub fn write_csv(dir: &std::path::Path, ticker: &str, bars: &[DailyBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    std::fs::write(dir.join(format!("{ticker}.csv")), content).unwrap();
}
