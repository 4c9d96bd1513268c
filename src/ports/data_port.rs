//! Market-data provider port trait.

use crate::domain::error::SignalError;
use crate::domain::ohlcv::DailyBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `ticker` within `[start_date, end_date]`, ascending by date.
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyBar>, SignalError>;

    /// First date, last date and bar count available for `ticker`.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SignalError>;
}
