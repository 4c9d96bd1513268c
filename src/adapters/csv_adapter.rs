//! CSV file market-data adapter.
//!
//! One file per ticker, `<base_path>/<ticker>.csv`, with the header
//! `date,open,high,low,close,volume` and ISO dates.

use crate::domain::error::SignalError;
use crate::domain::ohlcv::DailyBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn read_all(&self, ticker: &str) -> Result<Vec<DailyBar>, SignalError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| SignalError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| SignalError::DataSource {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            // +2: header line and 1-based numbering
            bars.push(parse_record(ticker, &record, line + 2)?);
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> Result<&'r str, SignalError> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| SignalError::DataSource {
            reason: format!("line {}: missing {} column", line, name),
        })
}

fn number(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> Result<f64, SignalError> {
    let raw = field(record, idx, name, line)?;
    let value: f64 = raw.parse().map_err(|e| SignalError::DataSource {
        reason: format!("line {}: invalid {} value {:?}: {}", line, name, raw, e),
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(SignalError::DataSource {
            reason: format!("line {}: {} must be a non-negative number", line, name),
        });
    }
    Ok(value)
}

fn parse_record(
    ticker: &str,
    record: &csv::StringRecord,
    line: usize,
) -> Result<DailyBar, SignalError> {
    let date_str = field(record, 0, "date", line)?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
        SignalError::DataSource {
            reason: format!("line {}: invalid date format: {}", line, e),
        }
    })?;

    Ok(DailyBar {
        ticker: ticker.to_string(),
        date,
        open: number(record, 1, "open", line)?,
        high: number(record, 2, "high", line)?,
        low: number(record, 3, "low", line)?,
        close: number(record, 4, "close", line)?,
        volume: number(record, 5, "volume", line)?,
    })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyBar>, SignalError> {
        let mut bars = self.read_all(ticker)?;
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Ok(bars)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SignalError> {
        let bars = self.read_all(ticker)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
