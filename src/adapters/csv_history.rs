//! Write-only CSV sink for the signal history.
//!
//! Columns: ticker, date, applies_to, signal, close, disparity,
//! volume_contraction, higher_low. Rows keep the report order (most recent
//! first). The file is overwritten on every run; nothing is read back.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::domain::error::SignalError;
use crate::domain::pipeline::SignalReport;
use crate::ports::report_port::ReportPort;

pub struct CsvHistoryAdapter;

impl CsvHistoryAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvHistoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_error(e: csv::Error) -> SignalError {
    SignalError::Report {
        reason: format!("CSV write error: {e}"),
    }
}

pub fn history_csv(report: &SignalReport) -> Result<String, SignalError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "ticker",
        "date",
        "applies_to",
        "signal",
        "close",
        "disparity",
        "volume_contraction",
        "higher_low",
    ])
    .map_err(csv_error)?;

    for r in &report.history {
        wtr.write_record([
            &report.tickers.leverage,
            &r.date.to_string(),
            &r.applies_to.to_string(),
            &r.signal.to_string(),
            &format!("{:.2}", r.close),
            &format!("{:.4}", r.disparity),
            &r.volume_contraction.to_string(),
            &r.higher_low.to_string(),
        ])
        .map_err(csv_error)?;
    }

    let bytes = wtr.into_inner().map_err(|e| SignalError::Report {
        reason: format!("CSV write error: {e}"),
    })?;
    String::from_utf8(bytes).map_err(|e| SignalError::Report {
        reason: format!("CSV output is not UTF-8: {e}"),
    })
}

impl ReportPort for CsvHistoryAdapter {
    fn write(&self, report: &SignalReport, output_path: &str) -> Result<(), SignalError> {
        let content = history_csv(report)?;
        if output_path == "-" {
            std::io::stdout().lock().write_all(content.as_bytes())?;
            return Ok(());
        }

        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        tracing::info!(path = %path.display(), rows = report.history.len(), "history written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::action::{ActionPair, Decision, HeaderDecision};
    use crate::domain::ohlcv::DailyBar;
    use crate::domain::overnight::OvernightCheck;
    use crate::domain::pipeline::{HistoryRecord, Tickers};
    use crate::domain::session::Session;
    use crate::domain::signal::Signal;
    use chrono::{DateTime, NaiveDate};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn report(history: Vec<HistoryRecord>) -> SignalReport {
        let decision = Decision {
            date: d(2025, 6, 2),
            prev_signal: Signal::HoldCash,
            signal: Signal::Inverse,
            streak: 1,
            actions: ActionPair::NONE,
        };
        SignalReport {
            generated_at: DateTime::parse_from_rfc3339("2025-06-02T16:00:00+09:00").unwrap(),
            session: Session::Open,
            header_date: d(2025, 6, 3),
            tickers: Tickers::default(),
            header: HeaderDecision {
                decision: decision.clone(),
                deferred: false,
            },
            latest: decision,
            history,
            overnight_check: OvernightCheck {
                upside_range: 0.0,
                downside_today: 0.0,
                downside_yesterday: 0.0,
                met: false,
            },
            breakout: None,
            long_band: (98.0, 106.0),
            leverage_last: DailyBar {
                ticker: "122630".into(),
                date: d(2025, 6, 2),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
                volume: 1.0,
            },
            inverse_last: None,
            secondary_last: None,
        }
    }

    fn record(date: NaiveDate, applies_to: NaiveDate, signal: Signal) -> HistoryRecord {
        HistoryRecord {
            date,
            applies_to,
            signal,
            close: 15_230.0,
            disparity: 100.12346,
            volume_contraction: true,
            higher_low: false,
        }
    }

    #[test]
    fn header_and_rows() {
        let csv = history_csv(&report(vec![
            record(d(2025, 6, 2), d(2025, 6, 3), Signal::Inverse),
            record(d(2025, 5, 30), d(2025, 6, 2), Signal::Overnight),
        ]))
        .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "ticker,date,applies_to,signal,close,disparity,volume_contraction,higher_low"
        );
        assert_eq!(
            lines[1],
            "122630,2025-06-02,2025-06-03,inverse,15230.00,100.1235,true,false"
        );
        assert!(lines[2].starts_with("122630,2025-05-30,2025-06-02,overnight,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_history_writes_header_only() {
        let csv = history_csv(&report(Vec::new())).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn write_overwrites_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("history.csv");
        fs::write(&path, "stale").unwrap();

        let adapter = CsvHistoryAdapter::new();
        let r = report(vec![record(d(2025, 6, 2), d(2025, 6, 3), Signal::Long)]);
        adapter.write(&r, path.to_str().unwrap()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        assert_eq!(content.lines().count(), 2);
    }
}
