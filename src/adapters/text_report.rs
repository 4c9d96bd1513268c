//! Plain-text report adapter implementing ReportPort.
//!
//! Sections: header (the call for the next session), latest bars, signal
//! history with a disparity gauge, the overnight calculator and the
//! secondary breakout summary.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::domain::error::SignalError;
use crate::domain::pipeline::{HistoryRecord, SignalReport, Tickers};
use crate::domain::session::Session;
use crate::domain::signal::Action;
use crate::domain::tracker::{BreakoutSummary, ConditionStatus, MISSING_DISPARITY};
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;

const GAUGE_WIDTH: usize = 10;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, report: &SignalReport, output_path: &str) -> Result<(), SignalError> {
        let text = render(report);
        if output_path == "-" {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            return Ok(());
        }

        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text).map_err(|e| SignalError::Report {
            reason: format!("failed to write {}: {}", path.display(), e),
        })
    }
}

fn day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d %a").to_string()
}

fn instrument(action: Action, tickers: &Tickers) -> String {
    match action {
        Action::None => "none".to_string(),
        Action::Long => format!("long ({})", tickers.leverage),
        Action::Inverse => format!("inverse ({})", tickers.inverse),
    }
}

/// Position of `disparity` inside the long band as a 0..=100 percentage.
pub fn gauge_percent(disparity: f64, band: (f64, f64)) -> f64 {
    let (low, high) = band;
    if high <= low {
        return 0.0;
    }
    ((disparity - low) * 100.0 / (high - low)).clamp(0.0, 100.0)
}

fn gauge(disparity: f64, band: (f64, f64)) -> String {
    let filled = (gauge_percent(disparity, band) / 100.0 * GAUGE_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(GAUGE_WIDTH - filled)
    )
}

fn disparity_text(value: f64) -> String {
    if value == MISSING_DISPARITY {
        "n/a".to_string()
    } else {
        format!("{value:.2}")
    }
}

fn render_header(out: &mut String, report: &SignalReport) {
    let decision = &report.header.decision;
    out.push_str(&format!(
        "Signal for {}  (generated {}, {})\n",
        day(report.header_date),
        report.generated_at.format("%Y-%m-%d %H:%M %:z"),
        report.session
    ));
    out.push_str(&format!(
        "  signal   {}  (day {})\n",
        decision.signal, decision.streak
    ));
    out.push_str(&format!(
        "  buy      {}\n",
        instrument(decision.actions.buy, &report.tickers)
    ));
    out.push_str(&format!(
        "  sell     {}\n",
        instrument(decision.actions.sell, &report.tickers)
    ));
    if report.header.deferred {
        out.push_str(&format!(
            "  note     overnight call from {} shown one day late; latest bar {} is {}\n",
            decision.date, report.latest.date, report.latest.signal
        ));
    }
    out.push('\n');
}

fn render_latest_bars(out: &mut String, report: &SignalReport) {
    out.push_str("Latest bars\n");
    let bars = [
        Some(&report.leverage_last),
        report.inverse_last.as_ref(),
        report.secondary_last.as_ref(),
    ];
    for bar in bars.into_iter().flatten() {
        out.push_str(&format!(
            "  {:<8} {}  O {:.2}  H {:.2}  L {:.2}  C {:.2}  V {:.0}\n",
            bar.ticker, bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }
    if report.inverse_last.is_none() {
        out.push_str(&format!("  {:<8} no data\n", report.tickers.inverse));
    }
    if report.secondary_last.is_none() {
        out.push_str(&format!("  {:<8} no data\n", report.tickers.secondary));
    }
    out.push('\n');
}

fn render_history_row(record: &HistoryRecord, band: (f64, f64)) -> String {
    let badge = |on: bool, label: &str| {
        if on {
            label.to_string()
        } else {
            "-".repeat(label.len())
        }
    };
    format!(
        "  {} -> {}  {:<9}  close {:>10.2}  disparity {:>7.2} {}  {} {}\n",
        record.date,
        day(record.applies_to),
        record.signal.label(),
        record.close,
        record.disparity,
        gauge(record.disparity, band),
        badge(record.volume_contraction, "vol-down"),
        badge(record.higher_low, "higher-low"),
    )
}

fn render_history(out: &mut String, report: &SignalReport) {
    out.push_str(&format!(
        "History (disparity gauge {:.0}..{:.0})\n",
        report.long_band.0, report.long_band.1
    ));
    if report.history.is_empty() {
        out.push_str("  no history\n");
    }
    for record in &report.history {
        out.push_str(&render_history_row(record, report.long_band));
    }
    out.push('\n');
}

fn render_overnight(out: &mut String, report: &SignalReport) {
    let check = &report.overnight_check;
    let verdict = if check.met { ">" } else { "<=" };
    out.push_str(&format!("Overnight check ({})\n", report.leverage_last.date));
    out.push_str(&format!(
        "  UR {:.2} {} LR MAX({:.2}, {:.2}) = {:.2}  {}\n\n",
        check.upside_range,
        verdict,
        check.downside_today,
        check.downside_yesterday,
        check.downside_max(),
        if check.met { "met" } else { "not met" }
    ));
}

fn condition(status: ConditionStatus, level: f64) -> String {
    match status {
        ConditionStatus::Pending => format!("{status} (level {level:.0})"),
        _ => format!("{status} at {level:.0}"),
    }
}

fn render_breakout(out: &mut String, ticker: &str, summary: Option<&BreakoutSummary>) {
    out.push_str(&format!("Breakout {ticker}\n"));
    let Some(s) = summary else {
        out.push_str("  not enough data for breakout levels\n");
        return;
    };
    let l = &s.levels;
    let open_label = match s.session {
        Session::Open => "open",
        Session::PreMarket => "expected open (last close)",
    };
    out.push_str(&format!(
        "  {}  session {}  position {} -> {}  action {}\n",
        s.date, s.session, s.entering, s.current, s.action
    ));
    out.push_str(&format!("  {open_label} {:.2}\n", l.open));
    out.push_str(&format!(
        "  prior range {:.2} (H {:.2} L {:.2})  buy offset {:.2}  \
         max gain {:.2}  sell offset {:.2}\n",
        l.prev_range, l.prev_high, l.prev_low, l.buy_offset, l.max_gain, l.sell_offset
    ));
    out.push_str(&format!(
        "  K(B) {:.0}  buy {}\n",
        l.k_buy,
        condition(s.buy_condition, l.k_buy)
    ));
    out.push_str(&format!(
        "  K(S) {:.0}  sell {}\n",
        l.k_sell,
        condition(s.sell_condition, l.k_sell)
    ));
    out.push_str(&format!(
        "  prior disparity {} / primary {}  {}\n",
        disparity_text(s.prev_disparity),
        disparity_text(s.prev_primary_disparity),
        if s.disparity_met { "ok" } else { "above ceiling" }
    ));
}

pub fn render(report: &SignalReport) -> String {
    let mut out = String::new();
    render_header(&mut out, report);
    render_latest_bars(&mut out, report);
    render_history(&mut out, report);
    render_overnight(&mut out, report);
    render_breakout(&mut out, &report.tickers.secondary, report.breakout.as_ref());
    out
}
