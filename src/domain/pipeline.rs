//! Signal pipeline: fetch, indicators, classifier, overnight pass, actions,
//! tracker.
//!
//! Every run recomputes all derived series from freshly fetched bars; nothing
//! is carried over between runs.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

use crate::domain::action::{self, Decision, HeaderDecision};
use crate::domain::calendar::next_business_day;
use crate::domain::classifier::{self, ClassificationBar, ClassifierParams};
use crate::domain::error::SignalError;
use crate::domain::indicator::{compute_indicators, IndicatorParams};
use crate::domain::ohlcv::DailyBar;
use crate::domain::overnight::{check_overnight, upgrade_overnight, OvernightCheck};
use crate::domain::session::Session;
use crate::domain::signal::Signal;
use crate::domain::tracker::{self, BreakoutSummary, TrackerParams};
use crate::ports::calendar_port::CalendarPort;
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tickers {
    /// Primary instrument; the classifier runs on it.
    pub leverage: String,
    /// Instrument an `inverse` action trades.
    pub inverse: String,
    /// Instrument driven by the breakout tracker.
    pub secondary: String,
}

impl Default for Tickers {
    fn default() -> Self {
        Self {
            leverage: "122630".into(),
            inverse: "252670".into(),
            secondary: "233740".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub tickers: Tickers,
    pub indicators: IndicatorParams,
    pub classifier: ClassifierParams,
    pub tracker: TrackerParams,
    /// Calendar days of history fetched before the clock's date.
    pub lookback_days: i64,
    /// Minimum primary bars; fewer halts the run.
    pub min_bars: usize,
    pub overnight_lookback: usize,
    pub history_days: usize,
    /// Local hour the session opens; earlier runs use pre-market framing.
    pub open_hour: u32,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            tickers: Tickers::default(),
            indicators: IndicatorParams::default(),
            classifier: ClassifierParams::default(),
            tracker: TrackerParams::default(),
            lookback_days: 60,
            min_bars: 22,
            overnight_lookback: 6,
            history_days: 6,
            open_hour: 9,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarketData {
    pub leverage: Vec<DailyBar>,
    pub inverse: Vec<DailyBar>,
    pub secondary: Vec<DailyBar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub date: NaiveDate,
    /// Session the signal applies to: the next business day after `date`.
    pub applies_to: NaiveDate,
    pub signal: Signal,
    pub close: f64,
    pub disparity: f64,
    pub volume_contraction: bool,
    pub higher_low: bool,
}

#[derive(Debug, Clone)]
pub struct SignalReport {
    pub generated_at: DateTime<FixedOffset>,
    pub session: Session,
    /// Next business day after the clock's local date.
    pub header_date: NaiveDate,
    pub tickers: Tickers,
    pub header: HeaderDecision,
    pub latest: Decision,
    /// Most recent first.
    pub history: Vec<HistoryRecord>,
    /// The overnight test on the two most recent primary bars.
    pub overnight_check: OvernightCheck,
    pub breakout: Option<BreakoutSummary>,
    /// Disparity band of the long rule, for gauges.
    pub long_band: (f64, f64),
    pub leverage_last: DailyBar,
    pub inverse_last: Option<DailyBar>,
    pub secondary_last: Option<DailyBar>,
}

/// Fetches all three instruments. Any provider error stops the run.
pub fn load_bars(
    data: &dyn DataPort,
    tickers: &Tickers,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<MarketData, SignalError> {
    let fetch = |ticker: &str| -> Result<Vec<DailyBar>, SignalError> {
        let bars = data.fetch_bars(ticker, start_date, end_date)?;
        tracing::info!(ticker, bars = bars.len(), %start_date, %end_date, "fetched bars");
        Ok(bars)
    };

    Ok(MarketData {
        leverage: fetch(&tickers.leverage)?,
        inverse: fetch(&tickers.inverse)?,
        secondary: fetch(&tickers.secondary)?,
    })
}

/// Classifier, overnight pass and action derivation over the trailing window.
pub fn evaluate_primary(
    bars: &[DailyBar],
    config: &SignalConfig,
) -> Result<Vec<ClassificationBar>, SignalError> {
    if bars.is_empty() {
        return Err(SignalError::NoData {
            ticker: config.tickers.leverage.clone(),
        });
    }
    if bars.len() < config.min_bars {
        return Err(SignalError::InsufficientData {
            ticker: config.tickers.leverage.clone(),
            bars: bars.len(),
            minimum: config.min_bars,
        });
    }

    let indicators = compute_indicators(bars, &config.indicators);
    let window = classifier::trailing_window(&indicators, config.classifier.window);
    let classified = classifier::classify(window, &config.classifier);
    Ok(upgrade_overnight(classified, config.overnight_lookback))
}

fn history(
    classified: &[ClassificationBar],
    days: usize,
    calendar: &dyn CalendarPort,
) -> Vec<HistoryRecord> {
    let shown = days.min(classified.len().saturating_sub(1));
    classified[classified.len() - shown..]
        .iter()
        .rev()
        .map(|c| HistoryRecord {
            date: c.bar.date(),
            applies_to: next_business_day(c.bar.date(), calendar),
            signal: c.signal,
            close: c.bar.bar.close,
            disparity: c.bar.disparity,
            volume_contraction: c.volume_contraction,
            higher_low: c.higher_low,
        })
        .collect()
}

pub fn run_pipeline(
    data: &dyn DataPort,
    calendar: &dyn CalendarPort,
    now: DateTime<FixedOffset>,
    config: &SignalConfig,
) -> Result<SignalReport, SignalError> {
    let today = now.date_naive();
    let start_date = today - Duration::days(config.lookback_days);
    let end_date = today + Duration::days(1);

    // Stage 1: fetch
    let market = load_bars(data, &config.tickers, start_date, end_date)?;

    // Stage 2: primary instrument
    let classified = evaluate_primary(&market.leverage, config)?;
    let n = market.leverage.len();
    let insufficient = || SignalError::InsufficientData {
        ticker: config.tickers.leverage.clone(),
        bars: n,
        minimum: config.min_bars.max(config.indicators.close_ma_period + 1),
    };
    if n < 2 {
        return Err(insufficient());
    }
    let latest = classified
        .len()
        .checked_sub(1)
        .and_then(|last| action::decide(&classified, last))
        .ok_or_else(insufficient)?;
    let header = action::header_decision(&classified).ok_or_else(insufficient)?;
    tracing::info!(
        signal = %latest.signal,
        streak = latest.streak,
        buy = %latest.actions.buy,
        sell = %latest.actions.sell,
        deferred = header.deferred,
        "primary decision"
    );

    let overnight_check = check_overnight(&market.leverage[n - 1], &market.leverage[n - 2]);

    // Stage 3: secondary instrument
    let session = Session::at(now, config.open_hour);
    let primary_indicators = compute_indicators(&market.leverage, &config.indicators);
    let secondary_indicators = compute_indicators(&market.secondary, &config.indicators);
    let positions =
        tracker::track_positions(&secondary_indicators, &primary_indicators, &config.tracker);
    let breakout = tracker::summarize(
        &secondary_indicators,
        &primary_indicators,
        &positions,
        session,
        &config.tracker,
    );
    match &breakout {
        Some(s) => tracing::info!(
            position = %s.current,
            action = %s.action,
            k_buy = s.levels.k_buy,
            k_sell = s.levels.k_sell,
            %session,
            "secondary breakout"
        ),
        None => tracing::warn!(
            ticker = %config.tickers.secondary,
            bars = market.secondary.len(),
            "not enough secondary data for breakout levels"
        ),
    }

    Ok(SignalReport {
        generated_at: now,
        session,
        header_date: next_business_day(today, calendar),
        tickers: config.tickers.clone(),
        header,
        latest,
        history: history(&classified, config.history_days, calendar),
        overnight_check,
        breakout,
        long_band: (
            config.classifier.long_disparity_low,
            config.classifier.long_disparity_high,
        ),
        leverage_last: market.leverage[n - 1].clone(),
        inverse_last: market.inverse.last().cloned(),
        secondary_last: market.secondary.last().cloned(),
    })
}
