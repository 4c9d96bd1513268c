//! Moving-average indicators and the warm-up trim.
//!
//! - `IndicatorPoint`: a single point in an indicator time series
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a time series of indicator values, one per input bar
//! - `IndicatorBar`: a daily bar joined with its volume MA, close MA and disparity
//!
//! Every `IndicatorBar` has a full trailing window behind both moving averages;
//! rows still warming up are removed by [`compute_indicators`].

pub mod sma;

use crate::domain::ohlcv::DailyBar;
use chrono::NaiveDate;
use std::fmt;

pub use sma::calculate_sma;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceSource {
    Close,
    Volume,
}

impl PriceSource {
    pub fn extract(self, bar: &DailyBar) -> f64 {
        match self {
            PriceSource::Close => bar.close,
            PriceSource::Volume => bar.volume,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma { source: PriceSource, period: usize },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma { source, period } => {
                let field = match source {
                    PriceSource::Close => "close",
                    PriceSource::Volume => "volume",
                };
                write!(f, "SMA({},{})", field, period)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorParams {
    pub volume_ma_period: usize,
    pub close_ma_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            volume_ma_period: 3,
            close_ma_period: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorBar {
    pub bar: DailyBar,
    pub volume_ma: f64,
    pub close_ma: f64,
    /// close / close_ma * 100
    pub disparity: f64,
}

impl IndicatorBar {
    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }
}

/// Joins each bar with its moving averages and drops the warm-up rows.
///
/// For a gap-free series this removes exactly the first `close_ma_period - 1`
/// bars (assuming the close window is the longer one).
pub fn compute_indicators(bars: &[DailyBar], params: &IndicatorParams) -> Vec<IndicatorBar> {
    let volume_ma = calculate_sma(bars, params.volume_ma_period, PriceSource::Volume);
    let close_ma = calculate_sma(bars, params.close_ma_period, PriceSource::Close);

    bars.iter()
        .zip(volume_ma.values.iter().zip(close_ma.values.iter()))
        .filter(|(_, (v, c))| v.valid && c.valid && c.value != 0.0)
        .map(|(bar, (v, c))| IndicatorBar {
            bar: bar.clone(),
            volume_ma: v.value,
            close_ma: c.value,
            disparity: bar.close / c.value * 100.0,
        })
        .collect()
}
