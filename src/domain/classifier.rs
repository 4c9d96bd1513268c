//! Disparity/breakout classifier for the primary instrument.
//!
//! Each day is classified from its own indicator bar and the previous one:
//!
//! 1. volume below its 3-day average, or a higher low than the previous day:
//!    `long` when disparity is outside the [98, 106] band, else `hold-cash`.
//! 2. otherwise, disparity below 101: `inverse` when disparity moved by at
//!    least 0.5 from the previous day, else `hold-cash`.
//! 3. otherwise `hold-cash`.
//!
//! The first bar of the window has no predecessor and is seeded `hold-cash`.

use crate::domain::indicator::IndicatorBar;
use crate::domain::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierParams {
    /// Trailing indicator bars re-classified on every run.
    pub window: usize,
    pub long_disparity_low: f64,
    pub long_disparity_high: f64,
    pub inverse_disparity_ceiling: f64,
    pub inverse_min_change: f64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            window: 20,
            long_disparity_low: 98.0,
            long_disparity_high: 106.0,
            inverse_disparity_ceiling: 101.0,
            inverse_min_change: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationBar {
    pub bar: IndicatorBar,
    pub signal: Signal,
    pub volume_contraction: bool,
    pub higher_low: bool,
}

pub fn volume_contraction(curr: &IndicatorBar) -> bool {
    curr.bar.volume < curr.volume_ma
}

pub fn higher_low(curr: &IndicatorBar, prev: &IndicatorBar) -> bool {
    curr.bar.low > prev.bar.low
}

/// Classifies one day given the previous day's indicator bar.
pub fn classify_day(curr: &IndicatorBar, prev: &IndicatorBar, params: &ClassifierParams) -> Signal {
    let disparity = curr.disparity;

    if volume_contraction(curr) || higher_low(curr, prev) {
        if disparity < params.long_disparity_low || disparity > params.long_disparity_high {
            Signal::Long
        } else {
            Signal::HoldCash
        }
    } else if disparity < params.inverse_disparity_ceiling {
        let change = disparity - prev.disparity;
        if change.abs() >= params.inverse_min_change {
            Signal::Inverse
        } else {
            Signal::HoldCash
        }
    } else {
        Signal::HoldCash
    }
}

/// The last `window` bars (or all of them when fewer exist).
pub fn trailing_window(bars: &[IndicatorBar], window: usize) -> &[IndicatorBar] {
    &bars[bars.len().saturating_sub(window)..]
}

/// Classifies every bar of `window` left to right.
pub fn classify(window: &[IndicatorBar], params: &ClassifierParams) -> Vec<ClassificationBar> {
    let mut out: Vec<ClassificationBar> = Vec::with_capacity(window.len());

    for (i, curr) in window.iter().enumerate() {
        // Bar 0 has no predecessor and is compared against itself.
        let prev = if i > 0 { &window[i - 1] } else { curr };
        let signal = if i == 0 {
            Signal::HoldCash
        } else {
            classify_day(curr, prev, params)
        };

        tracing::debug!(
            date = %curr.date(),
            disparity = curr.disparity,
            %signal,
            "classified"
        );

        out.push(ClassificationBar {
            bar: curr.clone(),
            signal,
            volume_contraction: volume_contraction(curr),
            higher_low: higher_low(curr, prev),
        });
    }

    out
}
