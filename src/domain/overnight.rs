//! Overnight upgrade pass.
//!
//! A `hold-cash` day whose predecessor was not `long` becomes `overnight`
//! when the following session's upside excursion from its open (UR) beats
//! both that session's downside excursion (LR today) and the candidate day's
//! own downside excursion (LR yesterday).

use crate::domain::classifier::ClassificationBar;
use crate::domain::ohlcv::DailyBar;
use crate::domain::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OvernightCheck {
    /// today.high - today.open
    pub upside_range: f64,
    /// today.open - today.low
    pub downside_today: f64,
    /// yesterday.open - yesterday.low
    pub downside_yesterday: f64,
    pub met: bool,
}

impl OvernightCheck {
    pub fn downside_max(&self) -> f64 {
        self.downside_today.max(self.downside_yesterday)
    }
}

pub fn check_overnight(today: &DailyBar, yesterday: &DailyBar) -> OvernightCheck {
    let upside_range = today.upside_range();
    let downside_today = today.downside_range();
    let downside_yesterday = yesterday.downside_range();
    OvernightCheck {
        upside_range,
        downside_today,
        downside_yesterday,
        met: upside_range > downside_today.max(downside_yesterday),
    }
}

/// Upgrades qualifying days in two spans of the window: the leading
/// `lookback` days after the seed day, and the last `lookback` days. The final
/// day is never a candidate (it has no following session yet).
///
/// Eligibility is judged on the classifier output, so the result does not
/// depend on the order candidates are visited in.
pub fn upgrade_overnight(
    classified: Vec<ClassificationBar>,
    lookback: usize,
) -> Vec<ClassificationBar> {
    let n = classified.len();
    if n < 3 {
        return classified;
    }

    let before: Vec<Signal> = classified.iter().map(|c| c.signal).collect();
    let leading_end = lookback.min(n - 2);
    let trailing_start = n.saturating_sub(lookback).max(leading_end + 1);
    let mut out = classified;

    for i in (1..=leading_end).chain(trailing_start..n - 1) {
        if before[i] != Signal::HoldCash || before[i - 1] == Signal::Long {
            continue;
        }
        let check = check_overnight(&out[i + 1].bar.bar, &out[i].bar.bar);
        if check.met {
            tracing::debug!(
                date = %out[i].bar.date(),
                ur = check.upside_range,
                lr_max = check.downside_max(),
                "upgraded to overnight"
            );
            out[i].signal = Signal::Overnight;
        }
    }

    out
}
