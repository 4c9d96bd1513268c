//! Range-breakout position tracker for the secondary instrument.
//!
//! Two states, `cash` and `holding`, seeded `cash`. Each day derives a buy
//! level and a sell level from its open and the previous day's range:
//!
//! ```text
//! K_buy  = ceil(open + min(0.4 * prev_range, max_gain_10))
//! K_sell = floor(open - 0.3 * prev_range)
//! ```
//!
//! where `max_gain_10` is the largest `close - open` of up to ten prior days
//! (down-days count as 0). A day buys when its range touches `K_buy`, and
//! sells when its range touches `K_sell` and the previous day's disparity of
//! both instruments is at most 106.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

use crate::domain::indicator::IndicatorBar;
use crate::domain::ohlcv::DailyBar;
use crate::domain::session::Session;
use crate::domain::signal::HoldingState;

/// Disparity used when the primary series has no bar on the needed date.
/// Larger than any ceiling, so a sell can never pass on a missing lookup.
pub const MISSING_DISPARITY: f64 = 999.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerParams {
    pub buy_range_factor: f64,
    pub sell_range_factor: f64,
    pub max_gain_lookback: usize,
    pub disparity_ceiling: f64,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            buy_range_factor: 0.4,
            sell_range_factor: 0.3,
            max_gain_lookback: 10,
            disparity_ceiling: 106.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakoutLevels {
    /// Session open (or its proxy before the open).
    pub open: f64,
    pub prev_high: f64,
    pub prev_low: f64,
    pub prev_range: f64,
    pub buy_offset: f64,
    pub max_gain: f64,
    pub sell_offset: f64,
    pub k_buy: f64,
    pub k_sell: f64,
}

/// Largest same-day gain over `[end - lookback, end)`, 0 when empty.
pub fn max_gain(bars: &[IndicatorBar], end: usize, lookback: usize) -> f64 {
    let end = end.min(bars.len());
    bars[end.saturating_sub(lookback)..end]
        .iter()
        .map(|b| b.bar.day_gain())
        .fold(0.0, f64::max)
}

/// Breakout levels for the session at `index` opening at `open`.
///
/// `index` may equal `bars.len()` to price the session after the last bar.
/// Returns `None` for index 0 (no previous range).
pub fn breakout_levels(
    bars: &[IndicatorBar],
    index: usize,
    open: f64,
    params: &TrackerParams,
) -> Option<BreakoutLevels> {
    if index == 0 || index > bars.len() {
        return None;
    }
    let gain = max_gain(bars, index, params.max_gain_lookback);
    Some(levels_from(&bars[index - 1].bar, open, gain, params))
}

fn levels_from(
    prev: &DailyBar,
    open: f64,
    max_gain: f64,
    params: &TrackerParams,
) -> BreakoutLevels {
    let prev_range = prev.range();
    let buy_offset = prev_range * params.buy_range_factor;
    let sell_offset = prev_range * params.sell_range_factor;

    BreakoutLevels {
        open,
        prev_high: prev.high,
        prev_low: prev.low,
        prev_range,
        buy_offset,
        max_gain,
        sell_offset,
        k_buy: (open + buy_offset.min(max_gain)).ceil(),
        k_sell: (open - sell_offset).floor(),
    }
}

/// Date-keyed disparity lookup for cross-series checks.
pub fn disparity_index(bars: &[IndicatorBar]) -> HashMap<NaiveDate, f64> {
    bars.iter().map(|b| (b.date(), b.disparity)).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionBar {
    pub bar: IndicatorBar,
    pub position: HoldingState,
    /// `None` on the seed day.
    pub levels: Option<BreakoutLevels>,
    pub buy_touched: bool,
    pub sell_touched: bool,
    /// Previous day's disparity of the secondary instrument.
    pub prev_disparity: f64,
    /// Previous day's disparity of the primary instrument, matched by date.
    pub prev_primary_disparity: f64,
    pub disparity_ok: bool,
}

impl PositionBar {
    pub fn can_buy(&self) -> bool {
        self.buy_touched
    }

    pub fn can_sell(&self) -> bool {
        self.sell_touched && self.disparity_ok
    }
}

fn next_state(prev: HoldingState, can_buy: bool, can_sell: bool) -> HoldingState {
    match prev {
        HoldingState::Cash if can_buy => HoldingState::Holding,
        HoldingState::Holding if can_sell => HoldingState::Cash,
        unchanged => unchanged,
    }
}

/// Runs the tracker over the full secondary history.
pub fn track_positions(
    secondary: &[IndicatorBar],
    primary: &[IndicatorBar],
    params: &TrackerParams,
) -> Vec<PositionBar> {
    let primary_disparity = disparity_index(primary);
    let mut out: Vec<PositionBar> = Vec::with_capacity(secondary.len());

    for (i, curr) in secondary.iter().enumerate() {
        let Some(levels) = breakout_levels(secondary, i, curr.bar.open, params) else {
            out.push(PositionBar {
                bar: curr.clone(),
                position: HoldingState::Cash,
                levels: None,
                buy_touched: false,
                sell_touched: false,
                prev_disparity: MISSING_DISPARITY,
                prev_primary_disparity: MISSING_DISPARITY,
                disparity_ok: false,
            });
            continue;
        };

        let prev = &secondary[i - 1];
        let prev_disparity = prev.disparity;
        let prev_primary_disparity = primary_disparity
            .get(&prev.date())
            .copied()
            .unwrap_or(MISSING_DISPARITY);
        let disparity_ok = prev_disparity <= params.disparity_ceiling
            && prev_primary_disparity <= params.disparity_ceiling;

        let buy_touched = curr.bar.spans(levels.k_buy);
        let sell_touched = curr.bar.spans(levels.k_sell);
        let prev_position = out[i - 1].position;
        let position = next_state(prev_position, buy_touched, sell_touched && disparity_ok);

        if position != prev_position {
            tracing::debug!(
                date = %curr.date(),
                from = %prev_position,
                to = %position,
                k_buy = levels.k_buy,
                k_sell = levels.k_sell,
                "tracker transition"
            );
        }

        out.push(PositionBar {
            bar: curr.clone(),
            position,
            levels: Some(levels),
            buy_touched,
            sell_touched,
            prev_disparity,
            prev_primary_disparity,
            disparity_ok,
        });
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionStatus {
    Met,
    NotMet,
    /// Session not open yet.
    Pending,
}

impl ConditionStatus {
    fn evaluated(met: bool) -> Self {
        if met {
            ConditionStatus::Met
        } else {
            ConditionStatus::NotMet
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConditionStatus::Met => "met",
            ConditionStatus::NotMet => "not met",
            ConditionStatus::Pending => "pending",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerAction {
    Buy,
    Sell,
    None,
    BuyPending,
    SellPending,
    /// Holding, but a prior disparity is above the ceiling so no sell is possible.
    DisparityBlocked,
}

impl fmt::Display for TrackerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrackerAction::Buy => "buy",
            TrackerAction::Sell => "sell",
            TrackerAction::None => "none",
            TrackerAction::BuyPending => "buy pending",
            TrackerAction::SellPending => "sell pending",
            TrackerAction::DisparityBlocked => "disparity not met",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakoutSummary {
    pub session: Session,
    /// Date of the most recent bar the summary is built from.
    pub date: NaiveDate,
    pub levels: BreakoutLevels,
    /// Position the action is keyed on: the day before the latest bar.
    pub entering: HoldingState,
    /// Position after the latest evaluated bar.
    pub current: HoldingState,
    pub buy_condition: ConditionStatus,
    pub sell_condition: ConditionStatus,
    pub prev_disparity: f64,
    pub prev_primary_disparity: f64,
    pub disparity_met: bool,
    pub action: TrackerAction,
}

/// Summarises the tracker for display.
///
/// In session the latest bar is today and its levels are evaluated. Before
/// the open, the next session is priced from the latest close and range, the
/// gain window stops short of the latest bar, and every price condition is
/// pending. The pending action, the entering position and the prior
/// disparities all come from the day before the latest bar.
pub fn summarize(
    secondary: &[IndicatorBar],
    primary: &[IndicatorBar],
    positions: &[PositionBar],
    session: Session,
    params: &TrackerParams,
) -> Option<BreakoutSummary> {
    if positions.len() < 2 || positions.len() != secondary.len() {
        return None;
    }
    let last = positions.last()?;

    match session {
        Session::Open => {
            let levels = last.levels?;
            let entering = positions[positions.len() - 2].position;
            let action = match entering {
                HoldingState::Cash if last.can_buy() => TrackerAction::Buy,
                HoldingState::Holding if last.can_sell() => TrackerAction::Sell,
                _ => TrackerAction::None,
            };
            Some(BreakoutSummary {
                session,
                date: last.bar.date(),
                levels,
                entering,
                current: last.position,
                buy_condition: ConditionStatus::evaluated(last.buy_touched),
                sell_condition: ConditionStatus::evaluated(last.sell_touched),
                prev_disparity: last.prev_disparity,
                prev_primary_disparity: last.prev_primary_disparity,
                disparity_met: last.disparity_ok,
                action,
            })
        }
        Session::PreMarket => {
            let n = secondary.len();
            let gain = max_gain(secondary, n - 1, params.max_gain_lookback);
            let levels = levels_from(&last.bar.bar, last.bar.bar.close, gain, params);
            let day_before = &positions[n - 2];
            let prev_disparity = day_before.bar.disparity;
            let prev_primary_disparity = disparity_index(primary)
                .get(&day_before.bar.date())
                .copied()
                .unwrap_or(MISSING_DISPARITY);
            let disparity_met = prev_disparity <= params.disparity_ceiling
                && prev_primary_disparity <= params.disparity_ceiling;
            let action = match day_before.position {
                HoldingState::Cash => TrackerAction::BuyPending,
                HoldingState::Holding if disparity_met => TrackerAction::SellPending,
                HoldingState::Holding => TrackerAction::DisparityBlocked,
            };
            Some(BreakoutSummary {
                session,
                date: last.bar.date(),
                levels,
                entering: day_before.position,
                current: last.position,
                buy_condition: ConditionStatus::Pending,
                sell_condition: ConditionStatus::Pending,
                prev_disparity,
                prev_primary_disparity,
                disparity_met,
                action,
            })
        }
    }
}
