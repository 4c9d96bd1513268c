//! Order action derivation, signal streaks and the header decision.

use chrono::NaiveDate;

use crate::domain::classifier::ClassificationBar;
use crate::domain::signal::{Action, Position, Signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionPair {
    pub buy: Action,
    pub sell: Action,
}

impl ActionPair {
    pub const NONE: ActionPair = ActionPair {
        buy: Action::None,
        sell: Action::None,
    };

    const fn new(buy: Action, sell: Action) -> Self {
        Self { buy, sell }
    }
}

/// Buy/sell pair for moving from `prev` to `today`.
///
/// A literal `long` followed by `overnight` yields `(long, long)`: the
/// position is carried, not re-entered.
pub fn action_for(prev: Signal, today: Signal) -> ActionPair {
    if prev == Signal::Long && today == Signal::Overnight {
        return ActionPair::new(Action::Long, Action::Long);
    }

    match (prev.effective(), today.effective()) {
        (Position::Cash, Position::Long) => ActionPair::new(Action::Long, Action::None),
        (Position::Cash, Position::Inverse) => ActionPair::new(Action::Inverse, Action::None),
        (Position::Long, Position::Cash) => ActionPair::new(Action::None, Action::Long),
        (Position::Inverse, Position::Cash) => ActionPair::new(Action::None, Action::Inverse),
        (Position::Long, Position::Inverse) => ActionPair::new(Action::Inverse, Action::Long),
        (Position::Inverse, Position::Long) => ActionPair::new(Action::Long, Action::Inverse),
        _ => ActionPair::NONE,
    }
}

/// Length of the run of identical literal signals ending at `end`.
pub fn streak(classified: &[ClassificationBar], end: usize) -> usize {
    let Some(target) = classified.get(end).map(|c| c.signal) else {
        return 0;
    };
    classified[..=end]
        .iter()
        .rev()
        .take_while(|c| c.signal == target)
        .count()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Bar date the decision was made on.
    pub date: NaiveDate,
    pub prev_signal: Signal,
    pub signal: Signal,
    pub streak: usize,
    pub actions: ActionPair,
}

/// Decision for the day at `index`, using the day before it as "yesterday".
///
/// Index 0 is compared against itself. Returns `None` past the end.
pub fn decide(classified: &[ClassificationBar], index: usize) -> Option<Decision> {
    let today = classified.get(index)?;
    let prev = &classified[index.saturating_sub(1)];
    Some(Decision {
        date: today.bar.date(),
        prev_signal: prev.signal,
        signal: today.signal,
        streak: streak(classified, index),
        actions: action_for(prev.signal, today.signal),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderDecision {
    pub decision: Decision,
    /// Set when an overnight call on the second-to-last day is shown in
    /// place of the latest day.
    pub deferred: bool,
}

/// Decision shown in the report header.
///
/// An `overnight` on the second-to-last day is displayed one day late: the
/// header is rebuilt as if that day were today.
pub fn header_decision(classified: &[ClassificationBar]) -> Option<HeaderDecision> {
    let last = classified.len().checked_sub(1)?;
    if last >= 2 && classified[last - 1].signal == Signal::Overnight {
        return decide(classified, last - 1).map(|decision| HeaderDecision {
            decision,
            deferred: true,
        });
    }
    decide(classified, last).map(|decision| HeaderDecision {
        decision,
        deferred: false,
    })
}
