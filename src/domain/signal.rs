//! Categorical signal, position and action types.

use std::fmt;

/// Daily classification of the primary instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    #[default]
    HoldCash,
    Long,
    Inverse,
    /// A hold-cash day upgraded because the next session broke out upward.
    Overnight,
}

impl Signal {
    /// Position implied by the signal; `Overnight` counts as `Long`.
    pub fn effective(self) -> Position {
        match self {
            Signal::HoldCash => Position::Cash,
            Signal::Long | Signal::Overnight => Position::Long,
            Signal::Inverse => Position::Inverse,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Signal::HoldCash => "hold-cash",
            Signal::Long => "long",
            Signal::Inverse => "inverse",
            Signal::Overnight => "overnight",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Cash,
    Long,
    Inverse,
}

/// Instrument to buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    #[default]
    None,
    Long,
    Inverse,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::None => "none",
            Action::Long => "long",
            Action::Inverse => "inverse",
        })
    }
}

/// Position state of the secondary instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HoldingState {
    #[default]
    Cash,
    Holding,
}

impl fmt::Display for HoldingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HoldingState::Cash => "cash",
            HoldingState::Holding => "holding",
        })
    }
}
