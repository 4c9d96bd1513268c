//! Trading-region clock port trait.

use chrono::{DateTime, FixedOffset};

pub trait ClockPort {
    /// Current time in the trading region's fixed offset.
    fn now(&self) -> DateTime<FixedOffset>;
}
