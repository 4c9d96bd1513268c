//! Pre-market / in-session framing from the trading-region clock.

use chrono::{DateTime, FixedOffset, Timelike};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    /// Before the open; today's bar does not exist yet.
    PreMarket,
    Open,
}

impl Session {
    pub fn at(now: DateTime<FixedOffset>, open_hour: u32) -> Self {
        if now.hour() < open_hour {
            Session::PreMarket
        } else {
            Session::Open
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Session::PreMarket => "pre-market",
            Session::Open => "open",
        })
    }
}
