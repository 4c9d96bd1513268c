//! Clock adapters: the system clock in the trading region's offset, and a
//! fixed clock for reproducible runs.

use crate::domain::error::SignalError;
use crate::ports::clock_port::ClockPort;
use chrono::{DateTime, FixedOffset, Utc};

pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn from_offset_hours(hours: i64) -> Result<Self, SignalError> {
        let offset = i32::try_from(hours * 3600)
            .ok()
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                SignalError::invalid(
                    "market",
                    "utc_offset_hours",
                    format!("{hours} is not a valid UTC offset"),
                )
            })?;
        Ok(Self::new(offset))
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

pub struct FixedClock {
    at: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self { at }
    }

    /// Parses an RFC 3339 timestamp and shifts it into `offset`.
    pub fn parse(raw: &str, offset: FixedOffset) -> Result<Self, chrono::ParseError> {
        Ok(Self::new(
            DateTime::parse_from_rfc3339(raw)?.with_timezone(&offset),
        ))
    }
}

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.at
    }
}
