//! Core domain types and logic.

pub mod action;
pub mod calendar;
pub mod classifier;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod ohlcv;
pub mod overnight;
pub mod pipeline;
pub mod session;
pub mod signal;
pub mod tracker;
