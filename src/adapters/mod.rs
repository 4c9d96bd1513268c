//! Concrete adapter implementations for ports.

pub mod clock;
pub mod csv_adapter;
pub mod csv_history;
pub mod file_config_adapter;
pub mod holiday_calendar;
pub mod text_report;
