//! Port traits: the seams between the signal engines and the outside world.

pub mod calendar_port;
pub mod clock_port;
pub mod config_port;
pub mod data_port;
pub mod report_port;
