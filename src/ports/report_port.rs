//! Report rendering port trait.

use crate::domain::error::SignalError;
use crate::domain::pipeline::SignalReport;

/// Port for writing signal reports. `output_path` of `-` means stdout.
pub trait ReportPort {
    fn write(&self, report: &SignalReport, output_path: &str) -> Result<(), SignalError>;
}
