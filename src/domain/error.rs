//! Domain error types.

/// Top-level error type for lvsignal.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient data for {ticker}: have {bars} bars, need {minimum}")]
    InsufficientData {
        ticker: String,
        bars: usize,
        minimum: usize,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SignalError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        SignalError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&SignalError> for std::process::ExitCode {
    fn from(err: &SignalError) -> Self {
        let code: u8 = match err {
            SignalError::Io(_) => 1,
            SignalError::ConfigParse { .. }
            | SignalError::ConfigMissing { .. }
            | SignalError::ConfigInvalid { .. } => 2,
            SignalError::DataSource { .. } => 3,
            SignalError::Report { .. } => 4,
            SignalError::NoData { .. } | SignalError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message() {
        let err = SignalError::InsufficientData {
            ticker: "122630".into(),
            bars: 10,
            minimum: 22,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data for 122630: have 10 bars, need 22"
        );
    }

    #[test]
    fn invalid_helper_fills_fields() {
        let err = SignalError::invalid("tracker", "buy_range_factor", "must be positive");
        assert!(matches!(
            err,
            SignalError::ConfigInvalid { ref section, ref key, .. }
                if section == "tracker" && key == "buy_range_factor"
        ));
    }

    #[test]
    fn exit_codes_by_category() {
        use std::process::ExitCode;
        let code = |err: &SignalError| format!("{:?}", ExitCode::from(err));
        let missing = SignalError::ConfigMissing {
            section: "data".into(),
            key: "csv_dir".into(),
        };
        assert_eq!(code(&missing), format!("{:?}", ExitCode::from(2)));
        let source = SignalError::DataSource {
            reason: "boom".into(),
        };
        assert_eq!(code(&source), format!("{:?}", ExitCode::from(3)));
        let no_data = SignalError::NoData {
            ticker: "X".into(),
        };
        assert_eq!(code(&no_data), format!("{:?}", ExitCode::from(5)));
        let io = SignalError::Io(std::io::Error::other("disk"));
        assert_eq!(code(&io), format!("{:?}", ExitCode::from(1)));
    }
}
