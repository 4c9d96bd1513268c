//! Configuration validation.
//!
//! Validates every config field before a run. Missing keys fall back to the
//! defaults of [`SignalConfig`]; present keys must hold sensible values.

use crate::domain::error::SignalError;
use crate::domain::pipeline::SignalConfig;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SignalError> {
    validate_data(config)?;
    validate_tickers(config)?;
    validate_classifier(config)?;
    validate_tracker(config)?;
    validate_market(config)?;
    Ok(())
}

fn validate_data(config: &dyn ConfigPort) -> Result<(), SignalError> {
    match config.get_string("data", "csv_dir") {
        Some(s) if !s.trim().is_empty() => {}
        _ => {
            return Err(SignalError::ConfigMissing {
                section: "data".to_string(),
                key: "csv_dir".to_string(),
            })
        }
    }

    let defaults = SignalConfig::default();
    if config.get_int("data", "lookback_days", defaults.lookback_days) < 1 {
        return Err(SignalError::invalid(
            "data",
            "lookback_days",
            "lookback_days must be at least 1",
        ));
    }
    Ok(())
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), SignalError> {
    for key in ["leverage", "inverse", "secondary"] {
        if let Some(s) = config.get_string("tickers", key) {
            if s.trim().is_empty() {
                return Err(SignalError::invalid("tickers", key, "ticker must not be empty"));
            }
        }
    }
    Ok(())
}

fn require_at_least(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
    minimum: i64,
) -> Result<i64, SignalError> {
    let value = config.get_int(section, key, default as i64);
    if value < minimum {
        return Err(SignalError::invalid(
            section,
            key,
            format!("{key} must be at least {minimum}"),
        ));
    }
    Ok(value)
}

fn validate_classifier(config: &dyn ConfigPort) -> Result<(), SignalError> {
    let defaults = SignalConfig::default();

    require_at_least(config, "classifier", "window", defaults.classifier.window, 2)?;
    require_at_least(
        config,
        "classifier",
        "volume_ma_period",
        defaults.indicators.volume_ma_period,
        1,
    )?;
    let close_period = require_at_least(
        config,
        "classifier",
        "close_ma_period",
        defaults.indicators.close_ma_period,
        1,
    )?;
    require_at_least(
        config,
        "classifier",
        "overnight_lookback",
        defaults.overnight_lookback,
        1,
    )?;
    require_at_least(config, "classifier", "history_days", defaults.history_days, 1)?;
    require_at_least(
        config,
        "classifier",
        "min_bars",
        defaults.min_bars,
        close_period + 2,
    )?;

    let low = config.get_double(
        "classifier",
        "long_disparity_low",
        defaults.classifier.long_disparity_low,
    );
    let high = config.get_double(
        "classifier",
        "long_disparity_high",
        defaults.classifier.long_disparity_high,
    );
    if low <= 0.0 || low >= high {
        return Err(SignalError::invalid(
            "classifier",
            "long_disparity_low",
            "long_disparity_low must be positive and below long_disparity_high",
        ));
    }

    let ceiling = config.get_double(
        "classifier",
        "inverse_disparity_ceiling",
        defaults.classifier.inverse_disparity_ceiling,
    );
    if ceiling <= 0.0 {
        return Err(SignalError::invalid(
            "classifier",
            "inverse_disparity_ceiling",
            "inverse_disparity_ceiling must be positive",
        ));
    }

    let min_change = config.get_double(
        "classifier",
        "inverse_min_change",
        defaults.classifier.inverse_min_change,
    );
    if min_change < 0.0 {
        return Err(SignalError::invalid(
            "classifier",
            "inverse_min_change",
            "inverse_min_change must be non-negative",
        ));
    }
    Ok(())
}

fn validate_tracker(config: &dyn ConfigPort) -> Result<(), SignalError> {
    let defaults = SignalConfig::default().tracker;

    for (key, default) in [
        ("buy_range_factor", defaults.buy_range_factor),
        ("sell_range_factor", defaults.sell_range_factor),
    ] {
        if config.get_double("tracker", key, default) < 0.0 {
            return Err(SignalError::invalid(
                "tracker",
                key,
                format!("{key} must be non-negative"),
            ));
        }
    }

    require_at_least(
        config,
        "tracker",
        "max_gain_lookback",
        defaults.max_gain_lookback,
        1,
    )?;

    if config.get_double("tracker", "disparity_ceiling", defaults.disparity_ceiling) <= 0.0 {
        return Err(SignalError::invalid(
            "tracker",
            "disparity_ceiling",
            "disparity_ceiling must be positive",
        ));
    }
    Ok(())
}

fn validate_market(config: &dyn ConfigPort) -> Result<(), SignalError> {
    let offset = config.get_int("market", "utc_offset_hours", 9);
    if !(-12..=14).contains(&offset) {
        return Err(SignalError::invalid(
            "market",
            "utc_offset_hours",
            "utc_offset_hours must be between -12 and 14",
        ));
    }

    let hour = config.get_int("market", "open_hour", 9);
    if !(0..=23).contains(&hour) {
        return Err(SignalError::invalid(
            "market",
            "open_hour",
            "open_hour must be between 0 and 23",
        ));
    }

    for holiday in config.get_list("market", "holidays") {
        if NaiveDate::parse_from_str(&holiday, "%Y-%m-%d").is_err() {
            return Err(SignalError::invalid(
                "market",
                "holidays",
                format!("invalid holiday {holiday}, expected YYYY-MM-DD"),
            ));
        }
    }
    Ok(())
}
