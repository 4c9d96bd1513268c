//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::clock::{FixedClock, SystemClock};
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_history::CsvHistoryAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::holiday_calendar::HolidayCalendar;
use crate::adapters::text_report::TextReportAdapter;
use crate::domain::classifier::ClassifierParams;
use crate::domain::config_validation::validate_config;
use crate::domain::error::SignalError;
use crate::domain::indicator::IndicatorParams;
use crate::domain::pipeline::{run_pipeline, SignalConfig, SignalReport, Tickers};
use crate::domain::tracker::TrackerParams;
use crate::logging::init_logging;
use crate::ports::clock_port::ClockPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "lvsignal",
    about = "Daily signals for leveraged and inverse instruments"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute today's signals and print the report
    Signal {
        #[arg(short, long)]
        config: PathBuf,
        /// Evaluate as of this RFC 3339 timestamp instead of the system clock
        #[arg(long)]
        at: Option<String>,
        /// Report destination; `-` is stdout
        #[arg(short, long, default_value = "-")]
        output: String,
        /// Also write the signal history as CSV
        #[arg(long)]
        history_csv: Option<PathBuf>,
        #[arg(short, long)]
        verbose: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for the configured tickers
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Signal {
            config,
            at,
            output,
            history_csv,
            verbose,
        } => {
            init_logging(verbose);
            run_signal(&config, at.as_deref(), &output, history_csv.as_deref())
        }
        Command::Validate { config } => {
            init_logging(false);
            run_validate(&config)
        }
        Command::Info { config, ticker } => {
            init_logging(false);
            run_info(&config, ticker.as_deref())
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SignalError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn get_usize(config: &dyn ConfigPort, section: &str, key: &str, default: usize) -> usize {
    usize::try_from(config.get_int(section, key, default as i64)).unwrap_or(default)
}

fn get_ticker(config: &dyn ConfigPort, key: &str, default: String) -> String {
    config
        .get_string("tickers", key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
}

/// Builds the run parameters; unset keys fall back to the defaults.
pub fn build_signal_config(config: &dyn ConfigPort) -> Result<SignalConfig, SignalError> {
    let defaults = SignalConfig::default();
    let classifier = ClassifierParams::default();
    let indicators = IndicatorParams::default();
    let tracker = TrackerParams::default();

    let open_hour = u32::try_from(config.get_int("market", "open_hour", 9))
        .ok()
        .filter(|h| *h < 24)
        .ok_or_else(|| SignalError::invalid("market", "open_hour", "must be between 0 and 23"))?;

    Ok(SignalConfig {
        tickers: Tickers {
            leverage: get_ticker(config, "leverage", defaults.tickers.leverage),
            inverse: get_ticker(config, "inverse", defaults.tickers.inverse),
            secondary: get_ticker(config, "secondary", defaults.tickers.secondary),
        },
        indicators: IndicatorParams {
            volume_ma_period: get_usize(
                config,
                "classifier",
                "volume_ma_period",
                indicators.volume_ma_period,
            ),
            close_ma_period: get_usize(
                config,
                "classifier",
                "close_ma_period",
                indicators.close_ma_period,
            ),
        },
        classifier: ClassifierParams {
            window: get_usize(config, "classifier", "window", classifier.window),
            long_disparity_low: config.get_double(
                "classifier",
                "long_disparity_low",
                classifier.long_disparity_low,
            ),
            long_disparity_high: config.get_double(
                "classifier",
                "long_disparity_high",
                classifier.long_disparity_high,
            ),
            inverse_disparity_ceiling: config.get_double(
                "classifier",
                "inverse_disparity_ceiling",
                classifier.inverse_disparity_ceiling,
            ),
            inverse_min_change: config.get_double(
                "classifier",
                "inverse_min_change",
                classifier.inverse_min_change,
            ),
        },
        tracker: TrackerParams {
            buy_range_factor: config.get_double(
                "tracker",
                "buy_range_factor",
                tracker.buy_range_factor,
            ),
            sell_range_factor: config.get_double(
                "tracker",
                "sell_range_factor",
                tracker.sell_range_factor,
            ),
            max_gain_lookback: get_usize(
                config,
                "tracker",
                "max_gain_lookback",
                tracker.max_gain_lookback,
            ),
            disparity_ceiling: config.get_double(
                "tracker",
                "disparity_ceiling",
                tracker.disparity_ceiling,
            ),
        },
        lookback_days: config.get_int("data", "lookback_days", defaults.lookback_days),
        min_bars: get_usize(config, "classifier", "min_bars", defaults.min_bars),
        overnight_lookback: get_usize(
            config,
            "classifier",
            "overnight_lookback",
            defaults.overnight_lookback,
        ),
        history_days: get_usize(config, "classifier", "history_days", defaults.history_days),
        open_hour,
    })
}

fn csv_dir(config: &dyn ConfigPort) -> Result<PathBuf, SignalError> {
    config
        .get_string("data", "csv_dir")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| SignalError::ConfigMissing {
            section: "data".into(),
            key: "csv_dir".into(),
        })
}

/// Loads, validates and runs the pipeline for one configuration.
pub fn run_signal_pipeline(
    config: &dyn ConfigPort,
    at: Option<&str>,
) -> Result<SignalReport, SignalError> {
    validate_config(config)?;
    let signal_config = build_signal_config(config)?;
    let data = CsvAdapter::new(csv_dir(config)?);
    let calendar = HolidayCalendar::from_config(config)?;
    tracing::info!(
        leverage = %signal_config.tickers.leverage,
        inverse = %signal_config.tickers.inverse,
        secondary = %signal_config.tickers.secondary,
        holidays = calendar.holiday_count(),
        "config loaded"
    );

    let system = SystemClock::from_offset_hours(config.get_int("market", "utc_offset_hours", 9))?;
    let now = match at {
        Some(raw) => FixedClock::parse(raw, system.now().timezone())
            .map_err(|e| SignalError::invalid("cli", "at", format!("{raw:?}: {e}")))?
            .now(),
        None => system.now(),
    };
    tracing::info!(%now, "evaluating");

    run_pipeline(&data, &calendar, now, &signal_config)
}

fn run_signal(
    config_path: &Path,
    at: Option<&str>,
    output: &str,
    history_csv: Option<&Path>,
) -> ExitCode {
    tracing::info!(path = %config_path.display(), "loading config");
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let report = match run_signal_pipeline(&config, at) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if let Err(e) = TextReportAdapter::new().write(&report, output) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let history_path = history_csv
        .map(|p| p.display().to_string())
        .or_else(|| config.get_string("report", "history_csv"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(path) = history_path {
        if let Err(e) = CsvHistoryAdapter::new().write(&report, &path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let signal_config = match build_signal_config(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = HolidayCalendar::from_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let t = &signal_config.tickers;
    eprintln!(
        "  tickers:    leverage {}, inverse {}, secondary {}",
        t.leverage, t.inverse, t.secondary
    );
    let c = &signal_config.classifier;
    eprintln!(
        "  classifier: window {}, long band {}..{}, inverse ceiling {}, min change {}%",
        c.window,
        c.long_disparity_low,
        c.long_disparity_high,
        c.inverse_disparity_ceiling,
        c.inverse_min_change
    );
    let k = &signal_config.tracker;
    eprintln!(
        "  tracker:    buy {} x range, sell {} x range, {}-day gain, disparity <= {}",
        k.buy_range_factor, k.sell_range_factor, k.max_gain_lookback, k.disparity_ceiling
    );
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

/// Tickers for `info`: the override, or all three configured tickers.
pub fn resolve_tickers(ticker_override: Option<&str>, tickers: &Tickers) -> Vec<String> {
    match ticker_override.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => vec![t.to_string()],
        None => vec![
            tickers.leverage.clone(),
            tickers.inverse.clone(),
            tickers.secondary.clone(),
        ],
    }
}

fn run_info(config_path: &Path, ticker: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let prepared = csv_dir(&config).and_then(|dir| Ok((dir, build_signal_config(&config)?)));
    let (dir, signal_config) = match prepared {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let adapter = CsvAdapter::new(dir);
    for t in resolve_tickers(ticker, &signal_config.tickers) {
        match adapter.get_data_range(&t) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{}: {} bars, {} to {}", t, count, min_date, max_date);
            }
            Ok(None) => {
                eprintln!("{}: no data found", t);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", t, e);
            }
        }
    }
    ExitCode::SUCCESS
}
