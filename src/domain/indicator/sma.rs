//! Simple Moving Average over a chosen bar field.
//!
//! O(n) sliding window: the running sum gains the newest value and drops the
//! value leaving the window.
//! SMA(n)[i] = (P[i-n+1] + ... + P[i]) / n
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, PriceSource};
use crate::domain::ohlcv::DailyBar;

pub fn calculate_sma(bars: &[DailyBar], period: usize, source: PriceSource) -> IndicatorSeries {
    let indicator_type = IndicatorType::Sma { source, period };
    if period == 0 || bars.is_empty() {
        return IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        };
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut window_sum: f64 = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        window_sum += source.extract(bar);
        if i >= period {
            window_sum -= source.extract(&bars[i - period]);
        }

        let valid = i + 1 >= period;
        let value = if valid {
            window_sum / period as f64
        } else {
            0.0
        };

        values.push(IndicatorPoint {
            date: bar.date,
            valid,
            value,
        });
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(closes: &[f64], volumes: &[f64]) -> Vec<DailyBar> {
        closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&close, &volume))| DailyBar {
                ticker: "TEST".into(),
                date: NaiveDate::from_ymd_opt(2025, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume,
            })
            .collect()
    }

    #[test]
    fn sma_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0], &[1.0; 4]);
        let series = calculate_sma(&bars, 3, PriceSource::Close);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[3].valid);
    }

    #[test]
    fn sma_sliding_window_close() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0], &[1.0; 4]);
        let series = calculate_sma(&bars, 3, PriceSource::Close);

        assert_relative_eq!(series.values[2].value, 20.0);
        assert_relative_eq!(series.values[3].value, 30.0);
    }

    #[test]
    fn sma_over_volume() {
        let bars = make_bars(&[1.0; 4], &[300.0, 600.0, 900.0, 0.0]);
        let series = calculate_sma(&bars, 3, PriceSource::Volume);

        assert_relative_eq!(series.values[2].value, 600.0);
        assert_relative_eq!(series.values[3].value, 500.0);
    }

    #[test]
    fn sma_period_1_is_identity() {
        let bars = make_bars(&[10.0, 20.0], &[1.0; 2]);
        let series = calculate_sma(&bars, 1, PriceSource::Close);

        assert!(series.values.iter().all(|p| p.valid));
        assert_relative_eq!(series.values[1].value, 20.0);
    }

    #[test]
    fn sma_keeps_dates() {
        let bars = make_bars(&[10.0, 20.0], &[1.0; 2]);
        let series = calculate_sma(&bars, 2, PriceSource::Close);
        assert_eq!(series.values[1].date, bars[1].date);
        assert_eq!(
            series.indicator_type,
            IndicatorType::Sma {
                source: PriceSource::Close,
                period: 2
            }
        );
    }

    #[test]
    fn sma_empty_and_zero_period() {
        assert!(calculate_sma(&[], 3, PriceSource::Close).values.is_empty());
        let bars = make_bars(&[10.0], &[1.0]);
        assert!(calculate_sma(&bars, 0, PriceSource::Close).values.is_empty());
    }
}
