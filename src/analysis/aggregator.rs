//! Label stream aggregation.
//!
//! This module converts the classifier's newline-delimited response
//! body into an ordered frequency distribution and projects it into a
//! chart-ready series.

use crate::models::{ChartSeries, Distribution};

/// Builds a [`Distribution`] from a newline-delimited label stream.
///
/// Each line is trimmed; lines that are empty after trimming are
/// discarded. Surviving labels are counted in first-seen order. Any
/// input is valid, including the empty string.
pub fn aggregate(text: &str) -> Distribution {
    let mut dist = Distribution::new();

    for line in text.split('\n') {
        let label = line.trim();
        if !label.is_empty() {
            dist.record(label);
        }
    }

    dist
}

/// Projects a [`Distribution`] into a [`ChartSeries`].
///
/// Shares are percentages of the distribution total, rounded to one
/// decimal place. An empty distribution yields an empty series; a
/// zero total never causes a division error.
pub fn to_chart_series(dist: &Distribution) -> ChartSeries {
    let total = dist.total();
    let mut series = ChartSeries::default();

    for (label, count) in dist.iter() {
        let share = if total > 0 {
            round_one_decimal(count as f64 / total as f64 * 100.0)
        } else {
            0.0
        };

        series.labels.push(label.to_string());
        series.counts.push(count);
        series.shares.push(share);
    }

    series
}

/// Rounds to one decimal place, matching the chart's percentage labels.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_empty_input() {
        assert!(aggregate("").is_empty());
        assert!(aggregate("   \n\n  ").is_empty());
    }

    #[test]
    fn test_aggregate_counts_and_order() {
        let dist = aggregate("A\nB\nA\nA\nC");

        let pairs: Vec<(&str, u64)> = dist.iter().collect();
        assert_eq!(pairs, vec![("A", 3), ("B", 1), ("C", 1)]);
        assert_eq!(dist.total(), 5);
    }

    #[test]
    fn test_aggregate_trims_whitespace() {
        let dist = aggregate("  Battery \n\tScreen\t\n Battery\n");

        let pairs: Vec<(&str, u64)> = dist.iter().collect();
        assert_eq!(pairs, vec![("Battery", 2), ("Screen", 1)]);
    }

    #[test]
    fn test_aggregate_handles_crlf() {
        // Carriage returns are whitespace and disappear with the trim
        let dist = aggregate("A\r\nB\r\nA\r\n");

        let pairs: Vec<(&str, u64)> = dist.iter().collect();
        assert_eq!(pairs, vec![("A", 2), ("B", 1)]);
    }

    #[test]
    fn test_aggregate_is_case_sensitive() {
        let dist = aggregate("battery\nBattery");
        assert_eq!(dist.len(), 2);
    }

    #[test]
    fn test_aggregate_idempotent() {
        let text = "A\nB\nA\nC\n\nB";
        assert_eq!(aggregate(text), aggregate(text));
    }

    #[test]
    fn test_chart_series_shares() {
        let dist = aggregate("A\nB\nA\nA\nC");
        let series = to_chart_series(&dist);

        assert_eq!(series.labels, vec!["A", "B", "C"]);
        assert_eq!(series.counts, vec![3, 1, 1]);
        assert_eq!(series.shares, vec![60.0, 20.0, 20.0]);
    }

    #[test]
    fn test_chart_series_empty() {
        let series = to_chart_series(&Distribution::new());
        assert!(series.is_empty());
        assert_eq!(series.total(), 0);
    }

    #[test]
    fn test_chart_series_rounding() {
        // 1/3, 1/3, 1/3 rounds each share to 33.3
        let dist = aggregate("X\nY\nZ");
        let series = to_chart_series(&dist);
        assert_eq!(series.shares, vec![33.3, 33.3, 33.3]);
    }

    #[test]
    fn test_shares_sum_near_100() {
        let dist = aggregate("A\nB\nC\nA\nD\nE\nF\nA\nG");
        let series = to_chart_series(&dist);

        let sum: f64 = series.shares.iter().sum();
        let bound = 0.1 * series.len() as f64;
        assert!((sum - 100.0).abs() <= bound, "sum was {}", sum);
    }

    #[test]
    fn test_counts_match_line_count() {
        let text = "A\n\n B \nA\n   \nC\n";
        let non_empty = text.split('\n').filter(|l| !l.trim().is_empty()).count();

        let dist = aggregate(text);
        assert_eq!(dist.total(), non_empty as u64);
    }
}
