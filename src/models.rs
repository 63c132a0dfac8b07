//! Data models for the aspect classification client.
//!
//! This module contains the core data structures used throughout
//! the application for representing label distributions, chart
//! series, and reports.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// A single label with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    /// The trimmed category label.
    pub label: String,
    /// Number of non-empty lines carrying this label.
    pub count: u64,
}

/// An insertion-ordered mapping from category label to occurrence count.
///
/// Labels appear in the order they were first seen in the input; this
/// order is visible in chart legends and report tables. A distribution
/// is built fresh from each server response and never merged across
/// requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Distribution {
    entries: Vec<LabelCount>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Distribution {
    /// Creates an empty distribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the count for a label, inserting it with count 1 on
    /// first occurrence.
    pub fn record(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&pos) => self.entries[pos].count += 1,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push(LabelCount {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    /// Returns the count for a label, if present.
    #[allow(dead_code)] // Lookup utility
    pub fn count(&self, label: &str) -> Option<u64> {
        self.index.get(label).map(|&pos| self.entries[pos].count)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no labels were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts. Equals the number of non-empty trimmed lines
    /// in the source text.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Iterates over (label, count) pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|e| (e.label.as_str(), e.count))
    }
}

impl PartialEq for Distribution {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

/// A rendering-ready projection of a [`Distribution`].
///
/// Labels, counts, and percentage shares are parallel sequences aligned
/// by index, in the same first-seen order as the source distribution.
/// Shares are rounded independently to one decimal place and need not
/// sum to exactly 100.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Category labels in first-seen order.
    pub labels: Vec<String>,
    /// Occurrence counts aligned with `labels`.
    pub counts: Vec<u64>,
    /// Percentage shares aligned with `labels`, one decimal place.
    pub shares: Vec<f64>,
}

/// One (label, count, share) triple from a chart series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice<'a> {
    pub label: &'a str,
    pub count: u64,
    pub share: f64,
}

impl ChartSeries {
    /// Number of slices in the series.
    #[allow(dead_code)] // Utility accessor
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the series has no slices.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Sum of all raw counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Iterates over aligned (label, count, share) slices.
    pub fn slices(&self) -> impl Iterator<Item = ChartSlice<'_>> {
        self.labels
            .iter()
            .zip(&self.counts)
            .zip(&self.shares)
            .map(|((label, &count), &share)| ChartSlice {
                label,
                count,
                share,
            })
    }
}

/// Where the classified label stream came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSource {
    /// A reviews text file uploaded for classification.
    File,
    /// A microphone recording uploaded for transcription and classification.
    Microphone,
    /// A local file already containing predicted labels.
    Local,
}

impl std::fmt::Display for LabelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelSource::File => write!(f, "file upload"),
            LabelSource::Microphone => write!(f, "microphone"),
            LabelSource::Local => write!(f, "local labels file"),
        }
    }
}

/// Metadata about one classification run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Human-readable name of the input (file path or "microphone").
    pub input: String,
    /// How the labels were obtained.
    pub source: LabelSource,
    /// Classifier endpoint, if the network was involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Date and time of the run.
    pub date: DateTime<Utc>,
    /// Total number of labels (non-empty response lines).
    pub total_labels: u64,
    /// Number of distinct labels.
    pub distinct_labels: usize,
    /// Duration of the run in seconds.
    pub duration_seconds: f64,
}

/// A complete aspect distribution report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Metadata about the run.
    pub metadata: ReportMetadata,
    /// The chart series derived from the server's label stream.
    pub series: ChartSeries,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_insertion_order() {
        let mut dist = Distribution::new();
        dist.record("Battery");
        dist.record("Screen");
        dist.record("Battery");

        let labels: Vec<&str> = dist.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Battery", "Screen"]);
        assert_eq!(dist.count("Battery"), Some(2));
        assert_eq!(dist.count("Screen"), Some(1));
        assert_eq!(dist.count("Camera"), None);
    }

    #[test]
    fn test_distribution_total() {
        let mut dist = Distribution::new();
        dist.record("A");
        dist.record("B");
        dist.record("A");
        assert_eq!(dist.total(), 3);
        assert_eq!(dist.len(), 2);
    }

    #[test]
    fn test_empty_distribution() {
        let dist = Distribution::new();
        assert!(dist.is_empty());
        assert_eq!(dist.total(), 0);
    }

    #[test]
    fn test_distribution_equality() {
        let mut a = Distribution::new();
        a.record("X");
        a.record("Y");

        let mut b = Distribution::new();
        b.record("X");
        b.record("Y");

        assert_eq!(a, b);

        // Same labels in a different first-seen order are not equal
        let mut c = Distribution::new();
        c.record("Y");
        c.record("X");
        assert_ne!(a, c);
    }

    #[test]
    fn test_chart_series_slices() {
        let series = ChartSeries {
            labels: vec!["A".to_string(), "B".to_string()],
            counts: vec![3, 1],
            shares: vec![75.0, 25.0],
        };

        let slices: Vec<_> = series.slices().collect();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, "A");
        assert_eq!(slices[0].count, 3);
        assert_eq!(slices[0].share, 75.0);
        assert_eq!(series.total(), 4);
    }
}
