//! Confusion matrix over gold and predicted labels

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

/// Counts of (gold, predicted) label pairs
///
/// Rows are gold labels, columns are predicted labels. Both axes cover the
/// sorted union of every label seen on either side, so a label that was only
/// ever predicted still gets a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix<L: Ord> {
    cells: BTreeMap<L, BTreeMap<L, usize>>,
    #[serde(skip)]
    labels: BTreeSet<L>,
}

impl<L: Ord> Default for ConfusionMatrix<L> {
    fn default() -> Self {
        Self {
            cells: BTreeMap::new(),
            labels: BTreeSet::new(),
        }
    }
}

impl<L: Ord + Clone> ConfusionMatrix<L> {
    /// Empty matrix
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one datum
    pub fn record(&mut self, gold: L, predicted: L) {
        self.labels.insert(gold.clone());
        self.labels.insert(predicted.clone());
        *self
            .cells
            .entry(gold)
            .or_default()
            .entry(predicted)
            .or_insert(0) += 1;
    }

    /// Count for a (gold, predicted) pair
    pub fn count(&self, gold: &L, predicted: &L) -> usize {
        self.cells
            .get(gold)
            .and_then(|row| row.get(predicted))
            .copied()
            .unwrap_or(0)
    }

    /// Sorted union of gold and predicted labels
    pub fn labels(&self) -> Vec<&L> {
        self.labels.iter().collect()
    }

    /// Number of datums counted
    pub fn total(&self) -> usize {
        self.cells.values().flat_map(|row| row.values()).sum()
    }

    /// Number of datums on the diagonal
    pub fn agreements(&self) -> usize {
        self.cells
            .iter()
            .filter_map(|(gold, row)| row.get(gold))
            .sum()
    }

    /// True if nothing was counted
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Add every count from `other`
    pub fn merge(&mut self, other: &ConfusionMatrix<L>) {
        for (gold, row) in &other.cells {
            for (predicted, count) in row {
                self.labels.insert(gold.clone());
                self.labels.insert(predicted.clone());
                *self
                    .cells
                    .entry(gold.clone())
                    .or_default()
                    .entry(predicted.clone())
                    .or_insert(0) += count;
            }
        }
    }
}

impl<L: Ord + Clone + Display> ConfusionMatrix<L> {
    /// Render as a text grid, labels cut to `cell_width` characters
    pub fn render(&self, cell_width: usize) -> String {
        let width = cell_width.max(1);
        let cut = |label: &L| -> String { label.to_string().chars().take(width).collect() };

        let mut header = format!("{:>w$}", "gold\\guess", w = width.max(10));
        for label in &self.labels {
            header.push_str(&format!(" {:>w$}", cut(label), w = width));
        }

        let mut lines = vec![header];
        for gold in &self.labels {
            let mut line = format!("{:>w$}", cut(gold), w = width.max(10));
            for predicted in &self.labels {
                line.push_str(&format!(" {:>w$}", self.count(gold, predicted), w = width));
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_labels() {
        let mut matrix = ConfusionMatrix::new();
        matrix.record("BEFORE".to_string(), "BEFORE".to_string());
        matrix.record("BEFORE".to_string(), "VAGUE".to_string());
        matrix.record("AFTER".to_string(), "BEFORE".to_string());
        matrix.record("BEFORE".to_string(), "BEFORE".to_string());

        assert_eq!(matrix.count(&"BEFORE".to_string(), &"BEFORE".to_string()), 2);
        assert_eq!(matrix.count(&"AFTER".to_string(), &"BEFORE".to_string()), 1);
        assert_eq!(matrix.count(&"VAGUE".to_string(), &"BEFORE".to_string()), 0);
        assert_eq!(matrix.labels(), vec!["AFTER", "BEFORE", "VAGUE"]);
        assert_eq!(matrix.total(), 4);
        assert_eq!(matrix.agreements(), 2);
    }

    #[test]
    fn test_works_with_any_ordered_label() {
        let mut matrix: ConfusionMatrix<u8> = ConfusionMatrix::new();
        matrix.record(3, 1);
        assert_eq!(matrix.labels(), vec![&1, &3]);
        assert_eq!(matrix.count(&3, &1), 1);
    }

    #[test]
    fn test_merge() {
        let mut a = ConfusionMatrix::new();
        a.record("x", "y");
        let mut b = ConfusionMatrix::new();
        b.record("x", "y");
        b.record("z", "z");
        a.merge(&b);
        assert_eq!(a.count(&"x", &"y"), 2);
        assert_eq!(a.count(&"z", &"z"), 1);
        assert_eq!(a.labels().len(), 3);
    }

    #[test]
    fn test_render_grid() {
        let mut matrix = ConfusionMatrix::new();
        matrix.record("BEFORE", "AFTER");
        let text = matrix.render(6);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("AFTER"));
        assert!(lines[0].contains("BEFORE"));
        assert!(lines[2].trim_start().starts_with("BEFORE"));
        assert!(lines[2].trim_end().ends_with('0'));
        assert!(lines[2].contains(" 1 "));
    }

    #[test]
    fn test_empty_matrix() {
        let matrix: ConfusionMatrix<String> = ConfusionMatrix::new();
        assert!(matrix.is_empty());
        assert_eq!(matrix.total(), 0);
        assert_eq!(matrix.render(5).lines().count(), 1);
    }
}
