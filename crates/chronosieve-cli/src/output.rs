//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use chronosieve_eval::{EvaluationReport, GauntletReport};
use chronosieve_pipeline::{CorpusReport, DocumentStatus};
use chronosieve_store::ConflictEvent;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Conflicts found in one document.
#[derive(Debug, Clone)]
pub struct DocumentConflicts {
    /// Document identifier
    pub document_id: String,
    /// Conflicting links
    pub conflicts: Vec<ConflictEvent>,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the per-sieve totals of a corpus run.
    pub fn format_corpus_report(&self, report: &CorpusReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let documents: Vec<serde_json::Value> = report
                    .documents
                    .iter()
                    .map(|d| {
                        serde_json::json!({
                            "document": d.document_id,
                            "status": d.status,
                            "links": d.links.len(),
                            "conflicts": d.conflicts.len(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "documents": documents,
                    "sieves": report.sieve_totals(),
                }))?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record([
                    "Sieve",
                    "Proposed",
                    "Accepted",
                    "Duplicate",
                    "Rejected",
                    "Invalid",
                    "Closure",
                ]);
                for total in report.sieve_totals() {
                    builder.push_record([
                        total.sieve.clone(),
                        total.proposed.to_string(),
                        total.accepted.to_string(),
                        total.duplicates.to_string(),
                        total.rejected.to_string(),
                        total.invalid.to_string(),
                        total.closure_derived.to_string(),
                    ]);
                }

                let mut lines = vec![self.table(builder)];
                for halted in report.halted() {
                    if let DocumentStatus::Halted { stage, reason } = &halted.status {
                        lines.push(self.warning(&format!(
                            "{} halted at {}: {}",
                            halted.document_id, stage, reason
                        )));
                    }
                }
                lines.push(self.success(&format!(
                    "Annotated {} document(s) with {} link(s)",
                    report.documents.len(),
                    report.total_links()
                )));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format evaluation scores.
    pub fn format_evaluation(&self, report: &EvaluationReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "precision": report.precision(),
                "recall": report.recall(),
                "f1": report.f1(),
                "precision_non_vague": report.precision_non_vague(),
                "details": report,
            }))?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Sieve", "Precision", "Correct", "Scored", "No gold", "Non-VAGUE P"]);
                for stats in &report.sieves {
                    builder.push_record([
                        stats.sieve.clone(),
                        format!("{:.3}", stats.precision()),
                        stats.correct.to_string(),
                        stats.scored().to_string(),
                        stats.no_gold.to_string(),
                        format!("{:.3}", stats.precision_non_vague()),
                    ]);
                }

                let mut lines = vec![
                    self.table(builder),
                    self.info(&format!(
                        "precision {:.3}  recall {:.3}  F1 {:.3}  non-VAGUE precision {:.3}",
                        report.precision(),
                        report.recall(),
                        report.f1(),
                        report.precision_non_vague()
                    )),
                ];
                if let Some((label, score)) = report.majority_baseline() {
                    lines.push(self.info(&format!("Majority baseline ({}): {:.3}", label, score)));
                }
                if !report.confusion.is_empty() {
                    lines.push(report.confusion.render(7));
                }
                for id in &report.unmatched_documents {
                    lines.push(self.warning(&format!("No gold for document {}", id)));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format gauntlet results.
    pub fn format_gauntlet(&self, report: &GauntletReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => {
                if report.entries.is_empty() {
                    return Ok(self.colorize("No sieves configured.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Sieve", "Precision", "Correct", "Scored", "Recall", "Non-VAGUE P"]);
                for entry in &report.entries {
                    let stats = &entry.stats;
                    if let Some(reason) = &entry.unavailable {
                        builder.push_record([
                            stats.sieve.clone(),
                            format!("unavailable: {}", reason),
                            String::new(),
                            String::new(),
                            String::new(),
                            String::new(),
                        ]);
                        continue;
                    }
                    builder.push_record([
                        stats.sieve.clone(),
                        format!("{:.3}", stats.precision()),
                        stats.correct.to_string(),
                        stats.scored().to_string(),
                        format!("{:.3}", entry.recall()),
                        format!("{:.3}", stats.precision_non_vague()),
                    ]);
                }

                let mut lines = vec![self.table(builder)];
                for entry in report.entries.iter().filter(|e| !e.stats.confusion.is_empty()) {
                    lines.push(format!("** {} **", entry.stats.sieve));
                    lines.push(entry.stats.confusion.render(6));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format consistency check results.
    pub fn format_conflicts(&self, documents: &[DocumentConflicts]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = documents
                    .iter()
                    .flat_map(|d| {
                        d.conflicts.iter().map(move |c| {
                            serde_json::json!({
                                "document": d.document_id,
                                "link": c.proposed,
                                "conflicts_with": c.witness,
                            })
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                let total: usize = documents.iter().map(|d| d.conflicts.len()).sum();
                if total == 0 {
                    return Ok(self.success("No conflicting links found"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Document", "Link", "Conflicts with"]);
                for document in documents {
                    for conflict in &document.conflicts {
                        builder.push_record([
                            document.document_id.clone(),
                            conflict.proposed.to_string(),
                            conflict.witness.to_string(),
                        ]);
                    }
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format the sieve listing.
    pub fn format_sieves(&self, available: &[&str], configured: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "available": available,
                "configured": configured,
            }))?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Sieve", "Position"]);
                for name in available {
                    let position = configured
                        .iter()
                        .position(|c| c == name)
                        .map(|p| (p + 1).to_string())
                        .unwrap_or_else(|| "-".to_string());
                    builder.push_record([name.to_string(), position]);
                }

                let mut lines = vec![self.table(builder)];
                for missing in configured.iter().filter(|c| !available.contains(&c.as_str())) {
                    lines.push(self.warning(&format!("Configured sieve '{}' is not registered", missing)));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronosieve_domain::{RelationType, TemporalLink};
    use chronosieve_eval::SieveStats;

    fn conflicts() -> Vec<DocumentConflicts> {
        vec![DocumentConflicts {
            document_id: "d1".to_string(),
            conflicts: vec![ConflictEvent {
                proposed: TemporalLink::new("e2", "e1", RelationType::Before).unwrap(),
                witness: TemporalLink::new("e1", "e2", RelationType::Before).unwrap(),
            }],
        }]
    }

    #[test]
    fn test_conflicts_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_conflicts(&conflicts()).unwrap();
        assert!(output.contains("Conflicts with"));
        assert!(output.contains("e2->e1=BEFORE"));
    }

    #[test]
    fn test_conflicts_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_conflicts(&conflicts()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["document"], "d1");
        assert_eq!(value[0]["link"]["relation"], "BEFORE");
    }

    #[test]
    fn test_no_conflicts() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_conflicts(&[]).unwrap();
        assert_eq!(output, "✓ No conflicting links found");
    }

    #[test]
    fn test_sieve_listing_marks_positions() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let configured = vec!["AllVague".to_string(), "Wordnet".to_string()];
        let output = formatter
            .format_sieves(&["AllVague", "TextOrderBefore"], &configured)
            .unwrap();
        assert!(output.contains("TextOrderBefore"));
        assert!(output.contains("Configured sieve 'Wordnet' is not registered"));
    }

    #[test]
    fn test_evaluation_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut report = EvaluationReport::default();
        report.sieves.push(SieveStats::new("AllVague"));
        let output = formatter.format_evaluation(&report).unwrap();
        assert!(output.contains("AllVague"));
        assert!(output.contains("precision 0.000"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.error("test"), "✗ test");
    }
}
