//! Check command implementation.

use crate::cli::CheckArgs;
use crate::corpus::Corpus;
use crate::error::{CliError, Result};
use crate::output::{DocumentConflicts, Formatter};
use chronosieve_domain::Document;
use chronosieve_pipeline::PipelineConfig;
use chronosieve_store::{check_consistency, ClosureRules, LinkStore};
use tracing::debug;

/// Origin stamped on links derived while checking
const CHECK_ORIGIN: &str = "check";

/// Execute the check command.
///
/// Fails with [`CliError::Inconsistent`] when any document holds
/// contradicting links.
pub fn execute_check(args: CheckArgs, config: &PipelineConfig, formatter: &Formatter) -> Result<()> {
    let corpus = Corpus::load(&args.input)?;
    let rules = config.load_closure_rules()?;

    let mut found = Vec::new();
    for document in &corpus.documents {
        let conflicts = check_document(document, config, rules.as_ref())?;
        if !conflicts.conflicts.is_empty() {
            found.push(conflicts);
        }
    }

    println!("{}", formatter.format_conflicts(&found)?);

    let total: usize = found.iter().map(|d| d.conflicts.len()).sum();
    if total > 0 {
        return Err(CliError::Inconsistent(total));
    }
    Ok(())
}

/// Find contradicting links in one document.
///
/// With closure rules, links implied by the document's own links are also
/// checked against them.
pub fn check_document(
    document: &Document,
    config: &PipelineConfig,
    rules: Option<&ClosureRules>,
) -> Result<DocumentConflicts> {
    let mut conflicts = check_consistency(&document.links);

    if let Some(rules) = rules {
        let mut store = LinkStore::new();
        for link in &document.links {
            store.propose(link.canonicalized(config.mode));
        }
        let closure = store.expand_closure(rules, config.mode, CHECK_ORIGIN)?;
        debug!(
            "{}: closure derived {} links, {} conflicts",
            document.id,
            closure.derived.len(),
            closure.conflicts.len()
        );
        conflicts.extend(closure.conflicts);
    }

    Ok(DocumentConflicts {
        document_id: document.id.clone(),
        conflicts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronosieve_domain::{RelationType, TemporalLink};

    fn document(links: Vec<TemporalLink>) -> Document {
        let mut document = Document::new("d1");
        document.add_links(links);
        document
    }

    #[test]
    fn test_direct_conflict() {
        let doc = document(vec![
            TemporalLink::new("e1", "e2", RelationType::Before).unwrap(),
            TemporalLink::new("e2", "e1", RelationType::Before).unwrap(),
        ]);
        let result = check_document(&doc, &PipelineConfig::default(), None).unwrap();
        assert_eq!(result.conflicts.len(), 1);
    }

    #[test]
    fn test_closure_conflict_needs_rules() {
        let doc = document(vec![
            TemporalLink::new("e1", "e2", RelationType::Before).unwrap(),
            TemporalLink::new("e2", "e3", RelationType::Before).unwrap(),
            TemporalLink::new("e3", "e1", RelationType::Before).unwrap(),
        ]);
        let config = PipelineConfig::with_closure();

        let plain = check_document(&doc, &config, None).unwrap();
        assert!(plain.conflicts.is_empty());

        let rules = ClosureRules::standard();
        let closed = check_document(&doc, &config, Some(&rules)).unwrap();
        assert!(!closed.conflicts.is_empty());
        assert!(closed.conflicts.iter().all(|c| c.proposed.is_closure()));
    }
}
