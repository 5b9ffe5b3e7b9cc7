//! Per-document store of accepted links
//!
//! Holds at most one accepted relation per unordered endpoint pair. The
//! first relation accepted for a pair wins; later conflicting proposals are
//! reported with the accepted link as witness and never replace it.

use crate::closure::{compose_links, ClosureRules};
use crate::error::StoreError;
use chronosieve_domain::{equivalent, PairKey, RelationMode, TemporalLink};
use std::collections::HashMap;
use tracing::{debug, info};

/// What happened to a proposed link
#[derive(Debug, Clone, PartialEq)]
pub enum ProposalOutcome {
    /// The pair was new and the link is now accepted
    Accepted,
    /// An equivalent link was already accepted
    Duplicate,
    /// A different relation was already accepted for the pair
    Rejected {
        /// The accepted link the proposal lost to
        witness: TemporalLink,
    },
}

impl ProposalOutcome {
    /// True for [`ProposalOutcome::Accepted`]
    pub fn is_accepted(&self) -> bool {
        matches!(self, ProposalOutcome::Accepted)
    }

    /// True for [`ProposalOutcome::Rejected`]
    pub fn is_rejected(&self) -> bool {
        matches!(self, ProposalOutcome::Rejected { .. })
    }
}

/// A proposal that lost to an already accepted link
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictEvent {
    /// The link that was proposed
    pub proposed: TemporalLink,
    /// The accepted link it conflicts with
    pub witness: TemporalLink,
}

/// Links produced by one closure expansion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClosureReport {
    /// Derived links that were accepted, in derivation order
    pub derived: Vec<TemporalLink>,
    /// Derived links that conflicted with an accepted link
    pub conflicts: Vec<ConflictEvent>,
}

/// Accepted links of one document
#[derive(Debug, Clone, Default)]
pub struct LinkStore {
    links: Vec<TemporalLink>,
    index: HashMap<PairKey, usize>,
}

impl LinkStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Propose a link against the accepted set.
    ///
    /// Accepted links are visible to the very next proposal.
    pub fn propose(&mut self, link: TemporalLink) -> ProposalOutcome {
        let key = link.ordered_pair_key();
        match self.index.get(&key) {
            None => {
                debug!("Accepted {}", link);
                self.index.insert(key, self.links.len());
                self.links.push(link);
                ProposalOutcome::Accepted
            }
            Some(&i) if equivalent(&self.links[i], &link) => ProposalOutcome::Duplicate,
            Some(&i) => {
                let witness = self.links[i].clone();
                info!("Rejected {} (conflicts with {})", link, witness);
                ProposalOutcome::Rejected { witness }
            }
        }
    }

    /// Accepted links in insertion order
    pub fn accepted_links(&self) -> &[TemporalLink] {
        &self.links
    }

    /// True if a link is accepted for the pair, in either order
    pub fn contains_pair(&self, e1: &str, e2: &str) -> bool {
        self.index.contains_key(&PairKey::new(e1, e2))
    }

    /// The accepted link for the pair, in either order
    pub fn get(&self, e1: &str, e2: &str) -> Option<&TemporalLink> {
        self.index
            .get(&PairKey::new(e1, e2))
            .map(|&i| &self.links[i])
    }

    /// Number of accepted links
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True if nothing is accepted
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Forget every accepted link
    pub fn clear(&mut self) {
        self.links.clear();
        self.index.clear();
    }

    /// Consume the store, returning accepted links in insertion order
    pub fn into_links(self) -> Vec<TemporalLink> {
        self.links
    }

    /// Derive new links from accepted ones until nothing new follows.
    ///
    /// Every pair of accepted links sharing one endpoint is composed with
    /// `rules`. Derived links are canonicalized into `mode`, tagged as
    /// closure links with `origin`, and proposed like any other link, so a
    /// derived link that contradicts an accepted one is reported as a
    /// conflict and dropped.
    pub fn expand_closure(
        &mut self,
        rules: &ClosureRules,
        mode: RelationMode,
        origin: &str,
    ) -> Result<ClosureReport, StoreError> {
        let mut report = ClosureReport::default();
        if rules.is_empty() {
            return Ok(report);
        }

        // Each round only composes pairs that involve a link added in the
        // previous round.
        let mut seen = 0;
        loop {
            let size = self.links.len();
            for j in seen..size {
                for i in 0..j {
                    let Some((a, c, relation)) =
                        compose_links(rules, &self.links[i], &self.links[j])
                    else {
                        continue;
                    };
                    let mut derived = TemporalLink::derived(a, c, relation)?.with_origin(origin);
                    derived.canonicalize(mode);

                    match self.propose(derived.clone()) {
                        ProposalOutcome::Accepted => report.derived.push(derived),
                        ProposalOutcome::Duplicate => {}
                        ProposalOutcome::Rejected { witness } => {
                            report.conflicts.push(ConflictEvent {
                                proposed: derived,
                                witness,
                            });
                        }
                    }
                }
            }
            if self.links.len() == size {
                break;
            }
            seen = size;
        }

        info!(
            "Closure derived {} links ({} conflicts)",
            report.derived.len(),
            report.conflicts.len()
        );
        Ok(report)
    }
}

/// Every pair of links in `links` that covers the same endpoints with
/// non-equivalent relations.
///
/// Unlike [`LinkStore::propose`], nothing is dropped: each conflicting pair
/// is reported once, the earlier link as witness.
pub fn check_consistency(links: &[TemporalLink]) -> Vec<ConflictEvent> {
    let mut by_pair: HashMap<PairKey, Vec<&TemporalLink>> = HashMap::new();
    let mut conflicts = Vec::new();

    for link in links {
        let earlier = by_pair.entry(link.ordered_pair_key()).or_default();
        for witness in earlier.iter() {
            if link.conflicts_with(witness) {
                conflicts.push(ConflictEvent {
                    proposed: link.clone(),
                    witness: (*witness).clone(),
                });
            }
        }
        earlier.push(link);
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronosieve_domain::RelationType;

    fn link(a: &str, b: &str, r: RelationType) -> TemporalLink {
        TemporalLink::new(a, b, r).unwrap()
    }

    #[test]
    fn test_first_accepted_wins() {
        let mut store = LinkStore::new();
        let first = link("A", "B", RelationType::Before);
        assert_eq!(store.propose(first.clone()), ProposalOutcome::Accepted);

        let outcome = store.propose(link("A", "B", RelationType::After));
        assert_eq!(outcome, ProposalOutcome::Rejected { witness: first });
        assert_eq!(store.get("B", "A").unwrap().relation(), RelationType::Before);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_inverse_restatement_is_duplicate() {
        let mut store = LinkStore::new();
        store.propose(link("A", "B", RelationType::Before));
        let outcome = store.propose(link("B", "A", RelationType::After));
        assert_eq!(outcome, ProposalOutcome::Duplicate);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = LinkStore::new();
        store.propose(link("c", "d", RelationType::Before));
        store.propose(link("a", "b", RelationType::Includes));
        store.propose(link("b", "c", RelationType::Vague));
        let pairs: Vec<(&str, &str)> = store
            .accepted_links()
            .iter()
            .map(|l| (l.endpoint1(), l.endpoint2()))
            .collect();
        assert_eq!(pairs, vec![("c", "d"), ("a", "b"), ("b", "c")]);
    }

    #[test]
    fn test_contains_pair_either_order() {
        let mut store = LinkStore::new();
        store.propose(link("e1", "e2", RelationType::Before));
        assert!(store.contains_pair("e1", "e2"));
        assert!(store.contains_pair("e2", "e1"));
        assert!(!store.contains_pair("e1", "e3"));
    }

    #[test]
    fn test_clear() {
        let mut store = LinkStore::new();
        store.propose(link("e1", "e2", RelationType::Before));
        store.clear();
        assert!(store.is_empty());
        assert!(!store.contains_pair("e1", "e2"));
        assert_eq!(
            store.propose(link("e1", "e2", RelationType::After)),
            ProposalOutcome::Accepted
        );
    }

    #[test]
    fn test_empty_rules_are_a_no_op() {
        let mut store = LinkStore::new();
        store.propose(link("a", "b", RelationType::Before));
        store.propose(link("b", "c", RelationType::Before));
        let report = store
            .expand_closure(&ClosureRules::empty(), RelationMode::Full, "closure")
            .unwrap();
        assert!(report.derived.is_empty());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_closure_conflict_is_reported() {
        let mut store = LinkStore::new();
        store.propose(link("a", "b", RelationType::Before));
        store.propose(link("b", "c", RelationType::Before));
        store.propose(link("c", "a", RelationType::Before));
        let report = store
            .expand_closure(&ClosureRules::standard(), RelationMode::Full, "closure")
            .unwrap();
        assert!(!report.conflicts.is_empty());
        assert!(report.conflicts.iter().all(|c| c.proposed.is_closure()));
        let kept = store.get("a", "c").unwrap();
        assert_eq!((kept.endpoint1(), kept.relation()), ("c", RelationType::Before));
        assert!(!kept.is_closure());
    }

    #[test]
    fn test_check_consistency() {
        let links = vec![
            link("a", "b", RelationType::Before),
            link("b", "a", RelationType::After),
            link("b", "a", RelationType::Before),
            link("c", "d", RelationType::Vague),
        ];
        let conflicts = check_consistency(&links);
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].proposed, links[2]);
    }
}
