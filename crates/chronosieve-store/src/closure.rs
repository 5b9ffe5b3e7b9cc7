//! Transitive closure rules
//!
//! A rule `r1 r2 => r` says that `A r1 B` and `B r2 C` imply `A r C`.
//! Rules only need to be written in one direction: a missing composition is
//! looked up through the inverse identity
//! `compose(r1, r2) = inverse(compose(inverse(r2), inverse(r1)))`.

use crate::error::StoreError;
use chronosieve_domain::{RelationType, TemporalLink};
use std::collections::HashMap;

/// Composition table used by [`LinkStore::expand_closure`](crate::LinkStore::expand_closure)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClosureRules {
    table: HashMap<(RelationType, RelationType), RelationType>,
}

impl ClosureRules {
    /// No rules. Closure derives nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Chaining of before, includes, simultaneous, begins and ends
    pub fn standard() -> Self {
        use RelationType as R;

        let mut rules = Self::empty();
        for (first, second) in [
            (R::Before, R::Before),
            (R::Before, R::IBefore),
            (R::IBefore, R::Before),
            (R::IBefore, R::IBefore),
            (R::Before, R::Includes),
            (R::Before, R::BegunBy),
            (R::Before, R::EndedBy),
            (R::Before, R::Begins),
            (R::Before, R::Simultaneous),
            (R::IsIncluded, R::Before),
            (R::Begins, R::Before),
            (R::Ends, R::Before),
            (R::EndedBy, R::Before),
            (R::Simultaneous, R::Before),
            (R::IBefore, R::Includes),
            (R::IsIncluded, R::IBefore),
        ] {
            rules.add(first, second, R::Before);
        }
        for (first, second) in [
            (R::Includes, R::Includes),
            (R::Includes, R::BegunBy),
            (R::Includes, R::EndedBy),
            (R::Includes, R::Simultaneous),
            (R::Simultaneous, R::Includes),
            (R::BegunBy, R::Includes),
            (R::EndedBy, R::Includes),
        ] {
            rules.add(first, second, R::Includes);
        }
        rules.add(R::Simultaneous, R::Simultaneous, R::Simultaneous);
        for r in [R::IBefore, R::Begins, R::Ends] {
            rules.add(R::Simultaneous, r, r);
            rules.add(r, R::Simultaneous, r);
        }
        rules.add(R::Begins, R::Begins, R::Begins);
        rules.add(R::Ends, R::Ends, R::Ends);
        rules
    }

    /// Parse a rule file.
    ///
    /// One `FIRST SECOND RESULT` rule per line, relation labels as accepted
    /// by [`RelationType::normalize_from_label`]. Blank lines and lines
    /// starting with `#` or `//` are skipped.
    pub fn parse(text: &str) -> Result<Self, StoreError> {
        let mut rules = Self::empty();
        for (n, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 3 {
                return Err(StoreError::RuleFile {
                    line: n + 1,
                    reason: format!("expected 3 relations, found {}", parts.len()),
                });
            }
            let parse = |label: &str| {
                RelationType::normalize_from_label(label).map_err(|e| StoreError::RuleFile {
                    line: n + 1,
                    reason: e.to_string(),
                })
            };
            rules.add(parse(parts[0])?, parse(parts[1])?, parse(parts[2])?);
        }
        Ok(rules)
    }

    /// Add or replace a rule
    pub fn add(&mut self, first: RelationType, second: RelationType, result: RelationType) {
        self.table.insert((first, second), result);
    }

    /// Number of rules written explicitly
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True if there are no rules
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Relation implied by `A first B` and `B second C`, if any
    pub fn compose(&self, first: RelationType, second: RelationType) -> Option<RelationType> {
        self.table.get(&(first, second)).copied().or_else(|| {
            self.table
                .get(&(second.inverse(), first.inverse()))
                .map(|r| r.inverse())
        })
    }
}

/// Compose two links that share exactly one endpoint.
///
/// Returns the new pair `(A, C)` and its relation.
pub(crate) fn compose_links(
    rules: &ClosureRules,
    link1: &TemporalLink,
    link2: &TemporalLink,
) -> Option<(String, String, RelationType)> {
    let (x, y, r) = (link1.endpoint1(), link1.endpoint2(), link1.relation());
    let (u, v, s) = (link2.endpoint1(), link2.endpoint2(), link2.relation());

    // Rotate both links so they read A -> B and B -> C.
    let (a, c, r1, r2) = if y == u {
        (x, v, r, s)
    } else if y == v {
        (x, u, r, s.inverse())
    } else if x == u {
        (y, v, r.inverse(), s)
    } else if x == v {
        (y, u, r.inverse(), s.inverse())
    } else {
        return None;
    };
    if a == c {
        return None;
    }

    rules
        .compose(r1, r2)
        .map(|relation| (a.to_string(), c.to_string(), relation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_direct() {
        let rules = ClosureRules::standard();
        assert_eq!(
            rules.compose(RelationType::Before, RelationType::Before),
            Some(RelationType::Before)
        );
        assert_eq!(
            rules.compose(RelationType::Includes, RelationType::Includes),
            Some(RelationType::Includes)
        );
    }

    #[test]
    fn test_compose_through_inverse() {
        let rules = ClosureRules::standard();
        assert_eq!(
            rules.compose(RelationType::After, RelationType::After),
            Some(RelationType::After)
        );
        assert_eq!(
            rules.compose(RelationType::Simultaneous, RelationType::IsIncluded),
            Some(RelationType::IsIncluded)
        );
    }

    #[test]
    fn test_compose_unknown() {
        let rules = ClosureRules::standard();
        assert_eq!(rules.compose(RelationType::Before, RelationType::After), None);
        assert_eq!(rules.compose(RelationType::Vague, RelationType::Before), None);
    }

    #[test]
    fn test_parse_rule_file() {
        let text = "// chaining\n# comment\n\nBEFORE BEFORE BEFORE\nincludes during_inv includes\n";
        let rules = ClosureRules::parse(text).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules.compose(RelationType::Includes, RelationType::Includes),
            Some(RelationType::Includes)
        );
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        let err = ClosureRules::parse("BEFORE BEFORE\n").unwrap_err();
        assert!(matches!(err, StoreError::RuleFile { line: 1, .. }));

        let err = ClosureRules::parse("\nBEFORE LATER BEFORE\n").unwrap_err();
        assert!(matches!(err, StoreError::RuleFile { line: 2, .. }));
    }

    #[test]
    fn test_compose_links_orientation() {
        let rules = ClosureRules::standard();
        let ab = TemporalLink::new("a", "b", RelationType::Before).unwrap();
        let cb = TemporalLink::new("c", "b", RelationType::After).unwrap();
        assert_eq!(
            compose_links(&rules, &ab, &cb),
            Some(("a".to_string(), "c".to_string(), RelationType::Before))
        );

        let same_pair = TemporalLink::new("b", "a", RelationType::After).unwrap();
        assert_eq!(compose_links(&rules, &ab, &same_pair), None);
    }
}
