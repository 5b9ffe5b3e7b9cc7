//! Built-in rule sieves
//!
//! These only look at where entities sit in the text. They serve as
//! baselines and as the tail of a pipeline, labelling whatever pairs the
//! more precise sieves before them left open.

use chronosieve_domain::{Document, Entity, RelationType, Sieve, SieveError, TemporalLink};

fn by_token<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Vec<&'a Entity> {
    let mut sorted: Vec<&Entity> = entities.into_iter().collect();
    sorted.sort_by_key(|e| e.token);
    sorted
}

fn pairs_in_order(
    entities: &[&Entity],
    relation: RelationType,
    out: &mut Vec<TemporalLink>,
) -> Result<(), SieveError> {
    for (i, first) in entities.iter().enumerate() {
        for second in &entities[i + 1..] {
            out.push(TemporalLink::new(&first.id, &second.id, relation)?);
        }
    }
    Ok(())
}

/// Labels every event/event and time/time pair inside a sentence BEFORE,
/// following text order
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOrderBefore;

impl Sieve for TextOrderBefore {
    fn name(&self) -> &str {
        "TextOrderBefore"
    }

    fn annotate(
        &self,
        document: &Document,
        _accepted: &[TemporalLink],
    ) -> Result<Vec<TemporalLink>, SieveError> {
        let mut proposed = Vec::new();
        let events = document.events_by_sentence();
        let times = document.timexes_by_sentence();
        for (events, times) in events.into_iter().zip(times) {
            pairs_in_order(&by_token(events), RelationType::Before, &mut proposed)?;
            pairs_in_order(&by_token(times), RelationType::Before, &mut proposed)?;
        }
        Ok(proposed)
    }
}

/// Labels every event VAGUE to the document creation time
#[derive(Debug, Clone, Copy, Default)]
pub struct CreationTimeVague;

impl Sieve for CreationTimeVague {
    fn name(&self) -> &str {
        "CreationTimeVague"
    }

    fn annotate(
        &self,
        document: &Document,
        _accepted: &[TemporalLink],
    ) -> Result<Vec<TemporalLink>, SieveError> {
        let Some(dct) = document.creation_time.as_deref() else {
            return Ok(Vec::new());
        };
        document
            .events_by_sentence()
            .into_iter()
            .flatten()
            .filter(|event| event.id != dct)
            .map(|event| {
                TemporalLink::new(&event.id, dct, RelationType::Vague).map_err(SieveError::from)
            })
            .collect()
    }
}

/// Labels every pair in the same or adjacent sentences VAGUE
#[derive(Debug, Clone, Copy, Default)]
pub struct AllVague;

impl Sieve for AllVague {
    fn name(&self) -> &str {
        "AllVague"
    }

    fn annotate(
        &self,
        document: &Document,
        _accepted: &[TemporalLink],
    ) -> Result<Vec<TemporalLink>, SieveError> {
        let sentences: Vec<Vec<&Entity>> = document
            .sentences
            .iter()
            .map(|s| by_token(&s.entities))
            .collect();

        let mut proposed = Vec::new();
        for (sid, entities) in sentences.iter().enumerate() {
            pairs_in_order(entities, RelationType::Vague, &mut proposed)?;
            if let Some(next) = sentences.get(sid + 1) {
                for first in entities {
                    for second in next {
                        proposed.push(TemporalLink::new(&first.id, &second.id, RelationType::Vague)?);
                    }
                }
            }
        }
        Ok(proposed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronosieve_domain::Sentence;

    fn document() -> Document {
        Document::new("doc")
            .with_creation_time("t0")
            .with_sentence(Sentence::new(vec![
                Entity::event("e2", 5),
                Entity::event("e1", 1),
                Entity::time("t1", 3),
            ]))
            .with_sentence(Sentence::new(vec![Entity::event("e3", 0)]))
            .with_sentence(Sentence::new(vec![Entity::event("e4", 0)]))
    }

    fn triples(links: &[TemporalLink]) -> Vec<(String, String, RelationType)> {
        links
            .iter()
            .map(|l| (l.endpoint1().to_string(), l.endpoint2().to_string(), l.relation()))
            .collect()
    }

    #[test]
    fn test_text_order_before() {
        let links = TextOrderBefore.annotate(&document(), &[]).unwrap();
        assert_eq!(
            triples(&links),
            vec![("e1".to_string(), "e2".to_string(), RelationType::Before)]
        );
    }

    #[test]
    fn test_creation_time_vague() {
        let links = CreationTimeVague.annotate(&document(), &[]).unwrap();
        assert_eq!(links.len(), 4);
        assert!(links
            .iter()
            .all(|l| l.endpoint2() == "t0" && l.relation() == RelationType::Vague));
    }

    #[test]
    fn test_creation_time_missing() {
        let doc = Document::new("doc").with_sentence(Sentence::new(vec![Entity::event("e1", 0)]));
        assert!(CreationTimeVague.annotate(&doc, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_all_vague_same_and_adjacent_sentences() {
        let links = AllVague.annotate(&document(), &[]).unwrap();
        let pairs: Vec<(String, String)> = triples(&links)
            .into_iter()
            .map(|(a, b, _)| (a, b))
            .collect();
        let expected: Vec<(String, String)> = [
            ("e1", "t1"),
            ("e1", "e2"),
            ("t1", "e2"),
            ("e1", "e3"),
            ("t1", "e3"),
            ("e2", "e3"),
            ("e3", "e4"),
        ]
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
        assert_eq!(pairs, expected);
        assert!(links.iter().all(|l| l.relation() == RelationType::Vague));
    }
}
