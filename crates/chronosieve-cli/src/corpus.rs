//! JSON corpus files.

use crate::error::{CliError, Result};
use chronosieve_domain::Document;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A set of documents read from or written to disk.
///
/// On disk this is `{"documents": [...]}`; links inside each document use
/// the link record layout (`event1`, `event2`, `relation`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    /// Documents in file order
    pub documents: Vec<Document>,
}

impl Corpus {
    /// Read a corpus file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let corpus: Corpus = serde_json::from_str(&contents)?;

        let mut ids = HashSet::new();
        for document in &corpus.documents {
            if !ids.insert(document.id.as_str()) {
                return Err(CliError::InvalidInput(format!(
                    "Duplicate document id '{}' in {}",
                    document.id,
                    path.display()
                )));
            }
        }
        Ok(corpus)
    }

    /// Write the corpus as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// True if any document carries links to score against.
    pub fn has_links(&self) -> bool {
        self.documents.iter().any(|d| !d.links.is_empty())
    }

    /// Copies of the documents with their links removed.
    pub fn stripped(&self) -> Vec<Document> {
        self.documents
            .iter()
            .map(|document| {
                let mut document = document.clone();
                document.clear_links();
                document
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronosieve_domain::{Entity, RelationType, Sentence, TemporalLink};

    fn corpus() -> Corpus {
        let mut doc = Document::new("d1").with_sentence(Sentence::new(vec![
            Entity::event("e1", 0),
            Entity::event("e2", 3),
        ]));
        doc.add_links([TemporalLink::new("e1", "e2", RelationType::Before).unwrap()]);
        Corpus {
            documents: vec![doc, Document::new("d2")],
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let original = corpus();
        original.save(&path).unwrap();

        let loaded = Corpus::load(&path).unwrap();
        assert_eq!(loaded.documents.len(), 2);
        assert_eq!(loaded.documents[0].sentences, original.documents[0].sentences);
        assert!(loaded.documents[0].links[0].is_equivalent_to(&original.documents[0].links[0]));
        assert_eq!(loaded.documents[1].id, "d2");
    }

    #[test]
    fn test_reads_link_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        fs::write(
            &path,
            r#"{"documents": [{"id": "d1", "links": [
                {"event1": "e1", "event2": "e2", "relation": "during"}
            ]}]}"#,
        )
        .unwrap();
        let corpus = Corpus::load(&path).unwrap();
        assert_eq!(corpus.documents[0].links[0].relation(), RelationType::IsIncluded);
    }

    #[test]
    fn test_bad_label_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        fs::write(
            &path,
            r#"{"documents": [{"id": "d1", "links": [
                {"event1": "e1", "event2": "e2", "relation": "SOMETIME"}
            ]}]}"#,
        )
        .unwrap();
        assert!(matches!(Corpus::load(&path), Err(CliError::Serialization(_))));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        fs::write(&path, r#"{"documents": [{"id": "d1"}, {"id": "d1"}]}"#).unwrap();
        assert!(matches!(Corpus::load(&path), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_stripped() {
        let corpus = corpus();
        assert!(corpus.has_links());
        let stripped = corpus.stripped();
        assert!(stripped.iter().all(|d| d.links.is_empty()));
        assert_eq!(stripped[0].sentences, corpus.documents[0].sentences);
    }
}
