//! Document model sieves read from
//!
//! A document is a sequence of sentences holding event and time mentions,
//! plus the temporal links attached to it.

use crate::link::TemporalLink;
use serde::{Deserialize, Serialize};

/// Kind of temporal entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// An event mention
    Event,
    /// A time expression
    Time,
}

/// An event or time mention inside a sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Identifier unique within the document
    pub id: String,
    /// Event or time
    pub kind: EntityKind,
    /// Token offset inside the sentence
    #[serde(default)]
    pub token: usize,
    /// Surface text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Entity {
    /// Create an event mention
    pub fn event(id: impl Into<String>, token: usize) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Event,
            token,
            text: None,
        }
    }

    /// Create a time mention
    pub fn time(id: impl Into<String>, token: usize) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Time,
            token,
            text: None,
        }
    }
}

/// One sentence and its mentions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Mentions in token order
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Sentence {
    /// Sentence with the given mentions
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }
}

/// A document with its sentences and links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier
    pub id: String,
    /// Identifier of the document creation time, when annotated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    /// Sentences in document order
    #[serde(default)]
    pub sentences: Vec<Sentence>,
    /// Links attached to the document
    #[serde(default)]
    pub links: Vec<TemporalLink>,
}

impl Document {
    /// Empty document
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            creation_time: None,
            sentences: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Builder-style sentence append
    pub fn with_sentence(mut self, sentence: Sentence) -> Self {
        self.sentences.push(sentence);
        self
    }

    /// Builder-style creation time
    pub fn with_creation_time(mut self, id: impl Into<String>) -> Self {
        self.creation_time = Some(id.into());
        self
    }

    /// Events of each sentence, in document order
    pub fn events_by_sentence(&self) -> Vec<Vec<&Entity>> {
        self.by_sentence(EntityKind::Event)
    }

    /// Time expressions of each sentence, in document order
    pub fn timexes_by_sentence(&self) -> Vec<Vec<&Entity>> {
        self.by_sentence(EntityKind::Time)
    }

    fn by_sentence(&self, kind: EntityKind) -> Vec<Vec<&Entity>> {
        self.sentences
            .iter()
            .map(|s| s.entities.iter().filter(|e| e.kind == kind).collect())
            .collect()
    }

    /// Look up a mention by identifier
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.sentences
            .iter()
            .flat_map(|s| s.entities.iter())
            .find(|e| e.id == id)
    }

    /// Index of the sentence holding a mention
    pub fn sentence_of(&self, id: &str) -> Option<usize> {
        self.sentences
            .iter()
            .position(|s| s.entities.iter().any(|e| e.id == id))
    }

    /// Attached links that were not derived by closure
    pub fn links_without_closure(&self) -> Vec<&TemporalLink> {
        self.links.iter().filter(|l| !l.is_closure()).collect()
    }

    /// Append links to the document
    pub fn add_links(&mut self, links: impl IntoIterator<Item = TemporalLink>) {
        self.links.extend(links);
    }

    /// Detach and return every link
    pub fn clear_links(&mut self) -> Vec<TemporalLink> {
        std::mem::take(&mut self.links)
    }
}
