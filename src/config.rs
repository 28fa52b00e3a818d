//! Reference data and assistant settings
//!
//! A [`KnowledgeBase`] is built once at startup, either from the embedded
//! default data or from a JSON file, and shared read-only by every scorer.

use std::fs;
use std::path::Path;
use std::time::Duration;

use ahash::AHashSet;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::text::{normalize, BARE_INTRO_PHRASES};
use crate::types::{Experience, FaqEntry, IntentKey, Project, Resume, Trigger};

const BUILTIN_KNOWLEDGE: &str = include_str!("../data/knowledge.json");

/// Intent keys mapped to their trigger phrases, in declaration order.
///
/// Declaration order breaks ties between equally scored intents.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: Vec<(IntentKey, Vec<Trigger>)>,
}

impl SynonymTable {
    pub fn new(entries: Vec<(IntentKey, Vec<Trigger>)>) -> Result<Self> {
        let mut seen = AHashSet::new();
        for (key, _) in &entries {
            if !seen.insert(*key) {
                return Err(Error::invalid_data(format!(
                    "intent '{}' is declared more than once",
                    key
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(IntentKey, Vec<Trigger>)] {
        &self.entries
    }

    pub fn triggers(&self, key: IntentKey) -> &[Trigger] {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, triggers)| triggers.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tunables for the response composer and its collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    /// Name the assistant introduces itself with
    pub persona: String,
    /// Number of questions offered in a did-you-mean block
    pub suggestion_count: usize,
    /// Records shown by project and experience answers
    pub record_limit: usize,
    /// Documents requested from the context source
    pub context_documents: usize,
    pub cache_ttl_secs: u64,
    pub cache_capacity: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            persona: "Mimir".to_string(),
            suggestion_count: 3,
            record_limit: 3,
            context_documents: 3,
            cache_ttl_secs: 300,
            cache_capacity: 100,
        }
    }
}

impl AssistantSettings {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Immutable reference data consulted by every classification call
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    pub resume: Resume,
    pub faqs: Vec<FaqEntry>,
    pub projects: Vec<Project>,
    pub experiences: Vec<Experience>,
    pub synonyms: SynonymTable,
    /// Normalized self-introduction phrases that force the `about` intent
    pub intro_phrases: Vec<String>,
    pub settings: AssistantSettings,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTrigger {
    Literal(String),
    Pattern { pattern: String },
}

#[derive(Deserialize)]
struct RawSynonym {
    intent: IntentKey,
    #[serde(default)]
    triggers: Vec<RawTrigger>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawKnowledge {
    resume: Resume,
    faqs: Vec<FaqEntry>,
    projects: Vec<Project>,
    experiences: Vec<Experience>,
    synonyms: Vec<RawSynonym>,
    intro_phrases: Vec<String>,
    settings: AssistantSettings,
}

impl KnowledgeBase {
    /// Load the reference data embedded in the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_KNOWLEDGE)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Parse reference data from JSON. Literal triggers and intro phrases are
    /// stored normalized; empty ones are dropped.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let raw_kb: RawKnowledge = serde_json::from_str(raw)?;

        let mut entries = Vec::with_capacity(raw_kb.synonyms.len());
        for synonym in raw_kb.synonyms {
            let mut triggers = Vec::with_capacity(synonym.triggers.len());
            for trigger in synonym.triggers {
                match trigger {
                    RawTrigger::Literal(text) => {
                        let text = normalize(&text);
                        if !text.is_empty() {
                            triggers.push(Trigger::Literal(text));
                        }
                    }
                    RawTrigger::Pattern { pattern } => {
                        triggers.push(Trigger::Pattern(Regex::new(&pattern)?));
                    }
                }
            }
            entries.push((synonym.intent, triggers));
        }

        // A bare intro that greets must also classify as `about`.
        let mut intro_phrases: Vec<String> = raw_kb
            .intro_phrases
            .iter()
            .map(|phrase| normalize(phrase))
            .filter(|phrase| !phrase.is_empty())
            .collect();
        for phrase in BARE_INTRO_PHRASES {
            if !intro_phrases.iter().any(|known| known == phrase) {
                intro_phrases.push(phrase.to_string());
            }
        }

        Ok(Self {
            resume: raw_kb.resume,
            faqs: raw_kb.faqs,
            projects: raw_kb.projects,
            experiences: raw_kb.experiences,
            synonyms: SynonymTable::new(entries)?,
            intro_phrases,
            settings: raw_kb.settings,
        })
    }
}
