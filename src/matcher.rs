//! Intent classifier - maps free text to topic categories
//!
//! Two tiers: a short list of self-introduction phrases forces `about`;
//! otherwise every intent in the synonym table scores 1 when any of its
//! triggers matches the normalized query.

use crate::config::SynonymTable;
use crate::similarity::{fuzzy_similarity, TYPO_THRESHOLD};
use crate::text::normalize;
use crate::types::{IntentKey, IntentScore, Trigger};

/// Added to `name` when the query equals one of its triggers exactly
pub const NAME_EXACT_BOOST: u32 = 2;

impl Trigger {
    /// Test this trigger against already-normalized text.
    ///
    /// Literals match by containment or by whole-phrase fuzzy similarity;
    /// patterns match by regex search.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Trigger::Literal(phrase) => {
                text.contains(phrase.as_str()) || fuzzy_similarity(text, phrase) >= TYPO_THRESHOLD
            }
            Trigger::Pattern(re) => re.is_match(text),
        }
    }

    fn equals(&self, text: &str) -> bool {
        matches!(self, Trigger::Literal(phrase) if phrase == text)
    }
}

/// True when normalized text contains one of the self-introduction phrases
pub fn is_intro_request(normalized: &str, intro_phrases: &[String]) -> bool {
    intro_phrases
        .iter()
        .any(|phrase| normalized.contains(phrase.as_str()))
}

/// Score every intent in the table, best first.
///
/// Ties keep synonym-table declaration order. A self-introduction phrase
/// short-circuits scoring: only `about` scores.
pub fn score_all_intents(
    text: &str,
    synonyms: &SynonymTable,
    intro_phrases: &[String],
) -> Vec<IntentScore> {
    let normalized = normalize(text);

    let mut scores: Vec<IntentScore> = if is_intro_request(&normalized, intro_phrases) {
        let mut forced: Vec<IntentScore> = synonyms
            .entries()
            .iter()
            .map(|(key, _)| IntentScore {
                key: *key,
                score: u32::from(*key == IntentKey::About),
            })
            .collect();
        if !forced.iter().any(|s| s.key == IntentKey::About) {
            forced.insert(0, IntentScore { key: IntentKey::About, score: 1 });
        }
        forced
    } else {
        synonyms
            .entries()
            .iter()
            .map(|(key, triggers)| {
                let mut score = u32::from(triggers.iter().any(|t| t.matches(&normalized)));
                if *key == IntentKey::Name && triggers.iter().any(|t| t.equals(&normalized)) {
                    score += NAME_EXACT_BOOST;
                }
                IntentScore { key: *key, score }
            })
            .collect()
    };

    // sort_by is stable
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores
}

/// Best single intent, or `about` when nothing matched
pub fn classify_intent(text: &str, synonyms: &SynonymTable, intro_phrases: &[String]) -> IntentKey {
    score_all_intents(text, synonyms, intro_phrases)
        .first()
        .filter(|top| top.score > 0)
        .map(|top| top.key)
        .unwrap_or(IntentKey::About)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KnowledgeBase;
    use regex::Regex;

    fn literal(s: &str) -> Trigger {
        Trigger::Literal(s.to_string())
    }

    fn builtin() -> KnowledgeBase {
        KnowledgeBase::builtin().unwrap()
    }

    fn classify(kb: &KnowledgeBase, text: &str) -> IntentKey {
        classify_intent(text, &kb.synonyms, &kb.intro_phrases)
    }

    #[test]
    fn test_fuzzy_trigger_tolerates_typo() {
        let kb = builtin();
        assert_eq!(classify(&kb, "stak"), IntentKey::Skills);
    }

    #[test]
    fn test_substring_trigger() {
        let kb = builtin();
        assert_eq!(classify(&kb, "What is your email?"), IntentKey::Contact);
        assert_eq!(classify(&kb, "which university did you attend"), IntentKey::Education);
    }

    #[test]
    fn test_intro_phrase_overrides_table() {
        let kb = builtin();
        assert_eq!(classify(&kb, "Who are you?"), IntentKey::About);
        let scores = score_all_intents("please introduce yourself and your skills", &kb.synonyms, &kb.intro_phrases);
        assert_eq!(scores[0], IntentScore { key: IntentKey::About, score: 1 });
        assert!(scores[1..].iter().all(|s| s.score == 0));
    }

    #[test]
    fn test_default_is_about() {
        let kb = builtin();
        assert_eq!(classify(&kb, "zzzz qqqq"), IntentKey::About);
        assert_eq!(classify(&kb, ""), IntentKey::About);
        assert!(score_all_intents("", &kb.synonyms, &kb.intro_phrases)
            .iter()
            .all(|s| s.score == 0));
    }

    #[test]
    fn test_specific_topic_beats_about_on_tie() {
        let kb = builtin();
        assert_eq!(classify(&kb, "tell me about your projects"), IntentKey::Projects);
    }

    #[test]
    fn test_name_exact_boost() {
        let table = SynonymTable::new(vec![
            (IntentKey::Contact, vec![literal("name")]),
            (IntentKey::Name, vec![literal("name"), literal("your name")]),
        ])
        .unwrap();

        let exact = score_all_intents("name", &table, &[]);
        assert_eq!(exact[0], IntentScore { key: IntentKey::Name, score: 1 + NAME_EXACT_BOOST });
        assert_eq!(exact[1], IntentScore { key: IntentKey::Contact, score: 1 });

        // containment only: tie, so declaration order wins
        let loose = score_all_intents("what name do you use", &table, &[]);
        assert_eq!(loose[0].key, IntentKey::Contact);
        assert_eq!(loose[1], IntentScore { key: IntentKey::Name, score: 1 });
    }

    #[test]
    fn test_pattern_trigger() {
        let table = SynonymTable::new(vec![(
            IntentKey::Availability,
            vec![Trigger::Pattern(Regex::new(r"\bjoin(ing)?\b").unwrap())],
        )])
        .unwrap();
        assert_eq!(classify_intent("When can you join?", &table, &[]), IntentKey::Availability);
        assert_eq!(classify_intent("joiner", &table, &[]), IntentKey::About);
    }

    #[test]
    fn test_sorted_best_first_and_stable() {
        let table = SynonymTable::new(vec![
            (IntentKey::Skills, vec![literal("stack")]),
            (IntentKey::Projects, vec![literal("project")]),
            (IntentKey::Location, vec![literal("based")]),
        ])
        .unwrap();
        let scores = score_all_intents("where is the project based", &table, &[]);
        let keys: Vec<IntentKey> = scores.iter().map(|s| s.key).collect();
        assert_eq!(keys, vec![IntentKey::Projects, IntentKey::Location, IntentKey::Skills]);
    }
}
