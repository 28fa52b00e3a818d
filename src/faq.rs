//! FAQ ranker - weighted scoring of FAQ entries against a query

use ahash::AHashSet;

use crate::similarity::{fuzzy_similarity, TYPO_THRESHOLD, WEAK_THRESHOLD};
use crate::text::{normalize, token_set};
use crate::types::{FaqEntry, ScoredIndex};

/// Per query token found in the question
pub const QUESTION_TOKEN_WEIGHT: f64 = 3.0;
/// Per query token found in the tags
pub const TAG_TOKEN_WEIGHT: f64 = 2.0;
/// Per query token found in the answer, up to [`ANSWER_TOKEN_CAP`]
pub const ANSWER_TOKEN_WEIGHT: f64 = 1.0;
pub const ANSWER_TOKEN_CAP: f64 = 5.0;
/// Query contained in the question or vice versa
pub const PHRASE_CONTAINMENT_BONUS: f64 = 5.0;
pub const FUZZY_STRONG_BONUS: f64 = 4.0;
pub const FUZZY_WEAK_BONUS: f64 = 2.0;

/// Score one entry against a query.
///
/// An empty query scores 0 against everything.
pub fn score_faq(query: &str, entry: &FaqEntry) -> f64 {
    let normalized_query = normalize(query);
    let query_tokens = token_set(&normalized_query);
    score_prepared(&normalized_query, &query_tokens, entry)
}

fn score_prepared(normalized_query: &str, query_tokens: &AHashSet<String>, entry: &FaqEntry) -> f64 {
    if normalized_query.is_empty() {
        return 0.0;
    }

    let question = normalize(&entry.question);
    let question_tokens = token_set(&question);
    let tag_tokens: AHashSet<String> = entry.tags.iter().flat_map(|tag| token_set(tag)).collect();
    let answer_tokens = token_set(&entry.answer);

    let overlap = |tokens: &AHashSet<String>| query_tokens.intersection(tokens).count() as f64;

    let mut score = QUESTION_TOKEN_WEIGHT * overlap(&question_tokens)
        + TAG_TOKEN_WEIGHT * overlap(&tag_tokens)
        + (ANSWER_TOKEN_WEIGHT * overlap(&answer_tokens)).min(ANSWER_TOKEN_CAP);

    if !question.is_empty()
        && (question.contains(normalized_query) || normalized_query.contains(question.as_str()))
    {
        score += PHRASE_CONTAINMENT_BONUS;
    }

    let similarity = fuzzy_similarity(normalized_query, &question);
    if similarity >= TYPO_THRESHOLD {
        score += FUZZY_STRONG_BONUS;
    } else if similarity >= WEAK_THRESHOLD {
        score += FUZZY_WEAK_BONUS;
    }

    score
}

fn score_all(query: &str, faqs: &[FaqEntry]) -> Vec<ScoredIndex> {
    let normalized_query = normalize(query);
    let query_tokens = token_set(&normalized_query);
    faqs.iter()
        .enumerate()
        .map(|(index, entry)| ScoredIndex {
            index,
            score: score_prepared(&normalized_query, &query_tokens, entry),
        })
        .collect()
}

/// Rank entries best first and keep the top `limit`. Ties keep FAQ order.
pub fn rank_faq(query: &str, faqs: &[FaqEntry], limit: usize) -> Vec<ScoredIndex> {
    let mut ranked = score_all(query, faqs);
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);
    ranked
}

/// Highest scoring entry; the first one wins ties.
///
/// Returns index 0 with score 0 when nothing scores (or the list is empty).
pub fn best_faq_match(query: &str, faqs: &[FaqEntry]) -> ScoredIndex {
    let mut best = ScoredIndex { index: 0, score: 0.0 };
    for candidate in score_all(query, faqs) {
        if candidate.score > best.score {
            best = candidate;
        }
    }
    best
}
