//! Project and skill matcher - orders structured records by query relevance

use crate::text::{normalize, token_set};
use crate::types::{Experience, Project, SkillGroup};

/// Bonus per query token found inside a record's title
pub const TITLE_TOKEN_BONUS: f64 = 0.5;

/// A structured résumé record that can be ranked against a query
pub trait Record {
    fn title(&self) -> &str;

    /// Free-text description and technology fields, space separated
    fn body(&self) -> String;
}

impl Record for Project {
    fn title(&self) -> &str {
        &self.title
    }

    fn body(&self) -> String {
        format!("{} {}", self.description, self.technologies.join(" "))
    }
}

impl Record for SkillGroup {
    fn title(&self) -> &str {
        &self.name
    }

    fn body(&self) -> String {
        self.items.join(" ")
    }
}

impl Record for Experience {
    fn title(&self) -> &str {
        &self.role
    }

    fn body(&self) -> String {
        format!("{} {} {}", self.company, self.description.join(" "), self.skills.join(" "))
    }
}

/// Token overlap between the query and the record's title, body and
/// technologies, plus [`TITLE_TOKEN_BONUS`] per query token that occurs
/// as a substring of the title.
pub fn score_record<R: Record + ?Sized>(query: &str, record: &R) -> f64 {
    let query_tokens = token_set(query);
    if query_tokens.is_empty() {
        return 0.0;
    }

    let title = normalize(record.title());
    let record_tokens = token_set(&format!("{} {}", record.title(), record.body()));

    let overlap = query_tokens.intersection(&record_tokens).count() as f64;
    let title_hits = query_tokens
        .iter()
        .filter(|token| title.contains(token.as_str()))
        .count() as f64;

    overlap + TITLE_TOKEN_BONUS * title_hits
}

/// The `limit` most relevant records, best first. Ties keep input order and
/// the result is never empty unless `records` or `limit` is.
pub fn top_records<'a, R: Record>(query: &str, records: &'a [R], limit: usize) -> Vec<&'a R> {
    let mut scored: Vec<(f64, &R)> = records
        .iter()
        .map(|record| (score_record(query, record), record))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, record)| record).collect()
}
