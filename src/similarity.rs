//! Edit-distance string similarity
//!
//! Used to tolerate typos when comparing queries against trigger phrases
//! and FAQ questions.

/// Similarity at or above which two strings are treated as the same phrase ("stak" ~ "stack")
pub const TYPO_THRESHOLD: f64 = 0.8;

/// Similarity at or above which a weaker bonus is granted
pub const WEAK_THRESHOLD: f64 = 0.6;

/// Classic Levenshtein distance over characters.
///
/// Insertion, deletion and substitution each cost 1. Fills the full
/// `(|a|+1) x (|b|+1)` table.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    let mut table = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=n {
        table[0][j] = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            table[i][j] = (table[i - 1][j] + 1)
                .min(table[i][j - 1] + 1)
                .min(table[i - 1][j - 1] + cost);
        }
    }

    table[m][n]
}

/// Normalized similarity in `[0, 1]`: `1 - distance / max(1, longer length)`.
///
/// Two identical strings (including two empty strings) score 1.0.
pub fn fuzzy_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count()).max(1);
    1.0 - levenshtein(a, b) as f64 / longest as f64
}
