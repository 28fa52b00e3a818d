//! Mimir core - deterministic query classification for a personal-site assistant
//!
//! Normalizes a raw question, classifies it into résumé topics, ranks FAQ
//! entries against it and composes the final answer. All reference data is
//! read-only after startup, so every entry point can be called concurrently.

pub mod types;
pub mod error;
pub mod text;
pub mod similarity;
pub mod config;
pub mod matcher;
pub mod faq;
pub mod records;
pub mod answers;
pub mod collaborators;
pub mod cache;
pub mod composer;

pub use types::*;
pub use error::{Error, Result};
pub use text::{normalize, tokenize};
pub use similarity::{fuzzy_similarity, levenshtein};
pub use config::{AssistantSettings, KnowledgeBase, SynonymTable};
pub use matcher::{classify_intent, score_all_intents};
pub use faq::{best_faq_match, rank_faq};
pub use records::{score_record, Record};
pub use collaborators::{ContextSource, LanguageModel, NO_CONTEXT_SENTINEL};
pub use cache::ResponseCache;
pub use composer::{compose_multi_intent, is_greeting, Assistant};

// Python bindings
#[cfg(feature = "extension-module")]
pub mod py;

#[cfg(feature = "extension-module")]
use pyo3::prelude::*;

#[cfg(feature = "extension-module")]
#[pymodule]
fn mimir_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use py::*;
    m.add_class::<PyAssistant>()?;
    m.add_function(wrap_pyfunction!(py_normalize, m)?)?;
    m.add_function(wrap_pyfunction!(py_tokenize, m)?)?;
    m.add_function(wrap_pyfunction!(py_levenshtein, m)?)?;
    m.add_function(wrap_pyfunction!(py_fuzzy_similarity, m)?)?;
    m.add_function(wrap_pyfunction!(py_is_greeting, m)?)?;
    Ok(())
}
