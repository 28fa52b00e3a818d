//! Python bindings for the assistant core using PyO3

use std::sync::Arc;

use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::cache::ResponseCache;
use crate::composer::{is_greeting, Assistant};
use crate::config::KnowledgeBase;
use crate::error::Error;
use crate::similarity::{fuzzy_similarity, levenshtein};
use crate::text::{normalize, tokenize};

impl From<Error> for PyErr {
    fn from(err: Error) -> Self {
        PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
    }
}

#[pyfunction]
#[pyo3(name = "normalize")]
pub fn py_normalize(text: &str) -> String {
    normalize(text)
}

#[pyfunction]
#[pyo3(name = "tokenize")]
pub fn py_tokenize(text: &str) -> Vec<String> {
    tokenize(text)
}

#[pyfunction]
#[pyo3(name = "levenshtein")]
pub fn py_levenshtein(a: &str, b: &str) -> usize {
    levenshtein(a, b)
}

#[pyfunction]
#[pyo3(name = "fuzzy_similarity")]
pub fn py_fuzzy_similarity(a: &str, b: &str) -> f64 {
    fuzzy_similarity(a, b)
}

#[pyfunction]
#[pyo3(name = "is_greeting")]
pub fn py_is_greeting(text: &str) -> bool {
    is_greeting(text)
}

/// Python wrapper for the assistant
#[pyclass(name = "Assistant")]
pub struct PyAssistant {
    inner: Assistant,
    cache: Arc<ResponseCache>,
}

#[pymethods]
impl PyAssistant {
    /// Load reference data from `data_path`, or the embedded data when omitted.
    /// Replies are cached per the loaded settings.
    #[new]
    #[pyo3(signature = (data_path=None))]
    fn new(data_path: Option<String>) -> PyResult<Self> {
        let kb = match data_path {
            Some(path) => KnowledgeBase::from_path(path)?,
            None => KnowledgeBase::builtin()?,
        };
        let cache = Arc::new(ResponseCache::new(kb.settings.cache_ttl(), kb.settings.cache_capacity));
        Ok(Self {
            inner: Assistant::new(Arc::new(kb)).with_cache(cache.clone()),
            cache,
        })
    }

    /// Reply to a query as a dict with `route`, optional `intent` and `text`
    fn respond<'py>(&self, query: &str, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let reply = self.inner.respond(query);
        let dict = PyDict::new_bound(py);
        dict.set_item("route", reply.route.label())?;
        if let crate::types::Route::Intent(key) = reply.route {
            dict.set_item("intent", key.as_str())?;
        }
        dict.set_item("text", reply.text)?;
        Ok(dict)
    }

    fn classify_intent(&self, query: &str) -> &'static str {
        self.inner.classify_intent(query).as_str()
    }

    /// All intents best first as `(key, score)` pairs
    fn score_all_intents(&self, query: &str) -> Vec<(&'static str, u32)> {
        self.inner
            .score_all_intents(query)
            .into_iter()
            .map(|s| (s.key.as_str(), s.score))
            .collect()
    }

    /// Top `n` FAQ entries as `(index, score)` pairs
    #[pyo3(signature = (query, n=3))]
    fn rank_faq(&self, query: &str, n: usize) -> Vec<(usize, f64)> {
        self.inner
            .rank_faq(query, n)
            .into_iter()
            .map(|s| (s.index, s.score))
            .collect()
    }

    fn compose_multi_intent(&self, query: &str) -> String {
        self.inner.compose_multi_intent(query)
    }

    /// Drop every cached reply
    fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of FAQ entries loaded
    fn faq_count(&self) -> usize {
        self.inner.knowledge().faqs.len()
    }
}
