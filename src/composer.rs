//! Response composer - picks the reply for one query
//!
//! Precedence, first match wins:
//! 1. bare greeting -> introduction
//! 2. utility command (`list faq`) -> FAQ listing
//! 3. context source + language model, when both are attached
//! 4. FAQ match scoring at least [`CONFIDENT_FAQ_SCORE`] -> that FAQ's answer
//! 5. weaker FAQ match with no intent signal -> did-you-mean suggestions
//! 6. two distinct non-`about` intents -> both answers, concatenated
//! 7. no intent signal -> no-data fallback
//! 8. single best intent -> its answer plus a follow-up prompt

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::answers::{answer_for, did_you_mean, faq_listing, introduction, no_data, FOLLOW_UP};
use crate::cache::ResponseCache;
use crate::collaborators::{build_prompt, is_empty_context, ContextSource, LanguageModel};
use crate::config::KnowledgeBase;
use crate::error::Result;
use crate::faq::{best_faq_match, rank_faq};
use crate::matcher::{classify_intent, score_all_intents};
use crate::text::{greeting_alternation, normalize, BARE_INTRO_PHRASES};
use crate::types::{IntentKey, IntentScore, Reply, Route, ScoredIndex};

/// FAQ score at or above which the FAQ answer is returned directly
pub const CONFIDENT_FAQ_SCORE: f64 = 4.0;

/// FAQ score at or above which a did-you-mean block may be offered
pub const SUGGEST_FAQ_SCORE: f64 = 1.0;

pub const LIST_FAQ_COMMANDS: [&str; 5] = ["list faq", "list faqs", "show faq", "show faqs", "faq list"];

static BARE_GREETING: LazyLock<Regex> = LazyLock::new(|| {
    let intros: Vec<String> = BARE_INTRO_PHRASES.iter().map(|phrase| regex::escape(phrase)).collect();
    Regex::new(&format!(
        r"^(?:{}|{})[\s!.,?]*$",
        greeting_alternation(),
        intros.join("|")
    ))
    .expect("Invalid regex: bare greeting")
});

/// True when the whole input is a greeting or a short "who are you",
/// with nothing substantive after it.
pub fn is_greeting(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    BARE_GREETING.is_match(&collapsed)
}

/// True for the verbatim utility command that lists every FAQ question
pub fn is_list_faq_command(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    LIST_FAQ_COMMANDS.contains(&lowered.as_str())
}

/// Answers for two simultaneously detected topics, separated by a blank line.
///
/// Empty unless at least two distinct non-`about` intents score above zero.
pub fn compose_multi_intent(query: &str, kb: &KnowledgeBase) -> String {
    let scores = score_all_intents(query, &kb.synonyms, &kb.intro_phrases);
    compose_from_scores(query, &scores, kb)
}

fn compose_from_scores(query: &str, scores: &[IntentScore], kb: &KnowledgeBase) -> String {
    let keys: Vec<IntentKey> = scores
        .iter()
        .filter(|s| s.key != IntentKey::About && s.score > 0)
        .map(|s| s.key)
        .take(2)
        .collect();
    if keys.len() < 2 {
        return String::new();
    }
    keys.iter()
        .map(|key| answer_for(*key, query, kb))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Request handler bound to one knowledge base and optional collaborators
pub struct Assistant {
    kb: Arc<KnowledgeBase>,
    context: Option<Arc<dyn ContextSource>>,
    model: Option<Arc<dyn LanguageModel>>,
    cache: Option<Arc<ResponseCache>>,
}

impl Assistant {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self {
            kb,
            context: None,
            model: None,
            cache: None,
        }
    }

    /// Assistant over the embedded reference data
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Arc::new(KnowledgeBase::builtin()?)))
    }

    /// Attach the retrieval and completion collaborators; both are needed
    /// for the contextual path to run.
    pub fn with_collaborators(
        mut self,
        context: Arc<dyn ContextSource>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        self.context = Some(context);
        self.model = Some(model);
        self
    }

    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn classify_intent(&self, query: &str) -> IntentKey {
        classify_intent(query, &self.kb.synonyms, &self.kb.intro_phrases)
    }

    pub fn score_all_intents(&self, query: &str) -> Vec<IntentScore> {
        score_all_intents(query, &self.kb.synonyms, &self.kb.intro_phrases)
    }

    pub fn best_faq_match(&self, query: &str) -> ScoredIndex {
        best_faq_match(query, &self.kb.faqs)
    }

    pub fn rank_faq(&self, query: &str, limit: usize) -> Vec<ScoredIndex> {
        rank_faq(query, &self.kb.faqs, limit)
    }

    pub fn compose_multi_intent(&self, query: &str) -> String {
        compose_multi_intent(query, &self.kb)
    }

    /// Pick the reply for a raw user utterance
    pub fn respond(&self, query: &str) -> Reply {
        let kb = &*self.kb;

        if is_greeting(query) {
            return self.finish(Reply::new(Route::Greeting, introduction(&kb.settings.persona, &kb.resume)));
        }
        if is_list_faq_command(query) {
            return self.finish(Reply::new(Route::Command, faq_listing(&kb.faqs)));
        }
        if normalize(query).is_empty() {
            return self.finish(Reply::new(Route::NoData, no_data(&kb.resume.links)));
        }

        if let Some(cache) = &self.cache {
            if let Some(text) = cache.get(query) {
                return self.finish(Reply::new(Route::Cached, text));
            }
        }

        let reply = self.compose(query);
        if let Some(cache) = &self.cache {
            cache.insert(query, reply.text.clone());
        }
        self.finish(reply)
    }

    fn compose(&self, query: &str) -> Reply {
        let kb = &*self.kb;

        if let Some(text) = self.contextual(query) {
            return Reply::new(Route::Contextual, text);
        }

        let best = best_faq_match(query, &kb.faqs);
        if best.score >= CONFIDENT_FAQ_SCORE {
            if let Some(entry) = kb.faqs.get(best.index) {
                debug!(index = best.index, score = best.score, "confident FAQ match");
                return Reply::new(Route::Faq, entry.answer.clone());
            }
        }

        let scores = score_all_intents(query, &kb.synonyms, &kb.intro_phrases);
        let top = scores.first().copied().filter(|s| s.score > 0);

        if best.score >= SUGGEST_FAQ_SCORE && top.is_none() {
            let suggestions = rank_faq(query, &kb.faqs, kb.settings.suggestion_count);
            debug!(score = best.score, "weak FAQ match, offering suggestions");
            return Reply::new(Route::DidYouMean, did_you_mean(&kb.faqs, &suggestions));
        }

        let multi = compose_from_scores(query, &scores, kb);
        if !multi.is_empty() {
            return Reply::new(Route::MultiIntent, multi);
        }

        match top {
            None => Reply::new(Route::NoData, no_data(&kb.resume.links)),
            Some(top) => {
                let text = format!("{}\n\n{}", answer_for(top.key, query, kb), FOLLOW_UP);
                Reply::new(Route::Intent(top.key), text)
            }
        }
    }

    fn contextual(&self, query: &str) -> Option<String> {
        let (Some(source), Some(model)) = (&self.context, &self.model) else {
            return None;
        };
        let settings = &self.kb.settings;

        let context = match source.relevant_context(query, settings.context_documents) {
            Ok(context) => context,
            Err(err) => {
                warn!(error = %err, "context source failed, using rule-based reply");
                return None;
            }
        };
        if is_empty_context(&context) {
            debug!("no relevant context, using rule-based reply");
            return None;
        }

        let owner = if self.kb.resume.name.is_empty() {
            "the site owner"
        } else {
            self.kb.resume.name.as_str()
        };
        let prompt = build_prompt(&settings.persona, owner, query, &context);
        match model.complete(&prompt) {
            Ok(answer) if !answer.trim().is_empty() => Some(answer.trim().to_string()),
            Ok(_) => {
                debug!("language model returned nothing, using rule-based reply");
                None
            }
            Err(err) => {
                warn!(error = %err, "language model failed, using rule-based reply");
                None
            }
        }
    }

    fn finish(&self, reply: Reply) -> Reply {
        debug!(route = reply.route.label(), "composed reply");
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::NO_CONTEXT_SENTINEL;
    use crate::error::Error;
    use crate::text::GREETING_TOKENS;
    use parking_lot::Mutex;
    use std::time::Duration;

    struct FixedContext(String);

    impl ContextSource for FixedContext {
        fn relevant_context(&self, _query: &str, _limit: usize) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct FailingContext;

    impl ContextSource for FailingContext {
        fn relevant_context(&self, _query: &str, _limit: usize) -> Result<String> {
            Err(Error::collaborator("index offline"))
        }
    }

    struct RecordingModel {
        answer: Result<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingModel {
        fn answering(answer: &str) -> Self {
            Self { answer: Ok(answer.to_string()), prompts: Mutex::new(Vec::new()) }
        }

        fn failing() -> Self {
            Self { answer: Err(Error::collaborator("timeout")), prompts: Mutex::new(Vec::new()) }
        }
    }

    impl LanguageModel for RecordingModel {
        fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().push(prompt.to_string());
            match &self.answer {
                Ok(answer) => Ok(answer.clone()),
                Err(err) => Err(Error::collaborator(err.to_string())),
            }
        }
    }

    fn assistant() -> Assistant {
        Assistant::builtin().unwrap()
    }

    #[test]
    fn test_is_greeting() {
        assert!(is_greeting("hello"));
        assert!(is_greeting("good morning"));
        assert!(is_greeting("  Hey there! "));
        assert!(is_greeting("Who are you?"));
        assert!(is_greeting("greetings"));
        assert!(!is_greeting("hiya"));
        assert!(!is_greeting("hello there, tell me about projects"));
        assert!(!is_greeting("history"));
        assert!(!is_greeting(""));
    }

    #[test]
    fn test_greeting_matches_normalizer_tokens() {
        for token in GREETING_TOKENS {
            assert!(is_greeting(token), "{}", token);
            assert!(normalize(token).is_empty(), "{}", token);
        }
        let a = Assistant::new(Arc::new(KnowledgeBase::from_json_str("{}").unwrap()));
        for phrase in BARE_INTRO_PHRASES {
            assert!(is_greeting(phrase), "{}", phrase);
            assert_eq!(a.classify_intent(phrase), IntentKey::About, "{}", phrase);
        }
    }

    #[test]
    fn test_greeting_reply() {
        let reply = assistant().respond("Good morning!");
        assert_eq!(reply.route, Route::Greeting);
        assert!(reply.text.contains("Mimir"));
    }

    #[test]
    fn test_list_faq_command() {
        let a = assistant();
        let reply = a.respond("  List FAQ ");
        assert_eq!(reply.route, Route::Command);
        assert!(reply.text.contains(&format!("{}. ", a.knowledge().faqs.len())));
        assert_ne!(a.respond("list faq please").route, Route::Command);
    }

    #[test]
    fn test_confident_faq_answer_is_verbatim() {
        let a = assistant();
        let reply = a.respond("hi: Do you have leadership qualities?");
        assert_eq!(reply.route, Route::Faq);
        let best = a.best_faq_match("hi: Do you have leadership qualities?");
        assert!(best.score >= CONFIDENT_FAQ_SCORE);
        assert_eq!(reply.text, a.knowledge().faqs[best.index].answer);
        assert!(reply.text.contains("mentor peers"));
    }

    #[test]
    fn test_did_you_mean_on_weak_match() {
        let reply = assistant().respond("procrastination");
        assert_eq!(reply.route, Route::DidYouMean);
        assert!(reply.text.contains("- What are your weaknesses?"));
    }

    #[test]
    fn test_multi_intent_reply() {
        let a = assistant();
        let reply = a.respond("email and degree");
        assert_eq!(reply.route, Route::MultiIntent);
        let kb = a.knowledge();
        let expected = format!(
            "{}\n\n{}",
            answer_for(IntentKey::Contact, "email and degree", kb),
            answer_for(IntentKey::Education, "email and degree", kb)
        );
        assert_eq!(reply.text, expected);
    }

    #[test]
    fn test_compose_multi_intent_needs_two_topics() {
        let a = assistant();
        assert!(!a.compose_multi_intent("github").is_empty());
        assert!(a.compose_multi_intent("email").is_empty());
        assert!(a.compose_multi_intent("zzzz").is_empty());
        assert!(a.compose_multi_intent("").is_empty());
        // about never counts as a topic
        assert!(a.compose_multi_intent("summary of your skills").is_empty());
        // intro phrases force `about` only
        assert!(a.compose_multi_intent("introduce yourself, email and degree").is_empty());
    }

    #[test]
    fn test_no_data_fallback() {
        let a = assistant();
        let reply = a.respond("zzzz qqqq");
        assert_eq!(reply.route, Route::NoData);
        assert!(reply.text.contains("rvimman@gmail.com"));
        assert_eq!(a.respond("").route, Route::NoData);
        assert_eq!(a.respond("   ").route, Route::NoData);
    }

    #[test]
    fn test_single_intent_with_follow_up() {
        let a = assistant();
        let reply = a.respond("stak");
        assert_eq!(reply.route, Route::Intent(IntentKey::Skills));
        assert!(reply.text.ends_with(FOLLOW_UP));
        assert_eq!(a.respond("name").route, Route::Intent(IntentKey::Name));
        assert_eq!(a.respond("introduce yourself").route, Route::Intent(IntentKey::About));
    }

    #[test]
    fn test_weak_faq_hit_does_not_suppress_intent() {
        let a = assistant();
        let best = a.best_faq_match("tensorflow projects");
        assert!(best.score > 0.0 && best.score < CONFIDENT_FAQ_SCORE);
        let reply = a.respond("tensorflow projects");
        assert_eq!(reply.route, Route::Intent(IntentKey::Projects));
        assert!(reply.text.contains("Pneumoscan"));
    }

    #[test]
    fn test_contextual_answer_first() {
        let model = Arc::new(RecordingModel::answering("  I mostly write TypeScript.  "));
        let a = assistant().with_collaborators(
            Arc::new(FixedContext("Skills: React, Node.js".to_string())),
            model.clone(),
        );
        let reply = a.respond("name");
        assert_eq!(reply, Reply::new(Route::Contextual, "I mostly write TypeScript.".to_string()));
        let prompts = model.prompts.lock();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Skills: React, Node.js"));
        assert!(prompts[0].contains("Question: name"));
    }

    #[test]
    fn test_sentinel_context_skips_model() {
        let model = Arc::new(RecordingModel::answering("should not be used"));
        let a = assistant().with_collaborators(
            Arc::new(FixedContext(NO_CONTEXT_SENTINEL.to_string())),
            model.clone(),
        );
        assert_eq!(a.respond("stak").route, Route::Intent(IntentKey::Skills));
        assert!(model.prompts.lock().is_empty());
    }

    #[test]
    fn test_collaborator_failures_fall_through() {
        let a = assistant().with_collaborators(
            Arc::new(FixedContext("Skills".to_string())),
            Arc::new(RecordingModel::failing()),
        );
        assert_eq!(a.respond("stak").route, Route::Intent(IntentKey::Skills));

        let a = assistant().with_collaborators(
            Arc::new(FixedContext("Skills".to_string())),
            Arc::new(RecordingModel::answering("   ")),
        );
        assert_eq!(a.respond("stak").route, Route::Intent(IntentKey::Skills));

        let a = assistant().with_collaborators(
            Arc::new(FailingContext),
            Arc::new(RecordingModel::answering("unused")),
        );
        assert_eq!(a.respond("name").route, Route::Intent(IntentKey::Name));
    }

    #[test]
    fn test_greeting_beats_collaborators() {
        let model = Arc::new(RecordingModel::answering("llm"));
        let a = assistant().with_collaborators(Arc::new(FixedContext("ctx".to_string())), model.clone());
        assert_eq!(a.respond("hello").route, Route::Greeting);
        assert!(model.prompts.lock().is_empty());
    }

    #[test]
    fn test_cache_serves_repeat_queries() {
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(60), 10));
        let a = assistant().with_cache(cache.clone());

        let first = a.respond("Stak");
        assert_eq!(first.route, Route::Intent(IntentKey::Skills));
        let second = a.respond("hi, stak");
        assert_eq!(second.route, Route::Cached);
        assert_eq!(second.text, first.text);

        a.respond("hello");
        assert_eq!(cache.len(), 1);
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_shared_across_threads() {
        assert_send_sync::<Assistant>();
        assert_send_sync::<ResponseCache>();
        assert_send_sync::<KnowledgeBase>();

        let baseline = assistant();
        let queries = ["stak", "email and degree"];
        let expected: Vec<String> = queries.iter().map(|q| baseline.respond(q).text).collect();

        let cache = Arc::new(ResponseCache::new(Duration::from_secs(60), 10));
        let a = assistant().with_cache(cache.clone());
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for (query, text) in queries.iter().zip(&expected) {
                        let reply = a.respond(query);
                        assert_eq!(&reply.text, text, "{}", query);
                    }
                });
            }
        });
        assert_eq!(cache.len(), queries.len());
    }

    #[test]
    fn test_classifier_is_deterministic_across_calls() {
        let a = assistant();
        let first = a.score_all_intents("github and linkedin");
        let second = a.score_all_intents("github and linkedin");
        assert_eq!(first, second);
        assert_eq!(a.rank_faq("agile", 3), a.rank_faq("agile", 3));
    }
}
