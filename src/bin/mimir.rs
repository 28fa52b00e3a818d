//! Mimir command-line front end.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use mimir_core::{
    normalize, tokenize, Assistant, IntentKey, IntentScore, KnowledgeBase, ResponseCache, Result,
    ScoredIndex,
};

#[derive(Parser, Debug)]
#[command(name = "mimir", version, about = "Answer questions about a résumé, projects and FAQ")]
struct Args {
    /// Knowledge base JSON file; the embedded data is used when omitted
    #[arg(long, env = "MIMIR_DATA")]
    data: Option<PathBuf>,

    /// Print the classification report instead of the reply
    #[arg(long)]
    explain: bool,

    /// Question to answer; reads one question per line from stdin when empty
    query: Vec<String>,
}

#[derive(Serialize)]
struct Explanation<'a> {
    query: &'a str,
    normalized: String,
    tokens: Vec<String>,
    intents: Vec<IntentScore>,
    matched_triggers: Vec<MatchedTrigger>,
    faq: Vec<ScoredIndex>,
    route: &'static str,
}

#[derive(Serialize)]
struct MatchedTrigger {
    intent: IntentKey,
    trigger: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let kb = match &args.data {
        Some(path) => KnowledgeBase::from_path(path)?,
        None => KnowledgeBase::builtin()?,
    };
    let cache = Arc::new(ResponseCache::new(kb.settings.cache_ttl(), kb.settings.cache_capacity));
    let assistant = Assistant::new(Arc::new(kb)).with_cache(cache);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !args.query.is_empty() {
        let query = args.query.join(" ");
        answer(&assistant, &query, args.explain, &mut out)?;
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        answer(&assistant, &line, args.explain, &mut out)?;
        writeln!(out)?;
    }
    Ok(())
}

fn answer<W: Write>(assistant: &Assistant, query: &str, explain: bool, out: &mut W) -> Result<()> {
    if explain {
        let kb = assistant.knowledge();
        let normalized = normalize(query);
        let intents = assistant.score_all_intents(query);
        let text = normalized.as_str();
        let matched_triggers = intents
            .iter()
            .filter(|s| s.score > 0)
            .flat_map(move |s| {
                kb.synonyms
                    .triggers(s.key)
                    .iter()
                    .filter(move |t| t.matches(text))
                    .map(move |t| MatchedTrigger {
                        intent: s.key,
                        trigger: t.as_str().to_string(),
                    })
            })
            .collect();
        let report = Explanation {
            query,
            tokens: tokenize(query),
            normalized,
            intents,
            matched_triggers,
            faq: assistant.rank_faq(query, kb.settings.suggestion_count),
            route: assistant.respond(query).route.label(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        writeln!(out, "{}", assistant.respond(query).text)?;
    }
    Ok(())
}
