//! Core data types for classification and retrieval results

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Topic category a query can be classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKey {
    Name,
    Contact,
    Skills,
    Experience,
    Projects,
    Education,
    Achievements,
    Location,
    Availability,
    About,
}

impl IntentKey {
    pub const ALL: [IntentKey; 10] = [
        IntentKey::Name,
        IntentKey::Contact,
        IntentKey::Skills,
        IntentKey::Experience,
        IntentKey::Projects,
        IntentKey::Education,
        IntentKey::Achievements,
        IntentKey::Location,
        IntentKey::Availability,
        IntentKey::About,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKey::Name => "name",
            IntentKey::Contact => "contact",
            IntentKey::Skills => "skills",
            IntentKey::Experience => "experience",
            IntentKey::Projects => "projects",
            IntentKey::Education => "education",
            IntentKey::Achievements => "achievements",
            IntentKey::Location => "location",
            IntentKey::Availability => "availability",
            IntentKey::About => "about",
        }
    }
}

impl fmt::Display for IntentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntentKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown intent key '{}'", s))
    }
}

/// A trigger phrase for intent matching: either a normalized literal or a compiled regex
#[derive(Debug, Clone)]
pub enum Trigger {
    Literal(String),
    Pattern(Regex),
}

impl Trigger {
    pub fn as_str(&self) -> &str {
        match self {
            Trigger::Literal(text) => text,
            Trigger::Pattern(re) => re.as_str(),
        }
    }
}

/// Binary match for one intent plus the exact-name boost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentScore {
    pub key: IntentKey,
    pub score: u32,
}

/// Position of a ranked item in its source list, with its score (higher is better)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredIndex {
    pub index: usize,
    pub score: f64,
}

/// A static question/answer pair used for direct-answer retrieval
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub twitter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    pub name: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationItem {
    pub institution: String,
    pub program: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievement {
    pub title: String,
    pub details: Option<String>,
    pub when: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkPreferences {
    pub environment: Option<String>,
    pub relocation: bool,
    pub timezone: Option<String>,
}

/// Résumé of the site owner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Resume {
    pub name: String,
    pub headline: String,
    pub about: String,
    pub location: String,
    pub availability: String,
    pub open_to: Vec<String>,
    pub languages: Vec<String>,
    pub links: Links,
    pub skills: Vec<SkillGroup>,
    pub education: Vec<EducationItem>,
    pub achievements: Vec<Achievement>,
    pub work_preferences: WorkPreferences,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub github: String,
    pub live: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub role: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub description: Vec<String>,
    pub skills: Vec<String>,
}

/// Which precedence step produced a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "intent", rename_all = "snake_case")]
pub enum Route {
    Greeting,
    Command,
    Cached,
    Contextual,
    Faq,
    DidYouMean,
    MultiIntent,
    NoData,
    Intent(IntentKey),
}

impl Route {
    pub fn label(&self) -> &'static str {
        match self {
            Route::Greeting => "greeting",
            Route::Command => "command",
            Route::Cached => "cache",
            Route::Contextual => "contextual",
            Route::Faq => "faq",
            Route::DidYouMean => "did_you_mean",
            Route::MultiIntent => "multi_intent",
            Route::NoData => "no_data",
            Route::Intent(_) => "intent",
        }
    }
}

/// Final answer for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub route: Route,
    pub text: String,
}

impl Reply {
    pub fn new(route: Route, text: String) -> Self {
        Self { route, text }
    }
}
