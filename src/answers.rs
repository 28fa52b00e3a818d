//! Canned answer builders, one per intent, plus the fixed reply blocks

use crate::config::KnowledgeBase;
use crate::records::top_records;
use crate::types::{FaqEntry, IntentKey, Links, Resume, ScoredIndex};

pub const FOLLOW_UP: &str =
    "Anything else you'd like to know? You can ask about skills, projects, experience, or how to get in touch.";

/// Dispatch an intent to its builder
pub fn answer_for(key: IntentKey, query: &str, kb: &KnowledgeBase) -> String {
    let resume = &kb.resume;
    match key {
        IntentKey::Name => answer_name(resume),
        IntentKey::Contact => answer_contact(&resume.links),
        IntentKey::Skills => answer_skills(query, resume),
        IntentKey::Experience => answer_experience(query, kb),
        IntentKey::Projects => answer_projects(query, kb),
        IntentKey::Education => answer_education(resume),
        IntentKey::Achievements => answer_achievements(resume),
        IntentKey::Location => answer_location(resume),
        IntentKey::Availability => answer_availability(resume),
        IntentKey::About => answer_about(resume),
    }
}

pub fn introduction(persona: &str, resume: &Resume) -> String {
    format!(
        "Hi! I'm {}, the assistant for {}'s portfolio. Ask me about skills, projects, experience, education, or how to get in touch.",
        persona,
        display_name(resume)
    )
}

pub fn answer_name(resume: &Resume) -> String {
    if resume.headline.is_empty() {
        format!("My name is {}.", display_name(resume))
    } else {
        format!("My name is {}. {}", display_name(resume), resume.headline)
    }
}

pub fn answer_contact(links: &Links) -> String {
    let channels = contact_lines(links);
    if channels.is_empty() {
        return "I don't have any contact details listed yet.".to_string();
    }
    format!("You can reach me here:\n{}", channels.join("\n"))
}

pub fn answer_skills(query: &str, resume: &Resume) -> String {
    if resume.skills.is_empty() {
        return "I haven't listed my skills yet.".to_string();
    }
    let lines: Vec<String> = top_records(query, &resume.skills, resume.skills.len())
        .into_iter()
        .map(|group| format!("- **{}**: {}", group.name, group.items.join(", ")))
        .collect();
    format!("Here's my tech stack:\n{}", lines.join("\n"))
}

pub fn answer_experience(query: &str, kb: &KnowledgeBase) -> String {
    if kb.experiences.is_empty() {
        return "I haven't listed any work experience yet.".to_string();
    }
    let lines: Vec<String> = top_records(query, &kb.experiences, kb.settings.record_limit)
        .into_iter()
        .map(|job| {
            let mut line = format!("- **{}** at {} ({} - {})", job.role, job.company, job.start_date, job.end_date);
            if !job.location.is_empty() {
                line.push_str(&format!(", {}", job.location));
            }
            if let Some(first) = job.description.first() {
                line.push_str(&format!("\n  {}", first));
            }
            line
        })
        .collect();
    format!("My work experience:\n{}", lines.join("\n"))
}

pub fn answer_projects(query: &str, kb: &KnowledgeBase) -> String {
    if kb.projects.is_empty() {
        return "I haven't listed any projects yet.".to_string();
    }
    let lines: Vec<String> = top_records(query, &kb.projects, kb.settings.record_limit)
        .into_iter()
        .map(|project| {
            let mut line = format!("- **{}**: {}", project.title, project.description);
            if !project.technologies.is_empty() {
                line.push_str(&format!("\n  Tech: {}", project.technologies.join(", ")));
            }
            let links: Vec<String> = [("GitHub", &project.github), ("Live", &project.live)]
                .into_iter()
                .filter(|(_, url)| !url.is_empty())
                .map(|(label, url)| format!("{}: {}", label, url))
                .collect();
            if !links.is_empty() {
                line.push_str(&format!("\n  {}", links.join(" | ")));
            }
            line
        })
        .collect();
    format!("Here are some of my projects:\n{}", lines.join("\n"))
}

pub fn answer_education(resume: &Resume) -> String {
    if resume.education.is_empty() {
        return "I haven't listed my education yet.".to_string();
    }
    let lines: Vec<String> = resume
        .education
        .iter()
        .map(|item| format!("- {}, {} ({} - {})", item.program, item.institution, item.start_date, item.end_date))
        .collect();
    format!("My education:\n{}", lines.join("\n"))
}

pub fn answer_achievements(resume: &Resume) -> String {
    if resume.achievements.is_empty() {
        return "I haven't listed any achievements yet.".to_string();
    }
    let lines: Vec<String> = resume
        .achievements
        .iter()
        .map(|item| {
            let mut line = format!("- **{}**", item.title);
            if let Some(details) = item.details.as_deref().filter(|d| !d.is_empty()) {
                line.push_str(&format!(": {}", details));
            }
            if let Some(when) = item.when.as_deref().filter(|w| !w.is_empty()) {
                line.push_str(&format!(" ({})", when));
            }
            line
        })
        .collect();
    format!("Some highlights:\n{}", lines.join("\n"))
}

pub fn answer_location(resume: &Resume) -> String {
    let mut text = if resume.location.is_empty() {
        "I haven't listed my location yet.".to_string()
    } else {
        format!("I'm based in {}.", resume.location)
    };
    let prefs = &resume.work_preferences;
    if let Some(environment) = prefs.environment.as_deref() {
        text.push_str(&format!(" I prefer {} work", environment.to_lowercase()));
        text.push_str(if prefs.relocation {
            " and I'm open to relocation."
        } else {
            "."
        });
    } else if prefs.relocation {
        text.push_str(" I'm open to relocation.");
    }
    if let Some(timezone) = prefs.timezone.as_deref() {
        text.push_str(&format!(" Timezone: {}.", timezone));
    }
    text
}

pub fn answer_availability(resume: &Resume) -> String {
    let mut text = if resume.availability.is_empty() {
        "Please get in touch to discuss availability.".to_string()
    } else {
        format!("Availability: {}.", resume.availability)
    };
    if !resume.open_to.is_empty() {
        text.push_str(&format!(" Open to: {}.", resume.open_to.join(", ")));
    }
    text
}

pub fn answer_about(resume: &Resume) -> String {
    let mut parts = vec![format!("I'm {}.", display_name(resume))];
    if !resume.headline.is_empty() {
        parts.push(resume.headline.clone());
    }
    if !resume.about.is_empty() {
        parts.push(resume.about.clone());
    }
    parts.join(" ")
}

/// Numbered list of every FAQ question
pub fn faq_listing(faqs: &[FaqEntry]) -> String {
    if faqs.is_empty() {
        return "There are no FAQ entries yet.".to_string();
    }
    let lines: Vec<String> = faqs
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{}. {}", i + 1, entry.question))
        .collect();
    format!("Here are the questions I can answer:\n{}", lines.join("\n"))
}

/// Suggestion block for low-confidence FAQ matches with a positive score
pub fn did_you_mean(faqs: &[FaqEntry], matches: &[ScoredIndex]) -> String {
    let lines: Vec<String> = matches
        .iter()
        .filter(|m| m.score > 0.0)
        .filter_map(|m| faqs.get(m.index))
        .map(|entry| format!("- {}", entry.question))
        .collect();
    format!(
        "I'm not sure I understood. Did you mean:\n{}\n\nType \"list faq\" to see every question I can answer.",
        lines.join("\n")
    )
}

/// Reply when nothing in the reference data matched
pub fn no_data(links: &Links) -> String {
    let channels = contact_lines(links);
    if channels.is_empty() {
        return "I don't have information on that yet.".to_string();
    }
    format!(
        "I don't have information on that yet. You can reach me directly:\n{}",
        channels.join("\n")
    )
}

fn contact_lines(links: &Links) -> Vec<String> {
    [
        ("Email", links.email.as_deref().map(|e| e.trim_start_matches("mailto:"))),
        ("Phone", links.phone.as_deref()),
        ("LinkedIn", links.linkedin.as_deref()),
        ("GitHub", links.github.as_deref()),
        ("Portfolio", links.portfolio.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.filter(|v| !v.is_empty()).map(|v| format!("- {}: {}", label, v)))
    .collect()
}

fn display_name(resume: &Resume) -> &str {
    if resume.name.is_empty() {
        "the site owner"
    } else {
        &resume.name
    }
}
