//! Narrative summary built from the analyzed sections.

use crate::models::{AnalysisResult, BrandFitSummary, Category, ConfidenceTier};

/// Sources named in the opening sentence
pub const MAX_NAMED_SOURCES: usize = 4;
/// Result counts below this get a limited-data caveat at low confidence
pub const LIMITED_DATA_RESULTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FitTendency {
    Small,
    Large,
    TrueToSize,
}

const SMALL_PHRASES: &[&str] = &["runs small", "run small", "running small"];
const LARGE_PHRASES: &[&str] = &[
    "runs large",
    "run large",
    "running large",
    "runs big",
    "run big",
];
const TRUE_TO_SIZE_PHRASES: &[&str] = &["true to size", "true-to-size"];
/// Words that cancel a sizing phrase when they come just before it
const NEGATIONS: &[&str] = &[
    "no need to",
    "don't",
    "do not",
    "doesn't",
    "does not",
    "didn't",
    "not",
    "never",
    "no",
];

/// Whether `phrase` occurs in `text` without a negation right before it
fn states(text: &str, phrase: &str) -> bool {
    text.match_indices(phrase).any(|(at, _)| {
        let before = text[..at].trim_end();
        !NEGATIONS
            .iter()
            .any(|n| before.ends_with(n) && is_word_start(before, before.len() - n.len()))
    })
}

fn is_word_start(text: &str, at: usize) -> bool {
    text[..at]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric() && c != '\'')
}

fn states_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| states(text, p))
}

/// Tendency stated by a fit recommendation, if it states exactly one.
/// Explicit run-small/large and true-to-size phrases decide first; sizing
/// advice is only read when none of them is present.
fn fit_tendency(recommendation: &str) -> Option<FitTendency> {
    let text = recommendation.to_lowercase();
    let stated: Vec<FitTendency> = [
        (FitTendency::Small, states_any(&text, SMALL_PHRASES)),
        (FitTendency::Large, states_any(&text, LARGE_PHRASES)),
        (FitTendency::TrueToSize, states_any(&text, TRUE_TO_SIZE_PHRASES)),
    ]
    .into_iter()
    .filter_map(|(tendency, present)| present.then_some(tendency))
    .collect();

    match stated.as_slice() {
        [one] => Some(*one),
        [] => match (states(&text, "size up"), states(&text, "size down")) {
            (true, false) => Some(FitTendency::Small),
            (false, true) => Some(FitTendency::Large),
            _ => None,
        },
        _ => None,
    }
}

fn sentence(text: &str) -> String {
    let text = text.trim().trim_end_matches('.');
    format!("{}.", text)
}

fn opening(total_results: usize, sources: &[String]) -> String {
    let noun = if total_results == 1 { "result" } else { "results" };
    let named: Vec<&str> = sources
        .iter()
        .take(MAX_NAMED_SOURCES)
        .map(String::as_str)
        .collect();
    if named.is_empty() {
        format!("Analyzed {} {}.", total_results, noun)
    } else {
        format!(
            "Analyzed {} {} from {}.",
            total_results,
            noun,
            named.join(", ")
        )
    }
}

/// Compose the summary paragraph. Clauses appear only for sections that exist.
pub fn synthesize(
    analysis: &AnalysisResult,
    total_results: usize,
    category: Category,
    sources: &[String],
) -> String {
    if analysis.is_empty() {
        let noun = if total_results == 1 { "result" } else { "results" };
        return format!(
            "Analyzed {} {}; not enough consistent feedback was found to assess fit or quality.",
            total_results, noun
        );
    }

    let mut parts = vec![opening(total_results, sources)];

    if category.has_fit() {
        if let Some(fit) = &analysis.fit {
            let clause = match fit_tendency(&fit.recommendation) {
                Some(FitTendency::Small) => Some("Reviewers say it tends to run small, so consider sizing up."),
                Some(FitTendency::Large) => Some("Reviewers say it tends to run large, so consider sizing down."),
                Some(FitTendency::TrueToSize) => Some("Most reviewers find it true to size."),
                None => None,
            };
            if let Some(clause) = clause {
                parts.push(clause.to_string());
            }
        }
    }

    if let Some(quality) = &analysis.quality {
        let lead = match quality.confidence {
            ConfidenceTier::High => Some("Reviewers consistently report"),
            ConfidenceTier::Medium => Some("Several reviewers note"),
            ConfidenceTier::Low => None,
        };
        if let Some(lead) = lead {
            parts.push(sentence(&format!(
                "{}: {}",
                lead,
                lowercase_first(&quality.recommendation)
            )));
        }
    }

    if let Some(fabric) = &analysis.fabric {
        parts.push(sentence(&fabric.recommendation));
    }

    if let Some(materials) = &analysis.materials {
        parts.push(format!(
            "Reported composition: {}.",
            materials.composition.join(", ")
        ));
    }

    if let Some(wash_care) = &analysis.wash_care {
        parts.push(sentence(&format!(
            "Care: {}",
            lowercase_first(&wash_care.recommendation)
        )));
    }

    if analysis.overall_confidence == ConfidenceTier::Low && total_results < LIMITED_DATA_RESULTS {
        parts.push("Based on limited data, so treat this as a rough guide.".to_string());
    }

    parts.join(" ")
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.trim().chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Assemble the response summary for a finished analysis
pub fn build_summary(
    analysis: &AnalysisResult,
    total_results: usize,
    category: Category,
    sources: Vec<String>,
) -> BrandFitSummary {
    let sections = analysis.sections();
    BrandFitSummary {
        summary: synthesize(analysis, total_results, category, &sources),
        confidence: if sections.is_empty() {
            ConfidenceTier::Low
        } else {
            analysis.overall_confidence
        },
        has_data: !sections.is_empty(),
        sections,
        total_results,
        sources,
    }
}
