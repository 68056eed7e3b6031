//! Deterministic keyword engine used when the LLM-backed analyzer fails or is
//! not configured. A pure function of its inputs.

use crate::core::classifier::{item_tokens, mentions_brand, mentions_item};
use crate::core::evidence::{collapse_whitespace, Corpus};
use crate::core::keywords::{
    contains_term, min_mentions, AspectTable, KeywordGroup, FABRIC_MATERIALS, FABRIC_SOFT,
    FABRIC_TABLE, FIT_RUNS_LARGE, FIT_RUNS_SMALL, FIT_TABLE, HIGH_MENTIONS, MAX_COMPOSITIONS,
    MAX_EVIDENCE, MAX_MATERIAL_EVIDENCE, MEDIUM_MENTIONS, QUALITY_HIGH_MIN_MENTIONS,
    QUALITY_HIGH_RATIO, QUALITY_NEGATIVE, QUALITY_NEGATIVE_RATIO, QUALITY_POSITIVE,
    QUALITY_POSITIVE_RATIO, QUALITY_TABLE, WASH_CARE_TABLE, WASH_HOLDS, WASH_SHRINKS,
};
use crate::models::{
    AnalysisResult, AspectSection, Category, ConfidenceTier, MaterialsSection, RawResult,
};
use regex::Regex;
use std::sync::OnceLock;

/// Run every applicable lane over `results`
pub fn analyze_fallback(
    results: &[RawResult],
    brand: &str,
    category: Category,
    item_name: &str,
    specific_item: bool,
) -> AnalysisResult {
    let corpus = Corpus::new(results);
    let threshold = min_mentions(results.len());

    let fit = if category.has_fit() || category == Category::General {
        analyze_fit(&corpus, threshold)
    } else {
        None
    };
    let wash_care = if matches!(category, Category::Clothing | Category::General) {
        analyze_wash_care(&corpus, threshold)
    } else {
        None
    };
    let materials = if specific_item && category == Category::Clothing {
        analyze_materials(&corpus, brand, item_name)
    } else {
        None
    };

    let mut result = AnalysisResult {
        fit,
        quality: analyze_quality(&corpus, threshold),
        fabric: analyze_fabric(&corpus, threshold),
        wash_care,
        materials,
        overall_confidence: ConfidenceTier::Low,
    };
    result.overall_confidence = result.best_confidence().unwrap_or(ConfidenceTier::Low);
    result.settle()
}

/// Tier from the dominant pattern's mention count
pub fn tier_from_mentions(mentions: usize) -> ConfidenceTier {
    if mentions >= HIGH_MENTIONS {
        ConfidenceTier::High
    } else if mentions >= MEDIUM_MENTIONS {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

/// Tier for a bivalent lane: a strongly one-sided share with a few mentions
/// also counts as `high`.
pub fn tier_from_ratio(dominant: usize, share: f64) -> ConfidenceTier {
    if share >= QUALITY_HIGH_RATIO && dominant >= QUALITY_HIGH_MIN_MENTIONS {
        ConfidenceTier::High
    } else {
        tier_from_mentions(dominant)
    }
}

struct Tally {
    group: &'static KeywordGroup,
    count: usize,
}

fn tally(corpus: &Corpus<'_>, table: &AspectTable) -> Vec<Tally> {
    let tallies: Vec<Tally> = table
        .groups
        .iter()
        .map(|group| Tally {
            group,
            count: corpus.count(group),
        })
        .collect();
    tracing::trace!(
        aspect = ?table.aspect,
        counts = ?tallies.iter().map(|t| (t.group.name, t.count)).collect::<Vec<_>>(),
        "keyword tally"
    );
    tallies
}

/// Highest count; ties go to the group listed first in the table
fn dominant(tallies: &[Tally]) -> Option<&Tally> {
    tallies
        .iter()
        .fold(None, |best: Option<&Tally>, t| match best {
            Some(b) if b.count >= t.count => Some(b),
            _ => Some(t),
        })
        .filter(|t| t.count > 0)
}

fn analyze_fit(corpus: &Corpus<'_>, threshold: usize) -> Option<AspectSection> {
    let tallies = tally(corpus, &FIT_TABLE);
    let total: usize = tallies.iter().map(|t| t.count).sum();
    if total < threshold {
        return None;
    }
    let top = dominant(&tallies)?;

    let recommendation = match top.group.name {
        FIT_RUNS_SMALL => "Tends to run small; consider sizing up.",
        FIT_RUNS_LARGE => "Tends to run large; consider sizing down.",
        _ => "Generally fits true to size.",
    };

    section(
        recommendation,
        tier_from_mentions(top.count),
        corpus.evidence_for(top.group, MAX_EVIDENCE),
    )
}

fn analyze_quality(corpus: &Corpus<'_>, threshold: usize) -> Option<AspectSection> {
    let positive = QUALITY_TABLE.group(QUALITY_POSITIVE)?;
    let negative = QUALITY_TABLE.group(QUALITY_NEGATIVE)?;
    let pos = corpus.count(positive);
    let neg = corpus.count(negative);
    let total = pos + neg;
    if total == 0 || total < threshold {
        return None;
    }

    let ratio = pos as f64 / total as f64;
    let dominant_count = pos.max(neg);
    let share = dominant_count as f64 / total as f64;

    let (recommendation, evidence) = if ratio >= QUALITY_POSITIVE_RATIO {
        (
            "Generally well made; reviewers praise durability and construction.",
            corpus.evidence_for(positive, MAX_EVIDENCE),
        )
    } else if ratio <= QUALITY_NEGATIVE_RATIO {
        (
            "Quality concerns are common; reviewers report wear and durability problems.",
            corpus.evidence_for(negative, MAX_EVIDENCE),
        )
    } else {
        (
            "Quality feedback is mixed; some reviewers praise it while others report durability issues.",
            corpus.evidence_where(|s| positive.matches(s) || negative.matches(s), MAX_EVIDENCE),
        )
    };

    section(recommendation, tier_from_ratio(dominant_count, share), evidence)
}

fn mentions_material(text: &str) -> bool {
    FABRIC_MATERIALS.iter().any(|m| contains_term(text, m))
}

fn analyze_fabric(corpus: &Corpus<'_>, threshold: usize) -> Option<AspectSection> {
    let tallies: Vec<Tally> = FABRIC_TABLE
        .groups
        .iter()
        .map(|group| Tally {
            group,
            count: corpus.count_where(|t| mentions_material(t) && group.matches(t)),
        })
        .collect();
    let total: usize = tallies.iter().map(|t| t.count).sum();
    if total < threshold {
        return None;
    }
    let top = dominant(&tallies)?;

    let feel = if top.group.name == FABRIC_SOFT {
        "Fabric is described as soft and substantial"
    } else {
        "Fabric is often described as thin or rough"
    };
    let materials = top_materials(corpus, 3);
    let recommendation = if materials.is_empty() {
        format!("{}.", feel)
    } else {
        format!("{}; commonly mentioned: {}.", feel, materials.join(", "))
    };

    let group = top.group;
    section(
        &recommendation,
        tier_from_mentions(top.count),
        corpus.evidence_where(|s| mentions_material(s) && group.matches(s), MAX_EVIDENCE),
    )
}

/// Most-mentioned materials; ties keep table order
fn top_materials(corpus: &Corpus<'_>, limit: usize) -> Vec<&'static str> {
    let mut counts: Vec<(&'static str, usize)> = FABRIC_MATERIALS
        .iter()
        .map(|m| (*m, corpus.count_where(|t| contains_term(t, m))))
        .filter(|(_, count)| *count > 0)
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(m, _)| m).collect()
}

fn analyze_wash_care(corpus: &Corpus<'_>, threshold: usize) -> Option<AspectSection> {
    let tallies = tally(corpus, &WASH_CARE_TABLE);
    let total: usize = tallies.iter().map(|t| t.count).sum();
    if total < threshold {
        return None;
    }
    let top = dominant(&tallies)?;

    let recommendation = match top.group.name {
        WASH_SHRINKS => "May shrink after washing; wash cold and air dry.",
        WASH_HOLDS => "Holds up well in the wash.",
        _ => "May stretch out or lose shape over time.",
    };

    section(
        recommendation,
        tier_from_mentions(top.count),
        corpus.evidence_for(top.group, MAX_EVIDENCE),
    )
}

fn section(
    recommendation: &str,
    confidence: ConfidenceTier,
    evidence: Vec<crate::models::Evidence>,
) -> Option<AspectSection> {
    // Counts alone never justify a claim
    if evidence.is_empty() {
        return None;
    }
    Some(AspectSection {
        recommendation: recommendation.to_string(),
        confidence,
        evidence,
    })
}

const FIBERS: &str = "wool|cotton|cashmere|silk|linen|polyester|nylon|elastane|spandex|viscose|rayon|modal|lyocell|tencel|acrylic|alpaca|mohair|hemp|polyamide|merino|leather";
const FIBER_QUALIFIERS: &str =
    "organic|merino|pima|supima|recycled|virgin|mongolian|baby|extra-fine|egyptian|italian";

fn percent_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(
            r"\b(\d{{1,3}})\s*%\s*((?:(?:{FIBER_QUALIFIERS})\s+)?(?:{FIBERS}))\b"
        ))
        .expect("valid regex")
    })
}

fn blend_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(
            r"\b((?:(?:{FIBER_QUALIFIERS})\s+)?(?:{FIBERS}))[\s-]+blend\b"
        ))
        .expect("valid regex")
    })
}

/// Normalized material compositions found in lower-cased `text`, in order
pub fn extract_compositions(text: &str) -> Vec<String> {
    let mut found = Vec::new();

    for caps in percent_pattern().captures_iter(text) {
        let percent = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
        let fiber = caps.get(2).map(|m| collapse_whitespace(m.as_str()));
        if let (Some(percent), Some(fiber)) = (percent, fiber) {
            if (1..=100).contains(&percent) {
                found.push(format!("{}% {}", percent, fiber));
            }
        }
    }
    for caps in blend_pattern().captures_iter(text) {
        if let Some(fiber) = caps.get(1) {
            found.push(format!("{} blend", collapse_whitespace(fiber.as_str())));
        }
    }

    found
}

fn analyze_materials(
    corpus: &Corpus<'_>,
    brand: &str,
    item_name: &str,
) -> Option<MaterialsSection> {
    let tokens = item_tokens(item_name);
    let mut composition: Vec<String> = Vec::new();
    let mut evidence = Vec::new();
    let mut mentions = 0;

    for entry in corpus.entries() {
        if !mentions_brand(&entry.text, brand) || !mentions_item(&entry.text, &tokens) {
            continue;
        }
        let found = extract_compositions(&entry.text);
        if found.is_empty() {
            continue;
        }
        mentions += 1;

        for item in found {
            if composition.len() < MAX_COMPOSITIONS
                && !composition.iter().any(|c| c.eq_ignore_ascii_case(&item))
            {
                composition.push(item);
            }
        }
        if evidence.len() < MAX_MATERIAL_EVIDENCE {
            if let Some(quote) = entry.quote_if(|s| !extract_compositions(s).is_empty()) {
                evidence.push(quote);
            }
        }
    }

    if composition.is_empty() || evidence.is_empty() {
        return None;
    }
    Some(MaterialsSection {
        composition,
        confidence: tier_from_mentions(mentions),
        evidence,
    })
}
