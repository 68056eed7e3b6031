//! Human-readable source names for result URLs.

use crate::core::evidence::collapse_whitespace;
use crate::models::{AnalysisResult, RawResult};
use reqwest::Url;
use std::collections::HashSet;

/// Host prefixes that never carry the site identity
const HOST_PREFIXES: &[&str] = &["www.", "m.", "old.", "amp.", "mobile."];

/// Exact host to display-name table, matched after [`HOST_PREFIXES`] are removed
const SOURCE_NAMES: &[(&str, &str)] = &[
    ("reddit.com", "Reddit"),
    ("youtube.com", "YouTube"),
    ("youtu.be", "YouTube"),
    ("instagram.com", "Instagram"),
    ("tiktok.com", "TikTok"),
    ("x.com", "X"),
    ("twitter.com", "X"),
    ("facebook.com", "Facebook"),
    ("pinterest.com", "Pinterest"),
    ("medium.com", "Medium"),
    ("quora.com", "Quora"),
    ("substack.com", "Substack"),
    ("styleforum.net", "StyleForum"),
    ("trustpilot.com", "Trustpilot"),
    ("amazon.com", "Amazon"),
    ("gq.com", "GQ"),
    ("vogue.com", "Vogue"),
    ("esquire.com", "Esquire"),
    ("nytimes.com", "The New York Times"),
    ("businessinsider.com", "Business Insider"),
    ("refinery29.com", "Refinery29"),
    ("whowhatwear.com", "Who What Wear"),
    ("harpersbazaar.com", "Harper's Bazaar"),
    ("elle.com", "Elle"),
];

/// Display name for the site behind `url`, or an empty string when the URL
/// has no usable host. Hosts missing from [`SOURCE_NAMES`] are named after
/// their first DNS label.
pub fn source_name(url: &str) -> String {
    let Some(host) = host_of(url) else {
        return String::new();
    };

    if let Some((_, name)) = SOURCE_NAMES.iter().find(|(d, _)| *d == host) {
        return (*name).to_string();
    }

    capitalize(host.split('.').next().unwrap_or_default())
}

/// Lower-cased host with noise prefixes removed
pub fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let mut host = parsed.host_str()?.to_lowercase();
    while let Some(prefix) = HOST_PREFIXES.iter().find(|p| host.starts_with(*p)) {
        host = host[prefix.len()..].to_string();
    }
    (!host.is_empty()).then_some(host)
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Join unattributed evidence back to the result it was quoted from.
///
/// A quote belongs to the first result whose snippet or title contains it,
/// ignoring case, whitespace runs and a trailing ellipsis. Quotes found in no
/// result are dropped.
pub fn attach_origins(analysis: &mut AnalysisResult, results: &[RawResult]) {
    let haystacks: Vec<String> = results
        .iter()
        .map(|r| collapse_whitespace(&r.text_lower()))
        .collect();

    for evidence in analysis.evidence_mut() {
        if evidence.origin.is_some() {
            continue;
        }
        let needle = collapse_whitespace(&evidence.quote.to_lowercase());
        let needle = needle
            .trim_end_matches("...")
            .trim_end_matches('…')
            .trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace());
        if needle.is_empty() {
            continue;
        }
        evidence.origin = haystacks.iter().position(|h| h.contains(needle));
    }
    analysis.retain_evidence(|e| e.origin.is_some());
}

/// Unique, non-empty source names for the results the analysis cites, in
/// first-cited order. When nothing is attributed, every result counts.
pub fn collect_sources(analysis: &AnalysisResult, results: &[RawResult]) -> Vec<String> {
    let cited: Vec<usize> = analysis.evidence().filter_map(|e| e.origin).collect();
    let urls: Vec<&str> = if cited.is_empty() {
        results.iter().map(|r| r.url.as_str()).collect()
    } else {
        cited
            .iter()
            .filter_map(|&i| results.get(i))
            .map(|r| r.url.as_str())
            .collect()
    };

    let mut seen = HashSet::new();
    urls.into_iter()
        .map(source_name)
        .filter(|name| !name.is_empty() && seen.insert(name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AspectSection, ConfidenceTier, Evidence};

    #[test]
    fn test_known_domains() {
        assert_eq!(source_name("https://www.reddit.com/r/malefashionadvice/abc"), "Reddit");
        assert_eq!(source_name("https://old.reddit.com/r/x"), "Reddit");
        assert_eq!(source_name("https://youtu.be/abc"), "YouTube");
        assert_eq!(source_name("https://x.com/someone/status/1"), "X");
        assert_eq!(source_name("https://www.gq.com/story/best-tees"), "GQ");
        assert_eq!(source_name("https://m.youtube.com/watch?v=1"), "YouTube");
    }

    #[test]
    fn test_unknown_domain_capitalizes_first_label() {
        assert_eq!(source_name("https://www.fashionbeans.com/article"), "Fashionbeans");
        assert_eq!(source_name("https://shop.example.co.uk/item"), "Shop");
        assert_eq!(source_name("https://someblog.wordpress.com/x"), "Someblog");
        assert_eq!(source_name("https://jane.substack.com/p/review"), "Jane");
    }

    #[test]
    fn test_unparseable_url_is_empty() {
        assert_eq!(source_name(""), "");
        assert_eq!(source_name("not a url"), "");
        assert_eq!(source_name("mailto:someone@example.com"), "");
    }

    #[test]
    fn test_attach_origins_by_containment() {
        let results = vec![
            RawResult::new("A", "Nothing to see", "https://a.com"),
            RawResult::new("B", "Honestly these  run small in the toes", "https://b.com"),
        ];
        let mut analysis = AnalysisResult {
            fit: Some(AspectSection {
                recommendation: "Runs small".to_string(),
                confidence: ConfidenceTier::Low,
                evidence: vec![
                    Evidence::unattributed("these run small in the..."),
                    Evidence::unattributed("invented quote"),
                ],
            }),
            ..Default::default()
        };
        attach_origins(&mut analysis, &results);
        let origins: Vec<_> = analysis.evidence().map(|e| e.origin).collect();
        assert_eq!(origins, vec![Some(1)]);
    }

    #[test]
    fn test_attach_origins_drops_quotes_found_nowhere() {
        let results = vec![RawResult::new("A", "Love the color", "https://a.com")];
        let mut analysis = AnalysisResult {
            quality: Some(AspectSection {
                recommendation: "Very durable".to_string(),
                confidence: ConfidenceTier::High,
                evidence: vec![Evidence::unattributed(
                    "Best sweater I have ever owned, lasted ten years",
                )],
            }),
            ..Default::default()
        };
        attach_origins(&mut analysis, &results);
        assert_eq!(analysis.evidence().count(), 0);
        assert!(analysis.settle().is_empty());
    }

    #[test]
    fn test_collect_sources_dedups_and_skips_empty() {
        let results = vec![
            RawResult::new("A", "a", "https://www.reddit.com/r/a"),
            RawResult::new("B", "b", "garbage"),
            RawResult::new("C", "c", "https://reddit.com/r/c"),
            RawResult::new("D", "d", "https://www.vogue.com/x"),
        ];
        let sources = collect_sources(&AnalysisResult::default(), &results);
        assert_eq!(sources, vec!["Reddit", "Vogue"]);
    }

    #[test]
    fn test_collect_sources_prefers_cited_results() {
        let results = vec![
            RawResult::new("A", "a", "https://www.reddit.com/r/a"),
            RawResult::new("D", "d", "https://www.vogue.com/x"),
        ];
        let analysis = AnalysisResult {
            quality: Some(AspectSection {
                recommendation: "Well made".to_string(),
                confidence: ConfidenceTier::Low,
                evidence: vec![Evidence::new("d", 1)],
            }),
            ..Default::default()
        };
        assert_eq!(collect_sources(&analysis, &results), vec!["Vogue"]);
    }
}
