//! Evidence extraction over a deduplicated view of the search results.

use crate::core::keywords::{KeywordGroup, DEDUP_PREFIX_CHARS, MAX_QUOTE_CHARS};
use crate::models::{Evidence, RawResult};
use std::collections::HashSet;

/// One unique result with its pre-lowered text
#[derive(Debug, Clone)]
pub struct CorpusEntry<'a> {
    /// Index into the original result slice, the join key for evidence
    pub index: usize,
    pub result: &'a RawResult,
    /// Lower-cased title and snippet
    pub text: String,
    /// Lower-cased snippet only; evidence is quoted from the snippet
    pub snippet: String,
}

impl CorpusEntry<'_> {
    /// Quote this entry's snippet when `predicate` holds on it. Falls back to
    /// the untrimmed snippet if trimming would cut the matching words.
    pub fn quote_if(&self, predicate: impl Fn(&str) -> bool) -> Option<Evidence> {
        if self.snippet.trim().is_empty() || !predicate(&self.snippet) {
            return None;
        }
        let short = quote(&self.result.snippet);
        let text = if predicate(&short.to_lowercase()) {
            short
        } else {
            collapse_whitespace(&self.result.snippet)
        };
        Some(Evidence::new(text, self.index))
    }
}

/// Search results with duplicate snippets removed
#[derive(Debug, Clone)]
pub struct Corpus<'a> {
    entries: Vec<CorpusEntry<'a>>,
}

impl<'a> Corpus<'a> {
    pub fn new(results: &'a [RawResult]) -> Self {
        let mut seen = HashSet::new();
        let entries = results
            .iter()
            .enumerate()
            .filter(|(_, r)| seen.insert(dedup_key(r)))
            .map(|(index, result)| CorpusEntry {
                index,
                result,
                text: result.text_lower(),
                snippet: result.snippet.to_lowercase(),
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[CorpusEntry<'a>] {
        &self.entries
    }

    /// Number of unique results matching `group`
    pub fn count(&self, group: &KeywordGroup) -> usize {
        self.entries.iter().filter(|e| group.matches(&e.text)).count()
    }

    /// Number of unique results matching `predicate` on their full text
    pub fn count_where(&self, predicate: impl Fn(&str) -> bool) -> usize {
        self.entries.iter().filter(|e| predicate(&e.text)).count()
    }

    /// Quote up to `limit` snippets matching `group`, in result order
    pub fn evidence_for(&self, group: &KeywordGroup, limit: usize) -> Vec<Evidence> {
        self.evidence_where(|snippet| group.matches(snippet), limit)
    }

    /// Quote up to `limit` snippets for which `predicate` holds on the
    /// lower-cased snippet. The quote itself must still satisfy the predicate
    /// after truncation.
    pub fn evidence_where(
        &self,
        predicate: impl Fn(&str) -> bool,
        limit: usize,
    ) -> Vec<Evidence> {
        let mut evidence = Vec::new();
        for entry in &self.entries {
            if evidence.len() >= limit {
                break;
            }
            if let Some(found) = entry.quote_if(&predicate) {
                evidence.push(found);
            }
        }
        evidence
    }
}

/// Normalized snippet prefix used to detect the same hit returned by two queries
pub fn dedup_key(result: &RawResult) -> String {
    let source = if result.snippet.trim().is_empty() {
        &result.title
    } else {
        &result.snippet
    };
    collapse_whitespace(source)
        .to_lowercase()
        .chars()
        .take(DEDUP_PREFIX_CHARS)
        .collect()
}

/// Snippet text trimmed to [`MAX_QUOTE_CHARS`], cut on a word boundary
pub fn quote(snippet: &str) -> String {
    let text = collapse_whitespace(snippet);
    if text.chars().count() <= MAX_QUOTE_CHARS {
        return text;
    }
    let cut: String = text.chars().take(MAX_QUOTE_CHARS).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) if idx > MAX_QUOTE_CHARS / 2 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}...", cut.trim_end_matches(|c: char| c.is_ascii_punctuation()))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keywords::{FIT_RUNS_SMALL, FIT_TABLE};

    fn result(snippet: &str) -> RawResult {
        RawResult::new("Review", snippet, "https://example.com/a")
    }

    #[test]
    fn test_duplicates_removed_by_prefix() {
        let results = vec![
            result("These jeans run small, size up one."),
            result("These  jeans run small,   size up one."),
            result("Completely different text"),
        ];
        let corpus = Corpus::new(&results);
        assert_eq!(corpus.entries().len(), 2);
        assert_eq!(corpus.entries()[1].index, 2);
    }

    #[test]
    fn test_evidence_keeps_origin_index() {
        let results = vec![
            result("Nothing about sizing here"),
            result("Honestly it runs small in the shoulders"),
        ];
        let corpus = Corpus::new(&results);
        let group = FIT_TABLE.group(FIT_RUNS_SMALL).unwrap();
        let evidence = corpus.evidence_for(group, 3);
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].origin, Some(1));
        assert_eq!(evidence[0].quote, "Honestly it runs small in the shoulders");
    }

    #[test]
    fn test_title_only_match_yields_no_evidence() {
        let results = vec![RawResult::new(
            "Does it run small?",
            "I wore it to a wedding",
            "https://example.com",
        )];
        let corpus = Corpus::new(&results);
        let group = FIT_TABLE.group(FIT_RUNS_SMALL).unwrap();
        assert_eq!(corpus.count(group), 1);
        assert!(corpus.evidence_for(group, 3).is_empty());
    }

    #[test]
    fn test_long_quote_is_trimmed() {
        let long = "word ".repeat(100);
        let q = quote(&long);
        assert!(q.ends_with("..."));
        assert!(q.chars().count() <= MAX_QUOTE_CHARS + 3);
    }
}
