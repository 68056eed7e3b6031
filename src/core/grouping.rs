//! Review normalization, tagging and source-family grouping.

use crate::core::classifier::{item_tokens, mentions_item};
use crate::core::evidence::dedup_key;
use crate::core::keywords::{
    contains_any_phrase, DEFAULT_TAG, REVIEW_FIT_PHRASES, REVIEW_LANGUAGE, REVIEW_QUALITY_PHRASES,
    TAG_RULES,
};
use crate::core::sources::{host_of, source_name};
use crate::models::{ConfidenceTier, GroupedReviews, RawResult, Review, ReviewBucket};
use std::collections::HashSet;

/// Ordered source families; the first family with a hit wins. Needles with a
/// dot are domains and match the host or its subdomains, the rest match
/// anywhere in the URL.
const FAMILIES: &[(ReviewBucket, &[&str])] = &[
    (ReviewBucket::Primary, &["reddit", "substack"]),
    (
        ReviewBucket::Community,
        &["forum", "community", "styleforum", "quora", "discourse", "stackexchange"],
    ),
    (
        ReviewBucket::Blogs,
        &["blog", "medium.com", "wordpress", "blogspot"],
    ),
    (ReviewBucket::Videos, &["youtube", "youtu.be", "vimeo", "tiktok"]),
    (
        ReviewBucket::Social,
        &["instagram", "twitter", "facebook", "pinterest", "threads.net", "x.com"],
    ),
    (
        ReviewBucket::Publications,
        &[
            "vogue.com",
            "vogue.co.uk",
            "gq.com",
            "gq-magazine.co.uk",
            "nytimes.com",
            "esquire.com",
            "elle.com",
            "harpersbazaar.com",
            "businessinsider.com",
            "refinery29.com",
            "whowhatwear.com",
            "cosmopolitan.com",
            "forbes.com",
            "glamour.com",
            "glamourmagazine.co.uk",
            "instyle.com",
        ],
    ),
];

const FIT_PHRASE_SCORE: u32 = 2;
const QUALITY_PHRASE_SCORE: u32 = 1;
const REVIEW_LANGUAGE_SCORE: u32 = 1;
const HIGH_REVIEW_SCORE: u32 = 3;
const MEDIUM_REVIEW_SCORE: u32 = 1;

/// Bucket for a review URL. Total: anything unmatched is `Other`.
pub fn bucket_for(url: &str) -> ReviewBucket {
    let url_lower = url.to_lowercase();
    let host = host_of(url).unwrap_or_default();
    let hit = |needle: &&str| {
        if needle.contains('.') {
            host == *needle || host.ends_with(&format!(".{}", needle))
        } else {
            url_lower.contains(needle)
        }
    };

    FAMILIES
        .iter()
        .find(|(_, needles)| needles.iter().any(hit))
        .map_or(ReviewBucket::Other, |(bucket, _)| *bucket)
}

/// Fixed keyword tags for one result's text
pub fn review_tags(text_lower: &str) -> Vec<String> {
    let tags: Vec<String> = TAG_RULES
        .iter()
        .filter(|(_, phrases)| contains_any_phrase(text_lower, phrases))
        .map(|(tag, _)| (*tag).to_string())
        .collect();

    if tags.is_empty() {
        vec![DEFAULT_TAG.to_string()]
    } else {
        tags
    }
}

/// Keyword-density score for a single review
pub fn review_score(text_lower: &str) -> u32 {
    let mut score = 0;
    if contains_any_phrase(text_lower, REVIEW_FIT_PHRASES) {
        score += FIT_PHRASE_SCORE;
    }
    if contains_any_phrase(text_lower, REVIEW_QUALITY_PHRASES) {
        score += QUALITY_PHRASE_SCORE;
    }
    if contains_any_phrase(text_lower, REVIEW_LANGUAGE) {
        score += REVIEW_LANGUAGE_SCORE;
    }
    score
}

pub fn review_confidence(score: u32) -> ConfidenceTier {
    if score >= HIGH_REVIEW_SCORE {
        ConfidenceTier::High
    } else if score >= MEDIUM_REVIEW_SCORE {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

/// Build one review per unique result, in result order, capped at `max_reviews`
pub fn normalize_reviews(results: &[RawResult], item_name: &str, max_reviews: usize) -> Vec<Review> {
    let tokens = item_tokens(item_name);
    let item_requested = !item_name.trim().is_empty();
    let mut seen = HashSet::new();

    results
        .iter()
        .filter(|r| seen.insert(dedup_key(r)))
        .take(max_reviews)
        .map(|r| {
            let text = r.text_lower();
            Review {
                title: r.title.clone(),
                snippet: r.snippet.clone(),
                url: r.url.clone(),
                source: source_name(&r.url),
                tags: review_tags(&text),
                confidence: review_confidence(review_score(&text)),
                brand_level: !item_requested || !mentions_item(&text, &tokens),
                full_content: format!("{}\n\n{}", r.title, r.snippet),
            }
        })
        .collect()
}

/// Partition reviews into source-family buckets, preserving order within each
pub fn group_reviews(reviews: &[Review]) -> GroupedReviews {
    let mut grouped = GroupedReviews::default();
    for review in reviews {
        grouped.bucket_mut(bucket_for(&review.url)).push(review.clone());
    }
    grouped
}
