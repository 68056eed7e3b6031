//! Keyword tables and tuning constants for the rule-based analysis lanes.
//!
//! Every aspect lane is a list of [`KeywordGroup`]s. A result counts once toward
//! a group when its lower-cased text contains any of the group's terms and none
//! of its blockers.

use crate::models::Aspect;

/// Corpora smaller than this use [`SPARSE_MIN_MENTIONS`]
pub const SMALL_CORPUS_RESULTS: usize = 15;
/// Mentions required to attempt an aspect on a small corpus
pub const SPARSE_MIN_MENTIONS: usize = 1;
/// Mentions required to attempt an aspect on a larger corpus
pub const DENSE_MIN_MENTIONS: usize = 2;

/// Dominant-pattern mentions for a `high` tier
pub const HIGH_MENTIONS: usize = 4;
/// Dominant-pattern mentions for a `medium` tier
pub const MEDIUM_MENTIONS: usize = 2;

/// Positive share at or above which quality reads as positive
pub const QUALITY_POSITIVE_RATIO: f64 = 0.6;
/// Positive share at or below which quality reads as negative
pub const QUALITY_NEGATIVE_RATIO: f64 = 0.4;
/// Dominant share that lifts quality to `high` with few mentions
pub const QUALITY_HIGH_RATIO: f64 = 0.8;
/// Minimum dominant mentions for the ratio shortcut to `high`
pub const QUALITY_HIGH_MIN_MENTIONS: usize = 2;

pub const MAX_EVIDENCE: usize = 3;
pub const MAX_COMPOSITIONS: usize = 5;
pub const MAX_MATERIAL_EVIDENCE: usize = 3;
/// Evidence quotes longer than this are cut at a word boundary
pub const MAX_QUOTE_CHARS: usize = 240;
/// Length of the normalized snippet prefix used to spot duplicate results
pub const DEDUP_PREFIX_CHARS: usize = 60;

/// A named set of phrases that count as one signal
#[derive(Debug, Clone, Copy)]
pub struct KeywordGroup {
    pub name: &'static str,
    pub terms: &'static [&'static str],
    pub blockers: &'static [&'static str],
}

impl KeywordGroup {
    pub fn matches(&self, text_lower: &str) -> bool {
        self.terms.iter().any(|t| contains_phrase(text_lower, t))
            && !self.blockers.iter().any(|b| contains_phrase(text_lower, b))
    }
}

/// Keyword groups analyzed as one lane
#[derive(Debug, Clone, Copy)]
pub struct AspectTable {
    pub aspect: Aspect,
    pub groups: &'static [KeywordGroup],
}

impl AspectTable {
    pub fn group(&self, name: &str) -> Option<&'static KeywordGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}

pub const FIT_RUNS_SMALL: &str = "runs_small";
pub const FIT_RUNS_LARGE: &str = "runs_large";
pub const FIT_TRUE_TO_SIZE: &str = "true_to_size";

pub const FIT_TABLE: AspectTable = AspectTable {
    aspect: Aspect::Fit,
    groups: &[
        KeywordGroup {
            name: FIT_RUNS_SMALL,
            terms: &[
                "runs small",
                "run small",
                "running small",
                "runs a bit small",
                "runs a little small",
                "size up",
                "sized up",
                "sizing up",
                "too small",
                "too tight",
                "smaller than expected",
                "snug fit",
            ],
            blockers: &[],
        },
        KeywordGroup {
            name: FIT_RUNS_LARGE,
            terms: &[
                "runs large",
                "run large",
                "runs big",
                "run big",
                "runs a bit large",
                "runs a little big",
                "size down",
                "sized down",
                "sizing down",
                "too big",
                "too loose",
                "larger than expected",
            ],
            blockers: &[],
        },
        KeywordGroup {
            name: FIT_TRUE_TO_SIZE,
            terms: &[
                "true to size",
                "true-to-size",
                "tts",
                "fits perfectly",
                "fit perfectly",
                "fits as expected",
                "perfect fit",
                "fits true",
            ],
            blockers: &[],
        },
    ],
};

pub const QUALITY_POSITIVE: &str = "positive";
pub const QUALITY_NEGATIVE: &str = "negative";

pub const QUALITY_TABLE: AspectTable = AspectTable {
    aspect: Aspect::Quality,
    groups: &[
        KeywordGroup {
            name: QUALITY_POSITIVE,
            terms: &[
                "high quality",
                "high-quality",
                "great quality",
                "good quality",
                "excellent quality",
                "quality is great",
                "well made",
                "well-made",
                "well constructed",
                "durable",
                "sturdy",
                "holds up",
                "held up",
                "built to last",
                "worth the price",
                "worth every penny",
            ],
            blockers: &["not worth"],
        },
        KeywordGroup {
            name: QUALITY_NEGATIVE,
            terms: &[
                "poor quality",
                "low quality",
                "bad quality",
                "quality has gone down",
                "cheap",
                "cheaply made",
                "falls apart",
                "fell apart",
                "flimsy",
                "pilling",
                "pilled",
                "ripped",
                "frayed",
                "holes",
                "not worth",
            ],
            blockers: &[],
        },
    ],
};

pub const FABRIC_SOFT: &str = "soft";
pub const FABRIC_THIN: &str = "thin";

/// Fiber and material names recognised by the fabric lane
pub const FABRIC_MATERIALS: &[&str] = &[
    "cotton",
    "wool",
    "merino",
    "cashmere",
    "linen",
    "silk",
    "polyester",
    "nylon",
    "denim",
    "leather",
    "suede",
    "fleece",
    "rayon",
    "viscose",
    "modal",
    "lyocell",
    "tencel",
    "spandex",
    "elastane",
    "acrylic",
    "alpaca",
    "canvas",
];

pub const FABRIC_TABLE: AspectTable = AspectTable {
    aspect: Aspect::Fabric,
    groups: &[
        KeywordGroup {
            name: FABRIC_SOFT,
            terms: &[
                "soft",
                "thick",
                "substantial",
                "heavyweight",
                "breathable",
                "luxurious",
                "cozy",
                "smooth",
                "premium",
            ],
            blockers: &[],
        },
        KeywordGroup {
            name: FABRIC_THIN,
            terms: &[
                "thin",
                "see-through",
                "see through",
                "sheer",
                "scratchy",
                "itchy",
                "rough",
                "stiff",
            ],
            blockers: &[],
        },
    ],
};

pub const WASH_SHRINKS: &str = "shrinks";
pub const WASH_HOLDS: &str = "holds";
pub const WASH_STRETCHES: &str = "stretches";

const SHRINK_NEGATIONS: &[&str] = &[
    "didn't shrink",
    "did not shrink",
    "doesn't shrink",
    "does not shrink",
    "no shrinkage",
    "minimal shrinkage",
    "won't shrink",
];

pub const WASH_CARE_TABLE: AspectTable = AspectTable {
    aspect: Aspect::WashCare,
    groups: &[
        KeywordGroup {
            name: WASH_SHRINKS,
            terms: &["shrink", "shrinks", "shrank", "shrunk", "shrinkage", "shrinking"],
            blockers: SHRINK_NEGATIONS,
        },
        KeywordGroup {
            name: WASH_HOLDS,
            terms: &[
                "didn't shrink",
                "did not shrink",
                "doesn't shrink",
                "no shrinkage",
                "washes well",
                "washed well",
                "holds up in the wash",
                "held up in the wash",
                "held up after washing",
                "survived the wash",
                "still looks new",
            ],
            blockers: &[],
        },
        KeywordGroup {
            name: WASH_STRETCHES,
            terms: &[
                "stretched out",
                "stretches out",
                "lost its shape",
                "loses its shape",
                "loses shape",
                "bagged out",
                "bags out",
            ],
            blockers: &[],
        },
    ],
};

/// Fixed keyword to tag rules applied to every review
pub const TAG_RULES: &[(&str, &[&str])] = &[
    ("runs-small", &["runs small", "run small", "size up", "sized up", "too small"]),
    ("runs-large", &["runs large", "run large", "runs big", "size down", "sized down", "too big"]),
    ("true-to-size", &["true to size", "true-to-size", "fits perfectly"]),
    ("high-quality", &["high quality", "great quality", "well made", "well-made", "durable"]),
    ("quality-concerns", &["poor quality", "cheaply made", "fell apart", "falls apart", "flimsy"]),
    ("pilling", &["pilling", "pilled", "pills"]),
    ("may-shrink", &["shrink", "shrank", "shrunk", "shrinkage"]),
    ("comfortable", &["comfortable", "comfy"]),
    ("cotton", &["cotton"]),
    ("wool", &["wool", "merino"]),
    ("cashmere", &["cashmere"]),
    ("linen", &["linen"]),
    ("leather", &["leather"]),
    ("denim", &["denim"]),
];

pub const DEFAULT_TAG: &str = "general-review";

/// Phrases that show a review is talking about sizing
pub const REVIEW_FIT_PHRASES: &[&str] = &[
    "runs small",
    "runs large",
    "runs big",
    "true to size",
    "size up",
    "size down",
    "sized up",
    "sized down",
    "fits",
];

/// Phrases that show a review is talking about build or materials
pub const REVIEW_QUALITY_PHRASES: &[&str] = &[
    "quality",
    "durable",
    "well made",
    "fabric",
    "material",
    "cotton",
    "wool",
    "leather",
    "stitching",
];

/// First-hand review language
pub const REVIEW_LANGUAGE: &[&str] = &[
    "review",
    "bought",
    "purchased",
    "ordered",
    "i own",
    "wearing",
    "wore",
    "months",
    "after a year",
];

/// True when `phrase` occurs in `haystack` on word boundaries
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    haystack
        .match_indices(phrase)
        .any(|(start, _)| boundary_before(haystack, start) && boundary_at(haystack, start + phrase.len()))
}

/// Like [`contains_phrase`] but also accepts an `s` or `es` plural suffix
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    haystack.match_indices(term).any(|(start, _)| {
        if !boundary_before(haystack, start) {
            return false;
        }
        let end = start + term.len();
        let rest = &haystack[end..];
        boundary_at(haystack, end)
            || (rest.starts_with('s') && boundary_at(haystack, end + 1))
            || (rest.starts_with("es") && boundary_at(haystack, end + 2))
    })
}

pub fn contains_any_phrase(haystack: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(haystack, p))
}

fn boundary_before(haystack: &str, idx: usize) -> bool {
    haystack[..idx]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric())
}

fn boundary_at(haystack: &str, idx: usize) -> bool {
    haystack[idx..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric())
}

/// Minimum mentions an aspect needs before it is attempted
pub fn min_mentions(corpus_len: usize) -> usize {
    if corpus_len < SMALL_CORPUS_RESULTS {
        SPARSE_MIN_MENTIONS
    } else {
        DENSE_MIN_MENTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_respects_word_boundaries() {
        assert!(contains_phrase("these runs small, sadly", "runs small"));
        assert!(!contains_phrase("ruins smaller", "runs small"));
        assert!(!contains_phrase("the capsule", "cap"));
        assert!(contains_phrase("tts.", "tts"));
    }

    #[test]
    fn test_term_accepts_plurals() {
        assert!(contains_term("new sneakers", "sneaker"));
        assert!(contains_term("leather dresses", "dress"));
        assert!(!contains_term("sneakerhead", "sneaker"));
    }

    #[test]
    fn test_shrink_blockers() {
        let shrinks = WASH_CARE_TABLE.group(WASH_SHRINKS).unwrap();
        assert!(shrinks.matches("it shrank a full size"));
        assert!(!shrinks.matches("washed it ten times and it didn't shrink"));

        let holds = WASH_CARE_TABLE.group(WASH_HOLDS).unwrap();
        assert!(holds.matches("washed it ten times and it didn't shrink"));
    }

    #[test]
    fn test_adaptive_threshold() {
        assert_eq!(min_mentions(0), SPARSE_MIN_MENTIONS);
        assert_eq!(min_mentions(SMALL_CORPUS_RESULTS - 1), SPARSE_MIN_MENTIONS);
        assert_eq!(min_mentions(SMALL_CORPUS_RESULTS), DENSE_MIN_MENTIONS);
    }

    #[test]
    fn test_tables_have_terms() {
        for table in [FIT_TABLE, QUALITY_TABLE, FABRIC_TABLE, WASH_CARE_TABLE] {
            assert!(!table.groups.is_empty());
            for group in table.groups {
                assert!(!group.terms.is_empty(), "{} has no terms", group.name);
                for term in group.terms {
                    assert_eq!(*term, term.to_lowercase());
                }
            }
        }
    }

    #[test]
    fn test_tag_rules_are_unique() {
        let mut tags: Vec<&str> = TAG_RULES.iter().map(|(tag, _)| *tag).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), TAG_RULES.len());
    }
}
