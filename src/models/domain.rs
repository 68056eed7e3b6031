use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One search-engine hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

impl RawResult {
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: url.into(),
        }
    }

    /// Lower-cased title and snippet, the text every keyword lane scans
    pub fn text_lower(&self) -> String {
        format!("{} {}", self.title, self.snippet).to_lowercase()
    }
}

/// Product category inferred from the brand and item strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Clothing,
    Bags,
    Shoes,
    Accessories,
    General,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Clothing,
        Category::Bags,
        Category::Shoes,
        Category::Accessories,
        Category::General,
    ];

    /// Whether sizing feedback is meaningful for this category
    pub fn has_fit(self) -> bool {
        matches!(self, Category::Clothing | Category::Shoes)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Clothing => "clothing",
            Category::Bags => "bags",
            Category::Shoes => "shoes",
            Category::Accessories => "accessories",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One independently analyzed dimension of brand feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Aspect {
    Fit,
    Quality,
    Fabric,
    WashCare,
    Materials,
}

/// How much evidence backs a claim. Ordered `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    #[default]
    #[serde(alias = "Low", alias = "LOW")]
    Low,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "High", alias = "HIGH")]
    High,
}

impl ConfidenceTier {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceTier::Low => "low",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::High => "high",
        }
    }
}

/// A literal quote backing a recommendation.
///
/// `origin` is the index of the [`RawResult`] the quote was drawn from. It never
/// leaves the process; on the wire evidence is a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Evidence {
    pub quote: String,
    #[serde(skip)]
    pub origin: Option<usize>,
}

impl Evidence {
    pub fn new(quote: impl Into<String>, origin: usize) -> Self {
        Self {
            quote: quote.into(),
            origin: Some(origin),
        }
    }

    pub fn unattributed(quote: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            origin: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectSection {
    pub recommendation: String,
    #[serde(default)]
    pub confidence: ConfidenceTier,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

/// Material composition section, only produced for specific clothing items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialsSection {
    pub composition: Vec<String>,
    #[serde(default)]
    pub confidence: ConfidenceTier,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

/// Any emitted section, keyed by [`Aspect`] in [`BrandFitSummary::sections`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Section {
    Materials(MaterialsSection),
    Aspect(AspectSection),
}

impl Section {
    pub fn confidence(&self) -> ConfidenceTier {
        match self {
            Section::Materials(m) => m.confidence,
            Section::Aspect(a) => a.confidence,
        }
    }

    pub fn evidence(&self) -> &[Evidence] {
        match self {
            Section::Materials(m) => &m.evidence,
            Section::Aspect(a) => &a.evidence,
        }
    }
}

/// Structured output of an analyzer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<AspectSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<AspectSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fabric: Option<AspectSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wash_care: Option<AspectSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<MaterialsSection>,
    #[serde(default)]
    pub overall_confidence: ConfidenceTier,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.fit.is_none()
            && self.quality.is_none()
            && self.fabric.is_none()
            && self.wash_care.is_none()
            && self.materials.is_none()
    }

    /// Highest tier among the present sections
    pub fn best_confidence(&self) -> Option<ConfidenceTier> {
        self.sections().values().map(Section::confidence).max()
    }

    /// Drop sections without evidence and clamp the overall tier to the best
    /// section tier. Applied to every result before it leaves an analyzer.
    pub fn settle(mut self) -> Self {
        fn keep(section: &Option<AspectSection>) -> bool {
            section.as_ref().is_some_and(|s| !s.evidence.is_empty())
        }
        if !keep(&self.fit) {
            self.fit = None;
        }
        if !keep(&self.quality) {
            self.quality = None;
        }
        if !keep(&self.fabric) {
            self.fabric = None;
        }
        if !keep(&self.wash_care) {
            self.wash_care = None;
        }
        if self
            .materials
            .as_ref()
            .is_some_and(|m| m.evidence.is_empty() || m.composition.is_empty())
        {
            self.materials = None;
        }

        self.overall_confidence = match self.best_confidence() {
            Some(best) => self.overall_confidence.min(best),
            None => ConfidenceTier::Low,
        };
        self
    }

    pub fn sections(&self) -> BTreeMap<Aspect, Section> {
        let mut sections = BTreeMap::new();
        let lanes = [
            (Aspect::Fit, &self.fit),
            (Aspect::Quality, &self.quality),
            (Aspect::Fabric, &self.fabric),
            (Aspect::WashCare, &self.wash_care),
        ];
        for (aspect, section) in lanes {
            if let Some(section) = section {
                sections.insert(aspect, Section::Aspect(section.clone()));
            }
        }
        if let Some(materials) = &self.materials {
            sections.insert(Aspect::Materials, Section::Materials(materials.clone()));
        }
        sections
    }

    /// Every evidence quote across all sections
    pub fn evidence(&self) -> impl Iterator<Item = &Evidence> {
        [&self.fit, &self.quality, &self.fabric, &self.wash_care]
            .into_iter()
            .flatten()
            .flat_map(|s| s.evidence.iter())
            .chain(self.materials.iter().flat_map(|m| m.evidence.iter()))
    }

    /// Keep only the evidence quotes for which `keep` holds
    pub fn retain_evidence(&mut self, keep: impl Fn(&Evidence) -> bool) {
        for section in [
            &mut self.fit,
            &mut self.quality,
            &mut self.fabric,
            &mut self.wash_care,
        ]
        .into_iter()
        .flatten()
        {
            section.evidence.retain(&keep);
        }
        if let Some(materials) = &mut self.materials {
            materials.evidence.retain(&keep);
        }
    }

    pub fn evidence_mut(&mut self) -> impl Iterator<Item = &mut Evidence> {
        [
            &mut self.fit,
            &mut self.quality,
            &mut self.fabric,
            &mut self.wash_care,
        ]
        .into_iter()
        .flatten()
        .flat_map(|s| s.evidence.iter_mut())
        .chain(self.materials.iter_mut().flat_map(|m| m.evidence.iter_mut()))
    }
}

/// Normalized review derived from exactly one [`RawResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub title: String,
    pub snippet: String,
    pub url: String,
    pub source: String,
    pub tags: Vec<String>,
    pub confidence: ConfidenceTier,
    pub brand_level: bool,
    pub full_content: String,
}

/// Source-taxonomy bucket a review is grouped into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewBucket {
    Primary,
    Community,
    Blogs,
    Videos,
    Social,
    Publications,
    Other,
}

/// Total, disjoint partition of reviews by source family
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedReviews {
    pub primary: Vec<Review>,
    pub community: Vec<Review>,
    pub blogs: Vec<Review>,
    pub videos: Vec<Review>,
    pub social: Vec<Review>,
    pub publications: Vec<Review>,
    pub other: Vec<Review>,
}

impl GroupedReviews {
    pub fn bucket(&self, bucket: ReviewBucket) -> &[Review] {
        match bucket {
            ReviewBucket::Primary => &self.primary,
            ReviewBucket::Community => &self.community,
            ReviewBucket::Blogs => &self.blogs,
            ReviewBucket::Videos => &self.videos,
            ReviewBucket::Social => &self.social,
            ReviewBucket::Publications => &self.publications,
            ReviewBucket::Other => &self.other,
        }
    }

    pub fn bucket_mut(&mut self, bucket: ReviewBucket) -> &mut Vec<Review> {
        match bucket {
            ReviewBucket::Primary => &mut self.primary,
            ReviewBucket::Community => &mut self.community,
            ReviewBucket::Blogs => &mut self.blogs,
            ReviewBucket::Videos => &mut self.videos,
            ReviewBucket::Social => &mut self.social,
            ReviewBucket::Publications => &mut self.publications,
            ReviewBucket::Other => &mut self.other,
        }
    }

    pub fn len(&self) -> usize {
        self.primary.len()
            + self.community.len()
            + self.blogs.len()
            + self.videos.len()
            + self.social.len()
            + self.publications.len()
            + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Final narrative plus the sections it was built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandFitSummary {
    pub summary: String,
    pub confidence: ConfidenceTier,
    pub sections: BTreeMap<Aspect, Section>,
    pub has_data: bool,
    pub total_results: usize,
    pub sources: Vec<String>,
}

impl BrandFitSummary {
    /// Summary carrying only a message, used by every degraded path
    pub fn message_only(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            confidence: ConfidenceTier::Low,
            sections: BTreeMap::new(),
            has_data: false,
            total_results: 0,
            sources: vec![],
        }
    }
}
