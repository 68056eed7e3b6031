// Unit tests for Brand Fit

use brand_fit::config::Settings;
use brand_fit::core::classifier::{categorize, is_known_brand, is_specific_item_search};
use brand_fit::core::fallback::{extract_compositions, tier_from_mentions, tier_from_ratio};
use brand_fit::core::grouping::{bucket_for, review_tags};
use brand_fit::core::keywords::{
    min_mentions, FABRIC_TABLE, FIT_TABLE, QUALITY_TABLE, WASH_CARE_TABLE,
};
use brand_fit::core::queries::{build_search_queries, MAX_QUERIES};
use brand_fit::core::sources::source_name;
use brand_fit::core::summary::build_summary;
use brand_fit::core::validation::check_fashion_brand;
use brand_fit::models::{
    AnalysisResult, BrandFitRequest, Category, ConfidenceTier, ReviewBucket,
};

#[test]
fn test_categorization_is_total() {
    let brands = ["Everlane", "Allbirds", "Coach", "", "!!!", "Unknown Label"];
    let items = ["", "tote", "sneakers", "belt", "t-shirt", "🙂", "gift card"];
    for brand in brands {
        for item in items {
            let category = categorize(brand, item);
            assert!(Category::ALL.contains(&category));
        }
    }
}

#[test]
fn test_category_precedence() {
    // bag terms are checked before clothing terms
    assert_eq!(categorize("Madewell", "leather tote"), Category::Bags);
    // shoe terms before accessories
    assert_eq!(categorize("Everlane", "sneaker belt"), Category::Shoes);
    assert_eq!(categorize("Allbirds", "wool runners"), Category::Shoes);
    assert_eq!(categorize("Uniqlo", ""), Category::Clothing);
}

#[test]
fn test_specific_item_flag() {
    assert!(is_specific_item_search("Everlane", "The Organic Cotton Box-Cut Tee"));
    assert!(is_specific_item_search("Madewell", "Perfect Vintage"));
    assert!(!is_specific_item_search("Madewell", ""));
    assert!(!is_specific_item_search("Madewell", "Perfect"));
}

#[test]
fn test_curated_brand_tables() {
    assert!(is_known_brand("Everlane"));
    assert!(is_known_brand("dr. martens"));
    assert!(!is_known_brand("Acme Widgets"));
}

#[test]
fn test_query_plans_always_name_the_brand() {
    for category in Category::ALL {
        for (item, specific) in [("", false), ("cashmere crew", true)] {
            let queries = build_search_queries("Quince", category, item, specific);
            assert!(!queries.is_empty() && queries.len() <= MAX_QUERIES);
            assert!(queries.iter().all(|q| q.contains("Quince")));
            if specific {
                assert!(queries[0].contains("\"Quince cashmere crew\""));
            }
        }
    }
}

#[test]
fn test_keyword_tables_cover_every_lane() {
    assert_eq!(FIT_TABLE.groups.len(), 3);
    assert_eq!(QUALITY_TABLE.groups.len(), 2);
    assert_eq!(FABRIC_TABLE.groups.len(), 2);
    assert_eq!(WASH_CARE_TABLE.groups.len(), 3);
}

#[test]
fn test_tier_cut_points() {
    assert_eq!(tier_from_mentions(0), ConfidenceTier::Low);
    assert_eq!(tier_from_mentions(1), ConfidenceTier::Low);
    assert_eq!(tier_from_mentions(2), ConfidenceTier::Medium);
    assert_eq!(tier_from_mentions(3), ConfidenceTier::Medium);
    assert_eq!(tier_from_mentions(4), ConfidenceTier::High);
    assert_eq!(tier_from_ratio(2, 1.0), ConfidenceTier::High);
    assert_eq!(tier_from_ratio(2, 0.7), ConfidenceTier::Medium);
    assert_eq!(tier_from_ratio(1, 1.0), ConfidenceTier::Low);
    assert_eq!(min_mentions(3), 1);
    assert_eq!(min_mentions(30), 2);
}

#[test]
fn test_composition_patterns() {
    assert_eq!(
        extract_compositions("shell: 70% wool, 30% cashmere"),
        vec!["70% wool", "30% cashmere"]
    );
    assert_eq!(extract_compositions("a soft cotton-blend knit"), vec!["cotton blend"]);
    assert_eq!(extract_compositions("100 % organic cotton"), vec!["100% organic cotton"]);
    assert!(extract_compositions("200% cotton").is_empty());
    assert!(extract_compositions("a great sweater").is_empty());
}

#[test]
fn test_source_names() {
    assert_eq!(source_name("https://www.reddit.com/r/x"), "Reddit");
    assert_eq!(source_name("https://m.youtube.com/watch?v=1"), "YouTube");
    assert_eq!(source_name("https://www.nytimes.com/wirecutter/x"), "The New York Times");
    assert_eq!(source_name("https://www.permanentstyle.com/x"), "Permanentstyle");
    assert_eq!(source_name("::"), "");
}

#[test]
fn test_review_buckets_and_tags() {
    assert_eq!(bucket_for("https://www.reddit.com/r/x"), ReviewBucket::Primary);
    assert_eq!(bucket_for("https://community.example.com/t/1"), ReviewBucket::Community);
    assert_eq!(bucket_for("https://vimeo.com/1"), ReviewBucket::Videos);
    assert_eq!(bucket_for("https://www.pinterest.com/pin/1"), ReviewBucket::Social);
    assert_eq!(bucket_for("https://www.harpersbazaar.com/x"), ReviewBucket::Publications);

    let tags = review_tags("true to size and it shrank a bit");
    assert_eq!(tags, vec!["true-to-size", "may-shrink"]);
}

#[test]
fn test_summary_without_sections() {
    let summary = build_summary(&AnalysisResult::default(), 7, Category::Shoes, vec![]);
    assert!(!summary.has_data);
    assert_eq!(summary.total_results, 7);
    assert!(summary.summary.contains("7 results"));
}

#[test]
fn test_domain_check() {
    assert!(check_fashion_brand("Everlane").is_ok());
    assert!(check_fashion_brand("Coach").is_ok());
    assert!(check_fashion_brand("Spotify").is_err());
    assert!(check_fashion_brand("42").is_err());
}

#[test]
fn test_request_resolution_with_snake_case_aliases() {
    let request: BrandFitRequest = serde_json::from_str(
        r#"{"brand": "Aritzia", "item_name": "", "url_extraction": {"item_name": "Effortless Pant"}}"#,
    )
    .unwrap();
    let resolved = request.resolve();
    assert_eq!(resolved.brand, "Aritzia");
    assert_eq!(resolved.item_name, "Effortless Pant");
    assert!(resolved.forced_specific);
}

#[test]
fn test_default_config_file_matches_defaults() {
    let raw = std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml"))
        .unwrap();
    let parsed: toml::Value = toml::from_str(&raw).unwrap();
    let defaults = Settings::default();

    assert_eq!(
        parsed["server"]["port"].as_integer(),
        Some(defaults.server.port as i64)
    );
    assert_eq!(
        parsed["analysis"]["max_reviews"].as_integer(),
        Some(defaults.analysis.max_reviews as i64)
    );
    assert_eq!(
        parsed["llm"]["max_results_in_prompt"].as_integer(),
        Some(defaults.llm.max_results_in_prompt as i64)
    );
    assert_eq!(parsed["search"]["endpoint"].as_str(), Some(defaults.search.endpoint.as_str()));
    assert!(parsed["search"].get("api_key").is_none());
}
