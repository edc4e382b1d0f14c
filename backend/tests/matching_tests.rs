//! Invoice name matching tests
//!
//! Tests for the fuzzy matcher including:
//! - Score bounds and symmetry of the containment case
//! - First-wins tie breaking
//! - Unmatched items left for the operator

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::matching::{find_best_match, match_items, similarity, ExtractedItem};
use shared::models::Product;

fn product(name: &str) -> Product {
    Product {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        name: name.to_string(),
        unit: "un".to_string(),
        min_stock: 0,
        price: Decimal::from(1),
        consumption_unit: None,
        consumption_rate: None,
        created_at: Utc::now(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_known_containment_score() {
        // 14 chars contained in 16 chars
        let score = similarity("Luva Nitrílica M", "Luva Nitrílica");
        assert!((score - 0.7875).abs() < 1e-9);
    }

    #[test]
    fn test_case_and_whitespace_normalization() {
        assert_eq!(similarity("GAZE ESTÉRIL", "  gaze estéril  "), 1.0);
    }

    #[test]
    fn test_accents_are_not_folded() {
        // é vs e is a different character, so no containment either way
        assert_eq!(similarity("Gaze Estéril", "Gaze Esteril"), 0.0);
    }

    #[test]
    fn test_unmatched_items_keep_zero_score() {
        let products = vec![product("Seringa")];
        let items = vec![ExtractedItem {
            name: "Abaixador de língua".to_string(),
            quantity: 5,
        }];
        let matches = match_items(&items, &products);
        assert!(matches[0].product_id.is_none());
        assert_eq!(matches[0].score, 0.0);
        assert_eq!(matches[0].quantity, 5);
    }

    #[test]
    fn test_ties_keep_the_first_product() {
        let first = product("Luva M");
        let second = product("luva m");
        let products = vec![first.clone(), second];
        let (winner, _) = find_best_match("LUVA M", &products).unwrap();
        assert_eq!(winner.id, first.id);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn name_strategy() -> impl Strategy<Value = String> {
        "[a-z0-9 ]{1,30}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Scores always stay inside [0, 1]
        #[test]
        fn prop_score_bounds(a in name_strategy(), b in name_strategy()) {
            let score = similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        /// The containment case is symmetric
        #[test]
        fn prop_similarity_symmetric(a in name_strategy(), b in name_strategy()) {
            prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
        }

        /// A name always matches itself with score 1.0
        #[test]
        fn prop_exact_match_scores_one(name in name_strategy()) {
            prop_assert_eq!(similarity(&name, &name), 1.0);
        }

        /// A proper prefix scores below 1.0 but above 0.0
        #[test]
        fn prop_containment_scores_strictly_between(
            name in "[a-z]{2,15}",
            suffix in "[a-z]{1,10}"
        ) {
            let longer = format!("{}{}", name, suffix);
            let score = similarity(&name, &longer);
            prop_assert!(score > 0.0);
            prop_assert!(score < 1.0);
        }

        /// The best match never scores below any other candidate
        #[test]
        fn prop_best_match_is_maximal(
            needle in name_strategy(),
            names in prop::collection::vec(name_strategy(), 1..10)
        ) {
            let products: Vec<Product> = names.iter().map(|n| product(n)).collect();
            if let Some((_, best_score)) = find_best_match(&needle, &products) {
                for p in &products {
                    prop_assert!(similarity(&needle, &p.name) <= best_score);
                }
                prop_assert!(best_score > 0.0);
            } else {
                // no match means every candidate scored zero
                for p in &products {
                    prop_assert_eq!(similarity(&needle, &p.name), 0.0);
                }
            }
        }

        /// match_items keeps item order and count
        #[test]
        fn prop_match_items_preserves_items(
            names in prop::collection::vec(name_strategy(), 0..10)
        ) {
            let items: Vec<ExtractedItem> = names
                .iter()
                .map(|n| ExtractedItem { name: n.clone(), quantity: 1 })
                .collect();
            let matches = match_items(&items, &[]);
            prop_assert_eq!(matches.len(), items.len());
            for (m, i) in matches.iter().zip(items.iter()) {
                prop_assert_eq!(&m.extracted_name, &i.name);
            }
        }
    }
}
