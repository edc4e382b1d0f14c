//! Invoice line matching
//!
//! Extracted invoice item names rarely match catalog names exactly. The
//! matcher scores each catalog product against the extracted name and keeps
//! the best candidate above a confidence threshold.

use serde::{Deserialize, Serialize};

use crate::models::Product;

/// Outcome of matching one extracted item against the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemMatch {
    pub extracted_name: String,
    pub quantity: i64,
    /// Best catalog candidate with a nonzero score, if any
    pub product_id: Option<uuid::Uuid>,
    pub product_name: Option<String>,
    pub score: f64,
}

/// An item extracted from an invoice document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub name: String,
    pub quantity: i64,
}

/// Invoice fields extracted from a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedInvoice {
    pub supplier: String,
    pub date: Option<chrono::NaiveDate>,
    pub items: Vec<ExtractedItem>,
}

/// Score the similarity of two product names
///
/// Names are lowercased and trimmed first. An exact match scores 1.0; if
/// either name contains the other, the score is the shorter length divided
/// by the longer, damped by 0.9. Lengths are counted in characters, not
/// bytes, so accented names compare by what the user sees. Anything else
/// scores 0.0. No accent folding is applied.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    if a.contains(&b) || b.contains(&a) {
        let len_a = a.chars().count() as f64;
        let len_b = b.chars().count() as f64;
        return len_a.min(len_b) / len_a.max(len_b) * 0.9;
    }
    0.0
}

/// Find the catalog product that best matches an extracted name
///
/// Returns the first product with the strictly highest nonzero score;
/// later products must beat, not tie, the current best. A zero score
/// leaves the item unmatched for the operator to resolve.
pub fn find_best_match<'a>(name: &str, products: &'a [Product]) -> Option<(&'a Product, f64)> {
    let mut best: Option<(&Product, f64)> = None;
    for product in products {
        let score = similarity(name, &product.name);
        if score > best.map_or(0.0, |(_, s)| s) {
            best = Some((product, score));
        }
    }
    best
}

/// Match every extracted item against the catalog
pub fn match_items(items: &[ExtractedItem], products: &[Product]) -> Vec<ItemMatch> {
    items
        .iter()
        .map(|item| {
            let matched = find_best_match(&item.name, products);
            ItemMatch {
                extracted_name: item.name.clone(),
                quantity: item.quantity,
                product_id: matched.map(|(p, _)| p.id),
                product_name: matched.map(|(p, _)| p.name.clone()),
                score: matched.map_or(0.0, |(_, s)| s),
            }
        })
        .collect()
}
