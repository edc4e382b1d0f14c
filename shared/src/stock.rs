//! Derived stock computation
//!
//! Stock balances are never stored. They are recomputed on demand from the
//! full movement history: balance = total entries - total exits. Negative
//! balances are permitted and surfaced as-is so that data-entry mistakes
//! stay visible instead of being silently clamped.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Product, StockEntry, StockExit};

/// One row of the derived stock view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLine {
    pub product_id: Uuid,
    pub name: String,
    pub unit: String,
    pub min_stock: i64,
    pub price: Decimal,
    pub total_entries: i64,
    pub total_exits: i64,
    pub balance: i64,
    pub low_stock: bool,
}

/// Status filter applied to the derived stock view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatusFilter {
    #[default]
    All,
    Ok,
    Low,
}

/// Column the stock view is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockSortKey {
    #[default]
    Name,
    Balance,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Compute the derived stock line for every product
///
/// Movements referencing unknown products are ignored. Output order follows
/// the input product order.
pub fn compute_stock_lines(
    products: &[Product],
    entries: &[StockEntry],
    exits: &[StockExit],
) -> Vec<StockLine> {
    let mut entry_totals: HashMap<Uuid, i64> = HashMap::new();
    for entry in entries {
        *entry_totals.entry(entry.product_id).or_insert(0) += entry.quantity;
    }

    let mut exit_totals: HashMap<Uuid, i64> = HashMap::new();
    for exit in exits {
        *exit_totals.entry(exit.product_id).or_insert(0) += exit.quantity;
    }

    products
        .iter()
        .map(|product| {
            let total_entries = entry_totals.get(&product.id).copied().unwrap_or(0);
            let total_exits = exit_totals.get(&product.id).copied().unwrap_or(0);
            let balance = total_entries - total_exits;
            StockLine {
                product_id: product.id,
                name: product.name.clone(),
                unit: product.unit.clone(),
                min_stock: product.min_stock,
                price: product.price,
                total_entries,
                total_exits,
                balance,
                // boundary counts as low: balance == min_stock is flagged
                low_stock: balance <= product.min_stock,
            }
        })
        .collect()
}

/// Filter stock lines by name substring and status
///
/// The name match is a case-insensitive substring test; an empty search
/// string matches everything.
pub fn filter_stock_lines(
    lines: Vec<StockLine>,
    search: &str,
    status: StockStatusFilter,
) -> Vec<StockLine> {
    let needle = search.to_lowercase();
    lines
        .into_iter()
        .filter(|line| needle.is_empty() || line.name.to_lowercase().contains(&needle))
        .filter(|line| match status {
            StockStatusFilter::All => true,
            StockStatusFilter::Ok => !line.low_stock,
            StockStatusFilter::Low => line.low_stock,
        })
        .collect()
}

/// Sort stock lines in place by the given key and direction
///
/// The sort is stable: lines that compare equal keep their relative order,
/// so ties fall back to the underlying product ordering.
pub fn sort_stock_lines(lines: &mut [StockLine], key: StockSortKey, direction: SortDirection) {
    lines.sort_by(|a, b| {
        let ordering = match key {
            StockSortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            StockSortKey::Balance => a.balance.cmp(&b.balance),
            // ok sorts before low ascending
            StockSortKey::Status => (a.low_stock as u8).cmp(&(b.low_stock as u8)),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn product(name: &str, min_stock: i64) -> Product {
        Product {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: name.to_string(),
            unit: "un".to_string(),
            min_stock,
            price: Decimal::from(1),
            consumption_unit: None,
            consumption_rate: None,
            created_at: Utc::now(),
        }
    }

    fn entry(product_id: Uuid, quantity: i64) -> StockEntry {
        StockEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            product_id,
            supplier: "Fornecedor".to_string(),
            quantity,
            created_at: Utc::now(),
        }
    }

    fn exit(product_id: Uuid, quantity: i64) -> StockExit {
        StockExit {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2024, 5, 12).unwrap(),
            product_id,
            quantity,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn balance_is_entries_minus_exits() {
        let p = product("Luva", 5);
        let lines = compute_stock_lines(
            &[p.clone()],
            &[entry(p.id, 10), entry(p.id, 4)],
            &[exit(p.id, 3)],
        );
        assert_eq!(lines[0].total_entries, 14);
        assert_eq!(lines[0].total_exits, 3);
        assert_eq!(lines[0].balance, 11);
        assert!(!lines[0].low_stock);
    }

    #[test]
    fn balance_can_go_negative() {
        let p = product("Seringa", 0);
        let lines = compute_stock_lines(&[p.clone()], &[], &[exit(p.id, 7)]);
        assert_eq!(lines[0].balance, -7);
        assert!(lines[0].low_stock);
    }

    #[test]
    fn balance_equal_to_min_stock_is_low() {
        let p = product("Algodão", 10);
        let lines = compute_stock_lines(&[p.clone()], &[entry(p.id, 10)], &[]);
        assert_eq!(lines[0].balance, 10);
        assert!(lines[0].low_stock);
    }

    #[test]
    fn movements_for_unknown_products_are_ignored() {
        let p = product("Gaze", 0);
        let lines = compute_stock_lines(&[p.clone()], &[entry(Uuid::new_v4(), 99)], &[]);
        assert_eq!(lines[0].balance, 0);
    }

    #[test]
    fn filter_matches_name_case_insensitively() {
        let a = product("Luva Nitrílica", 0);
        let b = product("Seringa", 0);
        let lines = compute_stock_lines(&[a, b], &[], &[]);
        let filtered = filter_stock_lines(lines, "LUVA", StockStatusFilter::All);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Luva Nitrílica");
    }

    #[test]
    fn filter_by_status() {
        let low = product("Baixo", 100);
        let ok = product("Ok", 0);
        let lines = compute_stock_lines(&[low, ok.clone()], &[entry(ok.id, 5)], &[]);

        let only_low = filter_stock_lines(lines.clone(), "", StockStatusFilter::Low);
        assert_eq!(only_low.len(), 1);
        assert_eq!(only_low[0].name, "Baixo");

        let only_ok = filter_stock_lines(lines, "", StockStatusFilter::Ok);
        assert_eq!(only_ok.len(), 1);
        assert_eq!(only_ok[0].name, "Ok");
    }

    #[test]
    fn sort_by_name_ignores_case() {
        let products = vec![product("banana", 0), product("Abacaxi", 0)];
        let mut lines = compute_stock_lines(&products, &[], &[]);
        sort_stock_lines(&mut lines, StockSortKey::Name, SortDirection::Asc);
        assert_eq!(lines[0].name, "Abacaxi");
        assert_eq!(lines[1].name, "banana");
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let a = product("Primeiro", 0);
        let b = product("Segundo", 0);
        let mut lines = compute_stock_lines(&[a, b], &[], &[]);
        sort_stock_lines(&mut lines, StockSortKey::Balance, SortDirection::Asc);
        assert_eq!(lines[0].name, "Primeiro");
        assert_eq!(lines[1].name, "Segundo");
    }

    #[test]
    fn sort_by_status_puts_ok_first_ascending() {
        let low = product("Baixo", 10);
        let ok = product("Cheio", 0);
        let mut lines = compute_stock_lines(&[low, ok.clone()], &[entry(ok.id, 20)], &[]);
        sort_stock_lines(&mut lines, StockSortKey::Status, SortDirection::Asc);
        assert_eq!(lines[0].name, "Cheio");
        assert_eq!(lines[1].name, "Baixo");
    }
}
