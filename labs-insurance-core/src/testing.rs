//! Testing utilities for insurance resolution.
//!
//! This module provides:
//! - `sample_tables` with a handful of traders and maps
//! - `claim_on` for quick claim construction
//! - Assertion helpers for verifying resolved claims

use crate::claim::{InsuranceClaim, Item};
use crate::database::DatabaseTables;
use crate::dialogue::TraderDialogue;
use crate::location::{Location, LocationBase, LABORATORY_ID};
use crate::traders::{Trader, FENCE_ID, PRAPOR_ID, THERAPIST_ID};

/// A trader with an empty dialogue record.
pub const SILENT_TRADER_ID: &str = "5ac3b934156ae10c4430e83c";

fn templates(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("{prefix}-{n}")).collect()
}

fn location(id: &str, insurance: bool) -> Location {
    Location {
        base: LocationBase {
            id: id.to_string(),
            insurance,
            ..LocationBase::default()
        },
        ..Location::default()
    }
}

/// Database tables with Prapor, Therapist, Fence and a silent trader, plus
/// labs (insurance off), customs and woods.
///
/// - Prapor has general failure messages only.
/// - Therapist has both general and labs failure messages.
/// - Fence has both, and four loyalty levels with no insurance terms.
/// - The silent trader has no failure messages at all.
pub fn sample_tables() -> DatabaseTables {
    let mut tables = DatabaseTables::default();

    for trader in [
        Trader::new(
            PRAPOR_ID,
            "Prapor",
            TraderDialogue::new(templates("prapor-failed", 3), vec![]),
        )
        .with_loyalty_levels(4),
        Trader::new(
            THERAPIST_ID,
            "Therapist",
            TraderDialogue::new(templates("therapist-failed", 2), templates("therapist-labs", 2)),
        )
        .with_loyalty_levels(4),
        Trader::new(
            FENCE_ID,
            "Fence",
            TraderDialogue::new(templates("fence-failed", 1), templates("fence-labs", 1)),
        )
        .with_loyalty_levels(4),
        Trader::new(SILENT_TRADER_ID, "Skier", TraderDialogue::default()),
    ] {
        tables.traders.insert(trader.base.id.clone(), trader);
    }

    for (id, insurance) in [(LABORATORY_ID, false), ("bigmap", true), ("woods", true)] {
        tables.locations.insert(id.to_string(), location(id, insurance));
    }

    tables
}

/// A claim for `trader_id` on `map_id` with `item_count` loose items.
pub fn claim_on(trader_id: &str, map_id: &str, item_count: usize) -> InsuranceClaim {
    let items = (0..item_count)
        .map(|n| Item::new(format!("item-{n}"), "5447a9cd4bdc2dbd208b4567"))
        .collect();
    InsuranceClaim::new(trader_id, map_id, items)
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the claim was wiped and its template came from `pool`.
#[track_caller]
pub fn assert_failed_with(claim: &InsuranceClaim, pool: &[String]) {
    assert!(
        claim.items.is_empty(),
        "Expected no items, got {}",
        claim.items.len()
    );
    let template = claim
        .message_template_id
        .as_ref()
        .unwrap_or_else(|| panic!("Expected a message template on the claim"));
    assert!(
        pool.contains(template),
        "Expected template from {pool:?}, got '{template}'"
    );
}

/// Assert the claim matches `before` exactly.
#[track_caller]
pub fn assert_untouched(claim: &InsuranceClaim, before: &InsuranceClaim) {
    assert_eq!(claim, before, "Expected claim to be left unchanged");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_tables_shape() {
        let tables = sample_tables();
        assert_eq!(tables.traders.len(), 4);
        assert_eq!(tables.locations.len(), 3);
        assert!(!tables.map_policies().returns_enabled(LABORATORY_ID));
        assert!(tables.trader(SILENT_TRADER_ID).unwrap().dialogue.insurance_failed.is_empty());
    }

    #[test]
    fn test_claim_on() {
        let claim = claim_on(PRAPOR_ID, "woods", 3);
        assert_eq!(claim.items.len(), 3);
        assert!(claim.is_on_map("woods"));
    }
}
