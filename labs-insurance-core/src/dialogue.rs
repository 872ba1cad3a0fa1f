//! Trader dialogue templates used for insurance mail.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Dialogue template lists for one trader.
///
/// Only the insurance failure lists are read here. Every other list in the
/// host's dialogue record is kept in `other` so patched tables round-trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraderDialogue {
    #[serde(default)]
    pub insurance_failed: Vec<String>,

    #[serde(default)]
    pub insurance_failed_labs: Vec<String>,

    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl TraderDialogue {
    pub fn new(insurance_failed: Vec<String>, insurance_failed_labs: Vec<String>) -> Self {
        Self {
            insurance_failed,
            insurance_failed_labs,
            other: BTreeMap::new(),
        }
    }
}

/// Dialogue records keyed by trader id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogueTable {
    entries: HashMap<String, TraderDialogue>,
}

impl DialogueTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, trader_id: impl Into<String>, dialogue: TraderDialogue) {
        self.entries.insert(trader_id.into(), dialogue);
    }

    pub fn with(mut self, trader_id: impl Into<String>, dialogue: TraderDialogue) -> Self {
        self.insert(trader_id, dialogue);
        self
    }

    pub fn get(&self, trader_id: &str) -> Option<&TraderDialogue> {
        self.entries.get(trader_id)
    }

    pub fn contains(&self, trader_id: &str) -> bool {
        self.entries.contains_key(trader_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, TraderDialogue)> for DialogueTable {
    fn from_iter<I: IntoIterator<Item = (String, TraderDialogue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialogue_keeps_unread_lists() {
        let json = r#"{
            "insuranceStart": ["s1"],
            "insuranceFound": ["f1", "f2"],
            "insuranceFailed": ["x1"],
            "insuranceFailedLabs": ["l1"]
        }"#;
        let dialogue: TraderDialogue = serde_json::from_str(json).unwrap();
        assert_eq!(dialogue.insurance_failed, vec!["x1"]);
        assert_eq!(dialogue.insurance_failed_labs, vec!["l1"]);
        assert!(dialogue.other.contains_key("insuranceFound"));

        let back = serde_json::to_value(&dialogue).unwrap();
        assert_eq!(back["insuranceStart"][0], "s1");
    }

    #[test]
    fn test_missing_lists_default_empty() {
        let dialogue: TraderDialogue = serde_json::from_str("{}").unwrap();
        assert!(dialogue.insurance_failed.is_empty());
        assert!(dialogue.insurance_failed_labs.is_empty());
    }
}
