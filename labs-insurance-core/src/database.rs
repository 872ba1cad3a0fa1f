//! In-memory database tables the host loads at startup.
//!
//! Only the parts insurance touches are typed; everything else is carried
//! through `#[serde(flatten)]` maps so a patched table can be written back
//! out without losing data.

use crate::dialogue::DialogueTable;
use crate::location::{Location, MapPolicies};
use crate::traders::Trader;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from loading or saving database tables.
#[derive(Debug, Error)]
pub enum TablesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Trader keyed as {key} has base id {id}")]
    TraderIdMismatch { key: String, id: String },
}

/// Global insurance settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceConfig {
    /// Per-trader chance that an insured item comes back, in percent.
    #[serde(default)]
    pub return_chance_percent: BTreeMap<String, u8>,

    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// The tables the mod reads and patches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseTables {
    #[serde(default)]
    pub traders: HashMap<String, Trader>,

    #[serde(default)]
    pub locations: HashMap<String, Location>,

    #[serde(default)]
    pub insurance: InsuranceConfig,
}

impl DatabaseTables {
    /// Parse tables from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, TablesError> {
        let tables: Self = serde_json::from_str(json)?;
        tables.check_trader_ids()?;
        Ok(tables)
    }

    /// Load tables from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, TablesError> {
        let content = fs::read_to_string(path).await?;
        Self::from_json_str(&content)
    }

    /// Save tables to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), TablesError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    pub fn trader(&self, trader_id: &str) -> Option<&Trader> {
        self.traders.get(trader_id)
    }

    pub fn trader_mut(&mut self, trader_id: &str) -> Option<&mut Trader> {
        self.traders.get_mut(trader_id)
    }

    /// Dialogue records for every trader.
    pub fn dialogues(&self) -> DialogueTable {
        self.traders
            .iter()
            .map(|(id, trader)| (id.clone(), trader.dialogue.clone()))
            .collect()
    }

    /// Insurance policy for every location.
    pub fn map_policies(&self) -> MapPolicies {
        MapPolicies::from_locations(&self.locations)
    }

    // Traders are keyed by id; a mismatch means the table was hand-edited wrong.
    fn check_trader_ids(&self) -> Result<(), TablesError> {
        for (key, trader) in &self.traders {
            if !trader.base.id.is_empty() && trader.base.id != *key {
                return Err(TablesError::TraderIdMismatch {
                    key: key.clone(),
                    id: trader.base.id.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LABORATORY_ID;

    const TABLES: &str = r#"{
        "traders": {
            "54cb50c76803fa8b248b4571": {
                "base": { "_id": "54cb50c76803fa8b248b4571", "nickname": "Prapor" },
                "dialogue": { "insuranceFailed": ["p1"], "insuranceFailedLabs": ["pl1"] }
            }
        },
        "locations": {
            "laboratory": { "base": { "Id": "laboratory", "Insurance": false } }
        },
        "insurance": {
            "returnChancePercent": { "54cb50c76803fa8b248b4571": 80 },
            "runIntervalSeconds": 600
        }
    }"#;

    #[test]
    fn test_parse_tables() {
        let tables = DatabaseTables::from_json_str(TABLES).unwrap();
        assert_eq!(tables.traders.len(), 1);
        assert_eq!(
            tables.insurance.return_chance_percent.get("54cb50c76803fa8b248b4571"),
            Some(&80)
        );
        assert!(tables.insurance.other.contains_key("runIntervalSeconds"));

        let dialogues = tables.dialogues();
        assert_eq!(
            dialogues.get("54cb50c76803fa8b248b4571").unwrap().insurance_failed_labs,
            vec!["pl1"]
        );
        assert!(!tables.map_policies().returns_enabled(LABORATORY_ID));
    }

    #[test]
    fn test_mismatched_trader_key_rejected() {
        let json = r#"{ "traders": { "a": { "base": { "_id": "b" } } } }"#;
        let err = DatabaseTables::from_json_str(json).unwrap_err();
        assert!(matches!(err, TablesError::TraderIdMismatch { .. }));
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.json");

        let tables = DatabaseTables::from_json_str(TABLES).unwrap();
        tables.save_json(&path).await.unwrap();
        let loaded = DatabaseTables::load_json(&path).await.unwrap();
        assert_eq!(loaded, tables);
    }
}
