//! Immutable view of the patched tables used during claim resolution.

use crate::config::ModConfig;
use crate::database::DatabaseTables;
use crate::dialogue::DialogueTable;
use crate::error::InsuranceError;
use crate::location::MapPolicies;
use crate::patch::{apply_config, PatchReport};
use crate::resolver::Resolver;
use crate::traders::FENCE_ID;
use std::collections::HashMap;
use std::path::Path;

/// Everything the resolver reads, captured once after patching.
#[derive(Debug, Clone, PartialEq)]
pub struct InsuranceSnapshot {
    dialogues: DialogueTable,
    policies: MapPolicies,
    fallback_trader: String,
    alternate_insurer: Option<String>,
    nicknames: HashMap<String, String>,
}

impl InsuranceSnapshot {
    /// Capture the tables as they stand.
    pub fn from_tables(tables: &DatabaseTables, config: &ModConfig) -> Self {
        let nicknames = tables
            .traders
            .iter()
            .map(|(id, trader)| (id.clone(), trader.base.nickname.clone()))
            .collect();

        Self {
            dialogues: tables.dialogues(),
            policies: tables.map_policies(),
            fallback_trader: config.fallback_trader_id.clone(),
            alternate_insurer: config
                .enable_fence_insurance
                .then(|| FENCE_ID.to_string()),
            nicknames,
        }
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.dialogues, &self.policies, &self.fallback_trader)
            .with_alternate_insurer(self.alternate_insurer.as_deref())
    }

    pub fn dialogues(&self) -> &DialogueTable {
        &self.dialogues
    }

    pub fn policies(&self) -> &MapPolicies {
        &self.policies
    }

    pub fn fallback_trader(&self) -> &str {
        &self.fallback_trader
    }

    pub fn alternate_insurer(&self) -> Option<&str> {
        self.alternate_insurer.as_deref()
    }

    /// Display name of a trader, if known.
    pub fn nickname(&self, trader_id: &str) -> Option<&str> {
        self.nicknames.get(trader_id).map(String::as_str)
    }
}

/// Validate the config, patch the tables and capture the snapshot.
pub fn initialize(
    mut tables: DatabaseTables,
    config: &ModConfig,
) -> Result<(DatabaseTables, InsuranceSnapshot, PatchReport), InsuranceError> {
    config.validate()?;
    let report = apply_config(&mut tables, config)?;
    let snapshot = InsuranceSnapshot::from_tables(&tables, config);
    Ok((tables, snapshot, report))
}

/// Load the config and tables from disk, then [`initialize`].
pub async fn load_and_initialize(
    config_path: impl AsRef<Path>,
    tables_path: impl AsRef<Path>,
) -> Result<(ModConfig, DatabaseTables, InsuranceSnapshot, PatchReport), InsuranceError> {
    let config = ModConfig::load_json(config_path).await?;
    let tables = DatabaseTables::load_json(tables_path).await?;
    let (tables, snapshot, report) = initialize(tables, &config)?;
    Ok((config, tables, snapshot, report))
}
