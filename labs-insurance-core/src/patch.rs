//! One-time patching of the database tables from the mod config.

use crate::config::ModConfig;
use crate::database::DatabaseTables;
use crate::location::LABORATORY_ID;
use crate::traders::FENCE_ID;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from patching the tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("Trader {0} not found in database tables")]
    MissingTrader(String),

    #[error("Location {0} not found in database tables")]
    MissingLocation(String),
}

/// A single value changed by [`apply_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchChange {
    /// Dotted path of the patched field.
    pub field: String,
    pub old: Value,
    pub new: Value,
}

impl fmt::Display for PatchChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.field, self.old, self.new)
    }
}

/// Every change applied to the tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchReport {
    pub changes: Vec<PatchChange>,
}

impl PatchReport {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    fn record<T: PartialEq + Into<Value>>(&mut self, field: String, old: T, new: T, verbose: bool) {
        if old == new {
            return;
        }
        let change = PatchChange {
            field,
            old: old.into(),
            new: new.into(),
        };
        if verbose {
            info!("patched {change}");
        } else {
            debug!("patched {change}");
        }
        self.changes.push(change);
    }
}

/// Apply `config` to the tables.
///
/// Fence gets insurance terms, loyalty price coefficients and a return
/// chance when enabled; the labs location gets its insurance flag when labs
/// returns are enabled. Nothing is touched if a required record is missing.
pub fn apply_config(tables: &mut DatabaseTables, config: &ModConfig) -> Result<PatchReport, PatchError> {
    let mut report = PatchReport::default();
    let verbose = config.debug;

    if config.labs_returns_enabled && !tables.locations.contains_key(LABORATORY_ID) {
        return Err(PatchError::MissingLocation(LABORATORY_ID.to_string()));
    }

    if config.enable_fence_insurance {
        let fence = tables
            .traders
            .get_mut(FENCE_ID)
            .ok_or_else(|| PatchError::MissingTrader(FENCE_ID.to_string()))?;
        let insurance = &mut fence.base.insurance;

        report.record(
            "fence.base.insurance.availability".to_string(),
            insurance.availability,
            true,
            verbose,
        );
        insurance.availability = true;

        report.record(
            "fence.base.insurance.min_return_hour".to_string(),
            insurance.min_return_hour,
            config.min_return_hours,
            verbose,
        );
        insurance.min_return_hour = config.min_return_hours;

        report.record(
            "fence.base.insurance.max_return_hour".to_string(),
            insurance.max_return_hour,
            config.max_return_hours,
            verbose,
        );
        insurance.max_return_hour = config.max_return_hours;

        report.record(
            "fence.base.insurance.max_storage_time".to_string(),
            insurance.max_storage_time,
            config.max_storage_time_hours,
            verbose,
        );
        insurance.max_storage_time = config.max_storage_time_hours;

        for (index, level) in fence.base.loyalty_levels.iter_mut().enumerate() {
            report.record(
                format!("fence.base.loyaltyLevels[{index}].insurance_price_coef"),
                level.insurance_price_coef,
                config.price_coefficient,
                verbose,
            );
            level.insurance_price_coef = config.price_coefficient;
        }

        let chance = tables
            .insurance
            .return_chance_percent
            .insert(FENCE_ID.to_string(), config.return_chance_percent);
        report.record(
            "insurance.returnChancePercent.fence".to_string(),
            chance.map_or(Value::Null, Value::from),
            Value::from(config.return_chance_percent),
            verbose,
        );
    }

    if config.labs_returns_enabled {
        if let Some(labs) = tables.locations.get_mut(LABORATORY_ID) {
            report.record(
                "locations.laboratory.base.Insurance".to_string(),
                labs.base.insurance,
                true,
                verbose,
            );
            labs.base.insurance = true;
        }
    }

    info!(changes = report.len(), "database tables patched");
    Ok(report)
}
