//! Per-map insurance policy.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Map id of "The Lab".
pub const LABORATORY_ID: &str = "laboratory";

/// Location base record, reduced to what insurance needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationBase {
    #[serde(rename = "Id", default)]
    pub id: String,

    /// Whether insured items can come back from this map.
    #[serde(rename = "Insurance", default)]
    pub insurance: bool,

    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// A location entry in the database tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub base: LocationBase,

    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// Insurance policy for one map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapInsurancePolicy {
    pub map_id: String,
    pub insurance_returns_enabled: bool,
}

impl MapInsurancePolicy {
    pub fn new(map_id: impl Into<String>, insurance_returns_enabled: bool) -> Self {
        Self {
            map_id: map_id.into().to_ascii_lowercase(),
            insurance_returns_enabled,
        }
    }
}

/// Insurance policies for every known map, keyed by lower-cased map id.
///
/// A map without a policy allows returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapPolicies {
    policies: HashMap<String, MapInsurancePolicy>,
}

impl MapPolicies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, policy: MapInsurancePolicy) {
        self.policies.insert(policy.map_id.clone(), policy);
    }

    pub fn with(mut self, map_id: impl Into<String>, insurance_returns_enabled: bool) -> Self {
        self.insert(MapInsurancePolicy::new(map_id, insurance_returns_enabled));
        self
    }

    pub fn get(&self, map_id: &str) -> Option<&MapInsurancePolicy> {
        self.policies.get(&map_id.to_ascii_lowercase())
    }

    pub fn returns_enabled(&self, map_id: &str) -> bool {
        self.get(map_id)
            .map(|policy| policy.insurance_returns_enabled)
            .unwrap_or(true)
    }

    /// Build policies from the location tables.
    pub fn from_locations<'a, I>(locations: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a Location)>,
    {
        let mut policies = Self::new();
        for (map_id, location) in locations {
            policies.insert(MapInsurancePolicy::new(map_id.as_str(), location.base.insurance));
        }
        policies
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
