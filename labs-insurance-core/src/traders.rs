//! Trader records and well-known trader ids.

use crate::dialogue::TraderDialogue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prapor. Default source of fallback failure messages.
pub const PRAPOR_ID: &str = "54cb50c76803fa8b248b4571";

/// Therapist.
pub const THERAPIST_ID: &str = "54cb57776803fa99248b456e";

/// Fence, the alternate insurer.
pub const FENCE_ID: &str = "579dc571d53a0658a154fbec";

/// Insurance terms a trader offers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraderInsurance {
    #[serde(default)]
    pub availability: bool,

    #[serde(default)]
    pub min_payment: u32,

    #[serde(default)]
    pub min_return_hour: u32,

    #[serde(default)]
    pub max_return_hour: u32,

    #[serde(default)]
    pub max_storage_time: u32,

    #[serde(default)]
    pub excluded_category: Vec<String>,
}

/// One loyalty level of a trader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyLevel {
    #[serde(rename = "minLevel", default)]
    pub min_level: u32,

    #[serde(default)]
    pub insurance_price_coef: f64,

    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// Trader base record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraderBase {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub nickname: String,

    #[serde(default)]
    pub insurance: TraderInsurance,

    #[serde(rename = "loyaltyLevels", default)]
    pub loyalty_levels: Vec<LoyaltyLevel>,

    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// A trader entry in the database tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trader {
    pub base: TraderBase,

    #[serde(default)]
    pub dialogue: TraderDialogue,

    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl Trader {
    pub fn new(id: impl Into<String>, nickname: impl Into<String>, dialogue: TraderDialogue) -> Self {
        Self {
            base: TraderBase {
                id: id.into(),
                nickname: nickname.into(),
                ..TraderBase::default()
            },
            dialogue,
            other: BTreeMap::new(),
        }
    }

    pub fn with_loyalty_levels(mut self, count: usize) -> Self {
        self.base.loyalty_levels = (0..count)
            .map(|level| LoyaltyLevel {
                min_level: 1 + level as u32 * 15,
                insurance_price_coef: 0.0,
                other: BTreeMap::new(),
            })
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trader_parses_host_shape() {
        let json = r#"{
            "base": {
                "_id": "579dc571d53a0658a154fbec",
                "nickname": "Fence",
                "currency": "RUB",
                "insurance": {
                    "availability": false,
                    "excluded_category": [],
                    "max_return_hour": 0,
                    "max_storage_time": 0,
                    "min_payment": 0,
                    "min_return_hour": 0
                },
                "loyaltyLevels": [
                    { "minLevel": 1, "insurance_price_coef": 0, "buy_price_coef": 60 }
                ]
            },
            "dialogue": { "insuranceFailed": ["a"] },
            "assort": {}
        }"#;
        let trader: Trader = serde_json::from_str(json).unwrap();
        assert_eq!(trader.base.id, FENCE_ID);
        assert!(!trader.base.insurance.availability);
        assert_eq!(trader.base.loyalty_levels.len(), 1);
        assert!(trader.base.loyalty_levels[0].other.contains_key("buy_price_coef"));
        assert!(trader.base.other.contains_key("currency"));
        assert!(trader.other.contains_key("assort"));
    }
}
