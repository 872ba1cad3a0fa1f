//! Insurance claims as handed over by the host's insurance processor.
//!
//! A claim is built once per insured raid death, passed through the
//! resolver, and then given to the mail collaborator. The JSON shape
//! follows the host profile format (camelCase keys, `_id`/`_tpl` on items).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single item carried on an insurance claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_tpl")]
    pub template: String,

    #[serde(rename = "parentId", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(rename = "slotId", default, skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,

    /// Stack counts, durability and similar host data, carried opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upd: Option<serde_json::Value>,

    /// Grid position, description and anything else the host attaches.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl Item {
    pub fn new(id: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            template: template.into(),
            parent_id: None,
            slot_id: None,
            upd: None,
            other: BTreeMap::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>, slot_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self.slot_id = Some(slot_id.into());
        self
    }
}

/// Host mail message categories.
///
/// Serialized as the host's numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MessageType {
    UserMessage,
    NpcTrader,
    AuctionMessage,
    FleamarketMessage,
    AdminMessage,
    GroupChatMessage,
    SystemMessage,
    #[default]
    InsuranceReturn,
    GlobalChat,
    QuestStart,
    QuestFail,
    QuestSuccess,
    MessageWithItems,
    InitialSupport,
    BtrItemsDelivery,
}

impl MessageType {
    pub fn code(self) -> u8 {
        match self {
            MessageType::UserMessage => 1,
            MessageType::NpcTrader => 2,
            MessageType::AuctionMessage => 3,
            MessageType::FleamarketMessage => 4,
            MessageType::AdminMessage => 5,
            MessageType::GroupChatMessage => 6,
            MessageType::SystemMessage => 7,
            MessageType::InsuranceReturn => 8,
            MessageType::GlobalChat => 9,
            MessageType::QuestStart => 10,
            MessageType::QuestFail => 11,
            MessageType::QuestSuccess => 12,
            MessageType::MessageWithItems => 13,
            MessageType::InitialSupport => 14,
            MessageType::BtrItemsDelivery => 15,
        }
    }

    pub fn from_code(code: u8) -> Option<MessageType> {
        match code {
            1 => Some(MessageType::UserMessage),
            2 => Some(MessageType::NpcTrader),
            3 => Some(MessageType::AuctionMessage),
            4 => Some(MessageType::FleamarketMessage),
            5 => Some(MessageType::AdminMessage),
            6 => Some(MessageType::GroupChatMessage),
            7 => Some(MessageType::SystemMessage),
            8 => Some(MessageType::InsuranceReturn),
            9 => Some(MessageType::GlobalChat),
            10 => Some(MessageType::QuestStart),
            11 => Some(MessageType::QuestFail),
            12 => Some(MessageType::QuestSuccess),
            13 => Some(MessageType::MessageWithItems),
            14 => Some(MessageType::InitialSupport),
            15 => Some(MessageType::BtrItemsDelivery),
            _ => None,
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        MessageType::from_code(code).ok_or_else(|| format!("unknown message type {code}"))
    }
}

impl From<MessageType> for u8 {
    fn from(message_type: MessageType) -> u8 {
        message_type.code()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

/// Raid context attached to the claim and forwarded with the mail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Map the player died on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// An insurance claim awaiting resolution and delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceClaim {
    pub trader_id: String,

    #[serde(default)]
    pub scheduled_time: u64,

    #[serde(default)]
    pub max_storage_time: u32,

    #[serde(default)]
    pub system_data: SystemData,

    #[serde(default)]
    pub message_type: MessageType,

    /// Set by the resolver when the claim fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_template_id: Option<String>,

    #[serde(default)]
    pub items: Vec<Item>,
}

impl InsuranceClaim {
    /// Create a claim for `trader_id` on `map_id` carrying `items`.
    pub fn new(trader_id: impl Into<String>, map_id: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            trader_id: trader_id.into(),
            scheduled_time: 0,
            max_storage_time: 0,
            system_data: SystemData {
                location: Some(map_id.into()),
                ..SystemData::default()
            },
            message_type: MessageType::InsuranceReturn,
            message_template_id: None,
            items,
        }
    }

    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.message_template_id = Some(template_id.into());
        self
    }

    pub fn with_max_storage_time(mut self, hours: u32) -> Self {
        self.max_storage_time = hours;
        self
    }

    /// The map the claim originated on, if the host recorded one.
    pub fn map_id(&self) -> Option<&str> {
        self.system_data.location.as_deref()
    }

    /// True if the claim is from `map_id`, ignoring ASCII case.
    pub fn is_on_map(&self, map_id: &str) -> bool {
        self.map_id()
            .map(|location| location.eq_ignore_ascii_case(map_id))
            .unwrap_or(false)
    }
}
