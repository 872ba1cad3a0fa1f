//! Insurance mail dispatch.
//!
//! This replaces the host's insurance `sendMail`: resolve the claim, then
//! hand the result to the mail collaborator. Delivery itself is
//! fire-and-forget.

use crate::claim::{InsuranceClaim, Item, MessageType, SystemData};
use crate::resolver::{Resolution, ResolveError};
use crate::snapshot::InsuranceSnapshot;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A localised NPC message carrying the outcome of an insurance claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceMail {
    pub session_id: String,
    pub trader_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trader_nickname: Option<String>,
    pub message_type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_template_id: Option<String>,
    pub items: Vec<Item>,
    pub max_storage_time: u32,
    pub system_data: SystemData,
}

/// The host's mail service.
pub trait MailSender {
    fn send(&mut self, mail: InsuranceMail);
}

/// Collects mails in memory.
#[derive(Debug, Clone, Default)]
pub struct MailOutbox {
    mails: Vec<InsuranceMail>,
}

impl MailOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mails(&self) -> &[InsuranceMail] {
        &self.mails
    }

    pub fn into_mails(self) -> Vec<InsuranceMail> {
        self.mails
    }

    pub fn len(&self) -> usize {
        self.mails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mails.is_empty()
    }
}

impl MailSender for MailOutbox {
    fn send(&mut self, mail: InsuranceMail) {
        self.mails.push(mail);
    }
}

/// Resolves claims against a snapshot and sends the resulting mail.
#[derive(Debug, Clone, Copy)]
pub struct InsuranceMailer<'a> {
    snapshot: &'a InsuranceSnapshot,
}

impl<'a> InsuranceMailer<'a> {
    pub fn new(snapshot: &'a InsuranceSnapshot) -> Self {
        Self { snapshot }
    }

    /// Resolve `claim` and send it to the player.
    ///
    /// Nothing is sent when the trader has no dialogue entry.
    pub fn send_mail<S: MailSender + ?Sized>(
        &self,
        session_id: &str,
        claim: &mut InsuranceClaim,
        sender: &mut S,
    ) -> Result<Resolution, ResolveError> {
        self.send_mail_with_rng(session_id, claim, sender, &mut rand::thread_rng())
    }

    pub fn send_mail_with_rng<S: MailSender + ?Sized, R: Rng + ?Sized>(
        &self,
        session_id: &str,
        claim: &mut InsuranceClaim,
        sender: &mut S,
        rng: &mut R,
    ) -> Result<Resolution, ResolveError> {
        info!(
            session = session_id,
            trader = %claim.trader_id,
            location = claim.map_id().unwrap_or("unknown"),
            items = claim.items.len(),
            "sending insurance mail"
        );

        let resolution = self.snapshot.resolver().resolve_with_rng(claim, rng)?;
        if resolution.is_anomaly() {
            warn!(
                trader = %claim.trader_id,
                fallback = self.snapshot.fallback_trader(),
                ?resolution,
                "trader dialogue has no usable insurance failure messages"
            );
        }

        sender.send(InsuranceMail {
            session_id: session_id.to_string(),
            trader_id: claim.trader_id.clone(),
            trader_nickname: self.snapshot.nickname(&claim.trader_id).map(str::to_string),
            message_type: claim.message_type,
            message_template_id: claim.message_template_id.clone(),
            items: claim.items.clone(),
            max_storage_time: claim.max_storage_time,
            system_data: claim.system_data.clone(),
        });

        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModConfig;
    use crate::location::LABORATORY_ID;
    use crate::snapshot::initialize;
    use crate::testing::sample_tables;
    use crate::traders::{FENCE_ID, PRAPOR_ID, THERAPIST_ID};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn snapshot() -> InsuranceSnapshot {
        let (_, snapshot, _) = initialize(sample_tables(), &ModConfig::default()).unwrap();
        snapshot
    }

    #[test]
    fn test_labs_mail_has_no_items() {
        let snapshot = snapshot();
        let mailer = InsuranceMailer::new(&snapshot);
        let mut outbox = MailOutbox::new();
        let mut claim = InsuranceClaim::new(
            THERAPIST_ID,
            LABORATORY_ID,
            vec![Item::new("a", "tpl-a"), Item::new("b", "tpl-b")],
        )
        .with_max_storage_time(72);

        mailer
            .send_mail_with_rng("session-1", &mut claim, &mut outbox, &mut StdRng::seed_from_u64(1))
            .unwrap();

        assert_eq!(outbox.len(), 1);
        let mail = &outbox.mails()[0];
        assert_eq!(mail.session_id, "session-1");
        assert_eq!(mail.trader_nickname.as_deref(), Some("Therapist"));
        assert!(mail.items.is_empty());
        assert_eq!(mail.max_storage_time, 72);
        assert_eq!(mail.message_type, MessageType::InsuranceReturn);
        assert!(mail
            .message_template_id
            .as_deref()
            .unwrap()
            .starts_with("therapist-labs"));
    }

    #[test]
    fn test_returned_mail_carries_items() {
        let snapshot = snapshot();
        let mailer = InsuranceMailer::new(&snapshot);
        let mut outbox = MailOutbox::new();
        let mut claim = InsuranceClaim::new(FENCE_ID, LABORATORY_ID, vec![Item::new("a", "tpl-a")])
            .with_template("fence-found");

        let resolution = mailer.send_mail("s", &mut claim, &mut outbox).unwrap();
        assert_eq!(resolution, Resolution::Exempt);

        let mail = &outbox.mails()[0];
        assert_eq!(mail.items.len(), 1);
        assert_eq!(mail.message_template_id.as_deref(), Some("fence-found"));
    }

    #[test]
    fn test_returned_items_keep_host_fields() {
        let snapshot = snapshot();
        let mailer = InsuranceMailer::new(&snapshot);
        let mut outbox = MailOutbox::new();
        let mut claim: InsuranceClaim = serde_json::from_str(
            r#"{
                "traderId": "54cb50c76803fa8b248b4571",
                "systemData": { "location": "bigmap" },
                "items": [ { "_id": "a", "_tpl": "t", "parentId": "bp", "slotId": "main",
                             "location": { "x": 1, "y": 2, "r": "Vertical" } } ]
            }"#,
        )
        .unwrap();

        let resolution = mailer.send_mail("s", &mut claim, &mut outbox).unwrap();
        assert_eq!(resolution, Resolution::Returned);

        let item = &outbox.mails()[0].items[0];
        assert_eq!(item.parent_id.as_deref(), Some("bp"));
        assert_eq!(
            item.other.get("location"),
            Some(&serde_json::json!({ "x": 1, "y": 2, "r": "Vertical" }))
        );
        let value = serde_json::to_value(&outbox.mails()[0]).unwrap();
        assert_eq!(value["items"][0]["location"]["y"], 2);
    }

    #[test]
    fn test_unknown_trader_sends_nothing() {
        let snapshot = snapshot();
        let mailer = InsuranceMailer::new(&snapshot);
        let mut outbox = MailOutbox::new();
        let mut claim = InsuranceClaim::new("ghost", "bigmap", vec![]);

        let err = mailer.send_mail("s", &mut claim, &mut outbox).unwrap_err();
        assert_eq!(err, ResolveError::UnknownTrader("ghost".to_string()));
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_anomaly_still_delivers() {
        let snapshot = snapshot();
        let mailer = InsuranceMailer::new(&snapshot);
        let mut outbox = MailOutbox::new();
        let mut claim = InsuranceClaim::new(crate::testing::SILENT_TRADER_ID, "bigmap", vec![]);

        let resolution = mailer.send_mail("s", &mut claim, &mut outbox).unwrap();
        assert!(resolution.is_anomaly());
        assert_eq!(outbox.len(), 1);
        let template = outbox.mails()[0].message_template_id.as_deref().unwrap();
        assert!(template.starts_with("prapor-failed"));
        assert_eq!(snapshot.fallback_trader(), PRAPOR_ID);
    }

    #[test]
    fn test_mail_serializes_camel_case() {
        let mail = InsuranceMail {
            session_id: "s".to_string(),
            trader_id: "t".to_string(),
            trader_nickname: None,
            message_type: MessageType::InsuranceReturn,
            message_template_id: Some("m".to_string()),
            items: vec![],
            max_storage_time: 1,
            system_data: SystemData::default(),
        };
        let value = serde_json::to_value(&mail).unwrap();
        assert_eq!(value["messageType"], 8);
        assert_eq!(value["messageTemplateId"], "m");
        assert!(value.get("traderNickname").is_none());
    }
}
