//! Insurance rules for labs raids and the Fence insurer.
//!
//! This crate provides:
//! - The insurance outcome resolver (labs wipe, Fence exemption, failure
//!   message selection)
//! - Mod config loading and one-time patching of the host's database tables
//! - Insurance mail dispatch through a pluggable mail sender
//!
//! # Quick Start
//!
//! ```ignore
//! use labs_insurance_core::{load_and_initialize, InsuranceMailer, MailOutbox};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (_config, _tables, snapshot, _report) =
//!         load_and_initialize("config.json", "tables.json").await?;
//!
//!     let mailer = InsuranceMailer::new(&snapshot);
//!     let mut outbox = MailOutbox::new();
//!     for mut claim in pending_claims() {
//!         mailer.send_mail("session-id", &mut claim, &mut outbox)?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod claim;
pub mod config;
pub mod database;
pub mod dialogue;
pub mod error;
pub mod location;
pub mod mail;
pub mod patch;
pub mod resolver;
pub mod snapshot;
pub mod testing;
pub mod traders;

// Primary public API
pub use claim::{InsuranceClaim, Item, MessageType, SystemData};
pub use config::{ConfigError, ModConfig};
pub use database::{DatabaseTables, InsuranceConfig, TablesError};
pub use dialogue::{DialogueTable, TraderDialogue};
pub use error::InsuranceError;
pub use location::{MapInsurancePolicy, MapPolicies, LABORATORY_ID};
pub use mail::{InsuranceMail, InsuranceMailer, MailOutbox, MailSender};
pub use patch::{apply_config, PatchChange, PatchError, PatchReport};
pub use resolver::{resolve, Resolution, ResolveError, Resolver, TemplateSource};
pub use snapshot::{initialize, load_and_initialize, InsuranceSnapshot};
pub use traders::{FENCE_ID, PRAPOR_ID, THERAPIST_ID};
