//! Insurance outcome resolution.
//!
//! Decides, for a single claim, whether insured items go back to the player
//! and which failure message to attach when they do not:
//! 1. Labs claims with insurance disabled on the map are wiped, unless the
//!    claim belongs to the alternate insurer.
//! 2. Claims with nothing left to return get a failure message.
//! 3. Everything else is left as it came in.
//!
//! Failure messages are drawn uniformly from the trader's labs list, then its
//! general list, then the fallback trader's general list. An empty list is
//! never drawn from.

use crate::claim::InsuranceClaim;
use crate::dialogue::DialogueTable;
use crate::location::{MapPolicies, LABORATORY_ID};
use crate::traders::FENCE_ID;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Error type for claim resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("No dialogue configured for trader {0}")]
    UnknownTrader(String),
}

/// Which template list a failure message was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateSource {
    /// The claim trader's `insuranceFailedLabs` list.
    TraderLabs,
    /// The claim trader's `insuranceFailed` list.
    TraderGeneral,
    /// The fallback trader's `insuranceFailed` list.
    Fallback,
}

/// Outcome of resolving one claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Claim untouched; items go back to the player.
    Returned,

    /// Labs claim left untouched because the trader is the alternate insurer.
    Exempt,

    /// Labs claim failed; items were cleared.
    LabsWiped {
        template_id: String,
        source: TemplateSource,
    },

    /// Nothing was eligible for return; a failure message was attached.
    NothingReturned {
        template_id: String,
        source: TemplateSource,
    },

    /// A failure message was needed but every candidate list was empty.
    /// The claim was left unchanged.
    NoTemplate { labs: bool },
}

impl Resolution {
    /// True when the outcome points at broken dialogue data.
    pub fn is_anomaly(&self) -> bool {
        matches!(
            self,
            Resolution::LabsWiped {
                source: TemplateSource::Fallback,
                ..
            } | Resolution::NothingReturned {
                source: TemplateSource::Fallback,
                ..
            } | Resolution::NoTemplate { .. }
        )
    }

    /// Template attached by this resolution, if any.
    pub fn template_id(&self) -> Option<&str> {
        match self {
            Resolution::LabsWiped { template_id, .. }
            | Resolution::NothingReturned { template_id, .. } => Some(template_id),
            _ => None,
        }
    }
}

/// Resolves claims against a fixed set of dialogue and map tables.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    dialogues: &'a DialogueTable,
    policies: &'a MapPolicies,
    fallback_trader: &'a str,
    alternate_insurer: Option<&'a str>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver that treats Fence as the alternate insurer.
    pub fn new(
        dialogues: &'a DialogueTable,
        policies: &'a MapPolicies,
        fallback_trader: &'a str,
    ) -> Self {
        Self {
            dialogues,
            policies,
            fallback_trader,
            alternate_insurer: Some(FENCE_ID),
        }
    }

    /// Override the alternate insurer; `None` disables the labs exemption.
    pub fn with_alternate_insurer(mut self, trader_id: Option<&'a str>) -> Self {
        self.alternate_insurer = trader_id;
        self
    }

    pub fn alternate_insurer(&self) -> Option<&'a str> {
        self.alternate_insurer
    }

    /// True if the claim is from labs and labs insurance returns are off.
    pub fn labs_insurance_disabled(&self, claim: &InsuranceClaim) -> bool {
        claim.is_on_map(LABORATORY_ID) && !self.policies.returns_enabled(LABORATORY_ID)
    }

    /// Resolve a claim using the thread-local RNG.
    pub fn resolve(&self, claim: &mut InsuranceClaim) -> Result<Resolution, ResolveError> {
        self.resolve_with_rng(claim, &mut rand::thread_rng())
    }

    /// Resolve a claim with a specific RNG (useful for testing).
    pub fn resolve_with_rng<R: Rng + ?Sized>(
        &self,
        claim: &mut InsuranceClaim,
        rng: &mut R,
    ) -> Result<Resolution, ResolveError> {
        let dialogue = self
            .dialogues
            .get(&claim.trader_id)
            .ok_or_else(|| ResolveError::UnknownTrader(claim.trader_id.clone()))?;

        if self.labs_insurance_disabled(claim) {
            if self.alternate_insurer == Some(claim.trader_id.as_str()) {
                debug!(trader = %claim.trader_id, "alternate insurer exempt from labs wipe");
                return Ok(Resolution::Exempt);
            }

            let labs = [
                (&dialogue.insurance_failed_labs, TemplateSource::TraderLabs),
                (&dialogue.insurance_failed, TemplateSource::TraderGeneral),
            ];
            return Ok(match self.pick(&labs, rng) {
                Some((template_id, source)) => {
                    debug!(trader = %claim.trader_id, template = %template_id, ?source, "labs claim wiped");
                    claim.message_template_id = Some(template_id.clone());
                    claim.items.clear();
                    Resolution::LabsWiped {
                        template_id,
                        source,
                    }
                }
                None => Resolution::NoTemplate { labs: true },
            });
        }

        if claim.items.is_empty() {
            let general = [(&dialogue.insurance_failed, TemplateSource::TraderGeneral)];
            return Ok(match self.pick(&general, rng) {
                Some((template_id, source)) => {
                    debug!(trader = %claim.trader_id, template = %template_id, ?source, "nothing to return");
                    claim.message_template_id = Some(template_id.clone());
                    Resolution::NothingReturned {
                        template_id,
                        source,
                    }
                }
                None => Resolution::NoTemplate { labs: false },
            });
        }

        Ok(Resolution::Returned)
    }

    /// Draw from the first non-empty candidate list, falling back to the
    /// fallback trader's general list.
    fn pick<R: Rng + ?Sized>(
        &self,
        candidates: &[(&Vec<String>, TemplateSource)],
        rng: &mut R,
    ) -> Option<(String, TemplateSource)> {
        let fallback = self
            .dialogues
            .get(self.fallback_trader)
            .map(|dialogue| (&dialogue.insurance_failed, TemplateSource::Fallback));

        candidates
            .iter()
            .copied()
            .chain(fallback)
            .find(|(list, _)| !list.is_empty())
            .and_then(|(list, source)| list.choose(rng).map(|id| (id.clone(), source)))
    }
}

/// Resolve a claim against explicit tables, with Fence as the alternate insurer.
pub fn resolve(
    claim: &mut InsuranceClaim,
    dialogues: &DialogueTable,
    policies: &MapPolicies,
    fallback_trader: &str,
) -> Result<Resolution, ResolveError> {
    Resolver::new(dialogues, policies, fallback_trader).resolve(claim)
}
