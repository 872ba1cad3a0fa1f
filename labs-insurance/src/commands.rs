//! Subcommand implementations.

use crate::logging::LogLevel;
use anyhow::Context;
use labs_insurance_core::{
    initialize, DatabaseTables, InsuranceClaim, InsuranceMail, InsuranceMailer, InsuranceSnapshot,
    MailOutbox, ModConfig, PatchReport, Resolution,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

/// Load the config, raise logging if it asks for debug, then patch the tables.
async fn startup(
    config_path: &Path,
    database: &Path,
    log: &LogLevel,
) -> anyhow::Result<(ModConfig, DatabaseTables, InsuranceSnapshot, PatchReport)> {
    let config = ModConfig::load_json(config_path)
        .await
        .with_context(|| format!("loading config {}", config_path.display()))?;
    log.apply_config(&config);

    let tables = DatabaseTables::load_json(database)
        .await
        .with_context(|| format!("loading database tables {}", database.display()))?;
    let (tables, snapshot, report) =
        initialize(tables, &config).context("initializing insurance tables")?;
    Ok((config, tables, snapshot, report))
}

pub async fn check_config(path: &Path, log: &LogLevel) -> anyhow::Result<()> {
    let config = ModConfig::load_json(path)
        .await
        .with_context(|| format!("loading config {}", path.display()))?;
    log.apply_config(&config);
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

pub async fn patch(
    config: &Path,
    database: &Path,
    output: Option<&Path>,
    log: &LogLevel,
) -> anyhow::Result<PatchReport> {
    let (_, tables, _, report) = startup(config, database, log).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(output) = output {
        tables
            .save_json(output)
            .await
            .with_context(|| format!("writing patched tables to {}", output.display()))?;
        info!(path = %output.display(), "patched tables written");
    }
    Ok(report)
}

/// Per-claim summary printed alongside the mail.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSummary {
    pub index: usize,
    pub trader_id: String,
    pub resolution: Resolution,
}

#[derive(Debug, Serialize)]
pub struct ResolveOutput {
    pub claims: Vec<ClaimSummary>,
    pub mails: Vec<InsuranceMail>,
}

pub async fn resolve(
    config: &Path,
    database: &Path,
    claims_path: &Path,
    session: &str,
    seed: Option<u64>,
    log: &LogLevel,
) -> anyhow::Result<ResolveOutput> {
    let (config, _, snapshot, _) = startup(config, database, log).await?;
    if config.debug {
        info!(
            fallback = snapshot.fallback_trader(),
            alternate_insurer = snapshot.alternate_insurer().unwrap_or("none"),
            "debug mode enabled"
        );
    }

    let content = fs::read_to_string(claims_path)
        .await
        .with_context(|| format!("reading claims {}", claims_path.display()))?;
    let claims: Vec<InsuranceClaim> =
        serde_json::from_str(&content).context("parsing insurance claims")?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mailer = InsuranceMailer::new(&snapshot);
    let mut outbox = MailOutbox::new();
    let mut summaries = Vec::with_capacity(claims.len());
    let mut failed = 0usize;

    for (index, mut claim) in claims.into_iter().enumerate() {
        match mailer.send_mail_with_rng(session, &mut claim, &mut outbox, &mut rng) {
            Ok(resolution) => summaries.push(ClaimSummary {
                index,
                trader_id: claim.trader_id,
                resolution,
            }),
            Err(err) => {
                failed += 1;
                error!(index, "claim skipped: {err}");
            }
        }
    }

    info!(sent = outbox.len(), failed, "insurance claims processed");

    let output = ResolveOutput {
        claims: summaries,
        mails: outbox.into_mails(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(output)
}
