//! `apprel-preview` -- offline preview of deletable rules and versions.
//!
//! Reads rule and version snapshots exported from the admin UI (JSON
//! arrays in the host's field naming) and prints, as JSON, which rows the
//! select operations would pick. Never deletes anything.
//!
//! # Environment variables
//!
//! | Variable                       | Required | Default | Description                       |
//! |--------------------------------|----------|---------|-----------------------------------|
//! | `APPREL_RULES_FILE`            | yes      | --      | Path to the `ALL RULES` snapshot  |
//! | `APPREL_VERSIONS_FILE`         | yes      | --      | Path to the `VERSIONS` snapshot   |
//! | `APPREL_RULE_DELETE_WAIT_DAYS` | no       | `7`     | Days to wait after rules clear    |

use std::path::Path;

use anyhow::Context;
use apprel_core::models::{ReleaseVersion, Rule};
use apprel_pruner::preview::build_preview;
use apprel_pruner::PrunerConfig;
use serde::de::DeserializeOwned;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apprel_pruner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = PrunerConfig::from_env();
    let rules_path = required_var("APPREL_RULES_FILE")?;
    let versions_path = required_var("APPREL_VERSIONS_FILE")?;

    let rules: Vec<Rule> = read_snapshot(Path::new(&rules_path))?;
    let versions: Vec<ReleaseVersion> = read_snapshot(Path::new(&versions_path))?;

    tracing::info!(
        rules = rules.len(),
        versions = versions.len(),
        wait_days = config.rule_delete_wait_days,
        "Loaded snapshots",
    );

    let preview = build_preview(
        rules,
        versions,
        chrono::Utc::now(),
        config.rule_delete_wait_days,
    )?;

    tracing::info!(
        rules = preview.deletable_rules.len(),
        versions = preview.deletable_versions.len(),
        "Preview complete",
    );

    println!("{}", serde_json::to_string_pretty(&preview)?);
    Ok(())
}

fn required_var(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} environment variable is required"))
}

fn read_snapshot<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))
}
