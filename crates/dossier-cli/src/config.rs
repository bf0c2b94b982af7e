use std::fs;

use anyhow::Context;
use dossier_merge::{MatchKeys, MergePolicy};

use crate::cli::Cli;

/// Build the merge policy: config file first, then command-line overrides.
pub fn load_policy(cli: &Cli) -> anyhow::Result<MergePolicy> {
    let mut policy = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => MergePolicy::default(),
    };

    if cli.force {
        policy.force_overwrite = true;
    }
    if !cli.match_keys.is_empty() {
        policy.match_keys = MatchKeys::new(cli.match_keys.iter().cloned());
    }
    Ok(policy)
}
