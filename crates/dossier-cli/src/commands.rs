use anyhow::Context;
use dossier_store::{apply_merge, ApplyOptions, ApplyOutcome};

use crate::cli::{Cli, OutputFormat};
use crate::config::load_policy;
use crate::render::{render_text, Report};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let options = build_options(&cli)?;
    let outcome = execute(&cli, &options)?;
    let force = options.policy.force_overwrite;
    match cli.format {
        OutputFormat::Text => print!("{}", render_text(&cli.existing, &outcome, force)),
        OutputFormat::Json => {
            let report = Report::new(&cli.existing, &cli.incoming, force, &outcome);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn build_options(cli: &Cli) -> anyhow::Result<ApplyOptions> {
    Ok(ApplyOptions {
        policy: load_policy(cli)?,
        dry_run: cli.dry_run,
    })
}

fn execute(cli: &Cli, options: &ApplyOptions) -> anyhow::Result<ApplyOutcome> {
    apply_merge(&cli.existing, &cli.incoming, options).with_context(|| {
        format!(
            "merging {} into {}",
            cli.incoming.display(),
            cli.existing.display()
        )
    })
}
