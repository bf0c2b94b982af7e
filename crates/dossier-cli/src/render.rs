//! Human and machine renderings of a merge outcome.

use std::fmt::Write;
use std::path::Path;

use colored::{ColoredString, Colorize};
use dossier_merge::{ChangeAction, ChangeRecord, MergeSummary};
use dossier_store::{ApplyOutcome, ApplyStatus};
use serde::Serialize;

/// Section order of the text report.
const SECTIONS: [ChangeAction; 4] = [
    ChangeAction::Fill,
    ChangeAction::Force,
    ChangeAction::Skip,
    ChangeAction::Append,
];

/// JSON report for `--format json`.
#[derive(Serialize)]
pub struct Report<'a> {
    pub existing: &'a Path,
    pub incoming: &'a Path,
    pub dry_run: bool,
    pub force: bool,
    pub status: ApplyStatus,
    pub backup: Option<&'a Path>,
    pub summary: MergeSummary,
    pub changes: &'a [ChangeRecord],
}

impl<'a> Report<'a> {
    pub fn new(existing: &'a Path, incoming: &'a Path, force: bool, outcome: &'a ApplyOutcome) -> Self {
        Self {
            existing,
            incoming,
            dry_run: outcome.status == ApplyStatus::Preview,
            force,
            status: outcome.status,
            backup: outcome.backup.as_deref(),
            summary: outcome.result.summary(),
            changes: &outcome.result.changes,
        }
    }
}

/// Diff-style text report grouped by action.
pub fn render_text(existing: &Path, outcome: &ApplyOutcome, force: bool) -> String {
    let mut out = String::new();
    let mode = match (outcome.status, force) {
        (ApplyStatus::Preview, false) => "preview",
        (ApplyStatus::Preview, true) => "preview (force)",
        (_, false) => "merge",
        (_, true) => "merge (force)",
    };
    let _ = writeln!(out, "{} {} [{}]", "Merging into".bold(), existing.display(), mode);

    for action in SECTIONS {
        let records: Vec<&ChangeRecord> = outcome.result.records(action).collect();
        if records.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", section_title(action, records.len()));
        for record in records {
            let _ = writeln!(out, "  {}", record_line(record));
        }
    }

    let _ = writeln!(out, "{} {}", "Summary:".bold(), outcome.result.summary());
    let status = match (&outcome.status, &outcome.backup) {
        (ApplyStatus::Preview, _) => "dry run: no changes written".yellow().to_string(),
        (ApplyStatus::Unchanged, _) => "no effective changes".dimmed().to_string(),
        (ApplyStatus::Written, Some(backup)) => {
            format!("{} (backup: {})", "written".green(), backup.display())
        }
        (ApplyStatus::Written, None) => "written".green().to_string(),
    };
    let _ = writeln!(out, "{status}");
    out
}

fn section_title(action: ChangeAction, count: usize) -> ColoredString {
    let title = format!("{action} ({count})");
    match action {
        ChangeAction::Fill => title.green().bold(),
        ChangeAction::Force => title.yellow().bold(),
        ChangeAction::Skip => title.red().bold(),
        ChangeAction::Append => title.cyan().bold(),
        ChangeAction::Keep => title.dimmed(),
    }
}

fn record_line(record: &ChangeRecord) -> String {
    match (&record.old, &record.new) {
        (Some(old), Some(new)) => format!("{}: {} -> {}", record.path, old.dimmed(), new),
        (None, Some(new)) => format!("{}: {}", record.path, new),
        (Some(old), None) => format!("{}: {}", record.path, old.dimmed()),
        (None, None) => record.path.clone(),
    }
}
