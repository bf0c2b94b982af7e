//! Merge application: load, merge, back up, replace.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use dossier_merge::{merge_with, MergePolicy, MergeResult};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::StoreResult;
use crate::file::FsDocumentStore;
use crate::traits::DocumentStore;

/// Options for one merge application.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Policy handed to the merge engine.
    pub policy: MergePolicy,
    /// Compute the merge but write nothing.
    pub dry_run: bool,
}

impl ApplyOptions {
    pub fn new(force: bool, dry_run: bool) -> Self {
        Self {
            policy: MergePolicy::with_force(force),
            dry_run,
        }
    }
}

/// What happened to the canonical document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyStatus {
    /// Dry run; storage was not touched.
    Preview,
    /// The merge had no effective changes; storage was not touched.
    Unchanged,
    /// A backup was taken and the canonical document replaced.
    Written,
}

/// The outcome of [`apply_merge`].
#[derive(Clone, Debug, PartialEq)]
pub struct ApplyOutcome {
    pub result: MergeResult,
    pub status: ApplyStatus,
    /// Backup of the previous canonical document, when one was written.
    pub backup: Option<PathBuf>,
}

impl ApplyOutcome {
    pub fn written(&self) -> bool {
        self.status == ApplyStatus::Written
    }
}

/// Backup suffix for a point in time: `YYYYMMDDHHMMSS`.
pub fn backup_stamp(at: DateTime<Local>) -> String {
    at.format("%Y%m%d%H%M%S").to_string()
}

/// Merge `incoming_path` into the canonical document at `existing_path`
/// on the local filesystem.
pub fn apply_merge(
    existing_path: &Path,
    incoming_path: &Path,
    options: &ApplyOptions,
) -> StoreResult<ApplyOutcome> {
    apply_merge_with(&FsDocumentStore::new(), existing_path, incoming_path, options)
}

/// Merge `incoming_path` into `existing_path` through `store`.
///
/// Nothing is written on a dry run or when the merge has no fill, force,
/// or append records. Otherwise the canonical document is backed up first
/// and only then replaced; if either step fails the canonical document is
/// left as it was.
pub fn apply_merge_with(
    store: &dyn DocumentStore,
    existing_path: &Path,
    incoming_path: &Path,
    options: &ApplyOptions,
) -> StoreResult<ApplyOutcome> {
    let existing = store.load(existing_path)?;
    let incoming = store.load(incoming_path)?;
    let result = merge_with(&existing, &incoming, &options.policy);
    let summary = result.summary();

    if options.dry_run {
        info!(path = %existing_path.display(), %summary, "dry run; nothing written");
        return Ok(ApplyOutcome {
            result,
            status: ApplyStatus::Preview,
            backup: None,
        });
    }

    if !result.has_effective_changes() {
        info!(path = %existing_path.display(), %summary, "no effective changes; nothing written");
        return Ok(ApplyOutcome {
            result,
            status: ApplyStatus::Unchanged,
            backup: None,
        });
    }

    let backup = store.backup(existing_path, &backup_stamp(Local::now()))?;
    debug!(backup = %backup.display(), "backup complete");
    store.replace(existing_path, &result.merged)?;
    info!(
        path = %existing_path.display(),
        backup = %backup.display(),
        %summary,
        "canonical document updated"
    );

    Ok(ApplyOutcome {
        result,
        status: ApplyStatus::Written,
        backup: Some(backup),
    })
}
