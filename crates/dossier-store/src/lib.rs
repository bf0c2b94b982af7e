//! Crash-safe persistence for canonical dossier records.
//!
//! Wraps the pure merge engine from `dossier-merge` in a file-level
//! operation: load both documents, merge, back up the canonical file, then
//! atomically replace it.
//!
//! # Design Rules
//!
//! 1. Both documents are parsed before anything is written.
//! 2. The backup copy completes before the canonical file is touched.
//! 3. The canonical file is replaced by rename, never written in place.
//! 4. Backups are never overwritten or deleted.
//! 5. Dry runs and no-op merges perform no writes at all.
//!
//! Writes to the same canonical file are not coordinated across processes;
//! callers run one merge per entity at a time.

pub mod apply;
pub mod error;
pub mod file;
pub mod traits;

pub use apply::{apply_merge, apply_merge_with, backup_stamp, ApplyOptions, ApplyOutcome, ApplyStatus};
pub use error::{StoreError, StoreResult};
pub use file::FsDocumentStore;
pub use traits::DocumentStore;
