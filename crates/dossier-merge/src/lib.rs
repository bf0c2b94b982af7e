//! Structural merge engine for dossier records.
//!
//! Reconciles an existing canonical document with a freshly extracted draft
//! of the same entity. The engine fills gaps, preserves verified values
//! unless a force overwrite is requested, and reconciles arrays of
//! sub-entities by a match key. Every decision is recorded as a
//! [`ChangeRecord`].
//!
//! # Key Types
//!
//! - [`MergePolicy`] / [`MatchKeys`] -- Conflict policy and array match-key priority
//! - [`MergeResult`] / [`ChangeRecord`] / [`ChangeAction`] -- Merged document plus change log
//! - [`MergeSummary`] -- Per-action counts
//!
//! # Guarantees
//!
//! 1. Inputs are borrowed and never mutated; the merged document is a fresh value.
//! 2. Without force, every non-empty value in the existing document survives.
//! 3. Identical inputs produce identical output and an identical change log.
//! 4. There are no error states: every pair of documents has a defined merge.

pub mod change;
pub mod document;
pub mod engine;
pub mod policy;

pub use change::{ChangeAction, ChangeRecord, MergeResult, MergeSummary};
pub use document::{is_empty, preview};
pub use engine::{merge, merge_with};
pub use policy::{MatchKeys, MergePolicy, DEFAULT_MATCH_KEYS, DEFAULT_PREVIEW_WIDTH};
