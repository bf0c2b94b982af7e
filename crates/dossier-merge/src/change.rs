//! Change records and merge results.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The decision taken at one location of the document tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    /// An empty existing value was filled from the incoming document.
    Fill,
    /// A conflicting existing value was overwritten (force mode).
    Force,
    /// A conflicting incoming value was discarded.
    Skip,
    /// The incoming value was empty; the existing value was retained.
    Keep,
    /// New array items were appended.
    Append,
}

impl ChangeAction {
    /// Actions that alter the merged document.
    pub fn is_effective(self) -> bool {
        matches!(self, Self::Fill | Self::Force | Self::Append)
    }

    /// Lowercase tag used in logs and rendered output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Force => "force",
            Self::Skip => "skip",
            Self::Keep => "keep",
            Self::Append => "append",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One merge decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Location in the document, e.g. `trials[nct_id=NCT1].status`.
    pub path: String,
    pub action: ChangeAction,
    /// Preview of the existing value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<String>,
    /// Preview of the incoming value, or a description of appended items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<String>,
}

impl ChangeRecord {
    pub(crate) fn new(
        path: impl Into<String>,
        action: ChangeAction,
        old: Option<String>,
        new: Option<String>,
    ) -> Self {
        Self {
            path: path.into(),
            action,
            old,
            new,
        }
    }
}

/// The outcome of a merge: the merged document and its change log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MergeResult {
    /// The merged document.
    pub merged: Value,
    /// Change records in traversal order.
    pub changes: Vec<ChangeRecord>,
}

impl MergeResult {
    /// Number of records with the given action.
    pub fn count(&self, action: ChangeAction) -> usize {
        self.records(action).count()
    }

    /// Records with the given action, in traversal order.
    pub fn records(&self, action: ChangeAction) -> impl Iterator<Item = &ChangeRecord> + '_ {
        self.changes.iter().filter(move |c| c.action == action)
    }

    pub fn filled(&self) -> usize {
        self.count(ChangeAction::Fill)
    }

    pub fn forced(&self) -> usize {
        self.count(ChangeAction::Force)
    }

    pub fn skipped(&self) -> usize {
        self.count(ChangeAction::Skip)
    }

    pub fn appended(&self) -> usize {
        self.count(ChangeAction::Append)
    }

    pub fn kept(&self) -> usize {
        self.count(ChangeAction::Keep)
    }

    /// Returns `true` if any record altered the document.
    pub fn has_effective_changes(&self) -> bool {
        self.changes.iter().any(|c| c.action.is_effective())
    }

    /// Per-action counts.
    pub fn summary(&self) -> MergeSummary {
        MergeSummary {
            filled: self.filled(),
            forced: self.forced(),
            skipped: self.skipped(),
            appended: self.appended(),
            kept: self.kept(),
        }
    }
}

/// Per-action record counts of a merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    pub filled: usize,
    pub forced: usize,
    pub skipped: usize,
    pub appended: usize,
    pub kept: usize,
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} filled, {} forced, {} skipped, {} appended, {} kept",
            self.filled, self.forced, self.skipped, self.appended, self.kept
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(path: &str, action: ChangeAction) -> ChangeRecord {
        ChangeRecord::new(path, action, None, None)
    }

    #[test]
    fn counts_by_action() {
        let result = MergeResult {
            merged: json!({}),
            changes: vec![
                record("a", ChangeAction::Fill),
                record("b", ChangeAction::Fill),
                record("c", ChangeAction::Skip),
                record("d", ChangeAction::Append),
                record("e", ChangeAction::Keep),
            ],
        };
        assert_eq!(result.filled(), 2);
        assert_eq!(result.forced(), 0);
        assert_eq!(result.skipped(), 1);
        assert_eq!(result.appended(), 1);
        assert_eq!(result.kept(), 1);
        assert!(result.has_effective_changes());
        assert_eq!(
            result.summary().to_string(),
            "2 filled, 0 forced, 1 skipped, 1 appended, 1 kept"
        );
    }

    #[test]
    fn skip_and_keep_are_not_effective() {
        let result = MergeResult {
            merged: json!({}),
            changes: vec![record("a", ChangeAction::Skip), record("b", ChangeAction::Keep)],
        };
        assert!(!result.has_effective_changes());
    }

    #[test]
    fn action_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ChangeAction::Force).unwrap(), json!("force"));
        assert_eq!(ChangeAction::Append.to_string(), "append");
    }

    #[test]
    fn record_omits_missing_values() {
        let rec = ChangeRecord::new("tags", ChangeAction::Append, None, Some("+1 item(s)".into()));
        assert_eq!(
            serde_json::to_value(&rec).unwrap(),
            json!({"path": "tags", "action": "append", "new": "+1 item(s)"})
        );
    }
}
