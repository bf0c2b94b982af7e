//! Merge policy: conflict handling and array match-key priority.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Candidate match-key fields, highest priority first.
///
/// Trial identifiers come before generic names so that two trials of the
/// same drug are never collapsed into one element.
pub const DEFAULT_MATCH_KEYS: &[&str] = &[
    "nct_id",
    "trial_id",
    "id",
    "asset_id",
    "ticker",
    "drug_name",
    "asset_name",
    "name",
    "title",
    "event",
    "url",
];

/// Default maximum width of a value preview in the change log.
pub const DEFAULT_PREVIEW_WIDTH: usize = 80;

/// Ordered list of field names used to correlate array elements.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchKeys(Vec<String>);

impl MatchKeys {
    /// Build a priority list from field names, highest priority first.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    /// The candidate field names in priority order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` if no candidates are configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pick the match key for an incoming array of objects.
    ///
    /// Only the first element is inspected: the first candidate present
    /// on it with a non-null value wins and is used for the whole array.
    pub fn resolve(&self, incoming: &[Value]) -> Option<&str> {
        let first = incoming.first()?.as_object()?;
        self.0
            .iter()
            .find(|key| first.get(key.as_str()).is_some_and(|v| !v.is_null()))
            .map(String::as_str)
    }
}

impl Default for MatchKeys {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_KEYS.iter().copied())
    }
}

/// Policy applied to a single merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergePolicy {
    /// Replace conflicting non-empty values with the incoming value.
    pub force_overwrite: bool,
    /// Match-key priority for arrays of objects.
    pub match_keys: MatchKeys,
    /// Maximum characters of a value shown in a change record.
    pub preview_width: usize,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            force_overwrite: false,
            match_keys: MatchKeys::default(),
            preview_width: DEFAULT_PREVIEW_WIDTH,
        }
    }
}

impl MergePolicy {
    /// Default policy with force overwrite switched on or off.
    pub fn with_force(force_overwrite: bool) -> Self {
        Self {
            force_overwrite,
            ..Default::default()
        }
    }
}
