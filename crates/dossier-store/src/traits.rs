use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::StoreResult;

/// Storage backend for canonical documents.
///
/// Implementations must satisfy these invariants:
/// - `load` never modifies storage.
/// - `backup` never overwrites an existing file and completes fully before
///   returning `Ok`.
/// - `replace` either installs the complete new document or leaves the
///   previous contents untouched.
pub trait DocumentStore: Send + Sync {
    /// Read and parse the document at `path`.
    ///
    /// Returns `NotFound` if the path does not exist and `MalformedInput`
    /// if it does not parse.
    fn load(&self, path: &Path) -> StoreResult<Value>;

    /// Copy the current contents of `path` to a sibling backup file named
    /// after `stamp`. Returns the backup path.
    fn backup(&self, path: &Path, stamp: &str) -> StoreResult<PathBuf>;

    /// Atomically replace the document at `path` with `document`.
    fn replace(&self, path: &Path, document: &Value) -> StoreResult<()>;
}
