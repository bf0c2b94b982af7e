//! Filesystem-backed document store.
//!
//! Canonical documents are pretty-printed JSON files. Backups are sibling
//! files named `<name>.bak.<stamp>`; replacement goes through a temporary
//! file in the same directory that is fsynced and then renamed over the
//! target.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

/// Document store over the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsDocumentStore;

impl FsDocumentStore {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentStore for FsDocumentStore {
    fn load(&self, path: &Path) -> StoreResult<Value> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
            _ => StoreError::io(path, e),
        })?;
        let document = serde_json::from_slice(&bytes).map_err(|e| StoreError::MalformedInput {
            path: path.to_path_buf(),
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "document loaded");
        Ok(document)
    }

    fn backup(&self, path: &Path, stamp: &str) -> StoreResult<PathBuf> {
        let file_name = path.file_name().ok_or_else(|| {
            StoreError::io(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })?;
        let base = format!("{}.bak.{stamp}", file_name.to_string_lossy());

        let mut source = File::open(path).map_err(|e| StoreError::io(path, e))?;
        let mut attempt = 0u32;
        loop {
            let candidate = match attempt {
                0 => path.with_file_name(&base),
                n => path.with_file_name(format!("{base}.{n}")),
            };
            let mut target = match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    attempt += 1;
                    continue;
                }
                Err(e) => return Err(StoreError::io(&candidate, e)),
            };

            let copied = io::copy(&mut source, &mut target).and_then(|n| target.sync_all().map(|()| n));
            return match copied {
                Ok(bytes) => {
                    debug!(backup = %candidate.display(), bytes, "backup copied");
                    Ok(candidate)
                }
                Err(e) => {
                    if let Err(cleanup) = fs::remove_file(&candidate) {
                        warn!(backup = %candidate.display(), error = %cleanup, "failed to remove partial backup");
                    }
                    Err(StoreError::io(&candidate, e))
                }
            };
        }
    }

    fn replace(&self, path: &Path, document: &Value) -> StoreResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut body =
            serde_json::to_vec_pretty(document).map_err(|e| StoreError::Serialization(e.to_string()))?;
        body.push(b'\n');

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        tmp.write_all(&body).map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.as_file().sync_all().map_err(|e| StoreError::io(tmp.path(), e))?;

        // Temp files are created 0600; carry over the canonical file's mode.
        if let Ok(meta) = fs::metadata(path) {
            fs::set_permissions(tmp.path(), meta.permissions()).map_err(|e| StoreError::io(tmp.path(), e))?;
        }

        tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
        debug!(path = %path.display(), bytes = body.len(), "document replaced");
        Ok(())
    }
}
