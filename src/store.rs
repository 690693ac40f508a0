//! Runtime lookup over embedded file records
//!
//! An [`EmbeddedStore`] is the data half of a generated carton artifact: a
//! read-only map from logical path to encoded content plus the source file's
//! modification time. Lookups transparently prefer a newer on-disk copy of
//! the file over the embedded one, so editing an asset during development is
//! picked up without regenerating the artifact, while deployments without a
//! local source tree serve the embedded copy.
//!
//! The store is an ordinary value, not a process global. Generated artifacts
//! memoize one instance behind a `OnceLock`; tests build as many independent
//! stores as they need. All operations are read-only, so concurrent lookups
//! need no synchronization.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use tracing::debug;

use crate::codec::Codec;
use crate::error::{CartonError, Result};

/// One embedded file: logical path, encoded content, and the source file's
/// modification time in nanoseconds since the Unix epoch.
///
/// Records are created by the encoder at generation time and never mutated;
/// replacing one means regenerating the whole artifact.
#[derive(Debug, Clone)]
pub struct FileRecord {
    path: String,
    content: String,
    mod_time: i64,
}

impl FileRecord {
    /// Create a record. `content` is the text-safe encoded blob produced by
    /// the codec; `mod_time` is nanoseconds since the Unix epoch.
    pub fn new(path: impl Into<String>, content: impl Into<String>, mod_time: i64) -> Self {
        FileRecord {
            path: path.into(),
            content: content.into(),
            mod_time,
        }
    }

    /// Logical path of the embedded file, relative to the walked root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Source file modification time, nanoseconds since the Unix epoch.
    pub fn mod_time(&self) -> i64 {
        self.mod_time
    }
}

/// Read-only map of embedded files with decode-on-read and local fallback.
#[derive(Debug)]
pub struct EmbeddedStore {
    records: HashMap<String, FileRecord>,
    local_root: Option<PathBuf>,
    codec: Codec,
}

impl EmbeddedStore {
    /// Build a store from generated records. Later records win on duplicate
    /// paths, matching map-literal semantics.
    pub fn from_records(records: impl IntoIterator<Item = FileRecord>) -> Self {
        EmbeddedStore {
            records: records
                .into_iter()
                .map(|r| (r.path.clone(), r))
                .collect(),
            local_root: None,
            codec: Codec::default(),
        }
    }

    /// Resolve freshness checks and local reads against `root` instead of
    /// the process working directory. Generated artifacts record the walked
    /// source root here so keys map back to their original location.
    pub fn with_local_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.local_root = Some(root.into());
        self
    }

    /// All embedded paths, in no particular order.
    pub fn files(&self) -> Vec<&str> {
        self.records.keys().map(String::as_str).collect()
    }

    /// Whether a local copy of `path` is strictly newer than the embedded
    /// record. A failed stat (absent or inaccessible file) means "use the
    /// embedded copy" and returns `false`; so does an unknown path.
    pub fn is_local_newer(&self, path: &str) -> bool {
        let Some(record) = self.records.get(path) else {
            return false;
        };
        let Ok(meta) = fs::symlink_metadata(self.local_path(path)) else {
            return false;
        };
        mod_time_nanos(&meta) > record.mod_time
    }

    /// Read the local copy of `path` in full.
    pub fn read_local(&self, path: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.local_path(path))?)
    }

    /// Read `path` from the embedded records, delegating to [`read_local`]
    /// when the local copy is newer. Fails with [`CartonError::NotFound`]
    /// for unknown paths and [`CartonError::Decode`] for corrupted blobs.
    ///
    /// [`read_local`]: EmbeddedStore::read_local
    pub fn read_embedded(&self, path: &str) -> Result<Vec<u8>> {
        let record = self
            .records
            .get(path)
            .ok_or_else(|| CartonError::NotFound(path.to_string()))?;

        if self.is_local_newer(path) {
            debug!(path, "local copy is newer, serving from disk");
            return self.read_local(path);
        }
        self.codec.decode(&record.content)
    }

    /// Public lookup entry point: the embedded copy first, then the local
    /// filesystem on any embedded failure. If both fail, the local error is
    /// the one surfaced. Empty content is a successful read, never an error.
    pub fn get(&self, path: &str) -> Result<Vec<u8>> {
        self.read_embedded(path).or_else(|err| {
            debug!(path, %err, "embedded read failed, trying local fallback");
            self.read_local(path)
        })
    }

    fn local_path(&self, path: &str) -> PathBuf {
        match &self.local_root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        }
    }
}

/// Modification time as nanoseconds since the Unix epoch; pre-epoch and
/// unreadable times collapse to 0.
pub(crate) fn mod_time_nanos(meta: &fs::Metadata) -> i64 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
