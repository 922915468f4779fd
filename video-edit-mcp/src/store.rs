//! In-memory clip store for multi-step edits.
//!
//! Editing tools called with `return_path = false` keep their rendered
//! result in the scratch directory and hand back a `clip://<uuid>`
//! reference instead of a final path. Any later tool accepts such a
//! reference wherever it accepts a video or audio path, so a pipeline can
//! chain trim → resize → overlay without naming intermediates.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use uuid::Uuid;
use video_edit_mcp_common::error::Error;

/// Scheme prefix for clip references.
pub const CLIP_SCHEME: &str = "clip://";

/// Registry mapping clip references to rendered scratch files.
///
/// Entries live for the server process lifetime; the backing files live in
/// the configured work directory.
pub struct ClipStore {
    dir: PathBuf,
    entries: RwLock<HashMap<String, PathBuf>>,
}

impl ClipStore {
    /// Create a store over the given scratch directory.
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Whether an input string is a clip reference.
    pub fn is_clip_ref(input: &str) -> bool {
        input.starts_with(CLIP_SCHEME)
    }

    /// Register a rendered file (or frames directory) and return its
    /// reference.
    pub async fn register(&self, path: PathBuf) -> String {
        let clip_ref = format!("{}{}", CLIP_SCHEME, Uuid::new_v4());
        self.entries.write().await.insert(clip_ref.clone(), path);
        clip_ref
    }

    /// Resolve a reference to its backing path.
    ///
    /// # Errors
    /// Returns `Error::ClipNotFound` for unknown references.
    pub async fn resolve(&self, clip_ref: &str) -> Result<PathBuf, Error> {
        self.entries
            .read()
            .await
            .get(clip_ref)
            .cloned()
            .ok_or_else(|| Error::clip_not_found(clip_ref))
    }

    /// Drop a reference, returning the path it pointed at.
    pub async fn remove(&self, clip_ref: &str) -> Option<PathBuf> {
        self.entries.write().await.remove(clip_ref)
    }

    /// Number of live references.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no references.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Generate a fresh scratch path with the given extension.
    pub fn scratch_path(&self, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", Uuid::new_v4(), extension))
    }

    /// Generate a fresh scratch directory path (not created).
    pub fn scratch_dir(&self) -> PathBuf {
        self.dir.join(Uuid::new_v4().to_string())
    }

    /// The scratch directory this store writes under.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
