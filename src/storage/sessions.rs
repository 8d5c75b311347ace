//! Session directory index
//!
//! Every completed interaction is stored as one folder under the sessions
//! root. The most recently created folder is the "current" session.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// One session folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    /// Folder name
    pub name: String,
    /// Creation time (modification time where the filesystem lacks it)
    pub created: SystemTime,
}

/// Read-only view of the session folders under a root directory
#[derive(Debug, Clone)]
pub struct SessionIndex {
    root: PathBuf,
}

impl SessionIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of the session folders, in listing order.
    /// A missing root yields an empty list.
    pub async fn list_sessions(&self) -> io::Result<Vec<String>> {
        Ok(self.scan().await?.into_iter().map(|entry| entry.name).collect())
    }

    /// Full path of the most recently created session folder, if any
    pub async fn current_session_path(&self) -> io::Result<Option<PathBuf>> {
        let entries = self.scan().await?;
        Ok(latest_session(entries).map(|entry| self.root.join(entry.name)))
    }

    /// Collect the immediate subdirectories of the root, sorted by name
    pub async fn scan(&self) -> io::Result<Vec<SessionEntry>> {
        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Sessions root {:?} does not exist", self.root);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            // Follows symlinks so linked session folders count
            let metadata = match tokio::fs::metadata(entry.path()).await {
                Ok(metadata) => metadata,
                // Removed between listing and stat
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            };
            if !metadata.is_dir() {
                continue;
            }

            let created = metadata
                .created()
                .or_else(|_| metadata.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);

            entries.push(SessionEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                created,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Pick the newest entry. Ties keep listing order.
pub fn latest_session(mut entries: Vec<SessionEntry>) -> Option<SessionEntry> {
    // sort_by is stable, so equal timestamps stay in listing order
    entries.sort_by(|a, b| b.created.cmp(&a.created));
    entries.into_iter().next()
}
