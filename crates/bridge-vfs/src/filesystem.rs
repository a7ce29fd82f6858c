//! Logical filesystems and URL resolution.

use crate::commands;
use crate::entry::{DirectoryEntry, Entry, FileEntry};
use crate::error::{VfsError, VfsResult};
use crate::path;
use crate::reply::HostReply;
use bridge_core::{BridgeError, Dispatcher};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage class of a filesystem. The host keeps a single namespace for
/// both; the kind only names the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileSystemKind {
    Temporary,
    Persistent,
}

impl FileSystemKind {
    /// From the numeric `LocalFileSystem` constants (0 temporary, 1
    /// persistent). Unknown codes are persistent.
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Temporary,
            _ => Self::Persistent,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Temporary => "temporary",
            Self::Persistent => "persistent",
        }
    }
}

struct Inner {
    kind: FileSystemKind,
    dispatcher: Arc<Dispatcher>,
}

/// A logical filesystem whose storage lives in the host.
///
/// Cheap to clone; every entry carries one as its back-reference.
#[derive(Clone)]
pub struct FileSystem {
    inner: Arc<Inner>,
}

impl FileSystem {
    pub fn new(kind: FileSystemKind, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            inner: Arc::new(Inner { kind, dispatcher }),
        }
    }

    pub fn kind(&self) -> FileSystemKind {
        self.inner.kind
    }

    pub fn name(&self) -> &'static str {
        self.inner.kind.name()
    }

    /// Root directory.
    pub fn root(&self) -> DirectoryEntry {
        DirectoryEntry::new("", self.clone())
    }

    /// Resolve a URL to an entry.
    ///
    /// Directories resolve locally. Files are checked with the host first and
    /// fail with [`VfsError::NotFound`] when absent.
    pub async fn resolve(&self, url: &str) -> VfsResult<Entry> {
        debug!(url, filesystem = self.name(), "Resolving URL");
        if path::is_directory_url(url) {
            Ok(Entry::Directory(self.resolve_directory(url)))
        } else {
            self.resolve_file(url).await.map(Entry::File)
        }
    }

    /// Resolve a URL that is known to name a file, skipping the heuristic.
    pub async fn resolve_file(&self, url: &str) -> VfsResult<FileEntry> {
        let entry = FileEntry::new(path::strip_url(url), self.clone());
        self.ensure_exists(&entry).await?;
        Ok(entry)
    }

    /// Resolve a URL that is known to name a directory. No host round trip.
    pub fn resolve_directory(&self, url: &str) -> DirectoryEntry {
        DirectoryEntry::new(path::strip_url(url), self.clone())
    }

    /// Fail with NotFound unless the host reports the file as present.
    pub(crate) async fn ensure_exists(&self, entry: &FileEntry) -> VfsResult<()> {
        let reply = self
            .command(commands::FILE_EXISTS, json!({ "path": entry.full_path() }))
            .await?;
        if HostReply::from_value(&reply).exists.unwrap_or(false) {
            Ok(())
        } else {
            warn!(path = entry.full_path(), "File not found");
            Err(VfsError::not_found(entry.full_path()))
        }
    }

    pub(crate) async fn command(&self, command: &str, data: Value) -> Result<Value, BridgeError> {
        self.inner.dispatcher.call(command, data).await
    }
}

impl fmt::Debug for FileSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSystem").field("name", &self.name()).finish()
    }
}

/// Obtain a logical filesystem. `size` is advisory and only logged.
pub fn request_file_system(dispatcher: Arc<Dispatcher>, kind: FileSystemKind, size: u64) -> FileSystem {
    debug!(filesystem = kind.name(), size, "Requesting filesystem");
    FileSystem::new(kind, dispatcher)
}
