//! File writer.
//!
//! Each `write` sends the full content to the host, which replaces the file.
//! `seek` and `truncate` do not reach the host.

use crate::commands;
use crate::entry::FileEntry;
use crate::error::{VfsError, VfsResult};
use crate::reply::HostReply;
use bridge_core::BridgeError;
use serde_json::json;
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct FileWriter {
    entry: FileEntry,
    position: u64,
    length: u64,
}

impl FileWriter {
    pub(crate) fn new(entry: FileEntry) -> Self {
        Self {
            entry,
            position: 0,
            length: 0,
        }
    }

    /// Replace the file with `content`. Returns the number of bytes written.
    pub async fn write(&mut self, content: &str) -> VfsResult<u64> {
        let path = self.entry.full_path();
        let reply = self
            .entry
            .filesystem()
            .command(commands::FILE_WRITE, json!({ "path": path, "data": content }))
            .await
            .map_err(|e| {
                error!(path, error = %e, "Write failed");
                match e {
                    BridgeError::Host(message) => VfsError::Write(message),
                    other => VfsError::Bridge(other),
                }
            })?;

        let reply = HostReply::from_value(&reply);
        if let Some(message) = reply.error() {
            error!(path, error = message, "Write failed");
            return Err(VfsError::Write(message.to_string()));
        }

        let written = reply.size.unwrap_or(content.len() as u64);
        self.length = written;
        self.position = written;
        info!(path, bytes = written, "File written");
        Ok(written)
    }

    /// Move the write position. Recorded only.
    pub fn seek(&mut self, offset: u64) {
        self.position = offset;
    }

    pub fn truncate(&mut self, size: u64) {
        debug!(path = self.entry.full_path(), size, "Truncate ignored");
    }

    pub fn abort(&mut self) {
        debug!(path = self.entry.full_path(), "Abort ignored");
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn entry(&self) -> &FileEntry {
        &self.entry
    }
}
