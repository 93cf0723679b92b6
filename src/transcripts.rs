//! Per-user transcript memory
//!
//! Each user gets one JSON file under the transcripts directory holding the
//! ordered list of transcribed utterances. The store is the only persisted
//! state in the process; the relay registry itself is purely in-memory.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One transcribed utterance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptEntry {
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

/// File-backed per-user transcript store
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the transcript file for a username
    ///
    /// Usernames are caller-supplied, so anything that is not alphanumeric,
    /// '-' or '_' is replaced before it becomes part of a file name.
    pub fn path_for(&self, username: &str) -> PathBuf {
        let safe: String = username
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }

    /// Load the transcript for a username (empty when no file exists)
    pub fn load(&self, username: &str) -> Result<Vec<TranscriptEntry>> {
        let path = self.path_for(username);
        if !Path::new(&path).exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read transcript file: {}", path.display()))?;

        let entries: Vec<TranscriptEntry> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse transcript file: {}", path.display()))?;

        Ok(entries)
    }

    /// Replace the stored transcript for a username
    pub fn save(&self, username: &str, entries: &[TranscriptEntry]) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create transcripts directory: {}", self.dir.display())
        })?;

        let path = self.path_for(username);
        let content = serde_json::to_string_pretty(entries)
            .with_context(|| "Failed to serialize transcript")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write transcript file: {}", path.display()))?;

        Ok(())
    }

    /// Append one utterance to a user's transcript
    pub fn append(&self, username: &str, text: &str) -> Result<()> {
        let mut entries = self.load(username)?;
        entries.push(TranscriptEntry {
            timestamp: Utc::now(),
            text: text.to_string(),
        });
        self.save(username, &entries)
    }

    /// Full transcript joined into one prompt-ready block of text
    pub fn history_text(&self, username: &str) -> Result<String> {
        let entries = self.load(username)?;
        Ok(entries
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());

        let entries = store.load("alice").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_append_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());

        store.append("alice", "first utterance").unwrap();
        store.append("alice", "second utterance").unwrap();

        let entries = store.load("alice").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "first utterance");
        assert_eq!(entries[1].text, "second utterance");

        // Other users are unaffected
        assert!(store.load("bob").unwrap().is_empty());
    }

    #[test]
    fn test_history_text_joins_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());

        store.append("alice", "hello").unwrap();
        store.append("alice", "world").unwrap();

        assert_eq!(store.history_text("alice").unwrap(), "hello\nworld");
    }

    #[test]
    fn test_username_sanitization() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());

        let path = store.path_for("../../etc/passwd");
        assert!(path.starts_with(dir.path()));
        assert_eq!(path.file_name().unwrap(), "______etc_passwd.json");

        store.append("../../etc/passwd", "contained").unwrap();
        assert_eq!(store.load("../../etc/passwd").unwrap().len(), 1);
    }
}
