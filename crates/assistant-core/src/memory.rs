//! Conversation Memory
//!
//! An explicit append-only log of completed chat turns, owned by the chat
//! loop and passed by reference wherever it is needed. Persistence is one
//! serialize-on-write operation through a scoped file handle; there is no
//! global state and no partial rewrite of the file.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// One completed user/assistant exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub assistant: String,
    pub at: DateTime<Utc>,
}

/// Append-only log of a chat session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemoryLog {
    /// Stable identifier for the session this log belongs to.
    pub id: Uuid,

    pub created_at: DateTime<Utc>,

    turns: Vec<ChatTurn>,
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLog {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    /// Append one completed turn. There is deliberately no API to edit or
    /// remove recorded turns.
    pub fn record(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push(ChatTurn {
            user: user.into(),
            assistant: assistant.into(),
            at: Utc::now(),
        });
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Serialize the whole log to `path` in one write. The file handle is
    /// scoped to this call.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Load a previously persisted log.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let log = serde_json::from_reader(reader)?;
        Ok(log)
    }

    /// Load from `path` if it exists, otherwise start fresh.
    pub fn load_or_new(path: &Path) -> Self {
        match Self::load(path) {
            Ok(log) => {
                tracing::debug!(turns = log.len(), path = %path.display(), "resumed memory log");
                log
            }
            Err(err) => {
                if path.exists() {
                    tracing::warn!(path = %path.display(), error = %err, "memory log unreadable, starting fresh");
                }
                Self::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_appends_in_order() {
        let mut log = MemoryLog::new();
        log.record("btc price", "BTC is trading at...");
        log.record("and eth?", "ETH is trading at...");

        assert_eq!(log.len(), 2);
        assert_eq!(log.turns()[0].user, "btc price");
        assert_eq!(log.turns()[1].user, "and eth?");
    }

    #[test]
    fn persist_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");

        let mut log = MemoryLog::new();
        log.record("gold price", "Gold is at 2034...");
        log.persist(&path).unwrap();

        let loaded = MemoryLog::load(&path).unwrap();
        assert_eq!(loaded.id, log.id);
        assert_eq!(loaded.turns(), log.turns());
    }

    #[test]
    fn load_or_new_survives_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = MemoryLog::load_or_new(&dir.path().join("nope.json"));
        assert!(log.is_empty());
    }

    #[test]
    fn load_or_new_survives_a_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "{not json").unwrap();

        let log = MemoryLog::load_or_new(&path);
        assert!(log.is_empty());
    }

    #[test]
    fn persist_overwrites_with_the_full_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");

        let mut log = MemoryLog::new();
        log.record("first", "one");
        log.persist(&path).unwrap();
        log.record("second", "two");
        log.persist(&path).unwrap();

        let loaded = MemoryLog::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
    }
}
