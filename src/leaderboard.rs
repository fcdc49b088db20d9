//! Quiz score leaderboard persisted as CSV
//!
//! One row per finished game: `timestamp,nickname,mode,score,duration_secs`.
//! Rows are only ever appended; ranking happens on read.

use std::cmp::Ordering;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Longest nickname accepted
pub const MAX_NICKNAME_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub timestamp: DateTime<Utc>,
    pub nickname: String,
    /// Game mode label, e.g. `multiplication` or `percent`
    pub mode: String,
    pub score: u32,
    pub duration_secs: f64,
}

impl LeaderboardEntry {
    /// Entry stamped with the current time
    pub fn now(nickname: impl Into<String>, mode: impl Into<String>, score: u32, duration_secs: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            nickname: nickname.into(),
            mode: mode.into(),
            score,
            duration_secs,
        }
    }

    fn validate(&self) -> Result<()> {
        let nickname = self.nickname.trim();
        if nickname.is_empty() {
            return Err(Error::Leaderboard("nickname is empty".to_string()));
        }
        if nickname.chars().count() > MAX_NICKNAME_CHARS {
            return Err(Error::Leaderboard(format!(
                "nickname longer than {} characters",
                MAX_NICKNAME_CHARS
            )));
        }
        if self.mode.trim().is_empty() {
            return Err(Error::Leaderboard("mode is empty".to_string()));
        }
        if !self.duration_secs.is_finite() || self.duration_secs < 0.0 {
            return Err(Error::Leaderboard(format!("bad duration {}", self.duration_secs)));
        }
        Ok(())
    }
}

/// Higher score first, then faster time
fn rank_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.duration_secs.total_cmp(&b.duration_secs))
}

/// CSV-backed store of leaderboard rows
#[derive(Debug, Clone)]
pub struct LeaderboardStore {
    path: PathBuf,
}

impl LeaderboardStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, writing the header first if the file is new or empty
    pub fn append(&self, entry: &LeaderboardEntry) -> Result<()> {
        entry.validate()?;

        let needs_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        let entry = LeaderboardEntry {
            nickname: entry.nickname.trim().to_string(),
            ..entry.clone()
        };
        writer.serialize(&entry)?;
        writer.flush()?;

        debug!("Recorded {} score {} for {}", entry.mode, entry.score, entry.nickname);
        Ok(())
    }

    /// All rows in file order; a missing file is an empty board
    pub fn load(&self) -> Result<Vec<LeaderboardEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_reader(File::open(&self.path)?);
        let mut entries = Vec::new();
        for result in reader.deserialize() {
            let entry: LeaderboardEntry = result?;
            entries.push(entry);
        }

        info!("Loaded {} leaderboard rows from {}", entries.len(), self.path.display());
        Ok(entries)
    }

    /// Top `limit` rows, optionally for one mode only
    pub fn ranked(&self, mode: Option<&str>, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let mut entries: Vec<_> = self
            .load()?
            .into_iter()
            .filter(|e| mode.map_or(true, |m| e.mode == m))
            .collect();
        entries.sort_by(rank_order);
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(dir: &tempfile::TempDir) -> LeaderboardStore {
        LeaderboardStore::new(dir.path().join("leaderboard.csv"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_and_rank() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);
        store.append(&LeaderboardEntry::now("aki", "percent", 8, 41.0)).unwrap();
        store.append(&LeaderboardEntry::now("ben", "percent", 10, 55.5)).unwrap();
        store.append(&LeaderboardEntry::now(" chie ", "percent", 10, 38.2)).unwrap();
        store.append(&LeaderboardEntry::now("dan", "multiplication", 12, 20.0)).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("timestamp,nickname,mode,score,duration_secs\n"));
        assert_eq!(text.matches("timestamp").count(), 1);

        let ranked = store.ranked(Some("percent"), 10).unwrap();
        let names: Vec<&str> = ranked.iter().map(|e| e.nickname.as_str()).collect();
        assert_eq!(names, vec!["chie", "ben", "aki"]);

        let top = store.ranked(None, 1).unwrap();
        assert_eq!(top[0].nickname, "dan");
    }

    #[test]
    fn test_rejects_bad_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);
        assert!(store.append(&LeaderboardEntry::now("  ", "percent", 1, 1.0)).is_err());
        assert!(store.append(&LeaderboardEntry::now("x".repeat(21), "percent", 1, 1.0)).is_err());
        assert!(store.append(&LeaderboardEntry::now("eve", "percent", 1, f64::NAN)).is_err());
        assert!(!store.path().exists());
    }
}
