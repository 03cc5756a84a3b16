use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, AsyncReadExt, AsyncSeekExt, AsyncWriteExt, BufReader},
};
use tracing::{debug, instrument, warn};

use super::entities::StudyEntry;

/// Name of the journal file that holds the `study_logs` collection.
pub const STUDY_LOGS_FILE: &str = "study_logs.jsonl";

/// Interface for abstracting durable storage of study entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Retrieves every stored entry ordered by date ascending.
    async fn load_entries(&self) -> Result<Vec<StudyEntry>>;

    /// Retrieves the entry with the smallest date, if any exists.
    async fn earliest_entry(&self) -> Result<Option<StudyEntry>>;

    /// Creates or overwrites the entry for `entry.date`.
    async fn upsert(&self, entry: StudyEntry) -> Result<()>;

    /// Removes the entry for `date`. Removing an absent date is not an error.
    async fn delete(&self, date: NaiveDate) -> Result<()>;
}

/// The main realization of [EntryStore]. Entries are kept in an append only journal, where each
/// line is a json encoded [StudyEntry].
pub struct StudyLogStorage {
    journal: PathBuf,
}

impl StudyLogStorage {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self {
            journal: dir.join(STUDY_LOGS_FILE),
        })
    }

    /// Reads every line of the journal in the order it was written.
    async fn read_journal(&self) -> Result<Vec<StudyEntry>> {
        async fn extract(path: &Path) -> std::result::Result<Vec<StudyEntry>, std::io::Error> {
            debug!("Extracting {path:?}");
            let file = File::open(path).await?;
            file.lock_shared()?;
            let buffer = BufReader::new(file);
            let mut lines = buffer.lines();
            let mut entries = vec![];
            while let Some(v) = lines.next_line().await? {
                entries.extend(parse_line(path, &v));
            }

            lines.into_inner().into_inner().unlock_async().await?;

            Ok(entries)
        }

        match extract(&self.journal).await {
            Ok(s) => Ok(s),
            Err(e) => {
                if e.kind() == ErrorKind::NotFound {
                    Ok(vec![])
                } else {
                    Err(e)?
                }
            }
        }
    }

    async fn append(&self, entry: StudyEntry) -> Result<()> {
        let mut buffer = serde_json::to_vec(&entry)?;
        buffer.push(b'\n');

        let mut file = File::options()
            .append(true)
            .create(true)
            .open(&self.journal)
            .await?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = async {
            file.write_all(&buffer).await?;
            file.flush().await
        }
        .await;
        file.unlock_async().await?;
        result?;
        Ok(())
    }

    /// Rewrites the journal so that it has a single line per stored day. Returns amount of entries
    /// that were kept.
    ///
    /// The file is rewritten in place under the exclusive lock, so appends from other processes
    /// either land before the rewrite or after it, never in a replaced file.
    #[instrument(skip(self))]
    pub async fn compact(&self) -> Result<usize> {
        let mut file = match File::options()
            .read(true)
            .write(true)
            .open(&self.journal)
            .await
        {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => Err(e)?,
        };

        file.lock_exclusive()?;
        let result = async {
            let mut content = String::new();
            file.read_to_string(&mut content).await?;
            let entries =
                replay_journal(content.lines().filter_map(|v| parse_line(&self.journal, v)));

            let mut buffer = Vec::<u8>::new();
            for entry in &entries {
                serde_json::to_writer(&mut buffer, entry)?;
                buffer.push(b'\n');
            }

            file.set_len(0).await?;
            file.rewind().await?;
            file.write_all(&buffer).await?;
            file.flush().await?;
            file.sync_all().await?;
            anyhow::Ok(entries.len())
        }
        .await;
        file.unlock_async().await?;
        result
    }
}

#[async_trait]
impl EntryStore for StudyLogStorage {
    async fn load_entries(&self) -> Result<Vec<StudyEntry>> {
        Ok(replay_journal(self.read_journal().await?))
    }

    async fn earliest_entry(&self) -> Result<Option<StudyEntry>> {
        Ok(self.load_entries().await?.into_iter().next())
    }

    async fn upsert(&self, entry: StudyEntry) -> Result<()> {
        debug!("Upserting {entry:?}");
        self.append(entry).await
    }

    async fn delete(&self, date: NaiveDate) -> Result<()> {
        debug!("Deleting {date}");
        self.append(StudyEntry::tombstone(date)).await
    }
}

/// Parses a single journal line. Blank and illegal lines are skipped.
fn parse_line(path: &Path, line: &str) -> Option<StudyEntry> {
    if line.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<StudyEntry>(line) {
        Ok(v) => Some(v),
        Err(e) => {
            // Might happen after a write got cut off
            warn!("During parsing in path {path:?} found illegal json string {line}:  {e}");
            None
        }
    }
}

/// Collapses journal lines into the current state. Latest line for a date wins, tombstones
/// remove the date. The result is sorted by date.
fn replay_journal(lines: impl IntoIterator<Item = StudyEntry>) -> Vec<StudyEntry> {
    let mut state = BTreeMap::<NaiveDate, StudyEntry>::new();
    for line in lines {
        if line.is_tombstone() {
            state.remove(&line.date);
        } else {
            state.insert(line.date, line);
        }
    }
    state.into_values().collect()
}
