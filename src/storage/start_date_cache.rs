use std::{io::ErrorKind, path::PathBuf, sync::Mutex};

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use tracing::warn;

use crate::utils::time::{date_to_record_name, parse_record_name};

/// Name of the file holding the cached start date.
pub const START_DATE_KEY: &str = "study-tracker-start-date";

/// Fallback storage for the tracking start date. It's consulted when the journal can't provide
/// one and updated whenever the start date changes.
#[cfg_attr(test, mockall::automock)]
pub trait StartDateCache: Send + Sync {
    fn get(&self) -> Result<Option<NaiveDate>>;

    fn set(&self, date: NaiveDate) -> Result<()>;
}

/// Keeps the start date as an ISO string inside a single file.
pub struct FileStartDateCache {
    path: PathBuf,
}

impl FileStartDateCache {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            path: dir.join(START_DATE_KEY),
        }
    }
}

impl StartDateCache for FileStartDateCache {
    fn get(&self) -> Result<Option<NaiveDate>> {
        match std::fs::read_to_string(&self.path) {
            Ok(value) => {
                let date = parse_record_name(&value);
                if date.is_none() {
                    warn!("Cached start date {value:?} is not a valid date");
                }
                Ok(date)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, date: NaiveDate) -> Result<()> {
        std::fs::write(&self.path, date_to_record_name(date))?;
        Ok(())
    }
}

/// Cache that lives only as long as the process.
#[derive(Default)]
pub struct MemoryStartDateCache {
    value: Mutex<Option<NaiveDate>>,
}

impl MemoryStartDateCache {
    pub fn with_date(date: NaiveDate) -> Self {
        Self {
            value: Mutex::new(Some(date)),
        }
    }
}

impl StartDateCache for MemoryStartDateCache {
    fn get(&self) -> Result<Option<NaiveDate>> {
        self.value
            .lock()
            .map(|v| *v)
            .map_err(|_| anyhow!("Start date cache lock was poisoned"))
    }

    fn set(&self, date: NaiveDate) -> Result<()> {
        let mut value = self
            .value
            .lock()
            .map_err(|_| anyhow!("Start date cache lock was poisoned"))?;
        *value = Some(date);
        Ok(())
    }
}
