use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One line of the `study_logs` journal. A day is keyed by its calendar date, there is no time
/// component. `hours == 0` on disk is a tombstone: the day was deleted.
#[derive(PartialEq, PartialOrd, Debug, Serialize, Deserialize, Clone, Copy)]
pub struct StudyEntry {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub hours: f64,
}

impl StudyEntry {
    pub fn new(date: NaiveDate, hours: f64) -> Self {
        Self { date, hours }
    }

    pub fn tombstone(date: NaiveDate) -> Self {
        Self { date, hours: 0. }
    }

    pub fn is_tombstone(&self) -> bool {
        self.hours <= 0.
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;

    use super::StudyEntry;

    #[test]
    fn test_entry_line_format() -> Result<()> {
        let entry = StudyEntry::new(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), 2.5);
        let line = serde_json::to_string(&entry)?;
        assert_eq!(line, r#"{"date":"2024-01-10","hours":2.5}"#);

        let parsed: StudyEntry = serde_json::from_str(r#"{"date":"2024-01-05","hours":0}"#)?;
        assert!(parsed.is_tombstone());
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        Ok(())
    }
}
