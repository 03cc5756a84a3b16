use chrono::NaiveDate;

use crate::storage::entities::StudyEntry;

use super::entry_set::EntrySet;

/// Write that has to reach the durable store for local state to be persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WriteOp {
    Upsert(StudyEntry),
    Delete(NaiveDate),
}

impl WriteOp {
    pub fn date(&self) -> NaiveDate {
        match self {
            WriteOp::Upsert(entry) => entry.date,
            WriteOp::Delete(date) => *date,
        }
    }
}

/// Result of merging an hour delta into a day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciliation {
    /// Total for the day after the delta. Never negative.
    pub new_hours: f64,
    /// `None` when the delta was zero and nothing needs to change.
    pub write: Option<WriteOp>,
    /// Start date after the operation.
    pub start_date: Option<NaiveDate>,
}

impl Reconciliation {
    pub fn start_date_moved(&self, previous: Option<NaiveDate>) -> bool {
        self.start_date != previous
    }
}

/// Decides what logging `additional_hours` on `date` does, without changing anything.
///
/// The day total is floored at zero. A zero total means the day is deleted. Any non zero delta on
/// a day before the start date moves the start date back to it, it never moves forward.
pub fn reconcile(
    entries: &EntrySet,
    start_date: Option<NaiveDate>,
    date: NaiveDate,
    additional_hours: f64,
) -> Reconciliation {
    let current_hours = entries.get(date).unwrap_or(0.);

    if additional_hours == 0. || !additional_hours.is_finite() {
        return Reconciliation {
            new_hours: current_hours,
            write: None,
            start_date,
        };
    }

    let new_hours = (current_hours + additional_hours).max(0.);

    let start_date = match start_date {
        Some(start) if start <= date => Some(start),
        _ => Some(date),
    };

    let write = if new_hours == 0. {
        WriteOp::Delete(date)
    } else {
        WriteOp::Upsert(StudyEntry::new(date, new_hours))
    };

    Reconciliation {
        new_hours,
        write: Some(write),
        start_date,
    }
}

/// Permissive parsing of user supplied hours. Anything that isn't a finite number is a zero
/// delta.
pub fn parse_hours(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.,
    }
}
