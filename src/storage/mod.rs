//!  Storage is organized through [entry_store::StudyLogStorage] and
//!  [start_date_cache::FileStartDateCache].
//!  The basic idea is:
//!   - The `study_logs` collection is a single journal file of json lines.
//!   - Every write appends a line, the latest line for a date wins. Deletions are tombstones.
//!   - The tracking start date is additionally cached in a separate file, so the application
//!     keeps working if the journal can't be read.

pub mod entities;
pub mod entry_store;
pub mod start_date_cache;
