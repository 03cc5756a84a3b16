//! Simple to use cli for tracking how many hours you study every day.
//! Hours are logged per calendar day into a local journal, and averages are derived from it:
//! lifetime, running, weekly, week over week and an 8 week chart.
//!

pub mod cli;
pub mod storage;
pub mod tracker;
pub mod utils;
