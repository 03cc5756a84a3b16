use chrono::{DateTime, Local, NaiveDate};

/// Represents an entity responsible for providing dates across application. This allows
/// aggregations that depend on "today" to be tested.
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Local>;

    /// Calendar day in the user's timezone. Every study entry is keyed by this kind of date.
    fn today(&self) -> NaiveDate {
        self.time().date_naive()
    }
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock stuck on a single day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn time(&self) -> DateTime<Local> {
        self.0
            .and_hms_opt(12, 0, 0)
            .and_then(|v| v.and_local_timezone(Local).earliest())
            .unwrap_or_else(Local::now)
    }

    fn today(&self) -> NaiveDate {
        self.0
    }
}
