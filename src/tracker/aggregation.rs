//! Averages derived from a [Snapshot] of the tracker. Nothing here mutates state, every value
//! is recomputed from the entries, the start date and the day that counts as today.

use chrono::{Datelike, Duration, NaiveDate};

use crate::utils::{
    percentage::Percentage,
    time::{days_inclusive, week_label, week_start},
};

use super::entry_set::EntrySet;

/// Weeks are always averaged over 7 days, even the one that is still in progress.
pub const DAYS_IN_WEEK: f64 = 7.;

/// Amount of weeks shown by [Snapshot::weekly_chart_series].
pub const CHART_WEEKS: usize = 8;

/// Daily goal the lifetime average is compared against when nothing else is configured.
pub const DEFAULT_DAILY_GOAL: f64 = 12.;

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyDataPoint {
    /// 1 is the oldest week, [CHART_WEEKS] is the current one.
    pub week_index: usize,
    pub week_label: String,
    pub week_start: NaiveDate,
    pub average: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn from_change(change: Percentage) -> Self {
        if *change > 0. {
            Trend::Up
        } else if *change < 0. {
            Trend::Down
        } else {
            Trend::Flat
        }
    }
}

/// A single day of the calendar view.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub hours: f64,
    pub level: u8,
    pub running_average: f64,
    pub is_future: bool,
}

/// Buckets hours of a day into intensity levels 0 to 5.
pub fn heatmap_level(hours: f64) -> u8 {
    if hours <= 0. {
        0
    } else if hours < 2. {
        1
    } else if hours < 4. {
        2
    } else if hours < 6. {
        3
    } else if hours < 8. {
        4
    } else {
        5
    }
}

/// Read only view over tracker state at a specific day.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub entries: &'a EntrySet,
    pub start_date: Option<NaiveDate>,
    pub today: NaiveDate,
}

impl<'a> Snapshot<'a> {
    pub fn new(entries: &'a EntrySet, start_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        Self {
            entries,
            start_date,
            today,
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.entries.total_hours()
    }

    /// Days from the start date to today, both included.
    pub fn total_days(&self) -> i64 {
        self.start_date
            .map(|start| days_inclusive(start, self.today))
            .unwrap_or(0)
    }

    pub fn lifetime_average(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.;
        }
        match self.total_days() {
            0 => 0.,
            days => self.total_hours() / days as f64,
        }
    }

    /// Average per day from the start date up to `date` inclusive.
    pub fn running_average_until(&self, date: NaiveDate) -> f64 {
        let Some(start) = self.start_date else {
            return 0.;
        };
        if date < start {
            return 0.;
        }
        self.entries.hours_between(start, date) / days_inclusive(start, date) as f64
    }

    /// Hours in `[week_start, week_start + 6 days]` divided by 7.
    pub fn weekly_average(&self, week_start: NaiveDate) -> f64 {
        let week_end = week_start + Duration::days(6);
        self.entries.hours_between(week_start, week_end) / DAYS_IN_WEEK
    }

    pub fn current_week_average(&self) -> f64 {
        self.weekly_average(week_start(self.today))
    }

    pub fn last_week_average(&self) -> f64 {
        self.weekly_average(week_start(self.today) - Duration::weeks(1))
    }

    /// Change of the current week compared to the previous one. With nothing last week any
    /// activity counts as +100%.
    pub fn week_over_week_change(&self) -> Percentage {
        let current = self.current_week_average();
        let last = self.last_week_average();

        if last == 0. {
            return Percentage::new(if current > 0. { 100. } else { 0. });
        }
        Percentage::new((current - last) / last * 100.)
    }

    pub fn trend(&self) -> Trend {
        Trend::from_change(self.week_over_week_change())
    }

    /// Averages of the last [CHART_WEEKS] weeks, oldest first.
    pub fn weekly_chart_series(&self) -> Vec<WeeklyDataPoint> {
        let current = week_start(self.today);
        (0..CHART_WEEKS)
            .rev()
            .map(|weeks_back| {
                let start = current - Duration::weeks(weeks_back as i64);
                WeeklyDataPoint {
                    week_index: CHART_WEEKS - weeks_back,
                    week_label: week_label(start),
                    week_start: start,
                    average: self.weekly_average(start),
                }
            })
            .collect()
    }

    /// Weeks of the chart that have any study time.
    pub fn active_weeks(&self) -> usize {
        self.weekly_chart_series()
            .iter()
            .filter(|v| v.average > 0.)
            .count()
    }

    pub fn goal_progress(&self, daily_goal: f64) -> Percentage {
        Percentage::capped_ratio(self.lifetime_average(), daily_goal)
    }

    /// Every day of the month containing `month`.
    pub fn month_days(&self, month: NaiveDate) -> Vec<CalendarDay> {
        let Some(first) = month.with_day(1) else {
            return vec![];
        };
        first
            .iter_days()
            .take_while(|date| date.month() == first.month())
            .map(|date| {
                let hours = self.entries.get(date).unwrap_or(0.);
                CalendarDay {
                    date,
                    hours,
                    level: heatmap_level(hours),
                    running_average: self.running_average_until(date),
                    is_future: date > self.today,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::{storage::entities::StudyEntry, tracker::entry_set::EntrySet};

    use super::{CHART_WEEKS, Snapshot, Trend, heatmap_level};

    /// Wednesday
    const TODAY: NaiveDate = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
    /// Monday of the current week
    const MONDAY: NaiveDate = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    /// Monday of the previous week
    const LAST_MONDAY: NaiveDate = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn entries(values: &[(u32, f64)]) -> EntrySet {
        values
            .iter()
            .map(|(d, hours)| StudyEntry::new(day(*d), *hours))
            .collect()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_empty_state_is_zero() {
        let set = EntrySet::new();
        let snapshot = Snapshot::new(&set, None, TODAY);

        assert_eq!(snapshot.lifetime_average(), 0.);
        assert_eq!(snapshot.running_average_until(TODAY), 0.);
        assert_eq!(snapshot.total_days(), 0);
        assert_eq!(snapshot.total_hours(), 0.);
        assert_eq!(*snapshot.week_over_week_change(), 0.);
        assert_eq!(snapshot.trend(), Trend::Flat);
        assert_eq!(snapshot.active_weeks(), 0);
    }

    #[test]
    fn test_lifetime_average_counts_both_ends() {
        let set = entries(&[(8, 4.), (17, 2.)]);
        let snapshot = Snapshot::new(&set, Some(day(8)), TODAY);

        assert_eq!(snapshot.total_days(), 10);
        assert_close(snapshot.lifetime_average(), 0.6);
    }

    #[test]
    fn test_lifetime_average_with_start_after_today() {
        let set = entries(&[(20, 4.)]);
        let snapshot = Snapshot::new(&set, Some(day(20)), TODAY);

        assert_eq!(snapshot.total_days(), 0);
        assert_eq!(snapshot.lifetime_average(), 0.);
    }

    #[test]
    fn test_running_average() {
        let set = entries(&[(5, 3.), (10, 2.), (12, 6.)]);
        let snapshot = Snapshot::new(&set, Some(day(5)), TODAY);

        assert_eq!(snapshot.running_average_until(day(4)), 0.);
        assert_close(snapshot.running_average_until(day(5)), 3.);
        assert_close(snapshot.running_average_until(day(10)), 5. / 6.);
        assert_close(snapshot.running_average_until(day(11)), 5. / 7.);
    }

    #[test]
    fn test_weekly_average_divides_by_seven() {
        // Monday and Wednesday of one week
        let set = entries(&[(15, 2.), (17, 3.), (22, 10.), (14, 10.)]);
        let snapshot = Snapshot::new(&set, Some(day(14)), TODAY);

        assert_close(snapshot.weekly_average(MONDAY), 5. / 7.);
        assert_close(snapshot.current_week_average(), 5. / 7.);
        assert_close(snapshot.last_week_average(), 10. / 7.);
    }

    #[test]
    fn test_week_over_week_change() {
        let set = entries(&[(9, 2.), (16, 3.)]);
        let snapshot = Snapshot::new(&set, Some(day(9)), TODAY);
        assert_close(*snapshot.week_over_week_change(), 50.);
        assert_eq!(snapshot.trend(), Trend::Up);

        let set = entries(&[(9, 4.), (16, 1.)]);
        let snapshot = Snapshot::new(&set, Some(day(9)), TODAY);
        assert_close(*snapshot.week_over_week_change(), -75.);
        assert_eq!(snapshot.trend(), Trend::Down);

        let set = entries(&[(16, 1.)]);
        let snapshot = Snapshot::new(&set, Some(day(16)), TODAY);
        assert_eq!(*snapshot.week_over_week_change(), 100.);

        let set = entries(&[(1, 1.)]);
        let snapshot = Snapshot::new(&set, Some(day(1)), TODAY);
        assert_eq!(*snapshot.week_over_week_change(), 0.);
    }

    #[test]
    fn test_chart_series() {
        let set = entries(&[(8, 7.), (16, 14.)]);
        let snapshot = Snapshot::new(&set, Some(day(8)), TODAY);
        let series = snapshot.weekly_chart_series();

        assert_eq!(series.len(), CHART_WEEKS);
        assert_eq!(
            series.iter().map(|v| v.week_index).collect::<Vec<_>>(),
            (1..=8).collect::<Vec<_>>()
        );
        assert_eq!(series[7].week_start, MONDAY);
        assert_eq!(series[7].week_label, "Jan 15");
        assert_eq!(series[6].week_start, LAST_MONDAY);
        assert_eq!(
            series[0].week_start,
            NaiveDate::from_ymd_opt(2023, 11, 27).unwrap()
        );
        assert_close(series[7].average, 2.);
        assert_close(series[6].average, 1.);
        assert_eq!(snapshot.active_weeks(), 2);
    }

    #[test]
    fn test_heatmap_levels() {
        assert_eq!(
            [0., 0.5, 2., 3.9, 4., 6., 7.99, 8., 14.].map(heatmap_level),
            [0, 1, 2, 2, 3, 4, 4, 5, 5]
        );
    }

    #[test]
    fn test_goal_progress() {
        let set = entries(&[(17, 3.)]);
        let snapshot = Snapshot::new(&set, Some(day(17)), TODAY);

        assert_eq!(*snapshot.goal_progress(12.), 25.);
        assert_eq!(*snapshot.goal_progress(2.), 100.);
    }

    #[test]
    fn test_month_days() {
        let set = entries(&[(5, 3.), (17, 9.)]);
        let snapshot = Snapshot::new(&set, Some(day(5)), TODAY);
        let days = snapshot.month_days(day(20));

        assert_eq!(days.len(), 31);
        assert_eq!(days[0].date, day(1));
        assert_eq!(days[4].level, 2);
        assert_close(days[4].running_average, 3.);
        assert_eq!(days[16].level, 5);
        assert!(!days[16].is_future);
        assert!(days[17].is_future);
        assert_eq!(days[3].running_average, 0.);
    }
}
