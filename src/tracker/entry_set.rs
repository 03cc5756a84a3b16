use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::storage::entities::StudyEntry;

/// Study entries keyed by day. There is at most one entry per date and every entry has positive
/// hours: inserting zero hours removes the day instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntrySet {
    hours: BTreeMap<NaiveDate, f64>,
}

impl EntrySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.hours.get(&date).copied()
    }

    /// Sets the total for `date`. Non positive totals remove the entry.
    pub fn set(&mut self, date: NaiveDate, hours: f64) {
        if hours > 0. {
            self.hours.insert(date, hours);
        } else {
            self.hours.remove(&date);
        }
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    /// Entries in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = StudyEntry> + '_ {
        self.hours
            .iter()
            .map(|(date, hours)| StudyEntry::new(*date, *hours))
    }

    pub fn total_hours(&self) -> f64 {
        self.hours.values().sum()
    }

    /// Sum of hours for days in `[from, to]`. An inverted range sums to zero.
    pub fn hours_between(&self, from: NaiveDate, to: NaiveDate) -> f64 {
        if to < from {
            return 0.;
        }
        self.hours.range(from..=to).map(|(_, hours)| hours).sum()
    }
}

impl FromIterator<StudyEntry> for EntrySet {
    fn from_iter<T: IntoIterator<Item = StudyEntry>>(iter: T) -> Self {
        let mut set = EntrySet::new();
        for entry in iter {
            set.set(entry.date, entry.hours);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::storage::entities::StudyEntry;

    use super::EntrySet;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_zero_hours_remove_entry() {
        let mut set = EntrySet::new();
        set.set(day(3), 2.);
        set.set(day(3), 0.);
        assert!(set.is_empty());
        assert_eq!(set.get(day(3)), None);
    }

    #[test]
    fn test_collect_drops_empty_days() {
        let set: EntrySet = [
            StudyEntry::new(day(4), 1.),
            StudyEntry::new(day(2), 0.),
            StudyEntry::new(day(1), 3.),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().map(|v| v.date).collect::<Vec<_>>(),
            vec![day(1), day(4)]
        );
    }

    #[test]
    fn test_hours_between_is_inclusive() {
        let set: EntrySet = [
            StudyEntry::new(day(1), 1.),
            StudyEntry::new(day(3), 2.),
            StudyEntry::new(day(5), 4.),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.hours_between(day(1), day(3)), 3.);
        assert_eq!(set.hours_between(day(3), day(5)), 6.);
        assert_eq!(set.hours_between(day(5), day(1)), 0.);
        assert_eq!(set.total_hours(), 7.);
    }
}
