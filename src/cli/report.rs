use ansi_term::{Colour, Style};
use chrono::{Datelike, NaiveDate};

use crate::tracker::{
    aggregation::{CalendarDay, Snapshot, Trend, WeeklyDataPoint},
    entry_set::EntrySet,
    pending::{PendingWrites, SyncState},
    reconcile::Reconciliation,
};

const CHART_WIDTH: usize = 40;

pub fn print_log_result(date: NaiveDate, result: &Reconciliation, pending: &PendingWrites) {
    if result.write.is_none() {
        println!("Nothing changed for {date}");
        return;
    }
    if result.new_hours > 0. {
        println!("{date}\t{}", format_hours(result.new_hours));
    } else {
        println!("{date}\tremoved");
    }
    print_sync_state(pending.state());
    for line in failed_writes(pending) {
        println!("{}", Colour::Red.paint(line));
    }
}

/// One line per queued write whose last attempt failed.
fn failed_writes(pending: &PendingWrites) -> Vec<String> {
    pending
        .iter()
        .filter_map(|write| {
            let error = write.last_error.as_ref()?;
            Some(format!(
                "  {} after {} attempts: {error}",
                write.op.date(),
                write.attempts
            ))
        })
        .collect()
}

fn print_sync_state(sync_state: SyncState) {
    match sync_state {
        SyncState::Synced => {}
        SyncState::Pending { count } => {
            println!("{}", Colour::Yellow.paint(format!("{count} writes pending")))
        }
        SyncState::Failed { count } => println!(
            "{}",
            Colour::Red.paint(format!("{count} writes failed to persist, see logs"))
        ),
    }
}

pub fn print_day(snapshot: &Snapshot, date: NaiveDate) {
    println!(
        "{}\t{}\trunning average {}",
        date.format("%A, %B %-d, %Y"),
        format_hours(snapshot.entries.get(date).unwrap_or(0.)),
        format_hours(snapshot.running_average_until(date)),
    );
}

pub fn print_stats(snapshot: &Snapshot, daily_goal: f64) {
    let change = snapshot.week_over_week_change();
    let trend = match snapshot.trend() {
        Trend::Up => Colour::Green.paint(format!("{change} from last week")),
        Trend::Down => Colour::Red.paint(format!("{change} from last week")),
        Trend::Flat => Style::new().dimmed().paint(format!("{change} from last week")),
    };

    println!(
        "Lifetime average\t{}/day\t{} of {} goal",
        format_hours(snapshot.lifetime_average()),
        *snapshot.goal_progress(daily_goal) as i32,
        format_hours(daily_goal)
    );
    println!("Trend\t\t\t{trend}");
    println!(
        "This week\t\t{}/day",
        format_hours(snapshot.current_week_average())
    );
    println!(
        "Last week\t\t{}/day",
        format_hours(snapshot.last_week_average())
    );
    println!("Total hours\t\t{:.0}", snapshot.total_hours());
    println!("Days tracked\t\t{}", snapshot.total_days());
    println!("Active weeks\t\t{}", snapshot.active_weeks());
    if let Some(start) = snapshot.start_date {
        println!("Tracking since\t\t{start}");
    }
}

pub fn print_chart(series: &[WeeklyDataPoint]) {
    let max = series.iter().map(|v| v.average).fold(0., f64::max);
    for point in series {
        println!(
            "{:>6}\t{:<width$}\t{}",
            point.week_label,
            "#".repeat(bar_width(point.average, max)),
            format_hours(point.average),
            width = CHART_WIDTH
        );
    }
}

pub fn print_calendar(month: NaiveDate, days: &[CalendarDay]) {
    println!("{}", month.format("%B %Y"));
    println!(" Mon   Tue   Wed   Thu   Fri   Sat   Sun");

    let padding = days
        .first()
        .map(|v| v.date.weekday().num_days_from_monday() as usize)
        .unwrap_or(0);
    let mut line = "      ".repeat(padding);

    for day in days {
        line += &format_calendar_cell(day);
        if day.date.weekday().num_days_from_monday() == 6 {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
}

fn format_calendar_cell(day: &CalendarDay) -> String {
    let cell = if day.is_future {
        format!("{:>4}  ", "·")
    } else if day.hours > 0. {
        format!("{:>4.1}  ", day.hours)
    } else {
        format!("{:>4}  ", day.date.day())
    };
    heatmap_style(day.level, day.is_future).paint(cell).to_string()
}

fn heatmap_style(level: u8, is_future: bool) -> Style {
    if is_future {
        return Style::new().dimmed();
    }
    match level {
        0 => Style::new(),
        1 => Colour::Fixed(22).normal(),
        2 => Colour::Fixed(28).normal(),
        3 => Colour::Fixed(34).normal(),
        4 => Colour::Fixed(40).bold(),
        _ => Colour::Fixed(46).bold(),
    }
}

pub fn print_entries(entries: &EntrySet) {
    for entry in entries.iter() {
        println!("{}\t{}", entry.date, format_hours(entry.hours));
    }
}

fn bar_width(value: f64, max: f64) -> usize {
    if max <= 0. {
        return 0;
    }
    (value / max * CHART_WIDTH as f64).round() as usize
}

fn format_hours(v: f64) -> String {
    let minutes = (v * 60.).round() as i64;
    if minutes >= 60 {
        format!("{}h{}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use chrono::NaiveDate;

    use crate::{
        storage::{entities::StudyEntry, entry_store::MockEntryStore},
        tracker::{pending::PendingWrites, reconcile::WriteOp},
    };

    use super::{CHART_WIDTH, bar_width, failed_writes, format_hours};

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(2.5), "2h30m");
        assert_eq!(format_hours(5. / 7.), "43m");
        assert_eq!(format_hours(0.), "0m");
        assert_eq!(format_hours(12.), "12h0m");
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar_width(0., 0.), 0);
        assert_eq!(bar_width(2., 2.), CHART_WIDTH);
        assert_eq!(bar_width(1., 2.), CHART_WIDTH / 2);
    }

    #[tokio::test]
    async fn test_failed_writes_are_listed() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let mut store = MockEntryStore::new();
        store.expect_upsert().returning(|_| Ok(()));
        store
            .expect_delete()
            .returning(|_| Err(anyhow!("disk full")));

        let mut pending = PendingWrites::new();
        pending.push(WriteOp::Upsert(StudyEntry::new(day(3), 1.)));
        pending.push(WriteOp::Delete(day(4)));
        assert!(failed_writes(&pending).is_empty());

        pending.flush(&store).await;

        assert_eq!(
            failed_writes(&pending),
            vec!["  2024-01-04 after 1 attempts: disk full".to_string()]
        );
    }
}
