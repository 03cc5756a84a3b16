pub mod dates;
pub mod report;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dates::{DateStyle, parse_day, parse_past_day};
use tracing::{info, level_filters::LevelFilter};

use crate::{
    storage::{entry_store::StudyLogStorage, start_date_cache::FileStartDateCache},
    tracker::{StudyTracker, aggregation::DEFAULT_DAILY_GOAL, reconcile::parse_hours},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, create_application_path},
        logging::enable_logging,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Studylog", version, long_about = None)]
#[command(about = "Application for tracking daily study hours", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Add hours to a day. Negative hours subtract time")]
    Log {
        #[arg(help = "Day to log. Examples are \"today\", \"yesterday\", \"2025-03-15\", \"15/03/2025\"")]
        date: String,
        #[arg(
            allow_hyphen_values = true,
            help = "Hours to add, for example 1.5 or -0.5. Anything that isn't a number is ignored"
        )]
        hours: String,
    },
    #[command(about = "Show hours and running average for a day")]
    Show {
        #[arg(default_value = "today")]
        date: String,
    },
    #[command(about = "Show averages and the week over week trend")]
    Stats {
        #[arg(long, default_value_t = DEFAULT_DAILY_GOAL, help = "Daily goal in hours")]
        goal: f64,
    },
    #[command(about = "Show average hours per day over the last 8 weeks")]
    Chart {},
    #[command(about = "Show a month as a heatmap")]
    Calendar {
        #[arg(long, help = "Any day of the month to show. Defaults to the current month")]
        month: Option<String>,
    },
    #[command(about = "List every logged day")]
    Entries {},
    #[command(about = "Rewrite the journal to a single line per day")]
    Compact {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .map_or_else(create_application_default_path, create_application_path)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&app_dir.join("logs"), logging_level, args.log)?;

    let store = StudyLogStorage::new(app_dir.clone())?;
    let cache = FileStartDateCache::new(app_dir);
    let now = DefaultClock.time();
    let mut tracker = StudyTracker::load(store, cache, Box::new(DefaultClock)).await;

    match args.commands {
        Commands::Log { date, hours } => {
            let date = parse_past_day(&date, args.date_style, now)?;
            let hours = parse_hours(&hours);
            info!("Logging {hours} hours for {date}");
            let result = tracker.log_hours(date, hours).await;
            report::print_log_result(date, &result, tracker.pending_writes());
        }
        Commands::Show { date } => {
            let date = parse_day(&date, args.date_style, now)?;
            report::print_day(&tracker.snapshot(), date);
        }
        Commands::Stats { goal } => report::print_stats(&tracker.snapshot(), goal),
        Commands::Chart {} => report::print_chart(&tracker.snapshot().weekly_chart_series()),
        Commands::Calendar { month } => {
            let month = match month {
                Some(month) => parse_day(&month, args.date_style, now)?,
                None => tracker.today(),
            };
            report::print_calendar(month, &tracker.snapshot().month_days(month));
        }
        Commands::Entries {} => report::print_entries(tracker.entries()),
        Commands::Compact {} => {
            let kept = tracker.store().compact().await?;
            println!("Compacted journal, {kept} days kept");
        }
    }
    Ok(())
}
