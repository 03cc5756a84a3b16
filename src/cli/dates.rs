use std::fmt::Display;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};

use crate::utils::time::parse_record_name;

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// Turns user input into a calendar day. Accepts `2024-01-10` as well as anything
/// chrono-english understands, like "yesterday", "3 days ago" or "15/03/2025".
pub fn parse_day(input: &str, date_style: DateStyle, now: DateTime<Local>) -> Result<NaiveDate> {
    if let Some(date) = parse_record_name(input) {
        return Ok(date);
    }

    match parse_date_string(input, now, date_style.into()) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {input:?}: {e}"),
            )
            .into()),
    }
}

/// Same as [parse_day], but refuses days that haven't happened yet.
pub fn parse_past_day(
    input: &str,
    date_style: DateStyle,
    now: DateTime<Local>,
) -> Result<NaiveDate> {
    let date = parse_day(input, date_style, now)?;
    if date > now.date_naive() {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Can't log hours for {date}, it's in the future"),
            )
            .into());
    }
    Ok(date)
}
