// Helpers for the chat list screen: greeting and "last message" labels.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::Serialize;

/// How the last activity of a chat should be labelled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LastMessageTime {
    /// Less than a day ago, shown as a short time ("14:05")
    Time(String),
    /// Translation key, e.g. `CHAT.TIME.YESTERDAY` or `CHAT.TIME.MONDAY`
    Key(String),
    /// A week or older, shown as a short date
    Date(String),
}

/// Translation key greeting the user for the given hour of day
pub fn greeting_key(hour: u32) -> &'static str {
    match hour {
        5..=11 => "CHAT.INITIAL.GREETING_MORNING",
        12..=17 => "CHAT.INITIAL.GREETING_AFTERNOON",
        _ => "CHAT.INITIAL.GREETING_EVENING",
    }
}

pub fn greeting_key_now() -> &'static str {
    greeting_key(chrono::Local::now().hour())
}

/// Label for a chat's modification date; `None` when the chat has none
pub fn format_last_message_time(
    modification_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<LastMessageTime> {
    let date = modification_date?;
    let diff_days = (now - date).num_milliseconds() as f64 / (1000.0 * 60.0 * 60.0 * 24.0);

    let label = if diff_days < 1.0 {
        LastMessageTime::Time(date.format("%H:%M").to_string())
    } else if diff_days < 2.0 {
        LastMessageTime::Key("CHAT.TIME.YESTERDAY".to_string())
    } else if diff_days < 7.0 {
        LastMessageTime::Key(format!("CHAT.TIME.{}", weekday_name(date.weekday())))
    } else {
        LastMessageTime::Date(date.format("%-m/%-d/%y").to_string())
    };

    Some(label)
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}
