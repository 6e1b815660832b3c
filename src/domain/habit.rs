use super::enums::Frequency;
use super::task::{deserialize_timestamp, EntityId};
use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A habit as returned by `GET /api/habits`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Habit {
    pub id: EntityId,
    pub name: String,
    pub frequency: Frequency,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_checkin: Option<NaiveDateTime>,
    #[serde(default)]
    pub streak: u32,
}

impl Habit {
    /// Whether the habit has been checked in for its current period.
    ///
    /// Daily habits count only a check-in on the same local calendar day.
    /// Weekly habits count anything on or after the start of the current
    /// week (Sunday, midnight).
    pub fn checked_in_recently(&self, now: NaiveDateTime) -> bool {
        let Some(last) = self.last_checkin else {
            return false;
        };

        match self.frequency {
            Frequency::Daily => last.date() == now.date(),
            Frequency::Weekly => last >= week_start(now),
        }
    }
}

/// Most recent Sunday at midnight, relative to `now`
pub fn week_start(now: NaiveDateTime) -> NaiveDateTime {
    let days_back = now.weekday().num_days_from_sunday() as i64;
    (now.date() - Duration::days(days_back)).and_time(NaiveTime::MIN)
}

/// Human label for the last check-in
pub fn format_last_checkin(last: Option<NaiveDateTime>, now: NaiveDateTime) -> String {
    let Some(last) = last else {
        return "Never".to_string();
    };

    let today = now.date();
    let yesterday = today - Duration::days(1);

    if last.date() == today {
        format!("Today at {}", last.format("%H:%M"))
    } else if last.date() == yesterday {
        format!("Yesterday at {}", last.format("%H:%M"))
    } else if today.and_time(NaiveTime::MIN) - last < Duration::days(7) {
        last.format("%a %H:%M").to_string()
    } else {
        last.format("%b %-d, %Y").to_string()
    }
}

/// Body sent on habit creation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitDraft {
    pub name: String,
    pub frequency: Frequency,
}
