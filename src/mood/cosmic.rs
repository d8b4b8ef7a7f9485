//! Cosmic tag - a coarse day/night bucket from the local wall-clock hour.
//!
//! Time comes in through [`Clock`]; nothing here reads the system clock
//! except [`SystemClock`].

use chrono::{DateTime, Datelike, Local, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::Serialize;

/// First hour (inclusive) counted as night.
const NIGHT_STARTS: u32 = 18;
/// First hour (inclusive) counted as day again.
const DAY_STARTS: u32 = 5;

const DAY_MESSAGES: [&str; 7] = [
    "Fresh week, fresh orbit. Set one gentle intention.",
    "The sun favours steady steps today.",
    "Midweek light: notice what is already working.",
    "Energy is building. Point it at one thing.",
    "Let the day end lighter than it started.",
    "Open skies. Make room for play.",
    "Slow sun. Rest counts as progress.",
];

const NIGHT_MESSAGES: [&str; 7] = [
    "The moon keeps no deadlines. Neither do you, tonight.",
    "Quiet hours are for unclenching.",
    "Stars turn slowly. So can you.",
    "Night tides pull worries out to sea.",
    "Dim the lights and let the week settle.",
    "Moonlight favours dreamers.",
    "A still night before a new cycle.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CosmicTag {
    Day,
    Night,
}

impl CosmicTag {
    pub fn from_hour(hour: u32) -> Self {
        if hour >= NIGHT_STARTS || hour < DAY_STARTS {
            CosmicTag::Night
        } else {
            CosmicTag::Day
        }
    }

    pub fn at(now: &NaiveDateTime) -> Self {
        Self::from_hour(now.hour())
    }

    pub fn is_night(&self) -> bool {
        matches!(self, CosmicTag::Night)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CosmicTag::Day => "day",
            CosmicTag::Night => "night",
        }
    }
}

/// Source of local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// Instant for stored timestamps. Zoneless clocks read `now()` as UTC.
    fn utc_now(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.now())
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Body of `GET /cosmic-today`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CosmicReading {
    pub cosmic_tag: CosmicTag,
    pub message: &'static str,
    pub date: String,
}

pub fn cosmic_today(now: &NaiveDateTime) -> CosmicReading {
    let tag = CosmicTag::at(now);
    let day = now.weekday().num_days_from_monday() as usize;
    let message = match tag {
        CosmicTag::Day => DAY_MESSAGES[day],
        CosmicTag::Night => NIGHT_MESSAGES[day],
    };
    CosmicReading {
        cosmic_tag: tag,
        message,
        date: now.date().to_string(),
    }
}
