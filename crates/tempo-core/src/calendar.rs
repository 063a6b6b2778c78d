//! Weekly routine calendar.
//!
//! Days are numbered Monday = 0 .. Sunday = 6. Built-in routine entries
//! remember which routine they came from so their titles can follow the
//! interface language.

use chrono::{Datelike, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::i18n;
use crate::profile::{Language, Profile};

pub const DEFAULT_NEW_ENTRY_TIME: &str = "10:00";
pub const DEFAULT_FROM_TASK_TIME: &str = "09:00";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineKey {
    Wake,
    Dress,
    Breakfast,
    Teeth,
    School,
    Lunch,
    Shower,
    Pack,
    Dinner,
    Sleep,
    Routines,
    HighSchool,
    Meds,
    Coffee,
    Work1,
    Work2,
    Home,
    WindDown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub id: String,
    pub day: u8,
    pub time: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine: Option<RoutineKey>,
}

/// (key, id fragment, time, duration in minutes)
type RoutineRow = (RoutineKey, &'static str, &'static str, Option<u32>);

const CHILD: &[RoutineRow] = &[
    (RoutineKey::Wake, "wake", "08:00", None),
    (RoutineKey::Dress, "dress", "08:15", None),
    (RoutineKey::Breakfast, "bkfst", "08:30", None),
    (RoutineKey::Teeth, "teeth", "08:45", None),
    (RoutineKey::School, "school", "09:00", Some(210)),
    (RoutineKey::Lunch, "lunch", "12:30", Some(150)),
    (RoutineKey::Shower, "shower", "19:00", None),
    (RoutineKey::Pack, "pack", "19:30", None),
    (RoutineKey::Dinner, "dinner", "20:00", None),
    (RoutineKey::Sleep, "sleep", "21:00", None),
];

const TEEN: &[RoutineRow] = &[
    (RoutineKey::Wake, "wake", "07:00", None),
    (RoutineKey::Routines, "rout", "07:15", None),
    (RoutineKey::HighSchool, "inst", "08:00", Some(390)),
    (RoutineKey::Shower, "shower", "20:00", None),
    (RoutineKey::Pack, "pack", "20:30", None),
    (RoutineKey::Dinner, "dinner", "21:00", None),
    (RoutineKey::Sleep, "sleep", "22:30", None),
];

const ADULT: &[RoutineRow] = &[
    (RoutineKey::Meds, "wake", "07:00", Some(30)),
    (RoutineKey::Coffee, "coffee", "07:30", Some(30)),
    (RoutineKey::Work1, "work1", "08:30", Some(180)),
    (RoutineKey::Lunch, "lunch", "13:30", Some(60)),
    (RoutineKey::Work2, "work2", "15:00", Some(120)),
    (RoutineKey::Home, "home", "18:00", Some(60)),
    (RoutineKey::Dinner, "dinner", "20:30", None),
    (RoutineKey::WindDown, "winddown", "22:00", Some(30)),
    (RoutineKey::Sleep, "sleep", "23:00", None),
];

/// Monday-to-Friday routine entries for a profile.
pub fn default_routines(profile: Profile, lang: Language) -> Vec<CalendarEntry> {
    let (prefix, rows) = match profile {
        Profile::Child => ("c", CHILD),
        Profile::Teen => ("t", TEEN),
        Profile::Adult => ("a", ADULT),
    };
    (0..5u8)
        .flat_map(|day| {
            rows.iter().map(move |(key, frag, time, duration)| CalendarEntry {
                id: format!("{prefix}-{frag}-{day}"),
                day,
                time: (*time).to_string(),
                title: i18n::routine_title(lang, *key).to_string(),
                duration: *duration,
                routine: Some(*key),
            })
        })
        .collect()
}

/// Monday-based index of today's weekday.
pub fn day_index(date: impl Datelike) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyCalendar {
    entries: Vec<CalendarEntry>,
}

impl WeeklyCalendar {
    pub fn new(entries: Vec<CalendarEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CalendarEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fill an empty calendar with the profile's routines.
    /// Returns false and leaves existing entries alone otherwise.
    pub fn seed_if_empty(&mut self, profile: Profile, lang: Language) -> bool {
        if !self.entries.is_empty() {
            return false;
        }
        self.entries = default_routines(profile, lang);
        true
    }

    /// Entries for one day, earliest first.
    pub fn for_day(&self, day: u8) -> Vec<&CalendarEntry> {
        let mut out: Vec<_> = self.entries.iter().filter(|e| e.day == day).collect();
        out.sort_by(|a, b| a.time.cmp(&b.time));
        out
    }

    pub fn add(
        &mut self,
        day: u8,
        time: &str,
        title: &str,
        duration: Option<u32>,
    ) -> Result<&CalendarEntry, ValidationError> {
        if day > 6 {
            return Err(ValidationError::DayOutOfRange(day));
        }
        let time = normalize_time(time)?;
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::Empty("title".into()));
        }
        let idx = self.entries.len();
        self.entries.push(CalendarEntry {
            id: uuid::Uuid::new_v4().to_string(),
            day,
            time,
            title: title.to_string(),
            duration,
            routine: None,
        });
        Ok(&self.entries[idx])
    }

    pub fn remove(&mut self, id: &str) -> Result<CalendarEntry, ValidationError> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ValidationError::NotFound {
                kind: "calendar entry",
                id: id.to_string(),
            })?;
        Ok(self.entries.remove(pos))
    }

    /// Retitle built-in routine entries for a new language.
    pub fn relabel(&mut self, lang: Language) {
        for entry in &mut self.entries {
            if let Some(key) = entry.routine {
                entry.title = i18n::routine_title(lang, key).to_string();
            }
        }
    }
}

/// Parse `H:MM`/`HH:MM` and return it zero-padded so entries sort by text.
fn normalize_time(time: &str) -> Result<String, ValidationError> {
    NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| ValidationError::InvalidTime(time.to_string()))
}
