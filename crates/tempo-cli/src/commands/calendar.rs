use chrono::Local;
use clap::Subcommand;
use tempo_core::calendar::day_index;
use tempo_core::{Config, ValidationError};

use super::{open_app, print_json};

const DAY_NAMES: [&str; 7] = ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Show the week, or one day
    List {
        /// Day: 0-6 (Monday first), a weekday name, or "today"
        #[arg(long)]
        day: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an entry
    Add {
        /// Entry title
        title: String,
        /// Day: 0-6 (Monday first), a weekday name, or "today"
        #[arg(long, default_value = "today")]
        day: String,
        /// Start time, HH:MM (default 10:00)
        #[arg(long)]
        time: Option<String>,
        /// Length in minutes
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Remove an entry by ID
    Remove {
        id: String,
    },
    /// Fill an empty calendar with the profile's weekday routines
    Seed,
}

/// Parse a day argument into a Monday-based index.
pub fn parse_day(s: &str) -> Result<u8, ValidationError> {
    let s = s.trim().to_ascii_lowercase();
    if s == "today" {
        return Ok(day_index(Local::now().date_naive()));
    }
    if let Ok(n) = s.parse::<u8>() {
        return if n <= 6 { Ok(n) } else { Err(ValidationError::DayOutOfRange(n)) };
    }
    DAY_NAMES
        .iter()
        .position(|name| s.len() >= 3 && name.starts_with(&s))
        .map(|i| i as u8)
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "day".into(),
            message: format!("'{s}' is not a weekday"),
        })
}

pub fn run(action: CalendarAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut app = open_app(&config)?;

    match action {
        CalendarAction::List { day, json } => {
            let days: Vec<u8> = match day {
                Some(d) => vec![parse_day(&d)?],
                None => (0..7).collect(),
            };
            let entries: Vec<_> = days.iter().flat_map(|d| app.calendar().for_day(*d)).collect();
            if json {
                print_json(&entries)?;
                return Ok(());
            }
            if entries.is_empty() {
                println!("calendar is empty (try `tempo calendar seed`)");
            }
            for d in days {
                let today = app.calendar().for_day(d);
                if today.is_empty() {
                    continue;
                }
                println!("{}", DAY_NAMES[d as usize]);
                for e in today {
                    match e.duration {
                        Some(m) => println!("  {}  {} ({m} min)", e.time, e.title),
                        None => println!("  {}  {}", e.time, e.title),
                    }
                }
            }
        }
        CalendarAction::Add {
            title,
            day,
            time,
            minutes,
        } => {
            let day = parse_day(&day)?;
            let entry = app.add_calendar_entry(day, time.as_deref(), &title, minutes)?;
            println!("{}", entry.id);
        }
        CalendarAction::Remove { id } => {
            let entry = app.remove_calendar_entry(&id)?;
            println!("removed: {}", entry.title);
        }
        CalendarAction::Seed => {
            if app.seed_calendar()? {
                println!("added {} routine entries", app.calendar().entries().len());
            } else {
                println!("calendar already has entries");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_and_names() {
        assert_eq!(parse_day("0").unwrap(), 0);
        assert_eq!(parse_day("Wed").unwrap(), 2);
        assert_eq!(parse_day("sunday").unwrap(), 6);
        assert!(parse_day("7").is_err());
        assert!(parse_day("mo").is_err());
        assert!(parse_day("funday").is_err());
    }
}
