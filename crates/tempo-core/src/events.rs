use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audio::SpeechCue;
use crate::profile::{Language, Profile};
use crate::reality_check::RealityFlag;
use crate::timer::Effect;

/// Every state change in the app produces an Event.
/// The CLI prints them with `--json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskAdded {
        task_id: String,
        title: String,
        duration_minutes: u32,
        ai_estimated_minutes: u32,
        reality_flag: Option<RealityFlag>,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        task_id: String,
        at: DateTime<Utc>,
    },
    SessionStarted {
        task_id: String,
        work_secs: u32,
        at: DateTime<Utc>,
    },
    SessionPaused {
        task_id: String,
        work_secs_remaining: u32,
        at: DateTime<Utc>,
    },
    SessionResumed {
        task_id: String,
        work_secs_remaining: u32,
        at: DateTime<Utc>,
    },
    BreakStarted {
        task_id: String,
        at: DateTime<Utc>,
    },
    BreakEnded {
        task_id: String,
        at: DateTime<Utc>,
    },
    /// Five minutes of work budget left.
    ReminderSpoken {
        task_id: String,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        task_id: String,
        on_time: bool,
        manual: bool,
        reward: u32,
        balance: u32,
        at: DateTime<Utc>,
    },
    /// On-time completion; the celebration shows until `ends_at`.
    CelebrationStarted {
        task_id: String,
        ends_at: DateTime<Utc>,
    },
    CelebrationEnded {
        /// Closed by the user rather than timed out.
        dismissed: bool,
        at: DateTime<Utc>,
    },
    ItemPurchased {
        item_id: String,
        cost: u32,
        balance: u32,
        at: DateTime<Utc>,
    },
    ProfileSelected {
        profile: Profile,
        calendar_seeded: bool,
        at: DateTime<Utc>,
    },
    LanguageChanged {
        language: Language,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The event a session effect corresponds to, if any. Completion is
    /// reported by the app once the reward is booked.
    pub fn from_effect(task_id: &str, effect: &Effect, at: DateTime<Utc>) -> Option<Self> {
        let task_id = task_id.to_string();
        match effect {
            Effect::Speak(SpeechCue::BreakStart) => Some(Event::BreakStarted { task_id, at }),
            Effect::Speak(SpeechCue::BreakEnd) => Some(Event::BreakEnded { task_id, at }),
            Effect::Speak(SpeechCue::FiveMinutesLeft) => Some(Event::ReminderSpoken { task_id, at }),
            Effect::Alarm(_) | Effect::StopAudio | Effect::Completed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AlarmKind;

    #[test]
    fn serializes_with_type_tag() {
        let ev = Event::TaskDeleted {
            task_id: "t1".into(),
            at: Utc::now(),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "TaskDeleted");
        assert_eq!(json["task_id"], "t1");
    }

    #[test]
    fn effects_map_to_session_events() {
        let now = Utc::now();
        assert!(matches!(
            Event::from_effect("t", &Effect::Speak(SpeechCue::BreakStart), now),
            Some(Event::BreakStarted { .. })
        ));
        assert!(matches!(
            Event::from_effect("t", &Effect::Speak(SpeechCue::FiveMinutesLeft), now),
            Some(Event::ReminderSpoken { .. })
        ));
        assert_eq!(Event::from_effect("t", &Effect::Alarm(AlarmKind::Siren), now), None);
        assert_eq!(Event::from_effect("t", &Effect::StopAudio, now), None);
    }
}
