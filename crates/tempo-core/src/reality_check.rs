//! Reality check: compare the user's own duration estimate with the
//! assistant's and flag large mismatches.
//!
//! A flag only opens the assistant conversation. It never blocks the task
//! from being created or started.

use serde::{Deserialize, Serialize};

use crate::assistant::TaskAnalysis;
use crate::i18n;
use crate::profile::Language;

/// Below this fraction of the estimate the user is underestimating.
pub const TOO_FAST_RATIO: f64 = 0.5;
/// Above this multiple of the estimate the user is overestimating.
pub const TOO_SLOW_RATIO: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RealityFlag {
    TooFast,
    TooSlow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealityCheck {
    /// Work budget, in minutes, for the session.
    pub final_minutes: u32,
    pub flag: Option<RealityFlag>,
    /// Assistant text to open the conversation with, when flagged.
    pub message: Option<String>,
}

impl RealityCheck {
    pub fn is_flagged(&self) -> bool {
        self.flag.is_some()
    }
}

/// Decide the session length and whether to warn the user.
///
/// `user_declared` is taken as given when positive; absent or non-positive
/// values defer to the assistant's estimate without a warning.
pub fn reality_check(
    user_declared: Option<i64>,
    analysis: &TaskAnalysis,
    lang: Language,
) -> RealityCheck {
    let ai = analysis.estimated_minutes;
    let Some(user) = user_declared.filter(|m| *m > 0) else {
        return RealityCheck {
            final_minutes: ai,
            flag: None,
            message: None,
        };
    };

    let final_minutes = u32::try_from(user).unwrap_or(u32::MAX);
    let phrases = i18n::phrases(lang);
    let (flag, message) = match classify(user, ai) {
        Some(RealityFlag::TooFast) => {
            let mut text = format!("{} ({ai} min).", phrases.reality_too_fast);
            if !analysis.feedback.trim().is_empty() {
                text.push(' ');
                text.push_str(analysis.feedback.trim());
            }
            (Some(RealityFlag::TooFast), Some(text))
        }
        Some(RealityFlag::TooSlow) => (
            Some(RealityFlag::TooSlow),
            Some(format!("{} ({ai} min).", phrases.reality_too_slow)),
        ),
        None => (None, None),
    };

    RealityCheck {
        final_minutes,
        flag,
        message,
    }
}

/// Compare a positive user estimate with the assistant's estimate.
pub fn classify(user_minutes: i64, ai_minutes: u32) -> Option<RealityFlag> {
    let user = user_minutes as f64;
    let ai = ai_minutes as f64;
    if user < ai * TOO_FAST_RATIO {
        Some(RealityFlag::TooFast)
    } else if user > ai * TOO_SLOW_RATIO {
        Some(RealityFlag::TooSlow)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(minutes: u32) -> TaskAnalysis {
        TaskAnalysis {
            steps: vec!["Open the book".into()],
            estimated_minutes: minutes,
            feedback: "This usually takes about 30 minutes.".into(),
        }
    }

    #[test]
    fn thresholds_against_thirty_minutes() {
        let a = analysis(30);
        assert_eq!(
            reality_check(Some(10), &a, Language::English).flag,
            Some(RealityFlag::TooFast)
        );
        assert_eq!(
            reality_check(Some(70), &a, Language::English).flag,
            Some(RealityFlag::TooSlow)
        );
        assert_eq!(reality_check(Some(20), &a, Language::English).flag, None);
    }

    #[test]
    fn boundaries_are_not_flagged() {
        assert_eq!(classify(15, 30), None);
        assert_eq!(classify(60, 30), None);
        assert_eq!(classify(14, 30), Some(RealityFlag::TooFast));
        assert_eq!(classify(61, 30), Some(RealityFlag::TooSlow));
    }

    #[test]
    fn user_value_wins_even_when_flagged() {
        let check = reality_check(Some(10), &analysis(30), Language::English);
        assert_eq!(check.final_minutes, 10);
        assert!(check.is_flagged());
    }

    #[test]
    fn missing_or_non_positive_defers_to_estimate() {
        for user in [None, Some(0), Some(-5)] {
            let check = reality_check(user, &analysis(30), Language::English);
            assert_eq!(check.final_minutes, 30);
            assert_eq!(check.flag, None);
            assert_eq!(check.message, None);
        }
    }

    #[test]
    fn too_fast_message_includes_feedback() {
        let msg = reality_check(Some(5), &analysis(30), Language::English)
            .message
            .unwrap();
        assert!(msg.contains("(30 min)."));
        assert!(msg.ends_with("This usually takes about 30 minutes."));
    }

    #[test]
    fn too_slow_message_is_templated() {
        let msg = reality_check(Some(90), &analysis(30), Language::Spanish)
            .message
            .unwrap();
        assert_eq!(msg, format!("{} (30 min).", i18n::phrases(Language::Spanish).reality_too_slow));
    }
}
