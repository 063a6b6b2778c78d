//! AI assistant: task breakdown and estimation, chat, rewards.
//!
//! The remote service is optional. Every entry point here has a local
//! fallback, so callers never see an [`EstimateError`]; failures are logged
//! at `warn` and replaced.

mod conversation;
mod gemini;

use std::future::Future;

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::EstimateError;
use crate::profile::{Language, Profile};

pub use conversation::{system_instruction, task_context_line, ChatMessage, Conversation, Role};
pub use gemini::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Most steps kept from a breakdown.
pub const MAX_STEPS: usize = 6;
/// Used when the service gives no usable estimate.
pub const FALLBACK_MINUTES: u32 = 15;
pub const FALLBACK_STEP: &str = "Start task";
pub const FALLBACK_FEEDBACK: &str = "Could not estimate time.";
pub const FALLBACK_PHRASE: &str = "You did it!";

/// Steps and a duration estimate for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAnalysis {
    pub steps: Vec<String>,
    pub estimated_minutes: u32,
    #[serde(default)]
    pub feedback: String,
}

impl TaskAnalysis {
    pub fn fallback() -> Self {
        Self {
            steps: vec![FALLBACK_STEP.to_string()],
            estimated_minutes: FALLBACK_MINUTES,
            feedback: FALLBACK_FEEDBACK.to_string(),
        }
    }

    /// Cap the step list and replace a zero estimate.
    fn normalized(mut self) -> Self {
        self.steps.retain(|s| !s.trim().is_empty());
        self.steps.truncate(MAX_STEPS);
        if self.estimated_minutes == 0 {
            self.estimated_minutes = FALLBACK_MINUTES;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSuggestion {
    pub text: String,
    pub icon: String,
}

impl RewardSuggestion {
    fn new(text: &str, icon: &str) -> Self {
        Self {
            text: text.to_string(),
            icon: icon.to_string(),
        }
    }

    pub fn fallback() -> Vec<Self> {
        vec![
            Self::new("Drink water", "💧"),
            Self::new("Eat an apple", "🍎"),
            Self::new("Stretch", "🧘"),
        ]
    }
}

/// Breaks a task into steps and estimates how long it takes.
pub trait Estimator {
    fn analyze(
        &self,
        profile: Profile,
        title: &str,
        lang: Language,
    ) -> impl Future<Output = Result<TaskAnalysis, EstimateError>> + Send;
}

/// Produces the next assistant turn of a conversation.
pub trait ChatModel {
    /// `history` ends with the user's newest message.
    fn reply(
        &self,
        system: &str,
        history: &[ChatMessage],
    ) -> impl Future<Output = Result<String, EstimateError>> + Send;
}

/// Post-completion encouragement.
pub trait Encourager {
    fn suggest_rewards(
        &self,
        profile: Profile,
        title: &str,
        lang: Language,
        weekend: bool,
    ) -> impl Future<Output = Result<Vec<RewardSuggestion>, EstimateError>> + Send;

    fn positive_phrase(
        &self,
        profile: Profile,
        lang: Language,
    ) -> impl Future<Output = Result<String, EstimateError>> + Send;
}

/// Analyze a task, falling back to a single generic step and 15 minutes.
pub async fn analyze_or_fallback<E: Estimator>(
    estimator: &E,
    profile: Profile,
    title: &str,
    lang: Language,
) -> TaskAnalysis {
    match estimator.analyze(profile, title, lang).await {
        Ok(analysis) => analysis.normalized(),
        Err(e) => {
            tracing::warn!(error = %e, title, "task analysis failed, using fallback");
            TaskAnalysis::fallback()
        }
    }
}

/// Three healthy rewards. Screen rewards are only allowed on weekends.
pub async fn suggest_rewards<E: Encourager>(
    encourager: &E,
    profile: Profile,
    title: &str,
    lang: Language,
    today: impl Datelike,
) -> Vec<RewardSuggestion> {
    match encourager
        .suggest_rewards(profile, title, lang, is_weekend(today))
        .await
    {
        Ok(list) if !list.is_empty() => list,
        Ok(_) => RewardSuggestion::fallback(),
        Err(e) => {
            tracing::warn!(error = %e, "reward suggestions failed, using fallback");
            RewardSuggestion::fallback()
        }
    }
}

pub async fn positive_phrase<E: Encourager>(encourager: &E, profile: Profile, lang: Language) -> String {
    match encourager.positive_phrase(profile, lang).await {
        Ok(phrase) if !phrase.trim().is_empty() => phrase.trim().to_string(),
        Ok(_) => FALLBACK_PHRASE.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "positive phrase failed, using fallback");
            FALLBACK_PHRASE.to_string()
        }
    }
}

pub fn is_weekend(date: impl Datelike) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Canned(Option<TaskAnalysis>);

    impl Estimator for Canned {
        async fn analyze(
            &self,
            _profile: Profile,
            _title: &str,
            _lang: Language,
        ) -> Result<TaskAnalysis, EstimateError> {
            self.0
                .clone()
                .ok_or_else(|| EstimateError::Malformed("no candidates".into()))
        }
    }

    struct Silent;

    impl Encourager for Silent {
        async fn suggest_rewards(
            &self,
            _profile: Profile,
            _title: &str,
            _lang: Language,
            _weekend: bool,
        ) -> Result<Vec<RewardSuggestion>, EstimateError> {
            Ok(Vec::new())
        }

        async fn positive_phrase(&self, _profile: Profile, _lang: Language) -> Result<String, EstimateError> {
            Err(EstimateError::MissingApiKey("GEMINI_API_KEY".into()))
        }
    }

    #[tokio::test]
    async fn failure_falls_back() {
        let a = analyze_or_fallback(&Canned(None), Profile::Teen, "Essay", Language::English).await;
        assert_eq!(a, TaskAnalysis::fallback());
        assert_eq!(a.steps, vec!["Start task"]);
        assert_eq!(a.estimated_minutes, 15);
    }

    #[tokio::test]
    async fn zero_estimate_becomes_fifteen_and_steps_are_capped() {
        let raw = TaskAnalysis {
            steps: (1..=9).map(|i| format!("step {i}")).collect(),
            estimated_minutes: 0,
            feedback: String::new(),
        };
        let a = analyze_or_fallback(&Canned(Some(raw)), Profile::Adult, "Taxes", Language::English).await;
        assert_eq!(a.estimated_minutes, 15);
        assert_eq!(a.steps.len(), MAX_STEPS);
        assert_eq!(a.steps[5], "step 6");
    }

    #[tokio::test]
    async fn empty_or_failed_encouragement_falls_back() {
        let monday = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let rewards = suggest_rewards(&Silent, Profile::Child, "Homework", Language::English, monday).await;
        assert_eq!(rewards, RewardSuggestion::fallback());
        assert_eq!(positive_phrase(&Silent, Profile::Child, Language::English).await, "You did it!");
    }

    #[test]
    fn weekend_detection() {
        let saturday = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert!(is_weekend(saturday));
        assert!(!is_weekend(saturday.pred_opt().unwrap()));
    }
}
