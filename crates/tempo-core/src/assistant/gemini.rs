//! Gemini `generateContent` client.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use super::{ChatMessage, ChatModel, Encourager, Estimator, RewardSuggestion, Role, TaskAnalysis};
use crate::error::EstimateError;
use crate::profile::{Language, Profile};
use crate::storage::AssistantConfig;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// HTTP client for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    #[serde(default)]
    steps: Vec<RawStep>,
    #[serde(default)]
    estimated_minutes: Option<f64>,
    #[serde(default)]
    feedback: Option<String>,
}

#[derive(Deserialize)]
struct RawStep {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, EstimateError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            api_key_env: String::new(),
        })
    }

    /// Build from config, reading the key from the configured env var.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, EstimateError> {
        let key = std::env::var(&config.api_key_env).ok();
        let mut client = Self::new(
            &config.base_url,
            &config.model,
            key,
            Duration::from_secs(config.timeout_secs),
        )?;
        client.api_key_env = config.api_key_env.clone();
        Ok(client)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// One `generateContent` call. Returns the first candidate's text.
    async fn generate(
        &self,
        system: Option<&str>,
        contents: Value,
        schema: Option<Value>,
    ) -> Result<String, EstimateError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| EstimateError::MissingApiKey(self.api_key_env.clone()))?;

        let mut body = json!({ "contents": contents });
        if let Some(system) = system {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }
        if let Some(schema) = schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        tracing::debug!(model = %self.model, "calling assistant");
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EstimateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = resp.json().await?;
        value["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| EstimateError::Malformed("response has no candidate text".into()))
    }
}

fn user_turn(text: String) -> Value {
    json!([{ "role": "user", "parts": [{ "text": text }] }])
}

fn minutes_from(raw: Option<f64>) -> u32 {
    match raw {
        Some(m) if m.is_finite() && m >= 0.5 => m.round().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

impl Estimator for GeminiClient {
    async fn analyze(&self, profile: Profile, title: &str, lang: Language) -> Result<TaskAnalysis, EstimateError> {
        let lang = lang.code();
        let system = match profile {
            Profile::Child => format!(
                "You are a helpful teacher. Break down tasks for a child. Estimate time realistically. Language: {lang}."
            ),
            Profile::Teen => format!(
                "You are a productivity coach. Break down tasks for a teen. Estimate time. Language: {lang}."
            ),
            Profile::Adult => format!(
                "You are an executive assistant. Break down tasks for an ADHD adult. Estimate time. Language: {lang}."
            ),
        };
        let prompt = format!(
            "Analyze this task: \"{title}\" for a {profile}.\n\
             1. Break it down into small steps (max 6).\n\
             2. Estimate how many minutes it realistically takes for someone with ADHD.\n\
             3. Provide a short feedback sentence about the time (e.g. \"This usually takes about X minutes\").\n\
             Respond in JSON. Language: {lang}."
        );
        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "steps": {
                    "type": "ARRAY",
                    "items": { "type": "OBJECT", "properties": { "text": { "type": "STRING" } } }
                },
                "estimatedMinutes": { "type": "NUMBER" },
                "feedback": { "type": "STRING" }
            },
            "required": ["steps", "estimatedMinutes", "feedback"]
        });

        let text = self.generate(Some(&system), user_turn(prompt), Some(schema)).await?;
        let raw: RawAnalysis = serde_json::from_str(&text)?;
        Ok(TaskAnalysis {
            steps: raw.steps.into_iter().map(|s| s.text).collect(),
            estimated_minutes: minutes_from(raw.estimated_minutes),
            feedback: raw.feedback.unwrap_or_default(),
        })
    }
}

impl ChatModel for GeminiClient {
    async fn reply(&self, system: &str, history: &[ChatMessage]) -> Result<String, EstimateError> {
        let contents: Vec<Value> = history
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::User => "user",
                    Role::Model => "model",
                };
                json!({ "role": role, "parts": [{ "text": m.text }] })
            })
            .collect();
        self.generate(Some(system), Value::Array(contents), None).await
    }
}

impl Encourager for GeminiClient {
    async fn suggest_rewards(
        &self,
        profile: Profile,
        title: &str,
        lang: Language,
        weekend: bool,
    ) -> Result<Vec<RewardSuggestion>, EstimateError> {
        let lang = lang.code();
        let screens = if weekend {
            "You MAY suggest screen-related rewards (video games, TV, etc.)."
        } else {
            "CRITICAL: Do NOT suggest any screen-related rewards (video games, phone, TV, YouTube). \
             Today is a weekday. Suggest physical or social activities instead."
        };
        let health = "MANDATORY: All suggested rewards must be HEALTHY and beneficial for well-being \
                      (e.g., healthy snack, walk outside, deep breathing, hydration, stretching).";
        let persona = match profile {
            Profile::Child => "You are a fun, encouraging companion for a child with ADHD. Suggest simple, immediate rewards",
            Profile::Teen => "You are a cool mentor for a teenager with ADHD. Suggest rewards",
            Profile::Adult => "You are a professional productivity coach for adults with ADHD. Suggest rewards",
        };
        let system = format!("{persona} in the language: {lang}. {screens} {health}");
        let prompt = format!(
            "The user just finished the task: \"{title}\". Suggest 3 rewards appropriate for someone \
             in the {profile} profile. Respond in the language associated with code: {lang}."
        );
        let schema = json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "text": { "type": "STRING" },
                    "icon": { "type": "STRING", "description": "A single emoji representing the reward" }
                },
                "required": ["text", "icon"]
            }
        });
        let text = self.generate(Some(&system), user_turn(prompt), Some(schema)).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn positive_phrase(&self, profile: Profile, lang: Language) -> Result<String, EstimateError> {
        let prompt = format!(
            "Generate one short, very punchy positive reinforcement phrase for an ADHD {profile} who just \
             finished a task. Language: {}. Do not use quotes. Max 6 words.",
            lang.code()
        );
        self.generate(None, user_turn(prompt), None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::analyze_or_fallback;
    use mockito::Matcher;

    const PATH: &str = "/v1beta/models/gemini-3-flash-preview:generateContent";

    fn candidate(text: &str) -> String {
        json!({ "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }] }).to_string()
    }

    fn client(url: String) -> GeminiClient {
        GeminiClient::new(url, DEFAULT_MODEL, Some("test-key".into()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn analyze_parses_schema_response() {
        let mut server = mockito::Server::new_async().await;
        let inner = r#"{"steps":[{"text":"Open the book"},{"text":"Read chapter 1"}],"estimatedMinutes":24.6,"feedback":"About 25 minutes."}"#;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(candidate(inner))
            .create_async()
            .await;

        let a = client(server.url())
            .analyze(Profile::Teen, "Read chapter", Language::English)
            .await
            .unwrap();
        assert_eq!(a.steps, vec!["Open the book", "Read chapter 1"]);
        assert_eq!(a.estimated_minutes, 25);
        assert_eq!(a.feedback, "About 25 minutes.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_falls_back() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let c = client(server.url());
        let err = c.analyze(Profile::Child, "Tidy room", Language::Spanish).await.unwrap_err();
        assert!(matches!(err, EstimateError::Status { status: 503, .. }));

        let a = analyze_or_fallback(&c, Profile::Child, "Tidy room", Language::Spanish).await;
        assert_eq!(a, TaskAnalysis::fallback());
    }

    #[tokio::test]
    async fn missing_estimate_is_zero_before_normalizing() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(candidate(r#"{"steps":[],"feedback":""}"#))
            .create_async()
            .await;

        let c = client(server.url());
        assert_eq!(c.analyze(Profile::Adult, "x", Language::English).await.unwrap().estimated_minutes, 0);
        let a = analyze_or_fallback(&c, Profile::Adult, "x", Language::English).await;
        assert_eq!(a.estimated_minutes, 15);
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let err = client(server.url())
            .positive_phrase(Profile::Teen, Language::English)
            .await
            .unwrap_err();
        assert!(matches!(err, EstimateError::Malformed(_)));
    }

    #[tokio::test]
    async fn chat_sends_history_with_roles() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_body(Matcher::PartialJson(json!({
                "contents": [
                    { "role": "model", "parts": [{ "text": "Hi!" }] },
                    { "role": "user", "parts": [{ "text": "help" }] }
                ]
            })))
            .with_status(200)
            .with_body(candidate("Try a 10 minute sprint."))
            .create_async()
            .await;

        let history = vec![ChatMessage::model("Hi!"), ChatMessage::user("help")];
        let reply = client(server.url()).reply("system", &history).await.unwrap();
        assert_eq!(reply, "Try a 10 minute sprint.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rewards_parse_array() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .match_body(Matcher::Regex("Do NOT suggest any screen-related rewards".into()))
            .with_status(200)
            .with_body(candidate(r#"[{"text":"Walk outside","icon":"🌳"}]"#))
            .create_async()
            .await;

        let rewards = client(server.url())
            .suggest_rewards(Profile::Child, "Homework", Language::English, false)
            .await
            .unwrap();
        assert_eq!(rewards[0].text, "Walk outside");
    }

    #[tokio::test]
    async fn no_key_skips_the_network() {
        let c = GeminiClient::new("http://127.0.0.1:9", DEFAULT_MODEL, None, Duration::from_secs(1)).unwrap();
        assert!(!c.has_api_key());
        let err = c.positive_phrase(Profile::Adult, Language::English).await.unwrap_err();
        assert!(matches!(err, EstimateError::MissingApiKey(_)));
    }
}
