use serde::{Deserialize, Serialize};

use super::ChatModel;
use crate::i18n;
use crate::profile::{Language, Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    /// Sent to the model but not shown in the transcript.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            hidden: false,
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            hidden: false,
        }
    }
}

/// Persona instructions for the chat assistant.
pub fn system_instruction(profile: Profile, lang: Language) -> String {
    let persona = match profile {
        Profile::Child => {
            "You are a fun companion called TEMPO helping a child with ADHD. \
             Use emojis, short sentences and lots of encouragement. \
             If there is an active task, help them concentrate on it."
        }
        Profile::Teen => {
            "You are a cool mentor called TEMPO for a teenager with ADHD. \
             Be direct and avoid sounding like a parent. \
             Share productivity tricks such as body doubling and pomodoro."
        }
        Profile::Adult => {
            "You are an executive assistant who is an expert in ADHD. \
             Offer clear strategies such as time blocking and prioritisation. \
             Be empathetic but focused on results."
        }
    };
    format!("{persona} Language: {}.", lang.code())
}

/// Hidden context line sent when a task starts.
pub fn task_context_line(title: &str, minutes: u32) -> String {
    format!(
        "[SYSTEM UPDATE: The user has started a new task: \"{title}\". \
         Duration: {minutes} min. Help them stay focused on this.]"
    )
}

/// One chat thread with the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    profile: Profile,
    lang: Language,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(profile: Profile, lang: Language) -> Self {
        Self {
            profile,
            lang,
            messages: Vec::new(),
        }
    }

    /// A thread whose first turn is an assistant message, e.g. a reality
    /// check warning.
    pub fn opened_with(profile: Profile, lang: Language, opener: impl Into<String>) -> Self {
        let mut conv = Self::new(profile, lang);
        conv.messages.push(ChatMessage::model(opener));
        conv
    }

    pub fn system(&self) -> String {
        system_instruction(self.profile, self.lang)
    }

    /// Every message including hidden context.
    pub fn history(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// What the user sees.
    pub fn transcript(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| !m.hidden)
    }

    /// Tell the assistant about the task that just started.
    pub fn set_active_task(&mut self, title: &str, minutes: u32) {
        self.messages.push(ChatMessage {
            role: Role::User,
            text: task_context_line(title, minutes),
            hidden: true,
        });
    }

    /// Send a user message and append the reply. A failed or empty reply is
    /// replaced with the localized fallback line.
    pub async fn send<M: ChatModel>(&mut self, model: &M, text: &str) -> &ChatMessage {
        self.messages.push(ChatMessage::user(text.trim()));
        let system = self.system();
        let reply = match model.reply(&system, &self.messages).await {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => i18n::phrases(self.lang).chat_fallback.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "chat reply failed, using fallback");
                i18n::phrases(self.lang).chat_fallback.to_string()
            }
        };
        let idx = self.messages.len();
        self.messages.push(ChatMessage::model(reply));
        &self.messages[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EstimateError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<usize>>,
        fail: bool,
    }

    impl ChatModel for Recorder {
        async fn reply(&self, system: &str, history: &[ChatMessage]) -> Result<String, EstimateError> {
            assert!(system.contains("TEMPO") || system.contains("executive"));
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(history.len());
            }
            if self.fail {
                return Err(EstimateError::Malformed("boom".into()));
            }
            Ok(format!("echo: {}", history.last().map(|m| m.text.as_str()).unwrap_or("")))
        }
    }

    #[tokio::test]
    async fn send_appends_reply() {
        let model = Recorder::default();
        let mut conv = Conversation::new(Profile::Teen, Language::English);
        let reply = conv.send(&model, " hi ").await.text.clone();
        assert_eq!(reply, "echo: hi");
        assert_eq!(conv.transcript().count(), 2);
    }

    #[tokio::test]
    async fn failure_uses_localized_fallback() {
        let model = Recorder {
            fail: true,
            ..Default::default()
        };
        let mut conv = Conversation::new(Profile::Child, Language::Spanish);
        let reply = conv.send(&model, "hola").await;
        assert_eq!(reply.role, Role::Model);
        assert_eq!(reply.text, i18n::phrases(Language::Spanish).chat_fallback);
    }

    #[tokio::test]
    async fn task_context_is_sent_but_hidden() {
        let model = Recorder::default();
        let mut conv = Conversation::opened_with(Profile::Adult, Language::English, "That seems quick.");
        conv.set_active_task("Taxes", 25);
        conv.send(&model, "ok").await;

        assert_eq!(conv.history().len(), 4);
        assert_eq!(conv.transcript().count(), 3);
        assert!(conv.history()[1].text.contains("\"Taxes\". Duration: 25 min."));
        assert_eq!(model.seen.lock().unwrap().as_slice(), &[3]);
    }

    #[test]
    fn instruction_names_language() {
        assert!(system_instruction(Profile::Teen, Language::Catalan).ends_with("Language: ca."));
    }
}
