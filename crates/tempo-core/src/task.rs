//! Tasks and their step breakdowns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assistant::TaskAnalysis;
use crate::error::ValidationError;
use crate::reality_check::{self, RealityCheck, RealityFlag};
use crate::timer::Completion;

/// One checklist line: a task step or a checklist item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStep {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl TaskStep {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
            icon: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Work budget the session runs with.
    pub duration_minutes: u32,
    pub ai_estimated_minutes: u32,
    #[serde(default)]
    pub ai_feedback: String,
    #[serde(default)]
    pub steps: Vec<TaskStep>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_time: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reality_flag: Option<RealityFlag>,
}

impl Task {
    /// Build a task from the assistant's analysis and the reality check.
    pub fn new(title: &str, analysis: &TaskAnalysis, check: &RealityCheck) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::Empty("task title".into()));
        }
        let id = uuid::Uuid::new_v4().to_string();
        let steps = analysis
            .steps
            .iter()
            .enumerate()
            .map(|(i, text)| TaskStep::new(format!("{id}-{i}"), text.clone()))
            .collect();
        Ok(Self {
            id,
            title: title.to_string(),
            duration_minutes: check.final_minutes,
            ai_estimated_minutes: analysis.estimated_minutes,
            ai_feedback: analysis.feedback.clone(),
            steps,
            completed: false,
            on_time: None,
            completed_at: None,
            reality_flag: check.flag,
        })
    }

    /// Starting this task should reopen the assistant: the user planned
    /// far less time than the estimate and there is feedback to show.
    pub fn needs_reality_nudge(&self) -> bool {
        !self.ai_feedback.trim().is_empty()
            && reality_check::classify(self.duration_minutes as i64, self.ai_estimated_minutes)
                == Some(RealityFlag::TooFast)
    }

    pub fn toggle_step(&mut self, step_id: &str) -> Result<bool, ValidationError> {
        let step = self
            .steps
            .iter_mut()
            .find(|s| s.id == step_id)
            .ok_or_else(|| ValidationError::NotFound {
                kind: "step",
                id: step_id.to_string(),
            })?;
        step.completed = !step.completed;
        Ok(step.completed)
    }

    pub(crate) fn mark_completed(&mut self, completion: &Completion, at: DateTime<Utc>) {
        self.completed = true;
        self.on_time = Some(completion.on_time);
        self.completed_at = Some(at);
    }
}

/// All tasks, pending and completed, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.completed)
    }

    pub fn completed(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.completed)
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Look up by full id or unique id prefix.
    pub fn get(&self, id: &str) -> Result<&Task, ValidationError> {
        let idx = self.position(id)?;
        Ok(&self.tasks[idx])
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut Task, ValidationError> {
        let idx = self.position(id)?;
        Ok(&mut self.tasks[idx])
    }

    pub fn remove(&mut self, id: &str) -> Result<Task, ValidationError> {
        let idx = self.position(id)?;
        Ok(self.tasks.remove(idx))
    }

    fn position(&self, id: &str) -> Result<usize, ValidationError> {
        let not_found = || ValidationError::NotFound {
            kind: "task",
            id: id.to_string(),
        };
        if id.is_empty() {
            return Err(not_found());
        }
        if let Some(i) = self.tasks.iter().position(|t| t.id == id) {
            return Ok(i);
        }
        let mut matches = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.id.starts_with(id));
        match (matches.next(), matches.next()) {
            (Some((i, _)), None) => Ok(i),
            (Some(_), Some(_)) => Err(ValidationError::InvalidValue {
                field: "task id".into(),
                message: format!("'{id}' matches more than one task"),
            }),
            _ => Err(not_found()),
        }
    }
}
