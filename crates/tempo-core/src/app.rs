//! Application state: everything the user owns, plus the single active
//! session slot.
//!
//! Every mutation that touches persisted state writes the snapshot (and
//! the task list) back before returning. Each mutation also appends an
//! [`Event`] to a journal the front-end drains.

use chrono::{DateTime, Utc};

use crate::assistant::{self, Conversation, Estimator};
use crate::audio::AlarmKind;
use crate::calendar::{CalendarEntry, WeeklyCalendar, DEFAULT_FROM_TASK_TIME, DEFAULT_NEW_ENTRY_TIME};
use crate::checklist::Checklists;
use crate::error::{Result, SessionError, ValidationError};
use crate::events::Event;
use crate::ledger::{Celebration, Ledger, Reward};
use crate::profile::{Language, Profile, VoiceChoice};
use crate::reality_check::{self, RealityCheck};
use crate::shop::{ShopItem, Wardrobe};
use crate::storage::{ProfileConfig, Snapshot, SnapshotStore};
use crate::task::{Task, TaskList, TaskStep};
use crate::timer::{Completion, Session};

/// The task currently being timed. The session itself lives with whoever
/// drives it; the slot only records that one is out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub task_id: String,
    pub started_at: DateTime<Utc>,
}

/// Result of [`App::add_task`].
#[derive(Debug, Clone)]
pub struct AddedTask {
    pub task: Task,
    pub check: RealityCheck,
    /// Opened when the user's estimate was far off.
    pub conversation: Option<Conversation>,
}

/// Result of [`App::start_task`].
#[derive(Debug, Clone)]
pub struct StartedTask {
    pub task: Task,
    pub session: Session,
    /// Reopened when the planned time is far below the estimate.
    pub conversation: Option<Conversation>,
}

/// Result of [`App::complete_active`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub task_id: String,
    pub completion: Completion,
    pub reward: Reward,
}

pub struct App {
    store: SnapshotStore,
    prefs: ProfileConfig,
    alarm: AlarmKind,
    ledger: Ledger,
    wardrobe: Wardrobe,
    calendar: WeeklyCalendar,
    checklists: Checklists,
    tasks: TaskList,
    active: Option<ActiveSession>,
    events: Vec<Event>,
}

impl App {
    /// Load persisted state. Unreadable state falls back to defaults.
    pub fn load(store: SnapshotStore, prefs: ProfileConfig, alarm: AlarmKind) -> Self {
        let snapshot = store.load();
        let tasks = store.load_tasks();
        Self {
            store,
            prefs,
            alarm,
            ledger: Ledger::new(snapshot.coins),
            wardrobe: Wardrobe {
                owned: snapshot.owned_items,
                active_accessory: snapshot.active_accessory,
                active_house: snapshot.active_house,
            },
            calendar: snapshot.weekly_tasks,
            checklists: snapshot.custom_checklists,
            tasks,
            active: None,
            events: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn profile(&self) -> Profile {
        self.prefs.profile
    }

    pub fn language(&self) -> Language {
        self.prefs.language
    }

    pub fn voice(&self) -> VoiceChoice {
        self.prefs.voice
    }

    pub fn prefs(&self) -> &ProfileConfig {
        &self.prefs
    }

    pub fn alarm(&self) -> AlarmKind {
        self.alarm
    }

    pub fn balance(&self) -> u32 {
        self.ledger.balance()
    }

    pub fn celebration(&self, now: DateTime<Utc>) -> Option<Celebration> {
        self.ledger.celebration(now)
    }

    pub fn wardrobe(&self) -> &Wardrobe {
        &self.wardrobe
    }

    pub fn calendar(&self) -> &WeeklyCalendar {
        &self.calendar
    }

    pub fn checklists(&self) -> &Checklists {
        &self.checklists
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_with(&self.ledger)
    }

    fn snapshot_with(&self, ledger: &Ledger) -> Snapshot {
        Snapshot {
            coins: ledger.balance(),
            owned_items: self.wardrobe.owned.clone(),
            weekly_tasks: self.calendar.clone(),
            custom_checklists: self.checklists.clone(),
            active_accessory: self.wardrobe.active_accessory.clone(),
            active_house: self.wardrobe.active_house.clone(),
        }
    }

    /// Events recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Profile ──────────────────────────────────────────────────────

    /// Switch profile. Seeds the calendar with the profile's routines when
    /// it is empty and returns whether it did.
    pub fn select_profile(&mut self, profile: Profile) -> Result<bool> {
        self.prefs.profile = profile;
        let seeded = self.calendar.seed_if_empty(profile, self.prefs.language);
        if seeded {
            self.persist()?;
        }
        tracing::info!(%profile, seeded, "profile selected");
        self.events.push(Event::ProfileSelected {
            profile,
            calendar_seeded: seeded,
            at: Utc::now(),
        });
        Ok(seeded)
    }

    /// Change language and retitle built-in routine entries.
    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.prefs.language = language;
        self.calendar.relabel(language);
        self.persist()?;
        self.events.push(Event::LanguageChanged {
            language,
            at: Utc::now(),
        });
        Ok(())
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// Analyze a new task, run the reality check and store it.
    ///
    /// `declared` is the user's own estimate in minutes, if any. The task
    /// is always created; a flagged estimate only opens a conversation.
    pub async fn add_task<E: Estimator>(
        &mut self,
        estimator: &E,
        title: &str,
        declared: Option<i64>,
    ) -> Result<AddedTask> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::Empty("task title".into()).into());
        }
        let (profile, lang) = (self.prefs.profile, self.prefs.language);

        let analysis = assistant::analyze_or_fallback(estimator, profile, title, lang).await;
        let check = reality_check::reality_check(declared, &analysis, lang);
        let task = Task::new(title, &analysis, &check)?;
        let conversation = check
            .message
            .as_ref()
            .map(|msg| Conversation::opened_with(profile, lang, msg.clone()));

        tracing::info!(
            task_id = %task.id,
            minutes = task.duration_minutes,
            ai_minutes = task.ai_estimated_minutes,
            flag = ?check.flag,
            "task added"
        );
        self.tasks.push(task.clone());
        self.persist_tasks()?;
        self.events.push(Event::TaskAdded {
            task_id: task.id.clone(),
            title: task.title.clone(),
            duration_minutes: task.duration_minutes,
            ai_estimated_minutes: task.ai_estimated_minutes,
            reality_flag: task.reality_flag,
            at: Utc::now(),
        });

        Ok(AddedTask {
            task,
            check,
            conversation,
        })
    }

    /// Take the session slot for a task and hand back an idle session with
    /// the task's work budget.
    pub fn start_task(&mut self, task_id: &str) -> Result<StartedTask> {
        if let Some(active) = &self.active {
            let title = self
                .tasks
                .get(&active.task_id)
                .map(|t| t.title.clone())
                .unwrap_or_else(|_| active.task_id.clone());
            return Err(SessionError::AlreadyActive(title).into());
        }
        let task = self.tasks.get(task_id)?.clone();
        if task.completed {
            return Err(SessionError::TaskCompleted(task.title).into());
        }

        let session = Session::new(task.duration_minutes, self.alarm);
        let conversation = task.needs_reality_nudge().then(|| {
            let mut conv = Conversation::opened_with(self.prefs.profile, self.prefs.language, task.ai_feedback.clone());
            conv.set_active_task(&task.title, task.duration_minutes);
            conv
        });

        let now = Utc::now();
        self.active = Some(ActiveSession {
            task_id: task.id.clone(),
            started_at: now,
        });
        tracing::info!(task_id = %task.id, work_secs = session.initial_work_secs(), "session started");
        self.events.push(Event::SessionStarted {
            task_id: task.id.clone(),
            work_secs: session.initial_work_secs(),
            at: now,
        });

        Ok(StartedTask {
            task,
            session,
            conversation,
        })
    }

    /// Book a finished session: mark the task, credit the reward, free the
    /// slot.
    ///
    /// Nothing changes unless the new state is saved: on a storage error
    /// the session stays active and the balance and task are untouched.
    pub fn complete_active(&mut self, completion: &Completion, now: DateTime<Utc>) -> Result<TaskOutcome> {
        let active = self.active.clone().ok_or(SessionError::NoActiveSession)?;

        let mut ledger = self.ledger.clone();
        let reward = ledger.record_completion(completion, now);
        let mut tasks = self.tasks.clone();
        match tasks.get_mut(&active.task_id) {
            Ok(task) => task.mark_completed(completion, now),
            Err(e) => tracing::warn!(task_id = %active.task_id, error = %e, "completed task vanished"),
        }
        if let Err(e) = self.store.save_all(&self.snapshot_with(&ledger), &tasks) {
            tracing::error!(task_id = %active.task_id, error = %e, "could not save completed session");
            return Err(e);
        }

        self.ledger = ledger;
        self.tasks = tasks;
        self.active = None;

        self.events.push(Event::SessionCompleted {
            task_id: active.task_id.clone(),
            on_time: completion.on_time,
            manual: completion.manual,
            reward: reward.amount,
            balance: reward.balance,
            at: now,
        });
        if let Some(celebration) = reward.celebration {
            self.events.push(Event::CelebrationStarted {
                task_id: active.task_id.clone(),
                ends_at: celebration.ends_at,
            });
        }
        Ok(TaskOutcome {
            task_id: active.task_id,
            completion: *completion,
            reward,
        })
    }

    /// User closed the celebration. Returns true when one was showing.
    pub fn dismiss_celebration(&mut self) -> bool {
        let dismissed = self.ledger.dismiss_celebration();
        if dismissed {
            self.events.push(Event::CelebrationEnded {
                dismissed: true,
                at: Utc::now(),
            });
        }
        dismissed
    }

    /// Drop a celebration whose time is up.
    pub fn expire_celebration(&mut self, now: DateTime<Utc>) -> bool {
        let expired = self.ledger.expire_celebration(now);
        if expired {
            self.events.push(Event::CelebrationEnded {
                dismissed: false,
                at: now,
            });
        }
        expired
    }

    pub fn delete_task(&mut self, task_id: &str) -> Result<Task> {
        let id = self.tasks.get(task_id)?.id.clone();
        if self.active.as_ref().is_some_and(|a| a.task_id == id) {
            return Err(SessionError::AlreadyActive(id).into());
        }
        let task = self.tasks.remove(&id)?;
        self.persist_tasks()?;
        self.events.push(Event::TaskDeleted {
            task_id: task.id.clone(),
            at: Utc::now(),
        });
        Ok(task)
    }

    pub fn toggle_step(&mut self, task_id: &str, step_id: &str) -> Result<bool> {
        let done = self.tasks.get_mut(task_id)?.toggle_step(step_id)?;
        self.persist_tasks()?;
        Ok(done)
    }

    // ── Shop ─────────────────────────────────────────────────────────

    pub fn purchase(&mut self, item_id: &str) -> Result<&'static ShopItem> {
        let item = self.wardrobe.purchase(&mut self.ledger, item_id)?;
        self.persist()?;
        self.events.push(Event::ItemPurchased {
            item_id: item.id.to_string(),
            cost: item.cost,
            balance: self.ledger.balance(),
            at: Utc::now(),
        });
        Ok(item)
    }

    pub fn equip(&mut self, item_id: &str) -> Result<&'static ShopItem> {
        let item = self.wardrobe.equip(item_id)?;
        self.persist()?;
        Ok(item)
    }

    // ── Calendar ─────────────────────────────────────────────────────

    /// Seed the current profile's routines into an empty calendar.
    pub fn seed_calendar(&mut self) -> Result<bool> {
        let seeded = self.calendar.seed_if_empty(self.prefs.profile, self.prefs.language);
        if seeded {
            self.persist()?;
        }
        Ok(seeded)
    }

    pub fn add_calendar_entry(
        &mut self,
        day: u8,
        time: Option<&str>,
        title: &str,
        duration: Option<u32>,
    ) -> Result<CalendarEntry> {
        let entry = self
            .calendar
            .add(day, time.unwrap_or(DEFAULT_NEW_ENTRY_TIME), title, duration)?
            .clone();
        self.persist()?;
        Ok(entry)
    }

    /// Put a task on the weekly calendar at the default task time.
    pub fn schedule_task(&mut self, task_id: &str, day: u8) -> Result<CalendarEntry> {
        let task = self.tasks.get(task_id)?;
        let (title, minutes) = (task.title.clone(), task.duration_minutes);
        self.add_calendar_entry(day, Some(DEFAULT_FROM_TASK_TIME), &title, Some(minutes))
    }

    pub fn remove_calendar_entry(&mut self, id: &str) -> Result<CalendarEntry> {
        let entry = self.calendar.remove(id)?;
        self.persist()?;
        Ok(entry)
    }

    // ── Checklists ───────────────────────────────────────────────────

    pub fn add_checklist_item(&mut self, key: &str, text: &str) -> Result<TaskStep> {
        let item = self.checklists.add_item(key, text)?.clone();
        self.persist()?;
        Ok(item)
    }

    pub fn rename_checklist_item(&mut self, key: &str, item_id: &str, text: &str) -> Result<()> {
        self.checklists.rename_item(key, item_id, text)?;
        self.persist()
    }

    pub fn remove_checklist_item(&mut self, key: &str, item_id: &str) -> Result<TaskStep> {
        let item = self.checklists.remove_item(key, item_id)?;
        self.persist()?;
        Ok(item)
    }

    pub fn toggle_checklist_item(&mut self, key: &str, item_id: &str) -> Result<bool> {
        let done = self.checklists.toggle_item(key, item_id)?;
        self.persist()?;
        Ok(done)
    }

    pub fn reset_checklist(&mut self, key: &str) -> Result<()> {
        self.checklists.reset(key)?;
        self.persist()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn persist(&self) -> Result<()> {
        self.store.save(&self.snapshot())
    }

    fn persist_tasks(&self) -> Result<()> {
        self.store.save_tasks(&self.tasks)
    }
}
