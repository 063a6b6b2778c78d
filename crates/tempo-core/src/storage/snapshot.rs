//! Persisted app state.
//!
//! Two JSON blobs in the kv table: the snapshot (coins, owned items,
//! calendar, checklists) and the task list. Reads never fail: a missing or
//! unreadable blob yields defaults and a warning.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::Database;
use crate::calendar::WeeklyCalendar;
use crate::checklist::Checklists;
use crate::error::CoreError;
use crate::ledger::STARTING_COINS;
use crate::task::TaskList;

pub const SNAPSHOT_KEY: &str = "tempo_valles_data_v2";
pub const TASKS_KEY: &str = "tempo_tasks_v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub coins: u32,
    pub owned_items: Vec<String>,
    pub weekly_tasks: WeeklyCalendar,
    pub custom_checklists: Checklists,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_accessory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_house: Option<String>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            coins: STARTING_COINS,
            owned_items: Vec::new(),
            weekly_tasks: WeeklyCalendar::default(),
            custom_checklists: Checklists::default(),
            active_accessory: None,
            active_house: None,
        }
    }
}

pub struct SnapshotStore {
    db: Database,
}

impl SnapshotStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Store in the default data directory.
    pub fn open() -> Result<Self, CoreError> {
        Ok(Self::new(Database::open()?))
    }

    pub fn load(&self) -> Snapshot {
        self.read_or_default(SNAPSHOT_KEY)
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<(), CoreError> {
        self.write(SNAPSHOT_KEY, snapshot)
    }

    pub fn load_tasks(&self) -> TaskList {
        self.read_or_default(TASKS_KEY)
    }

    pub fn save_tasks(&self, tasks: &TaskList) -> Result<(), CoreError> {
        self.write(TASKS_KEY, tasks)
    }

    /// Write the snapshot and the task list together.
    pub fn save_all(&self, snapshot: &Snapshot, tasks: &TaskList) -> Result<(), CoreError> {
        let snapshot_json = serde_json::to_string(snapshot)?;
        let tasks_json = serde_json::to_string(tasks)?;
        let entries = [(SNAPSHOT_KEY, snapshot_json.as_str()), (TASKS_KEY, tasks_json.as_str())];
        self.db.kv_set_all(&entries)?;
        tracing::debug!(
            bytes = snapshot_json.len() + tasks_json.len(),
            "state and tasks saved"
        );
        Ok(())
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.db.kv_get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "could not read stored state, using defaults");
                return T::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "stored state is malformed, using defaults");
            T::default()
        })
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let json = serde_json::to_string(value)?;
        self.db.kv_set(key, &json)?;
        tracing::debug!(key, bytes = json.len(), "state saved");
        Ok(())
    }
}
