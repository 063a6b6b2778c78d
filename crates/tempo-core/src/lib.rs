//! # Tempo Core Library
//!
//! Core logic for Tempo, a task timer with rewards for people who find it
//! hard to keep track of time. The `tempo` CLI is a thin layer over this
//! crate.
//!
//! ## Architecture
//!
//! - **Session timer**: a pure work/break state machine ([`Session::apply`])
//!   plus a tokio driver that ticks it once a second and plays its cues
//! - **Reality check**: compares the user's estimate with the assistant's
//! - **Economy**: coin ledger, completion rewards and the cosmetic shop
//! - **Planning**: weekly routine calendar and packing checklists
//! - **Assistant**: Gemini client for task breakdown, chat and rewards, with
//!   local fallbacks for every call
//! - **Storage**: SQLite key-value snapshot and TOML configuration
//!
//! ## Key Components
//!
//! - [`App`]: owns all user state and the single active session slot
//! - [`Session`] / [`SessionDriver`]: timer core and its real-time shell
//! - [`SnapshotStore`]: persistence
//! - [`Config`]: user preferences

pub mod app;
pub mod assistant;
pub mod audio;
pub mod calendar;
pub mod checklist;
pub mod error;
pub mod events;
pub mod i18n;
pub mod ledger;
pub mod profile;
pub mod reality_check;
pub mod shop;
pub mod storage;
pub mod task;
pub mod timer;

pub use app::{ActiveSession, AddedTask, App, StartedTask, TaskOutcome};
pub use assistant::{Conversation, GeminiClient, TaskAnalysis};
pub use audio::{AlarmKind, CueSink};
pub use error::{CoreError, ConfigError, SessionError, ShopError, ValidationError};
pub use events::Event;
pub use profile::{Language, Profile, VoiceChoice};
pub use reality_check::{RealityCheck, RealityFlag};
pub use storage::{Config, Database, SnapshotStore};
pub use task::{Task, TaskStep};
pub use timer::{Completion, DriverCommand, Session, SessionDriver};
