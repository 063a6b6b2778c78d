//! Work/break session state machine.
//!
//! A session counts down a total work budget one second per `tick()`,
//! inserting a fixed break after every block of continuous work. The
//! machine is pure: every command returns the side effects it wants
//! performed (alarms, speech, completion) and the caller executes them.
//! See [`super::driver`] for the tokio shell that does so.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running(Work) -> Running(Break) -> Running(Work) -> ... -> Finished
//!           |    ^
//!           v    |
//!          Paused
//!
//! Running | Paused --complete--> CompletedEarly
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = Session::new(25, AlarmKind::Siren);
//! session.start();
//! // once per elapsed second:
//! for effect in session.tick() { /* play it */ }
//! ```

use serde::{Deserialize, Serialize};

use crate::audio::{AlarmKind, SpeechCue};

/// Continuous work before a break is inserted.
pub const WORK_INTERVAL_SECS: u32 = 10 * 60;
/// Length of an inserted break.
pub const BREAK_INTERVAL_SECS: u32 = 3 * 60;
/// Remaining work budget at which the spoken reminder fires.
pub const REMINDER_THRESHOLD_SECS: u32 = 5 * 60;
/// A break is only inserted while more than this much budget remains.
pub const BREAK_MIN_REMAINING_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

/// Observable lifecycle state, derived from the session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    /// Work budget exhausted.
    Finished,
    /// Ended by the user before the budget ran out.
    CompletedEarly,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Start,
    Pause,
    Tick,
    Complete { manual: bool },
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Effect {
    Alarm(AlarmKind),
    Speak(SpeechCue),
    StopAudio,
    Completed(Completion),
}

/// Outcome handed to the reward ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub on_time: bool,
    pub manual: bool,
    pub work_secs_remaining: u32,
}

/// One timed run of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    initial_work_secs: u32,
    total_work_secs_remaining: u32,
    phase: Phase,
    work_segment_elapsed: u32,
    break_secs_remaining: u32,
    is_running: bool,
    is_finished: bool,
    reminder_fired: bool,
    #[serde(default)]
    started: bool,
    /// Alarm played when the work budget runs out.
    alarm: AlarmKind,
    #[serde(default)]
    completion: Option<Completion>,
}

impl Session {
    /// Create an idle session with a work budget of `minutes`.
    pub fn new(minutes: u32, alarm: AlarmKind) -> Self {
        Self::with_budget_secs(minutes.saturating_mul(60), alarm)
    }

    pub fn with_budget_secs(secs: u32, alarm: AlarmKind) -> Self {
        Self {
            initial_work_secs: secs,
            total_work_secs_remaining: secs,
            phase: Phase::Work,
            work_segment_elapsed: 0,
            break_secs_remaining: BREAK_INTERVAL_SECS,
            is_running: false,
            is_finished: false,
            reminder_fired: false,
            started: false,
            alarm,
            completion: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        if self.is_finished {
            SessionState::Finished
        } else if self.completion.is_some() {
            SessionState::CompletedEarly
        } else if self.is_running {
            SessionState::Running
        } else if self.started {
            SessionState::Paused
        } else {
            SessionState::Idle
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn initial_work_secs(&self) -> u32 {
        self.initial_work_secs
    }

    pub fn total_work_secs_remaining(&self) -> u32 {
        self.total_work_secs_remaining
    }

    pub fn work_segment_elapsed(&self) -> u32 {
        self.work_segment_elapsed
    }

    pub fn break_secs_remaining(&self) -> u32 {
        self.break_secs_remaining
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_finished(&self) -> bool {
        self.is_finished
    }

    pub fn reminder_fired(&self) -> bool {
        self.reminder_fired
    }

    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    pub fn alarm(&self) -> AlarmKind {
        self.alarm
    }

    /// Seconds shown on the clock: work budget in WORK, break time in BREAK.
    pub fn displayed_secs(&self) -> u32 {
        match self.phase {
            Phase::Work => self.total_work_secs_remaining,
            Phase::Break => self.break_secs_remaining,
        }
    }

    /// Seconds of continuous work left before the next break.
    pub fn next_break_in(&self) -> u32 {
        WORK_INTERVAL_SECS.saturating_sub(self.work_segment_elapsed)
    }

    /// 0.0 .. 100.0 of the work budget consumed.
    pub fn progress_pct(&self) -> f64 {
        if self.initial_work_secs == 0 {
            return 100.0;
        }
        let done = self.initial_work_secs - self.total_work_secs_remaining;
        done as f64 / self.initial_work_secs as f64 * 100.0
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state(),
            phase: self.phase,
            total_work_secs_remaining: self.total_work_secs_remaining,
            work_segment_elapsed: self.work_segment_elapsed,
            break_secs_remaining: self.break_secs_remaining,
            next_break_in: self.next_break_in(),
            progress_pct: self.progress_pct(),
            reminder_fired: self.reminder_fired,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply one command and return the effects it produced.
    pub fn apply(&mut self, command: Command) -> Vec<Effect> {
        match command {
            Command::Start => {
                self.start();
                Vec::new()
            }
            Command::Pause => {
                self.pause();
                Vec::new()
            }
            Command::Tick => self.tick(),
            Command::Complete { manual } => self.complete(manual),
        }
    }

    /// Idle/Paused -> Running. No-op once finished or completed.
    pub fn start(&mut self) {
        if self.is_finished || self.completion.is_some() {
            return;
        }
        self.started = true;
        self.is_running = true;
    }

    /// Running -> Paused. Every counter is preserved as is.
    pub fn pause(&mut self) {
        self.is_running = false;
    }

    /// Advance one second. Does nothing unless running.
    pub fn tick(&mut self) -> Vec<Effect> {
        if !self.is_running {
            return Vec::new();
        }
        match self.phase {
            Phase::Work => self.tick_work(),
            Phase::Break => self.tick_break(),
        }
    }

    /// End the session. `on_time` is whether work budget was left.
    ///
    /// Completing an already completed session returns no effects.
    pub fn complete(&mut self, manual: bool) -> Vec<Effect> {
        if self.completion.is_some() {
            return Vec::new();
        }
        let completion = Completion {
            on_time: self.total_work_secs_remaining > 0,
            manual,
            work_secs_remaining: self.total_work_secs_remaining,
        };
        self.is_running = false;
        self.completion = Some(completion);
        vec![Effect::StopAudio, Effect::Completed(completion)]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn tick_work(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();

        self.total_work_secs_remaining = self.total_work_secs_remaining.saturating_sub(1);
        if self.total_work_secs_remaining == 0 {
            self.is_finished = true;
            self.is_running = false;
            effects.push(Effect::Alarm(self.alarm));
            return effects;
        }

        // Checked before a break can start so a break landing on the
        // threshold does not swallow the reminder.
        if self.total_work_secs_remaining == REMINDER_THRESHOLD_SECS && !self.reminder_fired {
            self.reminder_fired = true;
            effects.push(Effect::Speak(SpeechCue::FiveMinutesLeft));
        }

        self.work_segment_elapsed += 1;
        if self.work_segment_elapsed >= WORK_INTERVAL_SECS
            && self.total_work_secs_remaining > BREAK_MIN_REMAINING_SECS
        {
            self.phase = Phase::Break;
            self.work_segment_elapsed = 0;
            self.break_secs_remaining = BREAK_INTERVAL_SECS;
            effects.push(Effect::Speak(SpeechCue::BreakStart));
            effects.push(Effect::Alarm(AlarmKind::SoftChime));
        }
        effects
    }

    fn tick_break(&mut self) -> Vec<Effect> {
        self.break_secs_remaining = self.break_secs_remaining.saturating_sub(1);
        if self.break_secs_remaining > 0 {
            return Vec::new();
        }
        self.phase = Phase::Work;
        self.break_secs_remaining = BREAK_INTERVAL_SECS;
        vec![
            Effect::Speak(SpeechCue::BreakEnd),
            Effect::Alarm(AlarmKind::SoftChime),
        ]
    }
}

/// Serializable view of a session for display and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub phase: Phase,
    pub total_work_secs_remaining: u32,
    pub work_segment_elapsed: u32,
    pub break_secs_remaining: u32,
    pub next_break_in: u32,
    pub progress_pct: f64,
    pub reminder_fired: bool,
}

/// `m:ss` clock text.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(minutes: u32) -> Session {
        let mut s = Session::new(minutes, AlarmKind::Siren);
        s.start();
        s
    }

    fn tick_n(s: &mut Session, n: u32) -> Vec<Effect> {
        (0..n).flat_map(|_| s.tick()).collect()
    }

    #[test]
    fn start_pause_resume() {
        let mut s = Session::new(5, AlarmKind::Siren);
        assert_eq!(s.state(), SessionState::Idle);

        s.start();
        assert_eq!(s.state(), SessionState::Running);

        s.pause();
        assert_eq!(s.state(), SessionState::Paused);
        s.pause();
        assert_eq!(s.state(), SessionState::Paused);

        s.start();
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn tick_is_ignored_while_paused() {
        let mut s = running(5);
        tick_n(&mut s, 10);
        s.pause();
        assert!(tick_n(&mut s, 10).is_empty());
        assert_eq!(s.total_work_secs_remaining(), 290);
    }

    #[test]
    fn twelve_minute_scenario() {
        let mut s = running(12);

        let fx = tick_n(&mut s, 600);
        assert_eq!(s.phase(), Phase::Break);
        assert_eq!(s.total_work_secs_remaining(), 120);
        assert_eq!(s.work_segment_elapsed(), 0);
        assert_eq!(s.break_secs_remaining(), 180);
        assert!(fx.contains(&Effect::Speak(SpeechCue::BreakStart)));

        let fx = tick_n(&mut s, 180);
        assert_eq!(s.phase(), Phase::Work);
        assert_eq!(s.total_work_secs_remaining(), 120);
        assert_eq!(
            fx,
            vec![
                Effect::Speak(SpeechCue::BreakEnd),
                Effect::Alarm(AlarmKind::SoftChime)
            ]
        );

        let fx = tick_n(&mut s, 120);
        assert!(s.is_finished());
        assert!(!s.is_running());
        assert_eq!(s.state(), SessionState::Finished);
        assert_eq!(fx, vec![Effect::Alarm(AlarmKind::Siren)]);
    }

    #[test]
    fn no_break_when_little_budget_remains() {
        // 11 minutes: at 600 ticks exactly 60 s remain, which is not > 60
        let mut s = running(11);
        let fx = tick_n(&mut s, 600);
        assert_eq!(s.phase(), Phase::Work);
        assert_eq!(s.total_work_secs_remaining(), 60);
        assert!(!fx.contains(&Effect::Speak(SpeechCue::BreakStart)));
        tick_n(&mut s, 60);
        assert!(s.is_finished());
    }

    #[test]
    fn reminder_fires_once_across_pauses() {
        let mut s = running(7);
        let mut reminders = 0;
        for i in 0..(7 * 60) {
            if i % 37 == 0 {
                s.pause();
                s.start();
            }
            reminders += s
                .tick()
                .iter()
                .filter(|e| **e == Effect::Speak(SpeechCue::FiveMinutesLeft))
                .count();
            if s.total_work_secs_remaining() == 300 {
                assert!(s.reminder_fired());
            }
        }
        assert_eq!(reminders, 1);
        assert!(s.is_finished());
    }

    #[test]
    fn reminder_fires_when_break_lands_on_threshold() {
        // 15 minutes: the first break starts with exactly 300 s left
        let mut s = running(15);
        let fx = tick_n(&mut s, 600);
        assert_eq!(s.phase(), Phase::Break);
        assert!(s.reminder_fired());
        assert!(fx.contains(&Effect::Speak(SpeechCue::FiveMinutesLeft)));
    }

    #[test]
    fn pause_mid_break_preserves_break_time() {
        let mut s = running(20);
        tick_n(&mut s, 600 + 45);
        assert_eq!(s.phase(), Phase::Break);
        let before = s.clone();

        s.pause();
        assert!(tick_n(&mut s, 100).is_empty());
        s.start();

        assert_eq!(s.break_secs_remaining(), before.break_secs_remaining());
        assert_eq!(s.break_secs_remaining(), 135);
        assert_eq!(s.total_work_secs_remaining(), before.total_work_secs_remaining());
    }

    #[test]
    fn manual_completion_with_budget_left_is_on_time() {
        let mut s = running(10);
        tick_n(&mut s, 30);
        let fx = s.complete(true);
        let completion = s.completion().unwrap();
        assert!(completion.on_time);
        assert!(completion.manual);
        assert_eq!(fx[0], Effect::StopAudio);
        assert_eq!(fx[1], Effect::Completed(completion));
        assert_eq!(s.state(), SessionState::CompletedEarly);
        assert!(!s.is_running());
    }

    #[test]
    fn completion_after_exhaustion_is_late() {
        let mut s = running(2);
        tick_n(&mut s, 120);
        assert!(s.is_finished());
        s.complete(false);
        assert!(!s.completion().unwrap().on_time);
        assert_eq!(s.state(), SessionState::Finished);
    }

    #[test]
    fn complete_is_idempotent_and_blocks_restart() {
        let mut s = running(3);
        assert_eq!(s.complete(true).len(), 2);
        assert!(s.complete(true).is_empty());
        s.start();
        assert!(!s.is_running());
        assert!(s.tick().is_empty());
    }

    #[test]
    fn start_after_finish_is_noop() {
        let mut s = running(1);
        tick_n(&mut s, 60);
        s.start();
        assert!(!s.is_running());
        assert_eq!(s.total_work_secs_remaining(), 0);
    }

    #[test]
    fn apply_dispatches_commands() {
        let mut s = Session::new(1, AlarmKind::Seismic);
        assert!(s.apply(Command::Start).is_empty());
        assert!(s.apply(Command::Tick).is_empty());
        assert_eq!(s.total_work_secs_remaining(), 59);
        s.apply(Command::Pause);
        assert!(!s.is_running());
        let fx = s.apply(Command::Complete { manual: true });
        assert_eq!(fx.len(), 2);
    }

    #[test]
    fn snapshot_serializes_with_state() {
        let mut s = running(12);
        tick_n(&mut s, 10);
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["state"], "running");
        assert_eq!(json["phase"], "work");
        assert_eq!(json["next_break_in"], 590);

        let restored: Session = serde_json::from_str(&serde_json::to_string(&s).unwrap()).unwrap();
        assert_eq!(restored, s);
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(125), "2:05");
        assert_eq!(format_clock(720), "12:00");
    }
}
