//! Real-time shell around [`Session`].
//!
//! Ticks the session once per second on a tokio interval, executes the
//! effects it returns through [`Cues`], and listens for user commands on a
//! channel. An on-time completion ends with the victory theme. Only one driver should exist per application; `App` enforces
//! that by handing out at most one active session.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use super::session::{Completion, Effect, Session};
use crate::audio::{CueSink, Cues, Utterance};
use crate::profile::{Language, VoiceChoice};

/// User actions forwarded to a running driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCommand {
    Pause,
    Resume,
    /// The user pressed "done".
    Complete,
}

pub struct SessionDriver<S> {
    session: Session,
    cues: Cues<S>,
    lang: Language,
    voice: VoiceChoice,
    auto_complete: bool,
    tick_every: Duration,
}

impl<S: CueSink> SessionDriver<S> {
    pub fn new(session: Session, sink: S, lang: Language, voice: VoiceChoice) -> Self {
        Self {
            session,
            cues: Cues::new(sink),
            lang,
            voice,
            auto_complete: true,
            tick_every: Duration::from_secs(1),
        }
    }

    /// When set (the default) the driver completes the session on its own
    /// once the work budget is exhausted. Otherwise it waits for
    /// [`DriverCommand::Complete`].
    pub fn auto_complete(mut self, enabled: bool) -> Self {
        self.auto_complete = enabled;
        self
    }

    /// Run until the session completes. A closed command channel counts as
    /// the user completing the task.
    ///
    /// `observe` is called after every state change with the effects it
    /// produced.
    pub async fn run<F>(
        mut self,
        mut commands: mpsc::Receiver<DriverCommand>,
        mut observe: F,
    ) -> (Completion, Session, S)
    where
        F: FnMut(&Session, &[Effect]),
    {
        let mut ticker = interval(self.tick_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.session.start();
        ticker.reset();
        observe(&self.session, &[]);

        let completion = loop {
            let effects = tokio::select! {
                _ = ticker.tick(), if self.session.is_running() => {
                    let mut effects = self.session.tick();
                    if self.session.is_finished() && self.auto_complete {
                        effects.extend(self.session.complete(false));
                    }
                    effects
                }
                cmd = commands.recv() => match cmd {
                    Some(DriverCommand::Pause) => {
                        self.session.pause();
                        Vec::new()
                    }
                    Some(DriverCommand::Resume) => {
                        if !self.session.is_running() {
                            self.session.start();
                            ticker.reset();
                        }
                        Vec::new()
                    }
                    Some(DriverCommand::Complete) | None => self.session.complete(true),
                },
            };

            self.execute(&effects);
            observe(&self.session, &effects);

            if let Some(done) = self.session.completion() {
                break done;
            }
        };

        tracing::info!(
            on_time = completion.on_time,
            manual = completion.manual,
            remaining_secs = completion.work_secs_remaining,
            "session completed"
        );
        (completion, self.session, self.cues.into_sink())
    }

    fn execute(&mut self, effects: &[Effect]) {
        for effect in effects {
            match *effect {
                Effect::Alarm(kind) => self.cues.alarm(kind),
                Effect::Speak(cue) => self
                    .cues
                    .speak(Utterance::for_cue(cue, self.lang, self.voice)),
                Effect::StopAudio => self.cues.stop_all(),
                Effect::Completed(done) if done.on_time => self.cues.victory(),
                Effect::Completed(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AlarmKind, CueRecord, MemorySink, SpeechCue};
    use crate::timer::session::Phase;

    fn driver(minutes: u32) -> SessionDriver<MemorySink> {
        SessionDriver::new(
            Session::new(minutes, AlarmKind::Seismic),
            MemorySink::default(),
            Language::English,
            VoiceChoice::Male,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn runs_to_exhaustion_and_completes_late() {
        let (_tx, rx) = mpsc::channel(4);
        let mut ticks = 0;
        let (completion, session, sink) = driver(2)
            .run(rx, |_, _| ticks += 1)
            .await;

        assert!(!completion.on_time);
        assert!(!completion.manual);
        assert!(session.is_finished());
        assert_eq!(sink.alarms(), vec![AlarmKind::Seismic]);
        assert_eq!(sink.records.last(), Some(&CueRecord::StopAll));
        // initial observation plus one per tick
        assert_eq!(ticks, 1 + 120);
    }

    #[tokio::test(start_paused = true)]
    async fn complete_command_ends_on_time() {
        let (tx, rx) = mpsc::channel(4);
        let handle = tokio::spawn(driver(30).run(rx, |_, _| {}));

        tokio::time::sleep(Duration::from_millis(10_500)).await;
        tx.send(DriverCommand::Complete).await.unwrap();
        let (completion, session, _) = handle.await.unwrap();

        assert!(completion.on_time);
        assert!(completion.manual);
        assert_eq!(session.total_work_secs_remaining(), 30 * 60 - 10);
    }

    #[tokio::test(start_paused = true)]
    async fn victory_plays_only_when_on_time() {
        let (tx, rx) = mpsc::channel(4);
        let handle = tokio::spawn(driver(30).run(rx, |_, _| {}));
        tokio::time::sleep(Duration::from_millis(3_500)).await;
        tx.send(DriverCommand::Complete).await.unwrap();
        let (completion, _, sink) = handle.await.unwrap();
        assert!(completion.on_time);
        assert_eq!(sink.records, vec![CueRecord::StopAll, CueRecord::Victory]);

        let (_tx, rx) = mpsc::channel(4);
        let (completion, _, sink) = driver(2).run(rx, |_, _| {}).await;
        assert!(!completion.on_time);
        assert!(!sink.records.contains(&CueRecord::Victory));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_the_clock() {
        let (tx, rx) = mpsc::channel(4);
        let handle = tokio::spawn(driver(30).run(rx, |_, _| {}));

        tokio::time::sleep(Duration::from_millis(5_500)).await;
        tx.send(DriverCommand::Pause).await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        tx.send(DriverCommand::Resume).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        drop(tx);

        let (completion, session, _) = handle.await.unwrap();
        assert!(completion.manual);
        assert_eq!(session.total_work_secs_remaining(), 30 * 60 - 7);
        assert_eq!(session.phase(), Phase::Work);
    }

    #[tokio::test(start_paused = true)]
    async fn break_cues_are_spoken() {
        let (_tx, rx) = mpsc::channel(4);
        let (_, _, sink) = driver(12).run(rx, |_, _| {}).await;

        let say = |cue| Utterance::for_cue(cue, Language::English, VoiceChoice::Male).text;
        // reminder at 300 s left comes before the first break at 120 s left
        let expected = vec![
            say(SpeechCue::FiveMinutesLeft),
            say(SpeechCue::BreakStart),
            say(SpeechCue::BreakEnd),
        ];
        assert_eq!(sink.spoken(), expected);
        assert_eq!(
            sink.records
                .iter()
                .filter(|r| **r == CueRecord::CancelSpeech)
                .count(),
            2
        );
        assert_eq!(
            sink.alarms(),
            vec![AlarmKind::SoftChime, AlarmKind::SoftChime, AlarmKind::Seismic]
        );
    }
}
