//! Alarm and speech cues.
//!
//! Playback is best-effort and fire-and-forget. A backend that lacks a
//! capability reports [`PlaybackError::Unavailable`]; [`Cues`] logs it and
//! moves on so the timer never waits on audio. A new utterance always
//! cancels the one in flight instead of queueing behind it.

mod speech;
mod synth;

pub use speech::{SpeechCue, Utterance};
pub use synth::{render, Curve, ToneSegment, Waveform, SAMPLE_RATE};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Named alarm variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlarmKind {
    /// Sharp rising/falling sawtooth alert.
    Siren,
    /// Low-frequency square rumble.
    Seismic,
    /// Soft pulsed chime; also used for break transitions.
    #[default]
    SoftChime,
}

impl AlarmKind {
    pub const ALL: [AlarmKind; 3] = [AlarmKind::Siren, AlarmKind::Seismic, AlarmKind::SoftChime];

    pub fn as_str(self) -> &'static str {
        match self {
            AlarmKind::Siren => "siren",
            AlarmKind::Seismic => "seismic",
            AlarmKind::SoftChime => "soft_chime",
        }
    }

    /// Oscillator plan for this alarm, times in seconds from trigger.
    pub fn tone_plan(self) -> Vec<ToneSegment> {
        synth::plan(self)
    }

    /// Length of the cue in seconds.
    pub fn duration_secs(self) -> f32 {
        self.tone_plan()
            .iter()
            .map(|s| s.start + s.duration)
            .fold(0.0, f32::max)
    }
}

impl fmt::Display for AlarmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlarmKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "siren" => Ok(AlarmKind::Siren),
            "seismic" => Ok(AlarmKind::Seismic),
            "soft_chime" | "neon_pulse" | "chime" => Ok(AlarmKind::SoftChime),
            other => Err(format!("unknown alarm '{other}' (expected siren, seismic or soft_chime)")),
        }
    }
}

/// Fanfare played when a task is finished on time.
pub fn victory_theme() -> Vec<ToneSegment> {
    synth::victory_plan()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("playback not available on this platform")]
    Unavailable,
    #[error("playback aborted: {0}")]
    Aborted(String),
}

/// A platform audio/speech backend.
pub trait CueSink {
    fn play_alarm(&mut self, kind: AlarmKind) -> Result<(), PlaybackError>;

    /// Play the [`victory_theme`].
    fn play_victory(&mut self) -> Result<(), PlaybackError>;

    fn speak(&mut self, utterance: &Utterance) -> Result<(), PlaybackError>;

    /// Cancel the utterance currently being spoken, if any.
    fn cancel_speech(&mut self) {}

    /// Stop every alarm and utterance.
    fn stop_all(&mut self);
}

/// Wraps a [`CueSink`] with the preempt-and-ignore-failures policy.
pub struct Cues<S> {
    sink: S,
    speaking: Option<Utterance>,
}

impl<S: CueSink> Cues<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, speaking: None }
    }

    pub fn alarm(&mut self, kind: AlarmKind) {
        if let Err(e) = self.sink.play_alarm(kind) {
            tracing::warn!(alarm = %kind, error = %e, "alarm playback failed");
        }
    }

    pub fn victory(&mut self) {
        if let Err(e) = self.sink.play_victory() {
            tracing::warn!(error = %e, "victory theme playback failed");
        }
    }

    pub fn speak(&mut self, utterance: Utterance) {
        if self.speaking.take().is_some() {
            self.sink.cancel_speech();
        }
        match self.sink.speak(&utterance) {
            Ok(()) => self.speaking = Some(utterance),
            Err(e) => tracing::warn!(text = %utterance.text, error = %e, "speech playback failed"),
        }
    }

    pub fn stop_all(&mut self) {
        self.speaking = None;
        self.sink.stop_all();
    }

    /// The last utterance handed to the backend, unless stopped since.
    pub fn speaking(&self) -> Option<&Utterance> {
        self.speaking.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Backend for hosts without audio: accepts everything, plays nothing.
#[derive(Debug, Default)]
pub struct SilentSink;

impl CueSink for SilentSink {
    fn play_alarm(&mut self, _kind: AlarmKind) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn play_victory(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn speak(&mut self, _utterance: &Utterance) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn stop_all(&mut self) {}
}

/// One call received by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub enum CueRecord {
    Alarm(AlarmKind),
    Victory,
    Speak(Utterance),
    CancelSpeech,
    StopAll,
}

/// Records every call. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<CueRecord>,
    /// When set, every play/speak call fails with this error.
    pub fail_with: Option<PlaybackError>,
}

impl MemorySink {
    pub fn spoken(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|r| match r {
                CueRecord::Speak(u) => Some(u.text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn alarms(&self) -> Vec<AlarmKind> {
        self.records
            .iter()
            .filter_map(|r| match r {
                CueRecord::Alarm(k) => Some(*k),
                _ => None,
            })
            .collect()
    }
}

impl CueSink for MemorySink {
    fn play_alarm(&mut self, kind: AlarmKind) -> Result<(), PlaybackError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.records.push(CueRecord::Alarm(kind));
        Ok(())
    }

    fn play_victory(&mut self) -> Result<(), PlaybackError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.records.push(CueRecord::Victory);
        Ok(())
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), PlaybackError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.records.push(CueRecord::Speak(utterance.clone()));
        Ok(())
    }

    fn cancel_speech(&mut self) {
        self.records.push(CueRecord::CancelSpeech);
    }

    fn stop_all(&mut self) {
        self.records.push(CueRecord::StopAll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Language, VoiceChoice};

    fn utterance(cue: SpeechCue) -> Utterance {
        Utterance::for_cue(cue, Language::English, VoiceChoice::Female)
    }

    #[test]
    fn new_utterance_preempts_previous() {
        let mut cues = Cues::new(MemorySink::default());
        cues.speak(utterance(SpeechCue::BreakStart));
        cues.speak(utterance(SpeechCue::BreakEnd));

        let records = &cues.sink().records;
        assert_eq!(records.len(), 3);
        assert_eq!(records[1], CueRecord::CancelSpeech);
        assert_eq!(
            cues.speaking().map(|u| u.text.as_str()),
            Some(utterance(SpeechCue::BreakEnd).text.as_str())
        );
    }

    #[test]
    fn playback_failures_are_swallowed() {
        let mut cues = Cues::new(MemorySink {
            fail_with: Some(PlaybackError::Unavailable),
            ..Default::default()
        });
        cues.alarm(AlarmKind::Siren);
        cues.victory();
        cues.speak(utterance(SpeechCue::FiveMinutesLeft));
        assert!(cues.speaking().is_none());
        assert!(cues.sink().records.is_empty());
    }

    #[test]
    fn alarm_kind_accepts_legacy_name() {
        assert_eq!("NEON_PULSE".parse::<AlarmKind>().unwrap(), AlarmKind::SoftChime);
        assert_eq!("seismic".parse::<AlarmKind>().unwrap(), AlarmKind::Seismic);
    }

    #[test]
    fn alarm_durations() {
        assert!((AlarmKind::Siren.duration_secs() - 5.0).abs() < 1e-6);
        assert!((AlarmKind::Seismic.duration_secs() - 3.0).abs() < 1e-6);
        assert!((AlarmKind::SoftChime.duration_secs() - 0.8).abs() < 1e-6);
    }
}
