//! Terminal cue backend: the bell for alarms, printed lines for speech.

use std::io::Write;

use tempo_core::audio::{AlarmKind, CueSink, PlaybackError, Utterance};

pub struct TerminalSink {
    quiet: bool,
}

impl TerminalSink {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn line(&self, text: &str) -> Result<(), PlaybackError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "\r{text}").map_err(|e| PlaybackError::Aborted(e.to_string()))
    }
}

impl CueSink for TerminalSink {
    fn play_alarm(&mut self, kind: AlarmKind) -> Result<(), PlaybackError> {
        if self.quiet {
            return Err(PlaybackError::Unavailable);
        }
        self.line(&format!("\x07[alarm: {kind}]"))
    }

    fn play_victory(&mut self) -> Result<(), PlaybackError> {
        if self.quiet {
            return Err(PlaybackError::Unavailable);
        }
        self.line("\x07\x07[victory fanfare]")
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), PlaybackError> {
        self.line(&format!("> {}", utterance.text))
    }

    fn stop_all(&mut self) {}
}
