//! Spoken reminders.

use serde::{Deserialize, Serialize};

use crate::i18n;
use crate::profile::{Language, VoiceChoice};

/// What the session wants said. Text is resolved per language at playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechCue {
    BreakStart,
    BreakEnd,
    FiveMinutesLeft,
}

/// A fully resolved speech request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub lang_tag: String,
    pub voice: VoiceChoice,
    pub pitch: f32,
    pub rate: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, lang: Language, voice: VoiceChoice) -> Self {
        Self {
            text: text.into(),
            lang_tag: lang.speech_tag().to_string(),
            voice,
            pitch: match voice {
                VoiceChoice::Male => 0.9,
                VoiceChoice::Female => 1.1,
            },
            rate: 1.0,
        }
    }

    pub fn for_cue(cue: SpeechCue, lang: Language, voice: VoiceChoice) -> Self {
        let p = i18n::phrases(lang);
        let text = match cue {
            SpeechCue::BreakStart => p.break_start,
            SpeechCue::BreakEnd => p.break_end,
            SpeechCue::FiveMinutesLeft => p.five_minutes_left,
        };
        Self::new(text, lang, voice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_sets_pitch() {
        let male = Utterance::for_cue(SpeechCue::BreakEnd, Language::Catalan, VoiceChoice::Male);
        assert_eq!(male.pitch, 0.9);
        assert_eq!(male.lang_tag, "ca-ES");
        let female = Utterance::for_cue(SpeechCue::BreakEnd, Language::Catalan, VoiceChoice::Female);
        assert_eq!(female.pitch, 1.1);
        assert_eq!(male.text, female.text);
    }
}
