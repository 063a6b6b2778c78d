//! User-facing preferences: age profile, language and voice.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Age profile. Drives assistant tone and default weekly routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Child,
    #[default]
    Teen,
    Adult,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::Child, Profile::Teen, Profile::Adult];

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Child => "child",
            Profile::Teen => "teen",
            Profile::Adult => "adult",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "child" => Ok(Profile::Child),
            "teen" => Ok(Profile::Teen),
            "adult" => Ok(Profile::Adult),
            other => Err(format!("unknown profile '{other}' (expected child, teen or adult)")),
        }
    }
}

/// Interface language, serialized as its short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[serde(rename = "ca")]
    Catalan,
    #[default]
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "oc")]
    Aranese,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "eu")]
    Basque,
    #[serde(rename = "gl")]
    Galician,
}

impl Language {
    pub const ALL: [Language; 9] = [
        Language::Catalan,
        Language::Spanish,
        Language::English,
        Language::German,
        Language::French,
        Language::Aranese,
        Language::Italian,
        Language::Basque,
        Language::Galician,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::Catalan => "ca",
            Language::Spanish => "es",
            Language::English => "en",
            Language::German => "de",
            Language::French => "fr",
            Language::Aranese => "oc",
            Language::Italian => "it",
            Language::Basque => "eu",
            Language::Galician => "gl",
        }
    }

    /// BCP 47 tag handed to the speech backend.
    ///
    /// Languages without a common platform voice fall back to `es-ES`.
    pub fn speech_tag(self) -> &'static str {
        match self {
            Language::Catalan => "ca-ES",
            Language::Spanish => "es-ES",
            Language::English => "en-US",
            Language::German => "de-DE",
            Language::French => "fr-FR",
            Language::Italian => "it-IT",
            Language::Aranese | Language::Basque | Language::Galician => "es-ES",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "ca" => Language::Catalan,
            "es" => Language::Spanish,
            "en" => Language::English,
            "de" => Language::German,
            "fr" => Language::French,
            "oc" => Language::Aranese,
            "it" => Language::Italian,
            "eu" => Language::Basque,
            "gl" => Language::Galician,
            other => return Err(format!("unknown language code '{other}'")),
        })
    }
}

/// Preferred voice gender for spoken reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VoiceChoice {
    Male,
    #[default]
    Female,
}

impl VoiceChoice {
    pub const ALL: [VoiceChoice; 2] = [VoiceChoice::Female, VoiceChoice::Male];
}

impl fmt::Display for VoiceChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VoiceChoice::Male => "male",
            VoiceChoice::Female => "female",
        })
    }
}

impl FromStr for VoiceChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" => Ok(VoiceChoice::Male),
            "female" => Ok(VoiceChoice::Female),
            other => Err(format!("unknown voice '{other}' (expected male or female)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Language::Catalan).unwrap(), "\"ca\"");
        let parsed: Language = serde_json::from_str("\"eu\"").unwrap();
        assert_eq!(parsed, Language::Basque);
    }

    #[test]
    fn speech_tag_falls_back_to_spanish() {
        assert_eq!(Language::English.speech_tag(), "en-US");
        assert_eq!(Language::Galician.speech_tag(), "es-ES");
    }

    #[test]
    fn profile_parses_case_insensitively() {
        assert_eq!("ADULT".parse::<Profile>().unwrap(), Profile::Adult);
        assert!("elder".parse::<Profile>().is_err());
    }
}
