use clap::Subcommand;
use tempo_core::{Config, Language, Profile, VoiceChoice};

use super::{open_app, print_json};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the current profile, language and voice
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pick an age profile (child, teen, adult)
    Set {
        profile: Profile,
    },
    /// Change the interface language (ca, es, en, de, fr, oc, it, eu, gl)
    Language {
        language: Language,
    },
    /// Change the spoken voice (female, male)
    Voice {
        voice: VoiceChoice,
    },
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;

    match action {
        ProfileAction::Show { json } => {
            if json {
                print_json(&config.profile)?;
            } else {
                println!("profile:  {}", config.profile.profile);
                println!("language: {}", config.profile.language);
                println!("voice:    {}", config.profile.voice);
            }
        }
        ProfileAction::Set { profile } => {
            let mut app = open_app(&config)?;
            let seeded = app.select_profile(profile)?;
            config.profile.profile = profile;
            config.save()?;
            if seeded {
                println!(
                    "profile set to {profile}, calendar filled with {} routines",
                    app.calendar().entries().len()
                );
            } else {
                println!("profile set to {profile}");
            }
        }
        ProfileAction::Language { language } => {
            let mut app = open_app(&config)?;
            app.set_language(language)?;
            config.profile.language = language;
            config.save()?;
            println!("language set to {language}");
        }
        ProfileAction::Voice { voice } => {
            config.profile.voice = voice;
            config.save()?;
            println!("voice set to {voice}");
        }
    }
    Ok(())
}
