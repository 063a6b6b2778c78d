use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use tempo_core::audio::{render, victory_theme, SAMPLE_RATE};
use tempo_core::AlarmKind;

#[derive(Subcommand)]
pub enum AlarmAction {
    /// List alarm sounds with their length
    List,
    /// Write an alarm to a 16-bit mono WAV file
    Render {
        /// siren, seismic or soft_chime
        kind: AlarmKind,
        /// Output path
        path: PathBuf,
    },
    /// Write the on-time victory fanfare to a WAV file
    Victory {
        /// Output path
        path: PathBuf,
    },
}

pub fn run(action: AlarmAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AlarmAction::List => {
            for kind in AlarmKind::ALL {
                println!("{:<10} {:.1}s", kind.as_str(), kind.duration_secs());
            }
        }
        AlarmAction::Render { kind, path } => {
            let samples = render(&kind.tone_plan(), SAMPLE_RATE);
            write_wav(&path, &samples, SAMPLE_RATE)?;
            println!("wrote {} samples to {}", samples.len(), path.display());
        }
        AlarmAction::Victory { path } => {
            let samples = render(&victory_theme(), SAMPLE_RATE);
            write_wav(&path, &samples, SAMPLE_RATE)?;
            println!("wrote {} samples to {}", samples.len(), path.display());
        }
    }
    Ok(())
}

fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> std::io::Result<()> {
    let data_len = (samples.len() * 2) as u32;
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);

    out.write_all(b"RIFF")?;
    out.write_all(&(36 + data_len).to_le_bytes())?;
    out.write_all(b"WAVEfmt ")?;
    out.write_all(&16u32.to_le_bytes())?;
    out.write_all(&1u16.to_le_bytes())?; // PCM
    out.write_all(&1u16.to_le_bytes())?; // mono
    out.write_all(&sample_rate.to_le_bytes())?;
    out.write_all(&(sample_rate * 2).to_le_bytes())?;
    out.write_all(&2u16.to_le_bytes())?;
    out.write_all(&16u16.to_le_bytes())?;
    out.write_all(b"data")?;
    out.write_all(&data_len.to_le_bytes())?;
    for s in samples {
        let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        out.write_all(&v.to_le_bytes())?;
    }
    out.flush()
}
