//! Tone synthesis for the alarm variants.
//!
//! Each alarm is a list of oscillator segments with frequency and gain
//! ramps. [`render`] turns a plan into mono PCM that any backend can play.

use super::AlarmKind;

pub const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Linear,
    Exponential,
}

/// One oscillator burst. Values hold at their end point once `ramp` elapses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSegment {
    pub waveform: Waveform,
    pub start: f32,
    pub duration: f32,
    pub ramp: f32,
    pub curve: Curve,
    pub freq: (f32, f32),
    pub gain: (f32, f32),
}

impl ToneSegment {
    fn at(&self, t: f32) -> (f32, f32) {
        let x = if self.ramp <= 0.0 {
            1.0
        } else {
            (t / self.ramp).clamp(0.0, 1.0)
        };
        let lerp = |(a, b): (f32, f32)| match self.curve {
            Curve::Linear => a + (b - a) * x,
            // exponential ramps cannot reach zero
            Curve::Exponential => a * (b.max(1e-4) / a.max(1e-4)).powf(x),
        };
        (lerp(self.freq), lerp(self.gain))
    }
}

pub(super) fn plan(kind: AlarmKind) -> Vec<ToneSegment> {
    match kind {
        AlarmKind::Siren => {
            // gain decays 0.3 -> 0.01 over each second; split at the sweep midpoint
            let mid_gain = 0.3 * (0.01f32 / 0.3).sqrt();
            (0..5)
                .flat_map(|i| {
                    let t = i as f32;
                    [
                        ToneSegment {
                            waveform: Waveform::Sawtooth,
                            start: t,
                            duration: 0.5,
                            ramp: 0.5,
                            curve: Curve::Exponential,
                            freq: (880.0, 440.0),
                            gain: (0.3, mid_gain),
                        },
                        ToneSegment {
                            waveform: Waveform::Sawtooth,
                            start: t + 0.5,
                            duration: 0.5,
                            ramp: 0.5,
                            curve: Curve::Exponential,
                            freq: (440.0, 880.0),
                            gain: (mid_gain, 0.01),
                        },
                    ]
                })
                .collect()
        }
        AlarmKind::Seismic => vec![ToneSegment {
            waveform: Waveform::Square,
            start: 0.0,
            duration: 3.0,
            ramp: 3.0,
            curve: Curve::Linear,
            freq: (60.0, 40.0),
            gain: (0.5, 0.0),
        }],
        AlarmKind::SoftChime => [0.0f32, 0.2, 0.4, 0.6]
            .into_iter()
            .map(|delay| ToneSegment {
                waveform: Waveform::Sine,
                start: delay,
                duration: 0.2,
                ramp: 0.15,
                curve: Curve::Exponential,
                freq: (2000.0, 100.0),
                gain: (0.4, 0.01),
            })
            .collect(),
    }
}

/// C-major arpeggio (C5 E5 G5) landing on a held C6 over G5.
pub(super) fn victory_plan() -> Vec<ToneSegment> {
    const NOTE: f32 = 0.15;
    let rising = [523.25f32, 659.25, 783.99]
        .into_iter()
        .enumerate()
        .map(|(i, freq)| ToneSegment {
            waveform: Waveform::Square,
            start: i as f32 * NOTE,
            duration: NOTE,
            ramp: 0.0,
            curve: Curve::Linear,
            freq: (freq, freq),
            gain: (0.2, 0.2),
        });
    let held = [(1046.5f32, 0.2f32), (783.99, 0.12)].map(|(freq, gain)| ToneSegment {
        waveform: Waveform::Sawtooth,
        start: 3.0 * NOTE,
        duration: 1.6,
        ramp: 1.6,
        curve: Curve::Exponential,
        freq: (freq, freq),
        gain: (gain, 0.01),
    });
    rising.chain(held).collect()
}

/// Render a tone plan to mono samples in `[-1, 1]`.
pub fn render(plan: &[ToneSegment], sample_rate: u32) -> Vec<f32> {
    let end = plan
        .iter()
        .map(|s| s.start + s.duration)
        .fold(0.0f32, f32::max);
    let len = (end * sample_rate as f32).ceil() as usize;
    let mut out = vec![0.0f32; len];
    let dt = 1.0 / sample_rate as f32;

    for seg in plan {
        let first = (seg.start * sample_rate as f32).round() as usize;
        let count = (seg.duration * sample_rate as f32).round() as usize;
        let mut phase = 0.0f32;
        for n in 0..count {
            let Some(slot) = out.get_mut(first + n) else {
                break;
            };
            let (freq, gain) = seg.at(n as f32 * dt);
            let value = match seg.waveform {
                Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
                Waveform::Square => {
                    if phase < 0.5 {
                        1.0
                    } else {
                        -1.0
                    }
                }
                Waveform::Sawtooth => 2.0 * phase - 1.0,
            };
            *slot = (*slot + value * gain).clamp(-1.0, 1.0);
            phase = (phase + freq * dt).fract();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn siren_sweeps_down_then_up() {
        let plan = AlarmKind::Siren.tone_plan();
        assert_eq!(plan.len(), 10);
        assert_eq!(plan[0].freq, (880.0, 440.0));
        assert_eq!(plan[1].freq, (440.0, 880.0));
        let (f, _) = plan[0].at(0.5);
        assert!((f - 440.0).abs() < 0.5);
    }

    #[test]
    fn seismic_fades_linearly_to_silence() {
        let seg = AlarmKind::Seismic.tone_plan()[0];
        let (f, g) = seg.at(1.5);
        assert!((f - 50.0).abs() < 1e-3);
        assert!((g - 0.25).abs() < 1e-3);
        assert_eq!(seg.at(3.0).1, 0.0);
    }

    #[test]
    fn victory_climbs_to_a_held_top_note() {
        let plan = victory_plan();
        let freqs: Vec<f32> = plan.iter().map(|s| s.freq.0).collect();
        assert_eq!(freqs, vec![523.25, 659.25, 783.99, 1046.5, 783.99]);
        let end = plan.iter().map(|s| s.start + s.duration).fold(0.0, f32::max);
        assert!((end - 2.05).abs() < 1e-4);
        let samples = render(&plan, 8_000);
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn render_length_and_bounds() {
        let samples = render(&AlarmKind::SoftChime.tone_plan(), 8_000);
        let expected = (AlarmKind::SoftChime.duration_secs() * 8_000.0).ceil() as usize;
        assert_eq!(samples.len(), expected);
        assert!(samples.iter().all(|s| s.abs() <= 0.4 + 1e-6));
        assert!(samples.iter().any(|s| s.abs() > 0.1));
    }
}
