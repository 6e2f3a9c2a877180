//! Procedural tone synthesis.
//!
//! Produces short mono sample streams (cues, clicks) without shipping audio assets. Output is a
//! plain `f32` iterator so any backend can wrap it.

use std::f32::consts::TAU;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Saw,
}

fn waveform_sample(wave: Waveform, phase: f32) -> f32 {
    match wave {
        Waveform::Sine => phase.sin(),
        Waveform::Triangle => (2.0 / std::f32::consts::PI) * phase.sin().asin(),
        Waveform::Square => {
            if phase.sin() >= 0.0 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Saw => 2.0 * (phase / TAU) - 1.0,
    }
}

/// Linear attack/release over a normalized `[0, 1]` position.
fn envelope(pos: f32, attack: f32, release: f32) -> f32 {
    if attack > 0.0 && pos < attack {
        return pos / attack;
    }
    if release > 0.0 && pos > (1.0 - release) {
        return ((1.0 - pos) / release).max(0.0);
    }
    1.0
}

/// A single enveloped note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq_hz: f32,
    pub waveform: Waveform,
    pub duration: Duration,
    pub gain: f32,
    attack: f32,
    release: f32,
}

impl Tone {
    pub fn new(freq_hz: f32, waveform: Waveform, duration: Duration) -> Self {
        Self {
            freq_hz: freq_hz.max(1.0),
            waveform,
            duration,
            gain: 0.3,
            attack: 0.05,
            release: 0.3,
        }
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain.max(0.0);
        self
    }

    /// Attack and release as fractions of the tone's length.
    pub fn with_envelope(mut self, attack: f32, release: f32) -> Self {
        self.attack = attack.clamp(0.0, 0.49);
        self.release = release.clamp(0.0, 0.49);
        self
    }

    pub fn sample_count(&self, sample_rate: u32) -> usize {
        (self.duration.as_secs_f64() * sample_rate.max(1) as f64).round() as usize
    }

    pub fn samples(&self, sample_rate: u32) -> ToneSamples {
        ToneSamples {
            tone: *self,
            sample_rate: sample_rate.max(1),
            total: self.sample_count(sample_rate),
            index: 0,
            phase: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToneSamples {
    tone: Tone,
    sample_rate: u32,
    total: usize,
    index: usize,
    phase: f32,
}

impl ToneSamples {
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Iterator for ToneSamples {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.total {
            return None;
        }
        let pos = self.index as f32 / self.total.max(1) as f32;
        let env = envelope(pos, self.tone.attack, self.tone.release);
        let sample = waveform_sample(self.tone.waveform, self.phase) * self.tone.gain * env;

        self.phase = (self.phase + TAU * self.tone.freq_hz / self.sample_rate as f32) % TAU;
        self.index += 1;
        // Soft-limit to avoid clipping.
        Some(sample.tanh() * 0.9)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total.saturating_sub(self.index);
        (left, Some(left))
    }
}

impl ExactSizeIterator for ToneSamples {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_length_matches_duration() {
        let tone = Tone::new(440.0, Waveform::Sine, Duration::from_millis(250));
        assert_eq!(tone.sample_count(48_000), 12_000);
        assert_eq!(tone.samples(48_000).count(), 12_000);
    }

    #[test]
    fn envelope_starts_and_ends_silent() {
        let tone = Tone::new(220.0, Waveform::Square, Duration::from_millis(100)).with_gain(1.0);
        let samples: Vec<f32> = tone.samples(8_000).collect();
        assert_eq!(samples[0], 0.0);
        assert!(samples.last().copied().unwrap_or(1.0).abs() < 0.05);
        assert!(samples.iter().all(|s| s.abs() <= 0.9));
        assert!(samples.iter().any(|s| s.abs() > 0.5));
    }

    #[test]
    fn waveforms_stay_in_unit_range() {
        for wave in [Waveform::Sine, Waveform::Triangle, Waveform::Square, Waveform::Saw] {
            for i in 0..64 {
                let s = waveform_sample(wave, TAU * i as f32 / 64.0);
                assert!((-1.0..=1.0).contains(&s), "{wave:?} out of range: {s}");
            }
        }
    }
}
