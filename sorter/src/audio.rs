//! Spoken-style feedback on grab: the color cue, then the kind cue.
//!
//! Playback is split in two. `CueSequencer` decides *when* each cue starts and is advanced by
//! frame time, so it runs the same headless and headful. A `CuePlayer` turns the resulting
//! commands into sound.

use std::time::Duration;

use engine::audio::{Tone, Waveform};
use serde::{Deserialize, Serialize};

use crate::shape::{ShapeColor, ShapeKind};

pub const CUE_DURATION: Duration = Duration::from_millis(350);
/// Fraction of the color cue that must elapse before the kind cue under `OnProgress`.
pub const PROGRESS_THRESHOLD: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    Color(ShapeColor),
    Kind(ShapeKind),
}

impl Cue {
    pub const ALL: [Cue; 10] = [
        Cue::Color(ShapeColor::Red),
        Cue::Color(ShapeColor::Blue),
        Cue::Color(ShapeColor::Green),
        Cue::Color(ShapeColor::Yellow),
        Cue::Color(ShapeColor::Pink),
        Cue::Color(ShapeColor::Purple),
        Cue::Kind(ShapeKind::Circle),
        Cue::Kind(ShapeKind::Square),
        Cue::Kind(ShapeKind::Rectangle),
        Cue::Kind(ShapeKind::Triangle),
    ];

    /// Clip file stem.
    pub fn name(self) -> &'static str {
        match self {
            Cue::Color(color) => color.name(),
            Cue::Kind(kind) => kind.name(),
        }
    }
}

/// Fallback sound for a cue with no recorded clip. Colors climb a C major scale; kinds sit an
/// octave up, each with its own timbre.
pub fn synth_tone(cue: Cue) -> Tone {
    let (freq_hz, waveform) = match cue {
        Cue::Color(ShapeColor::Red) => (261.63, Waveform::Sine),
        Cue::Color(ShapeColor::Blue) => (293.66, Waveform::Sine),
        Cue::Color(ShapeColor::Green) => (329.63, Waveform::Sine),
        Cue::Color(ShapeColor::Yellow) => (349.23, Waveform::Sine),
        Cue::Color(ShapeColor::Pink) => (392.0, Waveform::Sine),
        Cue::Color(ShapeColor::Purple) => (440.0, Waveform::Sine),
        Cue::Kind(ShapeKind::Circle) => (523.25, Waveform::Sine),
        Cue::Kind(ShapeKind::Square) => (587.33, Waveform::Square),
        Cue::Kind(ShapeKind::Rectangle) => (659.25, Waveform::Saw),
        Cue::Kind(ShapeKind::Triangle) => (698.46, Waveform::Triangle),
    };
    let gain = match waveform {
        Waveform::Square | Waveform::Saw => 0.18,
        Waveform::Sine | Waveform::Triangle => 0.3,
    };
    Tone::new(freq_hz, waveform, CUE_DURATION)
        .with_gain(gain)
        .with_envelope(0.05, 0.3)
}

/// When the kind cue follows the color cue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainTrigger {
    #[default]
    OnCompletion,
    OnProgress,
}

impl ChainTrigger {
    /// How long after the color cue starts the kind cue begins.
    pub fn delay(self, color_len: Duration) -> Duration {
        match self {
            ChainTrigger::OnCompletion => color_len,
            ChainTrigger::OnProgress => color_len.mul_f32(PROGRESS_THRESHOLD),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueCommand {
    StopAll,
    Play(Cue),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingCue {
    cue: Cue,
    remaining: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct CueSequencer {
    trigger: ChainTrigger,
    pending: Option<PendingCue>,
}

impl CueSequencer {
    pub fn new(trigger: ChainTrigger) -> Self {
        Self {
            trigger,
            pending: None,
        }
    }

    /// Begins a chain, replacing any chain still in flight.
    pub fn start(
        &mut self,
        color: ShapeColor,
        kind: ShapeKind,
        color_len: Duration,
    ) -> [CueCommand; 2] {
        self.pending = Some(PendingCue {
            cue: Cue::Kind(kind),
            remaining: self.trigger.delay(color_len),
        });
        [CueCommand::StopAll, CueCommand::Play(Cue::Color(color))]
    }

    /// Advances by `dt`; returns the kind cue once its start time is reached.
    pub fn tick(&mut self, dt: Duration) -> Option<CueCommand> {
        let pending = self.pending.as_mut()?;
        pending.remaining = pending.remaining.saturating_sub(dt);
        if !pending.remaining.is_zero() {
            return None;
        }
        self.pending.take().map(|p| CueCommand::Play(p.cue))
    }

    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }
}

pub trait CuePlayer {
    /// Playback length of `cue`; drives chain timing.
    fn duration(&self, cue: Cue) -> Duration;
    fn execute(&mut self, command: CueCommand);
}

impl<P: CuePlayer + ?Sized> CuePlayer for Box<P> {
    fn duration(&self, cue: Cue) -> Duration {
        (**self).duration(cue)
    }

    fn execute(&mut self, command: CueCommand) {
        (**self).execute(command);
    }
}

/// Plays nothing and remembers what it was asked to play. Used when audio is muted or no
/// output device exists, and by tests.
#[derive(Debug, Clone, Default)]
pub struct SilentCuePlayer {
    history: Vec<CueCommand>,
}

impl SilentCuePlayer {
    pub fn history(&self) -> &[CueCommand] {
        &self.history
    }

    pub fn played(&self) -> Vec<Cue> {
        self.history
            .iter()
            .filter_map(|cmd| match cmd {
                CueCommand::Play(cue) => Some(*cue),
                CueCommand::StopAll => None,
            })
            .collect()
    }
}

impl CuePlayer for SilentCuePlayer {
    fn duration(&self, cue: Cue) -> Duration {
        synth_tone(cue).duration
    }

    fn execute(&mut self, command: CueCommand) {
        self.history.push(command);
    }
}

/// Sequencer plus player.
#[derive(Debug)]
pub struct AudioFeedback<P> {
    player: P,
    sequencer: CueSequencer,
}

impl<P: CuePlayer> AudioFeedback<P> {
    pub fn new(player: P, trigger: ChainTrigger) -> Self {
        Self {
            player,
            sequencer: CueSequencer::new(trigger),
        }
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn in_flight(&self) -> bool {
        self.sequencer.in_flight()
    }

    pub fn drag_started(&mut self, color: ShapeColor, kind: ShapeKind) {
        let color_len = self.player.duration(Cue::Color(color));
        for command in self.sequencer.start(color, kind, color_len) {
            self.player.execute(command);
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        if let Some(command) = self.sequencer.tick(dt) {
            self.player.execute(command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_names_are_unique() {
        let mut names: Vec<_> = Cue::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Cue::ALL.len());
    }

    #[test]
    fn on_completion_waits_for_full_color_cue() {
        let mut seq = CueSequencer::new(ChainTrigger::OnCompletion);
        seq.start(ShapeColor::Red, ShapeKind::Circle, Duration::from_millis(100));

        assert_eq!(seq.tick(Duration::from_millis(60)), None);
        assert_eq!(seq.tick(Duration::from_millis(30)), None);
        assert_eq!(
            seq.tick(Duration::from_millis(10)),
            Some(CueCommand::Play(Cue::Kind(ShapeKind::Circle)))
        );
        assert!(!seq.in_flight());
        assert_eq!(seq.tick(Duration::from_millis(500)), None);
    }

    #[test]
    fn on_progress_starts_kind_cue_early() {
        let mut seq = CueSequencer::new(ChainTrigger::OnProgress);
        seq.start(ShapeColor::Blue, ShapeKind::Square, Duration::from_millis(100));

        assert_eq!(seq.tick(Duration::from_millis(89)), None);
        assert_eq!(
            seq.tick(Duration::from_millis(1)),
            Some(CueCommand::Play(Cue::Kind(ShapeKind::Square)))
        );
    }

    #[test]
    fn synth_tones_have_cue_length() {
        for cue in Cue::ALL {
            let tone = synth_tone(cue);
            assert_eq!(tone.duration, CUE_DURATION);
            assert!(tone.gain > 0.0);
        }
    }
}
