use std::path::PathBuf;
use std::time::Duration;

use engine::GameLogic;
use engine::app::{AppContext, GameApp};
use engine::graphics::Renderer2d;
use engine::input::PointerEvent;
use engine::surface::SurfaceSize;

use crate::audio::{AudioFeedback, CuePlayer, SilentCuePlayer};
use crate::cue_player::RodioCuePlayer;
use crate::game::{SorterInput, SorterLogic, SorterState};
use crate::input::SorterEvent;
use crate::recording::Recording;
use crate::render::{draw_hud, render_frame};
use crate::settings::SorterSettings;

/// Picks the rodio backend, or the silent one when muted or no output device exists.
pub fn open_cue_player(settings: &SorterSettings) -> Box<dyn CuePlayer> {
    let gain = settings.audio.effective_cue_gain();
    if gain <= 0.0 {
        tracing::info!("audio muted");
        return Box::new(SilentCuePlayer::default());
    }
    match RodioCuePlayer::new(settings.audio.cue_dir.as_deref(), gain) {
        Ok(player) => Box::new(player),
        Err(err) => {
            tracing::warn!(error = %err, "no audio output; cues disabled");
            Box::new(SilentCuePlayer::default())
        }
    }
}

struct Recorder {
    path: PathBuf,
    recording: Recording,
}

pub struct SorterApp {
    seed: u64,
    settings: SorterSettings,
    audio: AudioFeedback<Box<dyn CuePlayer>>,
    record_to: Option<PathBuf>,
    recorder: Option<Recorder>,
}

impl SorterApp {
    pub fn new(seed: u64, settings: SorterSettings, player: Box<dyn CuePlayer>) -> Self {
        let audio = AudioFeedback::new(player, settings.audio.cue_chain);
        Self {
            seed,
            settings,
            audio,
            record_to: None,
            recorder: None,
        }
    }

    /// Writes every input to `path` when the window closes.
    pub fn with_recording(mut self, path: PathBuf) -> Self {
        self.record_to = Some(path);
        self
    }

    fn record(&mut self, input: SorterInput) {
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.recording.push(input);
        }
    }
}

impl GameApp for SorterApp {
    type State = SorterState;
    type Effect = SorterEvent;

    fn init_state(&mut self, ctx: &mut AppContext) -> Self::State {
        let logic = SorterLogic::new(self.seed, ctx.surface_size, self.settings.play);
        if let Some(path) = self.record_to.take() {
            self.recorder = Some(Recorder {
                path,
                recording: Recording::new(self.seed, ctx.surface_size, self.settings.play),
            });
        }
        let state = logic.initial_state();
        tracing::info!(
            seed = self.seed,
            pairs = state.world.len(),
            width = ctx.surface_size.width,
            height = ctx.surface_size.height,
            "sorter started"
        );
        state
    }

    fn update_state(
        &mut self,
        state: &mut Self::State,
        events: &[PointerEvent],
        dt: Duration,
        _ctx: &mut AppContext,
    ) -> Vec<Self::Effect> {
        self.audio.tick(dt);

        let mut effects = Vec::new();
        for &event in events {
            let input = SorterInput::Pointer(event);
            self.record(input);
            effects.extend(state.apply(input));
        }
        effects
    }

    fn render(&mut self, state: &mut Self::State, gfx: &mut dyn Renderer2d) {
        self.record(SorterInput::Frame);
        render_frame(&mut state.world, gfx);
        draw_hud(&state.world, gfx);
    }

    fn handle_effects(
        &mut self,
        _state: &mut Self::State,
        effects: Vec<Self::Effect>,
        _ctx: &mut AppContext,
    ) {
        for effect in effects {
            match effect {
                SorterEvent::DragStarted { color, kind, .. } => {
                    self.audio.drag_started(color, kind);
                }
                SorterEvent::Spawned { pairs } => {
                    tracing::debug!(pairs, "replenished");
                }
                SorterEvent::Matched { .. } | SorterEvent::Dropped { .. } => {}
            }
        }
    }

    fn on_resize(&mut self, state: &mut Self::State, size: SurfaceSize) {
        let input = SorterInput::Resize(size);
        self.record(input);
        state.apply(input);
        tracing::debug!(width = size.width, height = size.height, "spawn bounds updated");
    }

    fn on_exit(&mut self, state: &Self::State) {
        tracing::info!(matched = state.world.matched(), "sorter closing");
        let Some(recorder) = self.recorder.as_ref() else {
            return;
        };
        match recorder.recording.save(&recorder.path) {
            Ok(()) => tracing::info!(
                path = %recorder.path.display(),
                inputs = recorder.recording.inputs.len(),
                "recording saved"
            ),
            Err(err) => tracing::error!(error = %err, "recording not saved"),
        }
    }
}
