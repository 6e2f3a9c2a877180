use engine::GameLogic;
use engine::input::PointerEvent;
use engine::surface::SurfaceSize;
use serde::{Deserialize, Serialize};

use crate::input::{InputHandler, SorterEvent};
use crate::settings::PlaySettings;
use crate::spawner::Spawner;
use crate::world::World;

/// One step of play. `Frame` is the per-frame tick that moves dragged shapes onto the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SorterInput {
    Pointer(PointerEvent),
    Frame,
    Resize(SurfaceSize),
}

#[derive(Debug, Clone)]
pub struct SorterState {
    pub world: World,
    pub spawner: Spawner,
    pub input: InputHandler,
}

impl SorterState {
    /// Starts from an existing world without spawning.
    pub fn with_world(world: World, spawner: Spawner, input: InputHandler) -> Self {
        Self {
            world,
            spawner,
            input,
        }
    }

    pub fn apply(&mut self, input: SorterInput) -> Vec<SorterEvent> {
        match input {
            SorterInput::Pointer(event) => {
                self.input
                    .handle(&mut self.world, &mut self.spawner, event)
            }
            SorterInput::Frame => {
                self.world.follow_pointer();
                Vec::new()
            }
            SorterInput::Resize(size) => {
                if !size.is_empty() {
                    self.spawner.set_bounds(size);
                }
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SorterLogic {
    seed: u64,
    bounds: SurfaceSize,
    play: PlaySettings,
}

impl SorterLogic {
    /// `play` is sanitized, so rules read back from a recording behave like loaded settings.
    pub fn new(seed: u64, bounds: SurfaceSize, play: PlaySettings) -> Self {
        Self {
            seed,
            bounds,
            play: play.sanitized(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn bounds(&self) -> SurfaceSize {
        self.bounds
    }

    pub fn play(&self) -> &PlaySettings {
        &self.play
    }
}

impl GameLogic for SorterLogic {
    type State = SorterState;
    type Input = SorterInput;

    fn initial_state(&self) -> Self::State {
        let mut world = World::new();
        let mut spawner = Spawner::new(self.seed, self.play.spawn_rules(), self.bounds);
        spawner.spawn(&mut world);
        SorterState::with_world(world, spawner, InputHandler::new(self.play.input_rules()))
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        let mut next = state.clone();
        next.apply(input);
        next
    }
}
