//! Small frame-driven 2D runtime.
//!
//! Deterministic game logic plugs in through `GameLogic` and can be driven headlessly by
//! `HeadlessRunner`, which keeps every state in a `TimeMachine` for frame-by-frame checks.
//! The windowed loop lives in `app`, drawing goes through `graphics::Renderer2d`.

pub mod app;
pub mod audio;
pub mod graphics;
pub mod input;
pub mod pixels_renderer;
pub mod regression;
pub mod surface;
pub mod ui;

/// Append-only state history, one entry per stepped input plus the initial state.
#[derive(Debug)]
pub struct TimeMachine<State> {
    states: Vec<State>,
    frame: usize,
}

impl<State> TimeMachine<State> {
    pub fn new(initial_state: State) -> Self {
        Self {
            states: vec![initial_state],
            frame: 0,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn state(&self) -> &State {
        &self.states[self.frame]
    }

    pub fn history(&self) -> &[State] {
        &self.states
    }

    pub fn record(&mut self, state: State) -> usize {
        self.states.push(state);
        self.frame += 1;
        self.frame
    }
}

pub trait GameLogic {
    type State;
    type Input;

    fn initial_state(&self) -> Self::State;
    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State;
}

#[derive(Debug)]
pub struct HeadlessRunner<G: GameLogic> {
    game: G,
    timemachine: TimeMachine<G::State>,
}

impl<G: GameLogic> HeadlessRunner<G> {
    pub fn new(game: G) -> Self {
        let initial_state = game.initial_state();
        Self {
            game,
            timemachine: TimeMachine::new(initial_state),
        }
    }

    pub fn frame(&self) -> usize {
        self.timemachine.frame()
    }

    pub fn state(&self) -> &G::State {
        self.timemachine.state()
    }

    pub fn history(&self) -> &[G::State] {
        self.timemachine.history()
    }

    pub fn step(&mut self, input: G::Input) -> usize {
        let next_state = self.game.step(self.timemachine.state(), input);
        self.timemachine.record(next_state)
    }

    pub fn run<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = G::Input>,
    {
        let mut last_frame = self.frame();
        for input in inputs {
            last_frame = self.step(input);
        }
        last_frame
    }
}
