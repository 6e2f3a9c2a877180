//! Shape sorter: drag colored shapes onto their matching holes.
//!
//! `World` holds the pairs, `Spawner` fills it, `InputHandler` turns pointer events into drags
//! and matches, and `render` draws it all once per frame. `game::SorterLogic` wraps the lot
//! as a deterministic `engine::GameLogic` so sessions can be recorded and replayed headlessly.

pub mod app;
pub mod audio;
pub mod cue_player;
pub mod game;
pub mod input;
pub mod recording;
pub mod render;
pub mod settings;
pub mod shape;
pub mod spawner;
pub mod world;
