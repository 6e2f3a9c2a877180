use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::GameLogic;
use engine::input::PointerPhase;
use engine::surface::SurfaceSize;
use serde::{Deserialize, Serialize};

use crate::game::{SorterInput, SorterLogic};
use crate::settings::PlaySettings;

pub const RECORDING_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    #[error("recording io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("recording json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported recording version {found}")]
    Version { found: u32 },
}

/// Everything needed to rebuild a session: the seed, the starting surface, the play rules and
/// every input in the order it was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub version: u32,
    pub seed: u64,
    pub surface: SurfaceSize,
    pub play: PlaySettings,
    pub inputs: Vec<SorterInput>,
}

impl Recording {
    pub fn new(seed: u64, surface: SurfaceSize, play: PlaySettings) -> Self {
        Self {
            version: RECORDING_VERSION,
            seed,
            surface,
            play,
            inputs: Vec::new(),
        }
    }

    pub fn push(&mut self, input: SorterInput) {
        self.inputs.push(input);
    }

    pub fn logic(&self) -> SorterLogic {
        SorterLogic::new(self.seed, self.surface, self.play)
    }

    pub fn load(path: &Path) -> Result<Self, RecordingError> {
        let bytes = fs::read(path).map_err(|source| RecordingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let recording: Recording = serde_json::from_slice(&bytes)?;
        if recording.version != RECORDING_VERSION {
            return Err(RecordingError::Version {
                found: recording.version,
            });
        }
        Ok(recording)
    }

    pub fn save(&self, path: &Path) -> Result<(), RecordingError> {
        let io_err = |source| RecordingError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let text = serde_json::to_string(self)?;
        fs::write(path, text).map_err(io_err)
    }

    /// Re-runs every input headlessly from the recorded seed. Only the latest state is kept.
    pub fn replay(&self) -> ReplaySummary {
        let mut state = self.logic().initial_state();
        let mut presses = 0;
        for &input in &self.inputs {
            if matches!(input, SorterInput::Pointer(event) if event.phase == PointerPhase::Down) {
                presses += 1;
            }
            state.apply(input);
        }
        ReplaySummary {
            frames: self.inputs.len(),
            presses,
            pairs: state.world.len(),
            matched: state.world.matched(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub frames: usize,
    pub presses: usize,
    pub pairs: usize,
    pub matched: u32,
}
