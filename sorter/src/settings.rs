use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::ChainTrigger;
use crate::input::{GrabRadius, InputRules, Replenish};
use crate::spawner::{
    DEFAULT_MAX_SPAWN_ATTEMPTS, DEFAULT_SHAPE_SIZE, MAX_SHAPE_SIZE, PairsPerSpawn, SpawnRules,
};

pub const SETTINGS_PATH_ENV: &str = "SORTER_SETTINGS_PATH";
const MIN_WINDOW_DIM: u32 = 64;
const MAX_WINDOW_DIM: u32 = 8192;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("settings json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rules of play. Each knob corresponds to one of the ways the toy has been tuned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaySettings {
    pub shape_size: f32,
    pub size_jitter: f32,
    pub pairs_per_spawn: PairsPerSpawn,
    pub replenish: Replenish,
    pub avoid_overlap: bool,
    pub max_spawn_attempts: u32,
    pub hit_radius: GrabRadius,
    pub seed_pointer_on_grab: bool,
}

impl Default for PlaySettings {
    fn default() -> Self {
        Self {
            shape_size: DEFAULT_SHAPE_SIZE,
            size_jitter: 0.0,
            pairs_per_spawn: PairsPerSpawn::default(),
            replenish: Replenish::default(),
            avoid_overlap: true,
            max_spawn_attempts: DEFAULT_MAX_SPAWN_ATTEMPTS,
            hit_radius: GrabRadius::default(),
            seed_pointer_on_grab: true,
        }
    }
}

impl PlaySettings {
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.shape_size.is_finite() || self.shape_size <= 0.0 {
            self.shape_size = defaults.shape_size;
        }
        self.shape_size = self.shape_size.min(MAX_SHAPE_SIZE);
        if !self.size_jitter.is_finite() || self.size_jitter < 0.0 {
            self.size_jitter = 0.0;
        }
        // Jitter past the base size would allow non-positive sizes.
        self.size_jitter = self.size_jitter.min(self.shape_size * 0.5);
        self.max_spawn_attempts = self.max_spawn_attempts.clamp(1, 10_000);
        self
    }

    pub fn spawn_rules(&self) -> SpawnRules {
        SpawnRules {
            shape_size: self.shape_size,
            size_jitter: self.size_jitter,
            pairs_per_spawn: self.pairs_per_spawn,
            avoid_overlap: self.avoid_overlap,
            max_attempts: self.max_spawn_attempts,
        }
    }

    pub fn input_rules(&self) -> InputRules {
        InputRules {
            grab_radius: self.hit_radius,
            seed_pointer_on_grab: self.seed_pointer_on_grab,
            replenish: self.replenish,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioSettings {
    pub master_volume: f32,
    pub cue_volume: f32,
    pub mute_all: bool,
    pub cue_chain: ChainTrigger,
    /// Directory holding recorded cue clips. Missing clips are synthesized.
    pub cue_dir: Option<PathBuf>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            cue_volume: 0.8,
            mute_all: false,
            cue_chain: ChainTrigger::default(),
            cue_dir: None,
        }
    }
}

impl AudioSettings {
    pub fn clamp(mut self) -> Self {
        self.master_volume = clamp_unit(self.master_volume);
        self.cue_volume = clamp_unit(self.cue_volume);
        self
    }

    pub fn effective_cue_gain(&self) -> f32 {
        if self.mute_all {
            0.0
        } else {
            self.master_volume * self.cue_volume
        }
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VideoSettings {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SorterSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub play: PlaySettings,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub video: VideoSettings,
}

impl Default for SorterSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            play: PlaySettings::default(),
            audio: AudioSettings::default(),
            video: VideoSettings::default(),
        }
    }
}

impl SorterSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.play = self.play.sanitized();
        self.audio = self.audio.clamp();
        self.video.width = self.video.width.clamp(MIN_WINDOW_DIM, MAX_WINDOW_DIM);
        self.video.height = self.video.height.clamp(MIN_WINDOW_DIM, MAX_WINDOW_DIM);
        self
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os(SETTINGS_PATH_ENV) {
            return Self {
                path: PathBuf::from(explicit),
            };
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("shape-sorter");
        path.push("settings.json");
        Self { path }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads settings, falling back to defaults when the file is missing or unreadable.
    pub fn load(&self) -> SorterSettings {
        match self.try_load() {
            Ok(Some(settings)) => settings,
            Ok(None) => SorterSettings::default(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "using default settings");
                SorterSettings::default()
            }
        }
    }

    /// `Ok(None)` when no settings file exists yet.
    pub fn try_load(&self) -> Result<Option<SorterSettings>, SettingsError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let settings = serde_json::from_slice::<SorterSettings>(&bytes)?;
        Ok(Some(settings.sanitized()))
    }

    pub fn save(&self, settings: &SorterSettings) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, text).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("shape-sorter-{}-{name}", std::process::id()));
        p
    }

    #[test]
    fn cue_gain_respects_mute() {
        let mut audio = AudioSettings {
            master_volume: 0.5,
            cue_volume: 0.5,
            ..AudioSettings::default()
        };
        assert!((audio.effective_cue_gain() - 0.25).abs() < 1e-6);
        audio.mute_all = true;
        assert_eq!(audio.effective_cue_gain(), 0.0);
    }

    #[test]
    fn sanitized_clamps_expected_fields() {
        let settings = SorterSettings {
            version: 7,
            play: PlaySettings {
                shape_size: -3.0,
                size_jitter: 500.0,
                max_spawn_attempts: 0,
                ..PlaySettings::default()
            },
            audio: AudioSettings {
                master_volume: 3.0,
                cue_volume: f32::NAN,
                ..AudioSettings::default()
            },
            video: VideoSettings {
                width: 1,
                height: 100_000,
                vsync: false,
            },
        }
        .sanitized();

        assert_eq!(settings.version, 1);
        assert_eq!(settings.play.shape_size, DEFAULT_SHAPE_SIZE);
        assert_eq!(settings.play.size_jitter, DEFAULT_SHAPE_SIZE * 0.5);
        assert_eq!(settings.play.max_spawn_attempts, 1);
        assert_eq!(settings.audio.master_volume, 1.0);
        assert_eq!(settings.audio.cue_volume, 0.0);
        assert_eq!(settings.video.width, MIN_WINDOW_DIM);
        assert_eq!(settings.video.height, MAX_WINDOW_DIM);
    }

    #[test]
    fn sanitized_caps_shape_size_and_attempts() {
        let play = PlaySettings {
            shape_size: 3e38,
            size_jitter: 1e38,
            max_spawn_attempts: u32::MAX,
            ..PlaySettings::default()
        }
        .sanitized();

        assert_eq!(play.shape_size, MAX_SHAPE_SIZE);
        assert_eq!(play.size_jitter, MAX_SHAPE_SIZE * 0.5);
        assert!((play.shape_size + play.size_jitter).is_finite());
        assert_eq!(play.max_spawn_attempts, 10_000);
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: SorterSettings =
            serde_json::from_str(r#"{"play":{"pairs_per_spawn":"one","hit_radius":"half"}}"#)
                .expect("settings JSON should parse");
        assert_eq!(parsed.play.pairs_per_spawn, PairsPerSpawn::One);
        assert_eq!(parsed.play.hit_radius, GrabRadius::Half);
        assert_eq!(parsed.play.shape_size, DEFAULT_SHAPE_SIZE);
        assert!(parsed.play.avoid_overlap);
        assert_eq!(parsed.audio, AudioSettings::default());
        assert_eq!(parsed.video, VideoSettings::default());
    }

    #[test]
    fn store_round_trips_and_tolerates_garbage() {
        let path = temp_path("settings.json");
        let store = SettingsStore::at(&path);

        let mut settings = SorterSettings::default();
        settings.play.replenish = Replenish::Immediate;
        settings.audio.cue_chain = ChainTrigger::OnProgress;
        store.save(&settings).expect("save settings");
        assert_eq!(store.load(), settings);

        fs::write(&path, b"{ not json").expect("write garbage");
        assert!(matches!(store.try_load(), Err(SettingsError::Json(_))));
        assert_eq!(store.load(), SorterSettings::default());

        let _ = fs::remove_file(&path);
        assert!(matches!(store.try_load(), Ok(None)));
    }
}
