use std::collections::HashMap;
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use engine::audio::{DEFAULT_SAMPLE_RATE, Tone, ToneSamples};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::audio::{Cue, CueCommand, CuePlayer, synth_tone};

pub const CLIP_EXTENSIONS: [&str; 4] = ["wav", "mp3", "ogg", "flac"];

#[derive(Debug, thiserror::Error)]
pub enum CueLoadError {
    #[error("cannot read cue clip {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode cue clip {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// A synthesized tone as a mono rodio source.
#[derive(Debug, Clone)]
pub struct ToneSource {
    samples: ToneSamples,
    duration: Duration,
}

impl ToneSource {
    pub fn new(tone: &Tone) -> Self {
        Self {
            samples: tone.samples(DEFAULT_SAMPLE_RATE),
            duration: tone.duration,
        }
    }
}

impl Iterator for ToneSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        self.samples.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.samples.size_hint()
    }
}

impl Source for ToneSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.samples.len())
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.samples.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.duration)
    }
}

/// Encoded clip bytes kept in memory, decoded again for every playback.
#[derive(Debug, Clone)]
pub struct Clip {
    bytes: Arc<[u8]>,
    duration: Duration,
}

impl Clip {
    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn decoder(&self) -> Result<Decoder<Cursor<Arc<[u8]>>>, rodio::decoder::DecoderError> {
        Decoder::new(Cursor::new(Arc::clone(&self.bytes)))
    }
}

pub fn load_clip(path: &Path) -> Result<Clip, CueLoadError> {
    let bytes: Arc<[u8]> = fs::read(path)
        .map_err(|source| CueLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .into();
    let decoder =
        Decoder::new(Cursor::new(Arc::clone(&bytes))).map_err(|source| CueLoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    let duration = match decoder.total_duration() {
        Some(duration) => duration,
        None => {
            let rate = decoder.sample_rate().max(1) as f64;
            let channels = decoder.channels().max(1) as f64;
            let samples = decoder.count() as f64;
            Duration::from_secs_f64(samples / (rate * channels))
        }
    };
    Ok(Clip { bytes, duration })
}

/// First `<dir>/<cue>.<ext>` that exists, in `CLIP_EXTENSIONS` order.
pub fn find_clip(dir: &Path, cue: Cue) -> Option<PathBuf> {
    CLIP_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{ext}", cue.name())))
        .find(|path| path.is_file())
}

/// Loads every cue found under `dir`. Clips that fail to load are logged and skipped so the
/// synthesized tone stands in.
pub fn load_clips(dir: &Path) -> HashMap<Cue, Clip> {
    let mut clips = HashMap::new();
    for cue in Cue::ALL {
        let Some(path) = find_clip(dir, cue) else {
            continue;
        };
        match load_clip(&path) {
            Ok(clip) => {
                tracing::debug!(cue = cue.name(), path = %path.display(), "loaded cue clip");
                clips.insert(cue, clip);
            }
            Err(err) => tracing::warn!(error = %err, "falling back to synthesized cue"),
        }
    }
    clips
}

pub struct RodioCuePlayer {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    clips: HashMap<Cue, Clip>,
    volume: f32,
    active: Vec<Sink>,
}

impl RodioCuePlayer {
    pub fn new(cue_dir: Option<&Path>, volume: f32) -> Result<Self, rodio::StreamError> {
        let (stream, handle) = OutputStream::try_default()?;
        let clips = cue_dir.map(load_clips).unwrap_or_default();
        tracing::info!(clips = clips.len(), volume, "audio output ready");
        Ok(Self {
            _stream: stream,
            handle,
            clips,
            volume,
            active: Vec::new(),
        })
    }

    fn play(&mut self, cue: Cue) {
        self.active.retain(|sink| !sink.empty());
        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(err) => {
                tracing::warn!(error = %err, cue = cue.name(), "cannot open cue sink");
                return;
            }
        };
        sink.set_volume(self.volume);

        match self.clips.get(&cue).map(Clip::decoder) {
            Some(Ok(source)) => sink.append(source),
            Some(Err(err)) => {
                tracing::warn!(error = %err, cue = cue.name(), "clip decode failed");
                sink.append(ToneSource::new(&synth_tone(cue)));
            }
            None => sink.append(ToneSource::new(&synth_tone(cue))),
        }
        self.active.push(sink);
    }
}

impl CuePlayer for RodioCuePlayer {
    fn duration(&self, cue: Cue) -> Duration {
        self.clips
            .get(&cue)
            .map(Clip::duration)
            .unwrap_or_else(|| synth_tone(cue).duration)
    }

    fn execute(&mut self, command: CueCommand) {
        match command {
            CueCommand::StopAll => {
                for sink in self.active.drain(..) {
                    sink.stop();
                }
            }
            CueCommand::Play(cue) => self.play(cue),
        }
    }
}
