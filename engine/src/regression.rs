//! Engine-level regression testing helpers.
//!
//! Runs a `GameLogic` headlessly over a fixed input script, renders every recorded state into
//! an offscreen RGBA buffer, and fingerprints each frame. Two runs of the same script must
//! produce the same fingerprints; a change in any pixel changes the hash.
//!
//! The engine stays game-agnostic by requiring a caller-provided renderer closure.

use sha2::{Digest, Sha256};

use crate::{
    GameLogic, HeadlessRunner,
    graphics::{CpuRenderer, Renderer2d},
    surface::{RgbaBufferSurface, Surface, SurfaceSize},
};

pub fn rgba_sha256_hex(rgba: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rgba);
    let digest = hasher.finalize();
    hex::encode(digest)
}

/// Renders `state` into a fresh buffer of `size` and hashes it.
pub fn render_hash<S, F>(state: &S, size: SurfaceSize, render: F) -> String
where
    F: Fn(&S, &mut dyn Renderer2d),
{
    let mut surface = RgbaBufferSurface::new(size);
    {
        let mut gfx = CpuRenderer::new(surface.frame_mut(), size);
        gfx.begin_frame(size);
        render(state, &mut gfx);
    }
    rgba_sha256_hex(surface.frame())
}

/// Runs `inputs` from the game's initial state and returns one hash per recorded state,
/// starting with the initial state.
pub fn render_hashes_for_inputs<G, I, F>(
    game: G,
    inputs: I,
    size: SurfaceSize,
    render: F,
) -> Vec<String>
where
    G: GameLogic,
    I: IntoIterator<Item = G::Input>,
    F: Fn(&G::State, &mut dyn Renderer2d),
{
    let mut runner = HeadlessRunner::new(game);
    runner.run(inputs);
    runner
        .history()
        .iter()
        .map(|state| render_hash(state, size, &render))
        .collect()
}

/// Index of the first frame whose hashes differ, if any (length mismatch counts).
pub fn first_divergence(a: &[String], b: &[String]) -> Option<usize> {
    let shared = a.len().min(b.len());
    (0..shared)
        .find(|&i| a[i] != b[i])
        .or_else(|| (a.len() != b.len()).then_some(shared))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_is_well_known() {
        assert_eq!(
            rgba_sha256_hex(&[]),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn first_divergence_reports_index_or_length() {
        let a = vec!["x".to_string(), "y".to_string()];
        let b = vec!["x".to_string(), "z".to_string()];
        assert_eq!(first_divergence(&a, &a), None);
        assert_eq!(first_divergence(&a, &b), Some(1));
        assert_eq!(first_divergence(&a, &a[..1]), Some(1));
    }
}
