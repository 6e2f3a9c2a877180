use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// An RGBA surface.
///
/// This is the abstraction layer between:
/// - rendering (writing RGBA pixels into `frame_mut()`), and
/// - presentation (showing or hashing those pixels somewhere).
///
/// Works for both headful (windowed) and headless (offscreen) runs.
pub trait Surface {
    fn size(&self) -> SurfaceSize;
    fn frame_mut(&mut self) -> &mut [u8];
}

/// A simple in-memory RGBA surface for headless execution and tests.
#[derive(Debug, Clone)]
pub struct RgbaBufferSurface {
    size: SurfaceSize,
    buf: Vec<u8>,
}

impl RgbaBufferSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            buf: vec![0u8; size.rgba_len()],
        }
    }

    pub fn frame(&self) -> &[u8] {
        &self.buf
    }

    /// RGBA of the pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = ((y as usize) * (self.size.width as usize) + x as usize) * 4;
        let px = self.buf.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

impl Surface for RgbaBufferSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn frame_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_surface_reads_pixels() {
        let mut surface = RgbaBufferSurface::new(SurfaceSize::new(2, 2));
        surface.frame_mut()[4..8].copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(surface.pixel(1, 0), Some([1, 2, 3, 4]));
        assert_eq!(surface.pixel(2, 0), None);
        assert_eq!(surface.frame().len(), 16);
    }
}
