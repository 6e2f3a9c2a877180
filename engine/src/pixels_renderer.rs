use crate::graphics::{CpuRenderer, Renderer2d};
use crate::surface::SurfaceSize;

use pixels::Pixels;

/// Headful renderer built on `pixels`.
///
/// Game code draws through `Renderer2d` into the CPU frame buffer; this type owns the buffer,
/// keeps it sized to the window, and presents it.
pub struct PixelsRenderer2d {
    pixels: Pixels,
    size: SurfaceSize,
}

impl PixelsRenderer2d {
    pub fn new(mut pixels: Pixels, size: SurfaceSize) -> Result<Self, pixels::Error> {
        pixels.resize_buffer(size.width.max(1), size.height.max(1))?;
        Ok(Self { pixels, size })
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn resize(&mut self, size: SurfaceSize) -> Result<(), pixels::Error> {
        // Minimised windows report 0x0; keep the old buffer until a real size arrives.
        if size.is_empty() {
            return Ok(());
        }
        self.size = size;
        self.pixels.resize_surface(size.width, size.height)?;
        self.pixels.resize_buffer(size.width, size.height)?;
        Ok(())
    }

    pub fn draw_frame<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut dyn Renderer2d) -> R,
    {
        let mut cpu = CpuRenderer::new(self.pixels.frame_mut(), self.size);
        cpu.begin_frame(self.size);
        f(&mut cpu)
    }

    pub fn present(&mut self) -> Result<(), pixels::Error> {
        self.pixels.render()
    }
}
