use crate::surface::SurfaceSize;
use crate::ui::{Point2, Rect};

pub type Color = [u8; 4];

// A tiny block font (no external deps). Kept deliberately simple.
pub const DEFAULT_TEXT_SCALE: u32 = 2;
const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;

fn glyph_advance_x(scale: u32) -> u32 {
    (GLYPH_W + 1) * scale.max(1)
}

fn line_advance_y(scale: u32) -> u32 {
    (GLYPH_H + 1) * scale.max(1)
}

/// Pixel size of `text` when drawn with `draw_text_scaled` at `scale`.
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
    let lines = text.split('\n');
    let mut w = 0u32;
    let mut h = 0u32;
    for line in lines {
        let chars = line.chars().count() as u32;
        w = w.max(chars.saturating_mul(glyph_advance_x(scale)));
        h = h.saturating_add(line_advance_y(scale));
    }
    (w, h)
}

/// Unified 2D drawing interface.
///
/// Mirrors the handful of canvas primitives game code needs: filled axis-aligned rects, plus
/// arcs and closed paths, each either filled or stroked. Float geometry is clipped to the
/// surface, so callers may pass shapes that hang off the edge.
pub trait Renderer2d {
    fn begin_frame(&mut self, size: SurfaceSize);
    fn size(&self) -> SurfaceSize;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_circle(&mut self, center: Point2, radius: f32, color: Color);
    /// Ring centered on the circle's edge, `width` pixels thick.
    fn circle_outline(&mut self, center: Point2, radius: f32, width: f32, color: Color);

    /// Fills a closed path. Points are joined in order and the last joins the first.
    fn fill_polygon(&mut self, points: &[Point2], color: Color);
    fn polygon_outline(&mut self, points: &[Point2], width: f32, color: Color);

    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32);

    fn draw_text(&mut self, x: u32, y: u32, text: &str, color: Color) {
        self.draw_text_scaled(x, y, text, color, DEFAULT_TEXT_SCALE);
    }

    fn clear(&mut self, color: Color) {
        let s = self.size();
        self.fill_rect(Rect::from_size(s.width, s.height), color);
    }
}

/// CPU renderer that draws into an RGBA frame buffer.
pub struct CpuRenderer<'a> {
    frame: &'a mut [u8],
    size: SurfaceSize,
}

impl<'a> CpuRenderer<'a> {
    pub fn new(frame: &'a mut [u8], size: SurfaceSize) -> Self {
        Self { frame, size }
    }

    fn covered(&mut self, min: Point2, max: Point2, color: Color, inside: impl Fn(Point2) -> bool) {
        let Some((x0, x1)) = pixel_span(min.x, max.x, self.size.width) else {
            return;
        };
        let Some((y0, y1)) = pixel_span(min.y, max.y, self.size.height) else {
            return;
        };

        let width = self.size.width;
        let height = self.size.height;
        for y in y0..y1 {
            for x in x0..x1 {
                let sample = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                if inside(sample) {
                    set_pixel_cpu(self.frame, width, height, x, y, color);
                }
            }
        }
    }
}

impl Renderer2d for CpuRenderer<'_> {
    fn begin_frame(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let width = self.size.width;
        let height = self.size.height;

        let max_x = rect.right().min(width);
        let max_y = rect.bottom().min(height);
        if rect.x >= max_x || rect.y >= max_y {
            return;
        }

        let width_usize = width as usize;
        let height_usize = height as usize;
        let expected_len = width_usize
            .checked_mul(height_usize)
            .and_then(|v| v.checked_mul(4))
            .unwrap_or(0);
        if expected_len == 0 || self.frame.len() < expected_len {
            return;
        }

        let row_pixels = (max_x - rect.x) as usize;
        let row_bytes = row_pixels.checked_mul(4).unwrap_or(0);
        if row_bytes == 0 {
            return;
        }

        let stride = width_usize.checked_mul(4).unwrap_or(0);
        let mut row_start = (rect.y as usize)
            .checked_mul(stride)
            .and_then(|v| v.checked_add((rect.x as usize).checked_mul(4)?))
            .unwrap_or(0);

        for _ in rect.y..max_y {
            let row_end = row_start + row_bytes;
            let row = &mut self.frame[row_start..row_end];
            for px in row.chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
            row_start += stride;
        }
    }

    fn fill_circle(&mut self, center: Point2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let r2 = radius * radius;
        self.covered(
            center.offset(-radius, -radius),
            center.offset(radius, radius),
            color,
            |p| distance_sq(p, center) <= r2,
        );
    }

    fn circle_outline(&mut self, center: Point2, radius: f32, width: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let half = (width * 0.5).max(0.5);
        let outer = radius + half;
        let inner = (radius - half).max(0.0);
        let (outer2, inner2) = (outer * outer, inner * inner);
        self.covered(
            center.offset(-outer, -outer),
            center.offset(outer, outer),
            color,
            |p| {
                let d2 = distance_sq(p, center);
                d2 >= inner2 && d2 <= outer2
            },
        );
    }

    fn fill_polygon(&mut self, points: &[Point2], color: Color) {
        if points.len() < 3 {
            return;
        }
        let (min, max) = bounds(points, 0.0);
        self.covered(min, max, color, |p| point_in_polygon(p, points));
    }

    fn polygon_outline(&mut self, points: &[Point2], width: f32, color: Color) {
        if points.len() < 2 {
            return;
        }
        let half = (width * 0.5).max(0.5);
        let (min, max) = bounds(points, half);
        self.covered(min, max, color, |p| {
            closed_edges(points).any(|(a, b)| distance_to_segment(p, a, b) <= half)
        });
    }

    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32) {
        let width = self.size.width;
        let height = self.size.height;
        let scale = scale.max(1);
        let adv_x = glyph_advance_x(scale);
        let adv_y = line_advance_y(scale);

        let mut cursor_x = x;
        let mut cursor_y = y;

        for ch in text.chars() {
            match ch {
                '\n' => {
                    cursor_x = x;
                    cursor_y = cursor_y.saturating_add(adv_y);
                    if cursor_y >= height {
                        break;
                    }
                    continue;
                }
                ' ' => {
                    cursor_x = cursor_x.saturating_add(adv_x);
                    if cursor_x >= width {
                        break;
                    }
                    continue;
                }
                _ => {}
            }

            draw_char_cpu(self.frame, width, height, cursor_x, cursor_y, ch, color, scale);
            cursor_x = cursor_x.saturating_add(adv_x);
            if cursor_x >= width {
                break;
            }
        }
    }
}

/// Clips `[lo, hi)` to whole pixels in `[0, limit)`.
fn pixel_span(lo: f32, hi: f32, limit: u32) -> Option<(u32, u32)> {
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    let lo = lo.floor().max(0.0);
    let hi = hi.ceil().min(limit as f32);
    if hi <= lo {
        return None;
    }
    Some((lo as u32, hi as u32))
}

fn distance_sq(a: Point2, b: Point2) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

fn bounds(points: &[Point2], pad: f32) -> (Point2, Point2) {
    let mut min = Point2::new(f32::INFINITY, f32::INFINITY);
    let mut max = Point2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min.offset(-pad, -pad), max.offset(pad, pad))
}

fn closed_edges(points: &[Point2]) -> impl Iterator<Item = (Point2, Point2)> + '_ {
    points
        .iter()
        .copied()
        .zip(points.iter().copied().cycle().skip(1))
}

/// Even-odd crossing test.
fn point_in_polygon(p: Point2, points: &[Point2]) -> bool {
    let mut inside = false;
    for (a, b) in closed_edges(points) {
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

fn distance_to_segment(p: Point2, a: Point2, b: Point2) -> f32 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len2 = abx * abx + aby * aby;
    if len2 <= f32::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len2).clamp(0.0, 1.0);
    p.distance(Point2::new(a.x + abx * t, a.y + aby * t))
}

fn draw_char_cpu(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    ch: char,
    color: Color,
    scale: u32,
) {
    let rows = glyph_rows(ch);
    for (row, bits) in rows.into_iter().enumerate() {
        let py0 = y.saturating_add((row as u32).saturating_mul(scale));
        for col in 0..GLYPH_W {
            let mask = 1u8 << (GLYPH_W - 1 - col);
            if (bits & mask) == 0 {
                continue;
            }
            let px0 = x.saturating_add(col.saturating_mul(scale));
            for dy in 0..scale {
                for dx in 0..scale {
                    set_pixel_cpu(frame, width, height, px0 + dx, py0 + dy, color);
                }
            }
        }
    }
}

fn set_pixel_cpu(frame: &mut [u8], width: u32, height: u32, x: u32, y: u32, color: Color) {
    if x >= width || y >= height {
        return;
    }
    let idx = ((y as usize) * (width as usize) + x as usize) * 4;
    if idx + 4 <= frame.len() {
        frame[idx..idx + 4].copy_from_slice(&color);
    }
}

fn glyph_rows(ch: char) -> [u8; GLYPH_H as usize] {
    let c = ch.to_ascii_uppercase();
    match c {
        // Digits
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],

        // Letters
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b111, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b111, 0b101, 0b111, 0b110, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],

        // Punctuation
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],

        _ => [0b111, 0b001, 0b010, 0b000, 0b010], // '?'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_span_clips_to_surface() {
        assert_eq!(pixel_span(-10.0, 5.2, 100), Some((0, 6)));
        assert_eq!(pixel_span(95.5, 140.0, 100), Some((95, 100)));
        assert_eq!(pixel_span(120.0, 140.0, 100), None);
        assert_eq!(pixel_span(f32::NAN, 1.0, 100), None);
    }

    #[test]
    fn point_in_polygon_handles_triangle() {
        let tri = [
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 20.0),
            Point2::new(20.0, 20.0),
        ];
        assert!(point_in_polygon(Point2::new(10.0, 15.0), &tri));
        assert!(!point_in_polygon(Point2::new(1.0, 1.0), &tri));
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert!((distance_to_segment(Point2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-6);
        assert!((distance_to_segment(Point2::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn text_size_counts_widest_line() {
        assert_eq!(text_size("AB\nC", 2), (16, 24));
    }
}
