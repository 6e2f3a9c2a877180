use engine::graphics::{Color, DEFAULT_TEXT_SCALE, Renderer2d, text_size};
use engine::ui::{Anchor, Insets, Rect, Size};

use crate::world::World;

pub const BACKGROUND: Color = [0, 0, 0, 255];
const HUD_TEXT: Color = [220, 220, 220, 255];
const HUD_MARGIN: u32 = 8;

/// One animation frame: clear, move dragged shapes onto the pointer, then draw each shape
/// followed by its hole.
pub fn render_frame(world: &mut World, gfx: &mut dyn Renderer2d) {
    gfx.clear(BACKGROUND);
    let pointer = world.pointer();
    for (shape, hole) in world.pairs_mut() {
        shape.update(pointer, gfx);
        hole.draw(gfx);
    }
}

/// Draws the world as it stands, without moving anything.
pub fn draw_world(world: &World, gfx: &mut dyn Renderer2d) {
    gfx.clear(BACKGROUND);
    for (shape, hole) in world.shapes().iter().zip(world.holes()) {
        shape.draw(gfx);
        hole.draw(gfx);
    }
}

pub fn draw_hud(world: &World, gfx: &mut dyn Renderer2d) {
    let size = gfx.size();
    let label = format!("MATCHED {}", world.matched());
    let (w, h) = text_size(&label, DEFAULT_TEXT_SCALE);
    let area = Rect::from_size(size.width, size.height).inset(Insets::all(HUD_MARGIN));
    let at = area.place(Size::new(w, h), Anchor::TopLeft);
    gfx.draw_text(at.x, at.y, &label, HUD_TEXT);
}
