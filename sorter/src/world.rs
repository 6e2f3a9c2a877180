use engine::ui::Point2;
use serde::{Deserialize, Serialize};

use crate::shape::Shape;

/// Shapes and their holes, paired by index, plus the shared pointer position.
///
/// Both sequences are private so they can only grow or shrink a whole pair at a time; callers
/// may mutate shapes in place through `shapes_mut` but never change the length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    shapes: Vec<Shape>,
    holes: Vec<Shape>,
    pointer: Point2,
    matched: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.shapes.len(), self.holes.len());
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn holes(&self) -> &[Shape] {
        &self.holes
    }

    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    pub fn pair(&self, index: usize) -> Option<(&Shape, &Shape)> {
        Some((self.shapes.get(index)?, self.holes.get(index)?))
    }

    /// Solid shapes alongside their (read-only) holes, in index order.
    pub fn pairs_mut(&mut self) -> impl Iterator<Item = (&mut Shape, &Shape)> {
        self.shapes.iter_mut().zip(self.holes.iter())
    }

    pub fn push_pair(&mut self, shape: Shape, hole: Shape) {
        debug_assert!(!shape.is_hole() && hole.is_hole());
        debug_assert!(shape.matches(&hole));
        self.shapes.push(shape);
        self.holes.push(hole);
    }

    pub fn remove_pair(&mut self, index: usize) -> Option<(Shape, Shape)> {
        if index >= self.len() {
            return None;
        }
        let shape = self.shapes.remove(index);
        let hole = self.holes.remove(index);
        Some((shape, hole))
    }

    pub fn pointer(&self) -> Point2 {
        self.pointer
    }

    pub fn set_pointer(&mut self, pos: Point2) {
        self.pointer = pos;
    }

    pub fn dragging_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.dragging).count()
    }

    /// Moves every dragged shape onto the pointer.
    pub fn follow_pointer(&mut self) {
        let pointer = self.pointer;
        for shape in &mut self.shapes {
            shape.follow(pointer);
        }
    }

    pub fn matched(&self) -> u32 {
        self.matched
    }

    pub(crate) fn record_match(&mut self) {
        self.matched = self.matched.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{ShapeColor, ShapeKind};

    fn pair_at(x: f32, color: ShapeColor) -> (Shape, Shape) {
        (
            Shape::solid(Point2::new(x, 10.0), color, ShapeKind::Square, 10.0),
            Shape::hole(Point2::new(x, 90.0), color, ShapeKind::Square, 10.0),
        )
    }

    #[test]
    fn remove_pair_drops_both_sides_at_same_index() {
        let mut world = World::new();
        for (i, color) in [ShapeColor::Red, ShapeColor::Blue, ShapeColor::Green]
            .into_iter()
            .enumerate()
        {
            let (shape, hole) = pair_at(i as f32 * 20.0, color);
            world.push_pair(shape, hole);
        }

        let (shape, hole) = world.remove_pair(1).expect("index 1 exists");
        assert_eq!(shape.color, ShapeColor::Blue);
        assert_eq!(hole.color, ShapeColor::Blue);
        assert_eq!(world.shapes().len(), world.holes().len());
        assert_eq!(world.len(), 2);
        for (s, h) in world.shapes().iter().zip(world.holes()) {
            assert!(s.matches(h));
        }

        assert!(world.remove_pair(7).is_none());
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn follow_pointer_moves_only_dragged() {
        let mut world = World::new();
        let (a, a_hole) = pair_at(0.0, ShapeColor::Red);
        let (b, b_hole) = pair_at(50.0, ShapeColor::Pink);
        world.push_pair(a, a_hole);
        world.push_pair(b, b_hole);

        world.shapes_mut()[1].dragging = true;
        world.set_pointer(Point2::new(3.0, 4.0));
        world.follow_pointer();

        assert_eq!(world.shapes()[0].pos, Point2::new(0.0, 10.0));
        assert_eq!(world.shapes()[1].pos, Point2::new(3.0, 4.0));
        assert_eq!(world.dragging_count(), 1);
    }
}
