use engine::graphics::{Color, Renderer2d};
use engine::ui::Point2;
use serde::{Deserialize, Serialize};

/// Stroke width for hole outlines.
pub const HOLE_LINE_WIDTH: f32 = 2.0;
/// Rectangles are `size` wide and this fraction of `size` tall.
pub const RECTANGLE_ASPECT: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeColor {
    Red,
    Blue,
    Green,
    Yellow,
    Pink,
    Purple,
}

impl ShapeColor {
    pub const ALL: [ShapeColor; 6] = [
        ShapeColor::Red,
        ShapeColor::Blue,
        ShapeColor::Green,
        ShapeColor::Yellow,
        ShapeColor::Pink,
        ShapeColor::Purple,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeColor::Red => "red",
            ShapeColor::Blue => "blue",
            ShapeColor::Green => "green",
            ShapeColor::Yellow => "yellow",
            ShapeColor::Pink => "pink",
            ShapeColor::Purple => "purple",
        }
    }

    /// CSS named-color values.
    pub fn rgba(self) -> Color {
        match self {
            ShapeColor::Red => [255, 0, 0, 255],
            ShapeColor::Blue => [0, 0, 255, 255],
            ShapeColor::Green => [0, 128, 0, 255],
            ShapeColor::Yellow => [255, 255, 0, 255],
            ShapeColor::Pink => [255, 192, 203, 255],
            ShapeColor::Purple => [128, 0, 128, 255],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    Square,
    Rectangle,
    Triangle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Rectangle,
        ShapeKind::Triangle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Triangle => "triangle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Solid,
    Hole,
}

/// Resolved geometry of a shape at its current position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outline {
    Circle { center: Point2, radius: f32 },
    Quad([Point2; 4]),
    Triangle([Point2; 3]),
}

impl Outline {
    fn points(&self) -> &[Point2] {
        match self {
            Outline::Circle { .. } => &[],
            Outline::Quad(points) => points,
            Outline::Triangle(points) => points,
        }
    }
}

fn centered_quad(center: Point2, half_w: f32, half_h: f32) -> [Point2; 4] {
    [
        center.offset(-half_w, -half_h),
        center.offset(half_w, -half_h),
        center.offset(half_w, half_h),
        center.offset(-half_w, half_h),
    ]
}

/// A draggable piece or the hole it belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub pos: Point2,
    pub color: ShapeColor,
    pub kind: ShapeKind,
    pub size: f32,
    pub role: Role,
    pub dragging: bool,
}

impl Shape {
    pub fn solid(pos: Point2, color: ShapeColor, kind: ShapeKind, size: f32) -> Self {
        Self {
            pos,
            color,
            kind,
            size,
            role: Role::Solid,
            dragging: false,
        }
    }

    pub fn hole(pos: Point2, color: ShapeColor, kind: ShapeKind, size: f32) -> Self {
        Self {
            role: Role::Hole,
            ..Self::solid(pos, color, kind, size)
        }
    }

    pub fn is_hole(&self) -> bool {
        self.role == Role::Hole
    }

    /// Same color and kind; position and role are ignored.
    pub fn matches(&self, other: &Shape) -> bool {
        self.color == other.color && self.kind == other.kind
    }

    /// Strict circular proximity test, regardless of the shape's silhouette.
    pub fn within(&self, point: Point2, radius: f32) -> bool {
        self.pos.distance(point) < radius
    }

    pub fn outline(&self) -> Outline {
        let h = self.size * 0.5;
        match self.kind {
            ShapeKind::Circle => Outline::Circle {
                center: self.pos,
                radius: h,
            },
            ShapeKind::Square => Outline::Quad(centered_quad(self.pos, h, h)),
            ShapeKind::Rectangle => {
                Outline::Quad(centered_quad(self.pos, h, h * RECTANGLE_ASPECT))
            }
            ShapeKind::Triangle => Outline::Triangle([
                self.pos.offset(0.0, -h),
                self.pos.offset(-h, h),
                self.pos.offset(h, h),
            ]),
        }
    }

    /// Holes are stroked, solids are filled.
    pub fn draw(&self, gfx: &mut dyn Renderer2d) {
        let color = self.color.rgba();
        match (self.outline(), self.role) {
            (Outline::Circle { center, radius }, Role::Solid) => {
                gfx.fill_circle(center, radius, color);
            }
            (Outline::Circle { center, radius }, Role::Hole) => {
                gfx.circle_outline(center, radius, HOLE_LINE_WIDTH, color);
            }
            (outline, Role::Solid) => gfx.fill_polygon(outline.points(), color),
            (outline, Role::Hole) => {
                gfx.polygon_outline(outline.points(), HOLE_LINE_WIDTH, color);
            }
        }
    }

    /// Snaps to the pointer while dragged.
    pub fn follow(&mut self, pointer: Point2) {
        if self.dragging {
            self.pos = pointer;
        }
    }

    pub fn update(&mut self, pointer: Point2, gfx: &mut dyn Renderer2d) {
        self.follow(pointer);
        self.draw(gfx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::graphics::CpuRenderer;
    use engine::surface::SurfaceSize;

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * width + x) * 4) as usize;
        [frame[idx], frame[idx + 1], frame[idx + 2], frame[idx + 3]]
    }

    #[test]
    fn rectangle_is_wider_than_tall() {
        let shape = Shape::solid(
            Point2::new(50.0, 50.0),
            ShapeColor::Blue,
            ShapeKind::Rectangle,
            40.0,
        );
        let Outline::Quad(points) = shape.outline() else {
            panic!("rectangle should be a quad");
        };
        let width = points[1].x - points[0].x;
        let height = points[2].y - points[1].y;
        assert_eq!(width, 40.0);
        assert_eq!(height, 24.0);
    }

    #[test]
    fn solid_fills_and_hole_strokes() {
        let (w, h) = (60u32, 60u32);
        let mut frame = vec![0u8; (w * h * 4) as usize];
        let mut gfx = CpuRenderer::new(&mut frame, SurfaceSize::new(w, h));

        Shape::solid(Point2::new(15.0, 30.0), ShapeColor::Red, ShapeKind::Square, 20.0)
            .draw(&mut gfx);
        Shape::hole(Point2::new(45.0, 30.0), ShapeColor::Green, ShapeKind::Square, 20.0)
            .draw(&mut gfx);

        assert_eq!(pixel(&frame, w, 15, 30), ShapeColor::Red.rgba());
        assert_eq!(pixel(&frame, w, 45, 30), [0, 0, 0, 0]);
        assert_eq!(pixel(&frame, w, 45, 20), ShapeColor::Green.rgba());
    }

    #[test]
    fn triangle_apex_points_up() {
        let (w, h) = (40u32, 40u32);
        let mut frame = vec![0u8; (w * h * 4) as usize];
        let mut gfx = CpuRenderer::new(&mut frame, SurfaceSize::new(w, h));
        Shape::solid(Point2::new(20.0, 20.0), ShapeColor::Yellow, ShapeKind::Triangle, 30.0)
            .draw(&mut gfx);

        let yellow = ShapeColor::Yellow.rgba();
        // Near the base both corners are covered; near the apex only the middle.
        assert_eq!(pixel(&frame, w, 7, 33), yellow);
        assert_eq!(pixel(&frame, w, 32, 33), yellow);
        assert_eq!(pixel(&frame, w, 20, 7), yellow);
        assert_eq!(pixel(&frame, w, 7, 7), [0, 0, 0, 0]);
    }

    #[test]
    fn update_moves_only_dragged_shapes() {
        let (w, h) = (10u32, 10u32);
        let mut frame = vec![0u8; (w * h * 4) as usize];
        let mut gfx = CpuRenderer::new(&mut frame, SurfaceSize::new(w, h));

        let start = Point2::new(5.0, 5.0);
        let pointer = Point2::new(8.0, 2.0);
        let mut idle = Shape::solid(start, ShapeColor::Pink, ShapeKind::Circle, 4.0);
        let mut held = idle;
        held.dragging = true;

        idle.update(pointer, &mut gfx);
        held.update(pointer, &mut gfx);

        assert_eq!(idle.pos, start);
        assert_eq!(held.pos, pointer);
    }

    #[test]
    fn within_is_strict_euclidean() {
        let shape = Shape::solid(
            Point2::new(400.0, 300.0),
            ShapeColor::Red,
            ShapeKind::Circle,
            50.0,
        );
        assert!(shape.within(Point2::new(410.0, 305.0), 50.0));
        assert!(!shape.within(Point2::new(450.0, 300.0), 50.0));
        assert!(shape.within(Point2::new(449.0, 300.0), 50.0));
    }
}
