use engine::input::{PointerEvent, PointerPhase};
use engine::ui::Point2;
use serde::{Deserialize, Serialize};

use crate::shape::{ShapeColor, ShapeKind};
use crate::spawner::Spawner;
use crate::world::World;

/// Radius used both to grab a shape and to decide it reached its hole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrabRadius {
    /// The shape's `size`.
    #[default]
    Full,
    /// Half the shape's `size`, for tighter play with small shapes.
    Half,
}

impl GrabRadius {
    pub fn for_size(self, size: f32) -> f32 {
        match self {
            GrabRadius::Full => size,
            GrabRadius::Half => size * 0.5,
        }
    }
}

/// When replacement pairs appear after a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Replenish {
    /// One spawn per matched pair, right away. Paired with `PairsPerSpawn::UpToThree` the world
    /// grows by about one pair per match, without limit.
    Immediate,
    /// Only once the last pair has been matched.
    #[default]
    WhenEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputRules {
    pub grab_radius: GrabRadius,
    /// Park the pointer on the grabbed shape so it doesn't jump before the first move.
    pub seed_pointer_on_grab: bool,
    pub replenish: Replenish,
}

impl Default for InputRules {
    fn default() -> Self {
        Self {
            grab_radius: GrabRadius::default(),
            seed_pointer_on_grab: true,
            replenish: Replenish::default(),
        }
    }
}

/// What a pointer event did to the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SorterEvent {
    DragStarted {
        index: usize,
        color: ShapeColor,
        kind: ShapeKind,
    },
    Matched {
        color: ShapeColor,
        kind: ShapeKind,
    },
    Dropped {
        index: usize,
    },
    Spawned {
        pairs: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    rules: InputRules,
}

impl InputHandler {
    pub fn new(rules: InputRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &InputRules {
        &self.rules
    }

    pub fn handle(
        &self,
        world: &mut World,
        spawner: &mut Spawner,
        event: PointerEvent,
    ) -> Vec<SorterEvent> {
        match event.phase {
            PointerPhase::Down => self.press(world, event.pos),
            PointerPhase::Move => {
                world.set_pointer(event.pos);
                Vec::new()
            }
            PointerPhase::Up => self.release(world, spawner),
        }
    }

    /// Every shape whose center is within reach of `at` starts dragging. Overlapping shapes are
    /// all picked up together.
    pub fn press(&self, world: &mut World, at: Point2) -> Vec<SorterEvent> {
        let mut events = Vec::new();
        let mut seed = None;
        for (index, shape) in world.shapes_mut().iter_mut().enumerate() {
            if !shape.within(at, self.rules.grab_radius.for_size(shape.size)) {
                continue;
            }
            shape.dragging = true;
            seed = Some(shape.pos);
            events.push(SorterEvent::DragStarted {
                index,
                color: shape.color,
                kind: shape.kind,
            });
        }
        if self.rules.seed_pointer_on_grab {
            if let Some(pos) = seed {
                world.set_pointer(pos);
            }
        }
        events
    }

    /// Drops everything being dragged. Pairs whose shape sits within reach of its hole are
    /// removed; the rest stay where they were last drawn.
    pub fn release(&self, world: &mut World, spawner: &mut Spawner) -> Vec<SorterEvent> {
        let mut events = Vec::new();
        let mut matched = Vec::new();
        for (index, (shape, hole)) in world.pairs_mut().enumerate() {
            if !shape.dragging {
                continue;
            }
            shape.dragging = false;
            let reach = self.rules.grab_radius.for_size(shape.size);
            if shape.within(hole.pos, reach) {
                matched.push(index);
            } else {
                events.push(SorterEvent::Dropped { index });
            }
        }

        // Highest index first so earlier indices stay valid.
        for &index in matched.iter().rev() {
            let Some((shape, _)) = world.remove_pair(index) else {
                continue;
            };
            world.record_match();
            tracing::info!(
                color = shape.color.name(),
                kind = shape.kind.name(),
                matched = world.matched(),
                "pair matched"
            );
            events.push(SorterEvent::Matched {
                color: shape.color,
                kind: shape.kind,
            });
            if self.rules.replenish == Replenish::Immediate {
                let pairs = spawner.spawn(world);
                events.push(SorterEvent::Spawned { pairs });
            }
        }

        if self.rules.replenish == Replenish::WhenEmpty && !matched.is_empty() && world.is_empty()
        {
            let pairs = spawner.spawn(world);
            events.push(SorterEvent::Spawned { pairs });
        }

        events
    }
}
