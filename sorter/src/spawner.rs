use engine::surface::SurfaceSize;
use engine::ui::Point2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::shape::{Shape, ShapeColor, ShapeKind};
use crate::world::World;

pub const DEFAULT_SHAPE_SIZE: f32 = 100.0;
pub const DEFAULT_MAX_SPAWN_ATTEMPTS: u32 = 64;
pub const MAX_SHAPE_SIZE: f32 = 8192.0;
const MIN_SHAPE_SIZE: f32 = 4.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairsPerSpawn {
    One,
    #[default]
    UpToThree,
}

impl PairsPerSpawn {
    pub fn max(self) -> usize {
        match self {
            PairsPerSpawn::One => 1,
            PairsPerSpawn::UpToThree => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRules {
    pub shape_size: f32,
    /// Sizes are drawn from `shape_size ± size_jitter`; zero keeps every shape the same size.
    /// Jitter is capped at half the base size.
    pub size_jitter: f32,
    pub pairs_per_spawn: PairsPerSpawn,
    pub avoid_overlap: bool,
    pub max_attempts: u32,
}

impl Default for SpawnRules {
    fn default() -> Self {
        Self {
            shape_size: DEFAULT_SHAPE_SIZE,
            size_jitter: 0.0,
            pairs_per_spawn: PairsPerSpawn::default(),
            avoid_overlap: true,
            max_attempts: DEFAULT_MAX_SPAWN_ATTEMPTS,
        }
    }
}

/// Valid centers on one axis: `[size, dim - size]`, or `None` when the axis is too short.
pub fn position_range(dim: u32, size: f32) -> Option<(f32, f32)> {
    let hi = dim as f32 - size;
    (hi >= size).then_some((size, hi))
}

/// Seeded generator of shape/hole pairs.
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: StdRng,
    rules: SpawnRules,
    bounds: SurfaceSize,
}

impl Spawner {
    pub fn new(seed: u64, rules: SpawnRules, bounds: SurfaceSize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            rules,
            bounds,
        }
    }

    pub fn rules(&self) -> &SpawnRules {
        &self.rules
    }

    pub fn bounds(&self) -> SurfaceSize {
        self.bounds
    }

    /// New spawns use the new bounds; existing shapes stay where they are.
    pub fn set_bounds(&mut self, bounds: SurfaceSize) {
        self.bounds = bounds;
    }

    /// Adds between one and `pairs_per_spawn.max()` pairs. Returns how many were added.
    pub fn spawn(&mut self, world: &mut World) -> usize {
        let count = self.rng.random_range(1..=self.rules.pairs_per_spawn.max());
        for _ in 0..count {
            self.spawn_pair(world);
        }
        count
    }

    pub fn spawn_pair(&mut self, world: &mut World) {
        let color = ShapeColor::ALL[self.rng.random_range(0..ShapeColor::ALL.len())];
        let kind = ShapeKind::ALL[self.rng.random_range(0..ShapeKind::ALL.len())];
        let size = self.pick_size();

        let pos = if self.rules.avoid_overlap {
            self.place_clear_of(world, size)
        } else {
            self.random_position(size)
        };
        let hole_pos = self.random_position(size);

        tracing::debug!(
            color = color.name(),
            kind = kind.name(),
            size,
            x = pos.x,
            y = pos.y,
            hole_x = hole_pos.x,
            hole_y = hole_pos.y,
            "spawned pair"
        );
        world.push_pair(
            Shape::solid(pos, color, kind, size),
            Shape::hole(hole_pos, color, kind, size),
        );
    }

    fn pick_size(&mut self) -> f32 {
        let base = self.rules.shape_size.max(MIN_SHAPE_SIZE).min(MAX_SHAPE_SIZE);
        let jitter = self.rules.size_jitter.max(0.0).min(base * 0.5);
        if jitter == 0.0 {
            return base;
        }
        let lo = (base - jitter).max(MIN_SHAPE_SIZE);
        self.rng.random_range(lo..=base + jitter)
    }

    fn random_axis(&mut self, dim: u32, size: f32) -> f32 {
        match position_range(dim, size) {
            Some((lo, hi)) if hi > lo => self.rng.random_range(lo..=hi),
            Some((lo, _)) => lo,
            None => dim as f32 * 0.5,
        }
    }

    fn random_position(&mut self, size: f32) -> Point2 {
        let x = self.random_axis(self.bounds.width, size);
        let y = self.random_axis(self.bounds.height, size);
        Point2::new(x, y)
    }

    /// Rejection-samples a center at least `2 × size` from every live shape. Gives up after
    /// `max_attempts` and keeps the last candidate.
    fn place_clear_of(&mut self, world: &World, size: f32) -> Point2 {
        let attempts = self.rules.max_attempts.max(1);
        let mut candidate = self.random_position(size);
        for attempt in 1..=attempts {
            if attempt > 1 {
                candidate = self.random_position(size);
            }
            let blocked = world
                .shapes()
                .iter()
                .any(|s| s.pos.distance(candidate) < 2.0 * s.size.max(size));
            if !blocked {
                return candidate;
            }
        }
        tracing::warn!(
            attempts,
            live = world.len(),
            "no overlap-free spot found; accepting last candidate"
        );
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_range_insets_by_size() {
        assert_eq!(position_range(800, 50.0), Some((50.0, 750.0)));
        assert_eq!(position_range(100, 50.0), Some((50.0, 50.0)));
        assert_eq!(position_range(80, 50.0), None);
    }

    #[test]
    fn tiny_surface_centers_shapes() {
        let rules = SpawnRules {
            pairs_per_spawn: PairsPerSpawn::One,
            ..SpawnRules::default()
        };
        let mut spawner = Spawner::new(1, rules, SurfaceSize::new(60, 60));
        let mut world = World::new();
        spawner.spawn(&mut world);
        assert_eq!(world.shapes()[0].pos, Point2::new(30.0, 30.0));
        assert_eq!(world.holes()[0].pos, Point2::new(30.0, 30.0));
    }

    #[test]
    fn same_seed_spawns_same_world() {
        let bounds = SurfaceSize::new(800, 600);
        let mut a = Spawner::new(42, SpawnRules::default(), bounds);
        let mut b = Spawner::new(42, SpawnRules::default(), bounds);
        let (mut wa, mut wb) = (World::new(), World::new());
        for _ in 0..5 {
            a.spawn(&mut wa);
            b.spawn(&mut wb);
        }
        assert_eq!(wa, wb);
    }

    #[test]
    fn jitter_keeps_sizes_in_range() {
        let rules = SpawnRules {
            shape_size: 50.0,
            size_jitter: 20.0,
            avoid_overlap: false,
            ..SpawnRules::default()
        };
        let mut spawner = Spawner::new(9, rules, SurfaceSize::new(1000, 1000));
        let mut world = World::new();
        for _ in 0..40 {
            spawner.spawn(&mut world);
        }
        assert!(world.shapes().iter().all(|s| (30.0..=70.0).contains(&s.size)));
        assert!(world.shapes().iter().any(|s| s.size != 50.0));
        for (s, h) in world.shapes().iter().zip(world.holes()) {
            assert_eq!(s.size, h.size);
        }
    }

    #[test]
    fn oversized_rules_spawn_finite_shapes() {
        let rules = SpawnRules {
            shape_size: 3e38,
            size_jitter: 1e38,
            pairs_per_spawn: PairsPerSpawn::One,
            ..SpawnRules::default()
        };
        let mut spawner = Spawner::new(2, rules, SurfaceSize::new(800, 600));
        let mut world = World::new();
        spawner.spawn(&mut world);
        let size = world.shapes()[0].size;
        assert!(size.is_finite());
        assert!(size <= MAX_SHAPE_SIZE * 1.5);
    }

    #[test]
    fn exhausted_attempts_still_spawn() {
        // A 210x210 surface with size 50 has room for very few non-overlapping shapes.
        let rules = SpawnRules {
            shape_size: 50.0,
            pairs_per_spawn: PairsPerSpawn::One,
            max_attempts: 3,
            ..SpawnRules::default()
        };
        let mut spawner = Spawner::new(5, rules, SurfaceSize::new(210, 210));
        let mut world = World::new();
        for _ in 0..10 {
            spawner.spawn(&mut world);
        }
        assert_eq!(world.len(), 10);
    }
}
