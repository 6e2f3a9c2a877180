use engine::surface::SurfaceSize;
use sorter::shape::{ShapeColor, ShapeKind};
use sorter::spawner::{PairsPerSpawn, SpawnRules, Spawner};
use sorter::world::World;

fn rules(size: f32, pairs: PairsPerSpawn, avoid_overlap: bool) -> SpawnRules {
    SpawnRules {
        shape_size: size,
        pairs_per_spawn: pairs,
        avoid_overlap,
        ..SpawnRules::default()
    }
}

#[test]
fn spawned_positions_stay_inside_inset_bounds() {
    let bounds = SurfaceSize::new(800, 600);
    for seed in 0..200 {
        let mut spawner = Spawner::new(seed, rules(50.0, PairsPerSpawn::UpToThree, false), bounds);
        let mut world = World::new();
        spawner.spawn(&mut world);

        for shape in world.shapes().iter().chain(world.holes()) {
            assert!(
                (50.0..=750.0).contains(&shape.pos.x) && (50.0..=550.0).contains(&shape.pos.y),
                "seed {seed}: {:?} escaped the surface",
                shape.pos
            );
        }
    }
}

#[test]
fn pairs_share_color_kind_and_size() {
    let mut spawner = Spawner::new(
        3,
        rules(40.0, PairsPerSpawn::UpToThree, true),
        SurfaceSize::new(1024, 768),
    );
    let mut world = World::new();
    for _ in 0..10 {
        spawner.spawn(&mut world);
    }

    assert_eq!(world.shapes().len(), world.holes().len());
    for (shape, hole) in world.shapes().iter().zip(world.holes()) {
        assert!(!shape.is_hole());
        assert!(hole.is_hole());
        assert!(shape.matches(hole));
        assert_eq!(shape.size, hole.size);
        assert!(ShapeColor::ALL.contains(&shape.color));
        assert!(ShapeKind::ALL.contains(&shape.kind));
        assert!(!shape.dragging);
    }
}

#[test]
fn one_pair_policy_always_adds_exactly_one() {
    let mut spawner = Spawner::new(
        8,
        rules(30.0, PairsPerSpawn::One, false),
        SurfaceSize::new(800, 600),
    );
    let mut world = World::new();
    for n in 1..=20 {
        assert_eq!(spawner.spawn(&mut world), 1);
        assert_eq!(world.len(), n);
    }
}

#[test]
fn up_to_three_policy_covers_its_range() {
    let mut spawner = Spawner::new(
        21,
        rules(10.0, PairsPerSpawn::UpToThree, false),
        SurfaceSize::new(800, 600),
    );
    let mut seen = [false; 4];
    for _ in 0..200 {
        let mut world = World::new();
        let count = spawner.spawn(&mut world);
        assert!((1..=3).contains(&count));
        assert_eq!(world.len(), count);
        seen[count] = true;
    }
    assert_eq!(seen, [false, true, true, true]);
}

#[test]
fn overlap_avoidance_keeps_solids_apart() {
    let size = 20.0;
    for seed in 0..20 {
        let mut spawner = Spawner::new(
            seed,
            rules(size, PairsPerSpawn::UpToThree, true),
            SurfaceSize::new(1600, 1200),
        );
        let mut world = World::new();
        while world.len() < 10 {
            spawner.spawn(&mut world);
        }

        let shapes = world.shapes();
        for (i, a) in shapes.iter().enumerate() {
            for b in &shapes[i + 1..] {
                assert!(
                    a.pos.distance(b.pos) >= 2.0 * size,
                    "seed {seed}: {:?} and {:?} overlap",
                    a.pos,
                    b.pos
                );
            }
        }
    }
}

#[test]
fn resized_bounds_apply_to_new_spawns_only() {
    let mut spawner = Spawner::new(
        4,
        rules(25.0, PairsPerSpawn::One, false),
        SurfaceSize::new(2000, 2000),
    );
    let mut world = World::new();
    spawner.spawn(&mut world);
    let first = world.shapes()[0].pos;

    spawner.set_bounds(SurfaceSize::new(100, 100));
    for _ in 0..20 {
        spawner.spawn(&mut world);
    }

    assert_eq!(world.shapes()[0].pos, first);
    for shape in &world.shapes()[1..] {
        assert!((25.0..=75.0).contains(&shape.pos.x));
        assert!((25.0..=75.0).contains(&shape.pos.y));
    }
}
