use engine::{
    GameLogic,
    graphics::Renderer2d,
    regression::{first_divergence, render_hashes_for_inputs},
    surface::SurfaceSize,
    ui::Point2,
};

#[derive(Debug, Clone)]
struct DotGame;

#[derive(Debug, Clone, Copy)]
struct MoveDot {
    dx: f32,
    dy: f32,
}

impl GameLogic for DotGame {
    type State = Point2;
    type Input = MoveDot;

    fn initial_state(&self) -> Self::State {
        Point2::new(8.0, 8.0)
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        state.offset(input.dx, input.dy)
    }
}

fn draw_dot(state: &Point2, gfx: &mut dyn Renderer2d) {
    gfx.clear([0, 0, 0, 255]);
    gfx.fill_circle(*state, 3.0, [255, 255, 0, 255]);
}

const SIZE: SurfaceSize = SurfaceSize::new(32, 32);

#[test]
fn same_script_hashes_identically() {
    let script = [
        MoveDot { dx: 4.0, dy: 0.0 },
        MoveDot { dx: 0.0, dy: 4.0 },
        MoveDot { dx: -2.0, dy: 1.0 },
    ];

    let a = render_hashes_for_inputs(DotGame, script, SIZE, draw_dot);
    let b = render_hashes_for_inputs(DotGame, script, SIZE, draw_dot);

    assert_eq!(a.len(), 4, "initial state plus one per input");
    assert_eq!(first_divergence(&a, &b), None);
}

#[test]
fn moved_dot_changes_frame_hash() {
    let a = render_hashes_for_inputs(DotGame, [MoveDot { dx: 4.0, dy: 0.0 }], SIZE, draw_dot);
    let b = render_hashes_for_inputs(DotGame, [MoveDot { dx: 0.0, dy: 0.0 }], SIZE, draw_dot);

    assert_eq!(a[0], b[0]);
    assert_eq!(first_divergence(&a, &b), Some(1));
}
