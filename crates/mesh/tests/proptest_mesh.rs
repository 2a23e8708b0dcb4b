//! Property-based tests for the sheet simulation using proptest
//!
//! These tests verify invariants hold across random inputs:
//! - No NaN or infinite positions/velocities under random touch sequences
//! - Topology link and index counts for any grid size
//! - Nearest-node anchoring for any node
//! - Freeze invariance

use glam::Vec2;
use mesh::{GridTopology, Mesh, MAX_TOUCHES};
use proptest::prelude::*;

// Test configuration
const GRID_WIDTH: usize = 16;
const VIEWPORT: (u32, u32) = (640, 480);
const SIMULATION_STEPS: usize = 30;

/// One input event of a random session.
#[derive(Clone, Debug)]
enum TouchEvent {
    Move { slot: usize, point: Vec2 },
    End { slot: usize },
    EndAll,
    Step,
}

/// Strategy to generate normalized points, slightly beyond the unit square
fn touch_point() -> impl Strategy<Value = Vec2> {
    (-0.2f32..1.2f32, -0.2f32..1.2f32).prop_map(|(x, y)| Vec2::new(x, y))
}

fn touch_event() -> impl Strategy<Value = TouchEvent> {
    prop_oneof![
        4 => (0..MAX_TOUCHES, touch_point()).prop_map(|(slot, point)| TouchEvent::Move { slot, point }),
        1 => (0..MAX_TOUCHES).prop_map(|slot| TouchEvent::End { slot }),
        1 => Just(TouchEvent::EndAll),
        4 => Just(TouchEvent::Step),
    ]
}

fn create_test_mesh(home: f32, damping: f32) -> Mesh {
    let mut mesh = Mesh::new(GRID_WIDTH);
    mesh.initialize(VIEWPORT.0, VIEWPORT.1).unwrap();
    mesh.set_home_speed(home);
    mesh.set_damping(damping);
    mesh
}

fn apply(mesh: &mut Mesh, event: &TouchEvent) {
    match event {
        TouchEvent::Move { slot, point } => {
            mesh.touch_move(*slot, *point);
        }
        TouchEvent::End { slot } => mesh.touch_end(*slot),
        TouchEvent::EndAll => mesh.touch_end_all(),
        TouchEvent::Step => mesh.step(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_random_sessions_stay_finite(
        events in prop::collection::vec(touch_event(), 1..120),
        home in 0.0f32..=1.0,
        damping in 0.0f32..=1.0,
    ) {
        let mut mesh = create_test_mesh(home, damping);
        for event in &events {
            apply(&mut mesh, event);
        }
        for _ in 0..SIMULATION_STEPS {
            mesh.step();
        }

        for (i, p) in mesh.positions().iter().enumerate() {
            prop_assert!(p.is_finite(), "node {} position {:?}", i, p);
        }
        for (i, v) in mesh.velocities().iter().enumerate() {
            prop_assert!(v.is_finite(), "node {} velocity {:?}", i, v);
        }
        prop_assert!(mesh.vertices().iter().all(|v| v.position.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn prop_topology_counts(width in 2usize..40, height in 2usize..40) {
        let grid = GridTopology::new(width, height).unwrap();
        prop_assert_eq!(grid.node_count(), width * height);
        prop_assert_eq!(grid.link_count(), (width - 1) * height + width * (height - 1));
        prop_assert_eq!(grid.indices.len(), 6 * (width - 1) * (height - 1));
        prop_assert!(grid.indices.iter().all(|&i| (i as usize) < width * height));
    }

    #[test]
    fn prop_touch_on_node_anchors_it(x in 0usize..GRID_WIDTH, y_frac in 0.0f32..1.0) {
        let mut mesh = create_test_mesh(0.5, 0.5);
        let grid = mesh.grid().unwrap().clone();
        let y = ((grid.height - 1) as f32 * y_frac) as usize;

        let point = mesh.positions()[grid.idx(x, y)].truncate();
        prop_assert!(mesh.touch_move(0, point));

        let slot = mesh.touches().slot(0).unwrap();
        prop_assert_eq!((slot.anchor_x, slot.anchor_y), (x, y));
    }

    #[test]
    fn prop_frozen_mesh_never_moves(
        events in prop::collection::vec(touch_event(), 1..60),
    ) {
        let mut mesh = create_test_mesh(0.5, 0.5);
        mesh.touch_move(0, Vec2::new(0.4, 0.4));
        mesh.touch_move(0, Vec2::new(0.6, 0.3));
        mesh.step();
        mesh.set_frozen(true);

        let positions = mesh.positions().to_vec();
        let velocities = mesh.velocities().to_vec();
        for event in &events {
            apply(&mut mesh, event);
        }

        prop_assert_eq!(mesh.positions(), positions.as_slice());
        prop_assert_eq!(mesh.velocities(), velocities.as_slice());
    }
}
