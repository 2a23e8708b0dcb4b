//! Per-tick sheet dynamics.
//!
//! A tick runs four phases in order, each over the whole node or touch set:
//!
//! 1. touch forcing - nodes around each finger are blended towards the
//!    finger position plus their lattice offset from the anchor node
//! 2. homing - velocities are pulled towards the rest lattice
//! 3. constraint relaxation - symmetric impulses restore link lengths
//! 4. integration - positions advance by velocity, velocity is damped
//!
//! Velocities are in per-tick displacement units, so there is no `dt`.

use glam::{Vec2, Vec3};

use crate::constants::{LINK_STIFFNESS, TOUCH_REACH};
use crate::params::SimParams;
use crate::topology::{GridTopology, Link};
use crate::touch::TouchTracker;

/// Weight of a touch on a node `(dx, dy)` lattice steps from its anchor.
///
/// Exactly 1 on the anchor, inverse-square beyond, never above 1.
#[inline]
pub fn influence_ratio(dx: i32, dy: i32) -> f32 {
    if dx == 0 && dy == 0 {
        return 1.0;
    }
    let dist_sq = (dx * dx + dy * dy) as f32;
    (TOUCH_REACH / dist_sq).min(1.0)
}

/// Phase 1: drag the neighbourhood of every active touch as a soft patch.
///
/// Only in-bounds offsets are visited. Touches compound in slot order.
pub fn apply_touch_forcing(grid: &GridTopology, touches: &TouchTracker, positions: &mut [Vec3]) {
    let width = grid.width as i32;
    let height = grid.height as i32;

    for touch in touches.active() {
        let ax = touch.anchor_x as i32;
        let ay = touch.anchor_y as i32;

        for dy in -ay..height - ay {
            for dx in -ax..width - ax {
                let Some(index) = grid.index(ax + dx, ay + dy) else {
                    continue;
                };

                let ratio = influence_ratio(dx, dy);
                let target = touch.point + Vec2::new(dx as f32, dy as f32) * grid.spacing;

                let pos = &mut positions[index];
                pos.x += (target.x - pos.x) * ratio;
                pos.y += (target.y - pos.y) * ratio;
            }
        }
    }
}

/// Phase 2: aim velocity towards the rest position. z is left alone.
pub fn apply_homing(grid: &GridTopology, home_speed: f32, positions: &[Vec3], velocities: &mut [Vec3]) {
    for ((vel, pos), rest) in velocities
        .iter_mut()
        .zip(positions)
        .zip(&grid.rest_positions)
    {
        vel.x -= home_speed * (pos.x - rest.x);
        vel.y -= home_speed * (pos.y - rest.y);
    }
}

/// Phase 3: symmetric impulses along every stored link towards its rest
/// length. Coincident nodes are skipped.
pub fn relax_constraints(grid: &GridTopology, positions: &[Vec3], velocities: &mut [Vec3]) {
    for (a, links) in grid.links.iter().enumerate() {
        for link in Link::ALL {
            let Some(b) = links.get(link) else {
                continue;
            };

            let delta = positions[a] - positions[b];
            let actual = delta.length();
            if actual == 0.0 {
                continue;
            }

            let desired = grid.rest_length(link);
            let correction = delta * (LINK_STIFFNESS * (desired - actual) / actual);

            velocities[a] += correction;
            velocities[b] -= correction;
        }
    }
}

/// Phase 4: semi-implicit Euler with damping.
pub fn integrate(damping: f32, positions: &mut [Vec3], velocities: &mut [Vec3]) {
    for (pos, vel) in positions.iter_mut().zip(velocities.iter_mut()) {
        *pos += *vel;
        *vel *= damping;
    }
}

/// Run one tick. Returns false (and touches nothing) while frozen.
pub fn step(
    grid: &GridTopology,
    touches: &TouchTracker,
    params: &SimParams,
    positions: &mut [Vec3],
    velocities: &mut [Vec3],
) -> bool {
    if params.frozen {
        return false;
    }
    debug_assert_eq!(positions.len(), grid.node_count());
    debug_assert_eq!(velocities.len(), grid.node_count());

    apply_touch_forcing(grid, touches, positions);
    apply_homing(grid, params.home_speed, positions, velocities);
    relax_constraints(grid, positions, velocities);
    integrate(params.damping, positions, velocities);
    true
}
