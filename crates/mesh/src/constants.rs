//! Fixed constants of the sheet simulation.
//!
//! Tunable values (grid width, tick rate, slider positions) live in
//! [`crate::config::MeshConfig`]; everything here is part of the model.

/// Number of concurrent touch slots.
pub const MAX_TOUCHES: usize = 5;

/// Default number of nodes across the sheet. The vertical count follows the
/// viewport aspect ratio.
pub const DEFAULT_GRID_WIDTH: usize = 60;

/// Smallest lattice dimension; rest positions divide by `dim - 1`.
pub const MIN_GRID_DIM: usize = 2;

/// Upper bound on node count so every vertex is addressable by a `u16` index.
pub const MAX_NODES: usize = u16::MAX as usize + 1;

/// Link stiffness used by constraint relaxation. Not user tunable.
pub const LINK_STIFFNESS: f32 = 0.005;

/// Numerator of the inverse-square touch falloff. Bigger means a wider
/// region of the sheet follows the finger.
pub const TOUCH_REACH: f32 = 10.0;

/// Slider position every parameter returns to on reset.
pub const DEFAULT_SLIDER: f32 = 0.5;

/// Default interval between timer-driven ticks (milliseconds).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;
