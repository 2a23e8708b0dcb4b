//! Mesh state: node buffers, touches, parameters and the published vertex
//! snapshot a renderer uploads.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::constants::{DEFAULT_GRID_WIDTH, MAX_TOUCHES};
use crate::error::MeshError;
use crate::params::SimParams;
use crate::stepper;
use crate::topology::GridTopology;
use crate::touch::TouchTracker;

/// Vertex layout handed to the renderer: position then texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// Notifications for the UI layer, collected with [`Mesh::drain_events`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshEvent {
    /// Controls should show their default values again.
    ResetWidgets,
}

/// The simulated sheet.
///
/// Until [`Mesh::initialize`] succeeds the mesh has no nodes; stepping and
/// touches are ignored and the published buffer is empty.
pub struct Mesh {
    grid_width: usize,
    grid: Option<GridTopology>,
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    touches: TouchTracker,
    pub params: SimParams,
    published: Arc<[MeshVertex]>,
    generation: u64,
    events: Vec<MeshEvent>,
}

impl Mesh {
    /// Create an uninitialized mesh `grid_width` nodes across.
    pub fn new(grid_width: usize) -> Self {
        Self {
            grid_width,
            grid: None,
            positions: Vec::new(),
            velocities: Vec::new(),
            touches: TouchTracker::new(),
            params: SimParams::default(),
            published: Arc::from(Vec::new()),
            generation: 0,
            events: Vec::new(),
        }
    }

    /// Rebuild the lattice for a viewport and reset.
    ///
    /// On error the mesh is left uninitialized.
    pub fn initialize(&mut self, viewport_width: u32, viewport_height: u32) -> Result<(), MeshError> {
        let grid = match GridTopology::for_viewport(self.grid_width, viewport_width, viewport_height) {
            Ok(grid) => grid,
            Err(e) => {
                self.grid = None;
                self.positions.clear();
                self.velocities.clear();
                self.touches.touch_end_all();
                self.publish();
                return Err(e);
            }
        };

        log::info!(
            "Mesh {}x{} ({} nodes, {} triangles) for {}x{} viewport",
            grid.width,
            grid.height,
            grid.node_count(),
            grid.triangle_count(),
            viewport_width,
            viewport_height
        );

        self.positions = grid.rest_positions.clone();
        self.velocities = vec![Vec3::ZERO; grid.node_count()];
        self.grid = Some(grid);
        self.reset();
        Ok(())
    }

    /// Return to the Active state with all transient state cleared.
    pub fn reset(&mut self) {
        self.params = SimParams::default();
        self.touches.touch_end_all();

        if let Some(grid) = &self.grid {
            self.positions.copy_from_slice(&grid.rest_positions);
            self.velocities.fill(Vec3::ZERO);
        }

        self.events.push(MeshEvent::ResetWidgets);
        self.publish();
    }

    /// Advance one tick and publish. Does nothing while uninitialized or
    /// frozen.
    pub fn step(&mut self) {
        let Some(grid) = &self.grid else {
            return;
        };
        if stepper::step(
            grid,
            &self.touches,
            &self.params,
            &mut self.positions,
            &mut self.velocities,
        ) {
            self.publish();
        }
    }

    /// Touch-down or move for `slot` at a normalized point. Returns true if
    /// the slot was newly activated.
    pub fn touch_move(&mut self, slot: usize, point: Vec2) -> bool {
        let Some(grid) = &self.grid else {
            return false;
        };
        self.touches.touch_move(slot, point, &self.positions, grid.width)
    }

    /// Feed the current fingers of a multi-finger gesture, finger `i` in
    /// slot `i`. A `None` finger lies outside the sheet and leaves its slot
    /// untouched. Processing stops after the first finger that becomes newly
    /// active, so fingers join one per event.
    pub fn touch_points(&mut self, fingers: &[Option<Vec2>]) {
        for (slot, finger) in fingers.iter().take(MAX_TOUCHES).enumerate() {
            let Some(point) = finger else {
                continue;
            };
            if self.touch_move(slot, *point) {
                break;
            }
        }
    }

    pub fn touch_end(&mut self, slot: usize) {
        self.touches.touch_end(slot);
    }

    pub fn touch_end_all(&mut self) {
        self.touches.touch_end_all();
    }

    pub fn set_home_speed(&mut self, slider: f32) {
        self.params.set_home_speed(slider);
    }

    pub fn set_damping(&mut self, slider: f32) {
        self.params.set_damping(slider);
    }

    pub fn set_frozen(&mut self, frozen: bool) {
        self.params.frozen = frozen;
    }

    pub fn is_frozen(&self) -> bool {
        self.params.frozen
    }

    pub fn is_initialized(&self) -> bool {
        self.grid.is_some()
    }

    pub fn grid(&self) -> Option<&GridTopology> {
        self.grid.as_ref()
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn touches(&self) -> &TouchTracker {
        &self.touches
    }

    /// Fixed triangle list, empty until initialized.
    pub fn indices(&self) -> &[u16] {
        match &self.grid {
            Some(grid) => &grid.indices,
            None => &[],
        }
    }

    /// Latest published vertex snapshot. Never mutated after publication.
    pub fn vertices(&self) -> Arc<[MeshVertex]> {
        Arc::clone(&self.published)
    }

    /// Bumped on every publish.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn drain_events(&mut self) -> Vec<MeshEvent> {
        std::mem::take(&mut self.events)
    }

    /// Sum of squared xy distances from the rest lattice.
    pub fn displacement_sq(&self) -> f32 {
        self.grid.as_ref().map_or(0.0, |grid| {
            self.positions
                .iter()
                .zip(&grid.rest_positions)
                .map(|(p, r)| (p.truncate() - r.truncate()).length_squared())
                .sum()
        })
    }

    fn publish(&mut self) {
        let vertices: Vec<MeshVertex> = match &self.grid {
            Some(grid) => self
                .positions
                .iter()
                .zip(&grid.tex_coords)
                .map(|(p, t)| MeshVertex {
                    position: p.to_array(),
                    tex_coord: t.to_array(),
                })
                .collect(),
            None => Vec::new(),
        };
        self.published = Arc::from(vertices);
        self.generation += 1;
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_WIDTH)
    }
}
