//! Touch-driven mass-spring sheet simulation.
//!
//! A regular grid of point masses linked to their down/right neighbours is
//! dragged around by up to [`MAX_TOUCHES`] fingers, pulled back towards its
//! rest lattice, relaxed along its links and damped every tick. The result is
//! published as a flat vertex buffer for a renderer to draw as a textured
//! surface.
//!
//! This crate is framework-agnostic - it handles simulation only.
//! Use the `viewer` crate for windowing and GPU rendering.
//!
//! # Example
//!
//! ```
//! use mesh::Mesh;
//! use glam::Vec2;
//!
//! let mut mesh = Mesh::new(60);
//! mesh.initialize(800, 600).unwrap();
//!
//! mesh.touch_move(0, Vec2::new(0.5, 0.5));
//! for _ in 0..10 {
//!     mesh.step();
//! }
//!
//! let frame = mesh.vertices();
//! assert_eq!(frame.len(), mesh.node_count());
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod gesture;
#[allow(clippy::module_inception)]
pub mod mesh;
pub mod params;
pub mod stepper;
pub mod topology;
pub mod touch;

pub use config::MeshConfig;
pub use constants::{DEFAULT_GRID_WIDTH, MAX_TOUCHES};
pub use error::MeshError;
pub use gesture::{GesturePhase, GestureSession, Viewport};
pub use glam::{Vec2, Vec3};
pub use mesh::{Mesh, MeshEvent, MeshVertex};
pub use params::{ImageAdjustments, ParamRange, SimParams};
pub use topology::{GridTopology, Link, NodeLinks};
pub use touch::{TouchSlot, TouchTracker};
