//! Windowing and GPU plumbing for the sheet viewer.
//!
//! The runner owns the window and event loop; an [`App`] owns everything it
//! draws and receives input already translated into gesture updates.

pub mod context;
pub mod pipeline;
pub mod runner;
pub mod texture;
pub mod uniforms;
pub mod vertex;

pub use context::GpuContext;
pub use pipeline::PipelinePreset;
pub use runner::{run, App};
pub use texture::SheetTexture;
pub use uniforms::FrameUniforms;
