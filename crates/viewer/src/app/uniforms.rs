use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use mesh::ImageAdjustments;

/// Per-frame constants shared by both shader stages.
///
/// Layout mirrors the WGSL `FrameUniforms` struct: a 64-byte matrix, four
/// adjustment floats, the effects flag and padding up to a 16-byte multiple.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub posterize: f32,
    pub effects_enabled: u32,
    pub _pad: [u32; 3],
}

impl FrameUniforms {
    /// The sheet lives in `[0, 1]^2`; map that square onto the whole surface.
    pub fn sheet_projection() -> Mat4 {
        Mat4::orthographic_rh(0.0, 1.0, 0.0, 1.0, -1.0, 1.0)
    }

    pub fn new(adjustments: &ImageAdjustments) -> Self {
        Self {
            view_proj: Self::sheet_projection().to_cols_array_2d(),
            brightness: adjustments.brightness,
            contrast: adjustments.contrast,
            saturation: adjustments.saturation,
            posterize: adjustments.posterize,
            effects_enabled: adjustments.effects_enabled as u32,
            _pad: [0; 3],
        }
    }
}
