use wgpu::{
    BindGroupLayout, BlendState, ColorTargetState, ColorWrites, Face, FrontFace,
    PrimitiveState, PrimitiveTopology, RenderPipeline, TextureFormat, VertexBufferLayout,
};

use super::context::GpuContext;

const VERTEX_ENTRY: &str = "vs_main";
const FRAGMENT_ENTRY: &str = "fs_main";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelinePreset {
    /// Textured triangles, clockwise front faces, back faces culled.
    Sheet,
    /// Link overlay drawn over the sheet.
    Lines,
}

impl PipelinePreset {
    fn label(self) -> &'static str {
        match self {
            PipelinePreset::Sheet => "sheet_pipeline",
            PipelinePreset::Lines => "lines_pipeline",
        }
    }

    /// Grid triangles wind clockwise with y up.
    fn primitive(self) -> PrimitiveState {
        let (topology, cull_mode) = match self {
            PipelinePreset::Sheet => (PrimitiveTopology::TriangleList, Some(Face::Back)),
            PipelinePreset::Lines => (PrimitiveTopology::LineList, None),
        };
        PrimitiveState {
            topology,
            front_face: FrontFace::Cw,
            cull_mode,
            ..Default::default()
        }
    }

    fn color_target(self, format: TextureFormat) -> ColorTargetState {
        let blend = match self {
            PipelinePreset::Sheet => None,
            PipelinePreset::Lines => Some(BlendState::ALPHA_BLENDING),
        };
        ColorTargetState {
            format,
            blend,
            write_mask: ColorWrites::ALL,
        }
    }
}

impl GpuContext {
    /// Build a pipeline whose group 0 is the frame uniforms, followed by
    /// `extra_layouts`. Shaders export `vs_main` and `fs_main`.
    pub fn create_pipeline(
        &self,
        preset: PipelinePreset,
        wgsl: &str,
        vertex_layouts: &[VertexBufferLayout],
        extra_layouts: &[&BindGroupLayout],
    ) -> RenderPipeline {
        let label = Some(preset.label());
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label,
                source: wgpu::ShaderSource::Wgsl(wgsl.into()),
            });

        let layouts: Vec<&BindGroupLayout> = std::iter::once(&self.frame.layout)
            .chain(extra_layouts.iter().copied())
            .collect();
        let layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label,
                bind_group_layouts: &layouts,
                push_constant_ranges: &[],
            });

        let targets = [Some(preset.color_target(self.config.format))];
        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label,
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some(VERTEX_ENTRY),
                    compilation_options: Default::default(),
                    buffers: vertex_layouts,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some(FRAGMENT_ENTRY),
                    compilation_options: Default::default(),
                    targets: &targets,
                }),
                primitive: preset.primitive(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
    }
}
