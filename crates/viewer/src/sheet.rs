//! The sheet viewer: owns the mesh, its GPU buffers and the widget state.

use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use mesh::{GesturePhase, GestureSession, Mesh, MeshConfig, Viewport};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalPosition;
use winit::keyboard::KeyCode;

use crate::app::texture::{default_image, load_rgba};
use crate::app::vertex::mesh_vertex_layout;
use crate::app::{App, FrameUniforms, GpuContext, PipelinePreset, SheetTexture};
use crate::controls::{ControlAction, Controls};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.03,
    a: 1.0,
};

/// GPU copies of one grid layout. Rebuilt whenever the grid changes.
struct SheetBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    line_buffer: wgpu::Buffer,
    line_count: u32,
    node_count: usize,
    /// Mesh generation last uploaded.
    generation: Option<u64>,
}

impl SheetBuffers {
    fn new(ctx: &GpuContext, mesh: &Mesh) -> Option<Self> {
        let grid = mesh.grid()?;
        let lines = grid.line_indices();

        let vertex_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sheet_vertices"),
            size: (grid.node_count() * std::mem::size_of::<mesh::MeshVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let index_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("sheet_indices"),
                contents: bytemuck::cast_slice(&grid.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        let line_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("sheet_links"),
                contents: bytemuck::cast_slice(&lines),
                usage: wgpu::BufferUsages::INDEX,
            });

        Some(Self {
            vertex_buffer,
            index_buffer,
            index_count: grid.indices.len() as u32,
            line_buffer,
            line_count: lines.len() as u32,
            node_count: grid.node_count(),
            generation: None,
        })
    }
}

pub struct SheetApp {
    config: MeshConfig,
    mesh: Mesh,
    controls: Controls,
    gesture: GestureSession,
    viewport: Viewport,
    sheet_pipeline: wgpu::RenderPipeline,
    lines_pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    texture: SheetTexture,
    buffers: Option<SheetBuffers>,
}

impl SheetApp {
    fn initialize_mesh(&mut self) {
        if let Err(e) = self.mesh.initialize(self.viewport.width, self.viewport.height) {
            log::error!("Cannot build sheet for {:?}: {e}", self.viewport);
        }
        self.gesture = GestureSession::new();
        self.buffers = None;
    }

    fn set_texture(&mut self, ctx: &GpuContext, path: &Path) {
        match load_rgba(path) {
            Ok(img) => {
                self.texture = SheetTexture::from_image(ctx, &self.texture_layout, img);
                self.mesh.reset();
                self.controls.sync_events(&mut self.mesh);
            }
            Err(e) => log::error!("Failed to load texture {}: {e}", path.display()),
        }
    }
}

impl App for SheetApp {
    type Settings = MeshConfig;

    fn init(ctx: &GpuContext, config: MeshConfig) -> Self {
        let texture_layout = SheetTexture::bind_group_layout(&ctx.device);
        let image = match &config.texture_path {
            Some(path) => load_rgba(path).unwrap_or_else(|e| {
                log::error!("Failed to load texture {}: {e}", path.display());
                default_image()
            }),
            None => default_image(),
        };
        let texture = SheetTexture::from_image(ctx, &texture_layout, image);

        let sheet_pipeline = ctx.create_pipeline(
            PipelinePreset::Sheet,
            include_str!("shaders/mesh.wgsl"),
            &[mesh_vertex_layout()],
            &[&texture_layout],
        );
        let lines_pipeline = ctx.create_pipeline(
            PipelinePreset::Lines,
            include_str!("shaders/links.wgsl"),
            &[mesh_vertex_layout()],
            &[],
        );

        let (width, height) = ctx.size();
        let mut app = Self {
            mesh: config.build_mesh(),
            controls: Controls::from_config(&config),
            config,
            gesture: GestureSession::new(),
            viewport: Viewport::new(width, height),
            sheet_pipeline,
            lines_pipeline,
            texture_layout,
            texture,
            buffers: None,
        };

        app.initialize_mesh();
        // Startup sliders come from the config rather than the reset defaults.
        app.mesh.drain_events();
        app.config.apply_sliders(&mut app.mesh);
        app
    }

    fn tick(&mut self) {
        self.mesh.step();
    }

    fn tick_interval(&self) -> Duration {
        self.config.tick_interval()
    }

    fn update(&mut self, ctx: &GpuContext) {
        ctx.update_frame_uniforms(&FrameUniforms::new(&self.controls.adjustments));

        if !self.mesh.is_initialized() {
            self.buffers = None;
            return;
        }
        let stale = self
            .buffers
            .as_ref()
            .map_or(true, |b| b.node_count != self.mesh.node_count());
        if stale {
            self.buffers = SheetBuffers::new(ctx, &self.mesh);
        }

        if let Some(buffers) = &mut self.buffers {
            let generation = self.mesh.generation();
            if buffers.generation != Some(generation) {
                let vertices = self.mesh.vertices();
                ctx.queue
                    .write_buffer(&buffers.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
                buffers.generation = Some(generation);
            }
        }
    }

    fn render(
        &mut self,
        ctx: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sheet_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let Some(buffers) = &self.buffers else {
            return;
        };

        pass.set_pipeline(&self.sheet_pipeline);
        pass.set_bind_group(0, &ctx.frame.bind_group, &[]);
        pass.set_bind_group(1, &self.texture.bind_group, &[]);
        pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
        pass.set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..buffers.index_count, 0, 0..1);

        if self.controls.show_links {
            pass.set_pipeline(&self.lines_pipeline);
            pass.set_bind_group(0, &ctx.frame.bind_group, &[]);
            pass.set_index_buffer(buffers.line_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..buffers.line_count, 0, 0..1);
        }
    }

    fn on_key(&mut self, key: KeyCode, pressed: bool) {
        if !pressed {
            return;
        }
        if let Some(action) = ControlAction::from_key(key) {
            if self.controls.apply(action, &mut self.mesh) {
                self.gesture = GestureSession::new();
            }
        }
    }

    fn on_resize(&mut self, ctx: &GpuContext) {
        let (width, height) = ctx.size();
        let viewport = Viewport::new(width, height);
        if viewport == self.viewport && self.mesh.is_initialized() {
            return;
        }
        self.viewport = viewport;
        self.initialize_mesh();
        self.controls.sync_events(&mut self.mesh);
    }

    fn on_pointer(&mut self, phase: GesturePhase, points: &[PhysicalPosition<f64>]) {
        let fingers: Vec<Option<Vec2>> = points
            .iter()
            .map(|p| self.viewport.normalize(p.x, p.y))
            .collect();
        self.gesture.update_fingers(&mut self.mesh, phase, &fingers);
    }

    fn on_file_dropped(&mut self, ctx: &GpuContext, path: &Path) {
        self.set_texture(ctx, path);
    }

    fn status(&self) -> Option<String> {
        Some(self.controls.summary())
    }

    fn title() -> &'static str {
        "Sheet"
    }
}
