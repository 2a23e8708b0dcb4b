//! Sheet texture: image loading, the fallback pattern and GPU upload.

use std::path::Path;

use image::{imageops::FilterType, Rgba, RgbaImage};

use super::context::GpuContext;

const CHECKER_SIZE: u32 = 512;
const CHECKER_CELLS: u32 = 16;

/// Decode an image file into RGBA8.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, Box<dyn std::error::Error>> {
    let img = image::open(path)?;
    log::info!("Loaded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img.to_rgba8())
}

/// Shrink `img` so neither side exceeds `max_dim`, keeping the aspect ratio.
pub fn fit_to_limit(img: RgbaImage, max_dim: u32) -> RgbaImage {
    if img.width() <= max_dim && img.height() <= max_dim {
        return img;
    }
    log::warn!(
        "Texture {}x{} exceeds the device limit of {max_dim}, downscaling",
        img.width(),
        img.height()
    );
    image::DynamicImage::ImageRgba8(img)
        .resize(max_dim, max_dim, FilterType::Triangle)
        .to_rgba8()
}

/// Two-tone checkerboard shown until an image is supplied.
pub fn checkerboard(size: u32, cells: u32) -> RgbaImage {
    let cell = (size / cells.max(1)).max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            Rgba([230, 190, 60, 255])
        } else {
            Rgba([40, 70, 140, 255])
        }
    })
}

pub fn default_image() -> RgbaImage {
    checkerboard(CHECKER_SIZE, CHECKER_CELLS)
}

pub struct SheetTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub bind_group: wgpu::BindGroup,
}

impl SheetTexture {
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sheet_texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                    count: None,
                },
            ],
        })
    }

    pub fn from_image(ctx: &GpuContext, layout: &wgpu::BindGroupLayout, img: RgbaImage) -> Self {
        let img = fit_to_limit(img, ctx.device.limits().max_texture_dimension_2d);
        let (width, height) = img.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("sheet_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &img,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sheet_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sheet_texture_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            texture,
            view,
            sampler,
            bind_group,
        }
    }
}
