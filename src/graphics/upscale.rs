//! Nearest-neighbor upscaling of the pixel buffer to the window.

use std::borrow::Cow;

use glamour::{Rect, Size2};
use imgref::ImgRef;

use super::{gpu::Frame, PREFERRED_TEXTURE_FORMAT};

/// Texture holding the composed pixel buffer and the pipeline drawing it scaled.
pub(crate) struct UpscaleState {
    /// Texture the pixel buffer gets uploaded to every frame.
    texture: wgpu::Texture,
    /// Size of the texture in pixels.
    size: Size2<u32>,
    bind_group: wgpu::BindGroup,
    render_pipeline: wgpu::RenderPipeline,
}

impl UpscaleState {
    /// Create the texture and the render pipeline.
    pub(crate) fn new(buffer_size: Size2<u32>, device: &wgpu::Device, shader: &'static str) -> Self {
        // Create the texture the pixel buffer will be copied into
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Pixel Buffer Texture"),
            size: wgpu::Extent3d {
                width: buffer_size.width,
                height: buffer_size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: PREFERRED_TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::COPY_DST | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Create the bind group layout for the texture and its sampler
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Upscale Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Nearest-neighbor so every pixel becomes a sharp square
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Upscale Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Upscale Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Upscale Render Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        // Load the shaders
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Upscale Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(shader)),
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Upscale Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                buffers: &[],
                module: &shader,
                entry_point: "vs_main",
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: PREFERRED_TEXTURE_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self {
            texture,
            size: buffer_size,
            bind_group,
            render_pipeline,
        }
    }

    /// Copy the pixel buffer into the texture.
    ///
    /// # Panics
    ///
    /// - When the size of the pixels doesn't match the texture.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn upload(&self, pixels: ImgRef<'_, [u8; 4]>, queue: &wgpu::Queue) {
        profiling::scope!("Upload pixel buffer");

        assert_eq!(
            (pixels.width() as u32, pixels.height() as u32),
            (self.size.width, self.size.height),
            "Pixel buffer doesn't match the texture size"
        );

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(pixels.buf()),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(pixels.stride() as u32 * 4),
                rows_per_image: Some(self.size.height),
            },
            wgpu::Extent3d {
                width: self.size.width,
                height: self.size.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Draw the texture inside the letterbox of the surface.
    ///
    /// Everything outside of the letterbox is cleared with the viewport color.
    pub(crate) fn render(&self, frame: &mut Frame, letterbox: Rect, viewport_color: wgpu::Color) {
        let mut render_pass = frame
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Upscale Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(viewport_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

        render_pass.set_pipeline(&self.render_pipeline);

        // Only draw in the calculated letterbox to get nice integer scaling
        let Rect { origin, size } = letterbox;
        render_pass.set_viewport(origin.x, origin.y, size.width, size.height, 0.0, 1.0);

        // Bind the pixel buffer texture
        render_pass.set_bind_group(0, &self.bind_group, &[]);

        // Draw the triangle defined in the vertex shader
        render_pass.draw(0..3, 0..1);
    }
}
