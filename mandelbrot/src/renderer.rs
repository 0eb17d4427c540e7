use std::iter;
use std::mem;
use std::sync::Arc;

use shared::{bytemuck, RenderParameters, Uniforms, ViewportSize};
use tracing::{debug, info};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::config::Config;
use crate::error::ViewerError;
use crate::overlay::OverlayFrame;
use crate::palette::{self, Palettes};
use crate::shader::{ShaderSource, ShaderStage};

const VERTICES: &[[f32; 2]] = &[[-1.0, 1.0], [-1.0, -1.0], [1.0, -1.0], [1.0, 1.0]];

const INDICES: &[u16] = &[0, 1, 2, 0, 2, 3];

/// Owns the GPU side: surface, fractal pipeline, palettes and the egui
/// paint backend. Lives on the thread that owns the window.
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    palettes: Palettes,
    viewport: ViewportSize,
    overlay: egui_wgpu::Renderer,
}

impl Renderer {
    pub fn new(window: Arc<Window>, settings: &Config) -> Result<Self, ViewerError> {
        let PhysicalSize { width, height } = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(ViewerError::NoAdapter)?;

        let info = adapter.get_info();
        info!(adapter = %info.name, backend = ?info.backend, "selected GPU adapter");

        // Zoom and pan need f64 in the shader; single precision falls apart
        // long before useful magnifications.
        let features = wgpu::Features::PUSH_CONSTANTS | wgpu::Features::SHADER_F64;
        let missing = features - adapter.features();
        if !missing.is_empty() {
            return Err(ViewerError::MissingFeatures(missing));
        }

        let limits = wgpu::Limits {
            max_push_constant_size: 128,
            ..wgpu::Limits::default().using_resolution(adapter.limits())
        };
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("mandelbrot"),
                required_features: features,
                required_limits: limits,
            },
            None,
        ))?;

        let mut config = surface
            .get_default_config(&adapter, width.max(1), height.max(1))
            .ok_or(ViewerError::UnsupportedSurface)?;
        if let Some(format) = surface
            .get_capabilities(&adapter)
            .formats
            .into_iter()
            .find(|format| format.is_srgb())
        {
            config.format = format;
        }
        config.present_mode = wgpu::PresentMode::AutoVsync;
        surface.configure(&device, &config);

        let vertex = ShaderSource::load(ShaderStage::Vertex, &settings.vertex_shader())?;
        let fragment = ShaderSource::load(ShaderStage::Fragment, &settings.fragment_shader())?;
        let uniforms = fragment.uniform_layout()?;
        let vertex_module = vertex.compile(&device)?;
        let fragment_module = fragment.compile(&device)?;

        let images = palette::load_all(&settings.palettes())?;
        let palettes = Palettes::upload(&device, &queue, &images)?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad vertices"),
            contents: bytemuck::cast_slice(VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad indices"),
            contents: bytemuck::cast_slice(INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let push_constant_range = wgpu::PushConstantRange {
            stages: wgpu::ShaderStages::FRAGMENT,
            range: 0..uniforms.size,
        };

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mandelbrot"),
            bind_group_layouts: &[palettes.layout()],
            push_constant_ranges: &[push_constant_range],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mandelbrot"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: vertex.entry_point(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x2,
                    }],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: fragment.entry_point(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let overlay = egui_wgpu::Renderer::new(&device, config.format, None, 1);

        Ok(Self {
            surface,
            device,
            queue,
            viewport: ViewportSize::new(config.width, config.height),
            config,
            pipeline,
            vertex_buffer,
            index_buffer,
            palettes,
            overlay,
        })
    }

    /// Follows a window resize. The surface, and with it the viewport the
    /// draw call covers, is only reconfigured for a non-empty size.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.viewport = ViewportSize::new(size.width, size.height);
        if self.viewport.is_empty() {
            return;
        }

        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        debug!(width = size.width, height = size.height, "resized surface");
    }

    /// Reapplies the current configuration after the surface was lost.
    pub fn reconfigure(&mut self) {
        if !self.viewport.is_empty() {
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn next_palette(&mut self) -> usize {
        self.palettes.advance()
    }

    /// Draws one frame: the fractal over the whole surface, then the overlay
    /// if there is one.
    pub fn render(
        &mut self,
        params: &RenderParameters,
        overlay: Option<OverlayFrame>,
    ) -> Result<(), wgpu::SurfaceError> {
        if self.viewport.is_empty() {
            return Ok(());
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        let uniforms = Uniforms::new(params, self.palettes.index(), self.viewport);

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mandelbrot"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });

            render_pass.set_viewport(
                0.0,
                0.0,
                self.viewport.width as f32,
                self.viewport.height as f32,
                0.0,
                1.0,
            );
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, self.palettes.active(), &[]);
            render_pass.set_push_constants(
                wgpu::ShaderStages::FRAGMENT,
                0,
                bytemuck::bytes_of(&uniforms),
            );
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..INDICES.len() as u32, 0, 0..1);
        }

        let overlay_buffers = match overlay {
            Some(frame) => self.draw_overlay(&mut encoder, &view, frame),
            None => Vec::new(),
        };

        self.queue
            .submit(overlay_buffers.into_iter().chain(iter::once(encoder.finish())));
        output.present();

        Ok(())
    }

    fn draw_overlay(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        frame: OverlayFrame,
    ) -> Vec<wgpu::CommandBuffer> {
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: frame.pixels_per_point,
        };

        for (id, delta) in &frame.textures.set {
            self.overlay
                .update_texture(&self.device, &self.queue, *id, delta);
        }

        let buffers = self.overlay.update_buffers(
            &self.device,
            &self.queue,
            encoder,
            &frame.primitives,
            &screen,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });

            self.overlay
                .render(&mut render_pass, &frame.primitives, &screen);
        }

        for id in &frame.textures.free {
            self.overlay.free_texture(id);
        }

        buffers
    }
}
