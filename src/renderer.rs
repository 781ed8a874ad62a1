// renderer.rs — wgpu renderer: fullscreen ray-cast panorama sphere + egui chrome
//
// The sphere is never tessellated. A single fullscreen triangle unprojects
// every pixel into a world ray, intersects it with the sphere from the inside
// and samples both panorama slots, mixing them by the cross-fade blend.
//
// Equirect convention (see `Sphere::uv_of`): u runs +X -> +Z -> -X -> -Z
// as it goes 0 -> 0.25 -> 0.5 -> 0.75, v = 0 is straight up.

use crate::config::MAX_PANORAMAS;
use crate::error::{Result, ViewerError};
use crate::viewer::FrameState;
use image::{GenericImage, Rgba, RgbaImage};
use wgpu::util::DeviceExt;
use winit::window::Window;

fn setup_egui_ui_fonts(ctx: &egui::Context) {
    // CJK-capable font for non-Latin catalogs; egui's bundled fonts cover the rest.
    // ab_glyph rejects some .ttc collections, those candidates are skipped.
    let mut candidates: Vec<std::path::PathBuf> = Vec::new();

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|e| e.parent().map(|p| p.to_path_buf()));
    for dir in exe_dir.into_iter().chain([std::path::PathBuf::from(".")]) {
        candidates.push(dir.join("assets").join("NotoSansSC-Regular.otf"));
        candidates.push(dir.join("assets").join("NotoSansCJK-Regular.ttc"));
    }

    if cfg!(windows) {
        candidates.push(r"C:\Windows\Fonts\msyh.ttf".into());
        candidates.push(r"C:\Windows\Fonts\simhei.ttf".into());
    } else if cfg!(target_os = "macos") {
        candidates.push("/System/Library/Fonts/PingFang.ttc".into());
        candidates.push("/System/Library/Fonts/Hiragino Sans GB.ttc".into());
    } else {
        candidates.push("/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc".into());
        candidates.push("/usr/share/fonts/truetype/wqy/wqy-microhei.ttc".into());
    }

    let chosen = candidates.into_iter().find_map(|p| {
        let bytes = std::fs::read(&p).ok()?;
        ab_glyph::FontArc::try_from_vec(bytes.clone()).ok()?;
        Some((p, bytes))
    });

    let Some((font_path, font_bytes)) = chosen else {
        log::debug!("no CJK font found, using egui defaults");
        return;
    };
    log::info!("UI font: {}", font_path.display());

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("ui".to_owned(), egui::FontData::from_owned(font_bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        if let Some(list) = fonts.families.get_mut(&family) {
            // after egui's own fonts so Latin glyphs keep their look
            list.push("ui".to_owned());
        }
    }
    ctx.set_fonts(fonts);
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct FrameUniform {
    inv_view_proj: [[f32; 4]; 4],
    camera_position: [f32; 3],
    blend: f32,
    radius: f32,
    _pad: [f32; 3],
}

impl FrameUniform {
    fn from_frame(frame: &FrameState) -> Self {
        Self {
            inv_view_proj: frame.inv_view_proj.to_cols_array_2d(),
            camera_position: frame.camera_position.to_array(),
            blend: frame.blend,
            radius: frame.sphere_radius,
            _pad: [0.0; 3],
        }
    }

    fn zeroed_identity() -> Self {
        Self {
            inv_view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            camera_position: [0.0; 3],
            blend: 0.0,
            radius: 1.0,
            _pad: [0.0; 3],
        }
    }
}

struct PanoramaTexture {
    // kept alive for the view
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

pub struct Renderer {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: wgpu::RenderPipeline,

    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    panoramas: [PanoramaTexture; MAX_PANORAMAS],
    sampler: wgpu::Sampler,

    frame_buffer: wgpu::Buffer,

    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: &Window) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // SAFETY: the window outlives the renderer; main drops the session first.
        let surface = unsafe { instance.create_surface(window) }
            .map_err(|e| ViewerError::ContextUnavailable(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| ViewerError::ContextUnavailable("no compatible GPU adapter".into()))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| ViewerError::ContextUnavailable(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| ViewerError::ContextUnavailable("surface has no formats".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        // placeholder shown until the decoder thread delivers real images
        let panoramas = [
            placeholder_texture(&device, &queue, [40, 40, 48, 255]),
            placeholder_texture(&device, &queue, [48, 40, 40, 255]),
        ];

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::bytes_of(&FrameUniform::zeroed_identity()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                texture_entry(1),
                texture_entry(2),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("panorama_bind_group_layout"),
        });

        let bind_group = create_bind_group(
            &device,
            &bind_group_layout,
            &frame_buffer,
            &panoramas,
            &sampler,
        );

        let shader = device.create_shader_module(wgpu::include_wgsl!("shader_panorama.wgsl"));
        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Panorama Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Panorama Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
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
                cull_mode: None,
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

        let egui_ctx = egui::Context::default();
        setup_egui_ui_fonts(&egui_ctx);

        let mut egui_state = egui_winit::State::new(window);
        egui_state.set_pixels_per_point(window.scale_factor() as f32);

        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1);

        log::info!(
            "renderer ready: {:?} via {:?}",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            render_pipeline,
            bind_group_layout,
            bind_group,
            panoramas,
            sampler,
            frame_buffer,
            egui_ctx,
            egui_state,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn update_frame(&mut self, frame: &FrameState) {
        let uniform = FrameUniform::from_frame(frame);
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Upload an equirectangular image into `slot` (0 or 1).
    pub fn load_panorama(&mut self, slot: usize, img: RgbaImage) {
        if slot >= MAX_PANORAMAS {
            log::warn!("ignoring panorama for unknown slot {}", slot);
            return;
        }

        let max_dim = self.device.limits().max_texture_dimension_2d;
        let img = fit_equirect(img, max_dim);
        let (width, height) = img.dimensions();
        let texture_size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            size: texture_size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            label: Some("panorama_texture"),
            view_formats: &[],
        });

        self.queue.write_texture(
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
            texture_size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // the old texture drops here, after the new one is in place
        self.panoramas[slot] = PanoramaTexture {
            _texture: texture,
            view,
        };

        self.bind_group = create_bind_group(
            &self.device,
            &self.bind_group_layout,
            &self.frame_buffer,
            &self.panoramas,
            &self.sampler,
        );
        log::info!("panorama slot {} uploaded ({}x{})", slot, width, height);
    }

    pub fn render_with_ui(
        &mut self,
        window: &Window,
        run_ui: impl FnOnce(&egui::Context),
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Panorama Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, run_ui);

        self.egui_state
            .handle_platform_output(window, &self.egui_ctx, full_output.platform_output);
        let clipped_primitives = self.egui_ctx.tessellate(full_output.shapes);

        let screen_descriptor = egui_wgpu::renderer::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });
            self.egui_renderer
                .render(&mut render_pass, &clipped_primitives, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        log::debug!("releasing GPU resources");
    }
}

fn placeholder_texture(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [u8; 4]) -> PanoramaTexture {
    let size = wgpu::Extent3d {
        width: 2,
        height: 1,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        label: Some("placeholder_texture"),
        view_formats: &[],
    });
    let texels: Vec<u8> = rgba.iter().chain(rgba.iter()).copied().collect();
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &texels,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(8),
            rows_per_image: Some(1),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    PanoramaTexture {
        _texture: texture,
        view,
    }
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    frame_buffer: &wgpu::Buffer,
    panoramas: &[PanoramaTexture; MAX_PANORAMAS],
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&panoramas[0].view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&panoramas[1].view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some("panorama_bind_group"),
    })
}

/// Downscale to the GPU limit and pad short images to 2:1 (black sky on top).
pub fn fit_equirect(img: RgbaImage, max_dim: u32) -> RgbaImage {
    let (src_w, src_h) = img.dimensions();
    let img = if src_w > max_dim || src_h > max_dim {
        let scale = max_dim as f32 / src_w.max(src_h) as f32;
        let new_w = ((src_w as f32 * scale) as u32).max(1);
        let new_h = ((src_h as f32 * scale) as u32).max(1);
        log::warn!(
            "panorama {}x{} exceeds GPU limit {}, scaled to {}x{}",
            src_w,
            src_h,
            max_dim,
            new_w,
            new_h
        );
        image::imageops::resize(&img, new_w, new_h, image::imageops::FilterType::Lanczos3)
    } else {
        img
    };

    let (w, h) = img.dimensions();
    let target_h = w / 2;
    if target_h > 0 && h < target_h {
        let mut canvas = RgbaImage::from_pixel(w, target_h, Rgba([0, 0, 0, 255]));
        // bottom-aligned, cannot go out of bounds
        let _ = canvas.copy_from(&img, 0, target_h - h);
        canvas
    } else {
        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_images_are_padded_to_two_to_one() {
        let img = RgbaImage::from_pixel(8, 2, Rgba([255, 255, 255, 255]));
        let out = fit_equirect(img, 4096);
        assert_eq!(out.dimensions(), (8, 4));
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(0, 3).0, [255, 255, 255, 255]);
    }

    #[test]
    fn oversized_images_are_scaled_down() {
        let img = RgbaImage::new(64, 32);
        let out = fit_equirect(img, 16);
        assert_eq!(out.dimensions(), (16, 8));
    }

    #[test]
    fn uniform_layout_is_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
    }
}
