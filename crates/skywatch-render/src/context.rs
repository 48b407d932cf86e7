//! wgpu render context setup.
//!
//! Acquiring the adapter and device here *is* the capability probe: any
//! error bubbles out of the constructors and the backend selector falls
//! back to the 2D canvas.

use std::sync::Arc;

use winit::window::Window;

use crate::error::RenderError;

/// Where finished frames go.
enum RenderTarget {
    /// Presenting to a window surface.
    Windowed {
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    },
    /// Rendering into an offscreen texture (tests, probing without a
    /// window).
    Offscreen {
        color_texture: wgpu::Texture,
        color_view: wgpu::TextureView,
    },
}

/// wgpu render context: device, queue, and a windowed or offscreen target.
pub struct RenderContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
    pub depth_view: wgpu::TextureView,
    target: RenderTarget,
}

impl RenderContext {
    /// Create a context presenting to the given window.
    pub async fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| RenderError::SurfaceCreation(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::AdapterNotFound)?;

        let (device, queue) = request_device(&adapter).await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_texture(&device, width, height);

        Ok(Self {
            device,
            queue,
            format,
            width,
            height,
            depth_view,
            target: RenderTarget::Windowed { surface, config },
        })
    }

    /// Create an offscreen context with the given dimensions.
    pub async fn headless(width: u32, height: u32) -> Result<Self, RenderError> {
        let width = width.max(1);
        let height = height.max(1);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::AdapterNotFound)?;

        let (device, queue) = request_device(&adapter).await?;

        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let (color_texture, color_view) = create_color_texture(&device, format, width, height);
        let depth_view = create_depth_texture(&device, width, height);

        Ok(Self {
            device,
            queue,
            format,
            width,
            height,
            depth_view,
            target: RenderTarget::Offscreen {
                color_texture,
                color_view,
            },
        })
    }

    /// Acquire this frame's color target. The returned surface texture
    /// (windowed only) must be presented after submission.
    pub fn acquire_frame(
        &self,
    ) -> Result<(Option<wgpu::SurfaceTexture>, wgpu::TextureView), RenderError> {
        match &self.target {
            RenderTarget::Windowed { surface, .. } => {
                let frame = surface
                    .get_current_texture()
                    .map_err(|e| RenderError::SurfaceError(e.to_string()))?;
                let view = frame
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                Ok((Some(frame), view))
            }
            RenderTarget::Offscreen { color_texture, .. } => Ok((
                None,
                color_texture.create_view(&wgpu::TextureViewDescriptor::default()),
            )),
        }
    }

    /// Re-fit to new viewport dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;

        match &mut self.target {
            RenderTarget::Windowed { surface, config } => {
                config.width = width;
                config.height = height;
                surface.configure(&self.device, config);
            }
            RenderTarget::Offscreen {
                color_texture,
                color_view,
            } => {
                color_texture.destroy();
                let (texture, view) = create_color_texture(&self.device, self.format, width, height);
                *color_texture = texture;
                *color_view = view;
            }
        }

        self.depth_view = create_depth_texture(&self.device, width, height);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Release GPU resources. Drop order handles the rest; an error here
    /// is reported by the caller but never blocks unmount.
    pub fn teardown(self) -> Result<(), RenderError> {
        if let RenderTarget::Offscreen { color_texture, .. } = &self.target {
            color_texture.destroy();
        }
        let _ = self.device.poll(wgpu::Maintain::Wait);
        Ok(())
    }
}

async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue), RenderError> {
    adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Skywatch Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        )
        .await
        .map_err(|e| RenderError::DeviceCreation(e.to_string()))
}

fn create_color_texture(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Color Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
