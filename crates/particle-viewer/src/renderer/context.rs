use anyhow::{anyhow, Result};
use std::sync::Arc;
use winit::window::Window;

/// Surface, device and queue for the viewer window.
pub struct GfxContext {
    pub surface: wgpu::Surface<'static>,
    pub device:  wgpu::Device,
    pub queue:   wgpu::Queue,
    pub config:  wgpu::SurfaceConfiguration,
    pub size:    winit::dpi::PhysicalSize<u32>,
}

impl GfxContext {
    /// Creates a graphics context bound to `window`. With `vsync` off the
    /// surface presents immediately when the platform supports it.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        // The surface must outlive the window; `Arc` guarantees this.
        let surface = instance.create_surface(window.clone())?;

        // A point cloud this size runs on anything; prefer the low-power GPU.
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference:         wgpu::PowerPreference::LowPower,
                compatible_surface:       Some(&surface),
                force_fallback_adapter:   false,
            })
            .await
            .ok_or_else(|| anyhow!("No GPU adapter can present to this window."))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label:             Some("Particle Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits:   wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None, // no trace
            )
            .await?;

        // Prefer an sRGB surface so vertex colors come out as authored.
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface reports no supported formats."))?;

        let present_mode = if !vsync && caps.present_modes.contains(&wgpu::PresentMode::Immediate) {
            wgpu::PresentMode::Immediate
        } else {
            wgpu::PresentMode::Fifo
        };

        let config = wgpu::SurfaceConfiguration {
            usage:                       wgpu::TextureUsages::RENDER_ATTACHMENT,
            format:                      surface_format,
            width:                       size.width.max(1),
            height:                      size.height.max(1),
            present_mode,
            alpha_mode:                  caps.alpha_modes[0],
            view_formats:                vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        log::info!(
            "Surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
        })
    }

    /// Reconfigures the swap chain for a new window size. Zero sizes are
    /// skipped until the window is restored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Re-applies the current configuration, e.g. after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    #[inline]
    pub fn viewport_size(&self) -> [f32; 2] {
        [self.config.width as f32, self.config.height as f32]
    }
}
