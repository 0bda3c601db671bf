use crate::{
    camera::Camera,
    config::Config,
    renderer::Renderer,
    tracking::{spawn_tracker, SimInput, SimulatedHands},
    ui::{self, HudInfo},
};
use anyhow::Result;
use handcloud::{FrameDriver, FrameState, HandResults, Phase, PointCloud, Transform};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::{
    mpsc::{self, Receiver, Sender, TryRecvError},
    Arc,
};
use winit::{
    event::{ElementState, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

pub struct App {
    pub renderer: Renderer,
    pub camera: Camera,
    pub driver: FrameDriver,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    sim_tx: Sender<SimInput>,
    results_rx: Receiver<HandResults>,
    tracker_gone: bool,
    last_frame: FrameState,
}

impl App {
    pub async fn new(window: Arc<Window>, config: &Config) -> Result<Self> {
        let cloud_params = config.cloud_params();
        let gesture_params = config.gesture_params();
        let tracker_options = config.tracker_options();
        let video_feed = config.video_feed();

        cloud_params.validate()?;
        gesture_params.validate()?;
        tracker_options.validate()?;
        video_feed.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let cloud = PointCloud::from_params(&cloud_params, &mut rng);

        let renderer = Renderer::new(
            window.clone(),
            &cloud,
            cloud_params.point_size,
            !config.no_vsync,
        )
        .await?;
        let size = renderer.gfx.size;
        let camera = Camera::new(size.width, size.height);

        log::info!(
            "Cloud ready: points={} half_width={} | scale [{}..{}] around pinch {} x{}, smoothing {}, spin {} rad/frame",
            cloud.len(),
            cloud_params.half_width,
            gesture_params.min_scale,
            gesture_params.max_scale,
            gesture_params.neutral_pinch,
            gesture_params.sensitivity,
            gesture_params.smoothing,
            gesture_params.rotation_step
        );

        let driver = FrameDriver::new(cloud, gesture_params);

        // The window feeds the simulated tracker; results come back on a
        // second channel and are applied on this thread.
        let (sim_tx, sim_rx) = mpsc::channel();
        let results_rx = spawn_tracker(SimulatedHands::new(sim_rx, tracker_options, video_feed));

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        Ok(Self {
            renderer,
            camera,
            driver,
            egui_ctx,
            egui_state,
            sim_tx,
            results_rx,
            tracker_gone: false,
            last_frame: FrameState {
                phase: Phase::Idle,
                transform: Transform::IDENTITY,
            },
        })
    }

    /// Viewport change: surface, depth target and camera aspect. Independent
    /// of the frame state machine.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size);
            self.camera.set_aspect(new_size.width, new_size.height);
            self.camera.update_projection_matrix();
            log::debug!("Resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Applies every tracking result that arrived since the last call, oldest
    /// first. A stalled or stopped tracker leaves the last state in place.
    pub fn poll_tracker(&mut self) {
        loop {
            match self.results_rx.try_recv() {
                Ok(results) => self.driver.on_results(&results),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.tracker_gone {
                        log::warn!("Hand tracker stopped; holding the last hand state.");
                        self.tracker_gone = true;
                    }
                    break;
                }
            }
        }
    }

    fn send_sim(&self, input: SimInput) {
        // Only fails once the tracker thread is gone, which poll_tracker reports.
        let _ = self.sim_tx.send(input);
    }

    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        if response.consumed {
            return true;
        }

        match event {
            WindowEvent::Resized(physical_size) => self.resize(*physical_size),
            WindowEvent::CursorMoved { position, .. } => {
                let size = self.renderer.gfx.size;
                if size.width > 0 && size.height > 0 {
                    self.send_sim(SimInput::Cursor {
                        x: (position.x / size.width as f64) as f32,
                        y: (position.y / size.height as f64) as f32,
                    });
                }
            }
            WindowEvent::CursorLeft { .. } => self.send_sim(SimInput::CursorLeft),
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
                };
                self.send_sim(SimInput::Spread(lines));
            }
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(KeyCode::Space) if !event.repeat => {
                    self.send_sim(SimInput::Pinch(event.state == ElementState::Pressed));
                }
                PhysicalKey::Code(KeyCode::KeyL)
                    if event.state == ElementState::Pressed && !event.repeat =>
                {
                    self.send_sim(SimInput::ToggleLowConfidence);
                }
                _ => {}
            },
            _ => {}
        }

        false
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Render step: transform advances only while a hand is tracked, the
        // draw happens either way.
        let state = self.driver.on_frame();
        if state.phase != self.last_frame.phase {
            log::debug!("Render phase {:?} -> {:?}", self.last_frame.phase, state.phase);
        }
        self.last_frame = state;

        self.renderer.sync_colors(self.driver.cloud_mut());
        self.renderer.render(&swap_view, &self.camera, &state);

        let hud = HudInfo {
            frame: state,
            target_scale: self.driver.target_scale(),
            signal: self.driver.last_signal(),
            points: self.driver.cloud().len(),
            render_frames: self.driver.frames(),
            video_frame: self.driver.tracking().frame,
        };

        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);
        ui::draw_hud(&self.egui_ctx, &hud);
        let egui_output = self.egui_ctx.end_frame();

        self.egui_state
            .handle_platform_output(window, egui_output.platform_output);

        let shapes = self
            .egui_ctx
            .tessellate(egui_output.shapes, self.egui_ctx.pixels_per_point());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [
                self.renderer.gfx.config.width,
                self.renderer.gfx.config.height,
            ],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        let mut encoder = self
            .renderer
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("HUD Encoder"),
            });

        for (id, delta) in &egui_output.textures_delta.set {
            self.renderer.egui_renderer.update_texture(
                &self.renderer.gfx.device,
                &self.renderer.gfx.queue,
                *id,
                delta,
            );
        }

        self.renderer.egui_renderer.update_buffers(
            &self.renderer.gfx.device,
            &self.renderer.gfx.queue,
            &mut encoder,
            &shapes,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("HUD Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer
                .egui_renderer
                .render(&mut render_pass, &shapes, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.renderer.egui_renderer.free_texture(id);
        }

        self.renderer
            .gfx
            .queue
            .submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}
