//! Entry point for the gesture particle viewer.

use anyhow::Result;
use clap::Parser;
use particle_viewer::{app::App, config::Config};
use std::sync::Arc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

fn main() -> Result<()> {
    // Initialize logging; default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let config = Config::parse();
    log::info!("Starting with configuration: {:?}", config);

    // Create the event loop and window.
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Gesture Particle Cloud")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .build(&event_loop)?,
    );

    // Initialise the application (async → sync).
    let mut app = pollster::block_on(App::new(window.clone(), &config))?;

    // Run the winit event loop.
    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                // Forward events to the app; handle unconsumed window events.
                if !app.handle_event(&window, &event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::KeyboardInput { event, .. } => {
                            if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                                elwt.exit();
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            match app.render(&window) {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                    app.renderer.gfx.reconfigure();
                                }
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    log::error!("WGPU out of memory – exiting.");
                                    elwt.exit();
                                }
                                Err(e) => log::warn!("Skipped frame: {:?}", e),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                // Apply tracking results before the next render step reads them.
                app.poll_tracker();
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
