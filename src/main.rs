// =============================================================================
// ANTIMONY SANDBOX - Minimal consumer of the device acquisition core
// =============================================================================
//
// Brings up a window and a Vulkan device, polls events until the window is
// closed (or Escape is pressed), then tears everything down.
//
// =============================================================================

mod config;

use anyhow::{Context as _, Result};
use antimony::{AshDriver, Context, WinitWindowSystem};
use config::Config;
use std::time::Duration;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    platform::pump_events::PumpStatus,
    window::WindowId,
};

fn main() -> Result<()> {
    let config = Config::load();

    init_logging(&config);
    log::info!("Starting Antimony sandbox");

    let driver = AshDriver::new().context("Failed to load Vulkan library. Is Vulkan installed?")?;
    let mut context = Context::new(WinitWindowSystem::new(), driver);

    // Dropping the context on the error path releases whatever was acquired
    if let Err(e) = context.init(&config.window.title) {
        anyhow::bail!("Failed to initialize Antimony Engine: {}", e);
    }

    let timeout = Some(Duration::from_millis(config.sandbox.poll_interval_ms));
    let mut sandbox = Sandbox::default();

    while !sandbox.close_requested {
        let Some(window_system) = context.window_system_mut() else {
            break;
        };

        match window_system.pump_events(&mut sandbox, timeout) {
            Ok(PumpStatus::Continue) => {}
            Ok(PumpStatus::Exit(code)) => {
                log::info!("Event loop exited with code {}", code);
                break;
            }
            Err(e) => anyhow::bail!("Event polling failed: {}", e),
        }
    }

    context.cleanup();
    Ok(())
}

fn init_logging(config: &Config) {
    use env_logger::Builder;

    let mut builder = Builder::from_default_env();
    builder.filter_level(config.log_level());
    builder.init();
}

// =============================================================================
// EVENT HANDLING
// =============================================================================

#[derive(Default)]
struct Sandbox {
    close_requested: bool,
}

impl ApplicationHandler for Sandbox {
    /// The window already exists by the time events are pumped.
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down...");
                self.close_requested = true;
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed()
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    log::info!("ESC pressed, exiting...");
                    self.close_requested = true;
                }
            }
            _ => {}
        }
    }
}
