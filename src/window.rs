// Window - Windowing collaborator
//
// Responsibilities:
// - Process-wide windowing runtime (started once, terminated once)
// - Native window creation at a fixed size
// - Instance extensions the platform needs to present
// - Surface creation bound to a window

use ash::prelude::VkResult;
use ash::{vk, Entry};
use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle};
use std::ffi::{CStr, CString};
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    error::{EventLoopError, OsError},
    event_loop::EventLoop,
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::Window,
};

pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("failed to start event loop: {0}")]
    EventLoop(#[from] EventLoopError),

    #[error("failed to create window: {0}")]
    Os(#[from] OsError),

    #[error("windowing runtime is not running")]
    NotRunning,

    #[error("failed to load Vulkan library: {0}")]
    Loading(#[from] ash::LoadingError),

    #[error("failed to query required instance extensions: {0}")]
    Extensions(#[source] vk::Result),

    #[error("unsupported windowing platform: {0}")]
    Unsupported(String),
}

/// Interface the context needs from a windowing library.
///
/// Every method except `init_runtime` may assume the runtime is running.
pub trait WindowSystem {
    type Window;

    fn init_runtime(&mut self) -> Result<(), WindowError>;

    fn create_window(
        &mut self,
        width: u32,
        height: u32,
        title: &str,
    ) -> Result<Self::Window, WindowError>;

    /// Instance extension names needed to present to `window`
    fn required_extensions(&self, window: &Self::Window) -> Result<Vec<CString>, WindowError>;

    fn create_surface(
        &self,
        instance: vk::Instance,
        window: &Self::Window,
    ) -> VkResult<vk::SurfaceKHR>;

    fn destroy_window(&mut self, window: Self::Window);

    fn terminate_runtime(&mut self);
}

/// A started window system. Dropping the guard terminates the runtime.
pub struct RuntimeGuard<W: WindowSystem> {
    system: W,
}

impl<W: WindowSystem> RuntimeGuard<W> {
    pub fn start(mut system: W) -> Result<Self, WindowError> {
        system.init_runtime()?;
        log::debug!("Windowing runtime started");
        Ok(Self { system })
    }
}

impl<W: WindowSystem> Deref for RuntimeGuard<W> {
    type Target = W;

    fn deref(&self) -> &W {
        &self.system
    }
}

impl<W: WindowSystem> DerefMut for RuntimeGuard<W> {
    fn deref_mut(&mut self) -> &mut W {
        &mut self.system
    }
}

impl<W: WindowSystem> Drop for RuntimeGuard<W> {
    fn drop(&mut self) {
        self.system.terminate_runtime();
        log::debug!("Windowing runtime terminated");
    }
}

// =============================================================================
// WINIT IMPLEMENTATION
// =============================================================================

/// winit event loop as the windowing runtime, ash-window for surfaces.
///
/// winit allows one event loop per process, which matches the
/// start-once/terminate-once contract of the runtime guard.
#[derive(Default)]
pub struct WinitWindowSystem {
    event_loop: Option<EventLoop<()>>,
    /// Surface entry points, loaded once with the runtime
    entry: Option<Entry>,
}

impl WinitWindowSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch pending window events to `app`, waiting at most `timeout`.
    pub fn pump_events<A: ApplicationHandler>(
        &mut self,
        app: &mut A,
        timeout: Option<Duration>,
    ) -> Result<PumpStatus, WindowError> {
        let event_loop = self.event_loop.as_mut().ok_or(WindowError::NotRunning)?;
        Ok(event_loop.pump_app_events(timeout, app))
    }
}

impl WindowSystem for WinitWindowSystem {
    type Window = Window;

    fn init_runtime(&mut self) -> Result<(), WindowError> {
        let entry = unsafe { Entry::load() }?;
        self.event_loop = Some(EventLoop::new()?);
        self.entry = Some(entry);
        Ok(())
    }

    fn create_window(
        &mut self,
        width: u32,
        height: u32,
        title: &str,
    ) -> Result<Window, WindowError> {
        let event_loop = self.event_loop.as_ref().ok_or(WindowError::NotRunning)?;

        let attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(width, height));

        // The window has to exist before the loop runs so extensions and
        // the surface can be derived from it during init.
        #[allow(deprecated)]
        let window = event_loop.create_window(attributes)?;

        log::info!("Created window '{}' ({}x{})", title, width, height);
        Ok(window)
    }

    fn required_extensions(&self, window: &Window) -> Result<Vec<CString>, WindowError> {
        let names = ash_window::enumerate_required_extensions(window.raw_display_handle())
            .map_err(WindowError::Extensions)?;

        // SAFETY: ash-window hands out pointers to static, NUL-terminated names.
        Ok(names
            .iter()
            .map(|&name| unsafe { CStr::from_ptr(name) }.to_owned())
            .collect())
    }

    fn create_surface(
        &self,
        instance: vk::Instance,
        window: &Window,
    ) -> VkResult<vk::SurfaceKHR> {
        // The surface entry points are resolved from the raw instance handle,
        // independent of whichever driver created it.
        let entry = self
            .entry
            .as_ref()
            .ok_or(vk::Result::ERROR_INITIALIZATION_FAILED)?;

        unsafe {
            let instance = ash::Instance::load(entry.static_fn(), instance);
            ash_window::create_surface(
                entry,
                &instance,
                window.raw_display_handle(),
                window.raw_window_handle(),
                None,
            )
        }
    }

    fn destroy_window(&mut self, window: Window) {
        drop(window);
    }

    fn terminate_runtime(&mut self) {
        self.event_loop = None;
        self.entry = None;
    }
}
