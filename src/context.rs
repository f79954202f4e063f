// Context - Window, instance, surface, GPU, device and queues
//
// Acquisition runs strictly forward; any failure leaves the slots that were
// filled so far in place for cleanup().

use ash::vk;
use std::ffi::CString;

use crate::backend::{
    device, physical, queue, Driver, PhysicalDeviceInfo, QueueFamilyIndices, SwapchainSlots,
};
use crate::error::{InitError, InitResult};
use crate::window::{RuntimeGuard, WindowSystem, WINDOW_HEIGHT, WINDOW_WIDTH};

/// Everything acquired by [`Context::init`].
///
/// Owned handles live in `Option` slots that are emptied as soon as they are
/// destroyed, so [`Context::cleanup`] can run any number of times and on any
/// partially initialized context. Dropping the context cleans up too.
pub struct Context<W: WindowSystem, D: Driver> {
    // ─────────────────────────────────────────────────────────────────────────
    // OWNED (destroyed bottom-up)
    // ─────────────────────────────────────────────────────────────────────────
    device: Option<vk::Device>,
    surface: Option<vk::SurfaceKHR>,
    instance: Option<vk::Instance>,
    window: Option<W::Window>,
    runtime: Option<RuntimeGuard<W>>,

    // ─────────────────────────────────────────────────────────────────────────
    // NON-OWNING
    // ─────────────────────────────────────────────────────────────────────────
    physical_device: Option<vk::PhysicalDevice>,
    queue_families: Option<QueueFamilyIndices>,
    /// Graphics queue, valid while `device` is
    queue: Option<vk::Queue>,
    present_queue: Option<vk::Queue>,

    swapchain: SwapchainSlots,

    /// Window system waiting for `init` to start its runtime
    pending: Option<W>,
    driver: D,
}

impl<W: WindowSystem, D: Driver> Context<W, D> {
    pub fn new(window_system: W, driver: D) -> Self {
        Self {
            device: None,
            surface: None,
            instance: None,
            window: None,
            runtime: None,
            physical_device: None,
            queue_families: None,
            queue: None,
            present_queue: None,
            swapchain: SwapchainSlots::default(),
            pending: Some(window_system),
            driver,
        }
    }

    /// Acquire every handle, in order: window, instance, surface, GPU,
    /// queue families, logical device, queues.
    ///
    /// On failure the partially filled context is left as is; call
    /// [`Context::cleanup`] (or drop it) to release what was acquired.
    pub fn init(&mut self, title: &str) -> InitResult<()> {
        log::info!("Initializing '{}'...", title);

        match self.acquire(title) {
            Ok(()) => {
                log::info!("Context initialized successfully!");
                Ok(())
            }
            Err(err) => {
                log::error!("Fatal Error: {}", err);
                Err(err)
            }
        }
    }

    fn acquire(&mut self, title: &str) -> InitResult<()> {
        let app_name = CString::new(title)?;
        let system = self.pending.take().ok_or(InitError::AlreadyInitialized)?;

        // ─────────────────────────────────────────────────────────────────────
        // STEP 1: Window, instance and surface
        // ─────────────────────────────────────────────────────────────────────
        let runtime = self
            .runtime
            .insert(RuntimeGuard::start(system).map_err(InitError::Init)?);

        let window = runtime
            .create_window(WINDOW_WIDTH, WINDOW_HEIGHT, title)
            .map_err(InitError::Init)?;
        let window = self.window.insert(window);

        // The instance can't draw on screen without what the window asks for
        let extensions = runtime
            .required_extensions(window)
            .map_err(InitError::Init)?;

        let instance = self
            .driver
            .create_instance(&app_name, &extensions)
            .map_err(InitError::BackendCreation)?;
        self.instance = Some(instance);

        let surface = runtime
            .create_surface(instance, window)
            .map_err(InitError::SurfaceCreation)?;
        self.surface = Some(surface);

        // ─────────────────────────────────────────────────────────────────────
        // STEP 2: Physical device
        // ─────────────────────────────────────────────────────────────────────
        let selected = physical::select_physical_device(&self.driver, instance)?;
        self.physical_device = Some(selected.handle);

        // ─────────────────────────────────────────────────────────────────────
        // STEP 3: Queue families
        // ─────────────────────────────────────────────────────────────────────
        let families = queue::resolve_queue_families(&self.driver, selected.handle, surface)?;
        self.queue_families = Some(families);

        // ─────────────────────────────────────────────────────────────────────
        // STEP 4: Logical device and queues
        // ─────────────────────────────────────────────────────────────────────
        let logical = device::create_logical_device(&mut self.driver, selected.handle, &families)?;
        self.device = Some(logical.device);
        self.queue = Some(logical.graphics_queue);
        self.present_queue = Some(logical.present_queue);

        log_physical_device(&selected.info, selected.score);

        Ok(())
    }

    /// Destroy everything acquired so far: device, surface, instance, window,
    /// then the windowing runtime. Empty slots are skipped.
    pub fn cleanup(&mut self) {
        // Nothing below can exist without a started runtime
        if self.runtime.is_none() {
            return;
        }
        log::info!("Cleaning up context...");

        if let Some(device) = self.device.take() {
            self.queue = None;
            self.present_queue = None;
            self.driver.destroy_device(device);
        }

        if let Some(surface) = self.surface.take() {
            if let Some(instance) = self.instance {
                self.driver.destroy_surface(instance, surface);
            }
        }

        if let Some(instance) = self.instance.take() {
            self.physical_device = None;
            self.queue_families = None;
            self.driver.destroy_instance(instance);
        }

        if let Some(window) = self.window.take() {
            if let Some(runtime) = self.runtime.as_mut() {
                runtime.destroy_window(window);
            }
        }

        // Terminates the runtime
        self.runtime = None;

        log::info!("Cleanup complete");
    }

    pub fn window(&self) -> Option<&W::Window> {
        self.window.as_ref()
    }

    pub fn instance(&self) -> Option<vk::Instance> {
        self.instance
    }

    pub fn surface(&self) -> Option<vk::SurfaceKHR> {
        self.surface
    }

    pub fn physical_device(&self) -> Option<vk::PhysicalDevice> {
        self.physical_device
    }

    pub fn queue_families(&self) -> Option<QueueFamilyIndices> {
        self.queue_families
    }

    pub fn graphics_family(&self) -> Option<u32> {
        self.queue_families.map(|f| f.graphics)
    }

    pub fn present_family(&self) -> Option<u32> {
        self.queue_families.map(|f| f.present)
    }

    pub fn device(&self) -> Option<vk::Device> {
        self.device
    }

    pub fn queue(&self) -> Option<vk::Queue> {
        self.queue
    }

    pub fn present_queue(&self) -> Option<vk::Queue> {
        self.present_queue
    }

    pub fn swapchain(&self) -> &SwapchainSlots {
        &self.swapchain
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The running window system, e.g. to pump events.
    pub fn window_system_mut(&mut self) -> Option<&mut W> {
        self.runtime.as_deref_mut()
    }
}

impl<W: WindowSystem, D: Driver> Drop for Context<W, D> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn log_physical_device(info: &PhysicalDeviceInfo, score: u32) {
    log::info!(
        "Physical Device: {} ({:?}, score {})",
        info.name,
        info.device_type,
        score
    );
    log::info!(
        "API Version: {}.{}.{}",
        vk::api_version_major(info.api_version),
        vk::api_version_minor(info.api_version),
        vk::api_version_patch(info.api_version)
    );
}
