// Test doubles for the windowing collaborator and the driver.
//
// Both record into a shared Journal so tests can assert call order.

use ash::prelude::VkResult;
use ash::vk::{self, Handle};
use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::rc::Rc;

use crate::backend::{DeviceRequest, Driver, PhysicalDeviceInfo};
use crate::window::{WindowError, WindowSystem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    InitRuntime,
    CreateWindow { width: u32, height: u32, title: String },
    RequiredExtensions,
    CreateSurface,
    DestroyWindow,
    TerminateRuntime,
    CreateInstance { extensions: Vec<String> },
    EnumerateDevices,
    DeviceInfo,
    SurfaceSupport { family: u32 },
    CreateDevice,
    DestroyDevice,
    DestroySurface,
    DestroyInstance,
}

impl Call {
    pub fn is_teardown(&self) -> bool {
        matches!(
            self,
            Call::DestroyDevice
                | Call::DestroySurface
                | Call::DestroyInstance
                | Call::DestroyWindow
                | Call::TerminateRuntime
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Call>>>);

impl Journal {
    pub fn record(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.0.borrow().iter().filter(|c| *c == call).count()
    }

    pub fn teardown(&self) -> Vec<Call> {
        self.0.borrow().iter().filter(|c| c.is_teardown()).cloned().collect()
    }
}

// =============================================================================
// WINDOWING
// =============================================================================

#[derive(Debug, PartialEq, Eq)]
pub struct MockWindow(pub u32);

pub const MOCK_SURFACE: u64 = 0x5F;

pub struct MockWindowSystem {
    journal: Journal,
    pub extensions: Vec<CString>,
    pub fail_runtime: bool,
    pub fail_window: bool,
    pub fail_surface: Option<vk::Result>,
    windows_created: u32,
}

impl MockWindowSystem {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            extensions: vec![
                c"VK_KHR_surface".to_owned(),
                c"VK_KHR_xcb_surface".to_owned(),
            ],
            fail_runtime: false,
            fail_window: false,
            fail_surface: None,
            windows_created: 0,
        }
    }
}

impl WindowSystem for MockWindowSystem {
    type Window = MockWindow;

    fn init_runtime(&mut self) -> Result<(), WindowError> {
        if self.fail_runtime {
            return Err(WindowError::Unsupported("mock runtime disabled".into()));
        }
        self.journal.record(Call::InitRuntime);
        Ok(())
    }

    fn create_window(
        &mut self,
        width: u32,
        height: u32,
        title: &str,
    ) -> Result<MockWindow, WindowError> {
        if self.fail_window {
            return Err(WindowError::Unsupported("mock window disabled".into()));
        }
        self.journal.record(Call::CreateWindow {
            width,
            height,
            title: title.to_string(),
        });
        self.windows_created += 1;
        Ok(MockWindow(self.windows_created))
    }

    fn required_extensions(&self, _window: &MockWindow) -> Result<Vec<CString>, WindowError> {
        self.journal.record(Call::RequiredExtensions);
        Ok(self.extensions.clone())
    }

    fn create_surface(
        &self,
        _instance: vk::Instance,
        _window: &MockWindow,
    ) -> VkResult<vk::SurfaceKHR> {
        if let Some(err) = self.fail_surface {
            return Err(err);
        }
        self.journal.record(Call::CreateSurface);
        Ok(vk::SurfaceKHR::from_raw(MOCK_SURFACE))
    }

    fn destroy_window(&mut self, _window: MockWindow) {
        self.journal.record(Call::DestroyWindow);
    }

    fn terminate_runtime(&mut self) {
        self.journal.record(Call::TerminateRuntime);
    }
}

// =============================================================================
// DRIVER
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct MockFamily {
    pub flags: vk::QueueFlags,
    pub present: bool,
}

impl MockFamily {
    pub fn both() -> Self {
        Self { flags: vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE, present: true }
    }

    pub fn graphics_only() -> Self {
        Self { flags: vk::QueueFlags::GRAPHICS, present: false }
    }

    pub fn present_only() -> Self {
        Self { flags: vk::QueueFlags::TRANSFER, present: true }
    }
}

#[derive(Debug, Clone)]
pub struct MockGpu {
    pub name: String,
    pub device_type: vk::PhysicalDeviceType,
    pub families: Vec<MockFamily>,
}

impl MockGpu {
    pub fn new(name: &str, device_type: vk::PhysicalDeviceType) -> Self {
        Self {
            name: name.to_string(),
            device_type,
            families: vec![MockFamily::both()],
        }
    }

    pub fn with_families(mut self, families: Vec<MockFamily>) -> Self {
        self.families = families;
        self
    }

    /// Handle the mock driver reports for the GPU at `index`
    pub fn handle(index: usize) -> vk::PhysicalDevice {
        vk::PhysicalDevice::from_raw(0x100 + index as u64)
    }
}

pub const MOCK_INSTANCE: u64 = 0x1;
pub const MOCK_DEVICE: u64 = 0xD0;

pub fn mock_queue(family: u32) -> vk::Queue {
    vk::Queue::from_raw(0xA00 + u64::from(family))
}

pub struct MockDriver {
    journal: Journal,
    gpus: Vec<MockGpu>,
    requests: Vec<DeviceRequest>,
    pub fail_instance: Option<vk::Result>,
    pub fail_enumeration: Option<vk::Result>,
    pub fail_device: Option<vk::Result>,
    pub fail_queue: Option<vk::Result>,
}

impl MockDriver {
    pub fn new(journal: Journal, gpus: Vec<MockGpu>) -> Self {
        Self {
            journal,
            gpus,
            requests: Vec::new(),
            fail_instance: None,
            fail_enumeration: None,
            fail_device: None,
            fail_queue: None,
        }
    }

    pub fn device_requests(&self) -> &[DeviceRequest] {
        &self.requests
    }

    fn gpu(&self, physical_device: vk::PhysicalDevice) -> VkResult<&MockGpu> {
        let index = physical_device.as_raw().wrapping_sub(0x100) as usize;
        self.gpus.get(index).ok_or(vk::Result::ERROR_DEVICE_LOST)
    }
}

impl Driver for MockDriver {
    fn create_instance(
        &mut self,
        _app_name: &CStr,
        extensions: &[CString],
    ) -> VkResult<vk::Instance> {
        if let Some(err) = self.fail_instance {
            return Err(err);
        }
        self.journal.record(Call::CreateInstance {
            extensions: extensions
                .iter()
                .map(|e| e.to_string_lossy().into_owned())
                .collect(),
        });
        Ok(vk::Instance::from_raw(MOCK_INSTANCE))
    }

    fn enumerate_physical_devices(
        &self,
        _instance: vk::Instance,
    ) -> VkResult<Vec<vk::PhysicalDevice>> {
        if let Some(err) = self.fail_enumeration {
            return Err(err);
        }
        self.journal.record(Call::EnumerateDevices);
        Ok((0..self.gpus.len()).map(MockGpu::handle).collect())
    }

    fn physical_device_info(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> VkResult<PhysicalDeviceInfo> {
        self.journal.record(Call::DeviceInfo);
        let gpu = self.gpu(physical_device)?;
        Ok(PhysicalDeviceInfo {
            name: gpu.name.clone(),
            device_type: gpu.device_type,
            api_version: vk::API_VERSION_1_3,
        })
    }

    fn queue_family_properties(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> VkResult<Vec<vk::QueueFamilyProperties>> {
        Ok(self
            .gpu(physical_device)?
            .families
            .iter()
            .map(|family| vk::QueueFamilyProperties {
                queue_flags: family.flags,
                queue_count: 1,
                ..Default::default()
            })
            .collect())
    }

    fn surface_support(
        &self,
        physical_device: vk::PhysicalDevice,
        family: u32,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<bool> {
        self.journal.record(Call::SurfaceSupport { family });
        let gpu = self.gpu(physical_device)?;
        Ok(gpu
            .families
            .get(family as usize)
            .map_or(false, |f| f.present))
    }

    fn create_device(
        &mut self,
        _physical_device: vk::PhysicalDevice,
        request: &DeviceRequest,
    ) -> VkResult<vk::Device> {
        if let Some(err) = self.fail_device {
            return Err(err);
        }
        self.journal.record(Call::CreateDevice);
        self.requests.push(request.clone());
        Ok(vk::Device::from_raw(MOCK_DEVICE))
    }

    fn device_queue(&self, _device: vk::Device, family: u32, _index: u32) -> VkResult<vk::Queue> {
        if let Some(err) = self.fail_queue {
            return Err(err);
        }
        Ok(mock_queue(family))
    }

    fn destroy_device(&mut self, _device: vk::Device) {
        self.journal.record(Call::DestroyDevice);
    }

    fn destroy_surface(&mut self, _instance: vk::Instance, _surface: vk::SurfaceKHR) {
        self.journal.record(Call::DestroySurface);
    }

    fn destroy_instance(&mut self, _instance: vk::Instance) {
        self.journal.record(Call::DestroyInstance);
    }
}
