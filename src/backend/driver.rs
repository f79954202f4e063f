// Vulkan Driver - Raw backend calls
//
// Responsibilities:
// - Instance creation with the window's required extensions
// - Physical device and queue family queries
// - Logical device creation from a DeviceRequest
// - Destruction of instance, surface and device
//
// Everything above this layer is policy and only sees raw handles.

use ash::extensions::khr;
use ash::prelude::VkResult;
use ash::{vk, Entry};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use super::device::DeviceRequest;

/// What the selector needs to know about a GPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalDeviceInfo {
    pub name: String,
    pub device_type: vk::PhysicalDeviceType,
    pub api_version: u32,
}

impl PhysicalDeviceInfo {
    fn from_properties(properties: &vk::PhysicalDeviceProperties) -> Self {
        let name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) }
            .to_string_lossy()
            .into_owned();

        Self {
            name,
            device_type: properties.device_type,
            api_version: properties.api_version,
        }
    }
}

/// Graphics driver calls used by the acquisition pipeline.
///
/// Destroy calls are infallible; callers only pass handles this driver created.
pub trait Driver {
    fn create_instance(
        &mut self,
        app_name: &CStr,
        extensions: &[CString],
    ) -> VkResult<vk::Instance>;

    fn enumerate_physical_devices(
        &self,
        instance: vk::Instance,
    ) -> VkResult<Vec<vk::PhysicalDevice>>;

    fn physical_device_info(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> VkResult<PhysicalDeviceInfo>;

    fn queue_family_properties(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> VkResult<Vec<vk::QueueFamilyProperties>>;

    /// Can `family` present to `surface`?
    fn surface_support(
        &self,
        physical_device: vk::PhysicalDevice,
        family: u32,
        surface: vk::SurfaceKHR,
    ) -> VkResult<bool>;

    fn create_device(
        &mut self,
        physical_device: vk::PhysicalDevice,
        request: &DeviceRequest,
    ) -> VkResult<vk::Device>;

    fn device_queue(&self, device: vk::Device, family: u32, index: u32) -> VkResult<vk::Queue>;

    fn destroy_device(&mut self, device: vk::Device);

    fn destroy_surface(&mut self, instance: vk::Instance, surface: vk::SurfaceKHR);

    fn destroy_instance(&mut self, instance: vk::Instance);
}

/// ash-backed driver holding the function tables for one instance/device pair.
pub struct AshDriver {
    device: Option<ash::Device>,
    surface_loader: Option<khr::Surface>,
    instance: Option<ash::Instance>,
    entry: Entry,
}

impl AshDriver {
    /// Load the Vulkan library.
    pub fn new() -> Result<Self, ash::LoadingError> {
        let entry = unsafe { Entry::load() }?;
        Ok(Self {
            device: None,
            surface_loader: None,
            instance: None,
            entry,
        })
    }

    fn instance(&self) -> VkResult<&ash::Instance> {
        self.instance
            .as_ref()
            .ok_or(vk::Result::ERROR_INITIALIZATION_FAILED)
    }

    fn surface_loader(&self) -> VkResult<&khr::Surface> {
        self.surface_loader
            .as_ref()
            .ok_or(vk::Result::ERROR_INITIALIZATION_FAILED)
    }
}

impl Driver for AshDriver {
    fn create_instance(
        &mut self,
        app_name: &CStr,
        extensions: &[CString],
    ) -> VkResult<vk::Instance> {
        let engine_name = c"Antimony";

        let app_info = vk::ApplicationInfo::builder()
            .application_name(app_name)
            .application_version(vk::make_api_version(0, 0, 1, 0))
            .engine_name(engine_name)
            .engine_version(vk::make_api_version(0, 0, 1, 0))
            .api_version(vk::API_VERSION_1_3);

        let extension_names: Vec<*const c_char> =
            extensions.iter().map(|name| name.as_ptr()).collect();

        for name in extensions {
            log::debug!("Enabling instance extension {:?}", name);
        }

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_names);

        let instance = unsafe { self.entry.create_instance(&create_info, None) }?;
        let handle = instance.handle();

        self.surface_loader = Some(khr::Surface::new(&self.entry, &instance));
        self.instance = Some(instance);

        Ok(handle)
    }

    fn enumerate_physical_devices(
        &self,
        _instance: vk::Instance,
    ) -> VkResult<Vec<vk::PhysicalDevice>> {
        unsafe { self.instance()?.enumerate_physical_devices() }
    }

    fn physical_device_info(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> VkResult<PhysicalDeviceInfo> {
        let properties =
            unsafe { self.instance()?.get_physical_device_properties(physical_device) };
        Ok(PhysicalDeviceInfo::from_properties(&properties))
    }

    fn queue_family_properties(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> VkResult<Vec<vk::QueueFamilyProperties>> {
        Ok(unsafe {
            self.instance()?
                .get_physical_device_queue_family_properties(physical_device)
        })
    }

    fn surface_support(
        &self,
        physical_device: vk::PhysicalDevice,
        family: u32,
        surface: vk::SurfaceKHR,
    ) -> VkResult<bool> {
        unsafe {
            self.surface_loader()?
                .get_physical_device_surface_support(physical_device, family, surface)
        }
    }

    fn create_device(
        &mut self,
        physical_device: vk::PhysicalDevice,
        request: &DeviceRequest,
    ) -> VkResult<vk::Device> {
        let queue_create_infos: Vec<vk::DeviceQueueCreateInfo> = request
            .queues
            .iter()
            .map(|queue| {
                vk::DeviceQueueCreateInfo::builder()
                    .queue_family_index(queue.family_index)
                    .queue_priorities(&queue.priorities)
                    .build()
            })
            .collect();

        let extensions: Vec<*const c_char> =
            request.extensions.iter().map(|name| name.as_ptr()).collect();

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_create_infos)
            .enabled_extension_names(&extensions);

        let device = unsafe {
            self.instance()?
                .create_device(physical_device, &create_info, None)
        }?;
        let handle = device.handle();
        self.device = Some(device);

        Ok(handle)
    }

    fn device_queue(&self, _device: vk::Device, family: u32, index: u32) -> VkResult<vk::Queue> {
        let device = self
            .device
            .as_ref()
            .ok_or(vk::Result::ERROR_INITIALIZATION_FAILED)?;
        Ok(unsafe { device.get_device_queue(family, index) })
    }

    fn destroy_device(&mut self, device: vk::Device) {
        if let Some(loaded) = self.device.take() {
            debug_assert_eq!(loaded.handle(), device);
            unsafe {
                // Wait for device to finish
                let _ = loaded.device_wait_idle();
                loaded.destroy_device(None);
            }
        }
    }

    fn destroy_surface(&mut self, _instance: vk::Instance, surface: vk::SurfaceKHR) {
        if let Some(loader) = &self.surface_loader {
            unsafe { loader.destroy_surface(surface, None) };
        }
    }

    fn destroy_instance(&mut self, instance: vk::Instance) {
        self.surface_loader = None;
        if let Some(loaded) = self.instance.take() {
            debug_assert_eq!(loaded.handle(), instance);
            unsafe { loaded.destroy_instance(None) };
        }
    }
}
