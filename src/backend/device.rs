// Logical device - one queue per distinct family + swapchain extension

use ash::extensions::khr;
use ash::vk;
use std::ffi::CStr;

use super::driver::Driver;
use super::queue::QueueFamilyIndices;
use crate::error::{InitError, InitResult};

/// Priority for every requested queue. Some drivers ignore it, but it's required.
pub const QUEUE_PRIORITY: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct QueueRequest {
    pub family_index: u32,
    pub priorities: Vec<f32>,
}

/// Backend-neutral description of a device creation call.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRequest {
    pub queues: Vec<QueueRequest>,
    pub extensions: Vec<&'static CStr>,
}

/// A created device and the queues fetched from it.
#[derive(Debug, Clone, Copy)]
pub struct LogicalDevice {
    pub device: vk::Device,
    pub graphics_queue: vk::Queue,
    pub present_queue: vk::Queue,
}

pub fn required_device_extensions() -> Vec<&'static CStr> {
    // Presentation is impossible without it
    vec![khr::Swapchain::name()]
}

pub fn device_request(families: &QueueFamilyIndices) -> DeviceRequest {
    let queues = families
        .unique()
        .into_iter()
        .map(|family_index| QueueRequest {
            family_index,
            priorities: vec![QUEUE_PRIORITY],
        })
        .collect();

    DeviceRequest {
        queues,
        extensions: required_device_extensions(),
    }
}

pub fn create_logical_device<D: Driver>(
    driver: &mut D,
    physical_device: vk::PhysicalDevice,
    families: &QueueFamilyIndices,
) -> InitResult<LogicalDevice> {
    let request = device_request(families);
    log::debug!(
        "Requesting {} queue(s) for families {:?}",
        request.queues.len(),
        families.unique()
    );

    let device = driver
        .create_device(physical_device, &request)
        .map_err(InitError::DeviceCreation)?;

    // Queue lookups on a live device can't reasonably fail; if the driver
    // still refuses, report it as part of device creation.
    let graphics_queue = driver
        .device_queue(device, families.graphics, 0)
        .map_err(InitError::DeviceCreation);
    let present_queue = driver
        .device_queue(device, families.present, 0)
        .map_err(InitError::DeviceCreation);

    match (graphics_queue, present_queue) {
        (Ok(graphics_queue), Ok(present_queue)) => Ok(LogicalDevice {
            device,
            graphics_queue,
            present_queue,
        }),
        (Err(err), _) | (_, Err(err)) => {
            driver.destroy_device(device);
            Err(err)
        }
    }
}
