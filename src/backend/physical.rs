// Physical device selection - prefer discrete GPU
//
// Coarse device class only: no memory size, features or extensions.

use ash::vk;

use super::driver::{Driver, PhysicalDeviceInfo};
use crate::error::{InitError, InitResult};

/// The GPU the context will build its logical device on.
#[derive(Debug, Clone)]
pub struct SelectedDevice {
    /// Driver-owned; never destroyed by us
    pub handle: vk::PhysicalDevice,
    pub info: PhysicalDeviceInfo,
    pub score: u32,
}

/// Preference score for a device class. Zero means unsuitable.
pub fn device_type_score(device_type: vk::PhysicalDeviceType) -> u32 {
    match device_type {
        vk::PhysicalDeviceType::DISCRETE_GPU => 1000,
        vk::PhysicalDeviceType::INTEGRATED_GPU => 500,
        vk::PhysicalDeviceType::VIRTUAL_GPU => 250,
        vk::PhysicalDeviceType::CPU => 100,
        _ => 0,
    }
}

/// Index of the first device reaching the highest nonzero score.
pub fn pick_best_index<I>(device_types: I) -> Option<usize>
where
    I: IntoIterator<Item = vk::PhysicalDeviceType>,
{
    let mut best = None;
    let mut best_score = 0;

    for (index, device_type) in device_types.into_iter().enumerate() {
        let score = device_type_score(device_type);
        if score > best_score {
            best_score = score;
            best = Some(index);
        }
    }

    best
}

pub fn select_physical_device<D: Driver>(
    driver: &D,
    instance: vk::Instance,
) -> InitResult<SelectedDevice> {
    let devices = driver
        .enumerate_physical_devices(instance)
        .map_err(InitError::DeviceQuery)?;

    if devices.is_empty() {
        return Err(InitError::NoDevice);
    }

    let infos = devices
        .iter()
        .map(|&device| driver.physical_device_info(device))
        .collect::<Result<Vec<_>, _>>()
        .map_err(InitError::DeviceQuery)?;

    for info in &infos {
        log::debug!(
            "Candidate GPU '{}' ({:?}) scores {}",
            info.name,
            info.device_type,
            device_type_score(info.device_type)
        );
    }

    let index = pick_best_index(infos.iter().map(|info| info.device_type))
        .ok_or(InitError::NoSuitableDevice)?;

    let info = infos[index].clone();
    let score = device_type_score(info.device_type);

    Ok(SelectedDevice {
        handle: devices[index],
        info,
        score,
    })
}
