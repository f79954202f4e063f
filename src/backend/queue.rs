// Queue family resolution
//
// Graphics and presentation are separate slots, each validated on its own.
// They often land on the same family.

use ash::prelude::VkResult;
use ash::vk;

use super::driver::Driver;
use crate::error::{InitError, InitResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics: u32,
    pub present: u32,
}

impl QueueFamilyIndices {
    pub fn is_shared(&self) -> bool {
        self.graphics == self.present
    }

    /// Distinct family indices, graphics first.
    pub fn unique(&self) -> Vec<u32> {
        if self.is_shared() {
            vec![self.graphics]
        } else {
            vec![self.graphics, self.present]
        }
    }
}

/// Single forward scan over `families`.
///
/// Takes the first graphics-capable family and the first family for which
/// `supports_present` holds. Stops as soon as both are known.
pub fn find_queue_families<F>(
    families: &[vk::QueueFamilyProperties],
    mut supports_present: F,
) -> InitResult<QueueFamilyIndices>
where
    F: FnMut(u32) -> VkResult<bool>,
{
    let mut graphics = None;
    let mut present = None;

    for (index, family) in (0u32..).zip(families) {
        if family.queue_count == 0 {
            continue;
        }

        if graphics.is_none() && family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
            graphics = Some(index);
        }

        if present.is_none() && supports_present(index).map_err(InitError::DeviceQuery)? {
            present = Some(index);
        }

        if graphics.is_some() && present.is_some() {
            break;
        }
    }

    match (graphics, present) {
        (Some(graphics), Some(present)) => Ok(QueueFamilyIndices { graphics, present }),
        (graphics, present) => Err(InitError::QueueFamilyNotFound { graphics, present }),
    }
}

pub fn resolve_queue_families<D: Driver>(
    driver: &D,
    physical_device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
) -> InitResult<QueueFamilyIndices> {
    let families = driver
        .queue_family_properties(physical_device)
        .map_err(InitError::DeviceQuery)?;

    let indices = find_queue_families(&families, |index| {
        driver.surface_support(physical_device, index, surface)
    })?;

    log::debug!(
        "Queue families: graphics={} present={} ({} available)",
        indices.graphics,
        indices.present,
        families.len()
    );

    Ok(indices)
}
