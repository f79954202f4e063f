// Backend module - Vulkan acquisition policy
//
// Design: policy functions over a thin Driver trait; ash implements it

pub mod device;
pub mod driver;
pub mod physical;
pub mod queue;
pub mod swapchain;

pub use device::{DeviceRequest, LogicalDevice, QueueRequest};
pub use driver::{AshDriver, Driver, PhysicalDeviceInfo};
pub use physical::SelectedDevice;
pub use queue::QueueFamilyIndices;
pub use swapchain::SwapchainSlots;
