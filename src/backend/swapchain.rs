// Swapchain - Reserved presentation state
//
// Nothing in device acquisition creates these. They stay at their defaults
// until a presentation layer fills them in.

use ash::vk;

#[derive(Debug, Default)]
pub struct SwapchainSlots {
    pub swapchain: vk::SwapchainKHR,
    pub format: vk::Format,
    pub extent: vk::Extent2D,
    pub images: Vec<vk::Image>,
    pub image_views: Vec<vk::ImageView>,
}

impl SwapchainSlots {
    pub fn is_populated(&self) -> bool {
        self.swapchain != vk::SwapchainKHR::null()
    }
}
