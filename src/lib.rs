// =============================================================================
// ANTIMONY - Vulkan device acquisition
// =============================================================================
//
// Turns a window and the installed GPUs into a ready-to-use device:
//
//   window ─► instance ─► surface ─► physical device ─► queue families
//                                                    └─► logical device + queues
//
// Every step is fallible and irreversible; Context keeps whatever was
// acquired so cleanup() can release it in reverse order.
//
// =============================================================================

pub mod backend;
pub mod context;
pub mod error;
pub mod window;

#[cfg(test)]
mod testing;

pub use backend::{AshDriver, Driver, QueueFamilyIndices};
pub use context::Context;
pub use error::{InitError, InitResult};
pub use window::{WindowError, WindowSystem, WinitWindowSystem, WINDOW_HEIGHT, WINDOW_WIDTH};
