// Errors - Initialization failure taxonomy
//
// Every variant is fatal to Context::init. Nothing here is retried.

use ash::vk;
use std::ffi::NulError;
use thiserror::Error;

use crate::window::WindowError;

/// Reason a context failed to initialize.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("window title contains a NUL byte")]
    InvalidTitle(#[from] NulError),

    #[error("context is already initialized")]
    AlreadyInitialized,

    /// Windowing runtime, window creation or extension query failed
    #[error("failed to initialize the window: {0}")]
    Init(#[source] WindowError),

    #[error("failed while creating VkInstance: {0}")]
    BackendCreation(#[source] vk::Result),

    #[error("failed to create window surface: {0}")]
    SurfaceCreation(#[source] vk::Result),

    #[error("no GPUs detected")]
    NoDevice,

    #[error("failed to find a suitable GPU")]
    NoSuitableDevice,

    /// At least one of the two slots stayed unresolved after the scan
    #[error("failed to find suitable queue families (graphics: {graphics:?}, present: {present:?})")]
    QueueFamilyNotFound {
        graphics: Option<u32>,
        present: Option<u32>,
    },

    #[error("failed to create logical device: {0}")]
    DeviceCreation(#[source] vk::Result),

    /// Enumeration, property or surface-support query rejected by the driver
    #[error("physical device query failed: {0}")]
    DeviceQuery(#[source] vk::Result),
}

pub type InitResult<T> = Result<T, InitError>;
