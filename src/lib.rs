pub mod adb;
pub mod commands;
pub mod device;
pub mod utils;

// Re-export common items
pub use device::{get_devices, parse_device_list, select_device, DeviceSelection};
