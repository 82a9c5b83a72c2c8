pub mod config;
pub mod core;
pub mod models;
pub mod utils;

pub use crate::config::{AppConfig, CrossDevicePolicy};
pub use crate::core::mod_manager::ModManager;
pub use crate::models::error::SError;
