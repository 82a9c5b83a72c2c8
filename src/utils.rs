pub mod file;
pub mod icon;
pub mod logging;
pub mod process;
pub mod thread;
pub mod toml;
