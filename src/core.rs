pub mod cover;
pub mod launcher;
pub mod library;
pub mod metadata;
pub mod mod_manager;
pub mod relocation;
pub mod scanner;
pub mod steam;
