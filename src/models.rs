pub mod error;
pub mod library;
pub mod mod_dto;
pub mod move_record;
pub mod paths;
pub mod selector;
