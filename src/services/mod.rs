pub mod file_validator;
pub mod menu_builder;
pub mod profile_cache;
pub mod thumbnail_service;

pub use file_validator::FileValidator;
pub use menu_builder::{build_menu, MenuIcon, MenuItem};
pub use profile_cache::ProfileCache;
pub use thumbnail_service::ThumbnailService;
