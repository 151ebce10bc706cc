pub mod deploy;
pub mod destroy;
pub mod render;
pub mod templates;
