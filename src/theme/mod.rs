//! Theme module - locates theme templates and configuration

mod loader;

pub use loader::ThemeLoader;
