//! Configuration module

mod site;

pub use site::AmpConfig;
pub use site::HighlightConfig;
pub use site::SiteConfig;
