//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::MarkupConfig;
pub use site::NavEntry;
pub use site::SiteConfig;
