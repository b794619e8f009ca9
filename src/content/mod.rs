//! Content module - handles posts and front-matter

mod frontmatter;
pub mod loader;
mod post;

pub use frontmatter::FrontMatter;
pub use loader::PostIndex;
pub use post::{Post, PostMetadata};
