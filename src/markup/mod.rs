//! Markup module - turns post bodies into HTML
//!
//! Markdown is parsed with pulldown-cmark; MDX-style component tags are
//! split out first by [`blocks`]. Every element that has a component
//! (headings, links, images, code, tables, callouts, pros/cons cards) is
//! built as a typed [`Node`] and rendered through a [`Components`] record,
//! which callers can partially replace per render with [`Overrides`].

pub mod blocks;
mod components;
mod highlight;
mod node;
mod render;
mod slug;

pub use components::{ComponentKey, Components, Overrides, Render};
pub use highlight::Highlighter;
pub use node::{
    Callout, Code, ConsCard, Heading, Image, Link, LinkKind, Node, ProsCard, TableData,
    TrustedHtml,
};
pub use render::MarkupRenderer;
pub use slug::{slugify, HeadingSlugger, SlugCollision};
