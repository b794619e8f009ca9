//! Helper functions shared by rendering and templates

mod date;
mod html;

pub use date::*;
pub use html::*;
