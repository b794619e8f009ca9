//! Heading anchor slugs

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9_\-]+").unwrap();
    static ref DASHES: Regex = Regex::new(r"-{2,}").unwrap();
}

/// Turn heading text into a URL-safe anchor id
///
/// # Examples
/// ```
/// use chongland::markup::slugify;
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("A & B"), "a-and-b");
/// ```
pub fn slugify<T: Display>(input: T) -> String {
    let text = input.to_string().to_lowercase();
    let text = WHITESPACE.replace_all(text.trim(), "-");
    let text = text.replace('&', "-and-");
    let text = NON_WORD.replace_all(&text, "");
    DASHES.replace_all(&text, "-").into_owned()
}

/// What to do when two headings in one document produce the same slug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugCollision {
    /// Keep the colliding id as-is
    #[default]
    Preserve,
    /// Append `-1`, `-2`, ... to repeated ids
    Suffix,
}

/// Per-document slug generator
#[derive(Debug, Default)]
pub struct HeadingSlugger {
    policy: SlugCollision,
    seen: HashMap<String, usize>,
}

impl HeadingSlugger {
    pub fn new(policy: SlugCollision) -> Self {
        Self {
            policy,
            seen: HashMap::new(),
        }
    }

    /// Slug for the next heading in the document
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        match self.policy {
            SlugCollision::Preserve => base,
            SlugCollision::Suffix => {
                let count = self.seen.entry(base.clone()).or_insert(0);
                let slug = if *count == 0 {
                    base
                } else {
                    format!("{}-{}", base, count)
                };
                *count += 1;
                slug
            }
        }
    }
}
