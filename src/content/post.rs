//! Post model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Metadata declared in a post's front-matter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMetadata {
    pub title: String,

    /// Publication date as written (`YYYY-MM-DD` or ISO-8601)
    #[serde(rename = "publishedAt")]
    pub published_at: String,

    pub summary: String,

    /// Preview image path, site-relative
    pub image: Option<String>,

    /// Custom front-matter fields
    #[serde(default)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Slug (file name without extension)
    pub slug: String,

    pub metadata: PostMetadata,

    /// Raw markup body
    pub content: String,

    /// Parsed publication timestamp, used for ordering
    pub published: NaiveDateTime,

    /// Full source file path
    pub source: PathBuf,
}

impl Post {
    /// Site path of the post's detail page
    pub fn path(&self) -> String {
        format!("/blog/{}", self.slug)
    }

    /// Get the previous (newer) post in a sorted list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        if pos > 0 {
            Some(&posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the next (older) post in a sorted list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1)
    }
}
