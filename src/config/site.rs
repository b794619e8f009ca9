//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::helpers::Zone;
use crate::markup::SlugCollision;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    /// IANA timezone used for "now" in relative dates; empty means local time
    pub timezone: String,

    // URL
    pub url: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub static_dir: String,

    /// Navigation items keyed by path, in display order
    pub nav: IndexMap<String, NavEntry>,

    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub markup: MarkupConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut nav = IndexMap::new();
        nav.insert("/".to_string(), NavEntry::new("home"));
        nav.insert("/about".to_string(), NavEntry::new("about"));

        Self {
            title: "Chongland".to_string(),
            description: String::new(),
            author: String::new(),
            timezone: String::new(),

            url: "https://chongland.com".to_string(),

            content_dir: "posts".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            nav,

            highlight: HighlightConfig::default(),
            markup: MarkupConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// The configured timezone; empty or unknown names mean local time
    pub fn zone(&self) -> Zone {
        if self.timezone.is_empty() {
            return Zone::Local;
        }
        match self.timezone.parse::<chrono_tz::Tz>() {
            Ok(tz) => Zone::Named(tz),
            Err(e) => {
                tracing::warn!("Unknown timezone {:?}: {}", self.timezone, e);
                Zone::Local
            }
        }
    }

    /// Current wall-clock time in the configured timezone
    pub fn now(&self) -> NaiveDateTime {
        self.zone().now()
    }
}

/// A navigation bar entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub name: String,
}

impl NavEntry {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    /// syntect theme name
    pub theme: String,
    /// Language assumed for code without one
    pub inline_language: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            inline_language: "js".to_string(),
        }
    }
}

/// Markup rendering configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    pub heading_collisions: SlugCollision,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.url, "https://chongland.com");
        assert_eq!(config.content_dir, "posts");
        let paths: Vec<_> = config.nav.keys().cloned().collect();
        assert_eq!(paths, vec!["/", "/about"]);
        assert_eq!(config.markup.heading_collisions, SlugCollision::Preserve);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
url: https://example.com
timezone: Australia/Sydney
nav:
  /blog:
    name: blog
  /:
    name: home
highlight:
  theme: InspiredGitHub
markup:
  heading_collisions: suffix
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.url, "https://example.com");
        assert_eq!(config.highlight.theme, "InspiredGitHub");
        assert_eq!(config.highlight.inline_language, "js");
        assert_eq!(config.markup.heading_collisions, SlugCollision::Suffix);
        assert_eq!(config.zone(), Zone::Named(chrono_tz::Australia::Sydney));
        let paths: Vec<_> = config.nav.keys().cloned().collect();
        assert_eq!(paths, vec!["/blog", "/"]);
    }

    #[test]
    fn test_now_falls_back_on_unknown_timezone() {
        let config = SiteConfig {
            timezone: "Nowhere/Special".to_string(),
            ..Default::default()
        };
        assert_eq!(config.zone(), Zone::Local);
        let now = config.now();
        let local = chrono::Local::now().naive_local();
        assert!((local - now).num_seconds().abs() < 5);
    }
}
