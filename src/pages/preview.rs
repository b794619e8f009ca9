//! Social preview (Open Graph) metadata for post pages

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::html_escape;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialPreview {
    pub title: String,
    pub description: String,
    pub kind: String,
    pub published_time: String,
    pub url: String,
    pub image: String,
}

impl SocialPreview {
    pub fn for_post(post: &Post, config: &SiteConfig) -> Self {
        let base = config.url.trim_end_matches('/');
        let meta = &post.metadata;
        let image = match &meta.image {
            Some(image) => format!("{}{}", base, image),
            None => format!(
                "{}/og?title={}",
                base,
                utf8_percent_encode(&meta.title, NON_ALPHANUMERIC)
            ),
        };

        Self {
            title: meta.title.clone(),
            description: meta.summary.clone(),
            kind: "article".to_string(),
            published_time: meta.published_at.clone(),
            url: format!("{}{}", base, post.path()),
            image,
        }
    }

    /// Open Graph meta tags
    pub fn to_meta_tags(&self) -> String {
        [
            ("og:title", &self.title),
            ("og:description", &self.description),
            ("og:type", &self.kind),
            ("article:published_time", &self.published_time),
            ("og:url", &self.url),
            ("og:image", &self.image),
        ]
        .into_iter()
        .map(|(property, content)| {
            format!(
                r#"<meta property="{}" content="{}">"#,
                property,
                html_escape(content)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostMetadata;
    use crate::helpers::{parse_published, Zone};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn post(image: Option<&str>) -> Post {
        Post {
            slug: "hello".to_string(),
            metadata: PostMetadata {
                title: "Hello World".to_string(),
                published_at: "2024-01-01".to_string(),
                summary: "Greetings".to_string(),
                image: image.map(str::to_string),
                extra: HashMap::new(),
            },
            content: String::new(),
            published: parse_published("2024-01-01", Zone::Local).unwrap(),
            source: PathBuf::from("posts/hello.mdx"),
        }
    }

    #[test]
    fn test_preview_with_image() {
        let preview = SocialPreview::for_post(&post(Some("/images/a.png")), &SiteConfig::default());
        assert_eq!(preview.url, "https://chongland.com/blog/hello");
        assert_eq!(preview.image, "https://chongland.com/images/a.png");
        assert_eq!(preview.description, "Greetings");
        assert_eq!(preview.kind, "article");
    }

    #[test]
    fn test_preview_placeholder_image() {
        let preview = SocialPreview::for_post(&post(None), &SiteConfig::default());
        assert_eq!(preview.image, "https://chongland.com/og?title=Hello%20World");
    }

    #[test]
    fn test_meta_tags() {
        let tags = SocialPreview::for_post(&post(None), &SiteConfig::default()).to_meta_tags();
        assert!(tags.contains(r#"<meta property="og:title" content="Hello World">"#));
        assert!(tags.contains(r#"<meta property="article:published_time" content="2024-01-01">"#));
    }
}
