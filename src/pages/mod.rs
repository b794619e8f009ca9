//! Page composition - listing and detail views built from the post index

pub mod nav;
mod preview;

use chrono::NaiveDateTime;
use serde::Serialize;

pub use nav::{nav_links, render_nav, NavLink};
pub use preview::SocialPreview;

use crate::config::SiteConfig;
use crate::content::{Post, PostIndex};
use crate::error::{BlogError, Result};
use crate::helpers::{format_published, full_date};
use crate::markup::{MarkupRenderer, Overrides};

/// A post as shown in listings
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub href: String,
    pub date: String,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.metadata.title.clone(),
            summary: post.metadata.summary.clone(),
            href: post.path(),
            date: full_date(&post.published.date()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    pub posts: Vec<PostSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailView {
    pub slug: String,
    pub title: String,
    /// e.g. "June 15, 2024 (Today)"
    pub date: String,
    /// Rendered body HTML
    pub body: String,
    pub preview: SocialPreview,
    pub newer: Option<PostSummary>,
    pub older: Option<PostSummary>,
}

/// All posts, most recent first
pub fn list_view(index: &PostIndex) -> ListView {
    ListView {
        posts: index.sorted().iter().map(PostSummary::from).collect(),
    }
}

/// Every post rendered once. Posts that fail to render are left out of the
/// listing and the pager links, so nothing links to a page that is missing.
#[derive(Debug, Clone)]
pub struct RenderedPosts {
    /// Posts that rendered
    pub published: PostIndex,
    pub views: Vec<DetailView>,
    /// Slug and error message of every post that failed
    pub failures: Vec<(String, String)>,
}

impl RenderedPosts {
    /// Listing of the posts that rendered
    pub fn list_view(&self) -> ListView {
        list_view(&self.published)
    }

    /// Detail view for `slug`.
    ///
    /// Fails with [`crate::BlogError::NotFound`] when no post has that slug,
    /// or with [`crate::BlogError::Markup`] when the post failed to render.
    pub fn detail(&self, slug: &str) -> Result<&DetailView> {
        if let Some(view) = self.views.iter().find(|v| v.slug == slug) {
            return Ok(view);
        }
        match self.failures.iter().find(|(failed, _)| failed == slug) {
            Some((_, message)) => Err(BlogError::Markup(format!(
                "Post {} failed to render: {}",
                slug, message
            ))),
            None => Err(BlogError::NotFound {
                slug: slug.to_string(),
            }),
        }
    }
}

/// Render every post in `index` as of `now`
pub fn render_posts(
    index: &PostIndex,
    renderer: &MarkupRenderer,
    overrides: &Overrides,
    config: &SiteConfig,
    now: NaiveDateTime,
) -> RenderedPosts {
    let zone = config.zone();
    let mut rendered = Vec::new();
    let mut failures = Vec::new();

    for post in index.posts() {
        let parts = format_published(&post.metadata.published_at, now, zone)
            .and_then(|date| {
                renderer
                    .render_with(&post.content, overrides)
                    .map(|body| (date, body))
            });
        match parts {
            Ok((date, body)) => rendered.push((post.clone(), date, body)),
            Err(e) => {
                tracing::warn!("Failed to render post {}: {}", post.slug, e);
                failures.push((post.slug.clone(), e.to_string()));
            }
        }
    }

    let published =
        PostIndex::from_posts(rendered.iter().map(|(post, ..)| post.clone()).collect());
    let sorted = published.sorted();
    let views = sorted
        .iter()
        .filter_map(|post| {
            let (_, date, body) = rendered.iter().find(|(p, ..)| p.slug == post.slug)?;
            Some(DetailView {
                slug: post.slug.clone(),
                title: post.metadata.title.clone(),
                date: date.clone(),
                body: body.clone(),
                preview: SocialPreview::for_post(post, config),
                newer: post.prev(&sorted).map(PostSummary::from),
                older: post.next(&sorted).map(PostSummary::from),
            })
        })
        .collect();

    RenderedPosts {
        published,
        views,
        failures,
    }
}
