//! Navigation bar with active-link indication

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::NavEntry;
use crate::helpers::{class_names, html_escape};

/// One rendered navigation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub path: String,
    pub name: String,
    pub active: bool,
}

/// Collapse post detail paths onto the blog index
pub fn active_path(pathname: &str) -> &str {
    if pathname.is_empty() {
        "/"
    } else if pathname.contains("/blog/") {
        "/blog"
    } else {
        pathname
    }
}

/// Navigation links for the page at `pathname`
pub fn nav_links(items: &IndexMap<String, NavEntry>, pathname: &str) -> Vec<NavLink> {
    let current = active_path(pathname);
    items
        .iter()
        .map(|(path, entry)| NavLink {
            path: path.clone(),
            name: entry.name.clone(),
            active: path == current,
        })
        .collect()
}

/// Render the navigation bar. The active link carries the indicator element
/// that the stylesheet animates between items.
pub fn render_nav(links: &[NavLink]) -> String {
    let items: String = links
        .iter()
        .map(|link| {
            let class = class_names(&["nav-link", if link.active { "" } else { "inactive" }]);
            let indicator = if link.active {
                r#"<div class="nav-indicator"></div>"#
            } else {
                ""
            };
            format!(
                r#"<a href="{}" class="{}"><span class="nav-label">{}{}</span></a>"#,
                html_escape(&link.path),
                class,
                html_escape(&link.name),
                indicator
            )
        })
        .collect();
    format!(r#"<aside class="sidebar"><nav id="nav">{}</nav></aside>"#, items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> IndexMap<String, NavEntry> {
        let mut items = IndexMap::new();
        items.insert("/".to_string(), NavEntry::new("home"));
        items.insert("/blog".to_string(), NavEntry::new("blog"));
        items.insert("/about".to_string(), NavEntry::new("about"));
        items
    }

    #[test]
    fn test_active_path() {
        assert_eq!(active_path(""), "/");
        assert_eq!(active_path("/about"), "/about");
        assert_eq!(active_path("/blog/some-post"), "/blog");
    }

    #[test]
    fn test_post_pages_activate_blog() {
        let links = nav_links(&items(), "/blog/hello");
        let active: Vec<_> = links.iter().filter(|l| l.active).map(|l| l.name.as_str()).collect();
        assert_eq!(active, vec!["blog"]);
    }

    #[test]
    fn test_render_nav_marks_active_link() {
        let html = render_nav(&nav_links(&items(), "/about"));
        assert_eq!(html.matches("nav-indicator").count(), 1);
        assert!(html.contains(r#"<a href="/about" class="nav-link"><span class="nav-label">about<div class="nav-indicator"></div></span></a>"#));
        assert!(html.contains(r#"<a href="/" class="nav-link inactive">"#));
    }
}
