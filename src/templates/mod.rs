//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary; there is no theme directory.

use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::error::Result;
use crate::pages::{render_nav, DetailView, ListView, NavLink};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

/// Site-wide values every page can use
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            url: config.url.clone(),
        }
    }
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Text fields are escaped in the templates; rendered HTML and URLs are not
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("list.html", include_str!("site/list.html")),
            ("post.html", include_str!("site/post.html")),
            ("not_found.html", include_str!("site/not_found.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Blog listing page
    pub fn render_list(&self, site: &SiteData, nav: &[NavLink], view: &ListView) -> Result<String> {
        let mut context = base_context(site, nav);
        context.insert("posts", &view.posts);
        self.render("list.html", &context)
    }

    /// Post detail page
    pub fn render_post(
        &self,
        site: &SiteData,
        nav: &[NavLink],
        view: &DetailView,
    ) -> Result<String> {
        let mut context = base_context(site, nav);
        context.insert("post", view);
        context.insert("meta_tags", &view.preview.to_meta_tags());
        self.render("post.html", &context)
    }

    /// Not-found page for `path`
    pub fn render_not_found(&self, site: &SiteData, nav: &[NavLink], path: &str) -> Result<String> {
        let mut context = base_context(site, nav);
        context.insert("path", path);
        self.render("not_found.html", &context)
    }
}

fn base_context(site: &SiteData, nav: &[NavLink]) -> Context {
    let mut context = Context::new();
    context.insert("site", site);
    context.insert("nav", &render_nav(nav));
    context
}
