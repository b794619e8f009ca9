//! Generator module - writes the blog's pages as static HTML

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::PostIndex;
use crate::markup::{MarkupRenderer, Overrides};
use crate::pages::{self, nav_links};
use crate::templates::{SiteData, TemplateRenderer};
use crate::Blog;

/// Static site generator using the built-in templates
pub struct Generator {
    blog: Blog,
    templates: TemplateRenderer,
    markup: MarkupRenderer,
    overrides: Overrides,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            templates: TemplateRenderer::new()?,
            markup: blog.renderer(),
            overrides: Overrides::default(),
        })
    }

    /// Replace components for every post this generator renders
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Generate the entire site. Returns the number of post pages written.
    pub fn generate(&self, index: &PostIndex) -> Result<usize> {
        let public_dir = &self.blog.public_dir;
        fs::create_dir_all(public_dir)?;

        self.copy_static_assets()?;

        let site = SiteData::from(&self.blog.config);
        let rendered = pages::render_posts(
            index,
            &self.markup,
            &self.overrides,
            &self.blog.config,
            self.blog.config.now(),
        );

        let list = rendered.list_view();
        for path in ["/", "/blog"] {
            let nav = nav_links(&self.blog.config.nav, path);
            let html = self.templates.render_list(&site, &nav, &list)?;
            write_page(public_dir, path, &html)?;
        }

        for view in &rendered.views {
            let path = format!("/blog/{}", view.slug);
            let nav = nav_links(&self.blog.config.nav, &path);
            let html = self.templates.render_post(&site, &nav, view)?;
            write_page(public_dir, &path, &html)?;
        }

        let nav = nav_links(&self.blog.config.nav, "/404");
        let html = self.templates.render_not_found(&site, &nav, "/404")?;
        fs::write(public_dir.join("404.html"), html)?;

        Ok(rendered.views.len())
    }

    /// Copy the static asset directory to `public/static`
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        let target_root = self.blog.public_dir.join("static");
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            let relative = path.strip_prefix(static_dir).unwrap_or(path);
            let target = target_root.join(relative);
            if path.is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(path, &target)
                    .with_context(|| format!("Failed to copy {:?}", path))?;
            }
        }
        Ok(())
    }
}

/// Write `html` to `<public>/<path>/index.html`
fn write_page(public_dir: &Path, path: &str, html: &str) -> Result<()> {
    let dir = public_dir.join(path.trim_matches('/'));
    fs::create_dir_all(&dir)?;
    let file = dir.join("index.html");
    fs::write(&file, html).with_context(|| format!("Failed to write {:?}", file))?;
    tracing::debug!("Wrote {:?}", file);
    Ok(())
}
