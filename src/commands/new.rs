//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::markup::slugify;
use crate::Blog;

/// Create a post file in the content directory.
///
/// The file name is `path` when given, otherwise the slugified title.
pub fn create_post(blog: &Blog, title: &str, path: Option<&str>) -> Result<PathBuf> {
    let slug = match path {
        Some(p) => p.trim_end_matches(".mdx").to_string(),
        None => slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    fs::create_dir_all(&blog.content_dir)?;
    let file_path = blog.content_dir.join(format!("{}.mdx", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let today = blog.config.now().format("%Y-%m-%d");
    let content = format!(
        "---\ntitle: {}\npublishedAt: '{}'\nsummary: ''\n---\n",
        serde_json::to_string(title)?,
        today
    );
    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);
    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    #[test]
    fn test_create_post_is_loadable() {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::with_config(tmp.path(), SiteConfig::default());

        let path = create_post(&blog, "Hello: World", None).unwrap();
        assert_eq!(path, blog.content_dir.join("hello-world.mdx"));

        let index = blog.posts().unwrap();
        let post = index.find("hello-world").unwrap();
        assert_eq!(post.metadata.title, "Hello: World");
    }

    #[test]
    fn test_create_post_refuses_overwrite() {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::with_config(tmp.path(), SiteConfig::default());

        create_post(&blog, "Same", Some("same")).unwrap();
        assert!(create_post(&blog, "Other", Some("same")).is_err());
    }
}
