//! Post index - loads posts from the content directory

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{FrontMatter, Post, PostMetadata};
use crate::error::{BlogError, Result};
use crate::helpers::{parse_published, Zone};

/// Posts loaded from one scan of the content directory
#[derive(Debug, Clone, Default)]
pub struct PostIndex {
    posts: Vec<Post>,
}

impl PostIndex {
    /// Scan `dir` for `.mdx` / `.md` files, reading dates in `zone`.
    ///
    /// Entries with unreadable or incomplete front-matter are skipped with a
    /// warning, as are later files whose stem repeats an earlier slug
    /// (`hello.md` wins over `hello.mdx`). A missing directory yields an
    /// empty index.
    pub fn load<P: AsRef<Path>>(dir: P, zone: Zone) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            tracing::debug!("Content directory {:?} does not exist", dir);
            return Ok(Self::default());
        }

        let mut entries: Vec<_> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|path| path.is_file() && is_post_file(path))
            .collect();
        // Directory order is platform dependent
        entries.sort();

        let mut posts = Vec::with_capacity(entries.len());
        let mut slugs = HashSet::new();
        for path in entries {
            match load_post(&path, zone) {
                Ok(post) if !slugs.insert(post.slug.clone()) => {
                    tracing::warn!("Skipping post {:?}: slug {:?} is already taken", path, post.slug)
                }
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Skipping post {:?}: {}", path, e),
            }
        }

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), dir);
        Ok(Self { posts })
    }

    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    /// Posts in load order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Posts ordered most recent first; ties keep load order
    pub fn sorted(&self) -> Vec<Post> {
        let mut posts = self.posts.clone();
        posts.sort_by(|a, b| b.published.cmp(&a.published));
        posts
    }

    /// Resolve a post by slug
    pub fn find(&self, slug: &str) -> Result<&Post> {
        self.posts
            .iter()
            .find(|p| p.slug == slug)
            .ok_or_else(|| BlogError::NotFound {
                slug: slug.to_string(),
            })
    }
}

/// Load a single post from a file
pub fn load_post(path: &Path, zone: Zone) -> Result<Post> {
    let raw = fs::read_to_string(path)?;
    let (fm, body) = FrontMatter::parse(&raw)?;

    let missing = |field| BlogError::MissingMetadata {
        path: path.to_path_buf(),
        field,
    };
    let title = fm.title.ok_or_else(|| missing("title"))?;
    let published_at = fm.published_at.ok_or_else(|| missing("publishedAt"))?;
    let summary = fm.summary.ok_or_else(|| missing("summary"))?;
    let published = parse_published(&published_at, zone)?;

    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string();

    Ok(Post {
        slug,
        metadata: PostMetadata {
            title,
            published_at,
            summary,
            image: fm.image,
            extra: fm.extra,
        },
        content: body.to_string(),
        published,
        source: path.to_path_buf(),
    })
}

/// Check if a file is a post source file
fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "mdx" || e == "md")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_post(dir: &Path, name: &str, title: &str, date: &str) {
        let content = format!(
            "---\ntitle: '{}'\npublishedAt: '{}'\nsummary: 'About {}'\n---\n\nBody of {}.\n",
            title, date, title, title
        );
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_load_uses_file_stem_as_slug() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "hello-world.mdx", "Hello", "2024-01-01");

        let index = PostIndex::load(tmp.path(), Zone::Local).unwrap();
        assert_eq!(index.len(), 1);
        let post = index.find("hello-world").unwrap();
        assert_eq!(post.metadata.title, "Hello");
        assert_eq!(post.metadata.summary, "About Hello");
        assert_eq!(post.content, "Body of Hello.\n");
        assert_eq!(post.path(), "/blog/hello-world");
    }

    #[test]
    fn test_sorted_most_recent_first() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "a.mdx", "A", "2024-01-01");
        write_post(tmp.path(), "b.mdx", "B", "2024-03-01");
        write_post(tmp.path(), "c.md", "C", "2023-12-01");

        let index = PostIndex::load(tmp.path(), Zone::Local).unwrap();
        let dates: Vec<_> = index
            .sorted()
            .iter()
            .map(|p| p.metadata.published_at.clone())
            .collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-01-01", "2023-12-01"]);
    }

    #[test]
    fn test_ties_keep_load_order() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "first.mdx", "First", "2024-01-01");
        write_post(tmp.path(), "second.mdx", "Second", "2024-01-01");

        let index = PostIndex::load(tmp.path(), Zone::Local).unwrap();
        let slugs: Vec<_> = index.sorted().into_iter().map(|p| p.slug).collect();
        assert_eq!(slugs, vec!["first", "second"]);
    }

    #[test]
    fn test_skips_posts_missing_required_fields() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "good.mdx", "Good", "2024-01-01");
        fs::write(
            tmp.path().join("bad.mdx"),
            "---\ntitle: No date\nsummary: x\n---\nBody\n",
        )
        .unwrap();
        fs::write(tmp.path().join("notes.txt"), "not a post").unwrap();

        let index = PostIndex::load(tmp.path(), Zone::Local).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.find("bad").is_err());
    }

    #[test]
    fn test_load_post_reports_missing_field() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.mdx");
        fs::write(&path, "---\ntitle: No summary\npublishedAt: 2024-01-01\n---\n").unwrap();

        match load_post(&path, Zone::Local) {
            Err(BlogError::MissingMetadata { field, .. }) => assert_eq!(field, "summary"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_find_unknown_slug_is_not_found() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "real.mdx", "Real", "2024-01-01");
        let index = PostIndex::load(tmp.path(), Zone::Local).unwrap();

        let err = index.find("does-not-exist").unwrap_err();
        assert!(err.is_not_found());
        assert!(PostIndex::default().find("does-not-exist").unwrap_err().is_not_found());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let index = PostIndex::load(tmp.path().join("nope"), Zone::Local).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_duplicate_slug_keeps_first_file() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "hello.md", "Markdown", "2024-01-01");
        write_post(tmp.path(), "hello.mdx", "MDX", "2024-02-01");

        let index = PostIndex::load(tmp.path(), Zone::Local).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.find("hello").unwrap().metadata.title, "Markdown");
    }
}
