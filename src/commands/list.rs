//! List posts

use anyhow::Result;

use crate::helpers::full_date;
use crate::Blog;

/// Print every post, most recent first
pub fn run(blog: &Blog) -> Result<()> {
    let index = blog.posts()?;
    println!("Posts ({}):", index.len());
    for post in index.sorted() {
        println!(
            "  {} - {} [{}]",
            full_date(&post.published.date()),
            post.metadata.title,
            post.slug
        );
    }
    Ok(())
}
