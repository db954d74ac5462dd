//! List site content with the AMP URL each record is served at

use anyhow::Result;

use crate::content::ContentStore;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let store = site.load_content()?;
    for line in lines(site, &store, content_type)? {
        println!("{}", line);
    }
    Ok(())
}

fn lines(site: &Site, store: &ContentStore, content_type: &str) -> Result<Vec<String>> {
    let mut out = Vec::new();

    match content_type {
        "post" | "posts" => {
            let posts: Vec<_> = store.posts().collect();
            out.push(format!("Posts ({}):", posts.len()));
            for post in posts {
                let marker = if post.published { "" } else { " (unpublished)" };
                out.push(format!(
                    "  {} - {} -> {}{}",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    site.amp_url(post),
                    marker
                ));
            }
        }
        "page" | "pages" => {
            let pages: Vec<_> = store.pages().collect();
            out.push(format!("Pages ({}):", pages.len()));
            for page in pages {
                out.push(format!("  {} [{}] (no AMP version)", page.title, page.source));
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, page", content_type);
        }
    }

    Ok(out)
}
