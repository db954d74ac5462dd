//! Content loader - loads posts and pages from source directory

use anyhow::Result;
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{ContentStore, FrontMatter, MarkdownRenderer, Post};
use crate::helpers::full_url_for;
use crate::Site;

/// Loads content from the source directory
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Result<Self> {
        let highlight = &site.config.highlight;
        let renderer = MarkdownRenderer::with_options(&highlight.theme, highlight.line_number)?;
        Ok(Self { site, renderer })
    }

    /// Load posts and pages into a store
    pub fn load(&self) -> Result<ContentStore> {
        let mut records = self.load_posts()?;
        records.extend(self.load_pages()?);
        Ok(ContentStore::new(records))
    }

    /// Load all posts from source/_posts, newest first
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = self.site.source_dir.join("_posts");
        if !posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        for path in markdown_files(&posts_dir) {
            match self.load_post(&path) {
                Ok(post) if post.published || self.site.config.render_drafts => posts.push(post),
                Ok(post) => tracing::debug!("Skipping draft {}", post.source),
                Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
            }
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    /// Load all pages (markdown outside `_`-prefixed directories)
    pub fn load_pages(&self) -> Result<Vec<Post>> {
        let source_dir = &self.site.source_dir;
        if !source_dir.exists() {
            return Ok(Vec::new());
        }

        let mut pages = Vec::new();
        for path in markdown_files(source_dir) {
            let relative = path.strip_prefix(source_dir).unwrap_or(&path);
            let hidden = relative.components().any(|c| {
                c.as_os_str()
                    .to_str()
                    .map(|s| s.starts_with('_'))
                    .unwrap_or(false)
            });
            if hidden {
                continue;
            }

            match self.load_page(&path) {
                Ok(page) => pages.push(page),
                Err(e) => tracing::warn!("Failed to load page {:?}: {}", path, e),
            }
        }

        Ok(pages)
    }

    fn load_post(&self, path: &Path) -> Result<Post> {
        let (fm, body, date) = read_source(path)?;
        let source = self.source_name(path);

        // Hexo derives the slug from the filename, not the title
        let slug = fm.slug.clone().unwrap_or_else(|| file_stem(path));
        let title = fm.title.clone().unwrap_or_else(|| file_stem(path));

        let (excerpt_md, full_md) = MarkdownRenderer::split_excerpt(&body);

        let mut post = Post::new(title, date, source);
        post.slug = slug;
        post.updated = fm.parse_updated();
        post.content = self.renderer.render(&full_md);
        post.excerpt = excerpt_md.map(|e| self.renderer.render(&e));
        post.raw = body;
        post.tags = fm.tags;
        post.categories = fm.categories;
        post.layout = fm.layout.unwrap_or_else(|| "post".to_string());
        post.published = fm.published;
        post.lang = fm.lang;
        post.extra = fm.extra;
        post.path = post_path(&self.site.config.permalink, &post);
        post.permalink = full_url_for(&self.site.config, &post.path);

        Ok(post)
    }

    fn load_page(&self, path: &Path) -> Result<Post> {
        let (fm, body, date) = read_source(path)?;
        let source = self.source_name(path);

        let page_path = page_path(&source);
        let slug = fm.slug.clone().unwrap_or_else(|| {
            page_path
                .trim_matches('/')
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or("index")
                .to_string()
        });
        let title = fm.title.clone().unwrap_or_else(|| file_stem(path));

        let mut page = Post::new_page(title, date, source);
        page.slug = slug;
        page.updated = fm.parse_updated();
        page.content = self.renderer.render(&body);
        page.raw = body;
        page.layout = fm.layout.unwrap_or_else(|| "page".to_string());
        page.published = fm.published;
        page.lang = fm.lang;
        page.extra = fm.extra;
        page.path = page_path;
        page.permalink = full_url_for(&self.site.config, &page.path);

        Ok(page)
    }

    fn source_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.site.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

/// Read a source file, returning its front-matter, body and date
fn read_source(path: &Path) -> Result<(FrontMatter, String, DateTime<Local>)> {
    let content = fs::read_to_string(path)?;
    let (fm, body) = FrontMatter::parse(&content)?;
    let body = body.to_string();

    let modified = fs::metadata(path)?
        .modified()
        .ok()
        .map(DateTime::<Local>::from);
    let date = fm
        .parse_date()
        .or(modified)
        .unwrap_or_else(Local::now);

    Ok((fm, body, date))
}

/// Expand a permalink pattern for a post into a root-relative path
pub fn post_path(pattern: &str, post: &Post) -> String {
    let category = post
        .categories
        .first()
        .map(|c| slug::slugify(c))
        .unwrap_or_default();
    let date = &post.date;

    let expanded = pattern
        .replace(":year", &date.format("%Y").to_string())
        .replace(":i_month", &date.format("%-m").to_string())
        .replace(":i_day", &date.format("%-d").to_string())
        .replace(":month", &date.format("%m").to_string())
        .replace(":day", &date.format("%d").to_string())
        .replace(":title", &post.slug)
        .replace(":name", &post.slug)
        .replace(":slug", &post.slug)
        .replace(":category", &category)
        .replace(":id", &post.slug);

    format!("/{}", expanded.trim_start_matches('/'))
}

/// Root-relative path of a page from its source location
fn page_path(source: &str) -> String {
    let without_ext = source
        .trim_end_matches(".md")
        .trim_end_matches(".markdown");

    let path = if without_ext == "index" {
        String::new()
    } else if let Some(dir) = without_ext.strip_suffix("/index") {
        format!("{}/", dir)
    } else {
        format!("{}/", without_ext)
    };

    format!("/{}", path)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string()
}

fn markdown_files(dir: &Path) -> Vec<std::path::PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_markdown_file(p))
        .collect()
}

fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn write(base: &Path, rel: &str, content: &str) {
        let path = base.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site_in(dir: &Path) -> Site {
        Site::new(dir, PathBuf::from(env!("CARGO_MANIFEST_DIR"))).unwrap()
    }

    #[test]
    fn test_post_path_expands_date_tokens() {
        let date = Local.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap();
        let mut post = Post::new("Welcome".into(), date, "_posts/welcome.md".into());
        post.slug = "welcome".into();

        assert_eq!(
            post_path(":year/:month/:day/:title/", &post),
            "/2024/01/05/welcome/"
        );
        assert_eq!(post_path("/:slug/", &post), "/welcome/");
        assert_eq!(post_path(":year/:i_month/:i_day/:name/", &post), "/2024/1/5/welcome/");
    }

    #[test]
    fn test_page_path() {
        assert_eq!(page_path("about.md"), "/about/");
        assert_eq!(page_path("about/index.md"), "/about/");
        assert_eq!(page_path("index.md"), "/");
        assert_eq!(page_path("docs/guide.markdown"), "/docs/guide/");
    }

    #[test]
    fn test_load_posts_and_pages() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "_config.yml",
            "url: https://example.com\nroot: /blog/\npermalink: \":title/\"\n",
        );
        write(
            dir.path(),
            "source/_posts/welcome.md",
            "---\ntitle: Welcome\ndate: 2024-01-15\n---\nHello <!-- more --> world\n",
        );
        write(
            dir.path(),
            "source/_posts/draft.md",
            "---\ntitle: Draft\npublished: false\n---\nwip\n",
        );
        write(dir.path(), "source/about/index.md", "---\ntitle: About\n---\nMe\n");
        write(dir.path(), "source/_drafts/skip.md", "skip\n");

        let site = site_in(dir.path());
        let store = ContentLoader::new(&site).unwrap().load().unwrap();

        let posts: Vec<_> = store.posts().collect();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "welcome");
        assert_eq!(posts[0].path, "/welcome/");
        assert_eq!(posts[0].permalink, "https://example.com/blog/welcome/");
        assert!(posts[0].excerpt.is_some());

        let pages: Vec<_> = store.pages().collect();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].slug, "about");
        assert_eq!(pages[0].path, "/about/");
        assert!(pages[0].page);
    }

    #[test]
    fn test_render_drafts_keeps_unpublished() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "_config.yml", "render_drafts: true\n");
        write(
            dir.path(),
            "source/_posts/draft.md",
            "---\ntitle: Draft\npublished: false\n---\nwip\n",
        );

        let site = site_in(dir.path());
        let posts = ContentLoader::new(&site).unwrap().load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert!(!posts[0].published);
    }
}
