//! Template selection and rendering for AMP pages

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::RenderContext;
use crate::content::Post;
use crate::error::Error;

/// Key the post is exposed under in the template data
pub const DATA_KEY: &str = "post";

/// Renders a template file with a data payload
pub trait ViewRenderer: Send + Sync {
    fn render(&self, template: &Path, data: &Map<String, Value>) -> Result<String, Error>;
}

/// Output of a successful render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub template: PathBuf,
    pub html: String,
}

pub struct PageRenderer {
    views: Arc<dyn ViewRenderer>,
}

impl PageRenderer {
    pub fn new(views: Arc<dyn ViewRenderer>) -> Self {
        Self { views }
    }

    /// Render a post, rejecting missing content and pages
    pub fn render(
        &self,
        context: &RenderContext,
        content: Option<&Post>,
    ) -> Result<Rendered, Error> {
        let post = content.ok_or_else(|| Error::not_found("No post attached to the request"))?;
        if post.page {
            return Err(Error::not_found(format!(
                "{} is a page and has no AMP version",
                post.source
            )));
        }

        let template = context.template();
        let mut data = Map::new();
        data.insert(DATA_KEY.to_string(), serde_json::to_value(post)?);

        tracing::debug!("Rendering {} with {:?}", post.source, template);
        let html = self.views.render(template, &data)?;

        Ok(Rendered {
            template: template.to_path_buf(),
            html,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use std::sync::Mutex;

    /// Records every call instead of rendering
    #[derive(Default)]
    struct RecordingViews {
        calls: Mutex<Vec<(PathBuf, Map<String, Value>)>>,
    }

    impl ViewRenderer for RecordingViews {
        fn render(&self, template: &Path, data: &Map<String, Value>) -> Result<String, Error> {
            self.calls
                .lock()
                .unwrap()
                .push((template.to_path_buf(), data.clone()));
            Ok("<html amp></html>".to_string())
        }
    }

    struct FailingViews;

    impl ViewRenderer for FailingViews {
        fn render(&self, _: &Path, _: &Map<String, Value>) -> Result<String, Error> {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "views/amp.html",
            )))
        }
    }

    fn setup() -> (Arc<RecordingViews>, PageRenderer) {
        let views = Arc::new(RecordingViews::default());
        let renderer = PageRenderer::new(views.clone());
        (views, renderer)
    }

    fn fallback_only() -> RenderContext {
        RenderContext::new(None, Path::new("/opt/hexo-amp"))
    }

    fn test_post() -> Post {
        Post::new("test".to_string(), Local::now(), "_posts/test.md".to_string())
    }

    #[test]
    fn test_renders_fallback_when_theme_has_no_template() {
        let (views, renderer) = setup();
        let post = test_post();

        let rendered = renderer.render(&fallback_only(), Some(&post)).unwrap();
        assert_eq!(rendered.template, PathBuf::from("/opt/hexo-amp/views/amp.html"));
        assert_eq!(rendered.html, "<html amp></html>");

        let calls = views.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (template, data) = &calls[0];
        assert_eq!(template, &PathBuf::from("/opt/hexo-amp/views/amp.html"));
        assert_eq!(data.len(), 1);
        assert_eq!(data[DATA_KEY], serde_json::to_value(&post).unwrap());
        assert_eq!(data[DATA_KEY]["title"], "test");
    }

    #[test]
    fn test_renders_theme_template_when_present() {
        let (views, renderer) = setup();
        let ctx = RenderContext::new(
            Some(PathBuf::from("/site/themes/t/layout/amp.html")),
            Path::new("/opt/hexo-amp"),
        );

        let rendered = renderer.render(&ctx, Some(&test_post())).unwrap();
        assert_eq!(rendered.template, PathBuf::from("/site/themes/t/layout/amp.html"));
        assert_eq!(views.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_post_is_not_found() {
        let (views, renderer) = setup();
        let err = renderer.render(&fallback_only(), None).unwrap_err();
        assert!(err.is_not_found());
        assert!(views.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_page_is_not_found() {
        let (views, renderer) = setup();
        let page = Post::new_page("About".to_string(), Local::now(), "about.md".to_string());

        let err = renderer.render(&fallback_only(), Some(&page)).unwrap_err();
        assert!(err.is_not_found());
        assert!(views.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_view_errors_propagate() {
        let renderer = PageRenderer::new(Arc::new(FailingViews));
        let err = renderer
            .render(&fallback_only(), Some(&test_post()))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
