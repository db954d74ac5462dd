//! HTTP server for AMP pages

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::amp::path::canonical_path;
use crate::amp::{AmpRequest, ContentResolver, PageRenderer, RenderContext};
use crate::config::SiteConfig;
use crate::error::Error;
use crate::helpers::{decode_path, encode_path, strip_root, url_for};
use crate::lookup::PostLookup;
use crate::permalink::SitePermalinks;
use crate::templates::TemplateRenderer;
use crate::theme::ThemeLoader;
use crate::Site;

/// Everything a request needs, built once at startup
pub struct AmpState {
    pub config: SiteConfig,
    pub context: RenderContext,
    pub resolver: ContentResolver,
    pub renderer: PageRenderer,
}

impl AmpState {
    /// Load content and theme for `site` and wire the production services
    pub fn build(site: &Site, theme: &ThemeLoader) -> Result<Self> {
        let store = Arc::new(site.load_content()?);
        tracing::info!(
            "Loaded {} posts and {} pages",
            store.posts().count(),
            store.pages().count()
        );

        let config = site.config.clone();
        let permalinks = Arc::new(SitePermalinks::new(&config.permalink, &store));
        let lookup = Arc::new(PostLookup::new(store));
        let views = Arc::new(TemplateRenderer::new(&config, theme.config().clone()));

        let context = RenderContext::new(theme.template(&config.amp.template), &site.app_root);
        match &context.theme_template {
            Some(path) => tracing::info!("Using theme template {:?}", path),
            None => tracing::info!(
                "Theme has no {}, using {:?}",
                config.amp.template,
                context.fallback_template
            ),
        }

        let resolver = ContentResolver::new(
            permalinks,
            lookup,
            config.root.clone(),
            config.amp.marker.clone(),
        );

        Ok(Self {
            config,
            context,
            resolver,
            renderer: PageRenderer::new(views),
        })
    }
}

/// Build the router; `assets` is served under `<root>assets/`
pub fn router(state: Arc<AmpState>, assets: Option<PathBuf>) -> Router {
    let mut app = Router::new();
    if let Some(dir) = assets {
        let mount = url_for(&state.config, "assets");
        app = app.nest_service(&mount, ServeDir::new(dir));
    }

    app.fallback(amp_handler).with_state(state)
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let theme = ThemeLoader::load(&site.theme_dir)?;
    let state = Arc::new(AmpState::build(site, &theme)?);
    let app = router(state, theme.source_dir());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Serving AMP pages at http://{}:{}{}", ip, port, site.config.root);
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn amp_handler(State(state): State<Arc<AmpState>>, uri: Uri) -> Response {
    let config = &state.config;
    let original = decode_path(uri.path());
    let relative = strip_root(&original, &config.root);
    tracing::debug!("GET {}", original);

    if outside_root(&original, &relative, &config.root) {
        return Error::not_found(format!("{} is outside {}", original, config.root))
            .into_response();
    }

    let Some(canonical) = canonical_path(&relative, &config.amp.marker) else {
        return Error::not_found(format!("{} is not an AMP URL", original)).into_response();
    };

    if !config.amp.enable {
        return redirect(&encode_path(&url_for(config, &canonical)));
    }

    let mut request = AmpRequest::new(original).with_relative_path(relative);
    if let Err(e) = state.resolver.resolve(&mut request).await {
        return e.into_response();
    }

    match state.renderer.render(&state.context, request.content.as_ref()) {
        Ok(rendered) => Html(rendered.html).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 301 to the regular post URL
fn redirect(target: &str) -> Response {
    match HeaderValue::from_str(target) {
        Ok(location) => {
            tracing::debug!("AMP disabled, redirecting to {}", target);
            (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
        }
        Err(_) => Error::not_found(format!("{} is not a valid redirect target", target))
            .into_response(),
    }
}

fn outside_root(original: &str, relative: &str, root: &str) -> bool {
    !root.trim_end_matches('/').is_empty() && original == relative
}
