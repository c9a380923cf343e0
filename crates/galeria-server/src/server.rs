//! Site server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, RawQuery, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use tower_http::services::ServeDir;

use galeria_api::{artwork, build_artwork, thumbnail_url, CollectionClient};
use galeria_site::{ArtworkPage, AssetPipeline, FeaturedArtwork, HomePage, TemplateEngine};

use crate::kiosk::{kiosk_client_script, ClientEvent, KioskMessage, KioskSession};
use crate::proxy::{self, CachedResponse, Freshness, ProxyConfig, SwrCache};

/// An artwork pinned to the attract screen.
#[derive(Debug, Clone)]
pub struct FeaturedItem {
    pub id: String,
    pub title: String,
}

/// Kiosk channel settings.
#[derive(Debug, Clone)]
pub struct KioskConfig {
    /// Whether the kiosk channel is served at all.
    pub enabled: bool,

    /// Inactivity window before a display returns to the attract screen.
    pub idle_timeout: Duration,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            idle_timeout: Duration::from_millis(90_000),
        }
    }
}

/// Configuration for the site server.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Host to bind to.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Site title shown in page heads and on the attract screen.
    pub site_title: String,

    /// The viewer widget's custom element tag.
    pub viewer_tag: String,

    /// Extra stylesheet links (fonts, overrides).
    pub styles: Vec<String>,

    /// Artworks highlighted on the attract screen.
    pub featured: Vec<FeaturedItem>,

    /// Optional directory served under /static (font files etc).
    pub assets_dir: Option<PathBuf>,

    /// Minify the generated stylesheet.
    pub minify_css: bool,

    /// Open the site in a browser on start.
    pub open: bool,

    /// Collection API proxy settings.
    pub proxy: ProxyConfig,

    /// Kiosk channel settings.
    pub kiosk: KioskConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            site_title: "Galéria".to_string(),
            viewer_tag: "micr-io".to_string(),
            styles: Vec::new(),
            featured: Vec::new(),
            assets_dir: None,
            minify_css: true,
            open: false,
            proxy: ProxyConfig::default(),
            kiosk: KioskConfig::default(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address {0}: {1}")]
    InvalidAddress(String, String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),
}

/// Shared server state.
struct ServerState {
    config: SiteConfig,
    templates: TemplateEngine,
    client: CollectionClient,
    cache: Arc<SwrCache>,
    css: String,
    kiosk_script: String,
    kiosks: AtomicUsize,
}

/// The site server.
pub struct SiteServer {
    config: SiteConfig,
}

impl SiteServer {
    /// Create a new site server.
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    /// Start serving.
    pub async fn start(self) -> Result<(), ServerError> {
        let raw_addr = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = raw_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress(raw_addr, e.to_string()))?;

        let css = generate_css(self.config.minify_css);
        let kiosk_script = kiosk_client_script(&format!("ws://{}/kiosk", addr));
        let cache = Arc::new(SwrCache::new(
            self.config.proxy.capacity,
            self.config.proxy.max_age,
        ));
        let client = CollectionClient::new(self.config.proxy.upstream.clone());
        let api_route = proxy_route_path(&self.config.proxy.prefix);

        let state = Arc::new(ServerState {
            config: self.config,
            templates: TemplateEngine::new(),
            client,
            cache,
            css,
            kiosk_script,
            kiosks: AtomicUsize::new(0),
        });

        let mut app = Router::new()
            .route("/", get(home_handler))
            .route("/dielo/{id}", get(artwork_handler))
            .route("/assets/main.css", get(css_handler))
            .route("/assets/kiosk.js", get(kiosk_script_handler))
            .route("/kiosk", get(kiosk_ws_handler))
            .route(&api_route, get(proxy_handler));

        if let Some(dir) = &state.config.assets_dir {
            app = app.nest_service("/static", ServeDir::new(dir));
        }

        let app = app.with_state(Arc::clone(&state));

        tracing::info!("Serving {} at http://{}", state.config.site_title, addr);
        tracing::info!(
            "Proxying {} to {}",
            state.config.proxy.prefix,
            state.config.proxy.upstream
        );

        if state.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Route pattern for the API proxy under its configured prefix.
fn proxy_route_path(prefix: &str) -> String {
    format!("{}/{{*path}}", prefix.trim_end_matches('/'))
}

fn generate_css(minify: bool) -> String {
    let css = AssetPipeline::generate_css();
    if !minify {
        return css;
    }
    match AssetPipeline::minify_css(&css) {
        Ok(minified) => minified,
        Err(err) => {
            tracing::warn!("Failed to minify stylesheet, serving unminified: {err}");
            css
        }
    }
}

/// Handler for the home / attract page.
async fn home_handler(State(state): State<Arc<ServerState>>) -> Response {
    let page = HomePage {
        site_title: state.config.site_title.clone(),
        styles: state.config.styles.clone(),
        featured: state
            .config
            .featured
            .iter()
            .map(|item| FeaturedArtwork {
                id: item.id.clone(),
                title: item.title.clone(),
                thumbnail: thumbnail_url(&item.id),
            })
            .collect(),
    };

    match state.templates.render_home(&page) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::error!("Failed to render home page: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handler for an artwork detail page.
async fn artwork_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Response {
    let record = match state.client.fetch_artwork(&id).await {
        Ok(record) => record,
        Err(err) => {
            tracing::warn!("Fetching artwork {id} failed: {err}");
            return (
                StatusCode::BAD_GATEWAY,
                Html(format!("<p>Dielo {id} sa nepodarilo načítať.</p>")),
            )
                .into_response();
        }
    };

    let display = build_artwork(&record);
    let page = ArtworkPage {
        site_title: state.config.site_title.clone(),
        styles: state.config.styles.clone(),
        title: artwork::title(&display).unwrap_or("Bez názvu").to_string(),
        author: artwork::author(&display).map(str::to_string),
        thumbnail: artwork::thumbnail(&display).unwrap_or_default().to_string(),
        viewer_tag: state.config.viewer_tag.clone(),
        viewer_image_id: id,
    };

    match state.templates.render_artwork(&page) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::error!("Failed to render artwork page: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handler for the generated stylesheet.
async fn css_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], state.css.clone())
}

/// Handler for the kiosk client script.
async fn kiosk_script_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        state.kiosk_script.clone(),
    )
}

/// Handler for the collection API proxy.
async fn proxy_handler(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    let key = match query {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };

    match state.cache.lookup(&key).await {
        Some((cached, Freshness::Fresh)) => upstream_response(&cached),
        Some((cached, Freshness::Stale)) => {
            proxy::spawn_revalidation(Arc::clone(&state.cache), state.client.clone(), key);
            upstream_response(&cached)
        }
        None => match proxy::fetch_and_store(&state.cache, &state.client, &key).await {
            Ok(fetched) => upstream_response(&fetched),
            Err(err) => {
                tracing::warn!("Proxy fetch for {key} failed: {err}");
                (StatusCode::BAD_GATEWAY, format!("upstream request failed: {err}"))
                    .into_response()
            }
        },
    }
}

/// Build a passthrough response from a cached upstream one.
fn upstream_response(cached: &CachedResponse) -> Response {
    let mut response = Response::new(Body::from(cached.body.as_ref().clone()));
    *response.status_mut() = StatusCode::from_u16(cached.status).unwrap_or(StatusCode::OK);
    if let Some(content_type) = &cached.content_type {
        if let Ok(value) = HeaderValue::from_str(content_type) {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
    }
    response
}

/// Handler for the kiosk WebSocket endpoint.
async fn kiosk_ws_handler(
    State(state): State<Arc<ServerState>>,
    ws: WebSocketUpgrade,
) -> Response {
    if !state.config.kiosk.enabled {
        return StatusCode::NOT_FOUND.into_response();
    }
    ws.on_upgrade(move |socket| handle_kiosk(socket, state))
}

/// Drive one kiosk display's connection.
async fn handle_kiosk(socket: WebSocket, state: Arc<ServerState>) {
    let active = state.kiosks.fetch_add(1, Ordering::SeqCst) + 1;
    tracing::info!("Kiosk connected ({active} active)");

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = tokio::sync::mpsc::channel(8);
    let mut session = KioskSession::open(state.config.kiosk.idle_timeout, tx);

    let greeting = serde_json::to_string(&KioskMessage::Connected).unwrap();
    if sink.send(Message::Text(greeting.into())).await.is_ok() {
        loop {
            tokio::select! {
                incoming = stream.next() => match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(text.as_str()) {
                            Ok(event) => session.apply(event),
                            Err(err) => tracing::debug!("Ignoring malformed kiosk event: {err}"),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                },
                queued = rx.recv() => match queued {
                    Some(message) => {
                        if matches!(message, KioskMessage::Attract) {
                            tracing::info!("Kiosk idle, returning to attract screen");
                            session.to_attract();
                        }
                        let json = serde_json::to_string(&message).unwrap();
                        if sink.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
    }

    // Dropping the session cancels any pending countdown.
    drop(session);
    let active = state.kiosks.fetch_sub(1, Ordering::SeqCst) - 1;
    tracing::info!("Kiosk disconnected ({active} active)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_server_with_default_config() {
        let server = SiteServer::new(SiteConfig::default());

        assert_eq!(server.config.port, 3000);
        assert_eq!(server.config.viewer_tag, "micr-io");
        assert_eq!(server.config.proxy.prefix, "/api");
    }

    #[test]
    fn proxy_route_strips_a_trailing_slash() {
        assert_eq!(proxy_route_path("/api"), "/api/{*path}");
        assert_eq!(proxy_route_path("/api/"), "/api/{*path}");
    }

    #[test]
    fn upstream_responses_pass_status_and_content_type_through() {
        let cached = CachedResponse {
            status: 200,
            content_type: Some("application/json; charset=utf-8".to_string()),
            body: Arc::new(b"{}".to_vec()),
            fetched_at: tokio::time::Instant::now(),
        };

        let response = upstream_response(&cached);

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json; charset=utf-8"
        );
    }
}
