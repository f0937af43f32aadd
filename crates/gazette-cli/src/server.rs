//! The reader, rendered per request.
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Instant,
};

use axum::{
    Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, Uri, header},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use gazette::{
    GazetteOptions,
    blog::{Blog, Category},
    errors::StoreError,
    favorites::Favorites,
    pages::{
        PageContext, STYLESHEET, STYLESHEET_PATH, article_list_page, article_page, blog_url, category_page,
        error_page, favorites_page, home_page, not_found_page, search_page,
    },
    query::{BlogFilter, search},
    store::BlogStore,
};
use maud::Markup;
use serde::Deserialize;
use thiserror::Error;
use tokio::{net::TcpListener, signal, task::JoinError};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing::{debug, error, info};

use crate::server_utils::{CustomOnResponse, find_open_port, log_server_start};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BlogStore>,
    pub options: Arc<GazetteOptions>,
}

impl AppState {
    pub fn new(store: BlogStore, options: GazetteOptions) -> Self {
        Self {
            store: Arc::new(store),
            options: Arc::new(options),
        }
    }
}

/// Query parameters understood by every page. Each page only reads the ones it needs.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
    refresh: Option<String>,
    q: Option<String>,
    category: Option<String>,
    sort: Option<String>,
    order: Option<String>,
}

impl PageQuery {
    /// Requested page, 1 when missing or not a number. Out of range pages are clamped by the listing.
    fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|page| page.trim().parse().ok())
            .unwrap_or(1)
    }

    fn force_refresh(&self) -> bool {
        matches!(self.refresh.as_deref(), Some("1" | "true"))
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Article not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Blocking(#[from] JoinError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Store(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            ServerError::Store(_) => StatusCode::BAD_GATEWAY,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn render(&self, ctx: &PageContext, uri: &Uri) -> Response {
        let status = self.status();

        let page = if status == StatusCode::NOT_FOUND {
            not_found_page(ctx)
        } else {
            error!(name: "server", "{} failed: {}", uri.path(), self);
            error_page(ctx, &self.to_string(), &retry_url(uri))
        };

        (status, Html(page.into_string())).into_response()
    }
}

/// `uri` with `refresh=1`, so that retrying skips the cache.
fn retry_url(uri: &Uri) -> String {
    let query: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|param| !param.is_empty() && !param.starts_with("refresh="))
        .chain(["refresh=1"])
        .collect();

    format!("{}?{}", uri.path(), query.join("&"))
}

fn favorites_from(headers: &HeaderMap) -> Favorites {
    Favorites::from_cookie_header(headers.get(header::COOKIE).and_then(|value| value.to_str().ok()))
}

/// Runs a store call on the blocking pool, the API client being synchronous.
async fn fetch<T, F>(state: &AppState, f: F) -> Result<T, ServerError>
where
    F: FnOnce(&BlogStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    Ok(tokio::task::spawn_blocking(move || f(&store)).await??)
}

/// Renders `result` with the favorites of the requesting browser, or the matching error page.
fn respond<T>(
    state: &AppState,
    headers: &HeaderMap,
    uri: &Uri,
    result: Result<T, ServerError>,
    render: impl FnOnce(&PageContext, T) -> Markup,
) -> Response {
    let favorites = favorites_from(headers);
    let ctx = PageContext::server(&state.options, &favorites);

    match result {
        Ok(data) => Html(render(&ctx, data).into_string()).into_response(),
        Err(err) => err.render(&ctx, uri),
    }
}

async fn home(State(state): State<AppState>, headers: HeaderMap, uri: Uri, Query(query): Query<PageQuery>) -> Response {
    let refresh = query.force_refresh();
    let result = fetch(&state, move |store| store.all_blogs(refresh)).await;

    respond(&state, &headers, &uri, result, |ctx, blogs| home_page(ctx, &blogs))
}

async fn articles(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Response {
    let refresh = query.force_refresh();
    let filter = BlogFilter::from_params(query.category.as_deref(), query.sort.as_deref(), query.order.as_deref());
    let result = fetch(&state, move |store| store.all_blogs(refresh)).await;

    respond(&state, &headers, &uri, result, |ctx, blogs| {
        article_list_page(ctx, &blogs, &filter, query.page())
    })
}

async fn category(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Response {
    let refresh = query.force_refresh();
    let result = fetch(&state, move |store| {
        let blogs = store.category_blogs(&name, refresh)?;
        Ok((name, blogs))
    })
    .await
    .and_then(|(name, blogs)| {
        let category: Category = name.parse().map_err(StoreError::from)?;
        Ok((category, blogs))
    });

    respond(&state, &headers, &uri, result, |ctx, (category, blogs)| {
        category_page(ctx, category, &blogs, query.page())
    })
}

async fn article(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Response {
    let refresh = query.force_refresh();
    let result = fetch(&state, move |store| store.blog(&id, refresh))
        .await
        .and_then(|blog| blog.ok_or(ServerError::NotFound));

    respond(&state, &headers, &uri, result, |ctx, blog: Blog| article_page(ctx, &blog))
}

async fn search_articles(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Response {
    let refresh = query.force_refresh();
    let term = query.q.clone().unwrap_or_default();
    let result = fetch(&state, move |store| store.all_blogs(refresh)).await;

    respond(&state, &headers, &uri, result, |ctx, blogs| {
        let results: Vec<Blog> = search(&blogs, &term).into_iter().cloned().collect();
        search_page(ctx, &term, &results, query.page())
    })
}

async fn favorites(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Response {
    let refresh = query.force_refresh();
    let result = fetch(&state, move |store| store.all_blogs(refresh)).await;

    respond(&state, &headers, &uri, result, |ctx, blogs| favorites_page(ctx, &blogs))
}

/// Adds or removes `id` from the favorites cookie, then goes back to the article.
async fn toggle_favorite(Path(id): Path<String>, headers: HeaderMap) -> Response {
    let mut favorites = favorites_from(&headers);
    let added = favorites.toggle(&id);

    debug!(name: "favorites", "{} {}", if added { "added" } else { "removed" }, id);

    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, blog_url(&id)),
            (header::SET_COOKIE, favorites.to_cookie()),
        ],
    )
        .into_response()
}

async fn stylesheet() -> Response {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET).into_response()
}

async fn fallback(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let favorites = favorites_from(&headers);
    let ctx = PageContext::server(&state.options, &favorites);

    (StatusCode::NOT_FOUND, Html(not_found_page(&ctx).into_string())).into_response()
}

/// Keeps the request URI on the response, for [`CustomOnResponse`].
pub async fn remember_uri(req: Request, next: Next) -> Response {
    let uri = req.uri().clone();
    let mut res = next.run(req).await;
    res.extensions_mut().insert(uri);
    res
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/articles", get(articles))
        .route("/category/{category}", get(category))
        .route("/blog/{id}", get(article))
        .route("/search", get(search_articles))
        .route("/favorites", get(favorites))
        .route("/favorites/{id}", post(toggle_favorite))
        .route(STYLESHEET_PATH, get(stylesheet))
        .fallback(fallback)
        .layer(middleware::from_fn(remember_uri))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true))
                .on_response(CustomOnResponse),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, host: bool, port: u16) -> std::io::Result<()> {
    let start_time = Instant::now();
    let address = if host {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    } else {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    };

    info!(name: "server", "Reading blogs from {}", state.options.api_base_url);

    let port = find_open_port(&address, port)?;
    let listener = TcpListener::bind(SocketAddr::new(address, port)).await?;
    let addr = listener.local_addr()?;

    log_server_start(start_time, host, addr, "Reader");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(name: "server", "Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(name: "server", "shutting down");
}
