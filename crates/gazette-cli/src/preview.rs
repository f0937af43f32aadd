use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    time::Instant,
};

use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse},
};
use tokio::net::TcpListener;
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{
    server::{remember_uri, shutdown_signal},
    server_utils::{CustomOnResponse, find_open_port, log_server_start},
};

/// Serves a static export. Unknown paths get the export's `404.html`.
pub fn preview_router(dist_dir: PathBuf) -> Router {
    let not_found_path = dist_dir.join("404.html");
    let handle_404 = move || async move {
        match tokio::fs::read_to_string(&not_found_path).await {
            Ok(page) => (StatusCode::NOT_FOUND, Html(page)).into_response(),
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        }
    };

    let serve_dir = ServeDir::new(dist_dir).not_found_service(handle_404.into_service());

    Router::new()
        .fallback_service(serve_dir)
        .layer(middleware::from_fn(remember_uri))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true))
                .on_response(CustomOnResponse),
        )
}

pub async fn start_preview_web_server(dist_dir: &Path, host: bool, port: u16) -> std::io::Result<()> {
    let start_time = Instant::now();
    let address = if host {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    } else {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    };

    let port = find_open_port(&address, port)?;
    let listener = TcpListener::bind(SocketAddr::new(address, port)).await?;
    let addr = listener.local_addr()?;

    log_server_start(start_time, host, addr, "Preview");

    axum::serve(listener, preview_router(dist_dir.to_path_buf()))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    async fn get(addr: SocketAddr, path: &str) -> (u16, String) {
        let url = format!("http://{}{}", addr, path);

        tokio::task::spawn_blocking(move || {
            let agent: ureq::Agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .into();
            let mut response = agent.get(&url).call().unwrap();
            let status = response.status().as_u16();
            (status, response.body_mut().read_to_string().unwrap())
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_preview_serves_export() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("blog/1")).unwrap();
        fs::write(dir.path().join("blog/1/index.html"), "<h1>First</h1>").unwrap();
        fs::write(dir.path().join("404.html"), "<h1>Lost</h1>").unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = preview_router(dir.path().to_path_buf());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        assert_eq!(get(addr, "/blog/1/").await, (200, "<h1>First</h1>".to_string()));
        assert_eq!(get(addr, "/missing").await, (404, "<h1>Lost</h1>".to_string()));
    }
}
