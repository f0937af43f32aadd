use axum::{body::Body, http::Uri, response::Response};
use colored::Colorize;
use gazette::logging::{FormatElapsedTimeOptions, SKIP_FORMAT, format_elapsed_time};
use local_ip_address::local_ip;
use std::{
    io,
    net::{IpAddr, SocketAddr},
    time::{Duration, Instant},
};
use tokio::net::TcpSocket;
use tower_http::trace::OnResponse;
use tracing::{Span, debug, info};

pub fn log_server_start(start_time: Instant, host: bool, addr: SocketAddr, server_type: &str) {
    let elapsed_time = format_elapsed_time(start_time.elapsed(), &FormatElapsedTimeOptions::section());

    info!(name: SKIP_FORMAT, "");
    info!(name: SKIP_FORMAT, "{} {}", "Gazette 📰".bold().bright_blue(), format!("{} server started in {}", server_type, elapsed_time));
    info!(name: SKIP_FORMAT, "");

    let port = addr.port();
    let url = format!("\x1b]8;;http://localhost:{port}\x1b\\http://localhost:{port}\x1b]8;;\x1b\\")
        .bold()
        .underline()
        .bright_blue();
    let network_url = match (host, local_ip()) {
        (true, Ok(local_ip)) => {
            format!("\x1b]8;;http://{local_ip}:{port}\x1b\\http://{local_ip}:{port}\x1b]8;;\x1b\\")
                .bold()
                .underline()
                .bright_magenta()
        }
        (true, Err(_)) => "Could not determine the local network address".dimmed(),
        (false, _) => "Use --host to expose the server to your network".dimmed(),
    };
    info!(name: SKIP_FORMAT, "🮔  {}    {}", "Local".bold(), url);
    info!(name: SKIP_FORMAT, "🮔  {}  {}", "Network".bold(), network_url);
    info!(name: SKIP_FORMAT, "");

    info!(name: "server", "{}", "waiting for requests...".dimmed());
}

/// Logs one line per response: colored status, request path and latency.
///
/// The path is read from a [`Uri`] response extension, see [`crate::server::remember_uri`].
#[derive(Clone, Debug)]
pub struct CustomOnResponse;

impl OnResponse<Body> for CustomOnResponse {
    fn on_response(self, response: &Response<Body>, latency: Duration, _span: &Span) {
        let status = response.status();

        if status.is_informational() {
            return;
        }

        let status = if status.is_server_error() {
            status.to_string().red()
        } else if status.is_client_error() {
            status.to_string().yellow()
        } else {
            status.to_string().green()
        };

        let uri = response
            .extensions()
            .get::<Uri>()
            .map(|uri| uri.to_string())
            .unwrap_or_default()
            .bold();

        let latency = format_elapsed_time(latency, &FormatElapsedTimeOptions::default());

        info!(name: "", "{} {} {}", status, uri, latency);
    }
}

/// First port, starting at `starting_port`, that `address` can bind.
pub fn find_open_port(address: &IpAddr, starting_port: u16) -> io::Result<u16> {
    let mut port = starting_port;

    loop {
        let socket = match address {
            IpAddr::V4(_) => TcpSocket::new_v4()?,
            IpAddr::V6(_) => TcpSocket::new_v6()?,
        };

        match socket.bind(SocketAddr::new(*address, port)) {
            Ok(_) => {
                debug!("Found open port: {}", port);
                return Ok(port);
            }
            Err(err) if port == u16::MAX => return Err(err),
            Err(_) => {
                debug!("Port {} is already in use or failed to bind, trying next one", port);
                port += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, TcpListener};

    #[tokio::test]
    async fn test_find_open_port_skips_used_ports() {
        let localhost = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let taken = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let taken_port = taken.local_addr().unwrap().port();

        let port = find_open_port(&localhost, taken_port).unwrap();

        assert_ne!(port, taken_port);
        assert!(port > taken_port);
    }
}
