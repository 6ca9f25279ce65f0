// HTTP Redirect - Plain HTTP port answers 301 to the secure port

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

/// Router for the plain HTTP port
pub fn redirect_router(secure_port: u16) -> Router {
    Router::new().fallback(redirect).with_state(secure_port)
}

async fn redirect(State(secure_port): State<u16>, headers: HeaderMap, uri: Uri) -> Response {
    let Some(host) = headers.get(header::HOST).and_then(|h| h.to_str().ok()) else {
        return (StatusCode::BAD_REQUEST, "missing Host header").into_response();
    };
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let location = redirect_location(host, path, secure_port);
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

/// Build the secure URL for a request, swapping whatever port the host carried
pub fn redirect_location(host: &str, path: &str, secure_port: u16) -> String {
    let hostname = strip_port(host);
    if secure_port == 443 {
        format!("https://{hostname}{path}")
    } else {
        format!("https://{hostname}:{secure_port}{path}")
    }
}

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 literal, e.g. "[::1]:3333"
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}
