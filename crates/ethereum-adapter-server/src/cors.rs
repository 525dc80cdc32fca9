//! CORS for the report sinks.
//!
//! The pages are served by this server, so their own reports are
//! same-origin. Cross-origin callers are limited to loopback dev servers, or
//! to `ALLOWED_ORIGINS` when it is set.

use actix_cors::Cors;
use actix_web::http::header;

const LOOPBACK_HOSTS: [&str; 2] = ["http://localhost", "http://127.0.0.1"];

pub fn build_cors(allowed_origins: &[String]) -> Cors {
    let allowed = allowed_origins.to_vec();
    Cors::default()
        .allowed_origin_fn(move |origin, _req_head| {
            let origin = origin.to_str().unwrap_or("");
            if allowed.is_empty() {
                is_loopback(origin)
            } else {
                allowed.iter().any(|a| a == origin)
            }
        })
        .allowed_methods(vec!["GET", "POST", "DELETE"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}

/// `http://localhost` or `http://127.0.0.1`, with an optional port.
pub fn is_loopback(origin: &str) -> bool {
    LOOPBACK_HOSTS.iter().any(|host| match origin.strip_prefix(host) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix(':')
            .is_some_and(|port| port.parse::<u16>().is_ok()),
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_loopback() {
        assert!(is_loopback("http://localhost"));
        assert!(is_loopback("http://localhost:8000"));
        assert!(is_loopback("http://127.0.0.1:3000"));

        assert!(!is_loopback("http://localhost.evil.com"));
        assert!(!is_loopback("http://localhost:80abc"));
        assert!(!is_loopback("https://localhost"));
        assert!(!is_loopback("http://example.com"));
    }
}
