use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::ConnectInfo,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::context::CallerContext;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Attach a [`CallerContext`] and a request span to every request.
///
/// Never rejects: a missing or unusable `Authorization` header simply means
/// "no token", and the pipeline treats the caller as anonymous.
pub async fn request_context(mut req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    let request_id = Uuid::now_v7();
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let caller = CallerContext::new(
        request_id,
        extract_token(req.headers()).map(str::to_string),
        source_addr(req.headers(), peer),
    );

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    req.extensions_mut().insert(caller);

    let mut response = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Token from `Authorization`, either raw or as `Bearer <token>`.
///
/// The scheme matches case-insensitively; a bare `Bearer` carries no token.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match header.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        None if header.eq_ignore_ascii_case("bearer") => "",
        _ => header,
    };

    if token.is_empty() {
        return None;
    }
    Some(token)
}

/// First `X-Forwarded-For` entry when it parses, otherwise the TCP peer.
pub fn source_addr(headers: &HeaderMap, peer: Option<IpAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse().ok())
        .or(peer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn token_raw_or_bearer() {
        assert_eq!(extract_token(&headers(&[("authorization", "abc")])), Some("abc"));
        assert_eq!(extract_token(&headers(&[("authorization", "Bearer abc")])), Some("abc"));
        assert_eq!(extract_token(&headers(&[("authorization", "  Bearer   abc ")])), Some("abc"));
    }

    #[test]
    fn empty_or_missing_token_is_none() {
        assert_eq!(extract_token(&headers(&[])), None);
        assert_eq!(extract_token(&headers(&[("authorization", "")])), None);
        assert_eq!(extract_token(&headers(&[("authorization", "Bearer ")])), None);
        assert_eq!(extract_token(&headers(&[("authorization", "bearer")])), None);
        assert_eq!(extract_token(&headers(&[("authorization", "  BEARER  ")])), None);
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(extract_token(&headers(&[("authorization", "bearer abc")])), Some("abc"));
        assert_eq!(extract_token(&headers(&[("authorization", "BEARER\tabc")])), Some("abc"));
        assert_eq!(extract_token(&headers(&[("authorization", "Bearerabc")])), Some("Bearerabc"));
    }

    #[test]
    fn forwarded_for_wins_over_peer() {
        let peer: IpAddr = "10.0.0.1".parse().unwrap();
        let h = headers(&[("x-forwarded-for", "203.0.113.7, 10.0.0.2")]);
        assert_eq!(source_addr(&h, Some(peer)), Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn unparseable_forwarded_for_falls_back_to_peer() {
        let peer: IpAddr = "10.0.0.1".parse().unwrap();
        assert_eq!(source_addr(&headers(&[("x-forwarded-for", "unknown")]), Some(peer)), Some(peer));
        assert_eq!(source_addr(&headers(&[]), None), None);
    }
}
