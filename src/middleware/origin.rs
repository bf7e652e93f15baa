//! Externally visible origin of the current request.
//!
//! Certificate verification links must point at the address visitors use,
//! which behind a reverse proxy differs from the listener's own address.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, Uri, header::HOST, request::Parts},
};

use crate::{error::AppError, routes::AppState};

/// How to work out the public origin.
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    /// Fixed origin that wins over anything in the request.
    pub public_base_url: Option<String>,
    /// Honour `X-Forwarded-Host` / `X-Forwarded-Proto`.
    pub trust_proxy: bool,
}

impl OriginPolicy {
    /// `scheme://host[:port]` without a trailing slash, if one can be determined.
    pub fn resolve(&self, headers: &HeaderMap, uri: &Uri) -> Option<String> {
        if let Some(base) = &self.public_base_url {
            return Some(base.trim_end_matches('/').to_string());
        }

        let forwarded = |name: &str| {
            if self.trust_proxy {
                first_header_value(headers, name)
            } else {
                None
            }
        };

        let host = forwarded("x-forwarded-host")
            .or_else(|| first_header_value(headers, HOST.as_str()))
            .or_else(|| uri.authority().map(|authority| authority.as_str()))?;
        let scheme = forwarded("x-forwarded-proto")
            .or_else(|| uri.scheme_str())
            .unwrap_or("http");

        Some(format!("{scheme}://{host}"))
    }
}

/// First comma-separated entry of a header, trimmed; proxies append to these.
fn first_header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Extractor yielding the request's public origin, e.g. `https://salon.example`.
#[derive(Debug, Clone)]
pub struct RequestOrigin(pub String);

impl FromRequestParts<AppState> for RequestOrigin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .origin
            .resolve(&parts.headers, &parts.uri)
            .map(RequestOrigin)
            .ok_or_else(|| AppError::Validation {
                field: None,
                message: "Request has no Host header".to_string(),
            })
    }
}
