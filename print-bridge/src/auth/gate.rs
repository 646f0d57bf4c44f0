//! Shared-token authorization decision

use http::Method;
use subtle::ConstantTimeEq;

/// Header carrying the shared token
pub const TOKEN_HEADER: &str = "X-Bridge-Token";

/// Query parameter fallback for clients that cannot set headers
pub const TOKEN_QUERY_PARAM: &str = "token";

/// Path that is reachable without a token
pub const PUBLIC_PATH: &str = "/health";

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Decide whether a request may reach its handler.
///
/// Rules, first match wins:
/// 1. `/health` is always allowed
/// 2. no configured token rejects everything else
/// 3. `OPTIONS` preflights are allowed
/// 4. the header token (or, failing that, the query token) must equal the
///    configured token byte for byte
pub fn authorize(
    path: &str,
    method: &Method,
    header_token: Option<&str>,
    query_token: Option<&str>,
    configured_token: Option<&str>,
) -> bool {
    if path == PUBLIC_PATH {
        return true;
    }

    let Some(expected) = non_blank(configured_token) else {
        return false;
    };

    if *method == Method::OPTIONS {
        return true;
    }

    match non_blank(header_token).or_else(|| non_blank(query_token)) {
        Some(provided) => provided.as_bytes().ct_eq(expected.as_bytes()).into(),
        None => false,
    }
}
