//! 认证中间件

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::auth::gate::{TOKEN_HEADER, authorize};
use crate::core::{AppError, ServerState};

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// 共享令牌中间件
///
/// 令牌来源：`X-Bridge-Token` 头，其次 `?token=` 查询参数。
/// 被拒绝的请求不会进入处理器，返回 401 `{"ok":false,"error":"unauthorized"}`。
pub async fn require_token(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_token = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|h| h.to_str().ok());

    let query_token = Query::<TokenQuery>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(q)| q.token);

    let allowed = authorize(
        req.uri().path(),
        req.method(),
        header_token,
        query_token.as_deref(),
        state.config.token.as_deref(),
    );

    if !allowed {
        tracing::warn!(
            target: "security",
            event = "auth_rejected",
            method = %req.method(),
            path = %req.uri().path(),
            token_present = header_token.is_some() || query_token.is_some(),
            "Request rejected"
        );
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(req).await)
}
