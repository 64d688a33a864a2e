//! HTTP路由handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use weaver_core::api::InvocationOutcome;

use crate::http::{models::*, state::AppState};

/// 创建所有路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/concat", post(concat_handler))
        .route("/api/v1/chunks", get(chunks_handler))
        .route("/health", get(health_handler))
        .route("/api/v1/shutdown", post(shutdown_handler))
        .with_state(state)
}

/// POST /api/v1/concat - 调用 worker 处理两个输入字段
async fn concat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ConcatRequest>, JsonRejection>,
) -> Result<Json<ConcatResponse>, HttpServerError> {
    // 更新统计
    {
        let mut stats = state.stats.write().unwrap();
        stats.increment_request("/api/v1/concat");
    }

    // 请求体无法解析：不调用 worker，对外只返回通用错误
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            tracing::warn!(
                target: "weaver.http",
                error = %rejection,
                "malformed request body"
            );
            let mut stats = state.stats.write().unwrap();
            stats.increment_error();
            return Err(HttpServerError::MalformedRequest);
        }
    };

    match state.invoker.invoke(&req.field_a, &req.field_b).await {
        InvocationOutcome::Success { output } => Ok(Json(ConcatResponse { result: output })),
        InvocationOutcome::Failure { message } => {
            let mut stats = state.stats.write().unwrap();
            stats.increment_error();
            Err(HttpServerError::Invocation(message))
        }
    }
}

/// GET /api/v1/chunks - 按 created_at 倒序返回全部 chunk 行
async fn chunks_handler(
    State(state): State<AppState>,
) -> Result<Json<ChunksResponse>, HttpServerError> {
    // 更新统计
    {
        let mut stats = state.stats.write().unwrap();
        stats.increment_request("/api/v1/chunks");
    }

    match state.store.list().await {
        Ok(rows) => Ok(Json(ChunksResponse {
            success: true,
            data: Some(rows),
            error: None,
        })),
        Err(e) => {
            let mut stats = state.stats.write().unwrap();
            stats.increment_error();
            Err(HttpServerError::Store(e.to_string()))
        }
    }
}

/// GET /health - 健康检查
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.stats.read().unwrap();

    Json(HealthResponse {
        status: "healthy".into(),
        session_id: state.session_id.clone(),
        uptime_seconds: stats.uptime_seconds(),
        requests_handled: stats.requests_total,
        timestamp: Local::now().to_rfc3339(),
    })
}

/// POST /api/v1/shutdown - 触发优雅关闭
async fn shutdown_handler(State(state): State<AppState>) -> Json<ShutdownResponse> {
    tracing::info!(target: "weaver.http", "shutdown requested via API");
    let _ = state.shutdown_tx.send(());

    Json(ShutdownResponse {
        success: true,
        message: "shutting down".into(),
    })
}
