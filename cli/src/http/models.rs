//! HTTP API数据模型

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use weaver_core::api::ChunkRow;

// ============= Concat =============

/// POST /api/v1/concat 请求体。缺失字段按空文本处理；
/// 兼容旧版客户端的 string1/string2 键名。
#[derive(Debug, Default, Deserialize)]
pub struct ConcatRequest {
    #[serde(default, alias = "string1")]
    pub field_a: String,

    #[serde(default, alias = "string2")]
    pub field_b: String,
}

#[derive(Debug, Serialize)]
pub struct ConcatResponse {
    pub result: String,
}

// ============= Chunks =============

#[derive(Debug, Serialize)]
pub struct ChunksResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<ChunkRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============= Health =============

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub session_id: String,
    pub uptime_seconds: f64,
    pub requests_handled: u64,
    pub timestamp: String,
}

// ============= Shutdown =============

#[derive(Debug, Serialize)]
pub struct ShutdownResponse {
    pub success: bool,
    pub message: String,
}

// ============= Error Handling =============

/// Handler层错误，统一映射为 { "error": ... } 响应体。
#[derive(Debug)]
pub enum HttpServerError {
    /// 请求体缺失或无法解析：对外只返回通用消息，细节进日志。
    MalformedRequest,
    /// worker 调用失败：错误信息原样返回。
    Invocation(String),
    /// chunk 存储读取失败。
    Store(String),
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MalformedRequest => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
            Self::Invocation(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Self::Store(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}
