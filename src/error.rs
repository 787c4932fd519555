use std::fmt;

use plantdoc_shared::{ErrorEnvelope, ShowType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::notice::{Notice, NoticeChannel};
use crate::request::TransportError;

// =========================================================
// 用户可见的固定文案
// =========================================================

pub const MSG_UNAUTHORIZED: &str = "Authentication failed, please sign in again.";
pub const MSG_NETWORK: &str = "Network error, please check your connection and try again.";
pub const MSG_SERIALIZATION: &str = "The server returned an unexpected response.";
pub const MSG_BUSINESS_DEFAULT: &str = "The request was rejected by the server.";

fn transport_message(status: u16) -> String {
    format!("Request failed with status code {}.", status)
}

// =========================================================
// 错误类型枚举
// =========================================================

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// 客户端校验失败，请求不会发出
    Validation,
    /// 服务端结构化业务错误 (`success: false` 信封)
    Business,
    /// 401: 鉴权失败
    Unauthorized,
    /// 其他非 2xx 状态码
    Transport,
    /// 没有收到响应
    Network,
    /// 响应体无法解析
    Serialization,
    /// 配置错误（如无效的 base URL）
    Config,
}

impl ErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Business => "BUSINESS",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Transport => "HTTP_STATUS",
            ErrorKind::Network => "NETWORK",
            ErrorKind::Serialization => "JSON_PARSE_ERROR",
            ErrorKind::Config => "CONFIG",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSpan {
    /// 操作名称，如 "plant.list", "pipeline.send"
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 请求管线的统一错误
///
/// - kind: 错误分类
/// - message: 开发者可读的消息
/// - status: HTTP 状态码（有响应时）
/// - envelope: 解析出的业务错误信封
/// - body: 原始 JSON 响应体，用于提取服务端消息
/// - spans: 结构化的调用追踪栈
#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    status: Option<u16>,
    envelope: Option<ErrorEnvelope>,
    body: Option<Value>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            envelope: None,
            body: None,
            source: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn business(envelope: ErrorEnvelope) -> Self {
        let message = envelope
            .error_message
            .clone()
            .unwrap_or_else(|| MSG_BUSINESS_DEFAULT.to_string());
        let mut err = Self::new(ErrorKind::Business, message);
        err.envelope = Some(envelope);
        err
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        let mut err = Self::new(ErrorKind::Unauthorized, message);
        err.status = Some(401);
        err
    }

    pub fn transport(status: u16) -> Self {
        let mut err = Self::new(ErrorKind::Transport, transport_message(status));
        err.status = Some(status);
        err
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    // --- Context builders (Builder Pattern) ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        self.envelope.as_ref()
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    // --- Handler ---

    /// 将错误映射为用户可见的提示
    pub fn notice(&self) -> Notice {
        match self.kind {
            ErrorKind::Business => {
                let show_type = self
                    .envelope
                    .as_ref()
                    .map(ErrorEnvelope::show_type)
                    .unwrap_or_default();
                Notice::new(channel_for(show_type), self.message.clone())
            }
            ErrorKind::Unauthorized => Notice::error(MSG_UNAUTHORIZED),
            ErrorKind::Transport => {
                Notice::error(transport_message(self.status.unwrap_or_default()))
            }
            ErrorKind::Network => Notice::error(MSG_NETWORK),
            ErrorKind::Serialization => Notice::error(MSG_SERIALIZATION),
            ErrorKind::Validation => Notice::warning(self.message.clone()),
            ErrorKind::Config => Notice::error(self.message.clone()),
        }
    }

    /// 从响应中提取服务端消息，取不到时使用 `fallback`
    ///
    /// 优先级：`error` 字段 → `message` 字段（字符串或字符串数组）→ 信封 `errorMessage` → fallback
    pub fn server_message(&self, fallback: &str) -> String {
        self.body
            .as_ref()
            .and_then(extract_server_message)
            .or_else(|| self.envelope.as_ref().and_then(|e| e.error_message.clone()))
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// showType → 展示通道
pub fn channel_for(show_type: ShowType) -> NoticeChannel {
    match show_type {
        ShowType::Silent => NoticeChannel::Silent,
        ShowType::WarnMessage => NoticeChannel::WarningToast,
        ShowType::Notification => NoticeChannel::Notification,
        ShowType::ErrorMessage | ShowType::Other(_) => NoticeChannel::ErrorToast,
    }
}

/// 从任意 JSON 响应体中提取人类可读的错误消息
pub fn extract_server_message(body: &Value) -> Option<String> {
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        if !error.trim().is_empty() {
            return Some(error.to_string());
        }
    }
    match body.get("message") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Array(items)) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::network(e.to_string()).with_source(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::serialization(e.to_string()).with_source(e)
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        ApiError::config(format!("invalid url: {}", e)).with_source(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(show_type: Option<u8>) -> ErrorEnvelope {
        ErrorEnvelope {
            success: false,
            error_code: Some("E_DUP".into()),
            error_message: Some("Duplicate class_name".into()),
            show_type: show_type.map(ShowType::from),
        }
    }

    #[test]
    fn business_notice_follows_show_type() {
        let cases = [
            (Some(0), NoticeChannel::Silent),
            (Some(1), NoticeChannel::WarningToast),
            (Some(2), NoticeChannel::ErrorToast),
            (Some(3), NoticeChannel::Notification),
            (Some(7), NoticeChannel::ErrorToast),
            (None, NoticeChannel::ErrorToast),
        ];
        for (show_type, channel) in cases {
            let notice = ApiError::business(envelope(show_type)).notice();
            assert_eq!(notice.channel, channel, "showType {:?}", show_type);
            assert_eq!(notice.message, "Duplicate class_name");
        }
    }

    #[test]
    fn unauthorized_message_differs_from_generic_status() {
        let unauthorized = ApiError::unauthorized("401").notice();
        let forbidden = ApiError::transport(403).notice();
        assert_ne!(unauthorized.message, forbidden.message);
        assert!(forbidden.message.contains("403"));
        assert_eq!(unauthorized.message, MSG_UNAUTHORIZED);
    }

    #[test]
    fn extract_prefers_error_then_message() {
        assert_eq!(
            extract_server_message(&json!({ "error": "in use", "message": "x" })),
            Some("in use".to_string())
        );
        assert_eq!(
            extract_server_message(&json!({ "message": ["name too long", "type required"] })),
            Some("name too long, type required".to_string())
        );
        assert_eq!(extract_server_message(&json!({ "statusCode": 500 })), None);
    }

    #[test]
    fn server_message_falls_back_to_default() {
        let err = ApiError::transport(500).with_body(json!({ "statusCode": 500 }));
        assert_eq!(err.server_message("Delete failed"), "Delete failed");

        let err = ApiError::transport(409).with_body(json!({ "error": "Plant is referenced" }));
        assert_eq!(err.server_message("Delete failed"), "Plant is referenced");
    }

    #[test]
    fn display_includes_trace() {
        let err = ApiError::network("connection refused")
            .in_op("pipeline.send")
            .in_op_with("plant.delete", "id=3");
        assert_eq!(
            err.to_string(),
            "[NETWORK] connection refused | trace: pipeline.send -> plant.delete(id=3)"
        );
    }
}
