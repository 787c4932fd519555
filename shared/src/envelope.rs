//! 响应信封
//!
//! 后端各资源的分页返回格式并不一致（`{data, total}` 与 `{data: {items, total}}` 并存），
//! 每个端点在协议中声明自己的原始信封类型，再统一转换为 [`Page`]，
//! 将后端的不一致隔离在这一层。

use serde::{Deserialize, Serialize};

/// 空响应或无需解析的响应
pub type Ack = serde::de::IgnoredAny;

// =========================================================
// 分页 (Pagination)
// =========================================================

/// 规范化后的分页结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// `{ "data": [...], "total": n }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatPage<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> From<FlatPage<T>> for Page<T> {
    fn from(raw: FlatPage<T>) -> Self {
        // total 缺失时以当前页条数兜底
        let total = raw.total.unwrap_or(raw.data.len() as u64);
        Page {
            items: raw.data,
            total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageItems<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// `{ "data": { "items": [...], "total": n } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedPage<T> {
    pub data: PageItems<T>,
}

impl<T> From<NestedPage<T>> for Page<T> {
    fn from(raw: NestedPage<T>) -> Self {
        let total = raw.data.total.unwrap_or(raw.data.items.len() as u64);
        Page {
            items: raw.data.items,
            total,
        }
    }
}

impl<T> From<Vec<T>> for Page<T> {
    fn from(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Page { items, total }
    }
}

// =========================================================
// 业务错误信封 (Error Envelope)
// =========================================================

/// 服务端声明的错误展示方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ShowType {
    /// 0: 静默
    Silent,
    /// 1: 警告提示
    WarnMessage,
    /// 2: 错误提示（默认）
    #[default]
    ErrorMessage,
    /// 3: 常驻通知
    Notification,
    /// 其他取值，按错误提示处理
    Other(u8),
}

impl From<u8> for ShowType {
    fn from(v: u8) -> Self {
        match v {
            0 => ShowType::Silent,
            1 => ShowType::WarnMessage,
            2 => ShowType::ErrorMessage,
            3 => ShowType::Notification,
            other => ShowType::Other(other),
        }
    }
}

impl From<ShowType> for u8 {
    fn from(v: ShowType) -> Self {
        match v {
            ShowType::Silent => 0,
            ShowType::WarnMessage => 1,
            ShowType::ErrorMessage => 2,
            ShowType::Notification => 3,
            ShowType::Other(other) => other,
        }
    }
}

/// `{ success: false, errorCode, errorMessage, showType }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub success: bool,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub show_type: Option<ShowType>,
}

impl ErrorEnvelope {
    pub fn show_type(&self) -> ShowType {
        self.show_type.unwrap_or_default()
    }
}

// =========================================================
// 批量导入结果 (Import)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRowError {
    #[serde(alias = "line")]
    pub row: u32,
    pub message: String,
}

/// 导入端点返回：总行数、成功行数、失败行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub success: u32,
    #[serde(default)]
    pub errors: Vec<ImportRowError>,
}

impl ImportResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_and_flat_pages_normalize_to_same_shape() {
        let flat: FlatPage<i64> = serde_json::from_value(json!({ "data": [1, 2], "total": 7 })).unwrap();
        let nested: NestedPage<i64> =
            serde_json::from_value(json!({ "data": { "items": [1, 2], "total": 7 } })).unwrap();

        assert_eq!(Page::from(flat), Page::from(nested));
    }

    #[test]
    fn missing_total_falls_back_to_item_count() {
        let flat: FlatPage<i64> = serde_json::from_value(json!({ "data": [4, 5, 6] })).unwrap();
        assert_eq!(Page::from(flat).total, 3);
    }

    #[test]
    fn error_envelope_show_type_defaults_to_error_message() {
        let env: ErrorEnvelope = serde_json::from_value(json!({
            "success": false,
            "errorCode": "E_DUP",
            "errorMessage": "Duplicate class_name"
        }))
        .unwrap();
        assert_eq!(env.show_type(), ShowType::ErrorMessage);

        let env: ErrorEnvelope =
            serde_json::from_value(json!({ "success": false, "showType": 3 })).unwrap();
        assert_eq!(env.show_type(), ShowType::Notification);

        let env: ErrorEnvelope =
            serde_json::from_value(json!({ "success": false, "showType": 9 })).unwrap();
        assert_eq!(env.show_type(), ShowType::Other(9));
    }

    #[test]
    fn import_result_accepts_line_alias() {
        let result: ImportResult = serde_json::from_value(json!({
            "total": 3,
            "success": 2,
            "errors": [{ "line": 3, "message": "type is required" }]
        }))
        .unwrap();
        assert!(!result.is_clean());
        assert_eq!(result.errors[0].row, 3);
    }
}
