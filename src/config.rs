// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

use url::Url;

use crate::error::{ApiError, ApiResult};

/// 这些是默认值，构建环境中没有提供对应变量时使用
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_PAGE_SIZE: u32 = plantdoc_shared::DEFAULT_PAGE_SIZE;
/// 导入文件大小上限：5 MiB
pub const DEFAULT_IMPORT_MAX_BYTES: u64 = 5 * 1024 * 1024;

pub const VAR_API_URL: &str = "PLANTDOC_API_URL";
pub const VAR_PAGE_SIZE: &str = "PLANTDOC_PAGE_SIZE";
pub const VAR_IMPORT_MAX_BYTES: &str = "PLANTDOC_IMPORT_MAX_BYTES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub default_page_size: u32,
    pub import_max_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            import_max_bytes: DEFAULT_IMPORT_MAX_BYTES,
        }
    }
}

impl AppConfig {
    /// 通过 key 查找变量构建配置，查不到或无法解析时使用默认值
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            api_base_url: non_empty(VAR_API_URL)
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),

            default_page_size: non_empty(VAR_PAGE_SIZE)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_PAGE_SIZE),

            import_max_bytes: non_empty(VAR_IMPORT_MAX_BYTES)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_IMPORT_MAX_BYTES),
        }
    }

    pub fn validate(&self) -> ApiResult<()> {
        let url = Url::parse(&self.api_base_url).map_err(|e| {
            ApiError::config(format!("invalid api base url '{}': {}", self.api_base_url, e))
                .in_op("config.validate")
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::config(format!(
                "unsupported api base url scheme '{}'",
                url.scheme()
            ))
            .in_op("config.validate"));
        }
        if self.default_page_size == 0 {
            return Err(ApiError::config("page size must be positive").in_op("config.validate"));
        }
        if self.import_max_bytes == 0 {
            return Err(
                ApiError::config("import size limit must be positive").in_op("config.validate")
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashMap;

    #[test]
    fn missing_vars_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn lookup_overrides_and_ignores_garbage() {
        let vars: HashMap<&str, &str> = [
            (VAR_API_URL, " https://api.plantdoc.example/v1 "),
            (VAR_PAGE_SIZE, "25"),
            (VAR_IMPORT_MAX_BYTES, "lots"),
        ]
        .into_iter()
        .collect();
        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "https://api.plantdoc.example/v1");
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.import_max_bytes, DEFAULT_IMPORT_MAX_BYTES);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = AppConfig {
            api_base_url: "not a url".into(),
            ..AppConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().kind, ErrorKind::Config);

        config.api_base_url = "ftp://files.example".into();
        assert!(config.validate().is_err());

        config = AppConfig {
            default_page_size: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
