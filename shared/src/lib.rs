//! PlantDoc 管理后台共享模型
//!
//! 前端与核心库共用的数据结构：
//! - `models`: 后端资源实体与创建/更新载荷
//! - `envelope`: 分页信封、错误信封、导入结果
//! - `protocol`: 端点协议 (`ApiRequest`)

pub mod envelope;
pub mod models;
pub mod protocol;

pub use envelope::{
    Ack, ErrorEnvelope, FlatPage, ImportResult, ImportRowError, NestedPage, Page, PageItems,
    ShowType,
};
pub use models::*;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

/// 会话令牌在客户端存储中的键
pub const STORAGE_TOKEN_KEY: &str = "plantdoc_token";
/// 序列化用户对象在客户端存储中的键
pub const STORAGE_USER_KEY: &str = "plantdoc_user";

/// 分页查询参数名
pub const QUERY_PAGE: &str = "page";
pub const QUERY_LIMIT: &str = "limit";

pub const DEFAULT_PAGE_SIZE: u32 = 10;
