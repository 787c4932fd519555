//! 资源服务模块
//!
//! 每个后端资源一组类型化函数，以 `impl ApiClient` 的形式组织：
//! 每个函数只发出一个请求，并在这里把原始信封统一转换为 [`Page`](plantdoc_shared::Page)。

pub mod activity_keyword;
pub mod admin_user;
pub mod auth;
pub mod complaint;
pub mod disease;
pub mod guide;
pub mod news;
pub mod plant;

pub use admin_user::active_flag;

/// 下拉选项类接口一次拉取的上限
pub const OPTIONS_LIMIT: u32 = 1000;
