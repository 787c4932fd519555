//! PlantDoc 管理后台核心库
//!
//! 与 UI 无关的部分：请求管线、会话、资源服务、列表/表单/导入工作流、首页概览。
//! 通过 [`HttpClient`](request::HttpClient) 抽象传输层，可在原生环境下测试。

pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod import;
pub mod list;
pub mod notice;
pub mod pipeline;
pub mod request;
pub mod services;
pub mod session;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult, ErrorKind};
pub use notice::{Notice, NoticeChannel};
pub use pipeline::ApiClient;
pub use request::{HttpClient, HttpRequest, HttpResponse, TransportError};
pub use session::{Session, SessionStorage, SessionStore};

pub use plantdoc_shared as shared;
