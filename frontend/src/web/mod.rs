//! 浏览器适配层
//!
//! 核心库只依赖 `HttpClient` / `SessionStorage` 这类 trait，
//! 这里用 `web_sys` 提供 fetch、LocalStorage、文件读取、控制台日志与 History 路由的实现。

mod file;
mod http;
mod logger;
pub mod route;
pub mod router;
mod storage;

pub use file::{read_import_file, selected_files};
pub use http::FetchClient;
pub use logger::init_logger;
pub use storage::{BrowserSessionStorage, LocalStorage};
