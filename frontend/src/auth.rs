//! 认证模块
//!
//! 会话的唯一来源是核心库的 [`SessionStore`]。本模块订阅它的变化并镜像到
//! Leptos 信号中，路由服务通过注入的认证信号感知登录/登出。

use std::sync::Arc;

use leptos::prelude::*;
use log::{error, info};
use plantdoc_admin::config::{VAR_API_URL, VAR_IMPORT_MAX_BYTES, VAR_PAGE_SIZE};
use plantdoc_admin::{ApiClient, AppConfig, Notice, Session, SessionStore};
use plantdoc_shared::SessionUser;

use crate::web::{BrowserSessionStorage, FetchClient};

/// 页面共享的 API 客户端
pub type AdminApi = Arc<ApiClient<FetchClient>>;

/// 认证状态
#[derive(Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<SessionUser>,
    pub is_authenticated: bool,
}

impl AuthState {
    fn from_session(session: Option<&Session>) -> Self {
        Self {
            user: session.and_then(|s| s.user.clone()),
            is_authenticated: session.is_some(),
        }
    }
}

/// 认证上下文
///
/// 通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读；写入方是会话存储的订阅回调）
    pub state: ReadSignal<AuthState>,
}

impl AuthContext {
    /// 以会话存储的当前值初始化，并订阅后续变化
    pub fn new(session: &SessionStore) -> Self {
        let (state, set_state) = signal(AuthState::from_session(session.session().as_ref()));
        session.subscribe(move |current| {
            set_state.set(AuthState::from_session(current));
        });
        Self { state }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_authenticated)
    }

    pub fn user_label(&self) -> Signal<String> {
        let state = self.state;
        Signal::derive(move || {
            state
                .get()
                .user
                .map(|u| u.username)
                .unwrap_or_else(|| "Admin".to_string())
        })
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 从 Context 获取 API 客户端
pub fn use_api() -> AdminApi {
    use_context::<AdminApi>().expect("AdminApi should be provided")
}

/// 编译期注入的配置变量
fn build_var(key: &str) -> Option<String> {
    let value = match key {
        VAR_API_URL => option_env!("PLANTDOC_API_URL"),
        VAR_PAGE_SIZE => option_env!("PLANTDOC_PAGE_SIZE"),
        VAR_IMPORT_MAX_BYTES => option_env!("PLANTDOC_IMPORT_MAX_BYTES"),
        _ => None,
    };
    value.map(str::to_string)
}

/// 构建 API 客户端；配置无效时记录错误并回退到默认配置
pub fn build_api() -> AdminApi {
    let config = AppConfig::from_lookup(build_var);
    let config = match config.validate() {
        Ok(()) => config,
        Err(e) => {
            error!("invalid build configuration, using defaults: {}", e);
            AppConfig::default()
        }
    };
    info!("api base url: {}", config.api_base_url);

    let session = Arc::new(SessionStore::new(BrowserSessionStorage));
    Arc::new(ApiClient::new(FetchClient, config, session))
}

/// 登录；成功后会话存储通知订阅者，路由自动跳转到首页
pub async fn login(api: &AdminApi, email: &str, password: &str) -> Result<(), Notice> {
    match api.login(email, password).await {
        Ok(session) => {
            info!(
                "signed in as {}",
                session.user.map(|u| u.email).unwrap_or_default()
            );
            Ok(())
        }
        Err(e) => Err(e.notice()),
    }
}

/// 注销；导航由路由服务的认证状态监听自动处理
pub fn logout(api: &AdminApi) {
    api.logout();
    info!("signed out");
}
