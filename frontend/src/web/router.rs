//! 路由服务模块 - 核心引擎
//!
//! 所有对 window.history 的操作都集中在此模块。
//! 导航流程为"请求 -> 守卫 -> 写入 History -> 更新信号"，
//! 守卫规则本身在 [`AppRoute::guard`] 中，与 DOM 无关。

use leptos::prelude::*;
use log::info;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

#[derive(Clone, Copy)]
enum HistoryMode {
    Push,
    Replace,
}

fn write_history(path: &str, mode: HistoryMode) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let _ = match mode {
        HistoryMode::Push => history.push_state_with_url(&JsValue::NULL, "", Some(path)),
        HistoryMode::Replace => history.replace_state_with_url(&JsValue::NULL, "", Some(path)),
    };
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新；认证状态以信号形式注入，与认证模块解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        let requested = AppRoute::from_path(&current_path());
        let initial = requested.guard(is_authenticated.get_untracked());
        if initial != requested {
            write_history(initial.to_path(), HistoryMode::Replace);
        }
        let (current_route, set_route) = signal(initial);

        Self {
            current_route,
            set_route,
            is_authenticated,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 导航到指定路径（经过守卫）
    pub fn navigate(&self, path: &str) {
        self.go(AppRoute::from_path(path), HistoryMode::Push);
    }

    fn go(&self, target: AppRoute, mode: HistoryMode) {
        let resolved = target.guard(self.is_authenticated.get_untracked());
        if resolved != target {
            info!("route {} redirected to {}", target, resolved);
        }
        write_history(resolved.to_path(), mode);
        self.set_route.set(resolved);
    }

    /// 浏览器后退/前进
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            router.go(target, HistoryMode::Replace);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化（登录、登出、令牌被清除）时重新执行守卫
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;

        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            let route = current_route.get_untracked();
            let resolved = route.guard(is_auth);
            if resolved != route {
                info!(
                    "session changed (authenticated: {}), redirecting to {}",
                    is_auth, resolved
                );
                write_history(resolved.to_path(), HistoryMode::Push);
                set_route.set(resolved);
            }
        });
    }
}

fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);
    router.init_popstate_listener();
    router.setup_auth_redirect();
    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件，应在 App 根部使用
#[component]
pub fn Router(is_authenticated: Signal<bool>, children: Children) -> impl IntoView {
    provide_router(is_authenticated);
    children()
}

/// 根据当前路由渲染对应的页面
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接：拦截点击，走 History API 而不是整页跳转
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(into, optional)] class: Signal<String>,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(to.to_path());
    };

    view! {
        <a href=to.to_path() class=move || class.get() on:click=on_click>
            {children()}
        </a>
    }
}
