//! PlantDoc 管理后台前端
//!
//! 采用 Context-Driven 架构：
//! - `web::route`: 路由定义
//! - `web::router`: 路由服务
//! - `auth`: API 客户端与认证状态
//! - `components`: UI 组件与各资源页面
//!
//! 请求、校验、列表与表单状态机都在核心库 `plantdoc_admin` 中，这里只负责渲染。

mod auth;
mod components {
    pub mod activity_keywords;
    pub mod complaints;
    pub mod diseases;
    pub mod farming_guide;
    mod form_kit;
    mod icons;
    mod import_dialog;
    pub mod layout;
    pub mod login;
    mod modal;
    pub mod news;
    pub mod not_found;
    pub mod notice;
    pub mod overview;
    pub mod plants;
    pub mod scan_reports;
    mod table;
    pub mod users;
}
pub(crate) mod web;

use leptos::prelude::*;

use crate::auth::{AuthContext, build_api};
use crate::components::activity_keywords::ActivityKeywordsPage;
use crate::components::complaints::ComplaintsPage;
use crate::components::diseases::DiseasesPage;
use crate::components::farming_guide::FarmingGuidePage;
use crate::components::layout::AdminLayout;
use crate::components::login::LoginPage;
use crate::components::news::NewsPage;
use crate::components::not_found::NotFoundPage;
use crate::components::notice::{NoticeCenter, NoticeContext};
use crate::components::overview::OverviewPage;
use crate::components::plants::PlantsPage;
use crate::components::scan_reports::ScanReportsPage;
use crate::components::users::UsersPage;

pub use web::init_logger;

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 登录页单独渲染，其余页面包在后台布局里。
fn route_matcher(route: AppRoute) -> AnyView {
    let page = match route {
        AppRoute::Login => return view! { <LoginPage /> }.into_any(),
        AppRoute::Overview => view! { <OverviewPage /> }.into_any(),
        AppRoute::Plants => view! { <PlantsPage /> }.into_any(),
        AppRoute::Diseases => view! { <DiseasesPage /> }.into_any(),
        AppRoute::ActivityKeywords => view! { <ActivityKeywordsPage /> }.into_any(),
        AppRoute::Complaints => view! { <ComplaintsPage /> }.into_any(),
        AppRoute::ScanReports => view! { <ScanReportsPage /> }.into_any(),
        AppRoute::Users => view! { <UsersPage /> }.into_any(),
        AppRoute::News => view! { <NewsPage /> }.into_any(),
        AppRoute::FarmingGuide => view! { <FarmingGuidePage /> }.into_any(),
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
    };
    view! { <AdminLayout route=route>{page}</AdminLayout> }.into_any()
}

#[component]
pub fn App() -> impl IntoView {
    // 1. API 客户端（含会话存储）
    let api = build_api();

    // 2. 认证上下文镜像会话存储
    let auth_ctx = AuthContext::new(api.session());
    provide_context(api);
    provide_context(auth_ctx);

    // 3. 全局提示
    provide_context(NoticeContext::new());

    // 4. 认证信号注入路由服务
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
        <NoticeCenter />
    }
}
