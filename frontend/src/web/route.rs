//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面
    Login,
    /// 首页概览
    #[default]
    Overview,
    Plants,
    Diseases,
    ActivityKeywords,
    Complaints,
    ScanReports,
    Users,
    News,
    FarmingGuide,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 侧边栏中的菜单项，按显示顺序
    pub const MENU: [AppRoute; 9] = [
        AppRoute::Overview,
        AppRoute::Plants,
        AppRoute::Diseases,
        AppRoute::ActivityKeywords,
        AppRoute::Complaints,
        AppRoute::ScanReports,
        AppRoute::Users,
        AppRoute::News,
        AppRoute::FarmingGuide,
    ];

    /// 将 URL path 解析为路由枚举；忽略末尾的 `/`
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Overview,
            "/user/login" => Self::Login,
            "/plant" => Self::Plants,
            "/disease" => Self::Diseases,
            "/activity-keyword" => Self::ActivityKeywords,
            "/complaint" => Self::Complaints,
            "/scan-reports" => Self::ScanReports,
            "/users" => Self::Users,
            "/news" => Self::News,
            "/farming-guide" => Self::FarmingGuide,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/user/login",
            Self::Overview => "/",
            Self::Plants => "/plant",
            Self::Diseases => "/disease",
            Self::ActivityKeywords => "/activity-keyword",
            Self::Complaints => "/complaint",
            Self::ScanReports => "/scan-reports",
            Self::Users => "/users",
            Self::News => "/news",
            Self::FarmingGuide => "/farming-guide",
            Self::NotFound => "/404",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Overview => "Overview",
            Self::Plants => "Plants",
            Self::Diseases => "Diseases",
            Self::ActivityKeywords => "Activity Keywords",
            Self::Complaints => "Complaints",
            Self::ScanReports => "Scan Reports",
            Self::Users => "Users",
            Self::News => "News",
            Self::FarmingGuide => "Farming Guide",
            Self::NotFound => "Not Found",
        }
    }

    /// **核心守卫逻辑：除登录页外全部需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Overview
    }

    /// 守卫：给定认证状态，返回实际应当展示的路由
    pub fn guard(self, is_authenticated: bool) -> Self {
        if self.requires_auth() && !is_authenticated {
            Self::auth_failure_redirect()
        } else if self.should_redirect_when_authenticated() && is_authenticated {
            Self::auth_success_redirect()
        } else {
            self
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip_for_every_menu_entry() {
        for route in AppRoute::MENU {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
        assert_eq!(AppRoute::from_path("/user/login"), AppRoute::Login);
    }

    #[test]
    fn unknown_and_trailing_slash_paths() {
        assert_eq!(AppRoute::from_path("/plant/"), AppRoute::Plants);
        assert_eq!(AppRoute::from_path("/dashboard"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/404"), AppRoute::NotFound);
    }

    #[test]
    fn only_login_is_public() {
        assert!(!AppRoute::Login.requires_auth());
        assert!(AppRoute::NotFound.requires_auth());
        assert!(AppRoute::MENU.iter().all(AppRoute::requires_auth));
        assert_eq!(AppRoute::auth_success_redirect(), AppRoute::Overview);
        assert_eq!(AppRoute::auth_failure_redirect(), AppRoute::Login);
    }

    #[test]
    fn guard_redirects_both_ways() {
        assert_eq!(AppRoute::Diseases.guard(false), AppRoute::Login);
        assert_eq!(AppRoute::Diseases.guard(true), AppRoute::Diseases);
        assert_eq!(AppRoute::Login.guard(true), AppRoute::Overview);
        assert_eq!(AppRoute::Login.guard(false), AppRoute::Login);
    }
}
