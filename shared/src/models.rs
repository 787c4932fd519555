use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =========================================================
// 植物 (Plant)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// 植物的创建/更新载荷
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// =========================================================
// 病害 (Disease)
// =========================================================

/// 病害记录
///
/// `class_name` 是识别模型输出的类别名，作为部分端点的稳定外部键。
/// `plant_name` 按名称（而非 id）引用植物。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    pub id: i64,
    pub class_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub disease_type: String,
    #[serde(default)]
    pub plant_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub image_link: Vec<String>,
}

/// 病害的创建/更新载荷，空的可选字段不会被序列化
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiseasePayload {
    pub name: String,
    pub class_name: String,
    #[serde(rename = "type")]
    pub disease_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_link: Vec<String>,
}

// =========================================================
// 活动关键词 (ActivityKeyword)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    #[default]
    Treatment,
    Prevention,
    Care,
    Harvest,
}

impl ActivityType {
    pub const ALL: [ActivityType; 4] = [
        ActivityType::Treatment,
        ActivityType::Prevention,
        ActivityType::Care,
        ActivityType::Harvest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Treatment => "TREATMENT",
            ActivityType::Prevention => "PREVENTION",
            ActivityType::Care => "CARE",
            ActivityType::Harvest => "HARVEST",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityKeyword {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub keyword_type: ActivityType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub base_days_offset: Option<i32>,
    /// 一天中的执行时间，格式 `HH:MM`
    #[serde(default)]
    pub hour_time: Option<String>,
    /// 持续时长（分钟）
    #[serde(default)]
    pub time_duration: Option<i32>,
    #[serde(default)]
    pub frequency_days: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityKeywordPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub keyword_type: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_days_offset: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_duration: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_days: Option<i32>,
}

/// 病害与活动关键词的关联
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseKeywordLink {
    pub class_name: String,
    pub keyword_id: i64,
}

// =========================================================
// 投诉 / 扫描报告 (Complaint)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    Post,
    Comment,
    Scan,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Post => "POST",
            TargetType::Comment => "COMMENT",
            TargetType::Scan => "SCAN",
        }
    }
}

/// 投诉处理状态
///
/// 状态迁移：`PENDING → REVIEWED | RESOLVED | REJECTED`，`REVIEWED → RESOLVED | REJECTED`。
/// `RESOLVED` 与 `REJECTED` 为终态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    Reviewed,
    Resolved,
    Rejected,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 4] = [
        ComplaintStatus::Pending,
        ComplaintStatus::Reviewed,
        ComplaintStatus::Resolved,
        ComplaintStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "PENDING",
            ComplaintStatus::Reviewed => "REVIEWED",
            ComplaintStatus::Resolved => "RESOLVED",
            ComplaintStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// 当前状态允许迁移到的目标状态
    pub fn next_states(&self) -> &'static [ComplaintStatus] {
        match self {
            ComplaintStatus::Pending => &[
                ComplaintStatus::Reviewed,
                ComplaintStatus::Resolved,
                ComplaintStatus::Rejected,
            ],
            ComplaintStatus::Reviewed => &[ComplaintStatus::Resolved, ComplaintStatus::Rejected],
            ComplaintStatus::Resolved | ComplaintStatus::Rejected => &[],
        }
    }

    pub fn can_transition_to(&self, next: ComplaintStatus) -> bool {
        self.next_states().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.next_states().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: i64,
    pub target_type: TargetType,
    #[serde(default)]
    pub target_id: Option<i64>,
    #[serde(default)]
    pub status: ComplaintStatus,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reporter_id: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// 扫描报告：识别模型给出的类别
    #[serde(default)]
    pub predicted_class: Option<String>,
    #[serde(default)]
    pub verified_disease_id: Option<i64>,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub admin_note: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =========================================================
// 新闻 / 博客 (News)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsStatus {
    #[default]
    Draft,
    Published,
}

impl NewsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsStatus::Draft => "draft",
            NewsStatus::Published => "published",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "draft" => Some(NewsStatus::Draft),
            "published" => Some(NewsStatus::Published),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct News {
    pub id: i64,
    pub title: String,
    /// Markdown 正文
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: NewsStatus,
    #[serde(default)]
    pub blog_tag_id: Option<i64>,
    #[serde(default)]
    pub sub_guide_stages_id: Option<i64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsPayload {
    pub title: String,
    pub content: String,
    pub status: NewsStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog_tag_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_guide_stages_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsTag {
    pub id: i64,
    pub name: String,
}

// =========================================================
// 种植指南 (GuideStage / SubGuideStage)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideStage {
    pub id: i64,
    pub plant_id: i64,
    pub stage_title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_day_offset: Option<i32>,
    #[serde(default)]
    pub end_day_offset: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuideStagePayload {
    pub plant_id: i64,
    pub stage_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_day_offset: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_day_offset: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubGuideStage {
    pub id: i64,
    pub guide_stage_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_day_offset: Option<i32>,
    #[serde(default)]
    pub end_day_offset: Option<i32>,
    /// 挂在该子阶段下的博客
    #[serde(default)]
    pub blogs: Vec<News>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubGuideStagePayload {
    pub guide_stage_id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_day_offset: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_day_offset: Option<i32>,
}

// =========================================================
// 管理员用户 (AdminUser) 与会话
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Expert,
    #[default]
    User,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Expert, UserRole::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Expert => "expert",
            UserRole::User => "user",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// 后台用户记录
///
/// 后端有的版本返回 `is_active`，有的返回 `is_disabled`，
/// 统一通过 [`AdminUser::is_active_flag`] 读取。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_disabled: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AdminUser {
    /// 用户是否处于启用状态
    ///
    /// `is_active` 优先；缺失时取 `!is_disabled`；两者都缺失视为启用。
    pub fn is_active_flag(&self) -> bool {
        match (self.is_active, self.is_disabled) {
            (Some(active), _) => active,
            (None, Some(disabled)) => !disabled,
            (None, None) => true,
        }
    }
}

/// 持久化在客户端的当前用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken", alias = "token")]
    pub access_token: String,
    pub user: SessionUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn disease_payload_omits_empty_optionals() {
        let payload = DiseasePayload {
            name: "Leaf Spot".into(),
            class_name: "leaf_spot".into(),
            disease_type: "BỆNH NẤM".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({ "name": "Leaf Spot", "class_name": "leaf_spot", "type": "BỆNH NẤM" })
        );
    }

    #[test]
    fn complaint_status_transitions() {
        assert!(ComplaintStatus::Pending.can_transition_to(ComplaintStatus::Reviewed));
        assert!(ComplaintStatus::Pending.can_transition_to(ComplaintStatus::Rejected));
        assert!(ComplaintStatus::Reviewed.can_transition_to(ComplaintStatus::Resolved));
        assert!(!ComplaintStatus::Reviewed.can_transition_to(ComplaintStatus::Pending));
        assert!(ComplaintStatus::Resolved.is_terminal());
        assert!(ComplaintStatus::Rejected.next_states().is_empty());
    }

    #[test]
    fn admin_user_active_flag_fallbacks() {
        let mut user: AdminUser = serde_json::from_value(json!({
            "id": 1, "email": "a@b.c", "username": "a", "role": "admin"
        }))
        .unwrap();
        assert!(user.is_active_flag());

        user.is_disabled = Some(true);
        assert!(!user.is_active_flag());

        user.is_active = Some(true);
        assert!(user.is_active_flag());
    }

    #[test]
    fn login_response_accepts_camel_case_token() {
        let resp: LoginResponse = serde_json::from_value(json!({
            "accessToken": "abc",
            "user": { "id": 3, "email": "root@plantdoc.vn" }
        }))
        .unwrap();
        assert_eq!(resp.access_token, "abc");
        assert_eq!(resp.user.role, UserRole::User);
    }

    #[test]
    fn enum_parsers_are_case_insensitive() {
        assert_eq!(ActivityType::parse("care"), Some(ActivityType::Care));
        assert_eq!(ComplaintStatus::parse(" resolved "), Some(ComplaintStatus::Resolved));
        assert_eq!(UserRole::parse("ADMIN"), Some(UserRole::Admin));
        assert_eq!(NewsStatus::parse("archived"), None);
    }
}
