use crate::envelope::{Ack, FlatPage, NestedPage};
use crate::models::*;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// 该方法是否携带 JSON 请求体
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// 路径参数字段标记为 `#[serde(skip)]`，其余字段构成 JSON 请求体；
/// GET/DELETE 请求不发送请求体，过滤条件通过 `query()` 提供。
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path, relative to the API base URL.
    fn path(&self) -> String;
    /// Query string parameters.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// RFC 3986 unreserved 之外的字节都需要编码
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// 对路径片段做百分号编码（class_name 等可能含空格或非 ASCII 字符）
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

// =========================================================
// 分页参数
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub page: u32,
    pub limit: u32,
}

impl Paging {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            (crate::QUERY_PAGE, self.page.to_string()),
            (crate::QUERY_LIMIT, self.limit.to_string()),
        ]
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self::new(1, crate::DEFAULT_PAGE_SIZE)
    }
}

fn push_opt(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<String>) {
    if let Some(v) = value {
        if !v.trim().is_empty() {
            query.push((key, v));
        }
    }
}

// =========================================================
// Auth
// =========================================================

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/login".into()
    }
}

impl ApiRequest for RegisterRequest {
    type Response = AdminUser;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/register".into()
    }
}

// =========================================================
// Plants
// =========================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPlants {
    pub paging: Paging,
    pub name: Option<String>,
}

impl ApiRequest for ListPlants {
    type Response = FlatPage<Plant>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/plants".into()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut q = self.paging.query();
        push_opt(&mut q, "name", self.name.clone());
        q
    }
}

/// Create a plant
impl ApiRequest for PlantPayload {
    type Response = Plant;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/plants".into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePlant {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub payload: PlantPayload,
}

impl ApiRequest for UpdatePlant {
    type Response = Plant;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/plants/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePlant {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeletePlant {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/plants/{}", self.id)
    }
}

// =========================================================
// Diseases
// =========================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListDiseases {
    pub paging: Paging,
    pub name: Option<String>,
    pub plant_name: Option<String>,
    pub disease_type: Option<String>,
}

impl ApiRequest for ListDiseases {
    type Response = FlatPage<Disease>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/diseases".into()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut q = self.paging.query();
        push_opt(&mut q, "name", self.name.clone());
        push_opt(&mut q, "plant_name", self.plant_name.clone());
        push_opt(&mut q, "type", self.disease_type.clone());
        q
    }
}

/// Create a disease
impl ApiRequest for DiseasePayload {
    type Response = Disease;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/diseases".into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDisease {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub payload: DiseasePayload,
}

impl ApiRequest for UpdateDisease {
    type Response = Disease;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/diseases/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDisease {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeleteDisease {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/diseases/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDiseaseByClass {
    #[serde(skip)]
    pub class_name: String,
}

impl ApiRequest for GetDiseaseByClass {
    type Response = Disease;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/diseases/class/{}", encode_segment(&self.class_name))
    }
}

/// 列出某病害关联的活动关键词
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDiseaseKeywords {
    pub class_name: String,
}

impl ApiRequest for ListDiseaseKeywords {
    type Response = Vec<ActivityKeyword>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/disease-activity-keywords".into()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("class_name", self.class_name.clone())]
    }
}

/// Link a disease to an activity keyword
impl ApiRequest for DiseaseKeywordLink {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/disease-activity-keywords".into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlinkDiseaseKeyword {
    #[serde(skip)]
    pub class_name: String,
    #[serde(skip)]
    pub keyword_id: i64,
}

impl ApiRequest for UnlinkDiseaseKeyword {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!(
            "/disease-activity-keywords/{}/{}",
            encode_segment(&self.class_name),
            self.keyword_id
        )
    }
}

// =========================================================
// Activity keywords
// =========================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListActivityKeywords {
    pub paging: Paging,
    pub name: Option<String>,
    pub keyword_type: Option<ActivityType>,
}

impl ApiRequest for ListActivityKeywords {
    type Response = FlatPage<ActivityKeyword>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/activity-keywords".into()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut q = self.paging.query();
        push_opt(&mut q, "name", self.name.clone());
        push_opt(
            &mut q,
            "type",
            self.keyword_type.map(|t| t.as_str().to_string()),
        );
        q
    }
}

/// Create an activity keyword
impl ApiRequest for ActivityKeywordPayload {
    type Response = ActivityKeyword;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/activity-keywords".into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateActivityKeyword {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub payload: ActivityKeywordPayload,
}

impl ApiRequest for UpdateActivityKeyword {
    type Response = ActivityKeyword;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/activity-keywords/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteActivityKeyword {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeleteActivityKeyword {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/activity-keywords/{}", self.id)
    }
}

// =========================================================
// Complaints & scan reports
// =========================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListComplaints {
    pub paging: Paging,
    pub status: Option<ComplaintStatus>,
    pub target_type: Option<TargetType>,
    pub is_verified: Option<bool>,
}

impl ApiRequest for ListComplaints {
    type Response = NestedPage<Complaint>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/complaints".into()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut q = self.paging.query();
        push_opt(&mut q, "status", self.status.map(|s| s.as_str().to_string()));
        push_opt(
            &mut q,
            "target_type",
            self.target_type.map(|t| t.as_str().to_string()),
        );
        push_opt(&mut q, "is_verified", self.is_verified.map(|v| v.to_string()));
        q
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateComplaintStatus {
    #[serde(skip)]
    pub id: i64,
    pub status: ComplaintStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,
}

impl ApiRequest for UpdateComplaintStatus {
    type Response = Complaint;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/complaints/{}/status", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyScanReport {
    #[serde(skip)]
    pub id: i64,
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_disease_id: Option<i64>,
}

impl ApiRequest for VerifyScanReport {
    type Response = Complaint;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/complaints/{}/verify", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteComplaint {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeleteComplaint {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/complaints/{}", self.id)
    }
}

// =========================================================
// News & tags
// =========================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListNews {
    pub paging: Paging,
    pub title: Option<String>,
    pub status: Option<NewsStatus>,
    pub blog_tag_id: Option<i64>,
}

impl ApiRequest for ListNews {
    type Response = FlatPage<News>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/news".into()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut q = self.paging.query();
        push_opt(&mut q, "title", self.title.clone());
        push_opt(&mut q, "status", self.status.map(|s| s.as_str().to_string()));
        push_opt(&mut q, "blog_tag_id", self.blog_tag_id.map(|id| id.to_string()));
        q
    }
}

/// Create a news post
impl ApiRequest for NewsPayload {
    type Response = News;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/news".into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateNews {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub payload: NewsPayload,
}

impl ApiRequest for UpdateNews {
    type Response = News;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/news/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteNews {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeleteNews {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/news/{}", self.id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListNewsTags;

impl ApiRequest for ListNewsTags {
    type Response = Vec<NewsTag>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/news-tags".into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNewsTag {
    pub name: String,
}

impl ApiRequest for CreateNewsTag {
    type Response = NewsTag;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/news-tags".into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteNewsTag {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeleteNewsTag {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/news-tags/{}", self.id)
    }
}

// =========================================================
// Farming guide
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListGuideStages {
    pub plant_id: i64,
}

impl ApiRequest for ListGuideStages {
    type Response = Vec<GuideStage>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/guide-stages".into()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("plant_id", self.plant_id.to_string())]
    }
}

/// Create a guide stage
impl ApiRequest for GuideStagePayload {
    type Response = GuideStage;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/guide-stages".into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateGuideStage {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub payload: GuideStagePayload,
}

impl ApiRequest for UpdateGuideStage {
    type Response = GuideStage;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/guide-stages/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteGuideStage {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeleteGuideStage {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/guide-stages/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSubGuideStages {
    pub guide_stage_id: i64,
}

impl ApiRequest for ListSubGuideStages {
    type Response = Vec<SubGuideStage>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/sub-guide-stages".into()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("guide_stage_id", self.guide_stage_id.to_string())]
    }
}

/// Create a sub guide stage
impl ApiRequest for SubGuideStagePayload {
    type Response = SubGuideStage;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/sub-guide-stages".into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSubGuideStage {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub payload: SubGuideStagePayload,
}

impl ApiRequest for UpdateSubGuideStage {
    type Response = SubGuideStage;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/sub-guide-stages/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSubGuideStage {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeleteSubGuideStage {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/sub-guide-stages/{}", self.id)
    }
}

// =========================================================
// Admin users
// =========================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListAdminUsers {
    pub paging: Paging,
    pub search: Option<String>,
    pub role: Option<UserRole>,
}

impl ApiRequest for ListAdminUsers {
    type Response = NestedPage<AdminUser>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/admin/users".into()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut q = self.paging.query();
        push_opt(&mut q, "search", self.search.clone());
        push_opt(&mut q, "role", self.role.map(|r| r.as_str().to_string()));
        q
    }
}

/// Disable a user (dedicated state transition)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisableAdminUser {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DisableAdminUser {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/admin/users/{}/disable", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnableAdminUser {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for EnableAdminUser {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/admin/users/{}/enable", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAdminRole {
    #[serde(skip)]
    pub id: i64,
    pub role: UserRole,
}

impl ApiRequest for UpdateAdminRole {
    type Response = AdminUser;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/admin/users/{}/role", self.id)
    }
}

// =========================================================
// Bulk import endpoints (multipart)
// =========================================================

/// 支持 CSV/Excel 批量导入的资源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportTarget {
    Diseases,
    ActivityKeywords,
}

impl ImportTarget {
    pub fn path(&self) -> &'static str {
        match self {
            ImportTarget::Diseases => "/diseases/import",
            ImportTarget::ActivityKeywords => "/activity-keywords/import",
        }
    }

    /// 必填列
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            ImportTarget::Diseases => &["name", "class_name", "type"],
            ImportTarget::ActivityKeywords => &["ClassName", "keywordName", "keywordType"],
        }
    }

    /// 可选列
    pub fn optional_columns(&self) -> &'static [&'static str] {
        match self {
            ImportTarget::Diseases => &[
                "plant_name",
                "description",
                "symptoms",
                "treatment",
                "image_link",
            ],
            ImportTarget::ActivityKeywords => &[
                "description",
                "baseDaysOffset",
                "hourTime",
                "timeDuration",
                "frequencyDays",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_segment_escapes_reserved_bytes() {
        assert_eq!(encode_segment("leaf_spot"), "leaf_spot");
        assert_eq!(encode_segment("leaf spot/x"), "leaf%20spot%2Fx");
        assert_eq!(encode_segment("đốm-lá~1"), "%C4%91%E1%BB%91m-l%C3%A1~1");
    }

    #[test]
    fn list_query_drops_blank_filters() {
        let req = ListDiseases {
            paging: Paging::new(2, 20),
            name: Some("  ".into()),
            plant_name: Some("Tomato".into()),
            disease_type: None,
        };
        assert_eq!(
            req.query(),
            vec![
                ("page", "2".to_string()),
                ("limit", "20".to_string()),
                ("plant_name", "Tomato".to_string()),
            ]
        );
    }

    #[test]
    fn update_request_serializes_without_path_id() {
        let req = UpdatePlant {
            id: 9,
            payload: PlantPayload {
                name: "Rice".into(),
                description: None,
                image_url: None,
            },
        };
        assert_eq!(req.path(), "/plants/9");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({ "name": "Rice" })
        );
    }

    #[test]
    fn paging_clamps_to_one() {
        assert_eq!(Paging::new(0, 0), Paging { page: 1, limit: 1 });
    }
}
