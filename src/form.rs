//! 模态表单工作流
//!
//! 表单带种子值打开即为编辑模式（调用 update，携带记录 id），否则为创建模式。
//! 字段校验失败不会发出请求，弹窗保持打开并显示字段级错误。
//! 提交成功时关闭弹窗，并且只触发一次 `on_success`。

use std::collections::BTreeMap;
use std::future::Future;

use log::warn;
use plantdoc_shared::{
    ActivityKeyword, ActivityKeywordPayload, ActivityType, Disease, DiseasePayload, GuideStage,
    GuideStagePayload, News, NewsPayload, NewsStatus, Plant, PlantPayload, RegisterRequest,
    SubGuideStage, SubGuideStagePayload, UserRole,
};

use crate::error::ApiResult;
use crate::notice::Notice;

// =========================================================
// 校验规则
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MaxLen(usize),
    MinLen(usize),
    Email,
    /// 非负整数，且在 i32 范围内
    NonNegative,
    /// 闭区间整数
    Range(i32, i32),
    /// `HH:MM`
    TimeOfDay,
}

impl Rule {
    /// 返回错误消息；除 `Required` 外，空值一律视为通过
    pub fn check(&self, value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            return match self {
                Rule::Required => Some("This field is required".to_string()),
                _ => None,
            };
        }
        match *self {
            Rule::Required => None,
            Rule::MaxLen(max) if value.chars().count() > max => {
                Some(format!("Must be at most {} characters", max))
            }
            Rule::MinLen(min) if value.chars().count() < min => {
                Some(format!("Must be at least {} characters", min))
            }
            Rule::Email if !is_email(value) => Some("Invalid email address".to_string()),
            // 载荷字段是 i32，超出范围的值在这里拦下
            Rule::NonNegative => match value.parse::<i32>() {
                Ok(n) if n >= 0 => None,
                _ => Some("Must be a non-negative integer".to_string()),
            },
            Rule::Range(min, max) => match value.parse::<i32>() {
                Ok(n) if (min..=max).contains(&n) => None,
                _ => Some(format!("Must be an integer between {} and {}", min, max)),
            },
            Rule::TimeOfDay if parse_time_of_day(value).is_none() => {
                Some("Use the HH:MM format".to_string())
            }
            _ => None,
        }
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

fn parse_time_of_day(value: &str) -> Option<(u8, u8)> {
    let (h, m) = value.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let (h, m) = (h.parse::<u8>().ok()?, m.parse::<u8>().ok()?);
    (h < 24 && m < 60).then_some((h, m))
}

/// 字段名 → 错误消息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        // 每个字段只保留第一条错误
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// =========================================================
// 表单抽象
// =========================================================

/// 一个资源的表单值
pub trait ResourceForm: Clone + Default {
    type Record;
    type Payload;

    /// 用记录快照作为编辑模式的种子值
    fn from_record(record: &Self::Record) -> Self;
    fn record_id(record: &Self::Record) -> i64;
    /// (字段名, 当前值, 规则)
    fn field_rules(&self) -> Vec<(&'static str, String, &'static [Rule])>;
    /// 跨字段校验
    fn check(&self, _errors: &mut FieldErrors) {}
    fn to_payload(&self) -> Self::Payload;

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        for (field, value, rules) in self.field_rules() {
            if let Some(message) = rules.iter().find_map(|r| r.check(&value)) {
                errors.insert(field, message);
            }
        }
        self.check(&mut errors);
        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(i64),
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<T> {
    Saved(T),
    Invalid(FieldErrors),
    Failed(Notice),
}

/// 校验后按模式调用恰好一个服务函数
pub async fn submit<F, T, CreateFn, CreateFut, UpdateFn, UpdateFut>(
    form: &F,
    mode: FormMode,
    create: CreateFn,
    update: UpdateFn,
) -> SubmitOutcome<T>
where
    F: ResourceForm,
    CreateFn: FnOnce(F::Payload) -> CreateFut,
    CreateFut: Future<Output = ApiResult<T>>,
    UpdateFn: FnOnce(i64, F::Payload) -> UpdateFut,
    UpdateFut: Future<Output = ApiResult<T>>,
{
    let errors = form.validate();
    if !errors.is_empty() {
        return SubmitOutcome::Invalid(errors);
    }

    let payload = form.to_payload();
    let result = match mode {
        FormMode::Create => create(payload).await,
        FormMode::Edit(id) => update(id, payload).await,
    };
    match result {
        Ok(saved) => SubmitOutcome::Saved(saved),
        Err(e) => {
            warn!("form submit failed: {}", e);
            SubmitOutcome::Failed(e.notice())
        }
    }
}

/// 弹窗表单状态
#[derive(Debug, Clone, Default)]
pub struct ModalForm<F> {
    pub open: bool,
    pub mode: FormMode,
    pub values: F,
    pub errors: FieldErrors,
    pub submitting: bool,
}

impl<F: ResourceForm> ModalForm<F> {
    pub fn open_create(&mut self) {
        *self = Self {
            open: true,
            ..Self::default()
        };
    }

    pub fn open_edit(&mut self, record: &F::Record) {
        *self = Self {
            open: true,
            mode: FormMode::Edit(F::record_id(record)),
            values: F::from_record(record),
            ..Self::default()
        };
    }

    pub fn close(&mut self) {
        self.open = false;
        self.submitting = false;
    }

    /// 开始提交；弹窗未打开或已在提交中时返回 None
    pub fn begin_submit(&mut self) -> Option<(FormMode, F)> {
        if !self.open || self.submitting {
            return None;
        }
        self.submitting = true;
        Some((self.mode, self.values.clone()))
    }

    /// 应用提交结果，返回是否应触发 `on_success`
    pub fn finish<T>(&mut self, outcome: &SubmitOutcome<T>) -> bool {
        if !self.open {
            return false;
        }
        self.submitting = false;
        match outcome {
            SubmitOutcome::Saved(_) => {
                self.errors = FieldErrors::default();
                self.open = false;
                true
            }
            SubmitOutcome::Invalid(errors) => {
                self.errors = errors.clone();
                false
            }
            SubmitOutcome::Failed(_) => false,
        }
    }
}

/// 下拉选项版本号
///
/// 嵌套的创建弹窗成功后递增，父表单据此重新拉取选项而不关闭自身。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptionsEpoch(pub u64);

impl OptionsEpoch {
    pub fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

// =========================================================
// 辅助函数
// =========================================================

fn opt(value: &str) -> Option<String> {
    let v = value.trim();
    (!v.is_empty()).then(|| v.to_string())
}

fn opt_i32(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

fn show<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn check_day_range(start: &str, end: &str, errors: &mut FieldErrors) {
    if let (Some(s), Some(e)) = (opt_i32(start), opt_i32(end)) {
        if s > e {
            errors.insert("end_day_offset", "End day must not be before start day");
        }
    }
}

const NAME: &[Rule] = &[Rule::Required, Rule::MaxLen(255)];
const OPTIONAL_TEXT: &[Rule] = &[Rule::MaxLen(2000)];
const URL_TEXT: &[Rule] = &[Rule::MaxLen(500)];
const DAYS: &[Rule] = &[Rule::NonNegative];
const REQUIRED: &[Rule] = &[Rule::Required];
const DISEASE_TYPE: &[Rule] = &[Rule::Required, Rule::MaxLen(100)];
const TIME_OF_DAY: &[Rule] = &[Rule::TimeOfDay];
const MINUTES_IN_DAY: &[Rule] = &[Rule::Range(0, 1440)];
const FREQUENCY: &[Rule] = &[Rule::Range(1, 365)];
const EMAIL: &[Rule] = &[Rule::Required, Rule::Email];
const USERNAME: &[Rule] = &[Rule::Required, Rule::MinLen(3), Rule::MaxLen(50)];
const PASSWORD: &[Rule] = &[Rule::Required, Rule::MinLen(6)];

// =========================================================
// 各资源表单
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantForm {
    pub name: String,
    pub description: String,
    pub image_url: String,
}

impl ResourceForm for PlantForm {
    type Record = Plant;
    type Payload = PlantPayload;

    fn from_record(record: &Plant) -> Self {
        Self {
            name: record.name.clone(),
            description: show(record.description.clone()),
            image_url: show(record.image_url.clone()),
        }
    }

    fn record_id(record: &Plant) -> i64 {
        record.id
    }

    fn field_rules(&self) -> Vec<(&'static str, String, &'static [Rule])> {
        vec![
            ("name", self.name.clone(), NAME),
            ("description", self.description.clone(), OPTIONAL_TEXT),
            ("image_url", self.image_url.clone(), URL_TEXT),
        ]
    }

    fn to_payload(&self) -> PlantPayload {
        PlantPayload {
            name: self.name.trim().to_string(),
            description: opt(&self.description),
            image_url: opt(&self.image_url),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiseaseForm {
    pub name: String,
    pub class_name: String,
    pub disease_type: String,
    pub plant_name: String,
    pub description: String,
    pub symptoms: String,
    pub treatment: String,
    /// 每行一个图片链接
    pub image_links: String,
}

impl ResourceForm for DiseaseForm {
    type Record = Disease;
    type Payload = DiseasePayload;

    fn from_record(record: &Disease) -> Self {
        Self {
            name: record.name.clone(),
            class_name: record.class_name.clone(),
            disease_type: record.disease_type.clone(),
            plant_name: show(record.plant_name.clone()),
            description: show(record.description.clone()),
            symptoms: show(record.symptoms.clone()),
            treatment: show(record.treatment.clone()),
            image_links: record.image_link.join("\n"),
        }
    }

    fn record_id(record: &Disease) -> i64 {
        record.id
    }

    fn field_rules(&self) -> Vec<(&'static str, String, &'static [Rule])> {
        vec![
            ("name", self.name.clone(), NAME),
            ("class_name", self.class_name.clone(), NAME),
            ("type", self.disease_type.clone(), DISEASE_TYPE),
            ("description", self.description.clone(), OPTIONAL_TEXT),
            ("symptoms", self.symptoms.clone(), OPTIONAL_TEXT),
            ("treatment", self.treatment.clone(), OPTIONAL_TEXT),
        ]
    }

    fn to_payload(&self) -> DiseasePayload {
        DiseasePayload {
            name: self.name.trim().to_string(),
            class_name: self.class_name.trim().to_string(),
            disease_type: self.disease_type.trim().to_string(),
            plant_name: opt(&self.plant_name),
            description: opt(&self.description),
            symptoms: opt(&self.symptoms),
            treatment: opt(&self.treatment),
            image_link: self
                .image_links
                .lines()
                .filter_map(opt)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityKeywordForm {
    pub name: String,
    pub keyword_type: ActivityType,
    pub description: String,
    pub base_days_offset: String,
    pub hour_time: String,
    pub time_duration: String,
    pub frequency_days: String,
}

impl ResourceForm for ActivityKeywordForm {
    type Record = ActivityKeyword;
    type Payload = ActivityKeywordPayload;

    fn from_record(record: &ActivityKeyword) -> Self {
        Self {
            name: record.name.clone(),
            keyword_type: record.keyword_type,
            description: show(record.description.clone()),
            base_days_offset: show(record.base_days_offset),
            hour_time: show(record.hour_time.clone()),
            time_duration: show(record.time_duration),
            frequency_days: show(record.frequency_days),
        }
    }

    fn record_id(record: &ActivityKeyword) -> i64 {
        record.id
    }

    fn field_rules(&self) -> Vec<(&'static str, String, &'static [Rule])> {
        vec![
            ("name", self.name.clone(), NAME),
            ("description", self.description.clone(), OPTIONAL_TEXT),
            ("base_days_offset", self.base_days_offset.clone(), DAYS),
            ("hour_time", self.hour_time.clone(), TIME_OF_DAY),
            ("time_duration", self.time_duration.clone(), MINUTES_IN_DAY),
            ("frequency_days", self.frequency_days.clone(), FREQUENCY),
        ]
    }

    fn to_payload(&self) -> ActivityKeywordPayload {
        ActivityKeywordPayload {
            name: self.name.trim().to_string(),
            keyword_type: self.keyword_type,
            description: opt(&self.description),
            base_days_offset: opt_i32(&self.base_days_offset),
            hour_time: opt(&self.hour_time),
            time_duration: opt_i32(&self.time_duration),
            frequency_days: opt_i32(&self.frequency_days),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsForm {
    pub title: String,
    pub content: String,
    pub status: NewsStatus,
    pub blog_tag_id: Option<i64>,
    pub sub_guide_stages_id: Option<i64>,
    pub thumbnail: String,
}

impl ResourceForm for NewsForm {
    type Record = News;
    type Payload = NewsPayload;

    fn from_record(record: &News) -> Self {
        Self {
            title: record.title.clone(),
            content: record.content.clone(),
            status: record.status,
            blog_tag_id: record.blog_tag_id,
            sub_guide_stages_id: record.sub_guide_stages_id,
            thumbnail: show(record.thumbnail.clone()),
        }
    }

    fn record_id(record: &News) -> i64 {
        record.id
    }

    fn field_rules(&self) -> Vec<(&'static str, String, &'static [Rule])> {
        vec![
            ("title", self.title.clone(), NAME),
            ("content", self.content.clone(), REQUIRED),
            ("thumbnail", self.thumbnail.clone(), URL_TEXT),
        ]
    }

    fn to_payload(&self) -> NewsPayload {
        NewsPayload {
            title: self.title.trim().to_string(),
            content: self.content.clone(),
            status: self.status,
            blog_tag_id: self.blog_tag_id,
            sub_guide_stages_id: self.sub_guide_stages_id,
            thumbnail: opt(&self.thumbnail),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuideStageForm {
    pub plant_id: Option<i64>,
    pub stage_title: String,
    pub description: String,
    pub start_day_offset: String,
    pub end_day_offset: String,
}

impl ResourceForm for GuideStageForm {
    type Record = GuideStage;
    type Payload = GuideStagePayload;

    fn from_record(record: &GuideStage) -> Self {
        Self {
            plant_id: Some(record.plant_id),
            stage_title: record.stage_title.clone(),
            description: show(record.description.clone()),
            start_day_offset: show(record.start_day_offset),
            end_day_offset: show(record.end_day_offset),
        }
    }

    fn record_id(record: &GuideStage) -> i64 {
        record.id
    }

    fn field_rules(&self) -> Vec<(&'static str, String, &'static [Rule])> {
        vec![
            ("plant_id", show(self.plant_id), REQUIRED),
            ("stage_title", self.stage_title.clone(), NAME),
            ("description", self.description.clone(), OPTIONAL_TEXT),
            ("start_day_offset", self.start_day_offset.clone(), DAYS),
            ("end_day_offset", self.end_day_offset.clone(), DAYS),
        ]
    }

    fn check(&self, errors: &mut FieldErrors) {
        check_day_range(&self.start_day_offset, &self.end_day_offset, errors);
    }

    fn to_payload(&self) -> GuideStagePayload {
        GuideStagePayload {
            plant_id: self.plant_id.unwrap_or_default(),
            stage_title: self.stage_title.trim().to_string(),
            description: opt(&self.description),
            start_day_offset: opt_i32(&self.start_day_offset),
            end_day_offset: opt_i32(&self.end_day_offset),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubGuideStageForm {
    pub guide_stage_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub start_day_offset: String,
    pub end_day_offset: String,
}

impl ResourceForm for SubGuideStageForm {
    type Record = SubGuideStage;
    type Payload = SubGuideStagePayload;

    fn from_record(record: &SubGuideStage) -> Self {
        Self {
            guide_stage_id: Some(record.guide_stage_id),
            title: record.title.clone(),
            description: show(record.description.clone()),
            start_day_offset: show(record.start_day_offset),
            end_day_offset: show(record.end_day_offset),
        }
    }

    fn record_id(record: &SubGuideStage) -> i64 {
        record.id
    }

    fn field_rules(&self) -> Vec<(&'static str, String, &'static [Rule])> {
        vec![
            ("guide_stage_id", show(self.guide_stage_id), REQUIRED),
            ("title", self.title.clone(), NAME),
            ("description", self.description.clone(), OPTIONAL_TEXT),
            ("start_day_offset", self.start_day_offset.clone(), DAYS),
            ("end_day_offset", self.end_day_offset.clone(), DAYS),
        ]
    }

    fn check(&self, errors: &mut FieldErrors) {
        check_day_range(&self.start_day_offset, &self.end_day_offset, errors);
    }

    fn to_payload(&self) -> SubGuideStagePayload {
        SubGuideStagePayload {
            guide_stage_id: self.guide_stage_id.unwrap_or_default(),
            title: self.title.trim().to_string(),
            description: opt(&self.description),
            start_day_offset: opt_i32(&self.start_day_offset),
            end_day_offset: opt_i32(&self.end_day_offset),
        }
    }
}

/// 新建后台账号，只有创建模式
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

impl ResourceForm for RegisterForm {
    type Record = RegisterForm;
    type Payload = RegisterRequest;

    fn from_record(record: &RegisterForm) -> Self {
        record.clone()
    }

    fn record_id(_record: &RegisterForm) -> i64 {
        0
    }

    fn field_rules(&self) -> Vec<(&'static str, String, &'static [Rule])> {
        vec![
            ("email", self.email.clone(), EMAIL),
            ("username", self.username.clone(), USERNAME),
            ("password", self.password.clone(), PASSWORD),
        ]
    }

    fn to_payload(&self) -> RegisterRequest {
        RegisterRequest {
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            role: Some(self.role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{BASE, client_with_token, mock};
    use serde_json::json;

    #[test]
    fn rules_skip_empty_optional_values() {
        assert_eq!(Rule::Email.check(""), None);
        assert!(Rule::Required.check("   ").is_some());
        assert!(Rule::Email.check("admin@plantdoc").is_some());
        assert_eq!(Rule::Email.check("admin@plantdoc.vn"), None);
        assert!(Rule::NonNegative.check("-1").is_some());
        assert!(Rule::Range(1, 365).check("400").is_some());
        assert_eq!(Rule::TimeOfDay.check("07:30"), None);
        assert!(Rule::TimeOfDay.check("24:00").is_some());
        assert!(Rule::TimeOfDay.check("7:30").is_some());
        assert!(Rule::MaxLen(3).check("đốm lá").is_some());
        assert_eq!(Rule::MaxLen(6).check("đốm lá"), None);
    }

    #[test]
    fn guide_stage_rejects_inverted_day_range() {
        let form = GuideStageForm {
            plant_id: Some(1),
            stage_title: "Gieo mạ".into(),
            start_day_offset: "10".into(),
            end_day_offset: "3".into(),
            ..Default::default()
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors.get("end_day_offset").is_some());
    }

    #[test]
    fn day_offsets_beyond_i32_are_rejected() {
        let form = GuideStageForm {
            plant_id: Some(1),
            stage_title: "Gieo mạ".into(),
            start_day_offset: "3000000000".into(),
            end_day_offset: "5".into(),
            ..Default::default()
        };
        let errors = form.validate();
        assert!(errors.get("start_day_offset").is_some());

        let keyword = ActivityKeywordForm {
            name: "Tưới nước".into(),
            keyword_type: ActivityType::Care,
            base_days_offset: "2147483648".into(),
            time_duration: "99999999999".into(),
            ..Default::default()
        };
        let errors = keyword.validate();
        assert!(errors.get("base_days_offset").is_some());
        assert!(errors.get("time_duration").is_some());
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_network() {
        let client = client_with_token(Some("abc"));
        let api = &client;
        let form = PlantForm::default();

        let outcome = submit(
            &form,
            FormMode::Create,
            |p| async move { api.create_plant(&p).await },
            |id, p| async move { api.update_plant(id, &p).await },
        )
        .await;

        match outcome {
            SubmitOutcome::Invalid(errors) => assert!(errors.get("name").is_some()),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(mock(api).request_count(), 0);
    }

    #[tokio::test]
    async fn edit_mode_calls_update_with_record_id() {
        let client = client_with_token(Some("abc"));
        let api = &client;
        mock(api).mock_response(
            &format!("{}/plants/7", BASE),
            200,
            json!({ "id": 7, "name": "Lúa nước" }),
        );
        let record = Plant {
            id: 7,
            name: "Lúa".into(),
            description: Some("Oryza sativa".into()),
            image_url: None,
            created_at: None,
        };

        let mut modal: ModalForm<PlantForm> = ModalForm::default();
        modal.open_edit(&record);
        modal.values.name = "Lúa nước".into();
        let (mode, values) = modal.begin_submit().unwrap();
        assert_eq!(mode, FormMode::Edit(7));

        let outcome = submit(
            &values,
            mode,
            |p| async move { api.create_plant(&p).await },
            |id, p| async move { api.update_plant(id, &p).await },
        )
        .await;

        let (url, method, _, body) = mock(api).last_request().unwrap();
        assert_eq!(url, format!("{}/plants/7", BASE));
        assert_eq!(method, "PUT");
        let body: serde_json::Value = serde_json::from_str(&body.unwrap()).unwrap();
        assert_eq!(body, json!({ "name": "Lúa nước", "description": "Oryza sativa" }));

        assert!(modal.finish(&outcome));
        assert!(!modal.open);
        // 同一结果不会再次触发 on_success
        assert!(!modal.finish(&outcome));
    }

    #[tokio::test]
    async fn failed_submit_keeps_modal_open() {
        let client = client_with_token(Some("abc"));
        let api = &client;
        mock(api).mock_response(
            &format!("{}/diseases", BASE),
            400,
            json!({ "success": false, "errorMessage": "class_name already exists", "showType": 2 }),
        );

        let mut modal: ModalForm<DiseaseForm> = ModalForm::default();
        modal.open_create();
        modal.values = DiseaseForm {
            name: "Leaf Spot".into(),
            class_name: "leaf_spot".into(),
            disease_type: "BỆNH NẤM".into(),
            ..Default::default()
        };
        let (mode, values) = modal.begin_submit().unwrap();
        assert!(modal.begin_submit().is_none());

        let outcome = submit(
            &values,
            mode,
            |p| async move { api.create_disease(&p).await },
            |id, p| async move { api.update_disease(id, &p).await },
        )
        .await;

        match &outcome {
            SubmitOutcome::Failed(notice) => assert_eq!(notice.message, "class_name already exists"),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!modal.finish(&outcome));
        assert!(modal.open);
        assert!(!modal.submitting);
    }

    #[test]
    fn disease_form_splits_image_links() {
        let form = DiseaseForm {
            name: "Blight".into(),
            class_name: "blight".into(),
            disease_type: "BỆNH NẤM".into(),
            image_links: "https://img/1.png\n\n  https://img/2.png  ".into(),
            ..Default::default()
        };
        assert_eq!(
            form.to_payload().image_link,
            vec!["https://img/1.png", "https://img/2.png"]
        );
    }

    #[test]
    fn options_epoch_bumps() {
        let mut epoch = OptionsEpoch::default();
        epoch.bump();
        epoch.bump();
        assert_eq!(epoch, OptionsEpoch(2));
    }
}
