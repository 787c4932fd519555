//! 请求管线
//!
//! 所有出站请求经过 [`ApiClient::authorize`] 注入 Bearer 令牌，
//! 所有入站响应经过 [`classify`] 归类为成功值或 [`ApiError`]。
//! 管线不做自动重试，每次失败都交给发起调用的组件处理。

use std::sync::Arc;

use log::{debug, warn};
use plantdoc_shared::protocol::{ApiRequest, HttpMethod};
use plantdoc_shared::{BEARER_PREFIX, ErrorEnvelope, HEADER_AUTHORIZATION, ShowType};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult, MSG_UNAUTHORIZED};
use crate::request::{HttpClient, HttpRequest, HttpResponse, MultipartForm};
use crate::session::SessionStore;

pub struct ApiClient<C: HttpClient> {
    client: C,
    config: AppConfig,
    session: Arc<SessionStore>,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(client: C, config: AppConfig, session: Arc<SessionStore>) -> Self {
        Self {
            client,
            config,
            session,
        }
    }

    /// 先校验配置再构建
    pub fn try_new(client: C, config: AppConfig, session: Arc<SessionStore>) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self::new(client, config, session))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// base URL + 端点路径 + 百分号编码的查询参数
    pub fn endpoint_url(&self, path: &str, query: &[(&str, String)]) -> ApiResult<String> {
        let base = self.config.api_base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{}/{}", base, path))
            .map_err(|e| ApiError::from(e).in_op_with("pipeline.url", path.to_string()))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url.to_string())
    }

    /// 请求拦截器：有令牌时注入 `Authorization: Bearer <token>`
    pub fn authorize(&self, req: HttpRequest) -> HttpRequest {
        match self.session.token() {
            Some(token) => {
                req.with_header(HEADER_AUTHORIZATION, &format!("{}{}", BEARER_PREFIX, token))
            }
            None => {
                debug!(
                    "no session token, sending {} {} without authorization",
                    req.method.as_str(),
                    req.url
                );
                req
            }
        }
    }

    /// 发送一个类型化的端点请求
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let path = req.path();
        let url = self.endpoint_url(&path, &req.query())?;
        let mut http = HttpRequest::new(&url, R::METHOD);
        if R::METHOD.has_body() {
            let body = serde_json::to_string(req)
                .map_err(|e| ApiError::from(e).in_op_with("pipeline.encode", path.clone()))?;
            http = http.with_json(body);
        }
        self.execute(http).await
    }

    /// 以 multipart/form-data 上传
    pub async fn send_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> ApiResult<T> {
        let url = self.endpoint_url(path, &[])?;
        let http = HttpRequest::new(&url, HttpMethod::Post).with_multipart(form);
        self.execute(http).await
    }

    async fn execute<T: DeserializeOwned>(&self, req: HttpRequest) -> ApiResult<T> {
        let req = self.authorize(req);
        let method = req.method;
        let url = req.url.clone();

        let result = match self.client.send(req).await {
            Ok(resp) => classify(resp),
            Err(e) => Err(ApiError::from(e)),
        };
        result.map_err(|e| {
            let e = e.in_op_with("pipeline.send", format!("{} {}", method.as_str(), url));
            warn!("{}", e);
            e
        })
    }
}

/// 响应分类器
///
/// 1. 任何状态码下，`success: false` 的信封都是业务错误
/// 2. 401 → 鉴权失败；其他非 2xx → 传输错误
/// 3. 空响应体按 JSON `null` 解码
pub fn classify<T: DeserializeOwned>(resp: HttpResponse) -> ApiResult<T> {
    let text = if resp.body.trim().is_empty() {
        "null"
    } else {
        resp.body.as_str()
    };
    let parsed: Option<Value> = serde_json::from_str(text).ok();

    if let Some(value) = &parsed {
        if let Some(envelope) = business_envelope(value) {
            return Err(ApiError::business(envelope)
                .with_status(resp.status)
                .with_body(value.clone()));
        }
    }

    if resp.status == 401 {
        let err = ApiError::unauthorized(MSG_UNAUTHORIZED);
        return Err(match parsed {
            Some(body) => err.with_body(body),
            None => err,
        });
    }

    if !resp.is_success() {
        let err = ApiError::transport(resp.status);
        return Err(match parsed {
            Some(body) => err.with_body(body),
            None => err,
        });
    }

    match parsed {
        Some(value) => serde_json::from_value(value).map_err(ApiError::from),
        None => Err(ApiError::serialization(format!(
            "response body is not valid JSON (status {})",
            resp.status
        ))),
    }
}

fn business_envelope(value: &Value) -> Option<ErrorEnvelope> {
    if value.get("success") != Some(&Value::Bool(false)) {
        return None;
    }
    // 逐字段读取，某个字段类型不规范时不影响其余字段
    let error_code = match value.get("errorCode") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };
    let error_message = value
        .get("errorMessage")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
        .or_else(|| crate::error::extract_server_message(value));

    Some(ErrorEnvelope {
        success: false,
        error_code,
        error_message,
        show_type: value.get("showType").and_then(show_type_of),
    })
}

/// 数字或数字字符串；超出 u8 的取值交给默认通道
fn show_type_of(value: &Value) -> Option<ShowType> {
    let raw = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u8::try_from(raw).ok().map(ShowType::from)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::notice::NoticeChannel;
    use crate::request::MockHttpClient;
    use crate::session::MemoryStorage;
    use plantdoc_shared::protocol::{DeletePlant, ListPlants};
    use plantdoc_shared::{Page, STORAGE_TOKEN_KEY};
    use serde_json::json;

    pub(crate) const BASE: &str = "http://localhost:3000/api";

    pub(crate) fn client_with_token(token: Option<&str>) -> ApiClient<MockHttpClient> {
        let storage = match token {
            Some(t) => MemoryStorage::new().with_entry(STORAGE_TOKEN_KEY, t),
            None => MemoryStorage::new(),
        };
        ApiClient::try_new(
            MockHttpClient::new(),
            AppConfig::default(),
            Arc::new(SessionStore::new(storage)),
        )
        .unwrap()
    }

    pub(crate) fn mock(api: &ApiClient<MockHttpClient>) -> &MockHttpClient {
        &api.client
    }

    #[tokio::test]
    async fn stored_token_is_sent_as_bearer() {
        let api = client_with_token(Some("abc"));
        let url = format!("{}/plants/4", BASE);
        mock(&api).mock_raw(&url, 204, "");

        api.send(&DeletePlant { id: 4 }).await.unwrap();

        let (_, method, headers, body) = mock(&api).last_request().unwrap();
        assert_eq!(method, "DELETE");
        assert_eq!(headers.get("Authorization").map(String::as_str), Some("Bearer abc"));
        assert_eq!(body, None);
    }

    #[tokio::test]
    async fn missing_token_still_sends_request() {
        let api = client_with_token(None);
        let url = format!("{}/plants?page=1&limit=10", BASE);
        mock(&api).mock_response(&url, 200, json!({ "data": [], "total": 0 }));

        let page: Page<_> = api.send(&ListPlants::default()).await.unwrap().into();
        assert_eq!(page.total, 0);

        let (sent, _, headers, _) = mock(&api).last_request().unwrap();
        assert_eq!(sent, url);
        assert!(!headers.contains_key("Authorization"));
    }

    #[tokio::test]
    async fn envelope_on_success_status_is_business_error() {
        let api = client_with_token(Some("abc"));
        let url = format!("{}/plants/1", BASE);
        mock(&api).mock_response(
            &url,
            200,
            json!({ "success": false, "errorMessage": "Plant is in use", "showType": 1 }),
        );

        let err = api.send(&DeletePlant { id: 1 }).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Business);
        let notice = err.notice();
        assert_eq!(notice.channel, NoticeChannel::WarningToast);
        assert_eq!(notice.message, "Plant is in use");
    }

    #[tokio::test]
    async fn status_and_network_failures_are_classified() {
        let api = client_with_token(None);
        mock(&api).mock_response(&format!("{}/plants/1", BASE), 401, json!({ "message": "jwt expired" }));
        mock(&api).mock_response(&format!("{}/plants/2", BASE), 500, json!({ "error": "boom" }));
        mock(&api).mock_network_error(&format!("{}/plants/3", BASE));

        let unauthorized = api.send(&DeletePlant { id: 1 }).await.unwrap_err();
        let server = api.send(&DeletePlant { id: 2 }).await.unwrap_err();
        let network = api.send(&DeletePlant { id: 3 }).await.unwrap_err();

        assert_eq!(unauthorized.kind, ErrorKind::Unauthorized);
        assert_eq!(server.kind, ErrorKind::Transport);
        assert_eq!(server.status(), Some(500));
        assert_eq!(network.kind, ErrorKind::Network);
        assert_ne!(unauthorized.notice().message, server.notice().message);
        assert_eq!(server.server_message("Delete failed"), "boom");
    }

    #[test]
    fn loosely_typed_envelope_keeps_message_and_channel() {
        let err = classify::<Value>(HttpResponse {
            status: 400,
            body: json!({
                "success": false,
                "errorCode": 1001,
                "errorMessage": "Duplicate class_name",
                "showType": 1
            })
            .to_string(),
        })
        .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Business);
        assert_eq!(err.envelope().and_then(|e| e.error_code.as_deref()), Some("1001"));
        let notice = err.notice();
        assert_eq!(notice.channel, NoticeChannel::WarningToast);
        assert_eq!(notice.message, "Duplicate class_name");
    }

    #[test]
    fn show_type_as_string_or_out_of_range() {
        let as_string = classify::<Value>(HttpResponse {
            status: 200,
            body: json!({ "success": false, "errorMessage": "Saved with warnings", "showType": "3" })
                .to_string(),
        })
        .unwrap_err();
        assert_eq!(as_string.notice().channel, NoticeChannel::Notification);

        let too_large = classify::<Value>(HttpResponse {
            status: 200,
            body: json!({ "success": false, "errorMessage": "Quota exceeded", "showType": 4096 })
                .to_string(),
        })
        .unwrap_err();
        let notice = too_large.notice();
        assert_eq!(notice.channel, NoticeChannel::ErrorToast);
        assert_eq!(notice.message, "Quota exceeded");
    }

    #[test]
    fn undecodable_body_is_serialization_error() {
        let err = classify::<Vec<i64>>(HttpResponse {
            status: 200,
            body: "<html>".into(),
        })
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Serialization);
    }

    #[test]
    fn query_values_are_percent_encoded() {
        let api = client_with_token(None);
        let url = api
            .endpoint_url("/diseases", &[("name", "đốm lá & co".to_string())])
            .unwrap();
        assert_eq!(
            url,
            "http://localhost:3000/api/diseases?name=%C4%91%E1%BB%91m+l%C3%A1+%26+co"
        );
    }
}
