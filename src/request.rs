use std::collections::HashMap;

pub use plantdoc_shared::protocol::HttpMethod;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::VecDeque;

// =========================================================
// 传输层错误
// =========================================================

/// 底层传输错误：请求没有拿到任何响应
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("could not build request: {0}")]
    InvalidRequest(String),
    #[error("could not read response body: {0}")]
    Body(String),
}

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// multipart 表单中的一个字段
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.push(FormPart::Text {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn file(
        mut self,
        name: &str,
        file_name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.map(str::to_string),
            bytes,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(String),
    Multipart(MultipartForm),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_json(mut self, body: String) -> Self {
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Content-Type（含 boundary）由具体客户端设置
    pub fn with_multipart(mut self, form: MultipartForm) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为浏览器 fetch 返回的 Future 不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
type MockReply = Result<(u16, String), String>;

/// 按 URL 回放预设响应的客户端
///
/// 同一 URL 可以预设多个响应，按顺序消费，最后一个会被重复使用。
#[cfg(test)]
pub struct MockHttpClient {
    responses: RefCell<HashMap<String, VecDeque<MockReply>>>,
    // 记录发出的请求 (URL, Method, Headers, Body)
    pub requests: RefCell<Vec<(String, String, HashMap<String, String>, Option<String>)>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.push(url, Ok((status, body.to_string())));
    }

    pub fn mock_raw(&self, url: &str, status: u16, body: &str) {
        self.push(url, Ok((status, body.to_string())));
    }

    pub fn mock_network_error(&self, url: &str) {
        self.push(url, Err("connection refused".to_string()));
    }

    fn push(&self, url: &str, reply: MockReply) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<(String, String, HashMap<String, String>, Option<String>)> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let body = req.body.as_ref().map(|b| match b {
            RequestBody::Json(s) => s.clone(),
            RequestBody::Multipart(form) => {
                let names: Vec<String> = form
                    .parts
                    .iter()
                    .map(|p| match p {
                        FormPart::File {
                            name, file_name, ..
                        } => format!("{}={}", name, file_name),
                        FormPart::Text { name, value } => format!("{}={}", name, value),
                    })
                    .collect();
                format!("multipart[{}]", names.join(","))
            }
        });
        self.requests.borrow_mut().push((
            req.url.clone(),
            req.method.as_str().to_string(),
            req.headers.clone(),
            body,
        ));

        let mut responses = self.responses.borrow_mut();
        let reply = match responses.get_mut(&req.url) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match reply {
            Some(Ok((status, body))) => Ok(HttpResponse { status, body }),
            Some(Err(e)) => Err(TransportError::Network(e)),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}
