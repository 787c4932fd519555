//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 [`HttpClient`] 传输层。
//! JSON 请求体以字符串发送，multipart 请求体构建为 `FormData`，
//! 此时不设置 Content-Type，由浏览器补充 boundary。

use async_trait::async_trait;
use plantdoc_admin::request::{
    FormPart, HttpClient, HttpRequest, HttpResponse, MultipartForm, RequestBody, TransportError,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

fn js_error(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn build_form(form: &MultipartForm) -> Result<FormData, TransportError> {
    let data =
        FormData::new().map_err(|e| TransportError::InvalidRequest(js_error(e)))?;

    for part in &form.parts {
        match part {
            FormPart::Text { name, value } => data
                .append_with_str(name, value)
                .map_err(|e| TransportError::InvalidRequest(js_error(e)))?,
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let array = js_sys::Uint8Array::from(bytes.as_slice());
                let parts = js_sys::Array::of1(&array);
                let bag = BlobPropertyBag::new();
                if let Some(ct) = content_type {
                    bag.set_type(ct);
                }
                let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &bag)
                    .map_err(|e| TransportError::InvalidRequest(js_error(e)))?;
                data.append_with_blob_and_filename(name, &blob, file_name)
                    .map_err(|e| TransportError::InvalidRequest(js_error(e)))?;
            }
        }
    }
    Ok(data)
}

/// 基于 `window.fetch` 的传输层
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

#[async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let headers =
            Headers::new().map_err(|e| TransportError::InvalidRequest(js_error(e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| TransportError::InvalidRequest(js_error(e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        match &req.body {
            Some(RequestBody::Json(body)) => opts.set_body(&JsValue::from_str(body)),
            Some(RequestBody::Multipart(form)) => opts.set_body(&build_form(form)?.into()),
            None => {}
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| TransportError::InvalidRequest(js_error(e)))?;

        let window = web_sys::window()
            .ok_or_else(|| TransportError::Network("window is not available".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| TransportError::Network(js_error(e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| TransportError::Body(js_error(e)))?;

        let promise = response
            .text()
            .map_err(|e| TransportError::Body(js_error(e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| TransportError::Body(js_error(e)))?;

        Ok(HttpResponse {
            status: response.status(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}
