use log::info;
use plantdoc_shared::{AdminUser, LoginRequest, RegisterRequest};

use crate::error::ApiResult;
use crate::pipeline::ApiClient;
use crate::request::HttpClient;
use crate::session::Session;

impl<C: HttpClient> ApiClient<C> {
    /// 登录成功后写入会话存储
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Session> {
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let resp = self
            .send(&req)
            .await
            .map_err(|e| e.in_op_with("auth.login", req.email.clone()))?;

        let session = Session {
            token: resp.access_token,
            user: Some(resp.user),
        };
        self.session().sign_in(session.clone());
        info!("signed in as {}", req.email);
        Ok(session)
    }

    /// 注册后台账号（由管理员在用户页发起）
    pub async fn register(&self, req: &RegisterRequest) -> ApiResult<AdminUser> {
        self.send(req)
            .await
            .map_err(|e| e.in_op_with("auth.register", req.email.clone()))
    }

    pub fn logout(&self) {
        self.session().clear();
        info!("signed out");
    }
}

#[cfg(test)]
mod tests {
    use crate::pipeline::tests::{BASE, client_with_token, mock};
    use serde_json::json;

    #[tokio::test]
    async fn login_persists_session_and_logout_clears_it() {
        let api = client_with_token(None);
        mock(&api).mock_response(
            &format!("{}/auth/login", BASE),
            200,
            json!({
                "accessToken": "jwt-1",
                "user": { "id": 1, "email": "admin@plantdoc.vn", "username": "admin", "role": "admin" }
            }),
        );

        let session = api.login(" admin@plantdoc.vn ", "secret").await.unwrap();
        assert_eq!(session.token, "jwt-1");
        assert_eq!(api.session().token().as_deref(), Some("jwt-1"));

        let (_, method, _, body) = mock(&api).last_request().unwrap();
        assert_eq!(method, "POST");
        let body: serde_json::Value = serde_json::from_str(&body.unwrap()).unwrap();
        assert_eq!(body, json!({ "email": "admin@plantdoc.vn", "password": "secret" }));

        api.logout();
        assert!(!api.session().is_authenticated());
    }

    #[tokio::test]
    async fn failed_login_leaves_session_empty() {
        let api = client_with_token(None);
        mock(&api).mock_response(
            &format!("{}/auth/login", BASE),
            401,
            json!({ "message": "Invalid credentials" }),
        );

        assert!(api.login("a@b.c", "wrong").await.is_err());
        assert!(api.session().session().is_none());
    }
}
