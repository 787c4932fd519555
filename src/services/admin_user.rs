use plantdoc_shared::protocol::{DisableAdminUser, EnableAdminUser, ListAdminUsers, UpdateAdminRole};
use plantdoc_shared::{AdminUser, Page, UserRole};

use crate::error::ApiResult;
use crate::pipeline::ApiClient;
use crate::request::HttpClient;

/// 用户是否处于启用状态，兼容 `is_active` / `is_disabled` 两种字段
pub fn active_flag(user: &AdminUser) -> bool {
    user.is_active_flag()
}

impl<C: HttpClient> ApiClient<C> {
    pub async fn list_admin_users(&self, query: &ListAdminUsers) -> ApiResult<Page<AdminUser>> {
        let raw = self
            .send(query)
            .await
            .map_err(|e| e.in_op("admin_user.list"))?;
        Ok(raw.into())
    }

    pub async fn disable_admin_user(&self, id: i64) -> ApiResult<()> {
        self.send(&DisableAdminUser { id })
            .await
            .map_err(|e| e.in_op_with("admin_user.disable", id.to_string()))?;
        Ok(())
    }

    pub async fn enable_admin_user(&self, id: i64) -> ApiResult<()> {
        self.send(&EnableAdminUser { id })
            .await
            .map_err(|e| e.in_op_with("admin_user.enable", id.to_string()))?;
        Ok(())
    }

    pub async fn update_admin_role(&self, id: i64, role: UserRole) -> ApiResult<AdminUser> {
        self.send(&UpdateAdminRole { id, role })
            .await
            .map_err(|e| e.in_op_with("admin_user.update_role", id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{BASE, client_with_token, mock};
    use serde_json::json;

    #[tokio::test]
    async fn disable_then_reload_shows_inactive() {
        let api = client_with_token(Some("abc"));
        let list_url = format!("{}/admin/users?page=1&limit=10", BASE);
        mock(&api).mock_response(
            &list_url,
            200,
            json!({ "data": { "items": [{ "id": 5, "email": "e@x.vn", "username": "expert1", "role": "expert", "is_active": true }], "total": 1 } }),
        );
        mock(&api).mock_response(
            &list_url,
            200,
            json!({ "data": { "items": [{ "id": 5, "email": "e@x.vn", "username": "expert1", "role": "expert", "is_active": false }], "total": 1 } }),
        );
        mock(&api).mock_raw(&format!("{}/admin/users/5/disable", BASE), 200, "");

        let before = api.list_admin_users(&ListAdminUsers::default()).await.unwrap();
        let user = &before.items[0];
        assert!(active_flag(user));

        api.disable_admin_user(user.id).await.unwrap();
        let (_, method, _, _) = mock(&api).last_request().unwrap();
        assert_eq!(method, "PATCH");

        let after = api.list_admin_users(&ListAdminUsers::default()).await.unwrap();
        assert!(!active_flag(&after.items[0]));
    }

    #[tokio::test]
    async fn role_update_sends_lowercase_role() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/admin/users/5/role", BASE),
            200,
            json!({ "id": 5, "email": "e@x.vn", "username": "expert1", "role": "admin" }),
        );

        let user = api.update_admin_role(5, UserRole::Admin).await.unwrap();
        assert_eq!(user.role, UserRole::Admin);
        let (_, _, _, body) = mock(&api).last_request().unwrap();
        assert_eq!(body.as_deref(), Some(r#"{"role":"admin"}"#));
    }
}
