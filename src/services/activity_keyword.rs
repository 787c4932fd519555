use plantdoc_shared::protocol::{DeleteActivityKeyword, ListActivityKeywords, UpdateActivityKeyword};
use plantdoc_shared::{ActivityKeyword, ActivityKeywordPayload, Page};

use crate::error::ApiResult;
use crate::pipeline::ApiClient;
use crate::request::HttpClient;

impl<C: HttpClient> ApiClient<C> {
    pub async fn list_activity_keywords(
        &self,
        query: &ListActivityKeywords,
    ) -> ApiResult<Page<ActivityKeyword>> {
        let raw = self
            .send(query)
            .await
            .map_err(|e| e.in_op("activity_keyword.list"))?;
        Ok(raw.into())
    }

    pub async fn create_activity_keyword(
        &self,
        payload: &ActivityKeywordPayload,
    ) -> ApiResult<ActivityKeyword> {
        self.send(payload)
            .await
            .map_err(|e| e.in_op_with("activity_keyword.create", payload.name.clone()))
    }

    pub async fn update_activity_keyword(
        &self,
        id: i64,
        payload: &ActivityKeywordPayload,
    ) -> ApiResult<ActivityKeyword> {
        let req = UpdateActivityKeyword {
            id,
            payload: payload.clone(),
        };
        self.send(&req)
            .await
            .map_err(|e| e.in_op_with("activity_keyword.update", id.to_string()))
    }

    pub async fn delete_activity_keyword(&self, id: i64) -> ApiResult<()> {
        self.send(&DeleteActivityKeyword { id })
            .await
            .map_err(|e| e.in_op_with("activity_keyword.delete", id.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::pipeline::tests::{BASE, client_with_token, mock};
    use plantdoc_shared::protocol::ListActivityKeywords;
    use plantdoc_shared::{ActivityKeywordPayload, ActivityType};
    use serde_json::json;

    #[tokio::test]
    async fn type_filter_uses_wire_name() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/activity-keywords?page=1&limit=10&type=PREVENTION", BASE),
            200,
            json!({ "data": [{ "id": 1, "name": "Phun thuốc", "type": "PREVENTION", "hour_time": "07:30" }] }),
        );

        let page = api
            .list_activity_keywords(&ListActivityKeywords {
                keyword_type: Some(ActivityType::Prevention),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].hour_time.as_deref(), Some("07:30"));
    }

    #[tokio::test]
    async fn update_puts_to_record_path() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/activity-keywords/5", BASE),
            200,
            json!({ "id": 5, "name": "Tưới nước", "type": "CARE", "frequency_days": 2 }),
        );

        let payload = ActivityKeywordPayload {
            name: "Tưới nước".into(),
            keyword_type: ActivityType::Care,
            frequency_days: Some(2),
            ..Default::default()
        };
        api.update_activity_keyword(5, &payload).await.unwrap();

        let (_, method, _, body) = mock(&api).last_request().unwrap();
        assert_eq!(method, "PUT");
        let body: serde_json::Value = serde_json::from_str(&body.unwrap()).unwrap();
        assert_eq!(body, json!({ "name": "Tưới nước", "type": "CARE", "frequency_days": 2 }));
    }
}
