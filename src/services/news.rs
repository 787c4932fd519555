use plantdoc_shared::protocol::{
    CreateNewsTag, DeleteNews, DeleteNewsTag, ListNews, ListNewsTags, UpdateNews,
};
use plantdoc_shared::{News, NewsPayload, NewsTag, Page};

use crate::error::ApiResult;
use crate::pipeline::ApiClient;
use crate::request::HttpClient;

impl<C: HttpClient> ApiClient<C> {
    pub async fn list_news(&self, query: &ListNews) -> ApiResult<Page<News>> {
        let raw = self.send(query).await.map_err(|e| e.in_op("news.list"))?;
        Ok(raw.into())
    }

    pub async fn create_news(&self, payload: &NewsPayload) -> ApiResult<News> {
        self.send(payload)
            .await
            .map_err(|e| e.in_op_with("news.create", payload.title.clone()))
    }

    pub async fn update_news(&self, id: i64, payload: &NewsPayload) -> ApiResult<News> {
        let req = UpdateNews {
            id,
            payload: payload.clone(),
        };
        self.send(&req)
            .await
            .map_err(|e| e.in_op_with("news.update", id.to_string()))
    }

    pub async fn delete_news(&self, id: i64) -> ApiResult<()> {
        self.send(&DeleteNews { id })
            .await
            .map_err(|e| e.in_op_with("news.delete", id.to_string()))?;
        Ok(())
    }

    // --- 标签 ---

    pub async fn list_news_tags(&self) -> ApiResult<Vec<NewsTag>> {
        self.send(&ListNewsTags)
            .await
            .map_err(|e| e.in_op("news.list_tags"))
    }

    pub async fn create_news_tag(&self, name: &str) -> ApiResult<NewsTag> {
        let req = CreateNewsTag {
            name: name.trim().to_string(),
        };
        self.send(&req)
            .await
            .map_err(|e| e.in_op_with("news.create_tag", req.name.clone()))
    }

    pub async fn delete_news_tag(&self, id: i64) -> ApiResult<()> {
        self.send(&DeleteNewsTag { id })
            .await
            .map_err(|e| e.in_op_with("news.delete_tag", id.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::pipeline::tests::{BASE, client_with_token, mock};
    use plantdoc_shared::protocol::ListNews;
    use plantdoc_shared::{NewsPayload, NewsStatus};
    use serde_json::json;

    #[tokio::test]
    async fn list_news_filters_by_status_and_tag() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/news?page=1&limit=10&status=published&blog_tag_id=3", BASE),
            200,
            json!({ "data": [{ "id": 1, "title": "Mùa vụ", "content": "# Hello", "status": "published" }], "total": 1 }),
        );

        let page = api
            .list_news(&ListNews {
                status: Some(NewsStatus::Published),
                blog_tag_id: Some(3),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items[0].status, NewsStatus::Published);
    }

    #[tokio::test]
    async fn create_news_omits_unset_links() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/news", BASE),
            201,
            json!({ "id": 4, "title": "Draft", "content": "body" }),
        );

        let payload = NewsPayload {
            title: "Draft".into(),
            content: "body".into(),
            ..Default::default()
        };
        api.create_news(&payload).await.unwrap();

        let (_, _, _, body) = mock(&api).last_request().unwrap();
        let body: serde_json::Value = serde_json::from_str(&body.unwrap()).unwrap();
        assert_eq!(body, json!({ "title": "Draft", "content": "body", "status": "draft" }));
    }

    #[tokio::test]
    async fn tags_are_plain_lists() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/news-tags", BASE),
            200,
            json!([{ "id": 1, "name": "Lúa" }, { "id": 2, "name": "Cà chua" }]),
        );

        let tags = api.list_news_tags().await.unwrap();
        assert_eq!(tags.len(), 2);
    }
}
