use plantdoc_shared::protocol::{
    DeleteDisease, GetDiseaseByClass, ListDiseaseKeywords, ListDiseases, UnlinkDiseaseKeyword,
    UpdateDisease,
};
use plantdoc_shared::{ActivityKeyword, Disease, DiseaseKeywordLink, DiseasePayload, Page};

use crate::error::ApiResult;
use crate::pipeline::ApiClient;
use crate::request::HttpClient;

impl<C: HttpClient> ApiClient<C> {
    pub async fn list_diseases(&self, query: &ListDiseases) -> ApiResult<Page<Disease>> {
        let raw = self.send(query).await.map_err(|e| e.in_op("disease.list"))?;
        Ok(raw.into())
    }

    pub async fn disease_by_class(&self, class_name: &str) -> ApiResult<Disease> {
        let req = GetDiseaseByClass {
            class_name: class_name.to_string(),
        };
        self.send(&req)
            .await
            .map_err(|e| e.in_op_with("disease.by_class", class_name))
    }

    pub async fn create_disease(&self, payload: &DiseasePayload) -> ApiResult<Disease> {
        self.send(payload)
            .await
            .map_err(|e| e.in_op_with("disease.create", payload.class_name.clone()))
    }

    pub async fn update_disease(&self, id: i64, payload: &DiseasePayload) -> ApiResult<Disease> {
        let req = UpdateDisease {
            id,
            payload: payload.clone(),
        };
        self.send(&req)
            .await
            .map_err(|e| e.in_op_with("disease.update", id.to_string()))
    }

    pub async fn delete_disease(&self, id: i64) -> ApiResult<()> {
        self.send(&DeleteDisease { id })
            .await
            .map_err(|e| e.in_op_with("disease.delete", id.to_string()))?;
        Ok(())
    }

    // --- 病害 ↔ 活动关键词 ---

    pub async fn disease_keywords(&self, class_name: &str) -> ApiResult<Vec<ActivityKeyword>> {
        let req = ListDiseaseKeywords {
            class_name: class_name.to_string(),
        };
        self.send(&req)
            .await
            .map_err(|e| e.in_op_with("disease.keywords", class_name))
    }

    pub async fn link_keyword(&self, class_name: &str, keyword_id: i64) -> ApiResult<()> {
        let req = DiseaseKeywordLink {
            class_name: class_name.to_string(),
            keyword_id,
        };
        self.send(&req)
            .await
            .map_err(|e| e.in_op_with("disease.link_keyword", format!("{}#{}", class_name, keyword_id)))?;
        Ok(())
    }

    pub async fn unlink_keyword(&self, class_name: &str, keyword_id: i64) -> ApiResult<()> {
        let req = UnlinkDiseaseKeyword {
            class_name: class_name.to_string(),
            keyword_id,
        };
        self.send(&req)
            .await
            .map_err(|e| e.in_op_with("disease.unlink_keyword", format!("{}#{}", class_name, keyword_id)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::form::{DiseaseForm, ModalForm, submit};
    use crate::list::{ListPage, LoadState, fetch_table};
    use crate::pipeline::tests::{BASE, client_with_token, mock};
    use plantdoc_shared::{Disease, DiseasePayload};
    use plantdoc_shared::protocol::{ListDiseases, Paging};
    use serde_json::json;

    #[tokio::test]
    async fn create_disease_sends_only_filled_fields() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/diseases", BASE),
            201,
            json!({ "id": 12, "name": "Leaf Spot", "class_name": "leaf_spot", "type": "BỆNH NẤM" }),
        );

        let payload = DiseasePayload {
            name: "Leaf Spot".into(),
            class_name: "leaf_spot".into(),
            disease_type: "BỆNH NẤM".into(),
            ..Default::default()
        };
        let created = api.create_disease(&payload).await.unwrap();
        assert_eq!(created.id, 12);

        let (_, method, _, body) = mock(&api).last_request().unwrap();
        assert_eq!(method, "POST");
        let body: serde_json::Value = serde_json::from_str(&body.unwrap()).unwrap();
        assert_eq!(
            body,
            json!({ "name": "Leaf Spot", "class_name": "leaf_spot", "type": "BỆNH NẤM" })
        );
    }

    #[tokio::test]
    async fn created_disease_closes_modal_and_appears_on_reload() {
        let client = client_with_token(Some("abc"));
        let api = &client;
        let list_url = format!("{}/diseases?page=1&limit=10", BASE);
        mock(api).mock_response(&list_url, 200, json!({ "data": [], "total": 0 }));
        mock(api).mock_response(
            &list_url,
            200,
            json!({
                "data": [{ "id": 12, "name": "Leaf Spot", "class_name": "leaf_spot", "type": "BỆNH NẤM" }],
                "total": 1
            }),
        );
        mock(api).mock_response(
            &format!("{}/diseases", BASE),
            201,
            json!({ "id": 12, "name": "Leaf Spot", "class_name": "leaf_spot", "type": "BỆNH NẤM" }),
        );

        let mut table: ListPage<Disease, ListDiseases> = ListPage::new(10);
        let query = table.begin_load();
        let (result, notice) = fetch_table(api.list_diseases(&query)).await;
        table.apply(result);
        assert!(notice.is_none());
        assert!(table.rows.is_empty());

        let mut modal: ModalForm<DiseaseForm> = ModalForm::default();
        modal.open_create();
        modal.values = DiseaseForm {
            name: "Leaf Spot".into(),
            class_name: "leaf_spot".into(),
            disease_type: "BỆNH NẤM".into(),
            ..Default::default()
        };
        let (mode, values) = modal.begin_submit().unwrap();
        let outcome = submit(
            &values,
            mode,
            |p| async move { api.create_disease(&p).await },
            |id, p| async move { api.update_disease(id, &p).await },
        )
        .await;

        let (_, method, _, body) = mock(api).last_request().unwrap();
        assert_eq!(method, "POST");
        let body: serde_json::Value = serde_json::from_str(&body.unwrap()).unwrap();
        assert_eq!(
            body,
            json!({ "name": "Leaf Spot", "class_name": "leaf_spot", "type": "BỆNH NẤM" })
        );

        // on_success 触发后重新加载
        assert!(modal.finish(&outcome));
        assert!(!modal.open);

        let query = table.begin_load();
        let (result, _) = fetch_table(api.list_diseases(&query)).await;
        table.apply(result);
        assert_eq!(table.state, LoadState::Success);
        assert_eq!(table.total, 1);
        assert_eq!(table.rows[0].class_name, "leaf_spot");
    }

    #[tokio::test]
    async fn list_diseases_normalizes_flat_envelope() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/diseases?page=2&limit=5&plant_name=Tomato", BASE),
            200,
            json!({
                "data": [{ "id": 3, "name": "Blight", "class_name": "blight", "type": "BỆNH NẤM", "plant_name": "Tomato" }],
                "total": 6
            }),
        );

        let page = api
            .list_diseases(&ListDiseases {
                paging: Paging::new(2, 5),
                plant_name: Some("Tomato".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 6);
        assert_eq!(page.items[0].class_name, "blight");
    }

    #[tokio::test]
    async fn keyword_links_use_class_name_path() {
        let api = client_with_token(Some("abc"));
        let url = format!("{}/disease-activity-keywords/leaf%20spot/7", BASE);
        mock(&api).mock_raw(&url, 200, "");

        api.unlink_keyword("leaf spot", 7).await.unwrap();

        let (sent, method, _, _) = mock(&api).last_request().unwrap();
        assert_eq!(sent, url);
        assert_eq!(method, "DELETE");
    }
}
