use plantdoc_shared::protocol::{DeletePlant, ListPlants, Paging, UpdatePlant};
use plantdoc_shared::{Page, Plant, PlantPayload};

use super::OPTIONS_LIMIT;
use crate::error::ApiResult;
use crate::pipeline::ApiClient;
use crate::request::HttpClient;

impl<C: HttpClient> ApiClient<C> {
    pub async fn list_plants(&self, query: &ListPlants) -> ApiResult<Page<Plant>> {
        let raw = self.send(query).await.map_err(|e| e.in_op("plant.list"))?;
        Ok(raw.into())
    }

    /// 下拉选项用的全部植物
    pub async fn all_plants(&self) -> ApiResult<Vec<Plant>> {
        let query = ListPlants {
            paging: Paging::new(1, OPTIONS_LIMIT),
            name: None,
        };
        let raw = self.send(&query).await.map_err(|e| e.in_op("plant.all"))?;
        Ok(Page::from(raw).items)
    }

    pub async fn create_plant(&self, payload: &PlantPayload) -> ApiResult<Plant> {
        self.send(payload)
            .await
            .map_err(|e| e.in_op_with("plant.create", payload.name.clone()))
    }

    pub async fn update_plant(&self, id: i64, payload: &PlantPayload) -> ApiResult<Plant> {
        let req = UpdatePlant {
            id,
            payload: payload.clone(),
        };
        self.send(&req)
            .await
            .map_err(|e| e.in_op_with("plant.update", id.to_string()))
    }

    pub async fn delete_plant(&self, id: i64) -> ApiResult<()> {
        self.send(&DeletePlant { id })
            .await
            .map_err(|e| e.in_op_with("plant.delete", id.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::pipeline::tests::{BASE, client_with_token, mock};
    use serde_json::json;

    #[tokio::test]
    async fn all_plants_requests_option_sized_page() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/plants?page=1&limit=1000", BASE),
            200,
            json!({ "data": [{ "id": 1, "name": "Tomato" }, { "id": 2, "name": "Rice" }], "total": 2 }),
        );

        let plants = api.all_plants().await.unwrap();
        assert_eq!(
            plants.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            ["Tomato", "Rice"]
        );
    }
}
