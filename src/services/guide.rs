use plantdoc_shared::protocol::{
    DeleteGuideStage, DeleteSubGuideStage, ListGuideStages, ListSubGuideStages, UpdateGuideStage,
    UpdateSubGuideStage,
};
use plantdoc_shared::{GuideStage, GuideStagePayload, SubGuideStage, SubGuideStagePayload};

use crate::error::ApiResult;
use crate::pipeline::ApiClient;
use crate::request::HttpClient;

impl<C: HttpClient> ApiClient<C> {
    // --- 阶段 ---

    pub async fn list_guide_stages(&self, plant_id: i64) -> ApiResult<Vec<GuideStage>> {
        self.send(&ListGuideStages { plant_id })
            .await
            .map_err(|e| e.in_op_with("guide.list_stages", plant_id.to_string()))
    }

    pub async fn create_guide_stage(&self, payload: &GuideStagePayload) -> ApiResult<GuideStage> {
        self.send(payload)
            .await
            .map_err(|e| e.in_op_with("guide.create_stage", payload.stage_title.clone()))
    }

    pub async fn update_guide_stage(
        &self,
        id: i64,
        payload: &GuideStagePayload,
    ) -> ApiResult<GuideStage> {
        let req = UpdateGuideStage {
            id,
            payload: payload.clone(),
        };
        self.send(&req)
            .await
            .map_err(|e| e.in_op_with("guide.update_stage", id.to_string()))
    }

    pub async fn delete_guide_stage(&self, id: i64) -> ApiResult<()> {
        self.send(&DeleteGuideStage { id })
            .await
            .map_err(|e| e.in_op_with("guide.delete_stage", id.to_string()))?;
        Ok(())
    }

    // --- 子阶段 ---

    pub async fn list_sub_guide_stages(&self, guide_stage_id: i64) -> ApiResult<Vec<SubGuideStage>> {
        self.send(&ListSubGuideStages { guide_stage_id })
            .await
            .map_err(|e| e.in_op_with("guide.list_sub_stages", guide_stage_id.to_string()))
    }

    pub async fn create_sub_guide_stage(
        &self,
        payload: &SubGuideStagePayload,
    ) -> ApiResult<SubGuideStage> {
        self.send(payload)
            .await
            .map_err(|e| e.in_op_with("guide.create_sub_stage", payload.title.clone()))
    }

    pub async fn update_sub_guide_stage(
        &self,
        id: i64,
        payload: &SubGuideStagePayload,
    ) -> ApiResult<SubGuideStage> {
        let req = UpdateSubGuideStage {
            id,
            payload: payload.clone(),
        };
        self.send(&req)
            .await
            .map_err(|e| e.in_op_with("guide.update_sub_stage", id.to_string()))
    }

    pub async fn delete_sub_guide_stage(&self, id: i64) -> ApiResult<()> {
        self.send(&DeleteSubGuideStage { id })
            .await
            .map_err(|e| e.in_op_with("guide.delete_sub_stage", id.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::pipeline::tests::{BASE, client_with_token, mock};
    use serde_json::json;

    #[tokio::test]
    async fn sub_stages_carry_their_blogs() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/sub-guide-stages?guide_stage_id=2", BASE),
            200,
            json!([{
                "id": 9, "guide_stage_id": 2, "title": "Bón lót",
                "start_day_offset": 0, "end_day_offset": 3,
                "blogs": [{ "id": 1, "title": "Cách bón lót", "content": "..." }]
            }]),
        );

        let subs = api.list_sub_guide_stages(2).await.unwrap();
        assert_eq!(subs[0].blogs.len(), 1);
    }
}
