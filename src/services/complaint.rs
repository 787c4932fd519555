use plantdoc_shared::protocol::{
    DeleteComplaint, ListComplaints, Paging, UpdateComplaintStatus, VerifyScanReport,
};
use plantdoc_shared::{Complaint, ComplaintStatus, Page, TargetType};

use crate::error::{ApiError, ApiResult};
use crate::pipeline::ApiClient;
use crate::request::HttpClient;

impl<C: HttpClient> ApiClient<C> {
    pub async fn list_complaints(&self, query: &ListComplaints) -> ApiResult<Page<Complaint>> {
        let raw = self
            .send(query)
            .await
            .map_err(|e| e.in_op("complaint.list"))?;
        Ok(raw.into())
    }

    /// 扫描报告是 `target_type = SCAN` 的投诉
    pub async fn list_scan_reports(
        &self,
        paging: Paging,
        is_verified: Option<bool>,
    ) -> ApiResult<Page<Complaint>> {
        let query = ListComplaints {
            paging,
            status: None,
            target_type: Some(TargetType::Scan),
            is_verified,
        };
        let raw = self
            .send(&query)
            .await
            .map_err(|e| e.in_op("complaint.list_scan_reports"))?;
        Ok(raw.into())
    }

    /// 按状态机检查后更新投诉状态，非法迁移不会发出请求
    pub async fn update_complaint_status(
        &self,
        current: &Complaint,
        next: ComplaintStatus,
        admin_note: Option<String>,
    ) -> ApiResult<Complaint> {
        if !current.status.can_transition_to(next) {
            return Err(ApiError::validation(format!(
                "Cannot change complaint status from {} to {}",
                current.status.as_str(),
                next.as_str()
            ))
            .in_op_with("complaint.update_status", current.id.to_string()));
        }
        let req = UpdateComplaintStatus {
            id: current.id,
            status: next,
            admin_note: admin_note.filter(|n| !n.trim().is_empty()),
        };
        self.send(&req)
            .await
            .map_err(|e| e.in_op_with("complaint.update_status", current.id.to_string()))
    }

    pub async fn verify_scan_report(
        &self,
        id: i64,
        is_verified: bool,
        verified_disease_id: Option<i64>,
    ) -> ApiResult<Complaint> {
        let req = VerifyScanReport {
            id,
            is_verified,
            verified_disease_id,
        };
        self.send(&req)
            .await
            .map_err(|e| e.in_op_with("complaint.verify", id.to_string()))
    }

    pub async fn delete_complaint(&self, id: i64) -> ApiResult<()> {
        self.send(&DeleteComplaint { id })
            .await
            .map_err(|e| e.in_op_with("complaint.delete", id.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::pipeline::tests::{BASE, client_with_token, mock};
    use plantdoc_shared::protocol::Paging;
    use plantdoc_shared::{Complaint, ComplaintStatus};
    use serde_json::json;

    fn complaint(status: &str) -> Complaint {
        serde_json::from_value(json!({ "id": 8, "target_type": "POST", "status": status })).unwrap()
    }

    #[tokio::test]
    async fn illegal_transition_never_reaches_network() {
        let api = client_with_token(Some("abc"));

        let err = api
            .update_complaint_status(&complaint("RESOLVED"), ComplaintStatus::Pending, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(mock(&api).request_count(), 0);
    }

    #[tokio::test]
    async fn legal_transition_patches_status() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/complaints/8/status", BASE),
            200,
            json!({ "id": 8, "target_type": "POST", "status": "REVIEWED" }),
        );

        let updated = api
            .update_complaint_status(&complaint("PENDING"), ComplaintStatus::Reviewed, Some(" ".into()))
            .await
            .unwrap();
        assert_eq!(updated.status, ComplaintStatus::Reviewed);

        let (_, method, _, body) = mock(&api).last_request().unwrap();
        assert_eq!(method, "PATCH");
        let body: serde_json::Value = serde_json::from_str(&body.unwrap()).unwrap();
        assert_eq!(body, json!({ "status": "REVIEWED" }));
    }

    #[tokio::test]
    async fn scan_reports_use_nested_envelope() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/complaints?page=1&limit=10&target_type=SCAN&is_verified=false", BASE),
            200,
            json!({ "data": { "items": [
                { "id": 1, "target_type": "SCAN", "predicted_class": "leaf_spot", "is_verified": false }
            ], "total": 14 } }),
        );

        let page = api
            .list_scan_reports(Paging::default(), Some(false))
            .await
            .unwrap();
        assert_eq!(page.total, 14);
        assert_eq!(page.items[0].predicted_class.as_deref(), Some("leaf_spot"));
    }
}
