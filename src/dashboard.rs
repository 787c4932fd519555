//! 首页概览
//!
//! 五个计数并发拉取，各自独立落入自己的状态：某一项失败不影响其他项。

use plantdoc_shared::protocol::{ListAdminUsers, ListComplaints, ListDiseases, ListPlants, Paging};
use plantdoc_shared::{ComplaintStatus, Page};

use crate::error::ApiResult;
use crate::notice::Notice;
use crate::pipeline::ApiClient;
use crate::request::HttpClient;

/// 只需要 total，每项只取一条
fn probe() -> Paging {
    Paging::new(1, 1)
}

pub type CountSlice = Result<u64, Notice>;

#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub plants: CountSlice,
    pub diseases: CountSlice,
    pub pending_complaints: CountSlice,
    pub unverified_scans: CountSlice,
    pub admin_users: CountSlice,
}

fn count<T>(result: ApiResult<Page<T>>) -> CountSlice {
    result.map(|page| page.total).map_err(|e| e.notice())
}

pub async fn load_overview<C: HttpClient>(api: &ApiClient<C>) -> Overview {
    let plants = ListPlants {
        paging: probe(),
        ..Default::default()
    };
    let diseases = ListDiseases {
        paging: probe(),
        ..Default::default()
    };
    let pending = ListComplaints {
        paging: probe(),
        status: Some(ComplaintStatus::Pending),
        ..Default::default()
    };
    let users = ListAdminUsers {
        paging: probe(),
        ..Default::default()
    };

    let (plants, diseases, pending, scans, users) = futures::join!(
        api.list_plants(&plants),
        api.list_diseases(&diseases),
        api.list_complaints(&pending),
        api.list_scan_reports(probe(), Some(false)),
        api.list_admin_users(&users)
    );

    Overview {
        plants: count(plants),
        diseases: count(diseases),
        pending_complaints: count(pending),
        unverified_scans: count(scans),
        admin_users: count(users),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{BASE, client_with_token, mock};
    use serde_json::json;

    #[tokio::test]
    async fn slices_resolve_independently() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/plants?page=1&limit=1", BASE),
            200,
            json!({ "data": [{ "id": 1, "name": "Tomato" }], "total": 12 }),
        );
        mock(&api).mock_response(
            &format!("{}/diseases?page=1&limit=1", BASE),
            500,
            json!({ "error": "db down" }),
        );
        mock(&api).mock_response(
            &format!("{}/complaints?page=1&limit=1&status=PENDING", BASE),
            200,
            json!({ "data": { "items": [], "total": 4 } }),
        );
        mock(&api).mock_response(
            &format!("{}/complaints?page=1&limit=1&target_type=SCAN&is_verified=false", BASE),
            200,
            json!({ "data": { "items": [], "total": 9 } }),
        );
        mock(&api).mock_network_error(&format!("{}/admin/users?page=1&limit=1", BASE));

        let overview = load_overview(&api).await;
        assert_eq!(overview.plants, Ok(12));
        assert!(overview.diseases.is_err());
        assert_eq!(overview.pending_complaints, Ok(4));
        assert_eq!(overview.unverified_scans, Ok(9));
        assert!(overview.admin_users.is_err());
        assert_eq!(mock(&api).request_count(), 5);
    }
}
