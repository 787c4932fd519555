//! 通用列表页模式
//!
//! 每个资源页面 = 表格 + 工具栏 + 详情侧栏。
//! 加载状态机 `Idle → Loading → (Success | Error)`，每次触发重新加载都重新进入。
//! 失败的加载被捕获为提示，结果退化为空表，不向上传播。

use std::future::Future;

use log::warn;
use plantdoc_shared::protocol::{
    ListActivityKeywords, ListAdminUsers, ListComplaints, ListDiseases, ListNews, ListPlants,
    Paging,
};
use plantdoc_shared::Page;

use crate::error::ApiResult;
use crate::notice::Notice;

pub const MSG_DELETE_FAILED: &str = "Delete failed, please try again.";
pub const MSG_DELETED: &str = "Deleted successfully.";

// =========================================================
// 查询参数
// =========================================================

/// 带分页的列表查询：`{page, limit, ...filters}`
pub trait ListQuery: Clone + Default {
    fn paging(&self) -> Paging;
    fn set_paging(&mut self, paging: Paging);
}

macro_rules! impl_list_query {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ListQuery for $ty {
                fn paging(&self) -> Paging {
                    self.paging
                }
                fn set_paging(&mut self, paging: Paging) {
                    self.paging = paging;
                }
            }
        )*
    };
}

impl_list_query!(
    ListPlants,
    ListDiseases,
    ListActivityKeywords,
    ListComplaints,
    ListNews,
    ListAdminUsers,
);

// =========================================================
// 加载结果
// =========================================================

/// 表格数据源约定的返回值
#[derive(Debug, Clone, PartialEq)]
pub struct TableResult<T> {
    pub data: Vec<T>,
    pub success: bool,
    pub total: u64,
}

impl<T> TableResult<T> {
    pub fn failed() -> Self {
        Self {
            data: Vec::new(),
            success: false,
            total: 0,
        }
    }
}

impl<T> From<Page<T>> for TableResult<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            data: page.items,
            success: true,
            total: page.total,
        }
    }
}

/// 执行一次列表请求；失败时返回空表和对应提示
pub async fn fetch_table<T, Fut>(fetch: Fut) -> (TableResult<T>, Option<Notice>)
where
    Fut: Future<Output = ApiResult<Page<T>>>,
{
    match fetch.await {
        Ok(page) => (page.into(), None),
        Err(e) => {
            warn!("list fetch failed: {}", e);
            (TableResult::failed(), Some(e.notice()))
        }
    }
}

// =========================================================
// 页面状态
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// 单个列表页的状态
///
/// `current_row` 是打开详情/编辑时的快照，之后的列表刷新不会改动它。
#[derive(Debug, Clone)]
pub struct ListPage<T, Q> {
    pub query: Q,
    pub state: LoadState,
    pub rows: Vec<T>,
    pub total: u64,
    pub current_row: Option<T>,
}

impl<T: Clone, Q: ListQuery> ListPage<T, Q> {
    pub fn new(page_size: u32) -> Self {
        let mut query = Q::default();
        query.set_paging(Paging::new(1, page_size));
        Self {
            query,
            state: LoadState::Idle,
            rows: Vec::new(),
            total: 0,
            current_row: None,
        }
    }

    /// 进入 Loading，返回本次要发送的查询
    pub fn begin_load(&mut self) -> Q {
        self.state = LoadState::Loading;
        self.query.clone()
    }

    pub fn apply(&mut self, result: TableResult<T>) {
        self.state = if result.success {
            LoadState::Success
        } else {
            LoadState::Error
        };
        self.rows = result.data;
        self.total = result.total;
    }

    /// 过滤条件变化时回到第一页
    pub fn set_filters(&mut self, mut filters: Q) {
        let limit = self.query.paging().limit;
        filters.set_paging(Paging::new(1, limit));
        self.query = filters;
    }

    pub fn set_page(&mut self, page: u32, page_size: u32) {
        let current = self.query.paging();
        // 修改每页条数时同样回到第一页
        let page = if page_size != current.limit { 1 } else { page };
        self.query.set_paging(Paging::new(page, page_size));
    }

    pub fn page_count(&self) -> u32 {
        page_count(self.total, self.query.paging().limit)
    }

    pub fn select(&mut self, row: &T) {
        self.current_row = Some(row.clone());
    }

    pub fn clear_selection(&mut self) {
        self.current_row = None;
    }
}

pub fn page_count(total: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    total.div_ceil(size).max(1) as u32
}

// =========================================================
// 删除确认
// =========================================================

/// 行内删除确认流程：Idle → Confirming → Deleting → Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteFlow {
    #[default]
    Idle,
    Confirming(i64),
    Deleting(i64),
}

impl DeleteFlow {
    pub fn request(&mut self, id: i64) {
        if !matches!(self, DeleteFlow::Deleting(_)) {
            *self = DeleteFlow::Confirming(id);
        }
    }

    pub fn cancel(&mut self) {
        if let DeleteFlow::Confirming(_) = self {
            *self = DeleteFlow::Idle;
        }
    }

    /// 确认删除，返回需要删除的 id；未处于确认状态时返回 None
    pub fn confirm(&mut self) -> Option<i64> {
        match *self {
            DeleteFlow::Confirming(id) => {
                *self = DeleteFlow::Deleting(id);
                Some(id)
            }
            _ => None,
        }
    }

    pub fn finish(&mut self) {
        *self = DeleteFlow::Idle;
    }

    pub fn pending_id(&self) -> Option<i64> {
        match *self {
            DeleteFlow::Confirming(id) | DeleteFlow::Deleting(id) => Some(id),
            DeleteFlow::Idle => None,
        }
    }

    pub fn is_deleting(&self) -> bool {
        matches!(self, DeleteFlow::Deleting(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// 删除成功，调用方应重新加载列表
    Deleted(Notice),
    Failed(Notice),
}

/// 执行删除；失败时提取服务端返回的消息
pub async fn delete_row<Fut>(delete: Fut) -> DeleteOutcome
where
    Fut: Future<Output = ApiResult<()>>,
{
    match delete.await {
        Ok(()) => DeleteOutcome::Deleted(Notice::success(MSG_DELETED)),
        Err(e) => {
            warn!("delete failed: {}", e);
            DeleteOutcome::Failed(Notice::error(e.server_message(MSG_DELETE_FAILED)))
        }
    }
}

// =========================================================
// 本地分页
// =========================================================

/// 对已整体拉取的集合做本地过滤和分页
pub fn paginate_local<T, F>(items: &[T], paging: Paging, keep: F) -> Page<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    let filtered: Vec<&T> = items.iter().filter(|&item| keep(item)).collect();
    let total = filtered.len() as u64;
    let start = (paging.page.saturating_sub(1) as usize).saturating_mul(paging.limit as usize);
    let items = filtered
        .into_iter()
        .skip(start)
        .take(paging.limit as usize)
        .cloned()
        .collect();
    Page { items, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{BASE, client_with_token, mock};
    use plantdoc_shared::Plant;
    use serde_json::json;

    #[tokio::test]
    async fn failed_fetch_yields_empty_unsuccessful_table() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_network_error(&format!("{}/plants?page=1&limit=10", BASE));

        let mut page: ListPage<Plant, ListPlants> = ListPage::new(10);
        let query = page.begin_load();
        assert_eq!(page.state, LoadState::Loading);

        let (result, notice) = fetch_table(api.list_plants(&query)).await;
        assert_eq!(result, TableResult::failed());
        assert!(notice.is_some());

        page.apply(result);
        assert_eq!(page.state, LoadState::Error);
        assert!(page.rows.is_empty());
    }

    #[tokio::test]
    async fn successful_fetch_fills_rows() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/plants?page=1&limit=10", BASE),
            200,
            json!({ "data": [{ "id": 1, "name": "Tomato" }], "total": 21 }),
        );

        let mut page: ListPage<Plant, ListPlants> = ListPage::new(10);
        let query = page.begin_load();
        let (result, notice) = fetch_table(api.list_plants(&query)).await;
        page.apply(result);

        assert!(notice.is_none());
        assert_eq!(page.state, LoadState::Success);
        assert_eq!(page.total, 21);
        assert_eq!(page.page_count(), 3);
    }

    #[test]
    fn filter_change_resets_to_first_page() {
        let mut page: ListPage<Plant, ListPlants> = ListPage::new(20);
        page.set_page(4, 20);
        assert_eq!(page.query.paging, Paging::new(4, 20));

        page.set_filters(ListPlants {
            name: Some("lúa".into()),
            ..Default::default()
        });
        assert_eq!(page.query.paging, Paging::new(1, 20));
        assert_eq!(page.query.name.as_deref(), Some("lúa"));

        page.set_page(3, 20);
        page.set_page(3, 50);
        assert_eq!(page.query.paging, Paging::new(1, 50));
    }

    #[test]
    fn selection_is_a_snapshot() {
        let mut page: ListPage<Plant, ListPlants> = ListPage::new(10);
        page.apply(TableResult {
            data: vec![Plant {
                id: 1,
                name: "Tomato".into(),
                description: None,
                image_url: None,
                created_at: None,
            }],
            success: true,
            total: 1,
        });
        let row = page.rows[0].clone();
        page.select(&row);
        page.rows[0].name = "Potato".into();
        assert_eq!(page.current_row.as_ref().map(|p| p.name.as_str()), Some("Tomato"));
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut flow = DeleteFlow::default();
        assert_eq!(flow.confirm(), None);

        flow.request(3);
        flow.cancel();
        assert_eq!(flow, DeleteFlow::Idle);

        flow.request(3);
        assert_eq!(flow.confirm(), Some(3));
        assert!(flow.is_deleting());
        flow.request(4);
        assert_eq!(flow.pending_id(), Some(3));
        flow.finish();
        assert_eq!(flow, DeleteFlow::Idle);
    }

    #[tokio::test]
    async fn delete_failure_surfaces_server_message() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/plants/2", BASE),
            409,
            json!({ "message": ["Plant is referenced by diseases"] }),
        );
        mock(&api).mock_response(&format!("{}/plants/3", BASE), 500, json!({}));

        match delete_row(api.delete_plant(2)).await {
            DeleteOutcome::Failed(notice) => {
                assert_eq!(notice.message, "Plant is referenced by diseases")
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        match delete_row(api.delete_plant(3)).await {
            DeleteOutcome::Failed(notice) => assert_eq!(notice.message, MSG_DELETE_FAILED),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn paginate_local_filters_then_slices() {
        let items: Vec<u32> = (1..=25).collect();
        let page = paginate_local(&items, Paging::new(2, 5), |n| n % 2 == 1);
        assert_eq!(page.total, 13);
        assert_eq!(page.items, vec![11, 13, 15, 17, 19]);

        let beyond = paginate_local(&items, Paging::new(9, 10), |_| true);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 25);
    }
}
