//! 列表页通用部件：加载、删除确认、分页、详情侧栏

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use plantdoc_admin::ApiResult;
use plantdoc_admin::list::{
    DeleteFlow, DeleteOutcome, ListPage, ListQuery, LoadState, delete_row, fetch_table,
};
use plantdoc_shared::Page;

use crate::components::icons::{Trash, X};
use crate::components::notice::NoticeContext;

pub const PAGE_SIZES: [u32; 4] = [10, 20, 50, 100];

/// 重新加载表格；失败时推送提示，表格退化为空
pub fn load_table<T, Q, Fut, W>(table: RwSignal<ListPage<T, Q>>, notices: NoticeContext, fetch: W)
where
    T: Clone + Send + Sync + 'static,
    Q: ListQuery + Send + Sync + 'static,
    Fut: Future<Output = ApiResult<Page<T>>> + 'static,
    W: FnOnce(Q) -> Fut + 'static,
{
    let Some(query) = table.try_update(|t| t.begin_load()) else {
        return;
    };
    spawn_local(async move {
        let (result, notice) = fetch_table(fetch(query)).await;
        if let Some(notice) = notice {
            notices.push(notice);
        }
        table.try_update(|t| t.apply(result));
    });
}

/// 执行已确认的删除；成功后调用 `reload`
pub fn run_delete<Fut, W, R>(flow: RwSignal<DeleteFlow>, notices: NoticeContext, delete: W, reload: R)
where
    Fut: Future<Output = ApiResult<()>> + 'static,
    W: FnOnce(i64) -> Fut + 'static,
    R: FnOnce() + 'static,
{
    let Some(id) = flow.try_update(|f| f.confirm()).flatten() else {
        return;
    };
    spawn_local(async move {
        let outcome = delete_row(delete(id)).await;
        flow.try_update(|f| f.finish());
        match outcome {
            DeleteOutcome::Deleted(notice) => {
                notices.push(notice);
                reload();
            }
            DeleteOutcome::Failed(notice) => notices.push(notice),
        }
    });
}

/// 行内删除按钮，点击后原地展开确认
#[component]
pub fn DeleteConfirm(
    id: i64,
    flow: RwSignal<DeleteFlow>,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let pending = move || flow.with(|f| f.pending_id() == Some(id));
    let deleting = move || flow.with(|f| f.is_deleting());

    view! {
        <Show
            when=pending
            fallback=move || {
                view! {
                    <button
                        class="btn btn-ghost btn-xs text-error"
                        title="Delete"
                        on:click=move |_| flow.update(|f| f.request(id))
                    >
                        <Trash />
                    </button>
                }
            }
        >
            <div class="join">
                <button
                    class="btn btn-error btn-xs join-item"
                    disabled=deleting
                    on:click=move |_| on_confirm.run(())
                >
                    <Show when=deleting>
                        <span class="loading loading-spinner loading-xs"></span>
                    </Show>
                    "Delete?"
                </button>
                <button
                    class="btn btn-xs join-item"
                    disabled=deleting
                    on:click=move |_| flow.update(|f| f.cancel())
                >
                    "No"
                </button>
            </div>
        </Show>
    }
}

/// 表格加载中 / 空数据时的占位行
#[component]
pub fn TableStatus(
    #[prop(into)] state: Signal<LoadState>,
    #[prop(into)] empty: Signal<bool>,
    colspan: u32,
) -> impl IntoView {
    move || match state.get() {
        LoadState::Loading => view! {
            <tr>
                <td colspan=colspan class="text-center py-8">
                    <span class="loading loading-spinner loading-md"></span>
                </td>
            </tr>
        }
        .into_any(),
        LoadState::Error => view! {
            <tr>
                <td colspan=colspan class="text-center py-8 text-error">"Failed to load data"</td>
            </tr>
        }
        .into_any(),
        _ if empty.get() => view! {
            <tr>
                <td colspan=colspan class="text-center py-8 opacity-60">"No data"</td>
            </tr>
        }
        .into_any(),
        _ => ().into_any(),
    }
}

#[component]
pub fn Pagination(
    #[prop(into)] page: Signal<u32>,
    #[prop(into)] page_size: Signal<u32>,
    #[prop(into)] total: Signal<u64>,
    /// (页码, 每页条数)
    #[prop(into)]
    on_change: Callback<(u32, u32)>,
) -> impl IntoView {
    let page_count = move || plantdoc_admin::list::page_count(total.get(), page_size.get());

    view! {
        <div class="flex items-center justify-between mt-4 text-sm">
            <span class="opacity-70">{move || format!("Total {} items", total.get())}</span>
            <div class="flex items-center gap-2">
                <div class="join">
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || page.get() <= 1
                        on:click=move |_| on_change.run((page.get().saturating_sub(1).max(1), page_size.get()))
                    >
                        "«"
                    </button>
                    <button class="join-item btn btn-sm btn-disabled">
                        {move || format!("{} / {}", page.get(), page_count())}
                    </button>
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || page.get() >= page_count()
                        on:click=move |_| on_change.run((page.get() + 1, page_size.get()))
                    >
                        "»"
                    </button>
                </div>
                <select
                    class="select select-bordered select-sm"
                    on:change=move |ev| {
                        let size = event_target_value(&ev).parse().unwrap_or(page_size.get());
                        on_change.run((page.get(), size));
                    }
                >
                    {PAGE_SIZES
                        .into_iter()
                        .map(|size| {
                            view! {
                                <option value=size.to_string() selected=move || page_size.get() == size>
                                    {format!("{} / page", size)}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>
        </div>
    }
}

/// 右侧详情栏，展示打开时的记录快照
#[component]
pub fn DetailDrawer(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] title: Signal<String>,
    #[prop(into)] on_close: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    view! {
        <Show when=move || open.get()>
            <div class="fixed inset-0 bg-black/30 z-30" on:click=move |_| on_close.run(())></div>
            <aside class="fixed inset-y-0 right-0 w-full max-w-md bg-base-100 shadow-xl z-40 p-6 overflow-y-auto">
                <div class="flex items-center justify-between mb-4">
                    <h3 class="font-bold text-lg">{move || title.get()}</h3>
                    <button class="btn btn-sm btn-circle btn-ghost" on:click=move |_| on_close.run(())>
                        <X />
                    </button>
                </div>
                <dl class="space-y-3">{children()}</dl>
            </aside>
        </Show>
    }
}

/// 详情栏中的一行
pub fn detail_item(label: &'static str, value: impl Into<String>) -> impl IntoView {
    let value = value.into();
    let value = if value.trim().is_empty() {
        "-".to_string()
    } else {
        value
    };
    view! {
        <div>
            <dt class="text-xs uppercase opacity-60">{label}</dt>
            <dd class="whitespace-pre-wrap break-words">{value}</dd>
        </div>
    }
}

/// 可选文本的展示值
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
