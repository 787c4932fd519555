//! 博客标签管理
//!
//! 标签接口一次返回全部数据，搜索与分页在本地完成。

use leptos::prelude::*;
use leptos::task::spawn_local;
use plantdoc_admin::Notice;
use plantdoc_admin::list::{DeleteFlow, paginate_local};
use plantdoc_shared::NewsTag;
use plantdoc_shared::protocol::Paging;

use crate::auth::use_api;
use crate::components::modal::Modal;
use crate::components::notice::use_notices;
use crate::components::table::{DeleteConfirm, Pagination, run_delete};

const TAG_PAGE_SIZE: u32 = 10;

#[component]
pub fn TagManager(
    open: RwSignal<bool>,
    tags: RwSignal<Vec<NewsTag>>,
    /// 标签增删后通知页面重新拉取
    #[prop(into)]
    on_changed: Callback<()>,
) -> impl IntoView {
    let api = StoredValue::new(use_api());
    let notices = use_notices();
    let flow = RwSignal::new(DeleteFlow::default());
    let search = RwSignal::new(String::new());
    let paging = RwSignal::new(Paging::new(1, TAG_PAGE_SIZE));
    let new_name = RwSignal::new(String::new());
    let creating = RwSignal::new(false);

    let visible = Memo::new(move |_| {
        let needle = search.get().trim().to_lowercase();
        tags.with(|all| {
            paginate_local(all, paging.get(), |t: &NewsTag| {
                needle.is_empty() || t.name.to_lowercase().contains(&needle)
            })
        })
    });

    let on_create = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = new_name.get_untracked();
        if name.trim().is_empty() {
            notices.push(Notice::warning("Tag name is required."));
            return;
        }
        if creating.get_untracked() {
            return;
        }
        creating.set(true);
        let api = api.get_value();
        spawn_local(async move {
            match api.create_news_tag(&name).await {
                Ok(tag) => {
                    notices.push(Notice::success(format!("Tag \"{}\" created.", tag.name)));
                    new_name.set(String::new());
                    on_changed.run(());
                }
                Err(e) => notices.push(e.notice()),
            }
            creating.set(false);
        });
    };

    let on_delete = move || {
        let api = api.get_value();
        run_delete(
            flow,
            notices,
            move |id| async move { api.delete_news_tag(id).await },
            move || on_changed.run(()),
        );
    };

    view! {
        <Modal open=Signal::derive(move || open.get()) title="Blog tags" on_close=move |_| open.set(false)>
            <form class="flex gap-2 mb-3" on:submit=on_create>
                <input
                    class="input input-bordered input-sm flex-1"
                    placeholder="New tag name"
                    prop:value=move || new_name.get()
                    on:input=move |ev| new_name.set(event_target_value(&ev))
                />
                <button type="submit" class="btn btn-sm btn-primary" disabled=move || creating.get()>
                    "Add"
                </button>
            </form>
            <input
                class="input input-bordered input-sm w-full mb-2"
                placeholder="Filter tags"
                prop:value=move || search.get()
                on:input=move |ev| {
                    search.set(event_target_value(&ev));
                    paging.update(|p| p.page = 1);
                }
            />
            <table class="table table-sm">
                <tbody>
                    {move || {
                        visible
                            .get()
                            .items
                            .into_iter()
                            .map(|tag| {
                                view! {
                                    <tr>
                                        <td class="w-12 opacity-60">{tag.id}</td>
                                        <td>{tag.name.clone()}</td>
                                        <td class="text-right">
                                            <DeleteConfirm id=tag.id flow=flow on_confirm=move |_| on_delete() />
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view()
                    }}
                </tbody>
            </table>
            <Pagination
                page=Signal::derive(move || paging.with(|p| p.page))
                page_size=Signal::derive(move || paging.with(|p| p.limit))
                total=Signal::derive(move || visible.with(|v| v.total))
                on_change=move |(page, limit)| paging.set(Paging::new(page, limit))
            />
        </Modal>
    }
}
