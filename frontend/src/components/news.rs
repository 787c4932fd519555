mod tag_manager;

use leptos::prelude::*;
use leptos::task::spawn_local;
use plantdoc_admin::form::{ModalForm, NewsForm, submit};
use plantdoc_admin::list::{DeleteFlow, ListPage};
use plantdoc_shared::protocol::ListNews;
use plantdoc_shared::{News, NewsStatus, NewsTag};

use crate::auth::use_api;
use crate::components::form_kit::{
    FormActions, SelectInput, TextArea, TextInput, bind, close_modal, error_of, fixed_options,
    modal_open, modal_submitting, modal_title, run_submit,
};
use crate::components::icons::{Eye, Pencil, Plus};
use crate::components::modal::Modal;
use crate::components::notice::use_notices;
use crate::components::table::{
    DeleteConfirm, DetailDrawer, Pagination, TableStatus, detail_item, load_table, or_dash,
    run_delete,
};

use tag_manager::TagManager;

const STATUSES: [NewsStatus; 2] = [NewsStatus::Draft, NewsStatus::Published];

fn tag_name(tags: &[NewsTag], id: Option<i64>) -> String {
    match id {
        Some(id) => tags
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("#{}", id)),
        None => "-".to_string(),
    }
}

fn id_text(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[component]
pub fn NewsPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let notices = use_notices();
    let page_size = api.with_value(|a| a.config().default_page_size);

    let table = RwSignal::new(ListPage::<News, ListNews>::new(page_size));
    let flow = RwSignal::new(DeleteFlow::default());
    let form = RwSignal::new(ModalForm::<NewsForm>::default());
    let tags: RwSignal<Vec<NewsTag>> = RwSignal::new(Vec::new());
    let tags_open = RwSignal::new(false);
    let preview = RwSignal::new(false);

    let title_filter = RwSignal::new(String::new());
    let status_filter = RwSignal::new(String::new());
    let tag_filter = RwSignal::new(String::new());

    let reload = move || {
        let api = api.get_value();
        load_table(table, notices, move |query| async move {
            api.list_news(&query).await
        });
    };
    let reload_tags = move || {
        let api = api.get_value();
        spawn_local(async move {
            match api.list_news_tags().await {
                Ok(list) => {
                    tags.try_set(list);
                }
                Err(e) => notices.push(e.notice()),
            }
        });
    };
    Effect::new(move |_| {
        reload();
        reload_tags();
    });

    let apply_filters = move || {
        let title = title_filter.get_untracked();
        table.update(|t| {
            t.set_filters(ListNews {
                title: (!title.trim().is_empty()).then(|| title.trim().to_string()),
                status: NewsStatus::parse(&status_filter.get_untracked()),
                blog_tag_id: tag_filter.get_untracked().parse().ok(),
                ..Default::default()
            })
        });
        reload();
    };
    let reset_filters = move || {
        title_filter.set(String::new());
        status_filter.set(String::new());
        tag_filter.set(String::new());
        table.update(|t| t.set_filters(ListNews::default()));
        reload();
    };

    let on_delete = move || {
        let api = api.get_value();
        run_delete(
            flow,
            notices,
            move |id| async move { api.delete_news(id).await },
            reload,
        );
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let api = api.get_value();
        run_submit(
            form,
            notices,
            "Post saved.",
            move |mode, values| async move {
                let api = &api;
                submit(
                    &values,
                    mode,
                    |p| async move { api.create_news(&p).await },
                    |id, p| async move { api.update_news(id, &p).await },
                )
                .await
            },
            move |_| reload(),
        );
    };

    let open_create = move || {
        preview.set(false);
        form.update(|f| f.open_create());
    };
    let open_edit = move |news: &News| {
        preview.set(false);
        form.update(|f| f.open_edit(news));
    };

    let status_options = fixed_options(STATUSES.iter().map(NewsStatus::as_str));
    let tag_options = Signal::derive(move || {
        tags.with(|list| {
            list.iter()
                .map(|t| (t.id.to_string(), t.name.clone()))
                .collect::<Vec<_>>()
        })
    });

    let (title, set_title) = bind(form, |f| f.title.clone(), |f, v| f.title = v);
    let (status, set_status) = bind(
        form,
        |f| f.status.as_str().to_string(),
        |f, v| {
            if let Some(s) = NewsStatus::parse(&v) {
                f.status = s;
            }
        },
    );
    let (tag_id, set_tag_id) = bind(form, |f| id_text(f.blog_tag_id), |f, v| f.blog_tag_id = v.parse().ok());
    let (sub_stage_id, set_sub_stage_id) = bind(
        form,
        |f| id_text(f.sub_guide_stages_id),
        |f, v| f.sub_guide_stages_id = v.trim().parse().ok(),
    );
    let (thumbnail, set_thumbnail) = bind(form, |f| f.thumbnail.clone(), |f, v| f.thumbnail = v);
    let (content, set_content) = bind(form, |f| f.content.clone(), |f, v| f.content = v);

    let row = move |news: News| {
        let id = news.id;
        let selected = news.clone();
        let editing = news.clone();
        let published = news.status == NewsStatus::Published;
        view! {
            <tr>
                <td>{id}</td>
                <td>
                    {news
                        .thumbnail
                        .clone()
                        .map(|src| view! { <img class="h-10 w-16 rounded object-cover" src=src /> })}
                </td>
                <td class="font-medium max-w-sm truncate">{news.title.clone()}</td>
                <td>
                    <span class="badge" class:badge-success=published class:badge-ghost=!published>
                        {news.status.as_str()}
                    </span>
                </td>
                <td>{move || tags.with(|list| tag_name(list, news.blog_tag_id))}</td>
                <td>{or_dash(news.created_at.map(|d| d.format("%Y-%m-%d %H:%M")))}</td>
                <td class="text-right whitespace-nowrap">
                    <button
                        class="btn btn-ghost btn-xs"
                        title="View"
                        on:click=move |_| table.update(|t| t.select(&selected))
                    >
                        <Eye />
                    </button>
                    <button class="btn btn-ghost btn-xs" title="Edit" on:click=move |_| open_edit(&editing)>
                        <Pencil />
                    </button>
                    <DeleteConfirm id=id flow=flow on_confirm=move |_| on_delete() />
                </td>
            </tr>
        }
    };

    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body">
                <div class="flex flex-wrap items-end gap-2 mb-4">
                    <input
                        class="input input-bordered input-sm w-64"
                        placeholder="Search by title"
                        prop:value=move || title_filter.get()
                        on:input=move |ev| title_filter.set(event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" {
                                apply_filters();
                            }
                        }
                    />
                    <select
                        class="select select-bordered select-sm"
                        prop:value=move || status_filter.get()
                        on:change=move |ev| {
                            status_filter.set(event_target_value(&ev));
                            apply_filters();
                        }
                    >
                        <option value="">"All statuses"</option>
                        {STATUSES
                            .into_iter()
                            .map(|s| view! { <option value=s.as_str()>{s.as_str()}</option> })
                            .collect_view()}
                    </select>
                    <select
                        class="select select-bordered select-sm"
                        prop:value=move || tag_filter.get()
                        on:change=move |ev| {
                            tag_filter.set(event_target_value(&ev));
                            apply_filters();
                        }
                    >
                        <option value="">"All tags"</option>
                        {move || {
                            tags.get()
                                .into_iter()
                                .map(|t| view! { <option value=t.id.to_string()>{t.name}</option> })
                                .collect_view()
                        }}
                    </select>
                    <button class="btn btn-sm btn-primary" on:click=move |_| apply_filters()>
                        "Search"
                    </button>
                    <button class="btn btn-sm" on:click=move |_| reset_filters()>
                        "Reset"
                    </button>
                    <div class="flex-1"></div>
                    <button class="btn btn-sm" on:click=move |_| tags_open.set(true)>
                        "Tags"
                    </button>
                    <button class="btn btn-sm btn-primary" on:click=move |_| open_create()>
                        <Plus />
                        "New post"
                    </button>
                </div>

                <div class="overflow-x-auto">
                    <table class="table table-zebra">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Thumbnail"</th>
                                <th>"Title"</th>
                                <th>"Status"</th>
                                <th>"Tag"</th>
                                <th>"Created"</th>
                                <th class="text-right">"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <TableStatus
                                state=Signal::derive(move || table.with(|t| t.state.clone()))
                                empty=Signal::derive(move || table.with(|t| t.rows.is_empty()))
                                colspan=7
                            />
                            {move || table.with(|t| t.rows.clone()).into_iter().map(row).collect_view()}
                        </tbody>
                    </table>
                </div>

                <Pagination
                    page=Signal::derive(move || table.with(|t| t.query.paging.page))
                    page_size=Signal::derive(move || table.with(|t| t.query.paging.limit))
                    total=Signal::derive(move || table.with(|t| t.total))
                    on_change=move |(page, size)| {
                        table.update(|t| t.set_page(page, size));
                        reload();
                    }
                />
            </div>
        </div>

        <DetailDrawer
            open=Signal::derive(move || table.with(|t| t.current_row.is_some()))
            title="Post detail"
            on_close=move |_| table.update(|t| t.clear_selection())
        >
            {move || {
                table
                    .with(|t| t.current_row.clone())
                    .map(|n| {
                        let tag = tags.with(|list| tag_name(list, n.blog_tag_id));
                        view! {
                            {n.thumbnail.map(|src| view! { <img class="rounded-box w-full" src=src /> })}
                            {detail_item("ID", n.id.to_string())}
                            {detail_item("Title", n.title)}
                            {detail_item("Status", n.status.as_str())}
                            {detail_item("Tag", tag)}
                            {detail_item("Guide sub-stage", or_dash(n.sub_guide_stages_id))}
                            {detail_item("Content", n.content)}
                        }
                    })
            }}
        </DetailDrawer>

        <Modal
            open=modal_open(form)
            title=modal_title(form, "New post", "Edit post")
            on_close=move |_| close_modal(form)
            wide=true
        >
            <form class="grid grid-cols-1 md:grid-cols-2 gap-x-4 gap-y-2" on:submit=on_submit>
                <div class="md:col-span-2">
                    <TextInput label="Title" value=title on_input=set_title error=error_of(form, "title") required=true />
                </div>
                <SelectInput label="Status" options=status_options value=status on_change=set_status required=true />
                <SelectInput
                    label="Tag"
                    options=tag_options
                    value=tag_id
                    on_change=set_tag_id
                    placeholder="No tag"
                />
                <TextInput
                    label="Guide sub-stage ID"
                    value=sub_stage_id
                    on_input=set_sub_stage_id
                    input_type="number"
                />
                <TextInput
                    label="Thumbnail URL"
                    value=thumbnail
                    on_input=set_thumbnail
                    error=error_of(form, "thumbnail")
                    placeholder="https://"
                />
                <div class="md:col-span-2">
                    <div role="tablist" class="tabs tabs-bordered tabs-sm">
                        <a role="tab" class="tab" class:tab-active=move || !preview.get() on:click=move |_| preview.set(false)>
                            "Write"
                        </a>
                        <a role="tab" class="tab" class:tab-active=move || preview.get() on:click=move |_| preview.set(true)>
                            "Preview"
                        </a>
                    </div>
                    <Show
                        when=move || preview.get()
                        fallback=move || {
                            view! {
                                <TextArea
                                    label="Content (markdown)"
                                    value=content
                                    on_input=set_content
                                    error=error_of(form, "content")
                                    required=true
                                    rows=12
                                />
                            }
                        }
                    >
                        // 预览按原文展示，不渲染 markdown
                        <div class="border rounded-box p-4 mt-2 min-h-48 whitespace-pre-wrap break-words">
                            {move || content.get()}
                        </div>
                    </Show>
                </div>
                <div class="md:col-span-2">
                    <FormActions submitting=modal_submitting(form) on_cancel=move |_| close_modal(form) />
                </div>
            </form>
        </Modal>

        <TagManager open=tags_open tags=tags on_changed=move |_| reload_tags() />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tag_falls_back_to_id() {
        let tags = vec![NewsTag {
            id: 1,
            name: "Lúa".into(),
        }];
        assert_eq!(tag_name(&tags, Some(1)), "Lúa");
        assert_eq!(tag_name(&tags, Some(9)), "#9");
        assert_eq!(tag_name(&tags, None), "-");
    }
}
