//! 病害 ↔ 活动关键词关联
//!
//! 以 class_name 打开；病害详情、已关联关键词、全部关键词三份数据各自加载。

use leptos::prelude::*;
use leptos::task::spawn_local;
use plantdoc_admin::Notice;
use plantdoc_admin::list::DeleteFlow;
use plantdoc_admin::services::OPTIONS_LIMIT;
use plantdoc_shared::protocol::{ListActivityKeywords, Paging};
use plantdoc_shared::{ActivityKeyword, Disease};

use crate::auth::use_api;
use crate::components::modal::Modal;
use crate::components::notice::use_notices;
use crate::components::table::{DeleteConfirm, or_dash, run_delete};

#[component]
pub fn KeywordLinksDialog(class_name: RwSignal<Option<String>>) -> impl IntoView {
    let api = StoredValue::new(use_api());
    let notices = use_notices();

    let disease: RwSignal<Option<Disease>> = RwSignal::new(None);
    let linked: RwSignal<Vec<ActivityKeyword>> = RwSignal::new(Vec::new());
    let keywords: RwSignal<Vec<ActivityKeyword>> = RwSignal::new(Vec::new());
    let selected = RwSignal::new(String::new());
    let linking = RwSignal::new(false);
    let flow = RwSignal::new(DeleteFlow::default());

    let reload_linked = move || {
        let Some(class) = class_name.get_untracked() else {
            return;
        };
        let api = api.get_value();
        spawn_local(async move {
            match api.disease_keywords(&class).await {
                Ok(list) => {
                    linked.try_set(list);
                }
                Err(e) => notices.push(e.notice()),
            }
        });
    };

    Effect::new(move |_| {
        let Some(class) = class_name.get() else {
            return;
        };
        disease.set(None);
        linked.set(Vec::new());
        selected.set(String::new());

        let detail_api = api.get_value();
        let detail_class = class.clone();
        spawn_local(async move {
            match detail_api.disease_by_class(&detail_class).await {
                Ok(d) => {
                    disease.try_set(Some(d));
                }
                Err(e) => notices.push(e.notice()),
            }
        });

        reload_linked();

        let options_api = api.get_value();
        spawn_local(async move {
            let query = ListActivityKeywords {
                paging: Paging::new(1, OPTIONS_LIMIT),
                ..Default::default()
            };
            match options_api.list_activity_keywords(&query).await {
                Ok(page) => {
                    keywords.try_set(page.items);
                }
                Err(e) => notices.push(e.notice()),
            }
        });
    });

    // 下拉中只列出尚未关联的关键词
    let available = move || {
        let linked_ids: Vec<i64> = linked.with(|l| l.iter().map(|k| k.id).collect());
        keywords.with(|all| {
            all.iter()
                .filter(|k| !linked_ids.contains(&k.id))
                .map(|k| (k.id, format!("{} ({})", k.name, k.keyword_type.as_str())))
                .collect::<Vec<_>>()
        })
    };

    let on_link = move |_| {
        let (Some(class), Ok(keyword_id)) = (
            class_name.get_untracked(),
            selected.get_untracked().parse::<i64>(),
        ) else {
            notices.push(Notice::warning("Choose a keyword to link."));
            return;
        };
        linking.set(true);
        let api = api.get_value();
        spawn_local(async move {
            match api.link_keyword(&class, keyword_id).await {
                Ok(()) => {
                    notices.push(Notice::success("Keyword linked."));
                    selected.set(String::new());
                    reload_linked();
                }
                Err(e) => notices.push(e.notice()),
            }
            linking.set(false);
        });
    };

    let on_unlink = move || {
        let Some(class) = class_name.get_untracked() else {
            return;
        };
        let api = api.get_value();
        run_delete(
            flow,
            notices,
            move |keyword_id| async move { api.unlink_keyword(&class, keyword_id).await },
            reload_linked,
        );
    };

    let title = Signal::derive(move || match disease.get() {
        Some(d) => format!("Keywords for {} ({})", d.name, d.class_name),
        None => format!("Keywords for {}", class_name.get().unwrap_or_default()),
    });

    view! {
        <Modal
            open=Signal::derive(move || class_name.with(Option::is_some))
            title=title
            on_close=move |_| class_name.set(None)
            wide=true
        >
            {move || {
                disease
                    .get()
                    .map(|d| {
                        view! {
                            <p class="text-sm opacity-70 mb-2">
                                {format!("Type: {} · Plant: {}", d.disease_type, or_dash(d.plant_name))}
                            </p>
                        }
                    })
            }}
            <div class="flex gap-2 mb-4">
                <select
                    class="select select-bordered select-sm flex-1"
                    prop:value=move || selected.get()
                    on:change=move |ev| selected.set(event_target_value(&ev))
                >
                    <option value="">"Select a keyword"</option>
                    {move || {
                        available()
                            .into_iter()
                            .map(|(id, label)| view! { <option value=id.to_string()>{label}</option> })
                            .collect_view()
                    }}
                </select>
                <button class="btn btn-sm btn-primary" disabled=move || linking.get() on:click=on_link>
                    "Link"
                </button>
            </div>
            <table class="table table-zebra table-sm">
                <thead>
                    <tr>
                        <th>"Keyword"</th>
                        <th>"Type"</th>
                        <th>"Base offset"</th>
                        <th>"Frequency"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        linked
                            .get()
                            .into_iter()
                            .map(|k| {
                                view! {
                                    <tr>
                                        <td>{k.name.clone()}</td>
                                        <td>{k.keyword_type.as_str()}</td>
                                        <td>{or_dash(k.base_days_offset)}</td>
                                        <td>{or_dash(k.frequency_days)}</td>
                                        <td class="text-right">
                                            <DeleteConfirm id=k.id flow=flow on_confirm=move |_| on_unlink() />
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view()
                    }}
                </tbody>
            </table>
            <Show when=move || linked.with(Vec::is_empty)>
                <p class="text-center text-sm opacity-60 py-4">"No linked keywords"</p>
            </Show>
        </Modal>
    }
}
