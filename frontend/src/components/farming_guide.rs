//! 种植指南：植物 → 阶段 → 子阶段
//!
//! 阶段接口按植物返回全部数据，搜索与分页在本地完成。

mod sub_stages;

use leptos::prelude::*;
use leptos::task::spawn_local;
use plantdoc_admin::form::{GuideStageForm, ModalForm, submit};
use plantdoc_admin::list::{DeleteFlow, LoadState, paginate_local};
use plantdoc_shared::protocol::Paging;
use plantdoc_shared::{GuideStage, Plant};

use crate::auth::use_api;
use crate::components::form_kit::{
    FormActions, TextArea, TextInput, bind, close_modal, error_of, modal_open, modal_submitting,
    modal_title, run_submit,
};
use crate::components::icons::{Pencil, Plus};
use crate::components::modal::Modal;
use crate::components::notice::use_notices;
use crate::components::table::{DeleteConfirm, Pagination, TableStatus, or_dash, run_delete};

use sub_stages::SubStagePanel;

/// 展示为 "3 – 10"；两端都缺失时为 "-"
pub(crate) fn day_range(start: Option<i32>, end: Option<i32>) -> String {
    match (start, end) {
        (None, None) => "-".to_string(),
        (s, e) => format!("{} – {}", or_dash(s), or_dash(e)),
    }
}

#[component]
pub fn FarmingGuidePage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let notices = use_notices();
    let page_size = api.with_value(|a| a.config().default_page_size);

    let plants: RwSignal<Vec<Plant>> = RwSignal::new(Vec::new());
    let plant_id: RwSignal<Option<i64>> = RwSignal::new(None);
    let stages: RwSignal<Vec<GuideStage>> = RwSignal::new(Vec::new());
    let state = RwSignal::new(LoadState::Idle);
    let search = RwSignal::new(String::new());
    let paging = RwSignal::new(Paging::new(1, page_size));
    let selected: RwSignal<Option<GuideStage>> = RwSignal::new(None);
    let flow = RwSignal::new(DeleteFlow::default());
    let form = RwSignal::new(ModalForm::<GuideStageForm>::default());

    Effect::new(move |_| {
        let api = api.get_value();
        spawn_local(async move {
            match api.all_plants().await {
                Ok(list) => {
                    if plant_id.get_untracked().is_none() {
                        plant_id.try_set(list.first().map(|p| p.id));
                    }
                    plants.try_set(list);
                }
                Err(e) => notices.push(e.notice()),
            }
        });
    });

    let reload = move || {
        let Some(id) = plant_id.get_untracked() else {
            stages.set(Vec::new());
            return;
        };
        state.set(LoadState::Loading);
        let api = api.get_value();
        spawn_local(async move {
            match api.list_guide_stages(id).await {
                Ok(list) => {
                    if plant_id.try_get_untracked().flatten() != Some(id) {
                        return;
                    }
                    // 选中阶段被删除或已更新时同步
                    selected.try_update(|s| {
                        *s = s.as_ref().and_then(|cur| list.iter().find(|g| g.id == cur.id).cloned());
                    });
                    stages.try_set(list);
                    state.try_set(LoadState::Success);
                }
                Err(e) => {
                    stages.try_set(Vec::new());
                    state.try_set(LoadState::Error);
                    notices.push(e.notice());
                }
            }
        });
    };
    Effect::new(move |_| {
        let _ = plant_id.get();
        selected.set(None);
        paging.update(|p| p.page = 1);
        reload();
    });

    let visible = Memo::new(move |_| {
        let needle = search.get().trim().to_lowercase();
        stages.with(|all| {
            paginate_local(all, paging.get(), |s: &GuideStage| {
                needle.is_empty() || s.stage_title.to_lowercase().contains(&needle)
            })
        })
    });

    let on_delete = move || {
        let api = api.get_value();
        run_delete(
            flow,
            notices,
            move |id| async move { api.delete_guide_stage(id).await },
            reload,
        );
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let api = api.get_value();
        run_submit(
            form,
            notices,
            "Stage saved.",
            move |mode, values| async move {
                let api = &api;
                submit(
                    &values,
                    mode,
                    |p| async move { api.create_guide_stage(&p).await },
                    |id, p| async move { api.update_guide_stage(id, &p).await },
                )
                .await
            },
            move |_| reload(),
        );
    };

    let open_create = move || {
        let plant = plant_id.get_untracked();
        form.update(|f| {
            f.open_create();
            f.values.plant_id = plant;
        });
    };

    let (stage_title, set_stage_title) =
        bind(form, |f| f.stage_title.clone(), |f, v| f.stage_title = v);
    let (description, set_description) =
        bind(form, |f| f.description.clone(), |f, v| f.description = v);
    let (start, set_start) = bind(form, |f| f.start_day_offset.clone(), |f, v| f.start_day_offset = v);
    let (end, set_end) = bind(form, |f| f.end_day_offset.clone(), |f, v| f.end_day_offset = v);
    let plant_error = error_of(form, "plant_id");

    let row = move |stage: GuideStage| {
        let id = stage.id;
        let picked = stage.clone();
        let editing = stage.clone();
        let is_selected = move || selected.with(|s| s.as_ref().map(|s| s.id) == Some(id));
        view! {
            <tr
                class="cursor-pointer"
                class:bg-base-200=is_selected
                on:click=move |_| selected.set(Some(picked.clone()))
            >
                <td>{id}</td>
                <td class="font-medium">{stage.stage_title.clone()}</td>
                <td>{day_range(stage.start_day_offset, stage.end_day_offset)}</td>
                <td class="max-w-md truncate">{or_dash(stage.description.clone())}</td>
                <td class="text-right whitespace-nowrap" on:click=|ev| ev.stop_propagation()>
                    <button
                        class="btn btn-ghost btn-xs"
                        title="Edit"
                        on:click=move |_| form.update(|f| f.open_edit(&editing))
                    >
                        <Pencil />
                    </button>
                    <DeleteConfirm id=id flow=flow on_confirm=move |_| on_delete() />
                </td>
            </tr>
        }
    };

    view! {
        <div class="space-y-4">
            <div class="card bg-base-100 shadow-sm">
                <div class="card-body">
                    <div class="flex flex-wrap items-end gap-2 mb-4">
                        <select
                            class="select select-bordered select-sm w-56"
                            on:change=move |ev| plant_id.set(event_target_value(&ev).parse().ok())
                        >
                            <option value="" selected=move || plant_id.get().is_none()>
                                "Select a plant"
                            </option>
                            {move || {
                                let current = plant_id.get();
                                plants
                                    .get()
                                    .into_iter()
                                    .map(|p| {
                                        view! {
                                            <option value=p.id.to_string() selected=current == Some(p.id)>
                                                {p.name}
                                            </option>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </select>
                        <input
                            class="input input-bordered input-sm w-64"
                            placeholder="Filter stages"
                            prop:value=move || search.get()
                            on:input=move |ev| {
                                search.set(event_target_value(&ev));
                                paging.update(|p| p.page = 1);
                            }
                        />
                        <div class="flex-1"></div>
                        <button
                            class="btn btn-sm btn-primary"
                            disabled=move || plant_id.get().is_none()
                            on:click=move |_| open_create()
                        >
                            <Plus />
                            "New stage"
                        </button>
                    </div>

                    <div class="overflow-x-auto">
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"ID"</th>
                                    <th>"Stage"</th>
                                    <th>"Days"</th>
                                    <th>"Description"</th>
                                    <th class="text-right">"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <TableStatus
                                    state=Signal::derive(move || state.get())
                                    empty=Signal::derive(move || visible.with(|v| v.items.is_empty()))
                                    colspan=5
                                />
                                {move || visible.get().items.into_iter().map(row).collect_view()}
                            </tbody>
                        </table>
                    </div>

                    <Pagination
                        page=Signal::derive(move || paging.with(|p| p.page))
                        page_size=Signal::derive(move || paging.with(|p| p.limit))
                        total=Signal::derive(move || visible.with(|v| v.total))
                        on_change=move |(page, limit)| paging.set(Paging::new(page, limit))
                    />
                </div>
            </div>

            <SubStagePanel stage=selected />
        </div>

        <Modal
            open=modal_open(form)
            title=modal_title(form, "New stage", "Edit stage")
            on_close=move |_| close_modal(form)
        >
            <form class="space-y-2" on:submit=on_submit>
                <TextInput
                    label="Stage title"
                    value=stage_title
                    on_input=set_stage_title
                    error=error_of(form, "stage_title")
                    required=true
                />
                <TextArea
                    label="Description"
                    value=description
                    on_input=set_description
                    error=error_of(form, "description")
                />
                <div class="grid grid-cols-2 gap-4">
                    <TextInput
                        label="Start day"
                        value=start
                        on_input=set_start
                        error=error_of(form, "start_day_offset")
                        input_type="number"
                    />
                    <TextInput
                        label="End day"
                        value=end
                        on_input=set_end
                        error=error_of(form, "end_day_offset")
                        input_type="number"
                    />
                </div>
                <Show when=move || plant_error.get().is_some()>
                    <p class="text-error text-sm">"Select a plant first"</p>
                </Show>
                <FormActions submitting=modal_submitting(form) on_cancel=move |_| close_modal(form) />
            </form>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_range_formats_partial_bounds() {
        assert_eq!(day_range(None, None), "-");
        assert_eq!(day_range(Some(3), Some(10)), "3 – 10");
        assert_eq!(day_range(Some(0), None), "0 – -");
    }
}
