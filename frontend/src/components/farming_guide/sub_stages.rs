//! 选中阶段下的子阶段

use leptos::prelude::*;
use leptos::task::spawn_local;
use plantdoc_admin::form::{ModalForm, SubGuideStageForm, submit};
use plantdoc_admin::list::DeleteFlow;
use plantdoc_shared::{GuideStage, SubGuideStage};

use crate::auth::use_api;
use crate::components::form_kit::{
    FormActions, TextArea, TextInput, bind, close_modal, error_of, modal_open, modal_submitting,
    modal_title, run_submit,
};
use crate::components::icons::{Pencil, Plus};
use crate::components::modal::Modal;
use crate::components::notice::use_notices;
use crate::components::table::{DeleteConfirm, or_dash, run_delete};

use super::day_range;

#[component]
pub fn SubStagePanel(#[prop(into)] stage: Signal<Option<GuideStage>>) -> impl IntoView {
    let api = StoredValue::new(use_api());
    let notices = use_notices();

    let items: RwSignal<Vec<SubGuideStage>> = RwSignal::new(Vec::new());
    let loading = RwSignal::new(false);
    let flow = RwSignal::new(DeleteFlow::default());
    let form = RwSignal::new(ModalForm::<SubGuideStageForm>::default());
    let stage_id = Memo::new(move |_| stage.with(|s| s.as_ref().map(|s| s.id)));

    let reload = move || {
        let Some(id) = stage_id.get_untracked() else {
            items.set(Vec::new());
            return;
        };
        loading.set(true);
        let api = api.get_value();
        spawn_local(async move {
            match api.list_sub_guide_stages(id).await {
                Ok(list) => {
                    // 切换阶段后丢弃旧阶段的结果
                    if stage_id.try_get_untracked().flatten() == Some(id) {
                        items.try_set(list);
                    }
                }
                Err(e) => {
                    items.try_set(Vec::new());
                    notices.push(e.notice());
                }
            }
            loading.try_set(false);
        });
    };
    Effect::new(move |_| {
        let _ = stage_id.get();
        reload();
    });

    let on_delete = move || {
        let api = api.get_value();
        run_delete(
            flow,
            notices,
            move |id| async move { api.delete_sub_guide_stage(id).await },
            reload,
        );
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let api = api.get_value();
        run_submit(
            form,
            notices,
            "Sub-stage saved.",
            move |mode, values| async move {
                let api = &api;
                submit(
                    &values,
                    mode,
                    |p| async move { api.create_sub_guide_stage(&p).await },
                    |id, p| async move { api.update_sub_guide_stage(id, &p).await },
                )
                .await
            },
            move |_| reload(),
        );
    };

    let open_create = move || {
        let parent = stage_id.get_untracked();
        form.update(|f| {
            f.open_create();
            f.values.guide_stage_id = parent;
        });
    };

    let (title, set_title) = bind(form, |f| f.title.clone(), |f, v| f.title = v);
    let (description, set_description) =
        bind(form, |f| f.description.clone(), |f, v| f.description = v);
    let (start, set_start) = bind(form, |f| f.start_day_offset.clone(), |f, v| f.start_day_offset = v);
    let (end, set_end) = bind(form, |f| f.end_day_offset.clone(), |f, v| f.end_day_offset = v);
    let parent_error = error_of(form, "guide_stage_id");

    let row = move |sub: SubGuideStage| {
        let id = sub.id;
        let editing = sub.clone();
        view! {
            <tr>
                <td class="font-medium">{sub.title.clone()}</td>
                <td>{day_range(sub.start_day_offset, sub.end_day_offset)}</td>
                <td class="max-w-xs truncate">{or_dash(sub.description.clone())}</td>
                <td>{sub.blogs.len()}</td>
                <td class="text-right whitespace-nowrap">
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
        <Show when=move || stage_id.get().is_some()>
            <div class="card bg-base-100 shadow-sm">
                <div class="card-body">
                    <div class="flex items-center justify-between">
                        <h3 class="card-title text-base">
                            {move || stage.with(|s| s.as_ref().map(|s| format!("Sub-stages of \"{}\"", s.stage_title)))}
                        </h3>
                        <button class="btn btn-sm btn-primary" on:click=move |_| open_create()>
                            <Plus />
                            "New sub-stage"
                        </button>
                    </div>
                    <table class="table table-zebra table-sm">
                        <thead>
                            <tr>
                                <th>"Title"</th>
                                <th>"Days"</th>
                                <th>"Description"</th>
                                <th>"Posts"</th>
                                <th class="text-right">"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || loading.get()>
                                <tr>
                                    <td colspan=5 class="text-center py-4">
                                        <span class="loading loading-spinner loading-sm"></span>
                                    </td>
                                </tr>
                            </Show>
                            <Show when=move || !loading.get() && items.with(Vec::is_empty)>
                                <tr>
                                    <td colspan=5 class="text-center py-4 opacity-60">"No sub-stages"</td>
                                </tr>
                            </Show>
                            {move || items.get().into_iter().map(row).collect_view()}
                        </tbody>
                    </table>
                </div>
            </div>
        </Show>

        <Modal
            open=modal_open(form)
            title=modal_title(form, "New sub-stage", "Edit sub-stage")
            on_close=move |_| close_modal(form)
        >
            <form class="space-y-2" on:submit=on_submit>
                <TextInput label="Title" value=title on_input=set_title error=error_of(form, "title") required=true />
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
                <Show when=move || parent_error.get().is_some()>
                    <p class="text-error text-sm">"Select a stage first"</p>
                </Show>
                <FormActions submitting=modal_submitting(form) on_cancel=move |_| close_modal(form) />
            </form>
        </Modal>
    }
}
