use leptos::prelude::*;
use plantdoc_admin::form::{ActivityKeywordForm, ModalForm, submit};
use plantdoc_admin::import::ImportDialog;
use plantdoc_admin::list::{DeleteFlow, ListPage};
use plantdoc_shared::protocol::{ImportTarget, ListActivityKeywords};
use plantdoc_shared::{ActivityKeyword, ActivityType};

use crate::auth::use_api;
use crate::components::form_kit::{
    FormActions, SelectInput, TextArea, TextInput, bind, close_modal, error_of, fixed_options,
    modal_open, modal_submitting, modal_title, run_submit,
};
use crate::components::icons::{Eye, Pencil, Plus, Upload};
use crate::components::import_dialog::ImportDialogView;
use crate::components::modal::Modal;
use crate::components::notice::use_notices;
use crate::components::table::{
    DeleteConfirm, DetailDrawer, Pagination, TableStatus, detail_item, load_table, or_dash,
    run_delete,
};

fn type_badge(keyword_type: ActivityType) -> &'static str {
    match keyword_type {
        ActivityType::Treatment => "badge badge-error",
        ActivityType::Prevention => "badge badge-warning",
        ActivityType::Care => "badge badge-success",
        ActivityType::Harvest => "badge badge-info",
    }
}

#[component]
pub fn ActivityKeywordsPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let notices = use_notices();
    let page_size = api.with_value(|a| a.config().default_page_size);

    let table = RwSignal::new(ListPage::<ActivityKeyword, ListActivityKeywords>::new(page_size));
    let flow = RwSignal::new(DeleteFlow::default());
    let form = RwSignal::new(ModalForm::<ActivityKeywordForm>::default());
    let import = RwSignal::new(ImportDialog::default());

    let name_filter = RwSignal::new(String::new());
    let type_filter = RwSignal::new(String::new());

    let reload = move || {
        let api = api.get_value();
        load_table(table, notices, move |query| async move {
            api.list_activity_keywords(&query).await
        });
    };
    Effect::new(move |_| reload());

    let apply_filters = move || {
        let name = name_filter.get_untracked();
        table.update(|t| {
            t.set_filters(ListActivityKeywords {
                name: (!name.trim().is_empty()).then(|| name.trim().to_string()),
                keyword_type: ActivityType::parse(&type_filter.get_untracked()),
                ..Default::default()
            })
        });
        reload();
    };
    let reset_filters = move || {
        name_filter.set(String::new());
        type_filter.set(String::new());
        table.update(|t| t.set_filters(ListActivityKeywords::default()));
        reload();
    };

    let on_delete = move || {
        let api = api.get_value();
        run_delete(
            flow,
            notices,
            move |id| async move { api.delete_activity_keyword(id).await },
            reload,
        );
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let api = api.get_value();
        run_submit(
            form,
            notices,
            "Activity keyword saved.",
            move |mode, values| async move {
                let api = &api;
                submit(
                    &values,
                    mode,
                    |p| async move { api.create_activity_keyword(&p).await },
                    |id, p| async move { api.update_activity_keyword(id, &p).await },
                )
                .await
            },
            move |_| reload(),
        );
    };

    let type_options = fixed_options(ActivityType::ALL.iter().map(ActivityType::as_str));

    let (name, set_name) = bind(form, |f| f.name.clone(), |f, v| f.name = v);
    let (keyword_type, set_keyword_type) = bind(
        form,
        |f| f.keyword_type.as_str().to_string(),
        |f, v| {
            if let Some(t) = ActivityType::parse(&v) {
                f.keyword_type = t;
            }
        },
    );
    let (description, set_description) =
        bind(form, |f| f.description.clone(), |f, v| f.description = v);
    let (base_days_offset, set_base_days_offset) =
        bind(form, |f| f.base_days_offset.clone(), |f, v| f.base_days_offset = v);
    let (hour_time, set_hour_time) = bind(form, |f| f.hour_time.clone(), |f, v| f.hour_time = v);
    let (time_duration, set_time_duration) =
        bind(form, |f| f.time_duration.clone(), |f, v| f.time_duration = v);
    let (frequency_days, set_frequency_days) =
        bind(form, |f| f.frequency_days.clone(), |f, v| f.frequency_days = v);

    let row = move |keyword: ActivityKeyword| {
        let id = keyword.id;
        let selected = keyword.clone();
        let editing = keyword.clone();
        view! {
            <tr>
                <td>{id}</td>
                <td class="font-medium">{keyword.name.clone()}</td>
                <td>
                    <span class=type_badge(keyword.keyword_type)>{keyword.keyword_type.as_str()}</span>
                </td>
                <td>{or_dash(keyword.base_days_offset)}</td>
                <td>{or_dash(keyword.hour_time.clone())}</td>
                <td>{or_dash(keyword.time_duration)}</td>
                <td>{or_dash(keyword.frequency_days)}</td>
                <td class="text-right whitespace-nowrap">
                    <button
                        class="btn btn-ghost btn-xs"
                        title="View"
                        on:click=move |_| table.update(|t| t.select(&selected))
                    >
                        <Eye />
                    </button>
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
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body">
                <div class="flex flex-wrap items-end gap-2 mb-4">
                    <input
                        class="input input-bordered input-sm w-64"
                        placeholder="Search by name"
                        prop:value=move || name_filter.get()
                        on:input=move |ev| name_filter.set(event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" {
                                apply_filters();
                            }
                        }
                    />
                    <select
                        class="select select-bordered select-sm"
                        prop:value=move || type_filter.get()
                        on:change=move |ev| {
                            type_filter.set(event_target_value(&ev));
                            apply_filters();
                        }
                    >
                        <option value="">"All types"</option>
                        {ActivityType::ALL
                            .into_iter()
                            .map(|t| view! { <option value=t.as_str()>{t.as_str()}</option> })
                            .collect_view()}
                    </select>
                    <button class="btn btn-sm btn-primary" on:click=move |_| apply_filters()>
                        "Search"
                    </button>
                    <button class="btn btn-sm" on:click=move |_| reset_filters()>
                        "Reset"
                    </button>
                    <div class="flex-1"></div>
                    <button class="btn btn-sm" on:click=move |_| import.update(ImportDialog::open)>
                        <Upload />
                        "Import"
                    </button>
                    <button class="btn btn-sm btn-primary" on:click=move |_| form.update(|f| f.open_create())>
                        <Plus />
                        "New keyword"
                    </button>
                </div>

                <div class="overflow-x-auto">
                    <table class="table table-zebra">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Name"</th>
                                <th>"Type"</th>
                                <th>"Base offset (days)"</th>
                                <th>"Hour"</th>
                                <th>"Duration (min)"</th>
                                <th>"Frequency (days)"</th>
                                <th class="text-right">"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <TableStatus
                                state=Signal::derive(move || table.with(|t| t.state.clone()))
                                empty=Signal::derive(move || table.with(|t| t.rows.is_empty()))
                                colspan=8
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
            title="Activity keyword"
            on_close=move |_| table.update(|t| t.clear_selection())
        >
            {move || {
                table
                    .with(|t| t.current_row.clone())
                    .map(|k| {
                        view! {
                            {detail_item("ID", k.id.to_string())}
                            {detail_item("Name", k.name)}
                            {detail_item("Type", k.keyword_type.as_str())}
                            {detail_item("Description", k.description.unwrap_or_default())}
                            {detail_item("Base offset (days)", or_dash(k.base_days_offset))}
                            {detail_item("Hour", k.hour_time.unwrap_or_default())}
                            {detail_item("Duration (min)", or_dash(k.time_duration))}
                            {detail_item("Frequency (days)", or_dash(k.frequency_days))}
                        }
                    })
            }}
        </DetailDrawer>

        <Modal
            open=modal_open(form)
            title=modal_title(form, "New activity keyword", "Edit activity keyword")
            on_close=move |_| close_modal(form)
            wide=true
        >
            <form class="grid grid-cols-1 md:grid-cols-2 gap-x-4 gap-y-2" on:submit=on_submit>
                <TextInput label="Name" value=name on_input=set_name error=error_of(form, "name") required=true />
                <SelectInput
                    label="Type"
                    options=type_options
                    value=keyword_type
                    on_change=set_keyword_type
                    required=true
                />
                <div class="md:col-span-2">
                    <TextArea
                        label="Description"
                        value=description
                        on_input=set_description
                        error=error_of(form, "description")
                    />
                </div>
                <TextInput
                    label="Base offset (days)"
                    value=base_days_offset
                    on_input=set_base_days_offset
                    error=error_of(form, "base_days_offset")
                    input_type="number"
                />
                <TextInput
                    label="Hour (HH:MM)"
                    value=hour_time
                    on_input=set_hour_time
                    error=error_of(form, "hour_time")
                    placeholder="07:30"
                />
                <TextInput
                    label="Duration (minutes)"
                    value=time_duration
                    on_input=set_time_duration
                    error=error_of(form, "time_duration")
                    input_type="number"
                />
                <TextInput
                    label="Frequency (days)"
                    value=frequency_days
                    on_input=set_frequency_days
                    error=error_of(form, "frequency_days")
                    input_type="number"
                />
                <div class="md:col-span-2">
                    <FormActions submitting=modal_submitting(form) on_cancel=move |_| close_modal(form) />
                </div>
            </form>
        </Modal>

        <ImportDialogView
            target=ImportTarget::ActivityKeywords
            title="Import activity keywords"
            dialog=import
            on_success=move |_| reload()
        />
    }
}
