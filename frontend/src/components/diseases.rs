mod form_state;
mod keyword_links;

use leptos::prelude::*;
use plantdoc_admin::form::submit;
use plantdoc_admin::import::ImportDialog;
use plantdoc_admin::list::{DeleteFlow, ListPage};
use plantdoc_shared::Disease;
use plantdoc_shared::protocol::{ImportTarget, ListDiseases};

use crate::auth::use_api;
use crate::components::form_kit::{
    FormActions, SelectInput, TextArea, TextInput, bind, close_modal, error_of, modal_open,
    modal_submitting, modal_title, run_submit,
};
use crate::components::icons::{Eye, Leaf, Pencil, Plus, Upload};
use crate::components::import_dialog::ImportDialogView;
use crate::components::modal::Modal;
use crate::components::notice::use_notices;
use crate::components::table::{
    DeleteConfirm, DetailDrawer, Pagination, TableStatus, detail_item, load_table, or_dash,
    run_delete,
};

use form_state::DiseaseFormState;
use keyword_links::KeywordLinksDialog;

fn blank_to_none(value: String) -> Option<String> {
    let v = value.trim();
    (!v.is_empty()).then(|| v.to_string())
}

#[component]
pub fn DiseasesPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let notices = use_notices();
    let page_size = api.with_value(|a| a.config().default_page_size);

    let table = RwSignal::new(ListPage::<Disease, ListDiseases>::new(page_size));
    let flow = RwSignal::new(DeleteFlow::default());
    let state = DiseaseFormState::new();
    let form = state.form;
    let plant_form = state.plant_form;
    let import = RwSignal::new(ImportDialog::default());
    let keywords_for: RwSignal<Option<String>> = RwSignal::new(None);

    let name_filter = RwSignal::new(String::new());
    let plant_filter = RwSignal::new(String::new());
    let type_filter = RwSignal::new(String::new());

    state.watch_options(api, notices);

    let reload = move || {
        let api = api.get_value();
        load_table(table, notices, move |query| async move {
            api.list_diseases(&query).await
        });
    };
    Effect::new(move |_| reload());

    let apply_filters = move || {
        table.update(|t| {
            t.set_filters(ListDiseases {
                name: blank_to_none(name_filter.get_untracked()),
                plant_name: blank_to_none(plant_filter.get_untracked()),
                disease_type: blank_to_none(type_filter.get_untracked()),
                ..Default::default()
            })
        });
        reload();
    };
    let reset_filters = move || {
        name_filter.set(String::new());
        plant_filter.set(String::new());
        type_filter.set(String::new());
        table.update(|t| t.set_filters(ListDiseases::default()));
        reload();
    };

    let on_delete = move || {
        let api = api.get_value();
        run_delete(
            flow,
            notices,
            move |id| async move { api.delete_disease(id).await },
            reload,
        );
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let api = api.get_value();
        run_submit(
            form,
            notices,
            "Disease saved.",
            move |mode, values| async move {
                let api = &api;
                submit(
                    &values,
                    mode,
                    |p| async move { api.create_disease(&p).await },
                    |id, p| async move { api.update_disease(id, &p).await },
                )
                .await
            },
            move |_| reload(),
        );
    };

    // 嵌套弹窗只会新建植物
    let on_plant_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let api = api.get_value();
        run_submit(
            plant_form,
            notices,
            "Plant saved.",
            move |mode, values| async move {
                let api = &api;
                submit(
                    &values,
                    mode,
                    |p| async move { api.create_plant(&p).await },
                    |id, p| async move { api.update_plant(id, &p).await },
                )
                .await
            },
            move |plant| state.plant_created(plant),
        );
    };

    let (name, set_name) = bind(form, |f| f.name.clone(), |f, v| f.name = v);
    let (class_name, set_class_name) = bind(form, |f| f.class_name.clone(), |f, v| f.class_name = v);
    let (disease_type, set_disease_type) =
        bind(form, |f| f.disease_type.clone(), |f, v| f.disease_type = v);
    let (plant_name, set_plant_name) = bind(form, |f| f.plant_name.clone(), |f, v| f.plant_name = v);
    let (description, set_description) =
        bind(form, |f| f.description.clone(), |f, v| f.description = v);
    let (symptoms, set_symptoms) = bind(form, |f| f.symptoms.clone(), |f, v| f.symptoms = v);
    let (treatment, set_treatment) = bind(form, |f| f.treatment.clone(), |f, v| f.treatment = v);
    let (image_links, set_image_links) =
        bind(form, |f| f.image_links.clone(), |f, v| f.image_links = v);

    let (new_plant_name, set_new_plant_name) = bind(plant_form, |f| f.name.clone(), |f, v| f.name = v);
    let (new_plant_description, set_new_plant_description) =
        bind(plant_form, |f| f.description.clone(), |f, v| f.description = v);

    let row = move |disease: Disease| {
        let id = disease.id;
        let selected = disease.clone();
        let editing = disease.clone();
        let class = disease.class_name.clone();
        view! {
            <tr>
                <td>{id}</td>
                <td class="font-medium">{disease.name.clone()}</td>
                <td class="font-mono text-xs">{disease.class_name.clone()}</td>
                <td>
                    <span class="badge badge-outline">{disease.disease_type.clone()}</span>
                </td>
                <td>{or_dash(disease.plant_name.clone())}</td>
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
                        title="Activity keywords"
                        on:click=move |_| keywords_for.set(Some(class.clone()))
                    >
                        <Leaf />
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

    let filter_input = move |placeholder: &'static str, signal: RwSignal<String>| {
        view! {
            <input
                class="input input-bordered input-sm w-48"
                placeholder=placeholder
                prop:value=move || signal.get()
                on:input=move |ev| signal.set(event_target_value(&ev))
                on:keydown=move |ev| {
                    if ev.key() == "Enter" {
                        apply_filters();
                    }
                }
            />
        }
    };

    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body">
                <div class="flex flex-wrap items-end gap-2 mb-4">
                    {filter_input("Name", name_filter)}
                    {filter_input("Plant", plant_filter)}
                    {filter_input("Type", type_filter)}
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
                        "New disease"
                    </button>
                </div>

                <div class="overflow-x-auto">
                    <table class="table table-zebra">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Name"</th>
                                <th>"Class"</th>
                                <th>"Type"</th>
                                <th>"Plant"</th>
                                <th class="text-right">"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <TableStatus
                                state=Signal::derive(move || table.with(|t| t.state.clone()))
                                empty=Signal::derive(move || table.with(|t| t.rows.is_empty()))
                                colspan=6
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
            title="Disease detail"
            on_close=move |_| table.update(|t| t.clear_selection())
        >
            {move || {
                table
                    .with(|t| t.current_row.clone())
                    .map(|d| {
                        let images = d
                            .image_link
                            .iter()
                            .map(|src| {
                                view! { <img class="h-20 w-20 rounded object-cover" src=src.clone() /> }
                            })
                            .collect_view();
                        view! {
                            {detail_item("ID", d.id.to_string())}
                            {detail_item("Name", d.name)}
                            {detail_item("Class name", d.class_name)}
                            {detail_item("Type", d.disease_type)}
                            {detail_item("Plant", d.plant_name.unwrap_or_default())}
                            {detail_item("Description", d.description.unwrap_or_default())}
                            {detail_item("Symptoms", d.symptoms.unwrap_or_default())}
                            {detail_item("Treatment", d.treatment.unwrap_or_default())}
                            <div class="flex flex-wrap gap-2">{images}</div>
                        }
                    })
            }}
        </DetailDrawer>

        <Modal
            open=modal_open(form)
            title=modal_title(form, "New disease", "Edit disease")
            on_close=move |_| close_modal(form)
            wide=true
        >
            <form class="grid grid-cols-1 md:grid-cols-2 gap-x-4 gap-y-2" on:submit=on_submit>
                <TextInput label="Name" value=name on_input=set_name error=error_of(form, "name") required=true />
                <TextInput
                    label="Class name"
                    value=class_name
                    on_input=set_class_name
                    error=error_of(form, "class_name")
                    required=true
                    placeholder="model output label"
                />
                <TextInput
                    label="Type"
                    value=disease_type
                    on_input=set_disease_type
                    error=error_of(form, "type")
                    required=true
                />
                <div class="flex items-end gap-2">
                    <div class="flex-1">
                        <SelectInput
                            label="Plant"
                            options=state.plant_options()
                            value=plant_name
                            on_change=set_plant_name
                            placeholder="No plant"
                        />
                    </div>
                    <button
                        type="button"
                        class="btn btn-sm mb-1"
                        title="Add plant"
                        on:click=move |_| plant_form.update(|f| f.open_create())
                    >
                        <Plus />
                    </button>
                </div>
                <div class="md:col-span-2">
                    <TextArea
                        label="Description"
                        value=description
                        on_input=set_description
                        error=error_of(form, "description")
                    />
                </div>
                <TextArea label="Symptoms" value=symptoms on_input=set_symptoms error=error_of(form, "symptoms") rows=4 />
                <TextArea
                    label="Treatment"
                    value=treatment
                    on_input=set_treatment
                    error=error_of(form, "treatment")
                    rows=4
                />
                <div class="md:col-span-2">
                    <TextArea
                        label="Image links (one per line)"
                        value=image_links
                        on_input=set_image_links
                        placeholder="https://"
                    />
                </div>
                <div class="md:col-span-2">
                    <FormActions submitting=modal_submitting(form) on_cancel=move |_| close_modal(form) />
                </div>
            </form>
        </Modal>

        <Modal
            open=modal_open(plant_form)
            title="Add plant"
            on_close=move |_| close_modal(plant_form)
        >
            <form class="space-y-2" on:submit=on_plant_submit>
                <TextInput
                    label="Name"
                    value=new_plant_name
                    on_input=set_new_plant_name
                    error=error_of(plant_form, "name")
                    required=true
                />
                <TextArea
                    label="Description"
                    value=new_plant_description
                    on_input=set_new_plant_description
                    error=error_of(plant_form, "description")
                />
                <FormActions submitting=modal_submitting(plant_form) on_cancel=move |_| close_modal(plant_form) />
            </form>
        </Modal>

        <ImportDialogView
            target=ImportTarget::Diseases
            title="Import diseases"
            dialog=import
            on_success=move |_| reload()
        />

        <KeywordLinksDialog class_name=keywords_for />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_dropped() {
        assert_eq!(blank_to_none("  ".into()), None);
        assert_eq!(blank_to_none(" Lúa ".into()), Some("Lúa".to_string()));
    }
}
