use leptos::prelude::*;
use plantdoc_admin::form::{ModalForm, PlantForm, submit};
use plantdoc_admin::list::{DeleteFlow, ListPage};
use plantdoc_shared::Plant;
use plantdoc_shared::protocol::ListPlants;

use crate::auth::use_api;
use crate::components::form_kit::{
    FormActions, TextArea, TextInput, bind, close_modal, error_of, modal_open, modal_submitting,
    modal_title, run_submit,
};
use crate::components::icons::{Eye, Pencil, Plus};
use crate::components::modal::Modal;
use crate::components::notice::use_notices;
use crate::components::table::{
    DeleteConfirm, DetailDrawer, Pagination, TableStatus, detail_item, load_table, or_dash,
    run_delete,
};

#[component]
pub fn PlantsPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let notices = use_notices();
    let page_size = api.with_value(|a| a.config().default_page_size);

    let table = RwSignal::new(ListPage::<Plant, ListPlants>::new(page_size));
    let flow = RwSignal::new(DeleteFlow::default());
    let form = RwSignal::new(ModalForm::<PlantForm>::default());
    let search = RwSignal::new(String::new());

    let reload = move || {
        let api = api.get_value();
        load_table(table, notices, move |query| async move {
            api.list_plants(&query).await
        });
    };
    Effect::new(move |_| reload());

    let apply_search = move || {
        table.update(|t| {
            t.set_filters(ListPlants {
                name: Some(search.get_untracked()),
                ..Default::default()
            })
        });
        reload();
    };
    let reset_search = move || {
        search.set(String::new());
        table.update(|t| t.set_filters(ListPlants::default()));
        reload();
    };

    let on_delete = move || {
        let api = api.get_value();
        run_delete(
            flow,
            notices,
            move |id| async move { api.delete_plant(id).await },
            reload,
        );
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let api = api.get_value();
        run_submit(
            form,
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
            move |_| reload(),
        );
    };

    let (name, set_name) = bind(form, |f| f.name.clone(), |f, v| f.name = v);
    let (description, set_description) =
        bind(form, |f| f.description.clone(), |f, v| f.description = v);
    let (image_url, set_image_url) = bind(form, |f| f.image_url.clone(), |f, v| f.image_url = v);

    let row = move |plant: Plant| {
        let id = plant.id;
        let selected = plant.clone();
        let editing = plant.clone();
        view! {
            <tr>
                <td>{id}</td>
                <td class="font-medium">{plant.name.clone()}</td>
                <td class="max-w-md truncate">{or_dash(plant.description.clone())}</td>
                <td>
                    {plant
                        .image_url
                        .clone()
                        .map(|src| {
                            view! { <img class="h-10 w-10 rounded object-cover" src=src /> }
                        })}
                </td>
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
                        prop:value=move || search.get()
                        on:input=move |ev| search.set(event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" {
                                apply_search();
                            }
                        }
                    />
                    <button class="btn btn-sm btn-primary" on:click=move |_| apply_search()>
                        "Search"
                    </button>
                    <button class="btn btn-sm" on:click=move |_| reset_search()>
                        "Reset"
                    </button>
                    <div class="flex-1"></div>
                    <button class="btn btn-sm btn-primary" on:click=move |_| form.update(|f| f.open_create())>
                        <Plus />
                        "New plant"
                    </button>
                </div>

                <div class="overflow-x-auto">
                    <table class="table table-zebra">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Name"</th>
                                <th>"Description"</th>
                                <th>"Image"</th>
                                <th class="text-right">"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <TableStatus
                                state=Signal::derive(move || table.with(|t| t.state.clone()))
                                empty=Signal::derive(move || table.with(|t| t.rows.is_empty()))
                                colspan=5
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
            title="Plant detail"
            on_close=move |_| table.update(|t| t.clear_selection())
        >
            {move || {
                table
                    .with(|t| t.current_row.clone())
                    .map(|p| {
                        view! {
                            {detail_item("ID", p.id.to_string())}
                            {detail_item("Name", p.name)}
                            {detail_item("Description", p.description.unwrap_or_default())}
                            {detail_item("Image URL", p.image_url.unwrap_or_default())}
                            {detail_item("Created", or_dash(p.created_at.map(|d| d.format("%Y-%m-%d %H:%M"))))}
                        }
                    })
            }}
        </DetailDrawer>

        <Modal
            open=modal_open(form)
            title=modal_title(form, "New plant", "Edit plant")
            on_close=move |_| close_modal(form)
        >
            <form class="space-y-2" on:submit=on_submit>
                <TextInput label="Name" value=name on_input=set_name error=error_of(form, "name") required=true />
                <TextArea
                    label="Description"
                    value=description
                    on_input=set_description
                    error=error_of(form, "description")
                />
                <TextInput
                    label="Image URL"
                    value=image_url
                    on_input=set_image_url
                    error=error_of(form, "image_url")
                    placeholder="https://"
                />
                <FormActions submitting=modal_submitting(form) on_cancel=move |_| close_modal(form) />
            </form>
        </Modal>
    }
}
