//! 批量导入弹窗
//!
//! 文件可拖入或点击选择；选择后只做本地校验并读取内容，点击上传才发请求。

use leptos::prelude::*;
use leptos::task::spawn_local;
use plantdoc_admin::Notice;
use plantdoc_admin::import::{
    ACCEPT_ATTR, FileMeta, ImportDialog, ImportFile, ImportOutcome, ImportTemplate, run_import,
};
use plantdoc_shared::protocol::ImportTarget;
use web_sys::{FileList, HtmlInputElement};

use crate::auth::use_api;
use crate::components::icons::Upload;
use crate::components::modal::Modal;
use crate::components::notice::use_notices;
use crate::web::{read_import_file, selected_files};

fn template_href(template: &ImportTemplate) -> String {
    let csv = format!("{}\n", template.header_csv());
    format!(
        "data:text/csv;charset=utf-8,{}",
        String::from(js_sys::encode_uri_component(&csv))
    )
}

#[component]
pub fn ImportDialogView(
    target: ImportTarget,
    title: &'static str,
    dialog: RwSignal<ImportDialog>,
    #[prop(into)] on_success: Callback<()>,
) -> impl IntoView {
    let api = StoredValue::new(use_api());
    let notices = use_notices();
    let max_bytes = api.with_value(|a| a.config().import_max_bytes);
    let template = ImportTemplate::for_target(target);
    let required = template.required_columns();
    let optional = template.optional_columns();
    let template_link = template_href(&template);

    let file: RwSignal<Option<ImportFile>> = RwSignal::new(None);
    let dragging = RwSignal::new(false);

    let handle_files = move |list: Option<FileList>| {
        let files = selected_files(list);
        let metas: Vec<FileMeta> = files.iter().map(|(meta, _)| meta.clone()).collect();
        file.set(None);
        let Some(selection) = dialog.try_update(|d| d.select(&metas, max_bytes)).flatten() else {
            return;
        };
        if let Some((_, handle)) = files.into_iter().next() {
            spawn_local(async move {
                let read = read_import_file(&handle).await;
                // 读取期间又选了别的文件，丢弃这次结果
                let current = dialog
                    .try_with_untracked(|d| d.is_current(selection))
                    .unwrap_or(false);
                if !current {
                    return;
                }
                match read {
                    Ok(bytes) => {
                        file.try_set(Some(bytes));
                    }
                    Err(message) => {
                        log::warn!("{}", message);
                        notices.push(Notice::error(message));
                    }
                }
            });
        }
    };

    let on_upload = move |_| {
        let Some(upload) = file.get_untracked() else {
            return;
        };
        if !dialog.try_update(|d| d.begin_upload()).unwrap_or(false) {
            return;
        }
        let api = api.get_value();
        spawn_local(async move {
            let outcome = run_import(&api, target, &upload).await;
            match &outcome {
                ImportOutcome::Imported(_) => {}
                ImportOutcome::Partial(_) => {
                    if let Some(summary) = outcome.summary() {
                        notices.push(Notice::warning(summary));
                    }
                }
                ImportOutcome::Failed(notice) => notices.push(notice.clone()),
            }
            let fire = dialog.try_update(|d| d.finish(&outcome)).unwrap_or(false);
            if fire {
                if let Some(summary) = outcome.summary() {
                    notices.push(Notice::success(summary));
                }
                file.set(None);
                on_success.run(());
            }
        });
    };

    let close = move || {
        dialog.update(|d| {
            if !d.uploading {
                d.close();
            }
        })
    };

    let open = Signal::derive(move || dialog.with(|d| d.open));
    let uploading = move || dialog.with(|d| d.uploading);
    let can_upload = move || dialog.with(|d| d.can_submit()) && file.with(Option::is_some);
    let error_rows = move || dialog.with(|d| d.error_rows());

    view! {
        <Modal open=open title=title.to_string() on_close=move |_| close() wide=true>
            <div class="space-y-4">
                <div class="text-sm space-y-1">
                    <p>
                        <span class="font-semibold">"Required columns: "</span>
                        {required.join(", ")}
                    </p>
                    <Show when=move || !optional.is_empty()>
                        <p>
                            <span class="font-semibold">"Optional columns: "</span>
                            {optional.join(", ")}
                        </p>
                    </Show>
                    <a class="link link-primary" href=template_link download=template.file_name>
                        "Download template"
                    </a>
                </div>

                <label
                    class="flex flex-col items-center justify-center gap-2 border-2 border-dashed rounded-box p-8 cursor-pointer"
                    class:border-primary=move || dragging.get()
                    on:dragover=move |ev: web_sys::DragEvent| {
                        ev.prevent_default();
                        dragging.set(true);
                    }
                    on:dragleave=move |_| dragging.set(false)
                    on:drop=move |ev: web_sys::DragEvent| {
                        ev.prevent_default();
                        dragging.set(false);
                        handle_files(ev.data_transfer().and_then(|dt| dt.files()));
                    }
                >
                    <Upload />
                    <span>"Drop a .csv, .xlsx or .xls file here, or click to choose"</span>
                    <input
                        type="file"
                        class="hidden"
                        accept=ACCEPT_ATTR
                        on:change=move |ev| {
                            let input: HtmlInputElement = event_target(&ev);
                            handle_files(input.files());
                            input.set_value("");
                        }
                    />
                </label>

                {move || {
                    dialog
                        .with(|d| d.selected.clone())
                        .map(|meta| {
                            view! {
                                <p class="text-sm">
                                    "Selected: " <span class="font-mono">{meta.name}</span>
                                    {format!(" ({} bytes)", meta.size)}
                                </p>
                            }
                        })
                }}
                {move || {
                    dialog
                        .with(|d| d.selection_error.clone())
                        .map(|e| view! { <div class="alert alert-warning text-sm">{e.to_string()}</div> })
                }}

                <Show when=move || !error_rows().is_empty()>
                    <div class="overflow-x-auto max-h-64">
                        <table class="table table-zebra table-sm">
                            <thead>
                                <tr>
                                    <th>"Row"</th>
                                    <th>"Error"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For each=error_rows key=|(row, message)| (*row, message.clone()) let:item>
                                    <tr>
                                        <td>{item.0}</td>
                                        <td>{item.1}</td>
                                    </tr>
                                </For>
                            </tbody>
                        </table>
                    </div>
                </Show>
            </div>

            <div class="modal-action">
                <button type="button" class="btn" disabled=uploading on:click=move |_| close()>
                    "Close"
                </button>
                <button type="button" class="btn btn-primary" disabled=move || !can_upload() on:click=on_upload>
                    <Show when=uploading>
                        <span class="loading loading-spinner loading-sm"></span>
                    </Show>
                    "Upload"
                </button>
            </div>
        </Modal>
    }
}
