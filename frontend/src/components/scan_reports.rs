//! 扫描报告：target_type 为 SCAN 的投诉，管理员确认识别结果

use leptos::prelude::*;
use leptos::task::spawn_local;
use plantdoc_admin::Notice;
use plantdoc_admin::list::{DeleteFlow, ListPage};
use plantdoc_admin::services::OPTIONS_LIMIT;
use plantdoc_shared::protocol::{ListComplaints, ListDiseases, Paging};
use plantdoc_shared::{Complaint, Disease};

use crate::auth::use_api;
use crate::components::complaints::status_badge;
use crate::components::icons::{Eye, Pencil};
use crate::components::modal::Modal;
use crate::components::notice::use_notices;
use crate::components::table::{
    DeleteConfirm, DetailDrawer, Pagination, TableStatus, detail_item, load_table, or_dash,
    run_delete,
};

fn parse_verified(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
struct Verification {
    report: Option<Complaint>,
    is_verified: bool,
    disease_id: Option<i64>,
    saving: bool,
}

impl Verification {
    fn open(&mut self, report: &Complaint) {
        *self = Self {
            is_verified: report.is_verified.unwrap_or(true),
            disease_id: report.verified_disease_id,
            report: Some(report.clone()),
            saving: false,
        };
    }

    /// 确认为正确时才带上病害 id
    fn begin(&mut self) -> Option<(i64, bool, Option<i64>)> {
        if self.saving {
            return None;
        }
        let id = self.report.as_ref()?.id;
        self.saving = true;
        let disease = self.disease_id.filter(|_| self.is_verified);
        Some((id, self.is_verified, disease))
    }
}

#[component]
pub fn ScanReportsPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let notices = use_notices();
    let page_size = api.with_value(|a| a.config().default_page_size);

    let table = RwSignal::new(ListPage::<Complaint, ListComplaints>::new(page_size));
    let flow = RwSignal::new(DeleteFlow::default());
    let verify = RwSignal::new(Verification::default());
    let diseases: RwSignal<Vec<Disease>> = RwSignal::new(Vec::new());
    let verified_filter = RwSignal::new(String::new());

    let reload = move || {
        let api = api.get_value();
        load_table(table, notices, move |query| async move {
            api.list_scan_reports(query.paging, query.is_verified).await
        });
    };
    Effect::new(move |_| reload());

    // 弹窗打开时拉取病害选项
    let verify_open = Memo::new(move |_| verify.with(|v| v.report.is_some()));
    Effect::new(move |_| {
        if !verify_open.get() {
            return;
        }
        let api = api.get_value();
        spawn_local(async move {
            let query = ListDiseases {
                paging: Paging::new(1, OPTIONS_LIMIT),
                ..Default::default()
            };
            match api.list_diseases(&query).await {
                Ok(page) => {
                    diseases.try_set(page.items);
                }
                Err(e) => notices.push(e.notice()),
            }
        });
    });

    let on_filter = move |value: String| {
        verified_filter.set(value.clone());
        table.update(|t| {
            t.set_filters(ListComplaints {
                is_verified: parse_verified(&value),
                ..Default::default()
            })
        });
        reload();
    };

    let on_delete = move || {
        let api = api.get_value();
        run_delete(
            flow,
            notices,
            move |id| async move { api.delete_complaint(id).await },
            reload,
        );
    };

    let close_verify = move || {
        verify.update(|v| {
            if !v.saving {
                *v = Verification::default();
            }
        })
    };

    let on_save = move |_| {
        let Some((id, is_verified, disease_id)) = verify.try_update(|v| v.begin()).flatten() else {
            return;
        };
        let api = api.get_value();
        spawn_local(async move {
            match api.verify_scan_report(id, is_verified, disease_id).await {
                Ok(_) => {
                    notices.push(Notice::success("Scan report updated."));
                    verify.try_set(Verification::default());
                    reload();
                }
                Err(e) => {
                    notices.push(e.notice());
                    verify.try_update(|v| v.saving = false);
                }
            }
        });
    };

    let disease_name = move |id: Option<i64>| {
        id.map(|id| {
            diseases.with(|list| {
                list.iter()
                    .find(|d| d.id == id)
                    .map(|d| d.name.clone())
                    .unwrap_or_else(|| format!("#{}", id))
            })
        })
    };

    let row = move |report: Complaint| {
        let id = report.id;
        let selected = report.clone();
        let editing = report.clone();
        view! {
            <tr>
                <td>{id}</td>
                <td>
                    {report
                        .image_url
                        .clone()
                        .map(|src| view! { <img class="h-12 w-12 rounded object-cover" src=src /> })}
                </td>
                <td class="font-mono text-xs">{or_dash(report.predicted_class.clone())}</td>
                <td>
                    {match report.is_verified {
                        Some(true) => view! { <span class="badge badge-success">"Correct"</span> }.into_any(),
                        Some(false) => view! { <span class="badge badge-error">"Incorrect"</span> }.into_any(),
                        None => view! { <span class="badge badge-ghost">"Unverified"</span> }.into_any(),
                    }}
                </td>
                <td>{or_dash(report.verified_disease_id.map(|d| format!("#{}", d)))}</td>
                <td>
                    <span class=status_badge(report.status)>{report.status.as_str()}</span>
                </td>
                <td>{or_dash(report.created_at.map(|d| d.format("%Y-%m-%d %H:%M")))}</td>
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
                        title="Verify"
                        on:click=move |_| verify.update(|v| v.open(&editing))
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
                    <select
                        class="select select-bordered select-sm"
                        prop:value=move || verified_filter.get()
                        on:change=move |ev| on_filter(event_target_value(&ev))
                    >
                        <option value="">"All reports"</option>
                        <option value="true">"Verified"</option>
                        <option value="false">"Not verified"</option>
                    </select>
                </div>

                <div class="overflow-x-auto">
                    <table class="table table-zebra">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Image"</th>
                                <th>"Predicted"</th>
                                <th>"Verification"</th>
                                <th>"Disease"</th>
                                <th>"Status"</th>
                                <th>"Created"</th>
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
            title="Scan report"
            on_close=move |_| table.update(|t| t.clear_selection())
        >
            {move || {
                table
                    .with(|t| t.current_row.clone())
                    .map(|r| {
                        view! {
                            {r.image_url.map(|src| view! { <img class="rounded-box w-full" src=src /> })}
                            {detail_item("ID", r.id.to_string())}
                            {detail_item("Predicted class", r.predicted_class.unwrap_or_default())}
                            {detail_item(
                                "Verified",
                                r.is_verified.map(|v| if v { "Correct" } else { "Incorrect" }).unwrap_or("-"),
                            )}
                            {detail_item("Verified disease", or_dash(disease_name(r.verified_disease_id)))}
                            {detail_item("Reporter", or_dash(r.reporter_id))}
                            {detail_item("Description", r.description.unwrap_or_default())}
                            {detail_item("Admin note", r.admin_note.unwrap_or_default())}
                        }
                    })
            }}
        </DetailDrawer>

        <Modal
            open=Signal::derive(move || verify_open.get())
            title=Signal::derive(move || {
                verify.with(|v| v.report.as_ref().map(|r| format!("Verify scan #{}", r.id)).unwrap_or_default())
            })
            on_close=move |_| close_verify()
        >
            <div class="space-y-3">
                <p class="text-sm">
                    "Predicted: "
                    <span class="font-mono">
                        {move || verify.with(|v| or_dash(v.report.as_ref().and_then(|r| r.predicted_class.clone())))}
                    </span>
                </p>
                <label class="label cursor-pointer justify-start gap-3">
                    <input
                        type="checkbox"
                        class="toggle toggle-success"
                        prop:checked=move || verify.with(|v| v.is_verified)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            verify.update(|v| v.is_verified = checked);
                        }
                    />
                    <span class="label-text">"Prediction is correct"</span>
                </label>
                <Show when=move || verify.with(|v| v.is_verified)>
                    <label class="form-control w-full">
                        <div class="label">
                            <span class="label-text">"Verified disease"</span>
                        </div>
                        <select
                            class="select select-bordered w-full"
                            on:change=move |ev| {
                                let id = event_target_value(&ev).parse::<i64>().ok();
                                verify.update(|v| v.disease_id = id);
                            }
                        >
                            <option value="">"Not specified"</option>
                            {move || {
                                let current = verify.with(|v| v.disease_id);
                                diseases
                                    .get()
                                    .into_iter()
                                    .map(|d| {
                                        view! {
                                            <option value=d.id.to_string() selected=current == Some(d.id)>
                                                {format!("{} ({})", d.name, d.class_name)}
                                            </option>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </label>
                </Show>
            </div>
            <div class="modal-action">
                <button
                    type="button"
                    class="btn"
                    disabled=move || verify.with(|v| v.saving)
                    on:click=move |_| close_verify()
                >
                    "Cancel"
                </button>
                <button
                    type="button"
                    class="btn btn-primary"
                    disabled=move || verify.with(|v| v.saving)
                    on:click=on_save
                >
                    "Save"
                </button>
            </div>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report() -> Complaint {
        serde_json::from_value(json!({
            "id": 21,
            "target_type": "SCAN",
            "predicted_class": "leaf_blast",
            "verified_disease_id": 4
        }))
        .unwrap()
    }

    #[test]
    fn rejecting_prediction_drops_disease() {
        let mut v = Verification::default();
        v.open(&report());
        assert_eq!(v.begin(), Some((21, true, Some(4))));

        v.open(&report());
        v.is_verified = false;
        assert_eq!(v.begin(), Some((21, false, None)));
    }

    #[test]
    fn verified_filter_values() {
        assert_eq!(parse_verified("true"), Some(true));
        assert_eq!(parse_verified("false"), Some(false));
        assert_eq!(parse_verified(""), None);
    }
}
