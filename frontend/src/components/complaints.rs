use leptos::prelude::*;
use leptos::task::spawn_local;
use plantdoc_admin::Notice;
use plantdoc_admin::list::{DeleteFlow, ListPage};
use plantdoc_shared::protocol::ListComplaints;
use plantdoc_shared::{Complaint, ComplaintStatus, TargetType};

use crate::auth::use_api;
use crate::components::icons::{Eye, Pencil};
use crate::components::modal::Modal;
use crate::components::notice::use_notices;
use crate::components::table::{
    DeleteConfirm, DetailDrawer, Pagination, TableStatus, detail_item, load_table, or_dash,
    run_delete,
};

const TARGET_TYPES: [TargetType; 3] = [TargetType::Post, TargetType::Comment, TargetType::Scan];

fn parse_target(value: &str) -> Option<TargetType> {
    TARGET_TYPES.into_iter().find(|t| t.as_str() == value)
}

pub(crate) fn status_badge(status: ComplaintStatus) -> &'static str {
    match status {
        ComplaintStatus::Pending => "badge badge-warning",
        ComplaintStatus::Reviewed => "badge badge-info",
        ComplaintStatus::Resolved => "badge badge-success",
        ComplaintStatus::Rejected => "badge badge-ghost",
    }
}

/// 状态修改弹窗的编辑状态
#[derive(Debug, Clone, Default)]
struct StatusEdit {
    complaint: Option<Complaint>,
    next: Option<ComplaintStatus>,
    note: String,
    saving: bool,
}

impl StatusEdit {
    fn open(&mut self, complaint: &Complaint) {
        *self = Self {
            next: complaint.status.next_states().first().copied(),
            note: complaint.admin_note.clone().unwrap_or_default(),
            complaint: Some(complaint.clone()),
            saving: false,
        };
    }

    fn begin(&mut self) -> Option<(Complaint, ComplaintStatus, String)> {
        if self.saving {
            return None;
        }
        let complaint = self.complaint.clone()?;
        let next = self.next?;
        self.saving = true;
        Some((complaint, next, self.note.clone()))
    }
}

#[component]
pub fn ComplaintsPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let notices = use_notices();
    let page_size = api.with_value(|a| a.config().default_page_size);

    let table = RwSignal::new(ListPage::<Complaint, ListComplaints>::new(page_size));
    let flow = RwSignal::new(DeleteFlow::default());
    let edit = RwSignal::new(StatusEdit::default());

    let status_filter = RwSignal::new(String::new());
    let target_filter = RwSignal::new(String::new());

    let reload = move || {
        let api = api.get_value();
        load_table(table, notices, move |query| async move {
            api.list_complaints(&query).await
        });
    };
    Effect::new(move |_| reload());

    let apply_filters = move || {
        table.update(|t| {
            t.set_filters(ListComplaints {
                status: ComplaintStatus::parse(&status_filter.get_untracked()),
                target_type: parse_target(&target_filter.get_untracked()),
                ..Default::default()
            })
        });
        reload();
    };
    let reset_filters = move || {
        status_filter.set(String::new());
        target_filter.set(String::new());
        table.update(|t| t.set_filters(ListComplaints::default()));
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

    let close_edit = move || {
        edit.update(|e| {
            if !e.saving {
                *e = StatusEdit::default();
            }
        })
    };

    let on_save_status = move |_| {
        let Some((complaint, next, note)) = edit.try_update(|e| e.begin()).flatten() else {
            return;
        };
        let api = api.get_value();
        spawn_local(async move {
            match api.update_complaint_status(&complaint, next, Some(note)).await {
                Ok(_) => {
                    notices.push(Notice::success(format!("Complaint marked {}.", next.as_str())));
                    edit.try_set(StatusEdit::default());
                    reload();
                }
                Err(e) => {
                    notices.push(e.notice());
                    edit.try_update(|e| e.saving = false);
                }
            }
        });
    };

    let row = move |complaint: Complaint| {
        let id = complaint.id;
        let status = complaint.status;
        let selected = complaint.clone();
        let editing = complaint.clone();
        view! {
            <tr>
                <td>{id}</td>
                <td>
                    <span class="badge badge-outline">{complaint.target_type.as_str()}</span>
                </td>
                <td>{or_dash(complaint.target_id)}</td>
                <td>{or_dash(complaint.category.clone())}</td>
                <td class="max-w-xs truncate">{or_dash(complaint.description.clone())}</td>
                <td>
                    <span class=status_badge(status)>{status.as_str()}</span>
                </td>
                <td>{or_dash(complaint.created_at.map(|d| d.format("%Y-%m-%d %H:%M")))}</td>
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
                        title="Change status"
                        disabled=status.is_terminal()
                        on:click=move |_| edit.update(|e| e.open(&editing))
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
                        prop:value=move || status_filter.get()
                        on:change=move |ev| {
                            status_filter.set(event_target_value(&ev));
                            apply_filters();
                        }
                    >
                        <option value="">"All statuses"</option>
                        {ComplaintStatus::ALL
                            .into_iter()
                            .map(|s| view! { <option value=s.as_str()>{s.as_str()}</option> })
                            .collect_view()}
                    </select>
                    <select
                        class="select select-bordered select-sm"
                        prop:value=move || target_filter.get()
                        on:change=move |ev| {
                            target_filter.set(event_target_value(&ev));
                            apply_filters();
                        }
                    >
                        <option value="">"All targets"</option>
                        {TARGET_TYPES
                            .into_iter()
                            .map(|t| view! { <option value=t.as_str()>{t.as_str()}</option> })
                            .collect_view()}
                    </select>
                    <button class="btn btn-sm" on:click=move |_| reset_filters()>
                        "Reset"
                    </button>
                </div>

                <div class="overflow-x-auto">
                    <table class="table table-zebra">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Target"</th>
                                <th>"Target ID"</th>
                                <th>"Category"</th>
                                <th>"Description"</th>
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
            title="Complaint detail"
            on_close=move |_| table.update(|t| t.clear_selection())
        >
            {move || {
                table
                    .with(|t| t.current_row.clone())
                    .map(|c| {
                        view! {
                            {detail_item("ID", c.id.to_string())}
                            {detail_item("Target", format!("{} {}", c.target_type.as_str(), or_dash(c.target_id)))}
                            {detail_item("Status", c.status.as_str())}
                            {detail_item("Category", c.category.unwrap_or_default())}
                            {detail_item("Description", c.description.unwrap_or_default())}
                            {detail_item("Reporter", or_dash(c.reporter_id))}
                            {detail_item("Admin note", c.admin_note.unwrap_or_default())}
                            {detail_item("Created", or_dash(c.created_at.map(|d| d.format("%Y-%m-%d %H:%M"))))}
                            {c
                                .image_url
                                .map(|src| view! { <img class="rounded-box max-h-64" src=src /> })}
                        }
                    })
            }}
        </DetailDrawer>

        <Modal
            open=Signal::derive(move || edit.with(|e| e.complaint.is_some()))
            title=Signal::derive(move || {
                edit.with(|e| {
                    e.complaint
                        .as_ref()
                        .map(|c| format!("Complaint #{} ({})", c.id, c.status.as_str()))
                        .unwrap_or_default()
                })
            })
            on_close=move |_| close_edit()
        >
            <div class="space-y-2">
                <label class="form-control w-full">
                    <div class="label">
                        <span class="label-text">"New status"</span>
                    </div>
                    <select
                        class="select select-bordered w-full"
                        on:change=move |ev| {
                            let next = ComplaintStatus::parse(&event_target_value(&ev));
                            edit.update(|e| e.next = next);
                        }
                    >
                        {move || {
                            let (choices, current) = edit.with(|e| {
                                (
                                    e.complaint.as_ref().map(|c| c.status.next_states()).unwrap_or(&[]),
                                    e.next,
                                )
                            });
                            choices
                                .iter()
                                .map(|s| {
                                    view! {
                                        <option value=s.as_str() selected=current == Some(*s)>
                                            {s.as_str()}
                                        </option>
                                    }
                                })
                                .collect_view()
                        }}
                    </select>
                </label>
                <label class="form-control w-full">
                    <div class="label">
                        <span class="label-text">"Admin note"</span>
                    </div>
                    <textarea
                        class="textarea textarea-bordered w-full"
                        rows=3
                        prop:value=move || edit.with(|e| e.note.clone())
                        on:input=move |ev| {
                            let note = event_target_value(&ev);
                            edit.update(|e| e.note = note);
                        }
                    ></textarea>
                </label>
            </div>
            <div class="modal-action">
                <button
                    type="button"
                    class="btn"
                    disabled=move || edit.with(|e| e.saving)
                    on:click=move |_| close_edit()
                >
                    "Cancel"
                </button>
                <button
                    type="button"
                    class="btn btn-primary"
                    disabled=move || edit.with(|e| e.saving || e.next.is_none())
                    on:click=on_save_status
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

    fn complaint(status: &str) -> Complaint {
        serde_json::from_value(json!({ "id": 3, "target_type": "COMMENT", "status": status })).unwrap()
    }

    #[test]
    fn status_edit_preselects_first_allowed_state() {
        let mut edit = StatusEdit::default();
        edit.open(&complaint("REVIEWED"));
        assert_eq!(edit.next, Some(ComplaintStatus::Resolved));

        edit.open(&complaint("REJECTED"));
        assert_eq!(edit.next, None);
        assert!(edit.begin().is_none());
    }

    #[test]
    fn status_edit_blocks_double_save() {
        let mut edit = StatusEdit::default();
        edit.open(&complaint("PENDING"));
        assert!(edit.begin().is_some());
        assert!(edit.begin().is_none());
    }

    #[test]
    fn target_filter_parses_wire_names() {
        assert_eq!(parse_target("SCAN"), Some(TargetType::Scan));
        assert_eq!(parse_target(""), None);
    }
}
