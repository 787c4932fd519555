use leptos::prelude::*;
use leptos::task::spawn_local;
use plantdoc_admin::Notice;
use plantdoc_admin::form::{ModalForm, RegisterForm, submit};
use plantdoc_admin::list::ListPage;
use plantdoc_admin::services::active_flag;
use plantdoc_shared::protocol::ListAdminUsers;
use plantdoc_shared::{AdminUser, UserRole};

use crate::auth::{use_api, use_auth};
use crate::components::form_kit::{
    FormActions, SelectInput, TextInput, bind, close_modal, error_of, fixed_options, modal_open,
    modal_submitting, run_submit,
};
use crate::components::icons::Plus;
use crate::components::modal::Modal;
use crate::components::notice::use_notices;
use crate::components::table::{Pagination, TableStatus, load_table, or_dash};

/// 启用/停用确认
#[derive(Debug, Clone, Default)]
struct ActiveToggle {
    user: Option<AdminUser>,
    busy: bool,
}

impl ActiveToggle {
    /// 返回 (用户 id, 是否执行停用)
    fn begin(&mut self) -> Option<(i64, bool)> {
        if self.busy {
            return None;
        }
        let user = self.user.as_ref()?;
        self.busy = true;
        Some((user.id, active_flag(user)))
    }
}

#[component]
pub fn UsersPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let auth = use_auth();
    let notices = use_notices();
    let page_size = api.with_value(|a| a.config().default_page_size);

    let table = RwSignal::new(ListPage::<AdminUser, ListAdminUsers>::new(page_size));
    let toggle = RwSignal::new(ActiveToggle::default());
    let register = RwSignal::new(ModalForm::<RegisterForm>::default());
    let search = RwSignal::new(String::new());
    let role_filter = RwSignal::new(String::new());
    let self_id = move || auth.state.with(|s| s.user.as_ref().map(|u| u.id));

    let reload = move || {
        let api = api.get_value();
        load_table(table, notices, move |query| async move {
            api.list_admin_users(&query).await
        });
    };
    Effect::new(move |_| reload());

    let apply_filters = move || {
        let text = search.get_untracked();
        table.update(|t| {
            t.set_filters(ListAdminUsers {
                search: (!text.trim().is_empty()).then(|| text.trim().to_string()),
                role: UserRole::parse(&role_filter.get_untracked()),
                ..Default::default()
            })
        });
        reload();
    };
    let reset_filters = move || {
        search.set(String::new());
        role_filter.set(String::new());
        table.update(|t| t.set_filters(ListAdminUsers::default()));
        reload();
    };

    let close_toggle = move || {
        toggle.update(|t| {
            if !t.busy {
                *t = ActiveToggle::default();
            }
        })
    };

    let on_toggle = move |_| {
        let Some((id, disable)) = toggle.try_update(|t| t.begin()).flatten() else {
            return;
        };
        let api = api.get_value();
        spawn_local(async move {
            let result = if disable {
                api.disable_admin_user(id).await
            } else {
                api.enable_admin_user(id).await
            };
            match result {
                Ok(()) => {
                    let message = if disable { "User disabled." } else { "User enabled." };
                    notices.push(Notice::success(message));
                    toggle.try_set(ActiveToggle::default());
                    reload();
                }
                Err(e) => {
                    notices.push(e.notice());
                    toggle.try_update(|t| t.busy = false);
                }
            }
        });
    };

    let change_role = move |id: i64, value: String| {
        let Some(role) = UserRole::parse(&value) else {
            return;
        };
        let api = api.get_value();
        spawn_local(async move {
            match api.update_admin_role(id, role).await {
                Ok(_) => notices.push(Notice::success(format!("Role changed to {}.", role.as_str()))),
                Err(e) => notices.push(e.notice()),
            }
            reload();
        });
    };

    let on_register = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let api = api.get_value();
        run_submit(
            register,
            notices,
            "Account created.",
            move |mode, values| async move {
                let api = &api;
                submit(
                    &values,
                    mode,
                    |p| async move { api.register(&p).await },
                    |_, p| async move { api.register(&p).await },
                )
                .await
            },
            move |_| reload(),
        );
    };

    let role_options = fixed_options(UserRole::ALL.iter().map(UserRole::as_str));
    let (email, set_email) = bind(register, |f| f.email.clone(), |f, v| f.email = v);
    let (username, set_username) = bind(register, |f| f.username.clone(), |f, v| f.username = v);
    let (password, set_password) = bind(register, |f| f.password.clone(), |f, v| f.password = v);
    let (role, set_role) = bind(
        register,
        |f| f.role.as_str().to_string(),
        |f, v| {
            if let Some(r) = UserRole::parse(&v) {
                f.role = r;
            }
        },
    );

    let row = move |user: AdminUser| {
        let id = user.id;
        let active = active_flag(&user);
        let is_self = self_id() == Some(id);
        let target = user.clone();
        let current_role = user.role;
        view! {
            <tr>
                <td>{id}</td>
                <td class="font-medium">{user.username.clone()}</td>
                <td>{user.email.clone()}</td>
                <td>
                    <select
                        class="select select-bordered select-xs"
                        disabled=is_self
                        on:change=move |ev| change_role(id, event_target_value(&ev))
                    >
                        {UserRole::ALL
                            .into_iter()
                            .map(|r| {
                                view! {
                                    <option value=r.as_str() selected=r == current_role>
                                        {r.as_str()}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </td>
                <td>
                    {if active {
                        view! { <span class="badge badge-success">"Active"</span> }.into_any()
                    } else {
                        view! { <span class="badge badge-ghost">"Inactive"</span> }.into_any()
                    }}
                </td>
                <td>{or_dash(user.created_at.map(|d| d.format("%Y-%m-%d")))}</td>
                <td class="text-right">
                    <button
                        class="btn btn-xs"
                        class:btn-error=active
                        class:btn-success=!active
                        disabled=is_self
                        on:click=move |_| toggle.set(ActiveToggle { user: Some(target.clone()), busy: false })
                    >
                        {if active { "Disable" } else { "Enable" }}
                    </button>
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
                        placeholder="Search email or username"
                        prop:value=move || search.get()
                        on:input=move |ev| search.set(event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" {
                                apply_filters();
                            }
                        }
                    />
                    <select
                        class="select select-bordered select-sm"
                        prop:value=move || role_filter.get()
                        on:change=move |ev| {
                            role_filter.set(event_target_value(&ev));
                            apply_filters();
                        }
                    >
                        <option value="">"All roles"</option>
                        {UserRole::ALL
                            .into_iter()
                            .map(|r| view! { <option value=r.as_str()>{r.as_str()}</option> })
                            .collect_view()}
                    </select>
                    <button class="btn btn-sm btn-primary" on:click=move |_| apply_filters()>
                        "Search"
                    </button>
                    <button class="btn btn-sm" on:click=move |_| reset_filters()>
                        "Reset"
                    </button>
                    <div class="flex-1"></div>
                    <button class="btn btn-sm btn-primary" on:click=move |_| register.update(|f| f.open_create())>
                        <Plus />
                        "New account"
                    </button>
                </div>

                <div class="overflow-x-auto">
                    <table class="table table-zebra">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Username"</th>
                                <th>"Email"</th>
                                <th>"Role"</th>
                                <th>"Status"</th>
                                <th>"Joined"</th>
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

        <Modal
            open=Signal::derive(move || toggle.with(|t| t.user.is_some()))
            title="Confirm"
            on_close=move |_| close_toggle()
        >
            <p>
                {move || {
                    toggle
                        .with(|t| {
                            t.user.as_ref().map(|u| {
                                let verb = if active_flag(u) { "Disable" } else { "Enable" };
                                format!("{} account {} ({})?", verb, u.username, u.email)
                            })
                        })
                        .unwrap_or_default()
                }}
            </p>
            <div class="modal-action">
                <button class="btn" disabled=move || toggle.with(|t| t.busy) on:click=move |_| close_toggle()>
                    "Cancel"
                </button>
                <button class="btn btn-primary" disabled=move || toggle.with(|t| t.busy) on:click=on_toggle>
                    "Confirm"
                </button>
            </div>
        </Modal>

        <Modal open=modal_open(register) title="New account" on_close=move |_| close_modal(register)>
            <form class="space-y-2" on:submit=on_register>
                <TextInput
                    label="Email"
                    value=email
                    on_input=set_email
                    error=error_of(register, "email")
                    required=true
                    input_type="email"
                />
                <TextInput
                    label="Username"
                    value=username
                    on_input=set_username
                    error=error_of(register, "username")
                    required=true
                />
                <TextInput
                    label="Password"
                    value=password
                    on_input=set_password
                    error=error_of(register, "password")
                    required=true
                    input_type="password"
                />
                <SelectInput label="Role" options=role_options value=role on_change=set_role required=true />
                <FormActions submitting=modal_submitting(register) on_cancel=move |_| close_modal(register) />
            </form>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(body: serde_json::Value) -> AdminUser {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn toggle_direction_follows_active_flag() {
        let mut t = ActiveToggle {
            user: Some(user(json!({ "id": 5, "email": "a@b.vn", "username": "an", "is_disabled": true }))),
            busy: false,
        };
        assert_eq!(t.begin(), Some((5, false)));
        assert!(t.begin().is_none());

        let mut t = ActiveToggle {
            user: Some(user(json!({ "id": 6, "email": "c@d.vn", "username": "binh" }))),
            busy: false,
        };
        assert_eq!(t.begin(), Some((6, true)));
    }
}
