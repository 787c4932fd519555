use leptos::prelude::*;
use leptos::task::spawn_local;
use plantdoc_admin::form::Rule;

use crate::auth::{login, use_api};
use crate::components::icons::Leaf;
use crate::components::notice::use_notices;

fn check_credentials(email: &str, password: &str) -> Option<String> {
    [
        ("Email", Rule::Required.check(email)),
        ("Email", Rule::Email.check(email)),
        ("Password", Rule::Required.check(password)),
    ]
    .into_iter()
    .find_map(|(field, error)| error.map(|e| format!("{}: {}", field, e)))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let notices = use_notices();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 登录成功后的跳转由路由服务监听会话变化完成
    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        let (email, password) = (email.get_untracked(), password.get_untracked());
        if let Some(message) = check_credentials(&email, &password) {
            set_error_msg.set(Some(message));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.get_value();
        spawn_local(async move {
            if let Err(notice) = login(&api, email.trim(), &password).await {
                set_error_msg.set(Some(notice.message.clone()));
                notices.push(notice);
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Leaf />
                        </div>
                        <h1 class="text-3xl font-bold">"PlantDoc Admin"</h1>
                        <p class="text-base-content/70">"Sign in with your administrator account"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                autocomplete="username"
                                placeholder="admin@plantdoc.vn"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || {
                                    if is_submitting.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "Signing in..."
                                        }
                                            .into_any()
                                    } else {
                                        "Sign in".into_any()
                                    }
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_are_checked_before_any_request() {
        assert!(check_credentials("", "secret").unwrap().starts_with("Email"));
        assert!(check_credentials("admin", "secret").unwrap().starts_with("Email"));
        assert!(check_credentials("admin@plantdoc.vn", "").unwrap().starts_with("Password"));
        assert_eq!(check_credentials("admin@plantdoc.vn", "secret"), None);
    }
}
