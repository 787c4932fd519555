//! 后台布局：侧边菜单 + 顶栏 + 内容区

use leptos::prelude::*;

use crate::auth::{logout, use_api, use_auth};
use crate::components::icons::{Leaf, LogOut};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn AdminLayout(route: AppRoute, children: Children) -> impl IntoView {
    let auth = use_auth();
    let api = StoredValue::new(use_api());
    let router = use_router();
    let user_label = auth.user_label();

    let menu = AppRoute::MENU
        .into_iter()
        .map(|item| {
            let class = Signal::derive(move || {
                if router.current_route().get() == item {
                    "active".to_string()
                } else {
                    String::new()
                }
            });
            view! {
                <li>
                    <Link to=item class=class>
                        {item.title()}
                    </Link>
                </li>
            }
        })
        .collect_view();

    view! {
        <div class="min-h-screen flex bg-base-200">
            <aside class="w-60 bg-base-100 shadow-sm flex flex-col">
                <div class="flex items-center gap-2 px-5 py-4 text-primary font-bold text-lg">
                    <Leaf />
                    "PlantDoc Admin"
                </div>
                <ul class="menu px-2">{menu}</ul>
            </aside>

            <div class="flex-1 flex flex-col min-w-0">
                <div class="navbar bg-base-100 shadow-sm px-6">
                    <div class="flex-1">
                        <h1 class="text-xl font-semibold">{route.title()}</h1>
                    </div>
                    <div class="flex-none gap-3 flex items-center">
                        <span class="text-sm opacity-70">{move || user_label.get()}</span>
                        <button
                            class="btn btn-ghost btn-sm"
                            on:click=move |_| api.with_value(logout)
                        >
                            <LogOut />
                            "Sign out"
                        </button>
                    </div>
                </div>
                <main class="p-6 flex-1 overflow-auto">{children()}</main>
            </div>
        </div>
    }
}
