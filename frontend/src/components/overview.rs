//! 首页概览：五个计数各自独立展示

use leptos::prelude::*;
use leptos::task::spawn_local;
use plantdoc_admin::dashboard::{CountSlice, Overview, load_overview};

use crate::auth::use_api;
use crate::components::icons::Refresh;
use crate::components::notice::use_notices;
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
fn StatCard(
    title: &'static str,
    to: AppRoute,
    #[prop(into)] slice: Signal<Option<CountSlice>>,
) -> impl IntoView {
    view! {
        <div class="stat">
            <div class="stat-title">{title}</div>
            <div class="stat-value">
                {move || match slice.get() {
                    None => view! { <span class="loading loading-dots loading-md"></span> }.into_any(),
                    Some(Ok(count)) => count.to_string().into_any(),
                    Some(Err(_)) => view! { <span class="text-error text-base">"Unavailable"</span> }.into_any(),
                }}
            </div>
            <div class="stat-actions">
                <Link to=to class="link link-primary text-sm">
                    "Open"
                </Link>
            </div>
        </div>
    }
}

#[component]
pub fn OverviewPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let notices = use_notices();
    let overview: RwSignal<Option<Overview>> = RwSignal::new(None);

    let load = move || {
        overview.set(None);
        let api = api.get_value();
        spawn_local(async move {
            let result = load_overview(&api).await;
            let failures = [
                &result.plants,
                &result.diseases,
                &result.pending_complaints,
                &result.unverified_scans,
                &result.admin_users,
            ]
            .into_iter()
            .filter_map(|slice| slice.as_ref().err().cloned());
            notices.push_all(failures);
            overview.try_set(Some(result));
        });
    };

    Effect::new(move |_| load());

    let slice = move |pick: fn(&Overview) -> CountSlice| {
        Signal::derive(move || overview.with(|o| o.as_ref().map(pick)))
    };

    view! {
        <div class="space-y-6">
            <div class="flex justify-end">
                <button class="btn btn-sm" on:click=move |_| load()>
                    <Refresh />
                    "Refresh"
                </button>
            </div>
            <div class="stats stats-vertical lg:stats-horizontal shadow w-full bg-base-100">
                <StatCard title="Plants" to=AppRoute::Plants slice=slice(|o| o.plants.clone()) />
                <StatCard title="Diseases" to=AppRoute::Diseases slice=slice(|o| o.diseases.clone()) />
                <StatCard
                    title="Pending complaints"
                    to=AppRoute::Complaints
                    slice=slice(|o| o.pending_complaints.clone())
                />
                <StatCard
                    title="Unverified scans"
                    to=AppRoute::ScanReports
                    slice=slice(|o| o.unverified_scans.clone())
                />
                <StatCard title="Admin users" to=AppRoute::Users slice=slice(|o| o.admin_users.clone()) />
            </div>
        </div>
    }
}
