use leptos::prelude::*;

use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="hero py-24">
            <div class="hero-content text-center flex-col">
                <h2 class="text-6xl font-bold opacity-30">"404"</h2>
                <p>"Sorry, the page you visited does not exist."</p>
                <Link to=AppRoute::Overview class="btn btn-primary">
                    "Back Home"
                </Link>
            </div>
        </div>
    }
}
