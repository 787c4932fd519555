use leptos::prelude::*;

use crate::components::icons::X;

/// 基于原生 `<dialog>` 的模态框
///
/// `open` 由调用方持有；按 Esc 或点击关闭按钮时调用 `on_close`，
/// 由调用方决定是否真正关闭（例如提交中不允许关闭）。
#[component]
pub fn Modal(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] title: Signal<String>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(optional)] wide: bool,
    children: Children,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let box_class = if wide {
        "modal-box w-11/12 max-w-4xl"
    } else {
        "modal-box"
    };

    view! {
        <dialog
            node_ref=dialog_ref
            class="modal"
            on:cancel=move |ev: leptos::web_sys::Event| {
                ev.prevent_default();
                on_close.run(());
            }
        >
            <div class=box_class>
                <div class="flex items-center justify-between mb-4">
                    <h3 class="font-bold text-lg">{move || title.get()}</h3>
                    <button
                        type="button"
                        class="btn btn-sm btn-circle btn-ghost"
                        on:click=move |_| on_close.run(())
                    >
                        <X />
                    </button>
                </div>
                {children()}
            </div>
        </dialog>
    }
}
