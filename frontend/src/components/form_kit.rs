//! 表单输入组件与提交辅助
//!
//! 字段值全部保存在一个 `RwSignal<ModalForm<F>>` 中，
//! [`bind`] 为单个字段生成读信号和写回调。

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use plantdoc_admin::Notice;
use plantdoc_admin::form::{FormMode, ModalForm, ResourceForm, SubmitOutcome};

use crate::components::notice::NoticeContext;

pub fn bind<F>(
    form: RwSignal<ModalForm<F>>,
    get: fn(&F) -> String,
    set: fn(&mut F, String),
) -> (Signal<String>, Callback<String>)
where
    F: Send + Sync + 'static,
{
    let value = Signal::derive(move || form.with(|m| get(&m.values)));
    let on_input = Callback::new(move |v: String| form.update(|m| set(&mut m.values, v)));
    (value, on_input)
}

pub fn error_of<F>(form: RwSignal<ModalForm<F>>, field: &'static str) -> Signal<Option<String>>
where
    F: Send + Sync + 'static,
{
    Signal::derive(move || form.with(|m| m.errors.get(field).map(str::to_string)))
}

pub fn modal_open<F: Send + Sync + 'static>(form: RwSignal<ModalForm<F>>) -> Signal<bool> {
    Signal::derive(move || form.with(|m| m.open))
}

pub fn modal_submitting<F: Send + Sync + 'static>(form: RwSignal<ModalForm<F>>) -> Signal<bool> {
    Signal::derive(move || form.with(|m| m.submitting))
}

/// 按模式切换标题
pub fn modal_title<F: Send + Sync + 'static>(
    form: RwSignal<ModalForm<F>>,
    create: &'static str,
    edit: &'static str,
) -> Signal<String> {
    Signal::derive(move || {
        let title = if form.with(|m| m.mode.is_edit()) { edit } else { create };
        title.to_string()
    })
}

/// 由固定取值生成下拉选项，值与显示文本相同
pub fn fixed_options(values: impl IntoIterator<Item = &'static str>) -> Vec<(String, String)> {
    values
        .into_iter()
        .map(|v| (v.to_string(), v.to_string()))
        .collect()
}

/// 提交中不允许关闭
pub fn close_modal<F: ResourceForm + Send + Sync + 'static>(form: RwSignal<ModalForm<F>>) {
    form.update(|m| {
        if !m.submitting {
            m.close();
        }
    });
}

/// 提交弹窗表单
///
/// 校验失败只更新字段错误；服务端失败推送提示并保持弹窗；
/// 成功时关闭弹窗、推送成功提示，`on_saved` 恰好调用一次。
pub fn run_submit<F, T, Fut, W, S>(
    form: RwSignal<ModalForm<F>>,
    notices: NoticeContext,
    saved_message: &'static str,
    work: W,
    on_saved: S,
) where
    F: ResourceForm + Send + Sync + 'static,
    T: 'static,
    Fut: Future<Output = SubmitOutcome<T>> + 'static,
    W: FnOnce(FormMode, F) -> Fut + 'static,
    S: FnOnce(T) + 'static,
{
    let Some((mode, values)) = form.try_update(|m| m.begin_submit()).flatten() else {
        return;
    };

    spawn_local(async move {
        let outcome = work(mode, values).await;
        if let SubmitOutcome::Failed(notice) = &outcome {
            notices.push(notice.clone());
        }
        let fire = form.try_update(|m| m.finish(&outcome)).unwrap_or(false);
        if let (true, SubmitOutcome::Saved(saved)) = (fire, outcome) {
            notices.push(Notice::success(saved_message));
            on_saved(saved);
        }
    });
}

// =========================================================
// 输入组件
// =========================================================

#[component]
fn FieldShell(
    label: &'static str,
    #[prop(optional)] required: bool,
    error: Signal<Option<String>>,
    children: Children,
) -> impl IntoView {
    view! {
        <label class="form-control w-full">
            <div class="label">
                <span class="label-text">
                    {label}
                    {required.then_some(view! { <span class="text-error">" *"</span> })}
                </span>
            </div>
            {children()}
            <Show when=move || error.get().is_some()>
                <div class="label">
                    <span class="label-text-alt text-error">{move || error.get().unwrap_or_default()}</span>
                </div>
            </Show>
        </label>
    }
}

#[component]
pub fn TextInput(
    label: &'static str,
    value: Signal<String>,
    on_input: Callback<String>,
    #[prop(into, optional)] error: Signal<Option<String>>,
    #[prop(optional)] required: bool,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional)] placeholder: &'static str,
) -> impl IntoView {
    view! {
        <FieldShell label=label required=required error=error>
            <input
                type=input_type
                class="input input-bordered w-full"
                class:input-error=move || error.get().is_some()
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
        </FieldShell>
    }
}

#[component]
pub fn TextArea(
    label: &'static str,
    value: Signal<String>,
    on_input: Callback<String>,
    #[prop(into, optional)] error: Signal<Option<String>>,
    #[prop(optional)] required: bool,
    #[prop(default = 3)] rows: u32,
    #[prop(optional)] placeholder: &'static str,
) -> impl IntoView {
    view! {
        <FieldShell label=label required=required error=error>
            <textarea
                class="textarea textarea-bordered w-full"
                class:textarea-error=move || error.get().is_some()
                rows=rows
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            ></textarea>
        </FieldShell>
    }
}

/// 下拉选择；选项为 (值, 显示文本)
#[component]
pub fn SelectInput(
    label: &'static str,
    #[prop(into)] options: Signal<Vec<(String, String)>>,
    value: Signal<String>,
    on_change: Callback<String>,
    #[prop(into, optional)] error: Signal<Option<String>>,
    #[prop(optional)] required: bool,
    #[prop(optional)] placeholder: Option<&'static str>,
) -> impl IntoView {
    view! {
        <FieldShell label=label required=required error=error>
            <select
                class="select select-bordered w-full"
                prop:value=move || value.get()
                on:change=move |ev| on_change.run(event_target_value(&ev))
            >
                {placeholder.map(|p| view! { <option value="">{p}</option> })}
                <For each=move || options.get() key=|(v, _)| v.clone() let:opt>
                    <option value=opt.0.clone() selected=move || value.get() == opt.0>
                        {opt.1.clone()}
                    </option>
                </For>
            </select>
        </FieldShell>
    }
}

/// 表单底部的取消/保存按钮
#[component]
pub fn FormActions(
    #[prop(into)] submitting: Signal<bool>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="modal-action">
            <button type="button" class="btn" on:click=move |_| on_cancel.run(())>
                "Cancel"
            </button>
            <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                <Show when=move || submitting.get()>
                    <span class="loading loading-spinner loading-sm"></span>
                </Show>
                "Save"
            </button>
        </div>
    }
}
