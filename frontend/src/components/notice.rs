//! 提示中心
//!
//! Toast 3 秒后自动消失；Notification 常驻，需手动关闭；Silent 只写日志。

use std::time::Duration;

use leptos::prelude::*;
use log::debug;
use plantdoc_admin::{Notice, NoticeChannel};

use crate::components::icons::X;

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Clone, Copy)]
pub struct NoticeContext {
    items: RwSignal<Vec<(u64, Notice)>>,
    next_id: StoredValue<u64>,
}

impl NoticeContext {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn push(&self, notice: Notice) {
        if !notice.is_visible() {
            debug!("silent notice: {}", notice.message);
            return;
        }
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        let auto_dismiss = notice.channel.auto_dismiss();
        self.items.update(|items| items.push((id, notice)));

        if auto_dismiss {
            let ctx = *self;
            set_timeout(move || ctx.dismiss(id), TOAST_TTL);
        }
    }

    pub fn push_all(&self, notices: impl IntoIterator<Item = Notice>) {
        for notice in notices {
            self.push(notice);
        }
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|(i, _)| *i != id));
    }

    fn filtered(&self, toasts: bool) -> Vec<(u64, Notice)> {
        self.items.with(|items| {
            items
                .iter()
                .filter(|(_, n)| n.channel.auto_dismiss() == toasts)
                .cloned()
                .collect()
        })
    }
}

impl Default for NoticeContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_notices() -> NoticeContext {
    use_context::<NoticeContext>().expect("NoticeContext should be provided")
}

fn alert_class(channel: NoticeChannel) -> &'static str {
    match channel {
        NoticeChannel::SuccessToast => "alert alert-success shadow-lg",
        NoticeChannel::WarningToast => "alert alert-warning shadow-lg",
        NoticeChannel::ErrorToast => "alert alert-error shadow-lg",
        NoticeChannel::Notification | NoticeChannel::Silent => "alert alert-info shadow-lg",
    }
}

#[component]
pub fn NoticeCenter() -> impl IntoView {
    let notices = use_notices();

    view! {
        <div class="toast toast-top toast-end z-50">
            <For each=move || notices.filtered(true) key=|(id, _)| *id let:item>
                <div class=alert_class(item.1.channel)>
                    <span>{item.1.message.clone()}</span>
                </div>
            </For>
        </div>
        <div class="toast toast-bottom toast-end z-50">
            <For each=move || notices.filtered(false) key=|(id, _)| *id let:item>
                <div class=alert_class(item.1.channel)>
                    <span>{item.1.message.clone()}</span>
                    <button
                        class="btn btn-ghost btn-xs btn-circle"
                        on:click=move |_| notices.dismiss(item.0)
                    >
                        <X />
                    </button>
                </div>
            </For>
        </div>
    }
}
