//! 用户可见的提示消息

use serde::{Deserialize, Serialize};

/// 提示的展示通道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeChannel {
    /// 不展示，只记录日志
    Silent,
    WarningToast,
    ErrorToast,
    SuccessToast,
    /// 常驻通知，需手动关闭
    Notification,
}

impl NoticeChannel {
    /// Toast 会自动消失，Notification 常驻
    pub fn auto_dismiss(&self) -> bool {
        matches!(
            self,
            NoticeChannel::WarningToast | NoticeChannel::ErrorToast | NoticeChannel::SuccessToast
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub channel: NoticeChannel,
    pub message: String,
}

impl Notice {
    pub fn new(channel: NoticeChannel, message: impl Into<String>) -> Self {
        Self {
            channel,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeChannel::SuccessToast, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeChannel::WarningToast, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeChannel::ErrorToast, message)
    }

    pub fn is_visible(&self) -> bool {
        self.channel != NoticeChannel::Silent
    }
}
