//! LocalStorage 封装，以及会话存储的浏览器实现

use plantdoc_admin::SessionStorage;

/// 本地存储操作封装
///
/// 提供静态方法访问浏览器 LocalStorage API。
pub struct LocalStorage;

impl LocalStorage {
    /// 每次调用都重新获取 Storage 句柄，`web_sys::Storage` 不能跨线程持有
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 返回是否写入成功（隐私模式或配额用尽时失败）
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// 会话存储后端：令牌与用户对象写入 LocalStorage，刷新页面后仍然有效
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSessionStorage;

impl SessionStorage for BrowserSessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::get(key)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        LocalStorage::set(key, value)
    }

    fn remove(&self, key: &str) -> bool {
        LocalStorage::delete(key)
    }
}
