//! 会话存储
//!
//! 显式的会话对象：令牌与当前用户写入可插拔的 [`SessionStorage`]，
//! 同时缓存在内存中；订阅者在登录/注销时收到通知。
//! 浏览器中由 `localStorage` 实现，测试中使用 [`MemoryStorage`]。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use log::{debug, warn};
use plantdoc_shared::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY, SessionUser};

/// 键值存储后端
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    /// 返回是否写入成功
    fn set(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

/// 内存存储
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: Option<SessionUser>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

pub struct SessionStore {
    storage: Box<dyn SessionStorage + Send + Sync>,
    current: RwLock<Option<Session>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl SessionStore {
    /// 从存储中恢复会话
    pub fn new<S>(storage: S) -> Self
    where
        S: SessionStorage + Send + Sync + 'static,
    {
        let current = load(&storage);
        if current.is_some() {
            debug!("restored session from storage");
        }
        Self {
            storage: Box::new(storage),
            current: RwLock::new(current),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    // --- Read ---

    pub fn session(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .and_then(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    // --- Write ---

    pub fn sign_in(&self, session: Session) {
        if !self.storage.set(STORAGE_TOKEN_KEY, &session.token) {
            warn!("failed to persist session token, session will not survive reload");
        }
        match &session.user {
            Some(user) => match serde_json::to_string(user) {
                Ok(json) => {
                    if !self.storage.set(STORAGE_USER_KEY, &json) {
                        warn!("failed to persist session user");
                    }
                }
                Err(e) => warn!("failed to encode session user: {}", e),
            },
            None => {
                self.storage.remove(STORAGE_USER_KEY);
            }
        }

        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        self.notify(Some(&session));
    }

    pub fn clear(&self) {
        self.storage.remove(STORAGE_TOKEN_KEY);
        self.storage.remove(STORAGE_USER_KEY);
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = None;
        self.notify(None);
    }

    // --- Subscriptions ---

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|(sid, _)| *sid != id);
    }

    fn notify(&self, session: Option<&Session>) {
        // 先复制监听器列表再回调，允许回调中再次订阅/退订
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(session);
        }
    }
}

fn load(storage: &dyn SessionStorage) -> Option<Session> {
    let token = storage.get(STORAGE_TOKEN_KEY).filter(|t| !t.is_empty())?;
    let user = storage
        .get(STORAGE_USER_KEY)
        .and_then(|raw| match serde_json::from_str::<SessionUser>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("ignoring corrupt stored user: {}", e);
                None
            }
        });
    Some(Session { token, user })
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantdoc_shared::UserRole;
    use std::sync::atomic::AtomicUsize;

    fn user() -> SessionUser {
        SessionUser {
            id: 1,
            email: "admin@plantdoc.vn".into(),
            username: "admin".into(),
            role: UserRole::Admin,
        }
    }

    #[test]
    fn restores_token_and_user_from_storage() {
        let storage = MemoryStorage::new()
            .with_entry(STORAGE_TOKEN_KEY, "abc")
            .with_entry(STORAGE_USER_KEY, &serde_json::to_string(&user()).unwrap());
        let store = SessionStore::new(storage);

        assert_eq!(store.token().as_deref(), Some("abc"));
        assert_eq!(store.user(), Some(user()));
    }

    #[test]
    fn corrupt_user_keeps_token() {
        let storage = MemoryStorage::new()
            .with_entry(STORAGE_TOKEN_KEY, "abc")
            .with_entry(STORAGE_USER_KEY, "{not json");
        let store = SessionStore::new(storage);

        assert!(store.is_authenticated());
        assert_eq!(store.user(), None);
    }

    #[test]
    fn subscribers_see_sign_in_and_clear() {
        let store = SessionStore::in_memory();
        let calls = Arc::new(AtomicUsize::new(0));
        let signed_in = Arc::new(AtomicUsize::new(0));

        let (c, s) = (calls.clone(), signed_in.clone());
        let id = store.subscribe(move |session| {
            c.fetch_add(1, Ordering::SeqCst);
            if session.is_some() {
                s.fetch_add(1, Ordering::SeqCst);
            }
        });

        store.sign_in(Session {
            token: "t1".into(),
            user: Some(user()),
        });
        store.clear();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(signed_in.load(Ordering::SeqCst), 1);
        assert!(!store.is_authenticated());

        store.unsubscribe(id);
        store.sign_in(Session {
            token: "t2".into(),
            user: None,
        });
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
