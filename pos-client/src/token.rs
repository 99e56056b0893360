//! Token storage and auth events
//!
//! Access/refresh 令牌对放在一把锁后面，被 HTTP 层共享。
//! 收到 401 时清空令牌并广播一次 [`AuthEvent::Unauthorized`]，
//! `clear()` 返回是否真的清掉了东西，保证事件每个会话只发一次。

use parking_lot::Mutex;
use tokio::sync::broadcast;

/// Auth lifecycle events the UI subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// The session is gone; the user must log in again
    Unauthorized,
}

#[derive(Debug, Clone)]
struct TokenPair {
    access: String,
    refresh: String,
}

/// Shared token store
#[derive(Debug)]
pub struct TokenStore {
    tokens: Mutex<Option<TokenPair>>,
    events: broadcast::Sender<AuthEvent>,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(8);
        Self {
            tokens: Mutex::new(None),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    pub fn set_tokens(&self, access: impl Into<String>, refresh: impl Into<String>) {
        *self.tokens.lock() = Some(TokenPair {
            access: access.into(),
            refresh: refresh.into(),
        });
    }

    pub fn set_access_token(&self, access: impl Into<String>) {
        let mut guard = self.tokens.lock();
        if let Some(pair) = guard.as_mut() {
            pair.access = access.into();
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens.lock().as_ref().map(|p| p.access.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.tokens.lock().as_ref().map(|p| p.refresh.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens.lock().is_some()
    }

    /// Drop both tokens. Returns whether tokens were actually present.
    pub fn clear(&self) -> bool {
        self.tokens.lock().take().is_some()
    }

    /// 401 handling: clear once, emit Unauthorized once
    pub fn handle_unauthorized(&self) {
        if self.clear() {
            let _ = self.events.send(AuthEvent::Unauthorized);
        }
    }
}
