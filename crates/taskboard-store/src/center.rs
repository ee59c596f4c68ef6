//! In-memory notification center
//!
//! A [`Notifier`] that keeps what a toast stack would show: newest first,
//! bounded, each entry with an id that can be dismissed, retried or expired.
//! Every notification is also logged through `tracing`.

use crate::notify::{CloseHook, Level, Notification, Notifier, RetryAction};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Notification center configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Lifetime of notifications that do not set one, in milliseconds
    pub default_timeout_ms: u64,
    /// Maximum simultaneously visible notifications
    pub max_visible: usize,
    /// Maximum notifications remembered in the history
    pub history_limit: usize,
}

impl NotifyConfig {
    /// Renderer default lifetime
    #[inline]
    #[must_use]
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 5_000,
            max_visible: 20,
            history_limit: 100,
        }
    }
}

/// A notification currently on screen
#[derive(Debug, Clone)]
pub struct Shown {
    /// Center-assigned id
    pub id: u64,
    /// The notification itself
    pub notification: Notification,
    /// When it was shown
    pub shown_at: Instant,
}

impl Shown {
    fn expires_at(&self, default_timeout: Duration) -> Instant {
        self.shown_at + self.notification.timeout.unwrap_or(default_timeout)
    }
}

#[derive(Debug, Default)]
struct CenterState {
    next_id: u64,
    visible: VecDeque<Shown>,
    history: VecDeque<(Level, String)>,
}

/// Bounded, newest-first notification stack
#[derive(Debug, Default)]
pub struct NotificationCenter {
    config: NotifyConfig,
    state: Mutex<CenterState>,
}

impl NotificationCenter {
    /// Create center with `config`
    #[must_use]
    pub fn new(config: NotifyConfig) -> Self {
        Self {
            config,
            state: Mutex::new(CenterState::default()),
        }
    }

    /// Visible notifications, newest first
    #[must_use]
    pub fn visible(&self) -> Vec<Shown> {
        self.state.lock().visible.iter().cloned().collect()
    }

    /// Most recent notifications, oldest first, up to `history_limit`
    #[must_use]
    pub fn history(&self) -> Vec<(Level, String)> {
        self.state.lock().history.iter().cloned().collect()
    }

    /// Notifications shown since creation, including forgotten ones
    #[must_use]
    pub fn total_shown(&self) -> u64 {
        self.state.lock().next_id
    }

    /// Most recent message, if any
    #[must_use]
    pub fn last_message(&self) -> Option<String> {
        self.state.lock().history.back().map(|(_, m)| m.clone())
    }

    /// Ids of visible notifications that offer a retry, newest first
    #[must_use]
    pub fn pending_retries(&self) -> Vec<u64> {
        self.state
            .lock()
            .visible
            .iter()
            .filter(|s| s.notification.retry.is_some())
            .map(|s| s.id)
            .collect()
    }

    /// Close notification `id`; false if it is not visible
    pub fn dismiss(&self, id: u64) -> bool {
        let removed = self.take(id);
        match removed {
            Some(shown) => {
                run_close_hooks([shown.notification.on_close]);
                true
            }
            None => false,
        }
    }

    /// Close notification `id` and run its retry action
    ///
    /// Returns false if `id` is not visible or offers no retry.
    pub async fn retry(&self, id: u64) -> bool {
        let action: Option<(RetryAction, Option<CloseHook>)> = {
            let mut state = self.state.lock();
            let index = state
                .visible
                .iter()
                .position(|s| s.id == id && s.notification.retry.is_some());
            index
                .and_then(|i| state.visible.remove(i))
                .and_then(|s| s.notification.retry.map(|r| (r, s.notification.on_close)))
        };

        let Some((retry, on_close)) = action else {
            return false;
        };
        run_close_hooks([on_close]);
        tracing::debug!(id, "retrying from notification");
        retry.run().await;
        true
    }

    /// Close every notification whose lifetime ended before `now`
    ///
    /// Returns how many were closed.
    pub fn expire(&self, now: Instant) -> usize {
        let default_timeout = self.config.default_timeout();
        let expired: Vec<Shown> = {
            let mut state = self.state.lock();
            let (expired, alive): (Vec<Shown>, Vec<Shown>) = state
                .visible
                .drain(..)
                .partition(|s| s.expires_at(default_timeout) <= now);
            state.visible = alive.into();
            expired
        };
        let count = expired.len();
        run_close_hooks(expired.into_iter().map(|s| s.notification.on_close));
        count
    }

    fn take(&self, id: u64) -> Option<Shown> {
        let mut state = self.state.lock();
        let index = state.visible.iter().position(|s| s.id == id)?;
        state.visible.remove(index)
    }
}

fn run_close_hooks(hooks: impl IntoIterator<Item = Option<CloseHook>>) {
    for hook in hooks.into_iter().flatten() {
        hook.call();
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success => tracing::info!(message = %notification.message, "notification"),
            Level::Info => tracing::info!(message = %notification.message, "notification"),
            Level::Warning => tracing::warn!(message = %notification.message, "notification"),
            Level::Error => tracing::error!(
                message = %notification.message,
                retry = notification.retry.is_some(),
                "notification"
            ),
        }

        let evicted: Vec<Shown> = {
            let mut state = self.state.lock();
            state.next_id += 1;
            let id = state.next_id;
            state
                .history
                .push_back((notification.level, notification.message.clone()));
            let remembered = self.config.history_limit.max(1);
            while state.history.len() > remembered {
                state.history.pop_front();
            }
            state.visible.push_front(Shown {
                id,
                notification,
                shown_at: Instant::now(),
            });
            let keep = self.config.max_visible.max(1);
            if state.visible.len() > keep {
                state.visible.split_off(keep).into()
            } else {
                Vec::new()
            }
        };
        run_close_hooks(evicted.into_iter().map(|s| s.notification.on_close));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ErrorOptions;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_hook(counter: &Arc<AtomicUsize>) -> CloseHook {
        let counter = counter.clone();
        CloseHook::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn newest_first_and_bounded() {
        let center = NotificationCenter::new(NotifyConfig {
            max_visible: 3,
            ..NotifyConfig::default()
        });
        for i in 0..5 {
            center.show_info(&format!("message {i}"));
        }

        let messages: Vec<String> = center
            .visible()
            .into_iter()
            .map(|s| s.notification.message)
            .collect();
        assert_eq!(messages, vec!["message 4", "message 3", "message 2"]);
        assert_eq!(center.history().len(), 5);
        assert_eq!(center.last_message().as_deref(), Some("message 4"));
    }

    #[test]
    fn history_is_bounded() {
        let center = NotificationCenter::new(NotifyConfig {
            max_visible: 3,
            history_limit: 50,
            ..NotifyConfig::default()
        });
        for i in 0..10_000 {
            center.show_info(&format!("message {i}"));
        }

        let history = center.history();
        assert_eq!(center.visible().len(), 3);
        assert_eq!(history.len(), 50);
        assert_eq!(history[0].1, "message 9950");
        assert_eq!(center.last_message().as_deref(), Some("message 9999"));
        assert_eq!(center.total_shown(), 10_000);
    }

    #[test]
    fn dismiss_runs_close_hook() {
        let center = NotificationCenter::default();
        let closed = Arc::new(AtomicUsize::new(0));
        center.show_error(
            "boom",
            ErrorOptions {
                timeout: None,
                on_close: Some(counting_hook(&closed)),
            },
        );

        let id = center.visible()[0].id;
        assert!(center.dismiss(id));
        assert!(!center.dismiss(id));
        assert_eq!(closed.load(Ordering::SeqCst), 1);
        assert!(center.visible().is_empty());
    }

    #[test]
    fn expire_respects_timeouts() {
        let center = NotificationCenter::default();
        center.show_success("short lived");
        center.show_network_error("offline", None);

        let later = Instant::now() + Duration::from_secs(6);
        assert_eq!(center.expire(later), 1);
        assert_eq!(
            center.visible()[0].notification.message,
            "Network error: offline"
        );

        let much_later = Instant::now() + Duration::from_secs(11);
        assert_eq!(center.expire(much_later), 1);
        assert!(center.visible().is_empty());
    }

    #[tokio::test]
    async fn retry_dismisses_and_runs_action() {
        let center = NotificationCenter::default();
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        center.show_network_error(
            "Failed to fetch tasks",
            Some(RetryAction::new(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            })),
        );
        center.show_info("unrelated");

        let pending = center.pending_retries();
        assert_eq!(pending.len(), 1);
        assert!(center.retry(pending[0]).await);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(center.pending_retries().is_empty());

        let info_id = center.visible()[0].id;
        assert!(!center.retry(info_id).await);
    }
}
