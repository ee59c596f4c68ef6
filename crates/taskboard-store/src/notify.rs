//! Notification capability
//!
//! The store reports success and failure through [`Notifier`] and never
//! depends on how notifications are rendered. Implementors provide
//! [`Notifier::notify`]; the `show_*` methods build the notification the
//! same way for every renderer.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Default lifetime of an error notification
pub const ERROR_TIMEOUT: Duration = Duration::from_millis(8_000);
/// Lifetime of a network error without a retry action
pub const NETWORK_ERROR_TIMEOUT: Duration = Duration::from_millis(10_000);
/// Lifetime of a network error offering a retry action
pub const RETRY_TIMEOUT: Duration = Duration::from_millis(15_000);

const NETWORK_ERROR_MARKER: &str = "Network error";

/// Async action offered to the user alongside an error
#[derive(Clone)]
pub struct RetryAction(Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>);

impl RetryAction {
    /// Wrap an async closure
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self(Arc::new(move || Box::pin(action())))
    }

    /// Start the action
    #[must_use]
    pub fn run(&self) -> BoxFuture<'static, ()> {
        (self.0)()
    }
}

impl fmt::Debug for RetryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RetryAction")
    }
}

/// Callback run when a notification is closed
#[derive(Clone)]
pub struct CloseHook(Arc<dyn Fn() + Send + Sync>);

impl CloseHook {
    /// Wrap a closure
    pub fn new(hook: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(hook))
    }

    /// Invoke the hook
    pub fn call(&self) {
        (self.0)();
    }
}

impl fmt::Debug for CloseHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CloseHook")
    }
}

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
    /// Something needs attention
    Warning,
    /// Neutral information
    Info,
}

/// One notification as handed to a renderer
#[derive(Debug, Clone)]
pub struct Notification {
    /// Severity
    pub level: Level,
    /// Text shown to the user
    pub message: String,
    /// Lifetime; `None` means the renderer's default
    pub timeout: Option<Duration>,
    /// Whether clicking the notification dismisses it
    pub close_on_click: bool,
    /// Whether the countdown bar is hidden
    pub hide_progress_bar: bool,
    /// Action offered to the user
    pub retry: Option<RetryAction>,
    /// Run when the notification closes
    pub on_close: Option<CloseHook>,
}

impl Notification {
    /// Create notification with renderer defaults
    #[must_use]
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timeout: None,
            close_on_click: true,
            hide_progress_bar: false,
            retry: None,
            on_close: None,
        }
    }

    /// With explicit lifetime
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// With retry action
    #[inline]
    #[must_use]
    pub fn with_retry(mut self, retry: RetryAction) -> Self {
        self.retry = Some(retry);
        self
    }

    /// With close hook
    #[inline]
    #[must_use]
    pub fn with_on_close(mut self, hook: Option<CloseHook>) -> Self {
        self.on_close = hook;
        self
    }

    /// Click does not dismiss and the countdown bar is hidden
    #[inline]
    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.close_on_click = false;
        self.hide_progress_bar = true;
        self
    }
}

/// Options for [`Notifier::show_error`]
#[derive(Debug, Clone, Default)]
pub struct ErrorOptions {
    /// Lifetime; unset or zero means [`ERROR_TIMEOUT`]
    pub timeout: Option<Duration>,
    /// Run when the notification closes
    pub on_close: Option<CloseHook>,
}

impl ErrorOptions {
    /// Options with only a lifetime
    #[inline]
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            on_close: None,
        }
    }
}

/// Prefix `message` as a network error unless it already is one
#[must_use]
pub fn network_error_message(message: &str) -> String {
    if message.contains(NETWORK_ERROR_MARKER) {
        message.to_string()
    } else {
        format!("{NETWORK_ERROR_MARKER}: {message}")
    }
}

/// Surfaces feedback to the user
pub trait Notifier: Send + Sync {
    /// Render one notification
    fn notify(&self, notification: Notification);

    /// Success with the renderer's default lifetime
    fn show_success(&self, message: &str) {
        self.notify(Notification::new(Level::Success, message));
    }

    /// Error, [`ERROR_TIMEOUT`] unless overridden
    fn show_error(&self, message: &str, options: ErrorOptions) {
        let timeout = options
            .timeout
            .filter(|t| !t.is_zero())
            .unwrap_or(ERROR_TIMEOUT);
        self.notify(
            Notification::new(Level::Error, message)
                .with_timeout(timeout)
                .with_on_close(options.on_close),
        );
    }

    /// Warning with the renderer's default lifetime
    fn show_warning(&self, message: &str) {
        self.notify(Notification::new(Level::Warning, message));
    }

    /// Information with the renderer's default lifetime
    fn show_info(&self, message: &str) {
        self.notify(Notification::new(Level::Info, message));
    }

    /// Network failure, optionally offering `retry`
    ///
    /// With a retry action the notification is persistent (no click dismissal)
    /// and lives for [`RETRY_TIMEOUT`]; without one it is a plain error living
    /// for [`NETWORK_ERROR_TIMEOUT`].
    fn show_network_error(&self, message: &str, retry: Option<RetryAction>) {
        let message = network_error_message(message);
        match retry {
            Some(retry) => self.notify(
                Notification::new(Level::Error, message)
                    .with_timeout(RETRY_TIMEOUT)
                    .persistent()
                    .with_retry(retry),
            ),
            None => self.show_error(&message, ErrorOptions::with_timeout(NETWORK_ERROR_TIMEOUT)),
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}
