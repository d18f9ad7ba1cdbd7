pub mod doctor;
mod logging;
mod ntfy;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub use logging::LoggingNotifier;
pub use ntfy::NtfyNotifier;

pub const TEST_TITLE: &str = "Test notification";
pub const TEST_MESSAGE: &str = "This is a test notification.";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("notification service answered HTTP {0}")]
    Status(u16),
}

/// Where alert text goes. Implementations must be safe to call from many
/// ingest tasks at once.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError>;
}

#[async_trait]
impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        (**self).notify(title, message).await
    }
}

/// Accepts everything, sends nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, _title: &str, _message: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Ntfy,
    Log,
    Null,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyCfg {
    #[serde(default = "default_backend")]
    pub backend: Backend,
    pub ntfy_topic: Option<String>,
    #[serde(default = "default_ntfy_base_url")]
    pub ntfy_base_url: String,
    /// Opened by the "Show me" action on the phone. No action when unset.
    pub view_url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_backend() -> Backend {
    Backend::Log
}

fn default_ntfy_base_url() -> String {
    "https://ntfy.sh/".to_string()
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for NotifyCfg {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            ntfy_topic: None,
            ntfy_base_url: default_ntfy_base_url(),
            view_url: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl NotifyCfg {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Builds the configured backend. Everything except `null` is wrapped in
    /// a [`LoggingNotifier`].
    pub fn build(&self) -> anyhow::Result<Arc<dyn Notifier>> {
        Ok(match self.backend {
            Backend::Ntfy => {
                let topic = self
                    .ntfy_topic
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                    .ok_or_else(|| anyhow::anyhow!("notify.ntfy_topic is required for the ntfy backend"))?;
                let ntfy = NtfyNotifier::new(&self.ntfy_base_url, topic, self.view_url.clone(), self.timeout())?;
                Arc::new(LoggingNotifier::new(ntfy))
            }
            Backend::Log => Arc::new(LoggingNotifier::new(NullNotifier)),
            Backend::Null => Arc::new(NullNotifier),
        })
    }
}
