use async_trait::async_trait;
use tracing::{info, warn};

use crate::{Notifier, NotifyError};

/// Logs each notification, then hands it on.
#[derive(Debug, Clone)]
pub struct LoggingNotifier<N> {
    inner: N,
}

impl<N> LoggingNotifier<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<N: Notifier> Notifier for LoggingNotifier<N> {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        info!("notify: sending \"{}\" \"{}\"", title, message);
        let res = self.inner.notify(title, message).await;
        if let Err(e) = &res {
            warn!("notify: \"{}\" failed: {}", title, e);
        }
        res
    }
}
