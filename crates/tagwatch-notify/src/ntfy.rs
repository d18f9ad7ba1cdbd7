use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use rand::RngCore;
use tracing::debug;

use crate::{Notifier, NotifyError};

/// Publishes to an ntfy topic: the message is the POST body, the title goes in
/// the `Title` header.
#[derive(Debug, Clone)]
pub struct NtfyNotifier {
    client: reqwest::Client,
    url: String,
    view_url: Option<String>,
}

impl NtfyNotifier {
    pub fn new(base_url: &str, topic: &str, view_url: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build ntfy http client")?;
        let base = if base_url.ends_with('/') { base_url.to_string() } else { format!("{base_url}/") };
        Ok(Self { client, url: format!("{base}{topic}"), view_url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Value of the `Actions` header. The random query string stops the phone
    /// from showing a cached page.
    fn actions(&self) -> Option<String> {
        let view = self.view_url.as_deref()?;
        Some(format!(
            r#"[{{ "action": "view", "label": "Show me", "url": "{}?q={}"}}]"#,
            view,
            cache_buster()
        ))
    }
}

fn cache_buster() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[async_trait]
impl Notifier for NtfyNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let mut req = self
            .client
            .post(&self.url)
            .header("Title", title)
            .body(message.to_string());
        if let Some(actions) = self.actions() {
            req = req.header("Actions", actions);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(NotifyError::Status(status.as_u16()));
        }
        debug!("notify: ntfy accepted \"{}\"", title);
        Ok(())
    }
}
