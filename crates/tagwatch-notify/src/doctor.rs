use anyhow::Result;

use crate::{Backend, NotifyCfg};

pub fn check_notify(cfg: &NotifyCfg) -> Result<()> {
    if cfg.backend == Backend::Ntfy {
        let topic = cfg.ntfy_topic.as_deref().unwrap_or_default();
        anyhow::ensure!(!topic.trim().is_empty(), "notify.ntfy_topic must be set for the ntfy backend");
        anyhow::ensure!(
            !topic.contains('/') && !topic.contains(char::is_whitespace),
            "notify.ntfy_topic must be a bare topic name"
        );
        anyhow::ensure!(
            cfg.ntfy_base_url.starts_with("https://") || cfg.ntfy_base_url.starts_with("http://"),
            "notify.ntfy_base_url must be an http(s) URL"
        );
    }
    if let Some(view) = &cfg.view_url {
        anyhow::ensure!(view.starts_with("https://") || view.starts_with("http://"), "notify.view_url must be an http(s) URL");
    }
    anyhow::ensure!(cfg.timeout_ms >= 100 && cfg.timeout_ms <= 120_000, "notify.timeout_ms should be 100..120000");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes() {
        assert!(check_notify(&NotifyCfg::default()).is_ok());
    }

    #[test]
    fn ntfy_topic_checks() {
        let mut cfg = NotifyCfg { backend: Backend::Ntfy, ..NotifyCfg::default() };
        assert!(check_notify(&cfg).is_err());
        cfg.ntfy_topic = Some("farm/dogs".into());
        assert!(check_notify(&cfg).is_err());
        cfg.ntfy_topic = Some("farm-dogs".into());
        assert!(check_notify(&cfg).is_ok());
    }

    #[test]
    fn timeout_bounds() {
        let cfg = NotifyCfg { timeout_ms: 5, ..NotifyCfg::default() };
        assert!(check_notify(&cfg).is_err());
    }
}
