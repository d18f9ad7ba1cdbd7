//! One-shot debouncer.
//!
//! Each `(subject, condition)` key holds one boolean, Clear or Asserted. A call
//! to [`OneShot::evaluate`] fires `on_set` on Clear -> Asserted and `on_reset`
//! on Asserted -> Clear. A failed or timed out callback leaves the state where
//! it was, so the next evaluation tries again.
//!
//! `set_if` is checked before `reset_if` in the same call. Callers keep the
//! two predicates apart (usually with a hysteresis gap). If both are true the
//! set fires and then the reset fires.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// A pending side effect. Not started until the engine awaits it.
pub type Action<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlertKey {
    pub subject: String,
    pub condition: String,
}

impl AlertKey {
    pub fn new(subject: impl Into<String>, condition: impl Into<String>) -> Self {
        Self { subject: subject.into(), condition: condition.into() }
    }
}

impl fmt::Display for AlertKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.subject, self.condition)
    }
}

/// Predicates and callbacks for one evaluation. A missing callback counts as
/// success.
pub struct Rule<'a> {
    pub set_if: bool,
    pub on_set: Option<Action<'a>>,
    pub reset_if: bool,
    pub on_reset: Option<Action<'a>>,
}

impl<'a> Rule<'a> {
    pub fn new(set_if: bool, reset_if: bool) -> Self {
        Self { set_if, on_set: None, reset_if, on_reset: None }
    }

    pub fn on_set(mut self, action: Action<'a>) -> Self {
        self.on_set = Some(action);
        self
    }

    pub fn on_reset(mut self, action: Action<'a>) -> Self {
        self.on_reset = Some(action);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Set,
    Reset,
    SetThenReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Set,
    Reset,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Edge::Set => "on_set",
            Edge::Reset => "on_reset",
        })
    }
}

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("{key}: {edge} failed: {source:#}")]
    CallbackFailed {
        key: AlertKey,
        edge: Edge,
        source: anyhow::Error,
    },
    #[error("{key}: {edge} timed out after {after:?}")]
    CallbackTimedOut {
        key: AlertKey,
        edge: Edge,
        after: Duration,
    },
}

impl AlertError {
    pub fn key(&self) -> &AlertKey {
        match self {
            AlertError::CallbackFailed { key, .. } | AlertError::CallbackTimedOut { key, .. } => key,
        }
    }
}

/// Owns every key's state. Keys are created on first use and never removed.
/// Evaluations of one key are serialized; different keys never wait on each
/// other.
#[derive(Debug)]
pub struct OneShot {
    states: DashMap<AlertKey, Arc<Mutex<bool>>>,
    timeout: Duration,
}

impl OneShot {
    /// `timeout` bounds each callback. A callback still running at the
    /// deadline is dropped and counts as a failure.
    pub fn new(timeout: Duration) -> Self {
        Self { states: DashMap::new(), timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn slot(&self, key: &AlertKey) -> Arc<Mutex<bool>> {
        if let Some(slot) = self.states.get(key) {
            return Arc::clone(slot.value());
        }
        Arc::clone(self.states.entry(key.clone()).or_default().value())
    }

    pub async fn evaluate(&self, key: &AlertKey, rule: Rule<'_>) -> Result<Transition, AlertError> {
        let slot = self.slot(key);
        let mut asserted = slot.lock().await;

        let mut did_set = false;
        if !*asserted && rule.set_if {
            if let Some(action) = rule.on_set {
                self.run(key, Edge::Set, action).await?;
            }
            *asserted = true;
            did_set = true;
            debug!("oneshot: {} set", key);
        }

        if *asserted && rule.reset_if {
            if let Some(action) = rule.on_reset {
                self.run(key, Edge::Reset, action).await?;
            }
            *asserted = false;
            debug!("oneshot: {} reset", key);
            return Ok(if did_set { Transition::SetThenReset } else { Transition::Reset });
        }

        Ok(if did_set { Transition::Set } else { Transition::None })
    }

    async fn run(&self, key: &AlertKey, edge: Edge, action: Action<'_>) -> Result<(), AlertError> {
        match tokio::time::timeout(self.timeout, action).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(AlertError::CallbackFailed { key: key.clone(), edge, source }),
            Err(_) => Err(AlertError::CallbackTimedOut { key: key.clone(), edge, after: self.timeout }),
        }
    }

    /// Current state, or `None` if the key was never evaluated. Waits for any
    /// evaluation of the same key in progress.
    pub async fn state(&self, key: &AlertKey) -> Option<bool> {
        let slot = self.states.get(key).map(|s| Arc::clone(s.value()))?;
        let asserted = *slot.lock().await;
        Some(asserted)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
