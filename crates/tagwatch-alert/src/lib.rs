pub mod battery;
pub mod doctor;
pub mod geofence;
pub mod oneshot;
pub mod recency;

use tagwatch_notify::Notifier;

pub use battery::{evaluate_battery, BatteryCfg, CRITICAL_BATTERY, LOW_BATTERY};
pub use geofence::{evaluate_geofence, OFF_PROPERTY, OUTSIDE_SAFE_ZONE};
pub use oneshot::{Action, AlertError, AlertKey, Edge, OneShot, Rule, Transition};
pub use recency::{latest_analog, latest_location};

/// The animal wearing a collar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub serial: i64,
    pub name: String,
}

impl Subject {
    pub fn new(serial: i64, name: impl Into<String>) -> Self {
        Self { serial, name: name.into() }
    }

    /// State is keyed by serial, so renaming a subject keeps its alerts.
    pub fn key(&self) -> String {
        self.serial.to_string()
    }

    /// Name as it appears in notification titles.
    pub fn shout(&self) -> String {
        self.name.to_uppercase()
    }
}

/// Result of one condition for one subject.
#[derive(Debug)]
pub struct Evaluation {
    pub key: AlertKey,
    pub result: Result<Transition, AlertError>,
}

/// An action that sends one notification.
pub fn notify<'a>(notifier: &'a dyn Notifier, title: String, message: String) -> Action<'a> {
    Box::pin(async move {
        notifier
            .notify(&title, &message)
            .await
            .map_err(anyhow::Error::from)
    })
}
