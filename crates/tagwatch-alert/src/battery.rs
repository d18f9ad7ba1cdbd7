use serde::Deserialize;
use tagwatch_notify::Notifier;
use tagwatch_proto::AnalogBlock;
use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

use crate::oneshot::{AlertKey, OneShot, Rule};
use crate::{notify, Evaluation, Subject};

pub const LOW_BATTERY: &str = "lowBattery";
pub const CRITICAL_BATTERY: &str = "criticalBattery";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatteryCfg {
    pub low_v: f64,
    pub critical_v: f64,
    pub hysteresis_v: f64,
    /// Inclusive local hours. A start after the end wraps past midnight.
    pub waking_start_hour: u8,
    pub waking_end_hour: u8,
    pub utc_offset_hours: i8,
}

impl Default for BatteryCfg {
    fn default() -> Self {
        Self {
            low_v: 4.0,
            critical_v: 3.8,
            hysteresis_v: 0.1,
            waking_start_hour: 8,
            waking_end_hour: 22,
            utc_offset_hours: 0,
        }
    }
}

impl BatteryCfg {
    pub fn is_waking(&self, now: OffsetDateTime) -> bool {
        let offset = UtcOffset::from_hms(self.utc_offset_hours, 0, 0).unwrap_or(UtcOffset::UTC);
        let hour = now.to_offset(offset).hour();
        let (start, end) = (self.waking_start_hour, self.waking_end_hour);
        if start <= end {
            (start..=end).contains(&hour)
        } else {
            hour >= start || hour <= end
        }
    }
}

fn voltage_message(volts: f64) -> String {
    format!("Battery voltage: {volts:.3} V")
}

/// Runs the low and critical battery conditions for one subject.
///
/// Low sets below `low_v` and resets above `low_v + hysteresis_v`. Critical
/// sets below `critical_v` and resets above `low_v` without telling anyone.
/// Outside waking hours neither predicate holds, so both states freeze.
pub async fn evaluate_battery(
    engine: &OneShot,
    notifier: &dyn Notifier,
    cfg: &BatteryCfg,
    subject: &Subject,
    block: &AnalogBlock,
    now: OffsetDateTime,
) -> [Evaluation; 2] {
    let volts = block.battery_volts();
    let awake = cfg.is_waking(now);
    let name = subject.shout();
    debug!("battery: {} at {:.3} V (waking hours: {})", name, volts, awake);

    let low_key = AlertKey::new(subject.key(), LOW_BATTERY);
    let low = Rule::new(awake && volts < cfg.low_v, awake && volts > cfg.low_v + cfg.hysteresis_v)
        .on_set(notify(notifier, format!("{name}'s battery low"), voltage_message(volts)))
        .on_reset(notify(notifier, format!("New battery for {name} detected"), voltage_message(volts)));
    let low_result = engine.evaluate(&low_key, low).await;

    let critical_key = AlertKey::new(subject.key(), CRITICAL_BATTERY);
    let critical = Rule::new(awake && volts < cfg.critical_v, awake && volts > cfg.low_v)
        .on_set(notify(notifier, format!("{name}'s battery critical"), voltage_message(volts)));
    let critical_result = engine.evaluate(&critical_key, critical).await;

    [
        Evaluation { key: low_key, result: low_result },
        Evaluation { key: critical_key, result: critical_result },
    ]
}
