use anyhow::Result;

use crate::BatteryCfg;

pub fn check_battery(cfg: &BatteryCfg) -> Result<()> {
    anyhow::ensure!(cfg.low_v > 0.0 && cfg.low_v < 10.0, "battery.low_v out of range");
    anyhow::ensure!(cfg.critical_v > 0.0, "battery.critical_v must be positive");
    anyhow::ensure!(cfg.critical_v < cfg.low_v, "battery.critical_v must be below battery.low_v");
    anyhow::ensure!(cfg.hysteresis_v > 0.0 && cfg.hysteresis_v < 1.0, "battery.hysteresis_v should be 0..1 V");
    anyhow::ensure!(
        cfg.waking_start_hour <= 23 && cfg.waking_end_hour <= 23,
        "battery waking hours should be 0..23"
    );
    anyhow::ensure!(
        (-12..=14).contains(&cfg.utc_offset_hours),
        "battery.utc_offset_hours should be -12..14"
    );
    Ok(())
}
