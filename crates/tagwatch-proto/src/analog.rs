//! Meaning of the numbered `AnalogueData` channels.
//!
//! The wire format only says "1", "3", "4", "5". What each number measures is
//! a firmware convention, so it is mapped once here and nowhere else.

use std::collections::BTreeMap;

use crate::lenient::LenientInt;
use crate::model::AnalogBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogChannel {
    InternalBatteryMv,
    Temperature,
    LastSignalQuality,
    LoadedVoltageMv,
}

pub const ANALOG_CHANNELS: [(&str, AnalogChannel); 4] = [
    ("1", AnalogChannel::InternalBatteryMv),
    ("3", AnalogChannel::Temperature),
    ("4", AnalogChannel::LastSignalQuality),
    ("5", AnalogChannel::LoadedVoltageMv),
];

/// Builds a block from raw channel values. Returns the wire key of the first
/// missing channel on failure.
pub(crate) fn map_channels(raw: &BTreeMap<String, LenientInt>) -> Result<AnalogBlock, &'static str> {
    let mut block = AnalogBlock {
        internal_battery_mv: 0,
        temperature: 0,
        last_signal_quality: 0,
        loaded_voltage_mv: 0,
    };
    for (key, channel) in ANALOG_CHANNELS {
        let value = raw.get(key).ok_or(key)?.0;
        match channel {
            AnalogChannel::InternalBatteryMv => block.internal_battery_mv = value,
            AnalogChannel::Temperature => block.temperature = value,
            AnalogChannel::LastSignalQuality => block.last_signal_quality = value,
            AnalogChannel::LoadedVoltageMv => block.loaded_voltage_mv = value,
        }
    }
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(pairs: &[(&str, i64)]) -> BTreeMap<String, LenientInt> {
        pairs.iter().map(|(k, v)| (k.to_string(), LenientInt(*v))).collect()
    }

    #[test]
    fn maps_numbered_channels() {
        let block = map_channels(&raw(&[("1", 4641), ("3", 3500), ("4", 8), ("5", 4500)])).unwrap();
        assert_eq!(
            block,
            AnalogBlock {
                internal_battery_mv: 4641,
                temperature: 3500,
                last_signal_quality: 8,
                loaded_voltage_mv: 4500,
            }
        );
    }

    #[test]
    fn reports_missing_channel() {
        assert_eq!(map_channels(&raw(&[("1", 4641), ("3", 3500), ("5", 4500)])), Err("4"));
    }

    #[test]
    fn ignores_extra_channels() {
        let block = map_channels(&raw(&[("1", 1), ("2", 99), ("3", 3), ("4", 4), ("5", 5)])).unwrap();
        assert_eq!(block.internal_battery_mv, 1);
        assert_eq!(block.loaded_voltage_mv, 5);
    }
}
