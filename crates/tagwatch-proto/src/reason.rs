use std::fmt;

/// Why the collar logged a record. Codes 1..=50 as documented by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonCode {
    StartOfTrip,
    EndOfTrip,
    ElapsedTime,
    SpeedChange,
    HeadingChange,
    DistanceTravelled,
    MaximumSpeed,
    Stationary,
    DigitalInputChanged,
    DigitalOutputChanged,
    HeartbeatStatus,
    HarshBrake,
    HarshAcceleration,
    HarshCornering,
    ExternalPowerChange,
    SystemPowerMonitoring,
    DriverIdTagRead,
    Overspeed,
    FuelSensorRecord,
    TowingAlert,
    DebugMessage,
    Sdi12SensorDataRecorded,
    Accident,
    AccidentData,
    SensorValueElapsedTime,
    SensorValueChange,
    SensorAlarm,
    RainGaugeTipped,
    TamperAlert,
    BlobNotification,
    TimeAndAttendance,
    TripRestart,
    TagGained,
    TagUpdate,
    TagLost,
    RecoveryModeOn,
    RecoveryModeOff,
    ImmobiliserOn,
    ImmobiliserOff,
    GarminFmiStopResponse,
    LoneWorkerAlarm,
    DeviceCounters,
    ConnectedDeviceData,
    EnteredGeoFence,
    ExitedGeoFence,
    HighGEvent,
    Reserved,
    Duress,
    CellTowerConnection,
    BluetoothTagData,
}

pub const MIN_REASON_CODE: i64 = 1;
pub const MAX_REASON_CODE: i64 = 50;

pub const UNKNOWN_REASON_TEXT: &str = "Unknown reason";

// Indexed by code - 1.
const TABLE: [(ReasonCode, &str); 50] = [
    (ReasonCode::StartOfTrip, "Start of trip"),
    (ReasonCode::EndOfTrip, "End of trip"),
    (ReasonCode::ElapsedTime, "Elapsed time"),
    (ReasonCode::SpeedChange, "Speed change"),
    (ReasonCode::HeadingChange, "Heading change"),
    (ReasonCode::DistanceTravelled, "Distance travelled"),
    (ReasonCode::MaximumSpeed, "Maximum speed"),
    (ReasonCode::Stationary, "Stationary"),
    (ReasonCode::DigitalInputChanged, "Digital input changed"),
    (ReasonCode::DigitalOutputChanged, "Digital output changed"),
    (ReasonCode::HeartbeatStatus, "Heartbeat / Status"),
    (ReasonCode::HarshBrake, "Harsh brake"),
    (ReasonCode::HarshAcceleration, "Harsh acceleration"),
    (ReasonCode::HarshCornering, "Harsh cornering"),
    (ReasonCode::ExternalPowerChange, "External power change"),
    (ReasonCode::SystemPowerMonitoring, "System power monitoring"),
    (ReasonCode::DriverIdTagRead, "Driver ID tag read"),
    (ReasonCode::Overspeed, "Over speed"),
    (ReasonCode::FuelSensorRecord, "Fuel sensor record"),
    (ReasonCode::TowingAlert, "Towing alert"),
    (ReasonCode::DebugMessage, "Debug message"),
    (ReasonCode::Sdi12SensorDataRecorded, "SDI12 sensor data recorded"),
    (ReasonCode::Accident, "Accident"),
    (ReasonCode::AccidentData, "Accident data"),
    (ReasonCode::SensorValueElapsedTime, "Sensor value elapsed time"),
    (ReasonCode::SensorValueChange, "Sensor value change"),
    (ReasonCode::SensorAlarm, "Sensor alarm"),
    (ReasonCode::RainGaugeTipped, "Rain gauge tipped"),
    (ReasonCode::TamperAlert, "Tamper alert"),
    (ReasonCode::BlobNotification, "BLOB notification"),
    (ReasonCode::TimeAndAttendance, "Time and attendance"),
    (ReasonCode::TripRestart, "Trip restart"),
    (ReasonCode::TagGained, "Tag gained"),
    (ReasonCode::TagUpdate, "Tag update"),
    (ReasonCode::TagLost, "Tag lost"),
    (ReasonCode::RecoveryModeOn, "Recovery mode on"),
    (ReasonCode::RecoveryModeOff, "Recovery mode off"),
    (ReasonCode::ImmobiliserOn, "Immobiliser on"),
    (ReasonCode::ImmobiliserOff, "Immobiliser off"),
    (ReasonCode::GarminFmiStopResponse, "Garmin FMI stop response"),
    (ReasonCode::LoneWorkerAlarm, "Lone worker alarm"),
    (ReasonCode::DeviceCounters, "Device counters"),
    (ReasonCode::ConnectedDeviceData, "Connected device data"),
    (ReasonCode::EnteredGeoFence, "Entered geo-fence"),
    (ReasonCode::ExitedGeoFence, "Exited geo-fence"),
    (ReasonCode::HighGEvent, "High-G event"),
    (ReasonCode::Reserved, "Reserved"),
    (ReasonCode::Duress, "Duress"),
    (ReasonCode::CellTowerConnection, "Cell tower connection"),
    (ReasonCode::BluetoothTagData, "Bluetooth tag data"),
];

impl ReasonCode {
    pub fn from_code(code: i64) -> Option<Self> {
        if !(MIN_REASON_CODE..=MAX_REASON_CODE).contains(&code) {
            return None;
        }
        TABLE.get((code - 1) as usize).map(|(rc, _)| *rc)
    }

    pub fn code(self) -> i64 {
        TABLE
            .iter()
            .position(|(rc, _)| *rc == self)
            .map(|i| i as i64 + 1)
            .unwrap_or(0)
    }

    pub fn text(self) -> &'static str {
        TABLE
            .iter()
            .find(|(rc, _)| *rc == self)
            .map(|(_, text)| *text)
            .unwrap_or(UNKNOWN_REASON_TEXT)
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Human text for a raw wire code, falling back to "Unknown reason".
pub fn reason_text(code: i64) -> &'static str {
    ReasonCode::from_code(code).map_or(UNKNOWN_REASON_TEXT, ReasonCode::text)
}
