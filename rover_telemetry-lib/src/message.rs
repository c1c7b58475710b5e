use serde::Serialize;

/// Connectivity reported for a rover in the registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
}

/// One row of the device listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeviceRecord {
    pub id:     String,
    pub name:   String,
    pub status: DeviceStatus,
}

impl DeviceRecord {
    pub fn new(id: &str, name: &str, status: DeviceStatus) -> Self {
        Self { id: id.into(), name: name.into(), status }
    }
}

/// A single telemetry reading, sent as one JSON text frame per tick.
///
/// Field names on the wire are `deviceId`, `ts`, `battery`, `tempC`,
/// `speed` and `event`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TelemetrySample {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    /// seconds since the unix epoch, fractional
    pub ts:        f64,
    pub battery:   u8,
    #[serde(rename = "tempC")]
    pub temp_c:    f64,
    pub speed:     f64,
    pub event:     String,
}

impl TelemetrySample {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn sample_uses_wire_field_names() {
        let sample = TelemetrySample {
            device_id: "rb-001".into(),
            ts:        1_700_000_000.25,
            battery:   72,
            temp_c:    31.4,
            speed:     0.87,
            event:     String::new(),
        };

        let value: Value = serde_json::from_str(&sample.to_json().unwrap()).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, ["battery", "deviceId", "event", "speed", "tempC", "ts"]);
        assert_eq!(obj["deviceId"], "rb-001");
        assert_eq!(obj["battery"], 72);
        assert_eq!(obj["tempC"], 31.4);
        assert_eq!(obj["event"], "");
    }

    #[test]
    fn status_serializes_lowercase() {
        let rec = DeviceRecord::new("rb-003", "Rover 003", DeviceStatus::Offline);
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"id":"rb-003","name":"Rover 003","status":"offline"}"#);
    }
}
