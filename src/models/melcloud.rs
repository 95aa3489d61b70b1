//! Wire models for the MELCloud `Mitsubishi.Wifi.Client` API.
//!
//! Scope: types only — no client code.
//!
//! Notes
//! - Field names mirror the JSON casing used by MELCloud (mostly PascalCase,
//!   with a handful of irregular names like `DeviceID` and `BuildingId`).
//! - Every struct carries `#[serde(default)]`: missing fields decode to their
//!   zero value, while type mismatches still fail the decode.
//! - The `Floors`/`Areas`/`Devices` collections may be absent *or* null in
//!   responses; both decode to an empty vector.

use serde::{Deserialize, Deserializer, Serialize};

// =====================
// Scalar ID newtype wrappers
// =====================

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingId(pub i64);

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorId(pub i64);

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(pub i64);

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub i64);

// =====================
// Hierarchy
// =====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Building {
    #[serde(rename = "ID")]
    pub id: BuildingId,
    pub name: String,
    pub structure: Structure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Structure {
    #[serde(deserialize_with = "null_to_default")]
    pub floors: Vec<Floor>,
    #[serde(deserialize_with = "null_to_default")]
    pub areas: Vec<Area>,
    #[serde(deserialize_with = "null_to_default")]
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Floor {
    #[serde(rename = "ID")]
    pub id: FloorId,
    pub name: String,
    #[serde(rename = "BuildingId")]
    pub building_id: BuildingId,
    #[serde(deserialize_with = "null_to_default")]
    pub devices: Vec<Device>,
}

/// The access/temperature-range metadata is not used for metric mapping but
/// must survive a re-serialization round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Area {
    #[serde(rename = "ID")]
    pub id: AreaId,
    pub name: String,
    #[serde(rename = "BuildingId")]
    pub building_id: BuildingId,
    #[serde(rename = "FloorId")]
    pub floor_id: FloorId,
    pub access_level: i64,
    pub direct_access: bool,
    pub end_date: String,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub expanded: bool,
    #[serde(deserialize_with = "null_to_default")]
    pub devices: Vec<Device>,
}

/// A device entry as listed in the hierarchy, carrying the identity triple
/// used for metric labels plus the latest telemetry snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Device {
    #[serde(rename = "DeviceID")]
    pub device_id: DeviceId,
    pub device_name: String,
    #[serde(rename = "BuildingID")]
    pub building_id: BuildingId,
    #[serde(rename = "Device")]
    pub state: DeviceState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeviceState {
    pub room_temperature: f64,
    pub set_temperature: f64,
    pub power: bool,
    /// Operation mode code (1 = heat, 2 = dry, 3 = cool, 7 = vent, 8 = auto).
    pub operation_mode: i64,
    pub actual_fan_speed: i64,
    pub automatic_fan_speed: bool,
    pub current_energy_consumed: f64,
    pub demand_percentage: f64,
}

// =====================
// Login exchange
// =====================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginRequest {
    pub app_version: String,
    pub captcha_response: Option<String>,
    pub email: String,
    pub language: i64,
    pub password: String,
    pub persist: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoginResponse {
    pub error_id: Option<i64>,
    pub login_data: Option<LoginData>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoginData {
    pub context_key: String,
}

fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value = Option::<T>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_fixture() -> Vec<Building> {
        let json = std::fs::read_to_string("tests/data/list-devices.json").expect("fixture present");
        serde_json::from_str(&json).expect("parse building list")
    }

    #[test]
    fn parses_hierarchy_fixture() {
        let buildings = load_fixture();
        assert_eq!(buildings.len(), 2);

        let office = &buildings[0];
        assert_eq!(office.id, BuildingId(101));
        assert_eq!(office.name, "Main Office");
        assert_eq!(office.structure.devices.len(), 2);
        assert_eq!(office.structure.floors.len(), 1);
        assert_eq!(office.structure.areas.len(), 1);

        let lounge = &office.structure.devices[0];
        assert_eq!(lounge.device_id, DeviceId(42));
        assert_eq!(lounge.device_name, "Lounge");
        assert_eq!(lounge.building_id, BuildingId(101));
        assert!(lounge.state.power);
        assert_eq!(lounge.state.operation_mode, 3);
        assert_eq!(lounge.state.room_temperature, 21.5);
        assert_eq!(lounge.state.set_temperature, 22.0);
    }

    #[test]
    fn tolerates_null_and_absent_collections() {
        // The annex building has "Floors": null and no "Areas" key at all.
        let buildings = load_fixture();
        let annex = &buildings[1];
        assert!(annex.structure.floors.is_empty());
        assert!(annex.structure.areas.is_empty());
        assert!(annex.structure.devices.is_empty());
    }

    #[test]
    fn tolerates_missing_telemetry_fields() {
        let json = r#"{"DeviceID": 7, "DeviceName": "Hall", "BuildingID": 1, "Device": {"Power": true}}"#;
        let device: Device = serde_json::from_str(json).expect("partial device");
        assert!(device.state.power);
        assert_eq!(device.state.room_temperature, 0.0);
        assert_eq!(device.state.current_energy_consumed, 0.0);
    }

    #[test]
    fn rejects_type_mismatches() {
        let json = r#"{"DeviceID": "not-a-number", "DeviceName": "Hall", "BuildingID": 1}"#;
        assert!(serde_json::from_str::<Device>(json).is_err());
    }

    #[test]
    fn area_metadata_round_trips() {
        let buildings = load_fixture();
        let area = &buildings[0].structure.areas[0];
        assert_eq!(area.min_temperature, 16.0);
        assert_eq!(area.max_temperature, 31.0);

        let value = serde_json::to_value(area).expect("serialize area");
        assert_eq!(value["MinTemperature"], 16.0);
        assert_eq!(value["MaxTemperature"], 31.0);
        assert_eq!(value["DirectAccess"], true);
        assert_eq!(value["EndDate"], "2500-01-01T00:00:00");
    }

    #[test]
    fn login_request_uses_wire_casing() {
        let request = LoginRequest {
            app_version: "1.21.6.0".to_string(),
            captcha_response: None,
            email: "user@example.com".to_string(),
            language: 0,
            password: "hunter2".to_string(),
            persist: false,
        };
        let value = serde_json::to_value(&request).expect("serialize login request");
        assert_eq!(value["AppVersion"], "1.21.6.0");
        assert_eq!(value["CaptchaResponse"], serde_json::Value::Null);
        assert_eq!(value["Email"], "user@example.com");
        assert_eq!(value["Persist"], false);
    }
}
