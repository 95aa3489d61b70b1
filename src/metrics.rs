//! Prometheus series for MELCloud device telemetry.

use prometheus::{
    Counter, Encoder, GaugeVec, Registry, TextEncoder, register_counter_with_registry,
    register_gauge_vec_with_registry,
};

use crate::models::melcloud::Device;

const DEVICE_LABEL_NAMES: &[&str] = &["building_id", "device_id", "device_name"];

/// One labeled gauge per telemetry field, keyed by the device identity triple
/// (building id, device id, device name), plus a single unlabeled counter for
/// energy. Gauges are overwritten each refresh cycle; the energy counter is
/// incremented with each cycle's reported value.
pub struct DeviceMetrics {
    power: GaugeVec,
    mode: GaugeVec,
    temperature_room: GaugeVec,
    temperature_set: GaugeVec,
    automatic_fan_speed: GaugeVec,
    fan_speed: GaugeVec,
    demand_percentage: GaugeVec,
    energy_consumed: Counter,
    registry: Registry,
}

impl DeviceMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let power = register_gauge_vec_with_registry!(
            "melcloud_device_power",
            "Whether the device is powered on",
            DEVICE_LABEL_NAMES,
            registry
        )
        .unwrap();

        let mode = register_gauge_vec_with_registry!(
            "melcloud_device_mode",
            "The mode that the device is operating in (1 = heat, 2 = dry, 3 = cool, 7 = vent, 8 = auto)",
            DEVICE_LABEL_NAMES,
            registry
        )
        .unwrap();

        let temperature_room = register_gauge_vec_with_registry!(
            "melcloud_device_temperature_room",
            "The current temperature in the room a device is in",
            DEVICE_LABEL_NAMES,
            registry
        )
        .unwrap();

        let temperature_set = register_gauge_vec_with_registry!(
            "melcloud_device_temperature_set",
            "The temperature that the device targets to achieve in the room it is in",
            DEVICE_LABEL_NAMES,
            registry
        )
        .unwrap();

        let automatic_fan_speed = register_gauge_vec_with_registry!(
            "melcloud_device_auto_fan_speed",
            "If the device has auto fan speed enabled",
            DEVICE_LABEL_NAMES,
            registry
        )
        .unwrap();

        let fan_speed = register_gauge_vec_with_registry!(
            "melcloud_device_fan_speed",
            "The speed of the fan in the device",
            DEVICE_LABEL_NAMES,
            registry
        )
        .unwrap();

        let demand_percentage = register_gauge_vec_with_registry!(
            "melcloud_device_demand_percentage",
            "The demand percentage of the device",
            DEVICE_LABEL_NAMES,
            registry
        )
        .unwrap();

        let energy_consumed = register_counter_with_registry!(
            "melcloud_device_current_energy_consumed",
            "The current energy consumed by devices",
            registry
        )
        .unwrap();

        DeviceMetrics {
            power,
            mode,
            temperature_room,
            temperature_set,
            automatic_fan_speed,
            fan_speed,
            demand_percentage,
            energy_consumed,
            registry,
        }
    }

    /// Overwrite every gauge with the latest snapshot and accumulate energy.
    ///
    /// Devices sharing an identity triple collide last-write-wins. The energy
    /// counter sums the per-cycle reported value across all devices, so
    /// running an update twice with the same snapshot double-counts energy.
    pub fn update(&self, devices: &[Device]) {
        for device in devices {
            let building_id = device.building_id.0.to_string();
            let device_id = device.device_id.0.to_string();
            let labels = [building_id.as_str(), device_id.as_str(), device.device_name.as_str()];

            let state = &device.state;
            self.power.with_label_values(&labels).set(bool_gauge(state.power));
            self.mode.with_label_values(&labels).set(state.operation_mode as f64);
            self.temperature_room.with_label_values(&labels).set(state.room_temperature);
            self.temperature_set.with_label_values(&labels).set(state.set_temperature);
            self.automatic_fan_speed
                .with_label_values(&labels)
                .set(bool_gauge(state.automatic_fan_speed));
            self.fan_speed.with_label_values(&labels).set(state.actual_fan_speed as f64);
            self.demand_percentage
                .with_label_values(&labels)
                .set(state.demand_percentage);

            // Counter increments must be non-negative.
            if state.current_energy_consumed > 0.0 {
                self.energy_consumed.inc_by(state.current_energy_consumed);
            }
        }
    }

    /// Render every registered series in Prometheus text exposition format.
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }
}

impl Default for DeviceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn bool_gauge(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}
