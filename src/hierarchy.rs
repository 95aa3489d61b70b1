//! Flattens the building → {floor, area} → device hierarchy into one device list.

use crate::models::melcloud::{Building, Device};

/// Produce a single ordered device sequence from a building list.
///
/// Per building, in input order: directly-attached devices first, then each
/// floor's devices, then each area's devices. Empty collections (including
/// ones that were null or absent on the wire) are skipped naturally. No
/// deduplication and no sorting beyond source order, so a device reachable
/// via two paths is reported twice.
pub fn flatten(buildings: Vec<Building>) -> Vec<Device> {
    let mut devices = Vec::new();
    for building in buildings {
        let structure = building.structure;
        devices.extend(structure.devices);
        for floor in structure.floors {
            devices.extend(floor.devices);
        }
        for area in structure.areas {
            devices.extend(area.devices);
        }
    }
    devices
}
