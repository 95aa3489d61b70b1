//! Periodic fetch-flatten-update cycle.

use log::{error, info};
use std::thread;
use std::time::{Duration, Instant};

use crate::client::{MelCloudClient, MelCloudError};
use crate::metrics::DeviceMetrics;

/// Run one refresh cycle: fetch the hierarchy, flatten it and overwrite the
/// metric series. Returns the number of devices observed. Any failure aborts
/// the cycle before metrics are touched, so previously published values stay
/// as they were.
pub fn refresh_once(client: &MelCloudClient, metrics: &DeviceMetrics) -> Result<usize, MelCloudError> {
    let devices = client.devices()?;
    metrics.update(&devices);
    Ok(devices.len())
}

/// Run refresh cycles forever on a fixed interval.
///
/// The caller is expected to have run (and checked) the startup cycle already;
/// here a failed cycle is logged and the next tick still fires after one full
/// interval. There is no catch-up and no backoff.
pub fn run_loop(client: &MelCloudClient, metrics: &DeviceMetrics, interval: Duration) -> ! {
    loop {
        thread::sleep(interval);

        let cycle_start = Instant::now();
        match refresh_once(client, metrics) {
            Ok(count) => info!(
                "Refreshed metrics for {} device(s) in {:?}",
                count,
                cycle_start.elapsed()
            ),
            Err(e) => error!("Refresh cycle failed: {}", e),
        }
    }
}
