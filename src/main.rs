pub mod models {
    pub mod melcloud;
}

pub mod client;
pub mod config;
pub mod hierarchy;
pub mod metrics;
pub mod server;
pub mod services {
    pub mod refresh;
}

#[cfg(test)]
mod testutil;

use crate::client::MelCloudClient;
use crate::config::Config;
use crate::metrics::DeviceMetrics;
use crate::services::refresh;
use log::{error, info};
use std::sync::Arc;
use std::thread;

pub fn run() -> Result<(), String> {
    // 1) Load config
    let cfg = Config::from_env()?;
    info!(
        "Config loaded (refresh_interval={}s, listen_addr={})",
        cfg.refresh_interval.as_secs(),
        cfg.listen_addr
    );

    // 2) Log into MELCloud (single login, no re-auth on expiry)
    let mut client = MelCloudClient::new();
    client
        .login(&cfg.email, &cfg.password)
        .map_err(|e| format!("MELCloud login failed: {}", e))?;
    info!("Authenticated to MELCloud API");

    // 3) Mandatory initial refresh; a failure here aborts startup
    let metrics = Arc::new(DeviceMetrics::new());
    let count = refresh::refresh_once(&client, &metrics)
        .map_err(|e| format!("initial device refresh failed: {}", e))?;
    info!("Initial refresh published metrics for {} device(s)", count);

    // 4) Background refresh loop; per-cycle failures are logged, not fatal
    {
        let metrics = Arc::clone(&metrics);
        let interval = cfg.refresh_interval;
        thread::spawn(move || refresh::run_loop(&client, &metrics, interval));
    }

    // 5) Serve the metrics endpoint from the main thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("tokio runtime init failed: {}", e))?;
    runtime.block_on(server::run(&cfg.listen_addr, metrics))
}

fn main() {
    let loaded_env = match config::configure_env_from_cli() {
        Ok(path) => path,
        Err(err) => {
            eprintln!("fatal: {}", err);
            std::process::exit(1);
        }
    };

    // Init logging after environment so RUST_LOG from .env is respected.
    let default_filter = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(default_filter)
        .format_timestamp_secs()
        .init();

    if let Some(path) = loaded_env.as_ref() {
        info!("Environment loaded from .env file: {}", path.display());
    }

    info!(
        "melcloud-exporter {} (git {}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME_GIT_HASH")
    );
    if let Err(e) = run() {
        error!("fatal: {}", e);
        std::process::exit(1);
    }
}
