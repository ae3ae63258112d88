use std::sync::RwLock;
use std::time::Duration as StdDuration;

use gtfs::static_bundle;

use crate::config::Config;
use crate::error::BundleError;
use crate::input_loader::load_input_data;
use crate::state::{ScheduleData, SharedState};

/// The latest built static bundle, held as ready-to-serve zip bytes plus
/// its version string. `None` until the first successful build.
#[derive(Default)]
pub struct BundleStore {
    current: RwLock<Option<Bundle>>,
}

struct Bundle {
    zip_bytes: Vec<u8>,
    version: String,
}

impl BundleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zip_bytes(&self) -> Option<Vec<u8>> {
        self.current.read().unwrap().as_ref().map(|bundle| bundle.zip_bytes.clone())
    }

    pub fn version(&self) -> Option<String> {
        self.current.read().unwrap().as_ref().map(|bundle| bundle.version.clone())
    }
}

/// Loads input files, rebuilds the static bundle, and republishes both the
/// zip bytes and the scheduler/poller's `routes_children`/`routes_parent`/
/// `start_times` view from the same [`InputData`] snapshot.
pub fn rebuild(state: &SharedState, bundles: &BundleStore, config: &Config) -> Result<(), BundleError> {
    let input = load_input_data(&config.input_dir)?;

    state.schedule_data.replace(ScheduleData {
        route_maps: model::route::RouteMaps {
            children: input.routes_children.clone(),
            parents: input.routes_parent.clone(),
        },
        start_times: input.start_times.clone(),
    });

    let bundle = static_bundle::build(&input);
    let version = bundle.feed_info.feed_version.clone();
    let zip_bytes = static_bundle::to_zip_bytes(&bundle).map_err(BundleError::Zip)?;

    *bundles.current.write().unwrap() = Some(Bundle { zip_bytes, version: version.clone() });
    log::info!("static bundle rebuilt, version={version}");
    Ok(())
}

/// Rebuilds once a day at the same midnight window the scheduler uses,
/// independently of it. Callers are expected to have performed the initial
/// `rebuild` themselves before spawning this loop, so the scheduler and
/// poller never start against an empty `ScheduleData`.
pub async fn bundle_loop(state: &SharedState, bundles: &BundleStore, config: &Config) {
    loop {
        tokio::time::sleep(StdDuration::from_secs(30)).await;

        let now = chrono::Local::now();
        use chrono::Timelike;
        if now.hour() == 0 && (10..15).contains(&now.minute()) {
            if let Err(error) = rebuild(state, bundles, config) {
                log::error!("static bundle rebuild failed: {error}");
            }
            tokio::time::sleep(StdDuration::from_secs(3600)).await;
        }
    }
}
