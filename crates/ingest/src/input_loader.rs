use std::path::Path;

use model::input::InputData;

use crate::error::BundleError;

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, BundleError> {
    let bytes = std::fs::read(path).map_err(|source| BundleError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| BundleError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn read_json_or_default<T: serde::de::DeserializeOwned + Default>(path: &Path) -> Result<T, BundleError> {
    if path.exists() {
        read_json(path)
    } else {
        Ok(T::default())
    }
}

/// Loads the curated input files from `dir` into a single [`InputData`].
/// `times.json` is optional; every other file is required.
pub fn load_input_data(dir: &str) -> Result<InputData, BundleError> {
    let dir = Path::new(dir);
    Ok(InputData {
        routes_children: read_json(&dir.join("routes_children_ids.json"))?,
        routes_parent: read_json(&dir.join("routes_parent_ids.json"))?,
        start_times: read_json(&dir.join("start_times.json"))?,
        route_lines: read_json_or_default(&dir.join("routelines.json"))?,
        client_stops: read_json(&dir.join("client_stops.json"))?,
        trip_times: {
            let path = dir.join("times.json");
            if path.exists() {
                Some(read_json(&path)?)
            } else {
                None
            }
        },
    })
}
