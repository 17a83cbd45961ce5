use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::Sectors;

/// Load the static sector list.
///
/// A missing or malformed file is not fatal: the briefing is written with an
/// empty sector map instead.
pub fn load_sectors(path: &Path) -> Sectors {
    match try_load_sectors(path) {
        Ok(sectors) => {
            debug!(path = %path.display(), count = sectors.len(), "loaded sectors");
            sectors
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "sectors unavailable, using empty list");
            Sectors::new()
        }
    }
}

fn try_load_sectors(path: &Path) -> Result<Sectors> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn sector_order(sectors: &Sectors) -> Vec<String> {
    sectors.keys().map(ToOwned::to_owned).collect()
}
