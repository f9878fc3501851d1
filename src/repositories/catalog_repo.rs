use std::io::ErrorKind;
use std::path::PathBuf;
use rand::seq::SliceRandom;
use tracing::{info, warn};
use crate::models::catalog::{Area, CatalogLoadError, StallWithSubArea};

/// Reads the bundled stall catalog from disk.
pub struct CatalogRepo {
    path: PathBuf,
}

impl CatalogRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Area, CatalogLoadError> {
        let raw = std::fs::read(&self.path).map_err(|e| {
            warn!("Failed to read catalog at {}: {}", self.path.display(), e);
            match e.kind() {
                ErrorKind::NotFound => CatalogLoadError::FileNotFound,
                _ => CatalogLoadError::Decoding(e.to_string()),
            }
        })?;

        let area: Area = serde_json::from_slice(&raw).map_err(|e| {
            warn!("Failed to decode catalog at {}: {}", self.path.display(), e);
            CatalogLoadError::Decoding(e.to_string())
        })?;

        info!(
            "Loaded catalog {} with {} sub areas",
            area.name,
            area.sub_areas.len()
        );
        Ok(area)
    }

    pub fn pick_random_stall(&self) -> Result<StallWithSubArea, CatalogLoadError> {
        let area = self.load()?;
        stalls_with_sub_area_name(&area)
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(CatalogLoadError::NoStallsAvailable)
    }
}

/// Every stall in catalog order, paired with the name of its sub area.
pub fn stalls_with_sub_area_name(area: &Area) -> Vec<StallWithSubArea> {
    let mut stalls = Vec::with_capacity(
        area.sub_areas.iter().map(|sub_area| sub_area.stalls.len()).sum(),
    );
    for sub_area in &area.sub_areas {
        for stall in &sub_area.stalls {
            stalls.push(StallWithSubArea {
                sub_area_name: sub_area.name.clone(),
                stall: stall.clone(),
            });
        }
    }
    stalls
}
