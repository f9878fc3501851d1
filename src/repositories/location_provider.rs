use std::sync::RwLock;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};
use crate::models::geo::GeoPoint;

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    Authorized,
    Denied,
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn check_authorization(&self) -> AuthorizationStatus;

    /// `None` when permission is missing or no fix has been obtained yet.
    async fn last_known_location(&self) -> Option<GeoPoint>;
}

/// Location reported by the client device, optionally seeded at startup.
pub struct ReportedLocationProvider {
    authorized: bool,
    last_known: RwLock<Option<GeoPoint>>,
}

impl ReportedLocationProvider {
    pub fn new(authorized: bool, seed: Option<GeoPoint>) -> Self {
        Self {
            authorized,
            last_known: RwLock::new(seed),
        }
    }

    pub fn report(&self, point: GeoPoint) {
        match self.last_known.write() {
            Ok(mut last_known) => *last_known = Some(point),
            Err(poisoned) => *poisoned.into_inner() = Some(point),
        }
    }
}

#[async_trait]
impl LocationProvider for ReportedLocationProvider {
    async fn check_authorization(&self) -> AuthorizationStatus {
        if self.authorized {
            info!("Location access authorized");
            AuthorizationStatus::Authorized
        } else {
            warn!("Location access denied, nearby search will not have a fix");
            AuthorizationStatus::Denied
        }
    }

    async fn last_known_location(&self) -> Option<GeoPoint> {
        if !self.authorized {
            return None;
        }
        match self.last_known.read() {
            Ok(last_known) => *last_known,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
