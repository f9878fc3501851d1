use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use crate::helpers::state_holder::StateHolder;
use crate::models::catalog::{Area, CatalogLoadError, ExploreState, StallWithSubArea};
use crate::repositories::catalog_repo::{stalls_with_sub_area_name, CatalogRepo};

/// Publishes the GOP catalog for the explore screens. Only the most recent
/// load may publish; starting a load supersedes any still in flight.
pub struct ExploreService {
    catalog_repo: Arc<CatalogRepo>,
    state: StateHolder<ExploreState>,
    active_load: Mutex<CancellationToken>,
}

impl ExploreService {
    pub fn new(catalog_repo: Arc<CatalogRepo>) -> Arc<Self> {
        Arc::new(Self {
            catalog_repo,
            state: StateHolder::new(ExploreState::Loading),
            active_load: Mutex::new(CancellationToken::new()),
        })
    }

    pub fn state(&self) -> ExploreState {
        self.state.current()
    }

    /// Loads the catalog on a blocking worker. A load failure is published, never fatal.
    pub fn on_start(self: &Arc<Self>) -> JoinHandle<()> {
        let token = self.begin_load();

        let service = Arc::clone(self);
        tokio::spawn(async move {
            let state = match service.load_area().await {
                Ok(area) => ExploreState::Loaded(area),
                Err(e) => ExploreState::Error(e),
            };
            service.publish_if_current(&token, state);
        })
    }

    fn begin_load(&self) -> CancellationToken {
        let mut active = self.active_load.lock().unwrap_or_else(PoisonError::into_inner);
        active.cancel();
        *active = CancellationToken::new();
        self.state.publish(ExploreState::Loading);
        active.clone()
    }

    fn publish_if_current(&self, token: &CancellationToken, state: ExploreState) {
        let _active = self.active_load.lock().unwrap_or_else(PoisonError::into_inner);
        if token.is_cancelled() {
            debug!("Dropping catalog from a superseded load");
            return;
        }
        self.state.publish(state);
    }

    async fn load_area(&self) -> Result<Area, CatalogLoadError> {
        let repo = Arc::clone(&self.catalog_repo);
        tokio::task::spawn_blocking(move || repo.load())
            .await
            .unwrap_or_else(|e| {
                warn!("Catalog loading task failed: {}", e);
                Err(CatalogLoadError::Decoding(e.to_string()))
            })
    }

    /// Flattened stalls of the loaded catalog, or the load error.
    pub async fn stalls(&self) -> Result<Vec<StallWithSubArea>, CatalogLoadError> {
        let area = match self.state.current() {
            ExploreState::Loaded(area) => area,
            ExploreState::Error(e) => return Err(e),
            ExploreState::Loading => self.load_area().await?,
        };
        Ok(stalls_with_sub_area_name(&area))
    }

    pub async fn pick_a_stall(&self) -> Result<StallWithSubArea, CatalogLoadError> {
        let repo = Arc::clone(&self.catalog_repo);
        let picked = tokio::task::spawn_blocking(move || repo.pick_random_stall())
            .await
            .unwrap_or_else(|e| {
                warn!("Stall picking task failed: {}", e);
                Err(CatalogLoadError::Decoding(e.to_string()))
            })?;
        info!("Picked {} in {}", picked.stall.name, picked.sub_area_name);
        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::catalog_repo::tests::{catalog_file, SAMPLE_CATALOG};

    #[tokio::test]
    async fn publishes_loaded_catalog() {
        let file = catalog_file(SAMPLE_CATALOG);
        let explore = ExploreService::new(Arc::new(CatalogRepo::new(file.path())));

        explore.on_start().await.unwrap();

        match explore.state() {
            ExploreState::Loaded(area) => assert_eq!(area.sub_areas.len(), 3),
            other => panic!("expected loaded catalog, got {:?}", other),
        }
        assert_eq!(explore.stalls().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn missing_catalog_is_published_as_error() {
        let explore = ExploreService::new(Arc::new(CatalogRepo::new("/missing/gop.json")));

        explore.on_start().await.unwrap();

        assert!(matches!(
            explore.state(),
            ExploreState::Error(CatalogLoadError::FileNotFound)
        ));
        assert_eq!(explore.stalls().await.unwrap_err(), CatalogLoadError::FileNotFound);
    }

    #[tokio::test]
    async fn malformed_catalog_is_published_as_decoding_error() {
        let file = catalog_file("[1, 2, 3]");
        let explore = ExploreService::new(Arc::new(CatalogRepo::new(file.path())));

        explore.on_start().await.unwrap();

        assert!(matches!(
            explore.state(),
            ExploreState::Error(CatalogLoadError::Decoding(_))
        ));
    }

    #[tokio::test]
    async fn stalls_are_available_before_the_first_load_finishes() {
        let file = catalog_file(SAMPLE_CATALOG);
        let explore = ExploreService::new(Arc::new(CatalogRepo::new(file.path())));

        assert!(matches!(explore.state(), ExploreState::Loading));
        let stalls = explore.stalls().await.unwrap();

        assert_eq!(stalls.len(), 3);
        assert_eq!(stalls[2].stall.name, "Sushi");
    }

    #[test]
    fn superseded_load_never_publishes() {
        let explore = ExploreService::new(Arc::new(CatalogRepo::new("/missing/gop.json")));

        let first = explore.begin_load();
        let second = explore.begin_load();
        assert!(first.is_cancelled());

        explore.publish_if_current(&first, ExploreState::Error(CatalogLoadError::FileNotFound));
        assert!(matches!(explore.state(), ExploreState::Loading));

        explore.publish_if_current(&second, ExploreState::Error(CatalogLoadError::NoStallsAvailable));
        assert!(matches!(
            explore.state(),
            ExploreState::Error(CatalogLoadError::NoStallsAvailable)
        ));
    }

    #[tokio::test]
    async fn overlapping_reloads_settle_on_the_latest_load() {
        let file = catalog_file(SAMPLE_CATALOG);
        let explore = ExploreService::new(Arc::new(CatalogRepo::new(file.path())));

        let first = explore.on_start();
        let second = explore.on_start();
        first.await.unwrap();
        second.await.unwrap();

        assert!(matches!(explore.state(), ExploreState::Loaded(_)));
    }

    #[tokio::test]
    async fn picks_a_stall_off_the_async_thread() {
        let file = catalog_file(SAMPLE_CATALOG);
        let explore = ExploreService::new(Arc::new(CatalogRepo::new(file.path())));

        let picked = explore.pick_a_stall().await.unwrap();

        assert!(["GOP 1", "GOP 9"].contains(&picked.sub_area_name.as_str()));
    }
}
