use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use crate::helpers::debounce::Debouncer;
use crate::helpers::geo_filter;
use crate::helpers::price_level::price_label;
use crate::helpers::state_holder::StateHolder;
use crate::models::geo::{GeoPoint, Region};
use crate::models::nearby::{NearbyResult, SearchError, SearchInput, SearchInputError, SearchState};
use crate::models::place::{Photo, PhotoRef, PlaceCandidate, PlaceProperty, PlaceType};
use crate::repositories::location_provider::LocationProvider;
use crate::repositories::places_gateway::{
    GatewayError, NearbySearchRequest, PhotoRequest, PlacesGateway, TextSearchRequest,
};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_RESULT_LIMIT: u32 = 10;
pub const DEFAULT_PHOTO_MAX_PX: u32 = 512;

#[derive(Clone, Debug)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub default_radius_km: f64,
    pub result_limit: u32,
    pub photo_max_px: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            default_radius_km: SearchInput::default().radius_km,
            result_limit: DEFAULT_RESULT_LIMIT,
            photo_max_px: DEFAULT_PHOTO_MAX_PX,
        }
    }
}

/// Owns the nearby search input and its published state.
///
/// Text edits are debounced, radius edits start a cycle straight away, and
/// unchanged values are ignored. Each cycle carries its own cancellation
/// token; starting a new cycle cancels the previous one, and a cancelled
/// cycle never publishes. Only the active cycle writes to the state.
pub struct NearbySearchService {
    places_gateway: Arc<dyn PlacesGateway>,
    location_provider: Arc<dyn LocationProvider>,
    settings: SearchSettings,
    input: Mutex<SearchInput>,
    state: StateHolder<SearchState>,
    active_cycle: Mutex<CancellationToken>,
    text_debouncer: Debouncer,
}

impl NearbySearchService {
    pub fn new(
        places_gateway: Arc<dyn PlacesGateway>,
        location_provider: Arc<dyn LocationProvider>,
        settings: SearchSettings,
    ) -> Arc<Self> {
        let input = SearchInput {
            text: String::new(),
            radius_km: settings.default_radius_km,
        };

        Arc::new(Self {
            places_gateway,
            location_provider,
            text_debouncer: Debouncer::new(settings.debounce),
            settings,
            input: Mutex::new(input),
            state: StateHolder::new(SearchState::Loading),
            active_cycle: Mutex::new(CancellationToken::new()),
        })
    }

    pub fn input(&self) -> SearchInput {
        self.input.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn state(&self) -> SearchState {
        self.state.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Returns `false` when the text is unchanged and nothing was scheduled.
    pub fn set_text(self: &Arc<Self>, text: impl Into<String>) -> bool {
        let text = text.into();
        {
            let mut input = self.input.lock().unwrap_or_else(PoisonError::into_inner);
            if input.text == text {
                return false;
            }
            input.text = text;
        }

        let service = Arc::clone(self);
        self.text_debouncer.schedule(async move {
            if let Err(e) = service.start_cycle().await {
                warn!("Nearby search cycle ended abnormally: {}", e);
            }
        });
        true
    }

    /// Returns `Ok(false)` when the radius is unchanged and no cycle was started.
    pub fn set_radius(self: &Arc<Self>, radius_km: f64) -> Result<bool, SearchInputError> {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(SearchInputError::InvalidRadius(radius_km));
        }
        {
            let mut input = self.input.lock().unwrap_or_else(PoisonError::into_inner);
            if input.radius_km == radius_km {
                return Ok(false);
            }
            input.radius_km = radius_km;
        }

        self.start_cycle();
        Ok(true)
    }

    pub async fn on_start(self: &Arc<Self>) -> JoinHandle<()> {
        let status = self.location_provider.check_authorization().await;
        debug!("Location authorization on start: {:?}", status);
        self.start_cycle()
    }

    /// Supersedes any running cycle and starts a new one with the current input.
    pub fn start_cycle(self: &Arc<Self>) -> JoinHandle<()> {
        let input = self.input();
        let token = {
            let mut active = self.active_cycle.lock().unwrap_or_else(PoisonError::into_inner);
            active.cancel();
            *active = CancellationToken::new();
            self.state.publish(SearchState::Loading);
            active.clone()
        };
        info!("Starting nearby search for {:?} within {} km", input.text, input.radius_km);

        let service = Arc::clone(self);
        tokio::spawn(async move {
            match service.run_cycle(&input, &token).await {
                Some(outcome) => service.publish_if_active(&token, outcome),
                None => debug!("Nearby search for {:?} was superseded", input.text),
            }
        })
    }

    fn publish_if_active(&self, token: &CancellationToken, state: SearchState) {
        let _active = self.active_cycle.lock().unwrap_or_else(PoisonError::into_inner);
        if token.is_cancelled() {
            debug!("Dropping state from a superseded search");
            return;
        }
        self.state.publish(state);
    }

    /// Returns `None` once the cycle has been cancelled.
    async fn run_cycle(&self, input: &SearchInput, token: &CancellationToken) -> Option<SearchState> {
        let location = tokio::select! {
            biased;
            _ = token.cancelled() => return None,
            location = self.location_provider.last_known_location() => location,
        };
        let Some(center) = location else {
            warn!("No location fix available for nearby search");
            return Some(SearchState::Error(SearchError::LocationUnavailable));
        };

        let region = Region::new(center, input.radius_km);
        let search_res = tokio::select! {
            biased;
            _ = token.cancelled() => return None,
            res = self.search(&input.text, region) => res,
        };

        let candidates = match search_res {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Nearby search failed due to: {}", e);
                return Some(SearchState::Error(SearchError::Gateway {
                    message: e.to_string(),
                }));
            }
        };

        let in_range = geo_filter::retain_within(candidates, &center, input.radius_km);
        debug!("{} places within {} km", in_range.len(), input.radius_km);

        let results = join_all(
            in_range
                .into_iter()
                .map(|candidate| self.enrich(candidate, &center, token)),
        )
        .await;

        if token.is_cancelled() {
            return None;
        }
        Some(SearchState::Loaded(results))
    }

    async fn search(&self, text: &str, region: Region) -> Result<Vec<PlaceCandidate>, GatewayError> {
        if text.is_empty() {
            let request = NearbySearchRequest {
                region,
                included_types: vec![PlaceType::Restaurant, PlaceType::Cafe],
                properties: PlaceProperty::SEARCH_DEFAULTS.to_vec(),
                max_result_count: self.settings.result_limit,
            };
            self.places_gateway.search_nearby(&request).await
        } else {
            let request = TextSearchRequest {
                text_query: text.to_string(),
                region,
                included_type: PlaceType::Restaurant,
                properties: PlaceProperty::SEARCH_DEFAULTS.to_vec(),
                max_result_count: self.settings.result_limit,
                open_now: true,
            };
            self.places_gateway.search_by_text(&request).await
        }
    }

    async fn enrich(
        &self,
        candidate: PlaceCandidate,
        center: &GeoPoint,
        token: &CancellationToken,
    ) -> NearbyResult {
        let photo = match &candidate.photo_ref {
            Some(photo_ref) => self.fetch_first_photo(photo_ref, token).await,
            None => None,
        };

        NearbyResult {
            distance_km: geo_filter::distance_km(&candidate.location, center),
            price_label: price_label(candidate.price_level).map(str::to_string),
            id: candidate.id,
            display_name: candidate.display_name,
            location: candidate.location,
            photo,
        }
    }

    async fn fetch_first_photo(&self, photo_ref: &PhotoRef, token: &CancellationToken) -> Option<Photo> {
        let request = PhotoRequest {
            photo: photo_ref.clone(),
            max_width_px: self.settings.photo_max_px,
            max_height_px: self.settings.photo_max_px,
        };

        let photo_res = tokio::select! {
            biased;
            _ = token.cancelled() => return None,
            res = self.places_gateway.fetch_photo(&request) => res,
        };

        match photo_res {
            Ok(photo) => Some(photo),
            Err(e) => {
                warn!("Error fetching photo {}: {}", photo_ref.0, e);
                None
            }
        }
    }
}
