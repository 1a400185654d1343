//! Nearby-place discovery. Translates the app's filter vocabulary into
//! Google Places parameters, queries the upstream through the
//! `PlacesClient` trait and records every returned place as a restaurant.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::Json;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use foodie_core::ServiceError;
use user::model::ProfileInfo;
use user::service::UserService;

use crate::model::RestaurantData;
use crate::service::RestaurantService;

const NEARBY_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

/// Search radius ceiling, metres.
const MAX_RADIUS_M: u32 = 50_000;

/// Parameters of one nearby search, already in upstream vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceParams {
    /// "lat, lng".
    pub location: String,
    /// Metres.
    pub radius: u32,
    pub keyword: Option<String>,
    /// (minprice, maxprice), both 0..=4.
    pub price: Option<(u8, u8)>,
}

/// One place as the upstream returns it. Known fields are typed; the rest
/// of the payload rides along so the client sees the full object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub place_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vicinity: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Derive the search keyword: explicit food filters win, then the
/// profile's preferred cuisines, then nothing.
pub fn keyword(food_filters: &[String], profile: Option<&ProfileInfo>) -> Option<String> {
    if !food_filters.is_empty() {
        return Some(food_filters.join(" OR "));
    }
    match profile {
        Some(p) if !p.food_types.is_empty() => Some(p.food_types.join(" OR ")),
        _ => None,
    }
}

/// Translate price-bucket filters into the upstream 0..=4 range. The
/// buckets merge: `$` covers 0-1, `$$` covers 2-3, `$$$` covers 4-4.
/// With no bucket selected, the profile's price preference sets the
/// minimum ("none" means no constraint).
pub fn price_range(filters: &[String], profile: Option<&ProfileInfo>) -> Option<(u8, u8)> {
    let mut min: u8 = 4;
    let mut max: u8 = 0;
    for filter in filters {
        match filter.as_str() {
            "$" => {
                min = min.min(0);
                max = max.max(1);
            }
            "$$" => {
                min = min.min(2);
                max = max.max(3);
            }
            "$$$" => {
                min = min.min(4);
                max = max.max(4);
            }
            _ => {}
        }
    }
    if min <= max {
        return Some((min, max));
    }

    let price = profile.map(|p| p.price.as_str()).unwrap_or("none");
    if price.is_empty() || price == "none" {
        return None;
    }
    let floor = (price.chars().count() as u8).saturating_sub(1).min(4);
    Some((floor, 4))
}

/// Translate distance filters into a radius in metres. The tightest
/// selected bound wins; no bound means the 50 km ceiling.
pub fn radius(filters: &[String]) -> u32 {
    let mut distance = MAX_RADIUS_M;
    for filter in filters {
        let bound = match filter.as_str() {
            "Under 5 km" => 5_000,
            "Under 10 km" => 10_000,
            "Under 20 km" => 20_000,
            _ => continue,
        };
        distance = distance.min(bound);
    }
    distance
}

pub fn build_params(
    latitude: f64,
    longitude: f64,
    filters: &[String],
    food_filters: &[String],
    profile: Option<&ProfileInfo>,
) -> PlaceParams {
    PlaceParams {
        location: format!("{}, {}", latitude, longitude),
        radius: radius(filters),
        keyword: keyword(food_filters, profile),
        price: price_range(filters, profile),
    }
}

/// The upstream boundary. Production uses Google Places over reqwest;
/// tests stub it.
#[async_trait]
pub trait PlacesClient: Send + Sync {
    async fn nearby_search(&self, params: &PlaceParams) -> Result<Vec<Place>, ServiceError>;
}

/// Google Places over HTTP.
pub struct GooglePlacesClient {
    http: reqwest::Client,
    api_key: String,
}

impl GooglePlacesClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<Place>,
}

#[async_trait]
impl PlacesClient for GooglePlacesClient {
    async fn nearby_search(&self, params: &PlaceParams) -> Result<Vec<Place>, ServiceError> {
        let mut query: Vec<(&str, String)> = vec![
            ("key", self.api_key.clone()),
            ("location", params.location.clone()),
            ("radius", params.radius.to_string()),
            ("type", "restaurant".to_string()),
        ];
        if let Some(keyword) = &params.keyword {
            query.push(("keyword", keyword.clone()));
        }
        if let Some((min, max)) = params.price {
            query.push(("minprice", min.to_string()));
            query.push(("maxprice", max.to_string()));
        }

        let response = self
            .http
            .get(NEARBY_SEARCH_URL)
            .query(&query)
            .send()
            .await
            .map_err(|e| ServiceError::Unavailable(format!("places request failed: {}", e)))?;

        let body: NearbySearchResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Unavailable(format!("places response unreadable: {}", e)))?;

        if body.status != "OK" {
            return Err(ServiceError::Unavailable(format!(
                "places backend returned status {}",
                body.status
            )));
        }
        Ok(body.results)
    }
}

/// State for the places routes.
#[derive(Clone)]
pub struct PlacesState {
    pub restaurants: Arc<RestaurantService>,
    pub users: Arc<UserService>,
    pub client: Arc<dyn PlacesClient>,
}

/// Build the places router. The binary mounts it under `/api/places`.
pub fn router(state: PlacesState) -> Router {
    Router::new().route("/find", get(find)).with_state(state)
}

#[derive(Debug, Deserialize)]
struct FindQuery {
    #[serde(default)]
    latitude: Option<String>,
    #[serde(default)]
    longitude: Option<String>,
    #[serde(default)]
    filters: Option<String>,
    #[serde(default, rename = "foodFilters")]
    food_filters: Option<String>,
}

async fn find(
    State(state): State<PlacesState>,
    headers: HeaderMap,
    Query(query): Query<FindQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let email = headers
        .get("email")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ServiceError::Validation("email header is required".into()))?;

    let latitude = parse_coordinate(query.latitude.as_deref())?;
    let longitude = parse_coordinate(query.longitude.as_deref())?;
    let filters = parse_filter_list("filters", query.filters.as_deref())?;
    let food_filters = parse_filter_list("foodFilters", query.food_filters.as_deref())?;

    let user = state
        .users
        .find_by_email(email)?
        .ok_or_else(|| ServiceError::NotFound(format!("no user registered under '{}'", email)))?;

    let params = build_params(
        latitude,
        longitude,
        &filters,
        &food_filters,
        user.profile_info.as_ref(),
    );
    let results = state.client.nearby_search(&params).await?;
    if results.is_empty() {
        return Err(ServiceError::Unavailable("no places found".into()));
    }

    // One pick per request, like a dealt card.
    let index = rand::thread_rng().gen_range(0..results.len());
    let place = results[index].clone();

    // Recording the pick is best-effort; the client still gets its place.
    let record = RestaurantData {
        place_id: Some(place.place_id.clone()),
        name: place.name.clone(),
        address: place.vicinity.clone(),
        ..Default::default()
    };
    if let Err(e) = state.restaurants.upsert(record) {
        warn!("failed to record place {}: {}", place.place_id, e);
    }

    Ok(Json(serde_json::json!([place])))
}

fn parse_coordinate(raw: Option<&str>) -> Result<f64, ServiceError> {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .ok_or_else(|| ServiceError::Validation("failed to get location from request".into()))
}

fn parse_filter_list(name: &str, raw: Option<&str>) -> Result<Vec<String>, ServiceError> {
    match raw {
        None => Ok(Vec::new()),
        Some(s) => serde_json::from_str(s)
            .map_err(|_| ServiceError::Validation(format!("{} must be a JSON string array", name))),
    }
}
