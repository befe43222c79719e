use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    api::error,
    constants::{
        DEFAULT_NEARBY_LIMIT, DEFAULT_NEARBY_RADIUS_KM, DEFAULT_PAGE, DEFAULT_PER_PAGE,
        DEFAULT_RECOMMEND_LIMIT,
    },
    modules::spot::{
        proximity::{BoundingBox, GeoPoint},
        schema::{SpotEntity, Visibility},
    },
    utils::double_option,
};

#[derive(Deserialize, Validate)]
pub struct CreateSpotModel {
    #[validate(length(min = 1, max = 100, message = "Title must be 1 to 100 characters long"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(max = 50, message = "Category must be at most 50 characters long"))]
    pub category: Option<String>,
    #[serde(alias = "lat")]
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[serde(alias = "lng")]
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,
    #[validate(length(max = 200, message = "Address must be at most 200 characters long"))]
    pub address: Option<String>,
    pub visibility: Option<Visibility>,
}

#[derive(Deserialize, Validate)]
pub struct UpdateSpotModel {
    #[validate(length(min = 1, max = 100, message = "Title must be 1 to 100 characters long"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 50, message = "Category must be at most 50 characters long"))]
    pub category: Option<Option<String>>,
    #[serde(alias = "lat")]
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[serde(alias = "lng")]
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 200, message = "Address must be at most 200 characters long"))]
    pub address: Option<Option<String>>,
    pub visibility: Option<Visibility>,
}

pub struct InsertSpot {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: f64,
    pub address: Option<String>,
    pub visibility: Visibility,
    pub owner_id: Uuid,
}

pub struct UpdateSpot {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub address: Option<Option<String>>,
    pub visibility: Option<Visibility>,
}

impl UpdateSpot {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.rating.is_none()
            && self.address.is_none()
            && self.visibility.is_none()
    }
}

impl From<UpdateSpotModel> for UpdateSpot {
    fn from(model: UpdateSpotModel) -> Self {
        UpdateSpot {
            title: model.title,
            description: model.description,
            category: model.category,
            latitude: model.latitude,
            longitude: model.longitude,
            rating: model.rating,
            address: model.address,
            visibility: model.visibility,
        }
    }
}

/// Conditions applied by the storage layer before any distance math.
#[derive(Debug, Clone, Default)]
pub struct SpotFilter {
    pub category: Option<String>,
    pub min_rating: Option<f64>,
    pub bounds: Option<BoundingBox>,
}

// range checks alone let NaN through
fn finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite").with_message("Must be a finite number".into()))
    }
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

#[derive(Debug, Deserialize, Validate)]
pub struct SpotListQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: u32,
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 100, message = "per_page must be between 1 and 100"))]
    pub per_page: u32,
    pub category: Option<String>,
    #[validate(range(min = -90.0, max = 90.0), custom(function = "finite"))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0), custom(function = "finite"))]
    pub lng: Option<f64>,
    #[validate(
        range(min = 0.0, max = 100.0, message = "Radius must be between 0 and 100 km"),
        custom(function = "finite")
    )]
    pub radius: Option<f64>,
}

impl SpotListQuery {
    pub fn geo_filter(&self) -> Result<Option<(GeoPoint, f64)>, error::SystemError> {
        match (self.lat, self.lng, self.radius) {
            (Some(lat), Some(lng), Some(radius)) => Ok(Some((GeoPoint::new(lat, lng), radius))),
            (None, None, None) => Ok(None),
            _ => Err(error::SystemError::bad_request(
                "lat, lng and radius must be provided together",
            )),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.per_page as usize)
    }
}

fn default_nearby_radius() -> f64 {
    DEFAULT_NEARBY_RADIUS_KM
}

fn default_nearby_limit() -> usize {
    DEFAULT_NEARBY_LIMIT
}

#[derive(Debug, Deserialize, Validate)]
pub struct NearbyQuery {
    #[validate(range(min = -90.0, max = 90.0), custom(function = "finite"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0), custom(function = "finite"))]
    pub lng: f64,
    #[serde(default = "default_nearby_radius")]
    #[validate(
        range(min = 0.1, max = 50.0, message = "Radius must be between 0.1 and 50 km"),
        custom(function = "finite")
    )]
    pub radius: f64,
    #[serde(default = "default_nearby_limit")]
    #[validate(range(min = 1, max = 50, message = "Limit must be between 1 and 50"))]
    pub limit: usize,
}

fn default_recommend_limit() -> usize {
    DEFAULT_RECOMMEND_LIMIT
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecommendQuery {
    #[validate(range(min = -90.0, max = 90.0), custom(function = "finite"))]
    pub user_lat: f64,
    #[validate(range(min = -180.0, max = 180.0), custom(function = "finite"))]
    pub user_lng: f64,
    #[serde(default = "default_recommend_limit")]
    #[validate(range(min = 1, max = 20, message = "Limit must be between 1 and 20"))]
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: f64,
    pub address: Option<String>,
    pub visibility: Visibility,
    pub owner_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl SpotResponse {
    pub fn with_distance(mut self, distance_km: f64) -> Self {
        self.distance_km = Some(distance_km);
        self
    }
}

impl From<SpotEntity> for SpotResponse {
    fn from(entity: SpotEntity) -> Self {
        SpotResponse {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            category: entity.category,
            latitude: entity.latitude,
            longitude: entity.longitude,
            rating: entity.rating,
            address: entity.address,
            visibility: entity.visibility,
            owner_id: entity.owner_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            distance_km: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SpotListResponse {
    pub spots: Vec<SpotResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Serialize)]
pub struct RecommendedSpot {
    #[serde(flatten)]
    pub spot: SpotResponse,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendedSpot>,
    pub algorithm: &'static str,
    pub user_location: GeoPoint,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}
