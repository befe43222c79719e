//! Great-circle distance and the two ranking modes built on it.
//!
//! Everything here is pure: candidates come in, ranked candidates go out.
//! Sorting is stable, so equal distances or scores keep their input order.

use serde::Serialize;

use crate::modules::spot::schema::SpotEntity;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const RECOMMEND_MIN_RATING: f64 = 3.0;
pub const RECOMMEND_RADIUS_KM: f64 = 10.0;

// keeps points sitting exactly on the circle inside the SQL prefilter
const BOUNDS_PADDING_DEG: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

pub trait Located {
    fn location(&self) -> GeoPoint;
}

pub trait Rated {
    fn rating(&self) -> f64;
}

#[derive(Debug, Clone)]
pub struct Ranked<T> {
    pub item: T,
    pub distance_km: f64,
}

#[derive(Debug, Clone)]
pub struct Scored<T> {
    pub item: T,
    pub distance_km: f64,
    pub score: f64,
}

/// Haversine distance in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }
}

/// Smallest lat/lng rectangle enclosing every point within `radius_km` of `center`.
///
/// Returns `None` when the circle reaches a pole or crosses the antimeridian; callers
/// then skip the prefilter and rely on the exact distance check alone.
pub fn bounding_box(center: GeoPoint, radius_km: f64) -> Option<BoundingBox> {
    let angular = radius_km / EARTH_RADIUS_KM;
    let lat_delta = angular.to_degrees() + BOUNDS_PADDING_DEG;

    let min_lat = center.lat - lat_delta;
    let max_lat = center.lat + lat_delta;
    if min_lat <= -90.0 || max_lat >= 90.0 {
        return None;
    }

    let ratio = angular.sin() / center.lat.to_radians().cos();
    if !(0.0..1.0).contains(&ratio) {
        return None;
    }
    let lng_delta = ratio.asin().to_degrees() + BOUNDS_PADDING_DEG;

    let min_lng = center.lng - lng_delta;
    let max_lng = center.lng + lng_delta;
    if min_lng < -180.0 || max_lng > 180.0 {
        return None;
    }

    Some(BoundingBox { min_lat, max_lat, min_lng, max_lng })
}

/// Candidates no farther than `radius_km`, in input order.
pub fn within_radius<T, I>(origin: GeoPoint, candidates: I, radius_km: f64) -> Vec<Ranked<T>>
where
    T: Located,
    I: IntoIterator<Item = T>,
{
    candidates
        .into_iter()
        .filter_map(|item| {
            let distance_km = haversine_km(origin, item.location());
            (distance_km <= radius_km).then_some(Ranked { item, distance_km })
        })
        .collect()
}

/// Closest candidates first, at most `limit` of them.
pub fn nearby<T, I>(origin: GeoPoint, candidates: I, radius_km: f64, limit: usize) -> Vec<Ranked<T>>
where
    T: Located,
    I: IntoIterator<Item = T>,
{
    let mut ranked = within_radius(origin, candidates, radius_km);
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(limit);
    ranked
}

/// Well-rated candidates within [`RECOMMEND_RADIUS_KM`], best score first.
///
/// `score = rating * (10 - distance) / 10`, so a spot loses a tenth of its rating
/// per kilometre.
pub fn recommend<T, I>(origin: GeoPoint, candidates: I, limit: usize) -> Vec<Scored<T>>
where
    T: Located + Rated,
    I: IntoIterator<Item = T>,
{
    let mut scored: Vec<Scored<T>> = within_radius(origin, candidates, RECOMMEND_RADIUS_KM)
        .into_iter()
        .filter(|ranked| ranked.item.rating() >= RECOMMEND_MIN_RATING)
        .map(|Ranked { item, distance_km }| {
            let score = item.rating() * (RECOMMEND_RADIUS_KM - distance_km) / RECOMMEND_RADIUS_KM;
            Scored { item, distance_km, score }
        })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}

impl Located for SpotEntity {
    fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl Rated for SpotEntity {
    fn rating(&self) -> f64 {
        self.rating
    }
}
