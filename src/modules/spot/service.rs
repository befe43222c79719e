use std::collections::BTreeSet;
use std::sync::Arc;

use log::info;
use uuid::Uuid;

use crate::{
    api::error,
    constants::{DEFAULT_CATEGORIES, RECOMMEND_ALGORITHM},
    modules::{
        spot::{
            model::{
                CategoriesResponse, CreateSpotModel, InsertSpot, NearbyQuery, RecommendQuery,
                RecommendationResponse, RecommendedSpot, SpotFilter, SpotListQuery,
                SpotListResponse, SpotResponse, UpdateSpot, UpdateSpotModel,
            },
            proximity::{self, GeoPoint, RECOMMEND_MIN_RATING, RECOMMEND_RADIUS_KM},
            repository::SpotRepository,
        },
        user::repository::UserRepository,
    },
};

#[derive(Clone)]
pub struct SpotService<S, U>
where
    S: SpotRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    spot_repo: Arc<S>,
    user_repo: Arc<U>,
}

impl<S, U> SpotService<S, U>
where
    S: SpotRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(spot_repo: Arc<S>, user_repo: Arc<U>) -> Self {
        info!("SpotService initialized with dependencies");
        SpotService { spot_repo, user_repo }
    }

    pub async fn list_spots(
        &self,
        viewer_id: Uuid,
        query: SpotListQuery,
    ) -> Result<SpotListResponse, error::SystemError> {
        let geo = query.geo_filter()?;
        let filter = SpotFilter {
            category: query.category.clone().filter(|c| !c.is_empty()),
            min_rating: None,
            bounds: geo.and_then(|(center, radius)| proximity::bounding_box(center, radius)),
        };
        let offset = query.offset();
        let per_page = query.per_page as usize;

        let (total, spots) = match geo {
            None => {
                let (total, page) = tokio::try_join!(
                    self.spot_repo.count_visible(&viewer_id, &filter),
                    self.spot_repo.find_visible_page(
                        &viewer_id,
                        &filter,
                        per_page as i64,
                        offset as i64
                    ),
                )?;
                (total, page.into_iter().map(SpotResponse::from).collect())
            }
            // distance is only known after loading, so the radius cut happens
            // before paginating in memory
            Some((center, radius)) => {
                let candidates = self.spot_repo.find_visible(&viewer_id, &filter).await?;
                let matched = proximity::within_radius(center, candidates, radius);
                let total = matched.len() as i64;
                let page = matched
                    .into_iter()
                    .skip(offset)
                    .take(per_page)
                    .map(|r| SpotResponse::from(r.item).with_distance(r.distance_km))
                    .collect();
                (total, page)
            }
        };

        Ok(SpotListResponse { spots, total, page: query.page, per_page: query.per_page })
    }

    pub async fn get_spot(
        &self,
        viewer_id: Uuid,
        spot_id: Uuid,
    ) -> Result<SpotResponse, error::SystemError> {
        self.spot_repo
            .find_visible_by_id(&spot_id, &viewer_id)
            .await?
            .map(SpotResponse::from)
            .ok_or_else(|| error::SystemError::not_found("Spot not found"))
    }

    pub async fn create_spot(
        &self,
        owner_id: Uuid,
        spot: CreateSpotModel,
    ) -> Result<SpotResponse, error::SystemError> {
        let owner = self.user_repo.find_by_id(&owner_id).await?;
        if !owner.is_some_and(|user| user.is_active) {
            return Err(error::SystemError::bad_request("Owner account does not exist"));
        }

        let new_spot = InsertSpot {
            title: spot.title,
            description: spot.description,
            category: spot.category,
            latitude: spot.latitude,
            longitude: spot.longitude,
            rating: spot.rating.unwrap_or(0.0),
            address: spot.address,
            visibility: spot.visibility.unwrap_or_default(),
            owner_id,
        };

        let created = self.spot_repo.create(&new_spot).await?;
        info!("Spot {} created by {}", created.id, owner_id);
        Ok(SpotResponse::from(created))
    }

    pub async fn update_spot(
        &self,
        spot_id: Uuid,
        spot: UpdateSpotModel,
    ) -> Result<SpotResponse, error::SystemError> {
        let update = UpdateSpot::from(spot);
        if update.is_empty() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        self.spot_repo
            .update(&spot_id, &update)
            .await?
            .map(SpotResponse::from)
            .ok_or_else(|| error::SystemError::not_found("Spot not found"))
    }

    pub async fn delete_spot(&self, spot_id: Uuid) -> Result<(), error::SystemError> {
        if !self.spot_repo.delete(&spot_id).await? {
            return Err(error::SystemError::not_found("Spot not found"));
        }
        info!("Spot {} deleted", spot_id);
        Ok(())
    }

    pub async fn nearby_spots(
        &self,
        viewer_id: Uuid,
        query: NearbyQuery,
    ) -> Result<Vec<SpotResponse>, error::SystemError> {
        let origin = GeoPoint::new(query.lat, query.lng);
        let filter = SpotFilter {
            bounds: proximity::bounding_box(origin, query.radius),
            ..Default::default()
        };

        let candidates = self.spot_repo.find_visible(&viewer_id, &filter).await?;
        Ok(proximity::nearby(origin, candidates, query.radius, query.limit)
            .into_iter()
            .map(|r| SpotResponse::from(r.item).with_distance(r.distance_km))
            .collect())
    }

    pub async fn recommend_spots(
        &self,
        viewer_id: Uuid,
        query: RecommendQuery,
    ) -> Result<RecommendationResponse, error::SystemError> {
        let origin = GeoPoint::new(query.user_lat, query.user_lng);
        let filter = SpotFilter {
            category: None,
            min_rating: Some(RECOMMEND_MIN_RATING),
            bounds: proximity::bounding_box(origin, RECOMMEND_RADIUS_KM),
        };

        let candidates = self.spot_repo.find_visible(&viewer_id, &filter).await?;
        let recommendations = proximity::recommend(origin, candidates, query.limit)
            .into_iter()
            .map(|s| RecommendedSpot {
                spot: SpotResponse::from(s.item).with_distance(s.distance_km),
                score: s.score,
            })
            .collect();

        Ok(RecommendationResponse {
            recommendations,
            algorithm: RECOMMEND_ALGORITHM,
            user_location: origin,
        })
    }

    pub async fn categories(&self, viewer_id: Uuid) -> Result<CategoriesResponse, error::SystemError> {
        let used = self.spot_repo.find_visible_categories(&viewer_id).await?;
        let categories: BTreeSet<String> = used
            .into_iter()
            .filter(|c| !c.is_empty())
            .chain(DEFAULT_CATEGORIES.iter().map(|c| c.to_string()))
            .collect();
        Ok(CategoriesResponse { categories: categories.into_iter().collect() })
    }
}
