use actix_web::{HttpRequest, delete, get, post, put, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        spot::{
            model::{
                CategoriesResponse, CreateSpotModel, NearbyQuery, RecommendQuery,
                RecommendationResponse, SpotListQuery, SpotListResponse, SpotResponse,
                UpdateSpotModel,
            },
            repository_pg::SpotRepositoryPg,
            service::SpotService,
        },
        user::repository_pg::UserRepositoryPg,
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type SpotSvc = SpotService<SpotRepositoryPg, UserRepositoryPg>;

#[get("/")]
pub async fn list_spots(
    spot_service: web::Data<SpotSvc>,
    query: ValidatedQuery<SpotListQuery>,
    req: HttpRequest,
) -> Result<success::Success<SpotListResponse>, error::Error> {
    let viewer_id = get_claims(&req)?.sub;
    let spots = spot_service.list_spots(viewer_id, query.0).await?;
    Ok(success::Success::ok(Some(spots)).message("Spots retrieved successfully"))
}

#[get("/{id:[0-9a-fA-F-]{36}}")]
pub async fn get_spot(
    spot_service: web::Data<SpotSvc>,
    spot_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<SpotResponse>, error::Error> {
    let viewer_id = get_claims(&req)?.sub;
    let spot = spot_service.get_spot(viewer_id, spot_id.into_inner()).await?;
    Ok(success::Success::ok(Some(spot)).message("Spot retrieved successfully"))
}

#[post("/")]
pub async fn create_spot(
    spot_service: web::Data<SpotSvc>,
    body: ValidatedJson<CreateSpotModel>,
    req: HttpRequest,
) -> Result<success::Success<SpotResponse>, error::Error> {
    let owner_id = get_claims(&req)?.sub;
    let spot = spot_service.create_spot(owner_id, body.0).await?;
    Ok(success::Success::created(Some(spot)).message("Spot created successfully"))
}

#[put("/{id:[0-9a-fA-F-]{36}}")]
pub async fn update_spot(
    spot_service: web::Data<SpotSvc>,
    spot_id: web::Path<Uuid>,
    body: ValidatedJson<UpdateSpotModel>,
) -> Result<success::Success<SpotResponse>, error::Error> {
    let spot = spot_service.update_spot(spot_id.into_inner(), body.0).await?;
    Ok(success::Success::ok(Some(spot)).message("Spot updated successfully"))
}

#[delete("/{id:[0-9a-fA-F-]{36}}")]
pub async fn delete_spot(
    spot_service: web::Data<SpotSvc>,
    spot_id: web::Path<Uuid>,
) -> Result<success::Success<()>, error::Error> {
    spot_service.delete_spot(spot_id.into_inner()).await?;
    Ok(success::Success::ok(None).message("Spot deleted successfully"))
}

#[get("/search/nearby")]
pub async fn nearby_spots(
    spot_service: web::Data<SpotSvc>,
    query: ValidatedQuery<NearbyQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<SpotResponse>>, error::Error> {
    let viewer_id = get_claims(&req)?.sub;
    let spots = spot_service.nearby_spots(viewer_id, query.0).await?;
    Ok(success::Success::ok(Some(spots)).message("Nearby spots retrieved successfully"))
}

#[get("/recommend/for-user")]
pub async fn recommend_spots(
    spot_service: web::Data<SpotSvc>,
    query: ValidatedQuery<RecommendQuery>,
    req: HttpRequest,
) -> Result<success::Success<RecommendationResponse>, error::Error> {
    let viewer_id = get_claims(&req)?.sub;
    let response = spot_service.recommend_spots(viewer_id, query.0).await?;
    Ok(success::Success::ok(Some(response)).message("Recommendations retrieved successfully"))
}

#[get("/categories/")]
pub async fn list_categories(
    spot_service: web::Data<SpotSvc>,
    req: HttpRequest,
) -> Result<success::Success<CategoriesResponse>, error::Error> {
    let viewer_id = get_claims(&req)?.sub;
    let categories = spot_service.categories(viewer_id).await?;
    Ok(success::Success::ok(Some(categories)).message("Categories retrieved successfully"))
}
