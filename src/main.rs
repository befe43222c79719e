use actix_cors::Cors;
use actix_web::{
    self, App, HttpResponse, HttpServer, get,
    middleware::{Logger, from_fn},
    web,
};
use serde_json::json;
use std::sync::Arc;

use crate::{
    configs::{AppConfig, connect_database},
    middlewares::authentication,
    modules::{
        friend::{repository_pg::FriendRepositoryPg, service::FriendService},
        spot::{repository_pg::SpotRepositoryPg, service::SpotService},
        user::{repository_pg::UserRepositoryPg, service::UserService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Spot Share API is running" }))
}

#[get("/health")]
async fn health_check(db_pool: web::Data<sqlx::PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(db_pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(json!({ "status": "healthy", "database": "connected" })),
        Err(e) => {
            log::warn!("Health check failed: {e}");
            HttpResponse::Ok().json(json!({ "status": "degraded", "database": "unreachable" }))
        }
    }
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(health_check).service(
        web::scope("/api").configure(modules::user::route::configure).service(
            web::scope("")
                .wrap(from_fn(authentication))
                .configure(modules::spot::route::configure)
                .configure(modules::friend::route::configure),
        ),
    );
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().map_err(|e| std::io::Error::other(e.to_string()))?;
    let db_pool = connect_database(&config)
        .await
        .map_err(|e| std::io::Error::other(format!("Database connection error: {e}")))?;

    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let spot_repo = Arc::new(SpotRepositoryPg::new(db_pool.clone()));
    let friend_repo = Arc::new(FriendRepositoryPg::new(db_pool.clone()));

    let config = Arc::new(config);
    let user_service = UserService::with_dependencies(user_repo.clone(), config.clone());
    let spot_service = SpotService::with_dependencies(spot_repo, user_repo.clone());
    let friend_service = FriendService::with_dependencies(friend_repo, user_repo);

    let (ip, port) = (config.ip.clone(), config.port);
    log::info!("Starting server at http://{ip}:{port}");

    HttpServer::new(move || {
        let cors = config
            .cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::from(config.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(spot_service.clone()))
            .app_data(web::Data::new(friend_service.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .configure(routes)
    })
    .bind((ip.as_str(), port))?
    .workers(2)
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use actix_web::{dev::ServiceResponse, http::StatusCode, test};
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use uuid::Uuid;

    use super::*;
    use crate::{test::test_config, utils::Claims};

    // nothing listens on port 1, so every query fails once the acquire times out
    fn unreachable_pool() -> sqlx::PgPool {
        PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy("postgres://127.0.0.1:1/spot_share")
            .unwrap()
    }

    macro_rules! app {
        () => {{
            let pool = unreachable_pool();
            let config = Arc::new(test_config());
            let user_repo = Arc::new(UserRepositoryPg::new(pool.clone()));
            let spot_service = SpotService::with_dependencies(
                Arc::new(SpotRepositoryPg::new(pool.clone())),
                user_repo.clone(),
            );
            let friend_service = FriendService::with_dependencies(
                Arc::new(FriendRepositoryPg::new(pool.clone())),
                user_repo.clone(),
            );
            let user_service = UserService::with_dependencies(user_repo, config.clone());

            test::init_service(
                App::new()
                    .app_data(web::Data::from(config))
                    .app_data(web::Data::new(user_service))
                    .app_data(web::Data::new(spot_service))
                    .app_data(web::Data::new(friend_service))
                    .app_data(web::Data::new(pool))
                    .configure(routes),
            )
            .await
        }};
    }

    fn bearer() -> (&'static str, String) {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let token = Claims::new(&id, 60).encode(test_config().jwt_secret.as_bytes()).unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    fn authed_get(uri: &str) -> test::TestRequest {
        test::TestRequest::get().uri(uri).insert_header(bearer())
    }

    fn authed_post_json(uri: &str, body: Value) -> test::TestRequest {
        test::TestRequest::post().uri(uri).insert_header(bearer()).set_json(body)
    }

    async fn message_of(resp: ServiceResponse) -> String {
        let body: Value = test::read_body_json(resp).await;
        body["message"].as_str().unwrap_or_default().to_string()
    }

    #[actix_web::test]
    async fn health_reports_degraded_when_database_is_unreachable() {
        let app = app!();
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "status": "degraded", "database": "unreachable" }));
    }

    #[actix_web::test]
    async fn register_and_login_are_public_but_profile_routes_need_a_token() {
        let app = app!();

        for uri in ["/api/users/register", "/api/users/login"] {
            let req = test::TestRequest::post().uri(uri).set_json(json!({})).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        }

        for uri in ["/api/users/me", "/api/users/"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let err = test::try_call_service(&app, req).await.unwrap_err();
            assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[actix_web::test]
    async fn spot_and_friend_routes_need_a_token() {
        let app = app!();
        for uri in ["/api/spots/", "/api/spots/search/nearby?lat=35&lng=139", "/api/friends/"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let err = test::try_call_service(&app, req).await.unwrap_err();
            assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[actix_web::test]
    async fn create_spot_rejects_missing_mistyped_and_out_of_range_fields() {
        let app = app!();

        let missing_title = json!({ "lat": 35.0, "lng": 139.0 });
        let mistyped_lat = json!({ "title": "Cafe", "lat": "north", "lng": 139.0 });
        for body in [missing_title, mistyped_lat] {
            let req = authed_post_json("/api/spots/", body).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }

        let bad_rating = json!({ "title": "x", "lat": 35, "lng": 139, "rating": 7 });
        let req = authed_post_json("/api/spots/", bad_rating).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(message_of(resp).await.contains("Rating must be between 0 and 5"));
    }

    #[actix_web::test]
    async fn query_bounds_are_enforced() {
        let app = app!();
        let out_of_bounds = [
            "/api/spots/?page=0",
            "/api/spots/?per_page=0",
            "/api/spots/?per_page=101",
            "/api/spots/?lat=35&lng=139&radius=101",
            "/api/spots/?lat=35",
            "/api/spots/search/nearby?lat=35&lng=139&radius=51",
            "/api/spots/search/nearby?lat=35&lng=139&limit=0",
            "/api/spots/search/nearby?lat=35&lng=139&limit=51",
            "/api/spots/search/nearby?lat=91&lng=139",
            "/api/spots/recommend/for-user?user_lat=35&user_lng=139&limit=21",
            "/api/friends/search?query=a",
        ];

        for uri in out_of_bounds {
            let req = authed_get(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert!(!message_of(resp).await.is_empty(), "{uri}");
        }
    }

    #[actix_web::test]
    async fn non_finite_coordinates_are_rejected() {
        let app = app!();
        for uri in [
            "/api/spots/?lat=NaN&lng=NaN&radius=NaN",
            "/api/spots/search/nearby?lat=NaN&lng=139",
            "/api/spots/search/nearby?lat=35&lng=139&radius=NaN",
            "/api/spots/recommend/for-user?user_lat=35&user_lng=NaN",
        ] {
            let req = authed_get(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[actix_web::test]
    async fn fixed_spot_paths_are_not_taken_for_ids() {
        let app = app!();

        // reaches the nearby handler, which complains about the missing lat
        let req = authed_get("/api/spots/search/nearby?lng=139").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        // reaches the categories handler, which then fails on storage
        let req = authed_get("/api/spots/categories/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message_of(resp).await, "Internal Server Error");

        let req = authed_get("/api/spots/not-a-spot-id").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
