use crate::modules::spot::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/spots")
            .service(nearby_spots)
            .service(recommend_spots)
            .service(list_categories)
            .service(list_spots)
            .service(create_spot)
            .service(get_spot)
            .service(update_spot)
            .service(delete_spot),
    );
}
