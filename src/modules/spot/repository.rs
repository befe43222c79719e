use uuid::Uuid;

use crate::api::error;
use crate::modules::spot::model::{InsertSpot, SpotFilter, UpdateSpot};
use crate::modules::spot::schema::SpotEntity;

/// Every `*_visible*` method only yields spots `viewer_id` may see: public ones,
/// their own, and friends-only spots of accepted friends.
#[async_trait::async_trait]
pub trait SpotRepository {
    async fn find_visible_by_id(
        &self,
        id: &Uuid,
        viewer_id: &Uuid,
    ) -> Result<Option<SpotEntity>, error::SystemError>;

    async fn count_visible(
        &self,
        viewer_id: &Uuid,
        filter: &SpotFilter,
    ) -> Result<i64, error::SystemError>;

    /// A page of matching spots in `created_at, id` order.
    async fn find_visible_page(
        &self,
        viewer_id: &Uuid,
        filter: &SpotFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SpotEntity>, error::SystemError>;

    /// All matching spots in `created_at, id` order.
    async fn find_visible(
        &self,
        viewer_id: &Uuid,
        filter: &SpotFilter,
    ) -> Result<Vec<SpotEntity>, error::SystemError>;

    async fn find_visible_categories(
        &self,
        viewer_id: &Uuid,
    ) -> Result<Vec<String>, error::SystemError>;

    async fn create(&self, spot: &InsertSpot) -> Result<SpotEntity, error::SystemError>;

    async fn update(
        &self,
        id: &Uuid,
        spot: &UpdateSpot,
    ) -> Result<Option<SpotEntity>, error::SystemError>;

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError>;
}
