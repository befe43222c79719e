use sqlx::{Postgres, postgres::PgArguments, query::QueryAs};
use uuid::Uuid;

use crate::{
    api::error,
    modules::spot::{
        model::{InsertSpot, SpotFilter, UpdateSpot},
        repository::SpotRepository,
        schema::SpotEntity,
    },
};

// $1 is always the viewer
const VISIBLE_TO_VIEWER: &str = r#"
    (
        s.visibility = 'public'
        OR s.owner_id = $1
        OR EXISTS (
            SELECT 1 FROM friendships f
            WHERE f.status = 'accepted'
            AND (
                (f.requester_id = $1 AND f.requested_id = s.owner_id)
                OR (f.requested_id = $1 AND f.requester_id = s.owner_id)
            )
        )
    )
"#;

// $2..$7, bound by `bind_filter`
const MATCHES_FILTER: &str = r#"
    ($2::text IS NULL OR s.category = $2)
    AND ($3::float8 IS NULL OR s.rating >= $3)
    AND ($4::float8 IS NULL OR s.latitude BETWEEN $4 AND $5)
    AND ($6::float8 IS NULL OR s.longitude BETWEEN $6 AND $7)
"#;

fn filtered_sql(select: &str, tail: &str) -> String {
    format!("{select} FROM spots s WHERE {VISIBLE_TO_VIEWER} AND {MATCHES_FILTER} {tail}")
}

fn bind_filter<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    viewer_id: &'q Uuid,
    filter: &'q SpotFilter,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    let bounds = filter.bounds;
    query
        .bind(viewer_id)
        .bind(filter.category.as_deref())
        .bind(filter.min_rating)
        .bind(bounds.map(|b| b.min_lat))
        .bind(bounds.map(|b| b.max_lat))
        .bind(bounds.map(|b| b.min_lng))
        .bind(bounds.map(|b| b.max_lng))
}

#[derive(Clone)]
pub struct SpotRepositoryPg {
    pool: sqlx::PgPool,
}

impl SpotRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SpotRepository for SpotRepositoryPg {
    async fn find_visible_by_id(
        &self,
        id: &Uuid,
        viewer_id: &Uuid,
    ) -> Result<Option<SpotEntity>, error::SystemError> {
        let sql = format!("SELECT s.* FROM spots s WHERE s.id = $2 AND {VISIBLE_TO_VIEWER}");
        let spot = sqlx::query_as::<_, SpotEntity>(&sql)
            .bind(viewer_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(spot)
    }

    async fn count_visible(
        &self,
        viewer_id: &Uuid,
        filter: &SpotFilter,
    ) -> Result<i64, error::SystemError> {
        let sql = filtered_sql("SELECT COUNT(*)", "");
        let (count,) = bind_filter(sqlx::query_as::<_, (i64,)>(&sql), viewer_id, filter)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn find_visible_page(
        &self,
        viewer_id: &Uuid,
        filter: &SpotFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SpotEntity>, error::SystemError> {
        let sql = filtered_sql("SELECT s.*", "ORDER BY s.created_at, s.id LIMIT $8 OFFSET $9");
        let spots = bind_filter(sqlx::query_as::<_, SpotEntity>(&sql), viewer_id, filter)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(spots)
    }

    async fn find_visible(
        &self,
        viewer_id: &Uuid,
        filter: &SpotFilter,
    ) -> Result<Vec<SpotEntity>, error::SystemError> {
        let sql = filtered_sql("SELECT s.*", "ORDER BY s.created_at, s.id");
        let spots = bind_filter(sqlx::query_as::<_, SpotEntity>(&sql), viewer_id, filter)
            .fetch_all(&self.pool)
            .await?;
        Ok(spots)
    }

    async fn find_visible_categories(
        &self,
        viewer_id: &Uuid,
    ) -> Result<Vec<String>, error::SystemError> {
        let sql = format!(
            "SELECT DISTINCT s.category FROM spots s WHERE s.category IS NOT NULL AND {VISIBLE_TO_VIEWER}"
        );
        let categories = sqlx::query_scalar::<_, String>(&sql)
            .bind(viewer_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    async fn create(&self, spot: &InsertSpot) -> Result<SpotEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let spot = sqlx::query_as::<_, SpotEntity>(
            r#"
            INSERT INTO spots (
                id, title, description, category, latitude, longitude,
                rating, address, visibility, owner_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&spot.title)
        .bind(&spot.description)
        .bind(&spot.category)
        .bind(spot.latitude)
        .bind(spot.longitude)
        .bind(spot.rating)
        .bind(&spot.address)
        .bind(spot.visibility)
        .bind(spot.owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(spot)
    }

    async fn update(
        &self,
        id: &Uuid,
        spot: &UpdateSpot,
    ) -> Result<Option<SpotEntity>, error::SystemError> {
        let spot = sqlx::query_as::<_, SpotEntity>(
            r#"
        UPDATE spots
        SET
            title       = COALESCE($2, title),
            description = CASE WHEN $3::boolean THEN $4 ELSE description END,
            category    = CASE WHEN $5::boolean THEN $6 ELSE category END,
            latitude    = COALESCE($7, latitude),
            longitude   = COALESCE($8, longitude),
            rating      = COALESCE($9, rating),
            address     = CASE WHEN $10::boolean THEN $11 ELSE address END,
            visibility  = COALESCE($12, visibility),
            updated_at  = NOW()
        WHERE id = $1
        RETURNING *
        "#,
        )
        .bind(id)
        .bind(&spot.title) // $2: Option<String>
        .bind(spot.description.is_some()) // $3: bool - was description provided?
        .bind(spot.description.as_ref().and_then(|v| v.as_ref())) // $4: Option<&String>
        .bind(spot.category.is_some()) // $5
        .bind(spot.category.as_ref().and_then(|v| v.as_ref())) // $6
        .bind(spot.latitude) // $7
        .bind(spot.longitude) // $8
        .bind(spot.rating) // $9
        .bind(spot.address.is_some()) // $10
        .bind(spot.address.as_ref().and_then(|v| v.as_ref())) // $11
        .bind(spot.visibility) // $12: Option<Visibility>
        .fetch_optional(&self.pool)
        .await?;

        Ok(spot)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM spots WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }
}
