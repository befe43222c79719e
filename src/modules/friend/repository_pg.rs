use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{
        model::{FriendRequestResponse, FriendResponse},
        repository::{FriendRequestRepository, FriendshipRepository},
        schema::{FriendshipEntity, FriendshipStatus},
    },
};

#[derive(Clone)]
pub struct FriendRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendshipRepository for FriendRepositoryPg {
    async fn find_friends(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        let friends = sqlx::query_as::<_, FriendResponse>(
            r#"
        SELECT
            u.id,
            u.username,
            u.display_name
        FROM friendships f
        JOIN users u
            ON u.id = CASE
                WHEN f.requester_id = $1 THEN f.requested_id
                ELSE f.requester_id
            END
        WHERE f.status = 'accepted'
          AND (f.requester_id = $1 OR f.requested_id = $1)
        ORDER BY u.display_name
        "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friends)
    }

    async fn find_live_edges(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let edges = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE status IN ('pending', 'accepted')
              AND (requester_id = $1 OR requested_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(edges)
    }

    async fn find_live_edge_between(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let edge = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE status IN ('pending', 'accepted')
              AND (
                    (requester_id = $1 AND requested_id = $2)
                 OR (requester_id = $2 AND requested_id = $1)
              )
            LIMIT 1
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(edge)
    }

    async fn delete_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            r#"
            DELETE FROM friendships
            WHERE status = 'accepted'
              AND (
                    (requester_id = $1 AND requested_id = $2)
                 OR (requester_id = $2 AND requested_id = $1)
              )
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for FriendRepositoryPg {
    async fn create_friend_request(
        &self,
        requester_id: &Uuid,
        requested_id: &Uuid,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let request = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            INSERT INTO friendships (id, requester_id, requested_id, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(requester_id)
        .bind(requested_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    async fn find_received_requests(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let requests = sqlx::query_as::<_, FriendRequestResponse>(
            r#"
            SELECT
                f.id,
                f.requester_id,
                f.requested_id,
                r.display_name AS requester_name,
                d.display_name AS requested_name,
                f.status,
                f.created_at
            FROM friendships f
            JOIN users r ON r.id = f.requester_id
            JOIN users d ON d.id = f.requested_id
            WHERE f.requested_id = $1
              AND f.status = 'pending'
            ORDER BY f.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn find_sent_requests(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let requests = sqlx::query_as::<_, FriendRequestResponse>(
            r#"
            SELECT
                f.id,
                f.requester_id,
                f.requested_id,
                r.display_name AS requester_name,
                d.display_name AS requested_name,
                f.status,
                f.created_at
            FROM friendships f
            JOIN users r ON r.id = f.requester_id
            JOIN users d ON d.id = f.requested_id
            WHERE f.requester_id = $1
              AND f.status = 'pending'
            ORDER BY f.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn resolve_friend_request(
        &self,
        request_id: &Uuid,
        requested_id: &Uuid,
        status: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            UPDATE friendships
            SET status = $3, updated_at = NOW()
            WHERE id = $1
              AND requested_id = $2
              AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(requested_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }
}
