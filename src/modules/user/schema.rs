use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub username: String,
    pub hash_password: String,
    pub display_name: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
