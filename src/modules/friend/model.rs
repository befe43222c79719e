use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::modules::{friend::schema::FriendshipStatus, user::schema::UserEntity};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FriendResponse {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
}

impl From<UserEntity> for FriendResponse {
    fn from(user: UserEntity) -> Self {
        FriendResponse { id: user.id, username: user.username, display_name: user.display_name }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FriendRequestResponse {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub requested_id: Uuid,
    pub requester_name: String,
    pub requested_name: String,
    pub status: FriendshipStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FriendRequestBody {
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct FriendRequestSent {
    pub request_id: Uuid,
    pub to: FriendResponse,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserSearchQuery {
    #[validate(length(min = 2, message = "Search query must be at least 2 characters long"))]
    pub query: String,
}

/// Which side of a pending request the searching user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestDirection {
    Sent,
    Received,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSearchResult {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub is_friend: bool,
    pub request_status: Option<RequestDirection>,
}
