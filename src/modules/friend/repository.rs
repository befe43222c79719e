use uuid::Uuid;

use crate::api::error;
use crate::modules::friend::model::{FriendRequestResponse, FriendResponse};
use crate::modules::friend::schema::{FriendshipEntity, FriendshipStatus};

#[async_trait::async_trait]
pub trait FriendshipRepository {
    async fn find_friends(&self, user_id: &Uuid)
    -> Result<Vec<FriendResponse>, error::SystemError>;

    /// Pending and accepted edges touching `user_id`, in either direction.
    async fn find_live_edges(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError>;

    async fn find_live_edge_between(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    /// Removes the accepted edge between the two users, whoever sent the request.
    async fn delete_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<bool, error::SystemError>;
}

#[async_trait::async_trait]
pub trait FriendRequestRepository {
    async fn create_friend_request(
        &self,
        requester_id: &Uuid,
        requested_id: &Uuid,
    ) -> Result<FriendshipEntity, error::SystemError>;

    async fn find_received_requests(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError>;

    async fn find_sent_requests(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError>;

    /// Moves a pending request addressed to `requested_id` to `status`.
    /// `None` when there is no such pending request.
    async fn resolve_friend_request(
        &self,
        request_id: &Uuid,
        requested_id: &Uuid,
        status: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;
}

pub trait FriendRepo: FriendshipRepository + FriendRequestRepository + Send + Sync {}

impl<T> FriendRepo for T where T: FriendshipRepository + FriendRequestRepository + Send + Sync {}
