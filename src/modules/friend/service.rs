use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use uuid::Uuid;

use crate::{
    api::error,
    constants::{USER_SEARCH_LIMIT, USER_SEARCH_MIN_LEN},
    modules::{
        friend::{
            model::{
                FriendRequestResponse, FriendRequestSent, FriendResponse, RequestDirection,
                UserSearchResult,
            },
            repository::FriendRepo,
            schema::{FriendshipEntity, FriendshipStatus},
        },
        user::repository::UserRepository,
    },
};

#[derive(Clone)]
pub struct FriendService<R, U>
where
    R: FriendRepo + Send + Sync,
    U: UserRepository + Send + Sync,
{
    friend_repo: Arc<R>,
    user_repo: Arc<U>,
}

impl<R, U> FriendService<R, U>
where
    R: FriendRepo + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(friend_repo: Arc<R>, user_repo: Arc<U>) -> Self {
        info!("FriendService initialized with dependencies");
        FriendService { friend_repo, user_repo }
    }

    pub async fn search_users(
        &self,
        user_id: Uuid,
        query: &str,
    ) -> Result<Vec<UserSearchResult>, error::SystemError> {
        if query.chars().count() < USER_SEARCH_MIN_LEN {
            return Err(error::SystemError::bad_request(
                "Search query must be at least 2 characters long",
            ));
        }

        let (users, edges) = tokio::try_join!(
            self.user_repo.search_users(query, &user_id, USER_SEARCH_LIMIT),
            self.friend_repo.find_live_edges(&user_id),
        )?;

        let by_counterpart: HashMap<Uuid, FriendshipEntity> =
            edges.into_iter().map(|edge| (edge.counterpart(&user_id), edge)).collect();

        Ok(users
            .into_iter()
            .map(|user| {
                let edge = by_counterpart.get(&user.id);
                let is_friend = edge.is_some_and(|e| e.status == FriendshipStatus::Accepted);
                let request_status = edge
                    .filter(|e| e.status == FriendshipStatus::Pending)
                    .map(|e| {
                        if e.requester_id == user_id {
                            RequestDirection::Sent
                        } else {
                            RequestDirection::Received
                        }
                    });
                UserSearchResult {
                    id: user.id,
                    username: user.username,
                    display_name: user.display_name,
                    is_friend,
                    request_status,
                }
            })
            .collect())
    }

    pub async fn send_friend_request(
        &self,
        requester_id: Uuid,
        target_username: &str,
    ) -> Result<FriendRequestSent, error::SystemError> {
        let target = self
            .user_repo
            .find_by_username(target_username)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        if target.id == requester_id {
            return Err(error::SystemError::bad_request("Cannot send friend request to yourself"));
        }

        if let Some(existing) =
            self.friend_repo.find_live_edge_between(&requester_id, &target.id).await?
        {
            return Err(match existing.status {
                FriendshipStatus::Accepted => error::SystemError::conflict("Users are already friends"),
                _ => error::SystemError::conflict("Friend request already exists"),
            });
        }

        let request = self.friend_repo.create_friend_request(&requester_id, &target.id).await?;
        info!("Friend request {} sent from {} to {}", request.id, requester_id, target.id);

        Ok(FriendRequestSent { request_id: request.id, to: FriendResponse::from(target) })
    }

    pub async fn received_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        self.friend_repo.find_received_requests(&user_id).await
    }

    pub async fn sent_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        self.friend_repo.find_sent_requests(&user_id).await
    }

    pub async fn accept_friend_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> Result<FriendResponse, error::SystemError> {
        let request = self
            .friend_repo
            .resolve_friend_request(&request_id, &user_id, FriendshipStatus::Accepted)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        let requester = self
            .user_repo
            .find_by_id(&request.requester_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        info!("Friend request {} accepted", request_id);
        Ok(FriendResponse::from(requester))
    }

    pub async fn reject_friend_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> Result<(), error::SystemError> {
        self.friend_repo
            .resolve_friend_request(&request_id, &user_id, FriendshipStatus::Rejected)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        info!("Friend request {} rejected", request_id);
        Ok(())
    }

    pub async fn get_friends(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        self.friend_repo.find_friends(&user_id).await
    }

    pub async fn remove_friend(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<(), error::SystemError> {
        if !self.friend_repo.delete_friendship(&user_id, &friend_id).await? {
            return Err(error::SystemError::not_found("Friendship not found"));
        }
        Ok(())
    }
}
