#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::{
    api::error,
    configs::AppConfig,
    modules::{
        friend::{
            model::{FriendRequestResponse, FriendResponse},
            repository::{FriendRequestRepository, FriendshipRepository},
            schema::{FriendshipEntity, FriendshipStatus},
        },
        spot::{
            model::{InsertSpot, SpotFilter, UpdateSpot},
            proximity::GeoPoint,
            repository::SpotRepository,
            schema::{SpotEntity, Visibility},
        },
        user::{model::InsertUser, repository::UserRepository, schema::UserEntity},
    },
};

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: "test-secret".to_string(),
        access_token_expiration: 1800,
        database_url: "postgres://localhost/spot_share_test".to_string(),
        db_max_connections: 1,
        cors_origins: vec!["http://localhost:3000".to_string()],
        ip: "127.0.0.1".to_string(),
        port: 8000,
    }
}

fn new_id() -> Uuid {
    Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext))
}

#[derive(Default)]
struct Tables {
    users: Vec<UserEntity>,
    spots: Vec<SpotEntity>,
    friendships: Vec<FriendshipEntity>,
}

impl Tables {
    fn user(&self, id: &Uuid) -> Option<&UserEntity> {
        self.users.iter().find(|u| u.id == *id)
    }

    fn display_name(&self, id: &Uuid) -> String {
        self.user(id).map(|u| u.display_name.clone()).unwrap_or_default()
    }

    fn are_friends(&self, a: &Uuid, b: &Uuid) -> bool {
        self.friendships
            .iter()
            .any(|f| f.status == FriendshipStatus::Accepted && joins(f, a, b))
    }

    fn can_see(&self, spot: &SpotEntity, viewer_id: &Uuid) -> bool {
        spot.visibility == Visibility::Public
            || spot.owner_id == *viewer_id
            || self.are_friends(&spot.owner_id, viewer_id)
    }

    fn visible<'a>(
        &'a self,
        viewer_id: &'a Uuid,
        filter: &'a SpotFilter,
    ) -> impl Iterator<Item = &'a SpotEntity> + 'a {
        self.spots.iter().filter(move |s| self.can_see(s, viewer_id) && matches_filter(s, filter))
    }

    fn request_view(&self, edge: &FriendshipEntity) -> FriendRequestResponse {
        FriendRequestResponse {
            id: edge.id,
            requester_id: edge.requester_id,
            requested_id: edge.requested_id,
            requester_name: self.display_name(&edge.requester_id),
            requested_name: self.display_name(&edge.requested_id),
            status: edge.status,
            created_at: edge.created_at,
        }
    }
}

fn joins(edge: &FriendshipEntity, a: &Uuid, b: &Uuid) -> bool {
    (edge.requester_id == *a && edge.requested_id == *b)
        || (edge.requester_id == *b && edge.requested_id == *a)
}

fn is_live(edge: &FriendshipEntity) -> bool {
    matches!(edge.status, FriendshipStatus::Pending | FriendshipStatus::Accepted)
}

fn matches_filter(spot: &SpotEntity, filter: &SpotFilter) -> bool {
    filter.category.as_ref().map_or(true, |c| spot.category.as_ref() == Some(c))
        && filter.min_rating.map_or(true, |r| spot.rating >= r)
        && filter
            .bounds
            .map_or(true, |b| b.contains(GeoPoint::new(spot.latitude, spot.longitude)))
}

/// In-memory stand-in for every repository, sharing one set of tables.
/// Rows keep insertion order, which doubles as `created_at` order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    /// Adds an active user whose display name is the username.
    pub fn add_user(&self, username: &str) -> Uuid {
        let id = new_id();
        self.lock().users.push(UserEntity {
            id,
            username: username.to_string(),
            hash_password: String::new(),
            display_name: username.to_string(),
            is_active: true,
            created_at: chrono::Utc::now(),
        });
        id
    }

    pub fn deactivate(&self, id: Uuid) {
        if let Some(user) = self.lock().users.iter_mut().find(|u| u.id == id) {
            user.is_active = false;
        }
    }

    pub fn befriend(&self, a: Uuid, b: Uuid) {
        let now = chrono::Utc::now();
        self.lock().friendships.push(FriendshipEntity {
            id: new_id(),
            requester_id: a,
            requested_id: b,
            status: FriendshipStatus::Accepted,
            created_at: now,
            updated_at: now,
        });
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.lock().user(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        let wanted = username.to_lowercase();
        Ok(self.lock().users.iter().find(|u| u.username.to_lowercase() == wanted).cloned())
    }

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError> {
        let mut tables = self.lock();
        let wanted = user.username.to_lowercase();
        if tables.users.iter().any(|u| u.username.to_lowercase() == wanted) {
            return Err(error::SystemError::Conflict(None));
        }

        let entity = UserEntity {
            id: new_id(),
            username: user.username.clone(),
            hash_password: user.hash_password.clone(),
            display_name: user.display_name.clone(),
            is_active: true,
            created_at: chrono::Utc::now(),
        };
        tables.users.push(entity.clone());
        Ok(entity)
    }

    async fn find_active(&self) -> Result<Vec<UserEntity>, error::SystemError> {
        Ok(self.lock().users.iter().filter(|u| u.is_active).cloned().collect())
    }

    async fn search_users(
        &self,
        query: &str,
        exclude_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let needle = query.to_lowercase();
        let mut users: Vec<UserEntity> = self
            .lock()
            .users
            .iter()
            .filter(|u| u.is_active && u.id != *exclude_id)
            .filter(|u| {
                u.username.to_lowercase().contains(&needle)
                    || u.display_name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        users.truncate(limit.max(0) as usize);
        Ok(users)
    }
}

#[async_trait::async_trait]
impl SpotRepository for MemoryStore {
    async fn find_visible_by_id(
        &self,
        id: &Uuid,
        viewer_id: &Uuid,
    ) -> Result<Option<SpotEntity>, error::SystemError> {
        let tables = self.lock();
        Ok(tables.spots.iter().find(|s| s.id == *id && tables.can_see(s, viewer_id)).cloned())
    }

    async fn count_visible(
        &self,
        viewer_id: &Uuid,
        filter: &SpotFilter,
    ) -> Result<i64, error::SystemError> {
        Ok(self.lock().visible(viewer_id, filter).count() as i64)
    }

    async fn find_visible_page(
        &self,
        viewer_id: &Uuid,
        filter: &SpotFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SpotEntity>, error::SystemError> {
        Ok(self
            .lock()
            .visible(viewer_id, filter)
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn find_visible(
        &self,
        viewer_id: &Uuid,
        filter: &SpotFilter,
    ) -> Result<Vec<SpotEntity>, error::SystemError> {
        Ok(self.lock().visible(viewer_id, filter).cloned().collect())
    }

    async fn find_visible_categories(
        &self,
        viewer_id: &Uuid,
    ) -> Result<Vec<String>, error::SystemError> {
        let filter = SpotFilter::default();
        let mut categories: Vec<String> =
            self.lock().visible(viewer_id, &filter).filter_map(|s| s.category.clone()).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn create(&self, spot: &InsertSpot) -> Result<SpotEntity, error::SystemError> {
        let mut tables = self.lock();
        if tables.user(&spot.owner_id).is_none() {
            return Err(error::SystemError::bad_request("Referenced resource does not exist"));
        }

        let now = chrono::Utc::now();
        let entity = SpotEntity {
            id: new_id(),
            title: spot.title.clone(),
            description: spot.description.clone(),
            category: spot.category.clone(),
            latitude: spot.latitude,
            longitude: spot.longitude,
            rating: spot.rating,
            address: spot.address.clone(),
            visibility: spot.visibility,
            owner_id: spot.owner_id,
            created_at: now,
            updated_at: now,
        };
        tables.spots.push(entity.clone());
        Ok(entity)
    }

    async fn update(
        &self,
        id: &Uuid,
        patch: &UpdateSpot,
    ) -> Result<Option<SpotEntity>, error::SystemError> {
        let mut tables = self.lock();
        let Some(spot) = tables.spots.iter_mut().find(|s| s.id == *id) else {
            return Ok(None);
        };

        if let Some(title) = &patch.title {
            spot.title = title.clone();
        }
        if let Some(description) = &patch.description {
            spot.description = description.clone();
        }
        if let Some(category) = &patch.category {
            spot.category = category.clone();
        }
        if let Some(latitude) = patch.latitude {
            spot.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            spot.longitude = longitude;
        }
        if let Some(rating) = patch.rating {
            spot.rating = rating;
        }
        if let Some(address) = &patch.address {
            spot.address = address.clone();
        }
        if let Some(visibility) = patch.visibility {
            spot.visibility = visibility;
        }
        spot.updated_at = chrono::Utc::now();

        Ok(Some(spot.clone()))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let mut tables = self.lock();
        let before = tables.spots.len();
        tables.spots.retain(|s| s.id != *id);
        Ok(tables.spots.len() < before)
    }
}

#[async_trait::async_trait]
impl FriendshipRepository for MemoryStore {
    async fn find_friends(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        let tables = self.lock();
        let mut friends: Vec<FriendResponse> = tables
            .friendships
            .iter()
            .filter(|f| f.status == FriendshipStatus::Accepted)
            .filter(|f| f.requester_id == *user_id || f.requested_id == *user_id)
            .filter_map(|f| tables.user(&f.counterpart(user_id)).cloned())
            .map(FriendResponse::from)
            .collect();
        friends.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(friends)
    }

    async fn find_live_edges(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        Ok(self
            .lock()
            .friendships
            .iter()
            .filter(|f| is_live(f) && (f.requester_id == *user_id || f.requested_id == *user_id))
            .cloned()
            .collect())
    }

    async fn find_live_edge_between(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        Ok(self
            .lock()
            .friendships
            .iter()
            .find(|f| is_live(f) && joins(f, user_id_a, user_id_b))
            .cloned())
    }

    async fn delete_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let mut tables = self.lock();
        let before = tables.friendships.len();
        tables.friendships.retain(|f| {
            !(f.status == FriendshipStatus::Accepted && joins(f, user_id_a, user_id_b))
        });
        Ok(tables.friendships.len() < before)
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for MemoryStore {
    async fn create_friend_request(
        &self,
        requester_id: &Uuid,
        requested_id: &Uuid,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let mut tables = self.lock();
        if tables.friendships.iter().any(|f| is_live(f) && joins(f, requester_id, requested_id)) {
            return Err(error::SystemError::Conflict(None));
        }

        let now = chrono::Utc::now();
        let edge = FriendshipEntity {
            id: new_id(),
            requester_id: *requester_id,
            requested_id: *requested_id,
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.friendships.push(edge.clone());
        Ok(edge)
    }

    async fn find_received_requests(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let tables = self.lock();
        Ok(tables
            .friendships
            .iter()
            .filter(|f| f.status == FriendshipStatus::Pending && f.requested_id == *user_id)
            .map(|f| tables.request_view(f))
            .collect())
    }

    async fn find_sent_requests(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let tables = self.lock();
        Ok(tables
            .friendships
            .iter()
            .filter(|f| f.status == FriendshipStatus::Pending && f.requester_id == *user_id)
            .map(|f| tables.request_view(f))
            .collect())
    }

    async fn resolve_friend_request(
        &self,
        request_id: &Uuid,
        requested_id: &Uuid,
        status: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let mut tables = self.lock();
        let Some(edge) = tables.friendships.iter_mut().find(|f| {
            f.id == *request_id
                && f.requested_id == *requested_id
                && f.status == FriendshipStatus::Pending
        }) else {
            return Ok(None);
        };

        edge.status = status;
        edge.updated_at = chrono::Utc::now();
        Ok(Some(edge.clone()))
    }
}
