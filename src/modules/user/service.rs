use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::configs::AppConfig;
use crate::modules::user::model::{LoginModel, LoginResponse, RegisterModel, UserResponse};
use crate::modules::user::{model::InsertUser, repository::UserRepository};
use crate::utils::{Claims, hash_password, verify_password};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    config: Arc<AppConfig>,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        config: Arc<AppConfig>,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, config }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserResponse, error::SystemError> {
        self.repo
            .find_by_id(&id)
            .await?
            .filter(|user| user.is_active)
            .map(UserResponse::from)
            .ok_or_else(|| error::SystemError::not_found("User not found"))
    }

    pub async fn list_active(&self) -> Result<Vec<UserResponse>, error::SystemError> {
        let users = self.repo.find_active().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn register(&self, user: RegisterModel) -> Result<UserResponse, error::SystemError> {
        if self.repo.find_by_username(&user.username).await?.is_some() {
            return Err(error::SystemError::conflict("Username is already taken"));
        }

        let hash_password = hash_password(&user.password)?;
        let display_name = user
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| user.username.clone());

        let new_user = InsertUser { username: user.username, hash_password, display_name };

        let created = self.repo.create(&new_user).await?;
        info!("User {} registered", created.id);
        Ok(UserResponse::from(created))
    }

    pub async fn login(&self, user: LoginModel) -> Result<LoginResponse, error::SystemError> {
        let user_entity = self
            .repo
            .find_by_username(&user.username)
            .await?
            .filter(|entity| entity.is_active)
            .ok_or_else(|| error::SystemError::unauthorized("Invalid username or password"))?;

        let valid = verify_password(&user_entity.hash_password, &user.password)?;
        if !valid {
            return Err(error::SystemError::unauthorized("Invalid username or password"));
        }

        let access_token = Claims::new(&user_entity.id, self.config.access_token_expiration)
            .encode(self.config.jwt_secret.as_ref())?;

        Ok(LoginResponse {
            access_token,
            token_type: "bearer",
            user: UserResponse::from(user_entity),
        })
    }
}
