/// User registration, lookup and credential checks
///
/// Users only ever leave this service as [`UserDto`], so the password hash
/// cannot reach a response.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::validate_input;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{CreateUser, Membership, NewUser, UpdateUser, UserDto};
use crate::repository::Store;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Registers a user and returns its id
    ///
    /// A duplicate email or social id is a `BadRequest`.
    pub async fn create_user(&self, input: CreateUser) -> ServiceResult<i64> {
        validate_input(&input)?;

        if self.store.find_user_by_email(&input.email).await?.is_some() {
            warn!(email = %input.email, "Registration refused: email in use");
            return Err(ServiceError::bad_request("email is already in use"));
        }

        let password_hash = hash_blocking(input.password).await?;

        let user = self
            .store
            .insert_user(NewUser {
                password_hash,
                social_id: input.social_id,
                email: input.email,
                name: input.name,
                sex: input.sex,
                phone: input.phone,
            })
            .await?;

        info!(user_id = user.id(), "User created");
        Ok(user.id())
    }

    pub async fn find_user(&self, id: i64) -> ServiceResult<UserDto> {
        debug!(user_id = id, "Finding user");

        self.store
            .find_user(id)
            .await?
            .map(UserDto::from)
            .ok_or(ServiceError::UserNotFound)
    }

    pub async fn find_all_users(&self) -> ServiceResult<Vec<UserDto>> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    /// Updates the acting user's own profile
    pub async fn update_user(
        &self,
        id: i64,
        acting_user_id: i64,
        mut changes: UpdateUser,
    ) -> ServiceResult<UserDto> {
        ensure_self(id, acting_user_id)?;
        validate_input(&changes)?;

        let current = self.find_user(id).await?;

        if let Some(email) = changes.email.as_deref() {
            if email != current.email && self.store.find_user_by_email(email).await?.is_some() {
                return Err(ServiceError::bad_request("email is already in use"));
            }
        }

        if let Some(password) = changes.password.take() {
            changes.password = Some(hash_blocking(password).await?);
        }

        let user = self
            .store
            .update_user(id, changes)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        info!(user_id = id, "User updated");
        Ok(user.into())
    }

    /// Soft-deletes the acting user's own account
    pub async fn delete_user(&self, id: i64, acting_user_id: i64) -> ServiceResult<()> {
        ensure_self(id, acting_user_id)?;

        if !self.store.soft_delete_user(id).await? {
            return Err(ServiceError::UserNotFound);
        }

        info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Checks an email/password pair
    pub async fn verify_credentials(&self, email: &str, password: &str) -> ServiceResult<UserDto> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        let hash = user.password.clone();
        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| ServiceError::internal(format!("Password check task failed: {}", e)))??;

        if !matches {
            warn!(user_id = user.id(), "Password mismatch");
            return Err(ServiceError::PasswordNotMatch);
        }

        Ok(user.into())
    }

    /// Memberships of the user in clubs that still exist
    pub async fn list_clubs_of_user(&self, user_id: i64) -> ServiceResult<Vec<Membership>> {
        self.find_user(user_id).await?;
        Ok(self.store.list_memberships_of_user(user_id).await?)
    }
}

fn ensure_self(id: i64, acting_user_id: i64) -> ServiceResult<()> {
    if id != acting_user_id {
        warn!(user_id = id, acting_user_id, "Refused change to another user's account");
        return Err(ServiceError::bad_request("users may only change their own account"));
    }
    Ok(())
}

/// Argon2 is CPU bound; keep it off the async workers
async fn hash_blocking(password: String) -> ServiceResult<String> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ServiceError::internal(format!("Password hash task failed: {}", e)))??;
    Ok(hash)
}
