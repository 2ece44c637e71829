//! User business logic

use crate::crypto::{hash_password, verify_password};
use crate::domain::{
    CreateUserInput, LoginInput, NewUser, StringUuid, UpdateUserInput, User, UserChanges,
};
use crate::error::{AppError, Result};
use crate::repository::UserRepository;
use std::sync::Arc;
use validator::Validate;

/// CRUD and credential checks over one user table
pub struct UserService<R: UserRepository> {
    repo: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateUserInput) -> Result<User> {
        input.validate()?;

        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "User with email '{}' already exists",
                input.email
            )));
        }

        let new_user = NewUser {
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            password_hash: hash_password(&input.password)?,
        };
        self.repo.create(&new_user).await
    }

    pub async fn get(&self, id: StringUuid) -> Result<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    pub async fn list(&self, page: i64, per_page: i64) -> Result<(Vec<User>, i64)> {
        let offset = page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(per_page))
            .ok_or_else(|| AppError::BadRequest(format!("page {} is out of range", page)))?;
        let users = self.repo.list(offset, per_page).await?;
        let total = self.repo.count().await?;
        Ok((users, total))
    }

    pub async fn update(&self, id: StringUuid, input: UpdateUserInput) -> Result<User> {
        input.validate()?;
        let existing = self.get(id).await?;

        if let Some(email) = &input.email {
            if email != &existing.email {
                if let Some(other) = self.repo.find_by_email(email).await? {
                    if other.id != id {
                        return Err(AppError::Conflict(format!(
                            "User with email '{}' already exists",
                            email
                        )));
                    }
                }
            }
        }

        let changes = UserChanges {
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            password_hash: input.password.as_deref().map(hash_password).transpose()?,
        };
        self.repo.update(id, &changes).await
    }

    pub async fn delete(&self, id: StringUuid) -> Result<()> {
        self.repo.delete(id).await
    }

    /// Check credentials; unknown email and wrong password are indistinguishable
    pub async fn authenticate(&self, input: &LoginInput) -> Result<User> {
        input.validate()?;

        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());
        let user = self
            .repo
            .find_by_email(&input.email)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(invalid());
        }
        Ok(user)
    }
}
