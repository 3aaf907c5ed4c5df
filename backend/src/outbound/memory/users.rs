//! Accounts, companies, and driver profiles.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Company, NewAccount, ProfileUpdate, StoredUser, User};

use super::{MemoryStore, newest_first};

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_account(&self, account: &NewAccount) -> Result<(), UserRepositoryError> {
        let mut state = self.state.lock().await;
        let user = &account.user;
        if state
            .users
            .iter()
            .any(|stored| stored.user.email == user.email)
        {
            return Err(UserRepositoryError::conflict("users_email_key"));
        }

        state.users.push(StoredUser {
            user: user.clone(),
            password_hash: account.password_hash.clone(),
        });
        if let Some(company) = &account.company {
            state.companies.push(Company {
                id: company.id,
                owner_user_id: user.id,
                name: company.name.clone(),
                address: None,
                gst_vat_id: None,
                created_at: user.created_at,
            });
        }
        if let Some(profile) = &account.driver_profile {
            state.driver_profiles.push(profile.clone());
        }
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, UserRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, UserRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.id == *id)
            .map(|stored| stored.user.clone()))
    }

    async fn update_profile(
        &self,
        id: &Uuid,
        update: &ProfileUpdate,
        at: DateTime<Utc>,
    ) -> Result<bool, UserRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(stored) = state.users.iter_mut().find(|stored| stored.user.id == *id) else {
            return Ok(false);
        };
        stored.user.name.clone_from(&update.name);
        stored.user.phone.clone_from(&update.phone);
        stored.user.updated_at = at;
        Ok(true)
    }

    async fn list_users(&self) -> Result<Vec<User>, UserRepositoryError> {
        let state = self.state.lock().await;
        Ok(newest_first(state.users.iter())
            .into_iter()
            .map(|stored| stored.user)
            .collect())
    }

    async fn set_verified(
        &self,
        id: &Uuid,
        verified: bool,
        at: DateTime<Utc>,
    ) -> Result<bool, UserRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(stored) = state.users.iter_mut().find(|stored| stored.user.id == *id) else {
            return Ok(false);
        };
        stored.user.verified = verified;
        stored.user.updated_at = at;
        Ok(true)
    }
}
