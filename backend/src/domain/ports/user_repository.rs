//! Port for account persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{NewAccount, ProfileUpdate, StoredUser, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {}
}

/// Port for creating, reading, and updating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert an account together with its optional company and driver
    /// profile in one transaction. A taken email yields `Conflict`.
    async fn create_account(&self, account: &NewAccount) -> Result<(), UserRepositoryError>;

    /// Look up an account and its password hash by normalised email.
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, UserRepositoryError>;

    /// Look up an account by id.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, UserRepositoryError>;

    /// Replace name and phone; returns `false` when the account is absent.
    async fn update_profile(
        &self,
        id: &Uuid,
        update: &ProfileUpdate,
        at: DateTime<Utc>,
    ) -> Result<bool, UserRepositoryError>;

    /// List every account, newest first.
    async fn list_users(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Set the verified flag; returns `false` when the account is absent.
    async fn set_verified(
        &self,
        id: &Uuid,
        verified: bool,
        at: DateTime<Utc>,
    ) -> Result<bool, UserRepositoryError>;
}
