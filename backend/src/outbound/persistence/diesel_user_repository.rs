//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Account creation writes the user, the optional company, and the optional
//! driver profile in one transaction so a failed insert leaves nothing behind.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{NewAccount, ProfileUpdate, StoredUser, User};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    CompanyRow, NewDriverProfileRow, NewUserRow, ProfileChangeset, UserRow,
};
use super::pool::DbPool;
use super::schema::{companies, driver_profiles, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create_account(&self, account: &NewAccount) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let user = &account.user;
        let user_row = NewUserRow {
            id: user.id,
            email: &user.email,
            password_hash: &account.password_hash,
            name: user.name.as_deref(),
            phone: user.phone.as_deref(),
            role: user.role.as_str(),
            is_verified: user.verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        let company_row = account.company.as_ref().map(|company| CompanyRow {
            id: company.id,
            owner_user_id: user.id,
            name: company.name.clone(),
            address: None,
            gst_vat_id: None,
            created_at: user.created_at,
        });
        let profile_row = account
            .driver_profile
            .as_ref()
            .map(|profile| NewDriverProfileRow {
                id: profile.id,
                user_id: profile.user_id,
                license_number: &profile.license_number,
                license_expiry: profile.license_expiry,
                experience_years: profile.experience_years,
            });

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&user_row)
                    .execute(conn)
                    .await?;
                if let Some(company) = &company_row {
                    diesel::insert_into(companies::table)
                        .values(company)
                        .execute(conn)
                        .await?;
                }
                if let Some(profile) = &profile_row {
                    diesel::insert_into(driver_profiles::table)
                        .values(profile)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            let password_hash = row.password_hash.clone();
            row.into_user().map(|user| StoredUser {
                user,
                password_hash,
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(UserRow::into_user).transpose()
    }

    async fn update_profile(
        &self,
        id: &Uuid,
        update: &ProfileUpdate,
        at: DateTime<Utc>,
    ) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = ProfileChangeset {
            name: update.name.as_deref(),
            phone: update.phone.as_deref(),
            updated_at: at,
        };
        let affected = diesel::update(users::table.find(id))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }

    async fn list_users(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order(users::created_at.desc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn set_verified(
        &self,
        id: &Uuid,
        verified: bool,
        at: DateTime<Utc>,
    ) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(users::table.find(id))
            .set((users::is_verified.eq(verified), users::updated_at.eq(at)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }
}
