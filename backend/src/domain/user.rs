//! Marketplace accounts and roles.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::text_enum::define_text_enum;

define_text_enum! {
    /// Role attached to every account; drives endpoint access.
    pub enum Role as "role" {
        /// Drives trucks and executes trips.
        Driver => "driver",
        /// Owns a company and its trucks.
        FleetOwner => "fleet_owner",
        /// Posts loads and pays for delivery.
        Shipper => "shipper",
        /// Platform operator.
        Admin => "admin",
    }
}

impl Role {
    /// Whether an account holding `self` may create accounts with `target`.
    ///
    /// Admins may create any role; fleet owners may only onboard drivers.
    pub fn may_register(self, target: Self) -> bool {
        match self {
            Self::Admin => true,
            Self::FleetOwner => target == Self::Driver,
            Self::Driver | Self::Shipper => false,
        }
    }
}

/// Account as exposed to clients. The password hash never leaves storage
/// adapters except through [`StoredUser`].
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    /// `false` marks a suspended account.
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Compact projection returned by login and registration.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            name: self.name.clone(),
        }
    }
}

/// Identity fields returned alongside tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub name: Option<String>,
}

/// Account row including its password hash, used only for credential checks.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

/// Account plus the optional records created alongside it on registration.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub user: User,
    pub password_hash: String,
    /// Company created for fleet owners that supply a company name.
    pub company: Option<NewCompany>,
    /// Driver profile created for drivers that supply a license number.
    pub driver_profile: Option<DriverProfile>,
}

/// Company to create for a newly registered fleet owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    pub id: Uuid,
    pub name: String,
}

/// Licensing details for a driver account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DriverProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub license_number: String,
    pub license_expiry: Option<chrono::NaiveDate>,
    pub experience_years: i32,
}

/// Profile fields a user may edit about themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Normalise an email address for storage and lookups.
pub fn normalise_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
