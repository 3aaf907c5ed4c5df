//! Shared Diesel and pool error mapping for every repository adapter.
//!
//! Port error enums all implement [`PortFailure`], so one mapping covers them:
//! uniqueness violations become `Conflict`, foreign key violations become
//! `MissingReference`, dropped connections become `Connection`, and anything
//! else is a `Query` failure. Driver messages are logged, not propagated.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::PortFailure;

use super::pool::PoolError;

/// Map pool checkout or build failures to a connection error.
pub(crate) fn map_pool_error<E: PortFailure>(error: PoolError) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    E::connection_failure(message)
}

/// Map a Diesel error onto the shared port failure kinds.
pub(crate) fn map_diesel_error<E: PortFailure>(error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            E::conflict_failure(constraint_label(info.constraint_name()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            E::missing_reference_failure(constraint_label(info.constraint_name()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection_failure("database connection error".to_owned())
        }
        DieselError::NotFound => E::query_failure("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query_failure("database query error".to_owned()),
        _ => E::query_failure("database error".to_owned()),
    }
}

fn constraint_label(constraint: Option<&str>) -> String {
    constraint.unwrap_or("unnamed constraint").to_owned()
}

#[cfg(test)]
mod tests {
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::TripRepositoryError;

    struct Info {
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "violation"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info { constraint }))
    }

    #[rstest]
    fn unique_violation_is_conflict() {
        let err: TripRepositoryError = map_diesel_error(database_error(
            DatabaseErrorKind::UniqueViolation,
            Some("trips_load_id_key"),
        ));
        assert_eq!(err, TripRepositoryError::conflict("trips_load_id_key"));
    }

    #[rstest]
    fn foreign_key_violation_is_missing_reference() {
        let err: TripRepositoryError = map_diesel_error(database_error(
            DatabaseErrorKind::ForeignKeyViolation,
            None,
        ));
        assert!(matches!(err, TripRepositoryError::MissingReference { .. }));
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::ClosedConnection, None), true)]
    #[case(DieselError::NotFound, false)]
    #[case(database_error(DatabaseErrorKind::NotNullViolation, None), false)]
    fn remaining_errors(#[case] error: DieselError, #[case] is_connection: bool) {
        let err: TripRepositoryError = map_diesel_error(error);
        assert_eq!(
            matches!(err, TripRepositoryError::Connection { .. }),
            is_connection
        );
    }

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let err: TripRepositoryError = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, TripRepositoryError::connection("timed out"));
    }
}
