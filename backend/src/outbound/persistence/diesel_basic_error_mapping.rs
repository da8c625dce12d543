//! Shared Diesel error mapping for repositories with basic query semantics.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Constraint family a database rejection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// A referenced row does not exist.
    ForeignKey,
    /// A `CHECK`, `NOT NULL`, or uniqueness rule rejected the row.
    Row,
}

/// Classify a Diesel error as a constraint violation, returning the kind and
/// the database message.
pub fn constraint_violation(error: &diesel::result::Error) -> Option<(ConstraintKind, String)> {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    let DieselError::DatabaseError(kind, info) = error else {
        return None;
    };
    let constraint = match kind {
        DatabaseErrorKind::ForeignKeyViolation => ConstraintKind::ForeignKey,
        DatabaseErrorKind::CheckViolation
        | DatabaseErrorKind::NotNullViolation
        | DatabaseErrorKind::UniqueViolation => ConstraintKind::Row,
        _ => return None,
    };
    let message = info
        .constraint_name()
        .map_or_else(|| info.message().to_owned(), |name| format!("{}: {name}", info.message()));
    Some((constraint, message))
}

/// Map common Diesel error variants into query/connection constructors.
///
/// `NotFound` and query-builder failures map to query errors; a closed
/// connection maps to a connection error.
pub fn map_basic_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    use super::*;

    struct Info(&'static str);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("stock_items")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info("rejected")))
    }

    #[rstest]
    #[case(DatabaseErrorKind::ForeignKeyViolation, Some(ConstraintKind::ForeignKey))]
    #[case(DatabaseErrorKind::CheckViolation, Some(ConstraintKind::Row))]
    #[case(DatabaseErrorKind::NotNullViolation, Some(ConstraintKind::Row))]
    #[case(DatabaseErrorKind::ClosedConnection, None)]
    fn classifies_constraint_violations(
        #[case] kind: DatabaseErrorKind,
        #[case] expected: Option<ConstraintKind>,
    ) {
        let classified = constraint_violation(&database_error(kind));
        assert_eq!(classified.as_ref().map(|(kind, _)| *kind), expected);
        if let Some((_, message)) = classified {
            assert_eq!(message, "rejected");
        }
    }

    #[rstest]
    fn closed_connection_maps_to_connection_constructor() {
        let mapped: String = map_basic_diesel_error(
            database_error(DatabaseErrorKind::ClosedConnection),
            |msg| format!("query: {msg}"),
            |msg| format!("connection: {msg}"),
        );
        assert_eq!(mapped, "connection: database connection error");
    }

    #[rstest]
    fn not_found_maps_to_query_constructor() {
        let mapped: String = map_basic_diesel_error(
            DieselError::NotFound,
            |msg| format!("query: {msg}"),
            |msg| format!("connection: {msg}"),
        );
        assert_eq!(mapped, "query: record not found");
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        let mapped: String =
            map_basic_pool_error(PoolError::checkout("timed out"), |msg| format!("conn: {msg}"));
        assert_eq!(mapped, "conn: timed out");
    }
}
