use diesel::dsl::exists;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::party::Role;
use crate::schema::persons;

pub mod cart_repo;
pub mod catalog_repo;
pub mod models;
pub mod order_repo;
pub mod party_repo;

#[cfg(test)]
pub mod test_support;

pub use cart_repo::DieselCartRepository;
pub use catalog_repo::DieselCatalogRepository;
pub use order_repo::DieselOrderRepository;
pub use party_repo::DieselPartyRepository;

/// Fails with `NotFound` unless a person with this id is stored under the
/// given role.
pub(crate) fn require_person(
    conn: &mut PgConnection,
    id: Uuid,
    role: Role,
) -> Result<(), DomainError> {
    let found: bool = diesel::select(exists(
        persons::table
            .filter(persons::id.eq(id))
            .filter(persons::role.eq(role.as_str())),
    ))
    .get_result(conn)?;

    if found {
        Ok(())
    } else {
        Err(DomainError::NotFound(role.entity_name()))
    }
}

// Error conversions (infrastructure concern only)

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match e {
            // Losing a check-then-insert race (e.g. duplicate email) is a
            // conflict, not a server fault.
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                DomainError::Conflict(info.message().to_string())
            }
            // Rows still referenced by order history cannot be hard-deleted.
            Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                DomainError::Conflict(
                    "Record is referenced by existing orders and cannot be deleted".to_string(),
                )
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}
