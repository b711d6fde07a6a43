//! Storage layer: one module per entity, each operation generic over the
//! connection so it can run on the pool or inside a caller's transaction.
//!
//! Referential and uniqueness checks happen here before each write. Delete
//! policies (cascade for categories and products, nullify for brands) are
//! applied explicitly inside a single transaction.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PrimaryKeyTrait, SqlErr};

use crate::catalog::tree::TreeError;

pub mod brand;
pub mod category;
pub mod order;
pub mod product;
pub mod review;
pub mod schema;
pub mod user;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("{0}")]
    BusinessRuleViolation(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("data integrity error: {0}")]
    Integrity(String),
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Database(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                StoreError::ConstraintViolation(format!("unique constraint failed: {msg}"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                StoreError::ConstraintViolation(format!("foreign key constraint failed: {msg}"))
            }
            _ => StoreError::Database(err),
        }
    }
}

impl From<TreeError> for StoreError {
    fn from(err: TreeError) -> Self {
        StoreError::Integrity(err.to_string())
    }
}

/// Loads a row by id or fails with `NotFound`.
pub(crate) async fn find_or_not_found<E, C>(
    db: &C,
    id: i32,
    entity: &'static str,
) -> Result<E::Model, StoreError>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    C: ConnectionTrait,
{
    E::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound { entity, id })
}

/// Checks that a referenced row exists, failing with `ConstraintViolation`
/// when it does not. Used for foreign keys supplied by the client.
pub(crate) async fn require_reference<E, C>(
    db: &C,
    id: i32,
    entity: &'static str,
) -> Result<E::Model, StoreError>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    C: ConnectionTrait,
{
    E::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::ConstraintViolation(format!("{entity} {id} does not exist")))
}
