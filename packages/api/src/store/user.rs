use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use super::{StoreError, find_or_not_found};
use crate::auth::password::{hash_password, verify_or_dummy};
use crate::entity::{order, review, user};
use crate::serialization::user::RegisterRequest;

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> Result<user::Model, StoreError> {
    find_or_not_found::<user::Entity, _>(db, id, "user").await
}

pub async fn find_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<Option<user::Model>, StoreError> {
    Ok(user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?)
}

/// Creates a user with a hashed password. The plaintext is dropped with the
/// request once hashed.
pub async fn create<C>(db: &C, req: RegisterRequest) -> Result<user::Model, StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    req.validate()?;
    let password = req.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| StoreError::Hashing(e.to_string()))?
        .map_err(|e| StoreError::Hashing(e.to_string()))?;

    let txn = db.begin().await?;

    if find_by_username(&txn, &req.username).await?.is_some() {
        return Err(StoreError::ConstraintViolation(format!(
            "username {} is already taken",
            req.username
        )));
    }

    let user = user::ActiveModel {
        username: Set(req.username),
        email: Set(req.email.trim().to_string()),
        password_hash: Set(password_hash),
        date_joined: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    tracing::info!(user_id = user.id, "Registered user");
    Ok(user)
}

/// Returns the user when `username` exists and `password` matches. Unknown
/// usernames go through the same argon2 verification as wrong passwords.
pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    username: &str,
    password: &str,
) -> Result<Option<user::Model>, StoreError> {
    let user = find_by_username(db, username).await?;
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let password = password.to_owned();

    let matches =
        tokio::task::spawn_blocking(move || verify_or_dummy(&password, stored_hash.as_deref()))
            .await
            .map_err(|e| StoreError::Hashing(e.to_string()))?;

    Ok(user.filter(|_| matches))
}

/// Deletes a user together with their orders and reviews.
pub async fn delete<C>(db: &C, id: i32) -> Result<(), StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let user = find_or_not_found::<user::Entity, _>(&txn, id, "user").await?;

    let reviews = review::Entity::delete_many()
        .filter(review::Column::UserId.eq(id))
        .exec(&txn)
        .await?;
    let orders = order::Entity::delete_many()
        .filter(order::Column::UserId.eq(id))
        .exec(&txn)
        .await?;
    user::Entity::delete_by_id(user.id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!(
        user_id = id,
        reviews = reviews.rows_affected,
        orders = orders.rows_affected,
        "Deleted user"
    );
    Ok(())
}
