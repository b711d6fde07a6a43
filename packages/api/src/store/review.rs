use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr, TransactionTrait,
};

use super::{StoreError, find_or_not_found, require_reference};
use crate::auth::AuthenticatedUser;
use crate::catalog::rating::RatingSummary;
use crate::entity::{product, review, user};
use crate::serialization::review::{ReviewFilter, ReviewInput, ReviewPatch};

pub const ALREADY_REVIEWED: &str = "already reviewed";

pub async fn list<C: ConnectionTrait>(
    db: &C,
    filter: &ReviewFilter,
) -> Result<Vec<review::Model>, StoreError> {
    let mut query = review::Entity::find().order_by_asc(review::Column::Id);
    if let Some(product_id) = filter.product {
        query = query.filter(review::Column::ProductId.eq(product_id));
    }
    Ok(query.all(db).await?)
}

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> Result<review::Model, StoreError> {
    find_or_not_found::<review::Entity, _>(db, id, "review").await
}

pub async fn for_product<C: ConnectionTrait>(
    db: &C,
    product_id: i32,
) -> Result<Vec<review::Model>, StoreError> {
    list(
        db,
        &ReviewFilter {
            product: Some(product_id),
        },
    )
    .await
}

/// Rating aggregates for the given products. Products without reviews are
/// absent from the map; callers fall back to `RatingSummary::default()`.
pub async fn ratings_for<C: ConnectionTrait>(
    db: &C,
    product_ids: &[i32],
) -> Result<HashMap<i32, RatingSummary>, StoreError> {
    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i32, i32)> = review::Entity::find()
        .select_only()
        .column(review::Column::ProductId)
        .column(review::Column::Rating)
        .filter(review::Column::ProductId.is_in(product_ids.iter().copied()))
        .into_tuple()
        .all(db)
        .await?;

    let mut grouped: HashMap<i32, Vec<i32>> = HashMap::new();
    for (product_id, rating) in rows {
        grouped.entry(product_id).or_default().push(rating);
    }

    Ok(grouped
        .into_iter()
        .map(|(product_id, ratings)| (product_id, RatingSummary::from_ratings(ratings)))
        .collect())
}

/// Creates a review authored by `author`. A second review of the same product
/// by the same user is a business-rule violation, reported before the unique
/// index would reject it.
pub async fn create<C>(
    db: &C,
    author: &AuthenticatedUser,
    input: ReviewInput,
) -> Result<review::Model, StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    input.validate()?;
    let txn = db.begin().await?;

    require_reference::<product::Entity, _>(&txn, input.product, "product").await?;
    require_reference::<user::Entity, _>(&txn, author.id, "user").await?;

    let existing = review::Entity::find()
        .filter(review::Column::ProductId.eq(input.product))
        .filter(review::Column::UserId.eq(author.id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(StoreError::BusinessRuleViolation(ALREADY_REVIEWED.to_string()));
    }

    let inserted = review::ActiveModel {
        product_id: Set(input.product),
        user_id: Set(author.id),
        rating: Set(input.rating),
        comment: Set(input.comment),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await;

    // A concurrent insert can still slip past the pre-check and hit the index.
    let model = match inserted {
        Ok(model) => model,
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(StoreError::BusinessRuleViolation(ALREADY_REVIEWED.to_string()));
        }
        Err(err) => return Err(err.into()),
    };

    txn.commit().await?;
    tracing::info!(review_id = model.id, product_id = model.product_id, "Created review");
    Ok(model)
}

pub async fn update<C>(
    db: &C,
    author: &AuthenticatedUser,
    id: i32,
    patch: ReviewPatch,
) -> Result<review::Model, StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    patch.validate()?;
    let txn = db.begin().await?;
    let existing = get(&txn, id).await?;
    ensure_author(&existing, author)?;

    let mut active: review::ActiveModel = existing.into();
    if let Some(rating) = patch.rating {
        active.rating = Set(rating);
    }
    if let Some(comment) = patch.comment {
        active.comment = Set(comment);
    }

    let model = active.update(&txn).await?;
    txn.commit().await?;
    Ok(model)
}

pub async fn delete<C>(db: &C, author: &AuthenticatedUser, id: i32) -> Result<(), StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let existing = get(&txn, id).await?;
    ensure_author(&existing, author)?;
    review::Entity::delete_by_id(existing.id).exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}

fn ensure_author(review: &review::Model, author: &AuthenticatedUser) -> Result<(), StoreError> {
    if review.user_id == author.id {
        Ok(())
    } else {
        Err(StoreError::Forbidden(format!(
            "review {} belongs to another user",
            review.id
        )))
    }
}
