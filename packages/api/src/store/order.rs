use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::{StoreError, require_reference};
use crate::auth::AuthenticatedUser;
use crate::entity::{order, product, sea_orm_active_enums::OrderStatus, user};
use crate::serialization::order::{OrderInput, OrderPatch};

/// Orders placed by `owner`, oldest first.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    owner: &AuthenticatedUser,
) -> Result<Vec<order::Model>, StoreError> {
    Ok(order::Entity::find()
        .filter(order::Column::UserId.eq(owner.id))
        .order_by_asc(order::Column::Id)
        .all(db)
        .await?)
}

/// An order owned by `owner`. Someone else's order reads as missing.
pub async fn get<C: ConnectionTrait>(
    db: &C,
    owner: &AuthenticatedUser,
    id: i32,
) -> Result<order::Model, StoreError> {
    order::Entity::find_by_id(id)
        .filter(order::Column::UserId.eq(owner.id))
        .one(db)
        .await?
        .ok_or(StoreError::NotFound { entity: "order", id })
}

pub async fn create<C>(
    db: &C,
    owner: &AuthenticatedUser,
    input: OrderInput,
) -> Result<order::Model, StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    input.validate()?;
    let txn = db.begin().await?;

    require_reference::<product::Entity, _>(&txn, input.product, "product").await?;
    require_reference::<user::Entity, _>(&txn, owner.id, "user").await?;

    let model = order::ActiveModel {
        user_id: Set(owner.id),
        product_id: Set(input.product),
        quantity: Set(input.quantity),
        status: Set(OrderStatus::default()),
        order_date: Set(Utc::now().naive_utc()),
        delivery_date: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    tracing::info!(order_id = model.id, product_id = model.product_id, "Placed order");
    Ok(model)
}

/// Applies quantity, status and delivery date changes. Status may only move
/// forward; reaching `delivered` without an explicit date stamps the current time.
pub async fn update<C>(
    db: &C,
    owner: &AuthenticatedUser,
    id: i32,
    patch: OrderPatch,
) -> Result<order::Model, StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    patch.validate()?;
    let txn = db.begin().await?;
    let existing = get(&txn, owner, id).await?;
    let current = existing.status;
    let had_delivery_date = existing.delivery_date.is_some();

    let mut active: order::ActiveModel = existing.into();
    if let Some(quantity) = patch.quantity {
        active.quantity = Set(quantity);
    }
    if let Some(delivery_date) = patch.delivery_date {
        active.delivery_date = Set(delivery_date);
    }
    if let Some(next) = patch.status {
        if !current.can_transition_to(next) {
            return Err(StoreError::BusinessRuleViolation(format!(
                "order status cannot move from {} to {}",
                current.as_str(),
                next.as_str()
            )));
        }
        active.status = Set(next);

        let date_supplied = matches!(patch.delivery_date, Some(Some(_)));
        if next == OrderStatus::Delivered && !date_supplied && !had_delivery_date {
            active.delivery_date = Set(Some(Utc::now().naive_utc()));
        }
    }

    let model = active.update(&txn).await?;
    txn.commit().await?;
    Ok(model)
}

pub async fn delete<C>(db: &C, owner: &AuthenticatedUser, id: i32) -> Result<(), StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let existing = get(&txn, owner, id).await?;
    order::Entity::delete_by_id(existing.id).exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}
