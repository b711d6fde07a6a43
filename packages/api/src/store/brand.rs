use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::{StoreError, find_or_not_found};
use crate::entity::{brand, product};
use crate::serialization::brand::BrandInput;

pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<brand::Model>, StoreError> {
    Ok(brand::Entity::find()
        .order_by_asc(brand::Column::Id)
        .all(db)
        .await?)
}

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> Result<brand::Model, StoreError> {
    find_or_not_found::<brand::Entity, _>(db, id, "brand").await
}

async fn ensure_name_free<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except: Option<i32>,
) -> Result<(), StoreError> {
    let mut query = brand::Entity::find().filter(brand::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(brand::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(StoreError::ConstraintViolation(format!(
            "brand with name {name} already exists"
        )));
    }
    Ok(())
}

pub async fn create<C>(db: &C, input: BrandInput) -> Result<brand::Model, StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    input.validate()?;
    let txn = db.begin().await?;
    ensure_name_free(&txn, &input.name, None).await?;

    let model = brand::ActiveModel {
        name: Set(input.name),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(model)
}

/// Renames a brand. `None` leaves it untouched.
pub async fn update<C>(db: &C, id: i32, name: Option<String>) -> Result<brand::Model, StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let existing = get(&txn, id).await?;

    let Some(name) = name else {
        return Ok(existing);
    };
    BrandInput { name: name.clone() }.validate()?;
    ensure_name_free(&txn, &name, Some(id)).await?;

    let mut active: brand::ActiveModel = existing.into();
    active.name = Set(name);
    let model = active.update(&txn).await?;
    txn.commit().await?;
    Ok(model)
}

/// Deletes a brand. Its products stay, with `brand` cleared.
pub async fn delete<C>(db: &C, id: i32) -> Result<u64, StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    get(&txn, id).await?;

    let detached = product::Entity::update_many()
        .col_expr(product::Column::BrandId, Expr::value(Option::<i32>::None))
        .filter(product::Column::BrandId.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;
    brand::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!(brand_id = id, detached, "Deleted brand");
    Ok(detached)
}
