use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use super::{StoreError, find_or_not_found, require_reference, review};
use crate::catalog::rating::RatingSummary;
use crate::entity::{brand, category, order, product};
use crate::entity::review as review_entity;
use crate::serialization::product::{ProductFilter, ProductInput, ProductPatch, ProductResponse};
use crate::serialization::review::ReviewResponse;

/// Filtered product list, each entry with its rating aggregate. Reviews are not
/// embedded.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    filter: &ProductFilter,
) -> Result<Vec<ProductResponse>, StoreError> {
    let mut query = product::Entity::find().order_by_asc(product::Column::Id);

    if let Some(name) = filter.category.as_deref() {
        query = query.inner_join(category::Entity).filter(
            Expr::expr(Func::lower(Expr::col((category::Entity, category::Column::Name))))
                .eq(name.to_lowercase()),
        );
    }
    if let Some(name) = filter.brand.as_deref() {
        query = query.inner_join(brand::Entity).filter(
            Expr::expr(Func::lower(Expr::col((brand::Entity, brand::Column::Name))))
                .eq(name.to_lowercase()),
        );
    }
    if let Some(min) = filter.price_min {
        query = query.filter(product::Column::Price.gte(min));
    }
    if let Some(max) = filter.price_max {
        query = query.filter(product::Column::Price.lte(max));
    }

    let products = query.all(db).await?;
    let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    let mut ratings = review::ratings_for(db, &ids).await?;

    Ok(products
        .into_iter()
        .map(|p| {
            let rating = ratings.remove(&p.id).unwrap_or_default();
            ProductResponse::new(p, rating)
        })
        .collect())
}

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> Result<product::Model, StoreError> {
    find_or_not_found::<product::Entity, _>(db, id, "product").await
}

/// Full detail view: stored fields, rating aggregate and the reviews themselves.
pub async fn get_detail<C: ConnectionTrait>(db: &C, id: i32) -> Result<ProductResponse, StoreError> {
    let model = get(db, id).await?;
    let reviews = review::for_product(db, id).await?;
    let rating = RatingSummary::from_ratings(reviews.iter().map(|r| r.rating));
    Ok(ProductResponse::new(model, rating)
        .with_reviews(reviews.into_iter().map(ReviewResponse::from).collect()))
}

pub async fn create<C>(db: &C, input: ProductInput) -> Result<ProductResponse, StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    input.validate()?;
    let txn = db.begin().await?;

    require_reference::<category::Entity, _>(&txn, input.category, "category").await?;
    if let Some(brand_id) = input.brand {
        require_reference::<brand::Entity, _>(&txn, brand_id, "brand").await?;
    }

    let model = product::ActiveModel {
        name: Set(input.name),
        category_id: Set(input.category),
        brand_id: Set(input.brand),
        price: Set(input.price),
        stock: Set(input.stock),
        is_on_sale: Set(input.is_on_sale),
        discount_percentage: Set(input.discount_percentage),
        image: Set(input.image),
        description: Set(input.description),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(ProductResponse::new(model, RatingSummary::default()))
}

pub async fn update<C>(db: &C, id: i32, patch: ProductPatch) -> Result<ProductResponse, StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    patch.validate()?;
    let txn = db.begin().await?;
    let existing = get(&txn, id).await?;

    if let Some(category_id) = patch.category {
        require_reference::<category::Entity, _>(&txn, category_id, "category").await?;
    }
    if let Some(Some(brand_id)) = patch.brand {
        require_reference::<brand::Entity, _>(&txn, brand_id, "brand").await?;
    }

    let mut active: product::ActiveModel = existing.into();
    if let Some(name) = patch.name {
        active.name = Set(name);
    }
    if let Some(category_id) = patch.category {
        active.category_id = Set(category_id);
    }
    if let Some(brand_id) = patch.brand {
        active.brand_id = Set(brand_id);
    }
    if let Some(price) = patch.price {
        active.price = Set(price);
    }
    if let Some(stock) = patch.stock {
        active.stock = Set(stock);
    }
    if let Some(is_on_sale) = patch.is_on_sale {
        active.is_on_sale = Set(is_on_sale);
    }
    if let Some(discount) = patch.discount_percentage {
        active.discount_percentage = Set(discount);
    }
    if let Some(image) = patch.image {
        active.image = Set(image);
    }
    if let Some(description) = patch.description {
        active.description = Set(description);
    }

    let model = active.update(&txn).await?;
    let mut ratings = review::ratings_for(&txn, &[id]).await?;
    txn.commit().await?;

    Ok(ProductResponse::new(model, ratings.remove(&id).unwrap_or_default()))
}

pub async fn delete<C>(db: &C, id: i32) -> Result<(), StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    get(&txn, id).await?;
    delete_cascade(&txn, &[id]).await?;
    txn.commit().await?;
    tracing::info!(product_id = id, "Deleted product");
    Ok(())
}

/// Deletes every product in the given categories. Runs on the caller's
/// connection, which is expected to be a transaction.
pub(crate) async fn delete_in_categories<C: ConnectionTrait>(
    db: &C,
    category_ids: &[i32],
) -> Result<u64, StoreError> {
    let ids: Vec<i32> = product::Entity::find()
        .select_only()
        .column(product::Column::Id)
        .filter(product::Column::CategoryId.is_in(category_ids.iter().copied()))
        .into_tuple()
        .all(db)
        .await?;
    delete_cascade(db, &ids).await
}

/// Removes products along with the orders and reviews that reference them.
async fn delete_cascade<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<u64, StoreError> {
    if ids.is_empty() {
        return Ok(0);
    }
    review_entity::Entity::delete_many()
        .filter(review_entity::Column::ProductId.is_in(ids.iter().copied()))
        .exec(db)
        .await?;
    order::Entity::delete_many()
        .filter(order::Column::ProductId.is_in(ids.iter().copied()))
        .exec(db)
        .await?;
    let deleted = product::Entity::delete_many()
        .filter(product::Column::Id.is_in(ids.iter().copied()))
        .exec(db)
        .await?;
    Ok(deleted.rows_affected)
}
