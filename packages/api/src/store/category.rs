use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::{StoreError, find_or_not_found, product, require_reference};
use crate::catalog::tree::CategoryTree;
use crate::entity::category;
use crate::serialization::category::{CategoryInput, CategoryNode, CategoryPatch};

/// Rows removed by a category delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteSummary {
    pub categories: u64,
    pub products: u64,
}

/// Loads every category into the adjacency index, in id order.
pub async fn load_tree<C: ConnectionTrait>(db: &C) -> Result<CategoryTree, StoreError> {
    let models = category::Entity::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?;
    Ok(CategoryTree::from_models(models))
}

/// Top-level categories, each carrying its nested subtree.
pub async fn list_top_level<C: ConnectionTrait>(db: &C) -> Result<Vec<CategoryNode>, StoreError> {
    let tree = load_tree(db).await?;
    Ok(tree.nested_roots()?)
}

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> Result<category::Model, StoreError> {
    find_or_not_found::<category::Entity, _>(db, id, "category").await
}

pub async fn get_nested<C: ConnectionTrait>(db: &C, id: i32) -> Result<CategoryNode, StoreError> {
    let tree = load_tree(db).await?;
    if tree.get(id).is_none() {
        return Err(StoreError::NotFound {
            entity: "category",
            id,
        });
    }
    Ok(tree.nested(id)?)
}

/// Direct children of `id`, in insertion order.
pub async fn subcategories<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Vec<category::Model>, StoreError> {
    Ok(category::Entity::find()
        .filter(category::Column::ParentId.eq(id))
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?)
}

pub async fn create<C>(db: &C, input: CategoryInput) -> Result<category::Model, StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    input.validate()?;
    let txn = db.begin().await?;

    if let Some(parent_id) = input.parent {
        require_reference::<category::Entity, _>(&txn, parent_id, "parent category").await?;
    }

    let model = category::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        parent_id: Set(input.parent),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(model)
}

pub async fn update<C>(db: &C, id: i32, patch: CategoryPatch) -> Result<category::Model, StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    patch.validate()?;
    let txn = db.begin().await?;
    let existing = get(&txn, id).await?;

    if let Some(Some(parent_id)) = patch.parent {
        require_reference::<category::Entity, _>(&txn, parent_id, "parent category").await?;
        let tree = load_tree(&txn).await?;
        if tree.is_descendant_or_self(id, parent_id)? {
            return Err(StoreError::Validation(format!(
                "category {parent_id} cannot become the parent of {id}: it is the category itself or one of its descendants"
            )));
        }
    }

    let mut active: category::ActiveModel = existing.into();
    if let Some(name) = patch.name {
        active.name = Set(name);
    }
    if let Some(description) = patch.description {
        active.description = Set(description);
    }
    if let Some(parent) = patch.parent {
        active.parent_id = Set(parent);
    }

    let model = active.update(&txn).await?;
    txn.commit().await?;
    Ok(model)
}

/// Deletes the category, every descendant category and all of their products
/// (with those products' orders and reviews).
pub async fn delete<C>(db: &C, id: i32) -> Result<DeleteSummary, StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let tree = load_tree(&txn).await?;
    if tree.get(id).is_none() {
        return Err(StoreError::NotFound {
            entity: "category",
            id,
        });
    }
    let subtree = tree.descendants(id)?;

    let products = product::delete_in_categories(&txn, &subtree).await?;
    let categories = category::Entity::delete_many()
        .filter(category::Column::Id.is_in(subtree.iter().copied()))
        .exec(&txn)
        .await?
        .rows_affected;

    txn.commit().await?;
    tracing::info!(category_id = id, categories, products, "Deleted category subtree");
    Ok(DeleteSummary {
        categories,
        products,
    })
}
