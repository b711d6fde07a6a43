//! Table creation from the entity definitions.
//!
//! This is not a migration system: tables are created when missing and left
//! alone otherwise.

use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};

use crate::entity::{brand, category, order, product, review, user};

pub const REVIEW_UNIQUE_INDEX: &str = "idx-reviews-product-user";

pub async fn create_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    // Parents before dependents so foreign keys resolve.
    create_table(db, category::Entity).await?;
    create_table(db, brand::Entity).await?;
    create_table(db, user::Entity).await?;
    create_table(db, product::Entity).await?;
    create_table(db, order::Entity).await?;
    create_table(db, review::Entity).await?;

    let unique_review = Index::create()
        .name(REVIEW_UNIQUE_INDEX)
        .table(review::Entity)
        .col(review::Column::ProductId)
        .col(review::Column::UserId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(backend.build(&unique_review)).await?;

    tracing::debug!("Schema ready on {:?}", backend);
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}
