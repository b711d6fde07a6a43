//! `SeaORM` entities backing the storefront tables.

pub mod prelude;

pub mod brand;
pub mod category;
pub mod order;
pub mod product;
pub mod review;
pub mod sea_orm_active_enums;
pub mod user;
