pub mod auth;
pub mod brand;
pub mod category;
pub mod health;
pub mod order;
pub mod product;
pub mod review;
