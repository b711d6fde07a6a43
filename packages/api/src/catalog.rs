//! Catalog domain logic that sits between raw rows and API representations.

pub mod rating;
pub mod tree;
