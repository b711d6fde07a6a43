pub use super::brand::Entity as Brand;
pub use super::category::Entity as Category;
pub use super::order::Entity as Order;
pub use super::product::Entity as Product;
pub use super::review::Entity as Review;
pub use super::user::Entity as User;
