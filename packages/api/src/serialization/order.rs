use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::double_option;
use crate::entity::{order, sea_orm_active_enums::OrderStatus};
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub user: i32,
    pub product: i32,
    pub quantity: i32,
    pub status: OrderStatus,
    pub order_date: NaiveDateTime,
    pub delivery_date: Option<NaiveDateTime>,
}

impl From<order::Model> for OrderResponse {
    fn from(model: order::Model) -> Self {
        Self {
            id: model.id,
            user: model.user_id,
            product: model.product_id,
            quantity: model.quantity,
            status: model.status,
            order_date: model.order_date,
            delivery_date: model.delivery_date,
        }
    }
}

/// Order create body. `user` comes from the caller, `order_date` from the server.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderInput {
    pub product: i32,
    pub quantity: i32,
}

impl OrderInput {
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_quantity(self.quantity)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct OrderPatch {
    pub quantity: Option<i32>,
    pub status: Option<OrderStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub delivery_date: Option<Option<NaiveDateTime>>,
}

impl OrderPatch {
    pub fn validate(&self) -> Result<(), StoreError> {
        match self.quantity {
            Some(quantity) => validate_quantity(quantity),
            None => Ok(()),
        }
    }
}

fn validate_quantity(quantity: i32) -> Result<(), StoreError> {
    if quantity > 0 {
        Ok(())
    } else {
        Err(StoreError::Validation("quantity must be a positive integer".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_must_be_positive() {
        assert!(OrderInput { product: 1, quantity: 1 }.validate().is_ok());
        assert!(OrderInput { product: 1, quantity: 0 }.validate().is_err());
        let patch = OrderPatch {
            quantity: Some(-2),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn unknown_status_is_rejected_at_parse_time() {
        let parsed = serde_json::from_value::<OrderPatch>(serde_json::json!({"status": "shipped"}));
        assert!(parsed.is_err());
    }
}
