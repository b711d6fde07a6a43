//! `SeaORM` active enums

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fulfillment state of an order. Transitions only move forward:
/// `Pending -> Processing -> Delivered`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "delivered")]
    Delivered,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl OrderStatus {
    /// Whether moving from `self` to `next` is allowed. Staying in place is a no-op
    /// and is accepted.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        next >= self
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Delivered => "delivered",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_moves_forward() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Delivered.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        let parsed: OrderStatus = serde_json::from_str("\"delivered\"").unwrap();
        assert_eq!(parsed, OrderStatus::Delivered);
    }
}
