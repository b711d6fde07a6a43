use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entity::review;
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub id: i32,
    pub product: i32,
    pub user: i32,
    pub rating: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

impl From<review::Model> for ReviewResponse {
    fn from(model: review::Model) -> Self {
        Self {
            id: model.id,
            product: model.product_id,
            user: model.user_id,
            rating: model.rating,
            comment: model.comment,
            created_at: model.created_at,
        }
    }
}

/// Body of a review create. No `user` field: the author is always the
/// authenticated caller.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReviewInput {
    pub product: i32,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

impl ReviewInput {
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_rating(self.rating)
    }
}

/// Edits to an existing review. Product and author are fixed once created.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReviewPatch {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

impl ReviewPatch {
    pub fn validate(&self) -> Result<(), StoreError> {
        match self.rating {
            Some(rating) => validate_rating(rating),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewFilter {
    pub product: Option<i32>,
}

fn validate_rating(rating: i32) -> Result<(), StoreError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(StoreError::Validation("rating must be between 1 and 5".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        for rating in 1..=5 {
            let input = ReviewInput { product: 1, rating, comment: String::new() };
            assert!(input.validate().is_ok());
        }
        for rating in [0, 6, -3] {
            let input = ReviewInput { product: 1, rating, comment: String::new() };
            assert!(matches!(input.validate(), Err(StoreError::Validation(_))));
        }
    }

    #[test]
    fn client_supplied_user_is_ignored() {
        let input: ReviewInput = serde_json::from_value(serde_json::json!({
            "product": 3, "rating": 4, "user": 99
        }))
        .unwrap();
        assert_eq!(input.product, 3);
        assert_eq!(input.comment, "");
    }
}
