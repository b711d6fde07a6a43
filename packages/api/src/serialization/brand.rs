use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validate_name;
use crate::entity::brand;
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BrandResponse {
    pub id: i32,
    pub name: String,
}

impl From<brand::Model> for BrandResponse {
    fn from(model: brand::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BrandInput {
    pub name: String,
}

impl BrandInput {
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_name("name", &self.name, 100)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BrandPatch {
    pub name: Option<String>,
}
