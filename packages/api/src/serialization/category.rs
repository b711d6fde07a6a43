use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{double_option, validate_name};
use crate::entity::category;
use crate::store::StoreError;

const NAME_MAX: usize = 100;

/// A category with its full subtree, as returned by list and retrieve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryNode {
    pub id: i32,
    pub name: String,
    pub parent: Option<i32>,
    #[schema(no_recursion)]
    pub subcategories: Vec<CategoryNode>,
}

/// Flat representation returned after a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub parent: Option<i32>,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            parent: model.parent_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent: Option<i32>,
}

impl CategoryInput {
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_name("name", &self.name, NAME_MAX)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent: Option<Option<i32>>,
}

impl CategoryPatch {
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(name) = &self.name {
            validate_name("name", name, NAME_MAX)?;
        }
        Ok(())
    }
}

impl From<CategoryInput> for CategoryPatch {
    fn from(input: CategoryInput) -> Self {
        Self {
            name: Some(input.name),
            description: Some(input.description),
            parent: Some(input.parent),
        }
    }
}
