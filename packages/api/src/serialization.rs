//! API-facing representations and validated input payloads.
//!
//! Output types are built from entity rows plus computed fields. Input types
//! carry a `validate()` that checks the field constraints before anything
//! reaches the store.

use serde::{Deserialize, Deserializer};

use crate::store::StoreError;

pub mod brand;
pub mod category;
pub mod order;
pub mod product;
pub mod review;
pub mod user;

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in PATCH bodies.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn validate_name(field: &str, value: &str, max_len: usize) -> Result<(), StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(format!("{field} must not be blank")));
    }
    if value.chars().count() > max_len {
        return Err(StoreError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        parent: Option<Option<i32>>,
    }

    #[test]
    fn absent_and_null_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.parent, None);
        let null: Patch = serde_json::from_str(r#"{"parent": null}"#).unwrap();
        assert_eq!(null.parent, Some(None));
        let set: Patch = serde_json::from_str(r#"{"parent": 4}"#).unwrap();
        assert_eq!(set.parent, Some(Some(4)));
    }

    #[test]
    fn names_are_checked_for_blank_and_length() {
        assert!(validate_name("name", "Shoes", 100).is_ok());
        assert!(validate_name("name", "   ", 100).is_err());
        assert!(validate_name("name", &"x".repeat(101), 100).is_err());
    }
}
