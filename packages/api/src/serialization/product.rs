use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::review::ReviewResponse;
use super::{double_option, validate_name};
use crate::catalog::rating::RatingSummary;
use crate::entity::product;
use crate::store::StoreError;

const NAME_MAX: usize = 100;
const PRICE_SCALE: u32 = 2;
/// Largest `DECIMAL(10, 2)` value: 99999999.99.
const PRICE_MAX: Decimal = Decimal::from_parts(
    9_999_999_999_u64 as u32,
    (9_999_999_999_u64 >> 32) as u32,
    0,
    false,
    PRICE_SCALE,
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub category: i32,
    pub brand: Option<i32>,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    pub stock: i32,
    pub is_on_sale: bool,
    pub discount_percentage: Option<i32>,
    pub image: Option<String>,
    pub description: String,
    pub average_rating: f64,
    pub total_reviews: u64,
    /// Only present on the detail view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<ReviewResponse>>,
}

impl ProductResponse {
    pub fn new(model: product::Model, rating: RatingSummary) -> Self {
        // SQLite hands DECIMAL columns back as floats.
        let mut price = model.price.round_dp(PRICE_SCALE);
        price.rescale(PRICE_SCALE);

        Self {
            id: model.id,
            name: model.name,
            category: model.category_id,
            brand: model.brand_id,
            price,
            stock: model.stock,
            is_on_sale: model.is_on_sale,
            discount_percentage: model.discount_percentage,
            image: model.image,
            description: model.description,
            average_rating: rating.average_rating,
            total_reviews: rating.total_reviews,
            reviews: None,
        }
    }

    pub fn with_reviews(mut self, reviews: Vec<ReviewResponse>) -> Self {
        self.reviews = Some(reviews);
        self
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductInput {
    pub name: String,
    pub category: i32,
    #[serde(default)]
    pub brand: Option<i32>,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    pub stock: i32,
    #[serde(default)]
    pub is_on_sale: bool,
    #[serde(default = "default_discount")]
    pub discount_percentage: Option<i32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: String,
}

fn default_discount() -> Option<i32> {
    Some(0)
}

impl ProductInput {
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_name("name", &self.name, NAME_MAX)?;
        validate_price(self.price)?;
        validate_stock(self.stock)?;
        validate_discount(self.discount_percentage)?;
        validate_image(self.image.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub brand: Option<Option<i32>>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub is_on_sale: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub discount_percentage: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    pub description: Option<String>,
}

impl ProductPatch {
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(name) = &self.name {
            validate_name("name", name, NAME_MAX)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        if let Some(discount) = self.discount_percentage {
            validate_discount(discount)?;
        }
        if let Some(image) = &self.image {
            validate_image(image.as_deref())?;
        }
        Ok(())
    }
}

impl From<ProductInput> for ProductPatch {
    fn from(input: ProductInput) -> Self {
        Self {
            name: Some(input.name),
            category: Some(input.category),
            brand: Some(input.brand),
            price: Some(input.price),
            stock: Some(input.stock),
            is_on_sale: Some(input.is_on_sale),
            discount_percentage: Some(input.discount_percentage),
            image: Some(input.image),
            description: Some(input.description),
        }
    }
}

/// Query filters for the product list. All present filters must match.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// Exact category name, case-insensitive.
    pub category: Option<String>,
    /// Exact brand name, case-insensitive.
    pub brand: Option<String>,
    /// Inclusive lower price bound.
    #[param(value_type = Option<String>)]
    pub price_min: Option<Decimal>,
    /// Inclusive upper price bound.
    #[param(value_type = Option<String>)]
    pub price_max: Option<Decimal>,
}

fn validate_price(price: Decimal) -> Result<(), StoreError> {
    if price.is_sign_negative() {
        return Err(StoreError::Validation("price must not be negative".into()));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(StoreError::Validation(
            "price must have at most 2 decimal places".into(),
        ));
    }
    if price > PRICE_MAX {
        return Err(StoreError::Validation("price must have at most 10 digits".into()));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> Result<(), StoreError> {
    if stock < 0 {
        return Err(StoreError::Validation("stock must not be negative".into()));
    }
    Ok(())
}

fn validate_discount(discount: Option<i32>) -> Result<(), StoreError> {
    match discount {
        Some(d) if !(0..=100).contains(&d) => Err(StoreError::Validation(
            "discount_percentage must be between 0 and 100".into(),
        )),
        _ => Ok(()),
    }
}

fn validate_image(image: Option<&str>) -> Result<(), StoreError> {
    let Some(url) = image else {
        return Ok(());
    };
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with('/') {
        Ok(())
    } else {
        Err(StoreError::Validation(
            "image must be an absolute URL or path to the stored blob".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ProductInput {
        serde_json::from_value(serde_json::json!({
            "name": "Trail Runner",
            "category": 1,
            "price": "49.90",
            "stock": 3
        }))
        .unwrap()
    }

    #[test]
    fn defaults_are_applied() {
        let input = input();
        assert!(!input.is_on_sale);
        assert_eq!(input.discount_percentage, Some(0));
        assert_eq!(input.description, "");
        assert_eq!(input.price, Decimal::new(4990, 2));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn numeric_price_is_accepted() {
        let input: ProductInput = serde_json::from_value(serde_json::json!({
            "name": "Cap", "category": 1, "price": 12.5, "stock": 0
        }))
        .unwrap();
        assert_eq!(input.price, Decimal::new(125, 1));
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        let mut bad = input();
        bad.discount_percentage = Some(101);
        assert!(matches!(bad.validate(), Err(StoreError::Validation(_))));

        let mut bad = input();
        bad.stock = -1;
        assert!(bad.validate().is_err());

        let mut bad = input();
        bad.price = Decimal::new(-1, 0);
        assert!(bad.validate().is_err());

        let mut bad = input();
        bad.price = Decimal::new(1999, 3);
        assert!(bad.validate().is_err());

        let mut bad = input();
        bad.image = Some("not a url".into());
        assert!(bad.validate().is_err());
    }

    #[test]
    fn price_bounds_follow_the_column() {
        let mut max = input();
        max.price = Decimal::new(99_999_999_99, 2);
        assert!(max.validate().is_ok());

        let mut over = input();
        over.price = Decimal::new(100_000_000_00, 2);
        assert!(matches!(over.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn price_keeps_two_decimal_places() {
        let model = |price: Decimal| product::Model {
            id: 1,
            name: "Cap".into(),
            category_id: 2,
            brand_id: None,
            price,
            stock: 5,
            is_on_sale: false,
            discount_percentage: Some(0),
            image: None,
            description: String::new(),
        };

        for (stored, shown) in [
            (Decimal::new(10, 0), "10.00"),
            (Decimal::new(1, 1), "0.10"),
            (Decimal::from_f64_retain(19.99).unwrap(), "19.99"),
        ] {
            let json =
                serde_json::to_value(ProductResponse::new(model(stored), RatingSummary::default()))
                    .unwrap();
            assert_eq!(json["price"], shown);
        }
    }

    #[test]
    fn price_serializes_as_string() {
        let model = product::Model {
            id: 1,
            name: "Cap".into(),
            category_id: 2,
            brand_id: None,
            price: Decimal::new(1999, 2),
            stock: 5,
            is_on_sale: false,
            discount_percentage: Some(0),
            image: None,
            description: String::new(),
        };
        let json = serde_json::to_value(ProductResponse::new(model, RatingSummary::default())).unwrap();
        assert_eq!(json["price"], "19.99");
        assert_eq!(json["average_rating"], 0.0);
        assert!(json.get("reviews").is_none());
    }
}
