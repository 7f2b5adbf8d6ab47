use chrono::{DateTime, Utc};
use common::{ExternalId, round_to_cents};
use document_store::{Collection, Document};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::error::ValidationError;

/// A catalog item belonging to a menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub food_id: ExternalId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub food_image: String,
    pub menu_id: ExternalId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Food {
    const COLLECTION: Collection = Collection::Foods;

    fn external_id(&self) -> &ExternalId {
        &self.food_id
    }
}

impl Food {
    /// Builds a new food with a fresh identifier and its price rounded to cents.
    pub fn new(input: NewFood, now: DateTime<Utc>) -> Self {
        Self {
            food_id: ExternalId::generate(),
            name: input.name,
            price: round_to_cents(input.price),
            food_image: input.food_image,
            menu_id: input.menu_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload for creating a food.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFood {
    pub name: String,
    pub price: Decimal,
    pub food_image: String,
    pub menu_id: ExternalId,
}

impl NewFood {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("food_image", &self.food_image)?;
        validate_price(self.price)
    }
}

/// Partial update for a food.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_id: Option<ExternalId>,
}

impl FoodPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(image) = &self.food_image {
            require_text("food_image", image)?;
        }
        match self.price {
            Some(price) => validate_price(price),
            None => Ok(()),
        }
    }

    /// Rounds an explicit price update to cents.
    pub fn rounded(mut self) -> Self {
        self.price = self.price.map(round_to_cents);
        self
    }
}

pub(crate) fn validate_price(price: Decimal) -> Result<(), ValidationError> {
    if price <= Decimal::ZERO {
        return Err(ValidationError::InvalidPrice { price });
    }
    Ok(())
}
