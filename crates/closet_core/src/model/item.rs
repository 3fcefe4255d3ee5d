//! Clothing item domain model.
//!
//! # Responsibility
//! - Define the tracked possession record and its closed category set.
//! - Validate user input before it reaches the store.
//!
//! # Invariants
//! - `id` is assigned at creation and has no setter.
//! - `price` is finite and non-negative once validated.
//! - `wear_goal == None` means "no goal"; `Some(0)` never passes validation.
//! - Wire field names are camelCase so persisted blobs and exports share
//!   one shape.

use crate::model::day::{iso_timestamp, parse_calendar_day};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a clothing item.
///
/// Persisted and exported as the hyphenated UUID string. Blobs with other
/// id shapes do not deserialize; the store hydrates them as empty.
pub type ItemId = Uuid;

/// Closed set of item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Tops,
    Bottoms,
    Outerwear,
    Dresses,
    Shoes,
    Accessories,
    Other,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 7] = [
        Category::Tops,
        Category::Bottoms,
        Category::Outerwear,
        Category::Dresses,
        Category::Shoes,
        Category::Accessories,
        Category::Other,
    ];

    /// Wire label, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tops => "Tops",
            Self::Bottoms => "Bottoms",
            Self::Outerwear => "Outerwear",
            Self::Dresses => "Dresses",
            Self::Shoes => "Shoes",
            Self::Accessories => "Accessories",
            Self::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownCategory(trimmed.to_string()))
    }
}

/// Boundary validation failure for item or wear input.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Item name is empty after trimming.
    EmptyName,
    /// Price is negative, NaN or infinite.
    InvalidPrice(f64),
    /// A wear goal of zero was supplied; use `None` for "no goal".
    ZeroWearGoal,
    /// Category label is not part of the closed set.
    UnknownCategory(String),
    /// A date field is not an ISO-8601 date or date-time.
    InvalidDate { field: &'static str, value: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "item name is required"),
            Self::InvalidPrice(price) => {
                write!(f, "price must be a non-negative number, got {price}")
            }
            Self::ZeroWearGoal => write!(f, "wear goal must be at least 1 when set"),
            Self::UnknownCategory(value) => write!(f, "unknown category `{value}`"),
            Self::InvalidDate { field, value } => {
                write!(f, "{field} must be an ISO-8601 date, got `{value}`")
            }
        }
    }
}

impl Error for ValidationError {}

/// User-supplied item data, everything except the identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemInput {
    pub name: String,
    pub price: f64,
    pub category: Category,
    pub photo_url: Option<String>,
    /// ISO-8601 date or date-time string.
    pub purchase_date: String,
    pub wear_goal: Option<u32>,
    pub notes: Option<String>,
}

impl ItemInput {
    /// Creates input purchased "now", with every optional field unset.
    pub fn new(name: impl Into<String>, price: f64, category: Category) -> Self {
        Self {
            name: name.into(),
            price,
            category,
            photo_url: None,
            purchase_date: iso_timestamp(Local::now()),
            wear_goal: None,
            notes: None,
        }
    }

    /// Replaces the purchase date.
    pub fn with_purchase_date(mut self, purchase_date: impl Into<String>) -> Self {
        self.purchase_date = purchase_date.into();
        self
    }

    /// Sets a target wear count.
    pub fn with_wear_goal(mut self, wear_goal: u32) -> Self {
        self.wear_goal = Some(wear_goal);
        self
    }

    /// Validates input before it is handed to the store.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is blank.
    /// - `InvalidPrice` when `price` is negative or not finite.
    /// - `ZeroWearGoal` when `wear_goal == Some(0)`.
    /// - `InvalidDate` when `purchase_date` is not ISO-8601.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ValidationError::InvalidPrice(self.price));
        }
        if self.wear_goal == Some(0) {
            return Err(ValidationError::ZeroWearGoal);
        }
        if parse_calendar_day(&self.purchase_date).is_none() {
            return Err(ValidationError::InvalidDate {
                field: "purchase_date",
                value: self.purchase_date.clone(),
            });
        }
        Ok(())
    }
}

/// A tracked clothing possession.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItem {
    id: ItemId,
    pub name: String,
    /// Acquisition cost, fixed at creation.
    pub price: f64,
    pub category: Category,
    /// Image reference such as a data URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub purchase_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wear_goal: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ClothingItem {
    /// Builds an item from input with a freshly generated ID.
    pub fn new(input: ItemInput) -> Self {
        Self::with_id(Uuid::new_v4(), input)
    }

    /// Builds an item from input with a caller-provided ID.
    ///
    /// Used when an edit screen rebuilds an existing item from its form.
    pub fn with_id(id: ItemId, input: ItemInput) -> Self {
        Self {
            id,
            name: input.name,
            price: input.price,
            category: input.category,
            photo_url: input.photo_url,
            purchase_date: input.purchase_date,
            wear_goal: input.wear_goal,
            notes: input.notes,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Returns every field except the ID, in input form.
    pub fn to_input(&self) -> ItemInput {
        ItemInput {
            name: self.name.clone(),
            price: self.price,
            category: self.category,
            photo_url: self.photo_url.clone(),
            purchase_date: self.purchase_date.clone(),
            wear_goal: self.wear_goal,
            notes: self.notes.clone(),
        }
    }
}
