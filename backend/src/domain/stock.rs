//! Stock item aggregate and its validated field types.
//!
//! Purpose: define the single inventory entity and the rules every write must
//! satisfy before reaching the store. Inbound adapters collect raw field text
//! into a [`StockDraft`]; converting it into [`NewStock`] (create) or
//! [`StockPatch`] (partial update) performs all validation.
//!
//! Invariants:
//! - `category` and `unit` belong to their enumerated sets.
//! - `quantity` is finite and non-negative.
//! - `name` is non-empty once trimmed.
//! - `user` is a well-formed user identifier.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::image::ImageUrl;
use super::user::{UserId, UserSummary, UserValidationError};

/// Validation failures for stock fields.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StockValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("name must not be empty")]
    EmptyName,
    #[error("`{value}` is not a valid category; expected one of {}", Category::ALL_NAMES)]
    UnknownCategory { value: String },
    #[error("`{value}` is not a valid unit; expected one of {}", Unit::ALL_NAMES)]
    UnknownUnit { value: String },
    #[error("quantity must not be negative")]
    NegativeQuantity,
    #[error("quantity `{value}` is not a finite number")]
    InvalidQuantity { value: String },
    #[error("user: {0}")]
    InvalidUser(#[from] UserValidationError),
    #[error("{field} `{value}` is not a valid date")]
    InvalidDate { field: &'static str, value: String },
}

impl StockValidationError {
    /// Wire name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::InvalidDate { field, .. } => *field,
            Self::EmptyName => "name",
            Self::UnknownCategory { .. } => "category",
            Self::UnknownUnit { .. } => "unit",
            Self::NegativeQuantity | Self::InvalidQuantity { .. } => "quantity",
            Self::InvalidUser(_) => "user",
        }
    }

    /// Stable machine-readable code for the failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing_field",
            Self::EmptyName => "empty_name",
            Self::UnknownCategory { .. } => "unknown_category",
            Self::UnknownUnit { .. } => "unknown_unit",
            Self::NegativeQuantity => "negative_quantity",
            Self::InvalidQuantity { .. } => "invalid_quantity",
            Self::InvalidUser(_) => "invalid_user",
            Self::InvalidDate { .. } => "invalid_date",
        }
    }
}

/// Identifier assigned by the store when a stock item is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockId(Uuid);

impl StockId {
    /// Parse an identifier from request text.
    ///
    /// Returns `None` for text that cannot name any stored record.
    ///
    /// # Examples
    /// ```
    /// use homestock::domain::StockId;
    ///
    /// assert!(StockId::parse("3fa85f64-5717-4562-b3fc-2c963f66afa6").is_some());
    /// assert!(StockId::parse("000000000000000000000000").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for StockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Food category of a stock item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Fruits,
    Vegetables,
    Grains,
    Dairy,
    Other,
}

impl Category {
    const ALL_NAMES: &'static str = "Fruits, Vegetables, Grains, Dairy, Other";

    /// Canonical wire and storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fruits => "Fruits",
            Self::Vegetables => "Vegetables",
            Self::Grains => "Grains",
            Self::Dairy => "Dairy",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = StockValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Fruits" => Ok(Self::Fruits),
            "Vegetables" => Ok(Self::Vegetables),
            "Grains" => Ok(Self::Grains),
            "Dairy" => Ok(Self::Dairy),
            "Other" => Ok(Self::Other),
            _ => Err(StockValidationError::UnknownCategory {
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurement unit for a quantity. Defaults to [`Unit::Units`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Kg,
    Grams,
    Liters,
    #[default]
    Units,
}

impl Unit {
    const ALL_NAMES: &'static str = "kg, grams, liters, units";

    /// Canonical wire and storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Grams => "grams",
            Self::Liters => "liters",
            Self::Units => "units",
        }
    }
}

impl FromStr for Unit {
    type Err = StockValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "kg" => Ok(Self::Kg),
            "grams" => Ok(Self::Grams),
            "liters" => Ok(Self::Liters),
            "units" => Ok(Self::Units),
            _ => Err(StockValidationError::UnknownUnit {
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-empty item name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StockName(String);

impl StockName {
    /// Validate and construct a name.
    pub fn new(name: impl Into<String>) -> Result<Self, StockValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StockValidationError::EmptyName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for StockName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<StockName> for String {
    fn from(value: StockName) -> Self {
        value.0
    }
}

impl TryFrom<String> for StockName {
    type Error = StockValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Finite, non-negative amount of an item.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Quantity(f64);

impl Quantity {
    /// Validate and construct a quantity.
    ///
    /// # Examples
    /// ```
    /// use homestock::domain::Quantity;
    ///
    /// assert!(Quantity::new(0.0).is_ok());
    /// assert!(Quantity::new(-1.0).is_err());
    /// assert!(Quantity::new(f64::NAN).is_err());
    /// ```
    pub fn new(value: f64) -> Result<Self, StockValidationError> {
        if !value.is_finite() {
            return Err(StockValidationError::InvalidQuantity {
                value: value.to_string(),
            });
        }
        if value < 0.0 {
            return Err(StockValidationError::NegativeQuantity);
        }
        Ok(Self(value))
    }

    /// Parse a quantity from form text.
    pub fn parse(raw: &str) -> Result<Self, StockValidationError> {
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| StockValidationError::InvalidQuantity {
                value: raw.to_owned(),
            })?;
        Self::new(value)
    }

    /// Numeric value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<Quantity> for f64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl TryFrom<f64> for Quantity {
    type Error = StockValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_stock_date(
    raw: &str,
    field: &'static str,
) -> Result<DateTime<Utc>, StockValidationError> {
    let trimmed = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| StockValidationError::InvalidDate {
            field,
            value: raw.to_owned(),
        })
}

/// Stored stock item with its owner resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct StockItem {
    pub id: StockId,
    pub name: StockName,
    pub category: Category,
    pub quantity: Quantity,
    pub unit: Unit,
    pub expiration_date: Option<DateTime<Utc>>,
    pub added_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub user: UserSummary,
    pub image: Option<ImageUrl>,
}

impl StockItem {
    /// Merge the supplied fields of `patch` into this item.
    ///
    /// Fields absent from the patch keep their current value. A changed owner
    /// is resolved by the store; in memory only the identifier is replaced.
    pub fn apply(&mut self, patch: StockPatch) {
        let StockPatch {
            name,
            category,
            quantity,
            unit,
            expiration_date,
            notes,
            user,
            image,
        } = patch;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(quantity) = quantity {
            self.quantity = quantity;
        }
        if let Some(unit) = unit {
            self.unit = unit;
        }
        if let Some(expiration_date) = expiration_date {
            self.expiration_date = expiration_date;
        }
        if let Some(notes) = notes {
            self.notes = Some(notes);
        }
        if let Some(user) = user {
            self.user.id = user;
        }
        if let Some(image) = image {
            self.image = Some(image);
        }
    }
}

/// Raw field text collected by an inbound adapter.
///
/// `id`, `addedDate`, and `image` are never accepted from clients and have no
/// slot here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockDraft {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
    pub expiration_date: Option<String>,
    pub notes: Option<String>,
    pub user: Option<String>,
}

/// Validated fields for a new stock item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStock {
    pub name: StockName,
    pub category: Category,
    pub quantity: Quantity,
    pub unit: Unit,
    pub expiration_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub user: UserId,
    pub image: Option<ImageUrl>,
}

impl NewStock {
    /// Attach the URL of an uploaded image.
    pub fn with_image(mut self, image: Option<ImageUrl>) -> Self {
        self.image = image;
        self
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, StockValidationError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(StockValidationError::MissingField { field }),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

impl TryFrom<StockDraft> for NewStock {
    type Error = StockValidationError;

    fn try_from(draft: StockDraft) -> Result<Self, Self::Error> {
        let StockDraft {
            name,
            category,
            quantity,
            unit,
            expiration_date,
            notes,
            user,
        } = draft;

        Ok(Self {
            name: StockName::new(required(name, "name")?)?,
            category: required(category, "category")?.parse::<Category>()?,
            quantity: Quantity::parse(&required(quantity, "quantity")?)?,
            unit: non_empty(unit)
                .map(|raw| raw.parse::<Unit>())
                .transpose()?
                .unwrap_or_default(),
            expiration_date: non_empty(expiration_date)
                .map(|raw| parse_stock_date(&raw, "expirationDate"))
                .transpose()?,
            notes,
            user: UserId::new(required(user, "user")?)?,
            image: None,
        })
    }
}

/// Validated partial update. `None` leaves the stored value untouched.
///
/// `expiration_date` is doubly optional: `Some(None)` clears the date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockPatch {
    pub name: Option<StockName>,
    pub category: Option<Category>,
    pub quantity: Option<Quantity>,
    pub unit: Option<Unit>,
    pub expiration_date: Option<Option<DateTime<Utc>>>,
    pub notes: Option<String>,
    pub user: Option<UserId>,
    pub image: Option<ImageUrl>,
}

impl StockPatch {
    /// Attach the URL of a replacement image.
    pub fn with_image(mut self, image: Option<ImageUrl>) -> Self {
        self.image = image;
        self
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl TryFrom<StockDraft> for StockPatch {
    type Error = StockValidationError;

    fn try_from(draft: StockDraft) -> Result<Self, Self::Error> {
        let StockDraft {
            name,
            category,
            quantity,
            unit,
            expiration_date,
            notes,
            user,
        } = draft;

        Ok(Self {
            name: name.map(StockName::new).transpose()?,
            category: category.map(|raw| raw.parse::<Category>()).transpose()?,
            quantity: quantity.map(|raw| Quantity::parse(&raw)).transpose()?,
            unit: unit.map(|raw| raw.parse::<Unit>()).transpose()?,
            expiration_date: expiration_date
                .map(|raw| {
                    if raw.trim().is_empty() {
                        Ok(None)
                    } else {
                        parse_stock_date(&raw, "expirationDate").map(Some)
                    }
                })
                .transpose()?,
            notes,
            user: user.map(UserId::new).transpose()?,
            image: None,
        })
    }
}

#[cfg(test)]
#[path = "stock_tests.rs"]
mod tests;
