//! Cafe data models
//!
//! Defines the stored cafe record and the payload accepted when adding one.

use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Unique identifier for a cafe (SQLite rowid)
pub type CafeId = i64;

/// Maximum length of short text columns (name, location, seats, price)
pub const MAX_SHORT_TEXT: usize = 250;

/// Maximum length of URL columns
pub const MAX_URL_TEXT: usize = 500;

/// A cafe as stored in the `cafe` table
///
/// Field order matches the table's column order; the JSON representation
/// follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Cafe {
    /// Generated primary key
    pub id: CafeId,
    /// Unique display name
    pub name: String,
    /// Link to the cafe on a map
    pub map_url: String,
    /// Link to a photo of the cafe
    pub img_url: String,
    /// Neighbourhood the cafe is in
    pub location: String,
    /// Free-text seating capacity, e.g. "50+"
    pub seats: String,
    /// Whether a toilet is available
    pub has_toilet: bool,
    /// Whether wifi is available
    pub has_wifi: bool,
    /// Whether power sockets are available
    pub has_sockets: bool,
    /// Whether taking phone calls is acceptable
    pub can_take_calls: bool,
    /// Price of a coffee, if known
    pub coffee_price: Option<String>,
}

impl Cafe {
    /// Copy every non-id field into an insert payload under a new name
    pub fn to_new(&self, name: impl Into<String>) -> NewCafe {
        NewCafe {
            name: name.into(),
            map_url: self.map_url.clone(),
            img_url: self.img_url.clone(),
            location: self.location.clone(),
            seats: self.seats.clone(),
            has_toilet: self.has_toilet,
            has_wifi: self.has_wifi,
            has_sockets: self.has_sockets,
            can_take_calls: self.can_take_calls,
            coffee_price: self.coffee_price.clone(),
        }
    }
}

/// Payload for adding a cafe: every column except the generated id
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCafe {
    /// Unique display name
    pub name: String,
    /// Link to the cafe on a map
    pub map_url: String,
    /// Link to a photo of the cafe
    pub img_url: String,
    /// Neighbourhood the cafe is in
    pub location: String,
    /// Free-text seating capacity
    pub seats: String,
    /// Whether a toilet is available
    #[serde(deserialize_with = "flag")]
    pub has_toilet: bool,
    /// Whether wifi is available
    #[serde(deserialize_with = "flag")]
    pub has_wifi: bool,
    /// Whether power sockets are available
    #[serde(deserialize_with = "flag")]
    pub has_sockets: bool,
    /// Whether taking phone calls is acceptable
    #[serde(deserialize_with = "flag")]
    pub can_take_calls: bool,
    /// Price of a coffee, if known
    #[serde(default)]
    pub coffee_price: Option<String>,
}

impl NewCafe {
    /// Check the declared column length limits
    /// Returns Ok(()) if valid, Err with message if invalid
    pub fn validate(&self) -> Result<(), String> {
        let short_fields = [
            ("name", self.name.as_str()),
            ("location", self.location.as_str()),
            ("seats", self.seats.as_str()),
            ("coffee_price", self.coffee_price.as_deref().unwrap_or("")),
        ];
        for (field, value) in short_fields {
            check_length(field, value, MAX_SHORT_TEXT)?;
        }

        check_length("map_url", &self.map_url, MAX_URL_TEXT)?;
        check_length("img_url", &self.img_url, MAX_URL_TEXT)?;
        Ok(())
    }
}

/// Boolean column value: JSON `true`/`false`, or the integers 0 and 1
#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(de::Error::custom(format!(
            "expected a boolean or 0/1, got {}",
            other
        ))),
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!(
            "Field '{}' exceeds maximum length of {} characters",
            field, max
        ));
    }
    Ok(())
}
