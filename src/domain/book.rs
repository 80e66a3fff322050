use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{BookId, OrderId};

/// A catalogue entry and its stock counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub author: String,
    pub publisher: String,
    pub category: String,
    pub language: String,
    pub description: String,
    pub image: String,
    /// Unit price in the smallest currency unit.
    pub price: u64,
    /// Units available for new reservations.
    pub quantity: u32,
    /// Units reserved by orders that are not settled yet, keyed by order id.
    #[serde(default)]
    pub holds: BTreeMap<OrderId, u32>,
}

impl Book {
    /// Units currently reserved and not yet paid for or released.
    pub fn held(&self) -> u64 {
        self.holds.values().map(|&units| u64::from(units)).sum()
    }
}

/// Payload for adding a book to the catalogue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookCreate {
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub price: u64,
    pub quantity: u32,
}

impl BookCreate {
    pub fn new(name: impl Into<String>, price: u64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
            ..Default::default()
        }
    }
}

/// Partial update of a book; `None` leaves the field alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookPatch {
    pub name: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<u64>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookQuery {
    All,
    Name(String),
}
