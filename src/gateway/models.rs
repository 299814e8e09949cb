//! The wire types exchanged with the backend API.
//!
//! Field names follow the backend's JSON conventions (camelCase, Mongo-style
//! `_id`), so most structs carry serde renames.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Whether a ledger entry adds to or subtracts from a customer's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money received from the customer.
    Income,
    /// Money paid out or owed to the customer.
    Expense,
}

impl EntryKind {
    /// The value used in form submissions and the backend API.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }
}

/// One income or expense transaction against a customer's balance.
///
/// Entries are append-only: the backend never mutates or deletes them, and
/// neither does the console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// The transaction amount. Always non-negative; [Entry::kind] carries the
    /// direction.
    pub amount: f64,
    /// Whether the entry is income or an expense.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Free-form text describing the transaction.
    #[serde(default)]
    pub description: String,
    /// When the transaction happened.
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
}

/// The account standing of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    #[default]
    Inactive,
    Blocked,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
            CustomerStatus::Blocked => "blocked",
        }
    }
}

/// A customer (ledger owner) belonging to the logged-in store.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub orders: Option<u32>,
    #[serde(default)]
    pub status: Option<CustomerStatus>,
    /// The customer's ledger. The backend imposes no order; the view model
    /// sorts by descending timestamp for display.
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// A stocked item belonging to the logged-in store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub quantity: i64,
    /// Quantities below this are flagged as low stock.
    #[serde(default)]
    pub threshold_low: i64,
    /// Quantities below this are critically low.
    #[serde(default)]
    pub threshold_critical: i64,
    /// Path to the product image on the backend's file storage, if any.
    #[serde(default)]
    pub image: Option<String>,
    /// Blocked products reject stock adjustments at the interface level.
    #[serde(default)]
    pub blocked: bool,
}

impl Product {
    /// Whether the product should render in the low-stock state.
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.threshold_low
    }
}

/// Whether a stock history event added or removed quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockEventKind {
    #[default]
    Add,
    Remove,
}

impl StockEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockEventKind::Add => "add",
            StockEventKind::Remove => "remove",
        }
    }
}

/// One add/remove event in a product's stock history.
///
/// The backend reports the magnitude in `addedQuantity` for both event kinds;
/// [StockEvent::kind] carries the sign.
#[derive(Debug, Clone, Deserialize)]
pub struct StockEvent {
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
    #[serde(rename = "type", default)]
    pub kind: StockEventKind,
    #[serde(rename = "addedQuantity", default)]
    pub magnitude: i64,
}

/// The body of a successful `POST /auth/login` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub store_id: String,
}

/// The body of a `POST /auth/create-store` response.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStoreResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub id: Option<String>,
}

/// The fields needed to append a ledger entry.
#[derive(Debug, Clone, Serialize)]
pub struct NewEntry {
    /// The customer's credential, re-sent with each entry per the backend
    /// contract.
    pub password: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub description: String,
}

/// The fields needed to create a product. The image travels alongside as a
/// multipart file part.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub quantity: i64,
    pub threshold_low: i64,
    pub threshold_critical: i64,
    pub image: Option<ImageUpload>,
}

/// An image file submitted with a new product.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A partial update to a product, serialized as the backend's PATCH body.
///
/// `delete` is the backend's soft-delete sentinel, not an HTTP method.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_low: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_critical: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<bool>,
}

/// Filters forwarded to the backend's stock history query.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    /// Inclusive lower bound, as a 'YYYY-MM-DD' string.
    pub from: Option<String>,
    /// Inclusive upper bound, as a 'YYYY-MM-DD' string.
    pub to: Option<String>,
    pub kind: Option<StockEventKind>,
}

#[cfg(test)]
mod model_tests {
    use time::macros::datetime;

    use super::{Customer, CustomerStatus, Entry, EntryKind, Product, StockEvent, StockEventKind};

    #[test]
    fn entry_deserializes_from_backend_json() {
        let json = r#"{
            "amount": 125.5,
            "type": "expense",
            "description": "Box",
            "date": "2024-01-02T03:04:05Z"
        }"#;

        let entry: Entry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.amount, 125.5);
        assert_eq!(entry.kind, EntryKind::Expense);
        assert_eq!(entry.description, "Box");
        assert_eq!(entry.occurred_at, datetime!(2024-01-02 03:04:05 UTC));
    }

    #[test]
    fn customer_tolerates_missing_optional_fields() {
        let json = r#"{"_id": "64f1a2", "name": "Mere"}"#;

        let customer: Customer = serde_json::from_str(json).unwrap();

        assert_eq!(customer.id, "64f1a2");
        assert_eq!(customer.name, "Mere");
        assert!(customer.contact.is_none());
        assert!(customer.status.is_none());
        assert!(customer.entries.is_empty());
    }

    #[test]
    fn customer_status_deserializes_lowercase() {
        let customer: Customer =
            serde_json::from_str(r#"{"_id": "a", "name": "n", "status": "blocked"}"#).unwrap();

        assert_eq!(customer.status, Some(CustomerStatus::Blocked));
    }

    #[test]
    fn product_uses_camel_case_thresholds() {
        let json = r#"{
            "_id": "p1",
            "name": "Cotton Saree",
            "quantity": 8,
            "thresholdLow": 10,
            "thresholdCritical": 5,
            "blocked": false
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.threshold_low, 10);
        assert_eq!(product.threshold_critical, 5);
        assert!(product.is_low_stock());
    }

    #[test]
    fn stock_event_kind_defaults_to_add() {
        let json = r#"{"date": "2024-05-01T10:00:00Z", "addedQuantity": 5}"#;

        let event: StockEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.kind, StockEventKind::Add);
        assert_eq!(event.magnitude, 5);
    }
}
