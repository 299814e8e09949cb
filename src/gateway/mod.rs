//! The remote data gateway.
//!
//! The console keeps no data of its own; everything it shows comes from the
//! backend API and every mutation is forwarded to it. This module holds the
//! typed client, the wire models and the notice extraction shared by both.

mod client;
mod models;
mod notice;

pub use client::{ApiClient, Payload};
pub use models::{
    CreateStoreResponse, Customer, CustomerStatus, Entry, EntryKind, HistoryFilter, ImageUpload,
    LoginResponse, NewEntry, NewProduct, Product, ProductPatch, StockEvent, StockEventKind,
};
pub use notice::extract_notice;
