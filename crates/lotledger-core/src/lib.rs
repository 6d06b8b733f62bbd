//! Core types for lotledger
//!
//! This crate provides the fundamental types used throughout the lotledger
//! project:
//!
//! - [`PurchaseLot`] - A bulk intake from a supplier, sold off in shipments
//! - [`SaleShipment`] - One partial sale drawn against a lot
//! - [`CounterpartyPayment`] - A standalone settlement entry
//! - [`Snapshot`] - The immutable record set every computation reads
//! - [`PartyKey`] / [`PartySelector`] - Canonical counterparty identity
//! - [`Entry`] - The normalized transaction shape statements are built from
//!
//! All records are plain serde-derived data. Numeric fields default to zero
//! at the deserialization boundary, so downstream code never performs
//! "value or zero" coalescing of its own.
//!
//! # Example
//!
//! ```
//! use lotledger_core::{PartySelector, Snapshot, SaleShipment, normalize};
//! use rust_decimal_macros::dec;
//! use chrono::NaiveDate;
//!
//! let mut snapshot = Snapshot::default();
//! snapshot.shipments.push(SaleShipment {
//!     id: 1,
//!     lot_id: 7,
//!     customer_name: "Acme Farms".into(),
//!     date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
//!     sold_weight: dec!(400),
//!     unit_sell_price: dec!(20),
//!     mortality_weight: dec!(20),
//!     ..SaleShipment::default()
//! });
//!
//! let selector = PartySelector::by_name("Acme Farms");
//! let entries = normalize::customer_entries(&snapshot, &selector);
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].debit, dec!(7600)); // (400 - 20) * 20
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod entry;
pub mod model;
pub mod party;

pub use entry::{normalize, Entry, EntryKind};
pub use model::{
    CounterpartyPayment, PaymentComponents, PurchaseLot, SaleShipment, ShipmentPayment, Snapshot,
};
pub use party::{PartyKey, PartySelector};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
