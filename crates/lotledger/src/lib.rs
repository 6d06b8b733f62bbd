//! Ledger reconciliation engine for trading lots.
//!
//! Tracks bulk purchase lots that are progressively sold off in partial
//! shipments and answers, for any counterparty and date range: how much is
//! owed, how much has been paid, and what the running balance was at every
//! point in time. Two independent transaction streams (trades and payments)
//! become one chronologically ordered, balance-carrying statement, plus the
//! accrual metrics (COGS, mortality loss, shrinkage, margin) the reporting
//! views consume.
//!
//! The engine is an in-process library: persistence, realtime transport,
//! rendering and authentication are collaborators. Every computation is a
//! pure transform over an immutable [`Snapshot`]; the
//! [`refresh`](lotledger_refresh) layer only decides *when* to run it.
//!
//! # Example
//!
//! ```
//! use lotledger::{customer_statement, PartySelector, Period, Report, Snapshot};
//! use lotledger::{PurchaseLot, SaleShipment};
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let snapshot = Snapshot {
//!     lots: vec![PurchaseLot {
//!         id: 1,
//!         date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!         supplier_name: "Farm Co".into(),
//!         weight: dec!(1000),
//!         unit_cost: dec!(10),
//!         ..PurchaseLot::default()
//!     }],
//!     shipments: vec![SaleShipment {
//!         id: 1,
//!         lot_id: 1,
//!         customer_name: "Acme".into(),
//!         date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
//!         sold_weight: dec!(400),
//!         mortality_weight: dec!(20),
//!         unit_sell_price: dec!(20),
//!         ..SaleShipment::default()
//!     }],
//!     ..Snapshot::default()
//! };
//!
//! let statement = customer_statement(
//!     &snapshot,
//!     &PartySelector::by_name("Acme"),
//!     Period::UNBOUNDED,
//! );
//! assert_eq!(statement.closing_balance, dec!(-7600));
//!
//! let report = Report::compute(&snapshot);
//! assert_eq!(report.dashboard.cogs, dec!(4200));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;

pub use engine::{customer_statement, supplier_statement, Report, TOP_N};

pub use lotledger_analytics::{
    DashboardMetrics, LotSummary, TopEntry, UnlinkedSummary, FINISHED_SHRINKAGE_PCT,
};
pub use lotledger_core::{
    CounterpartyPayment, Entry, EntryKind, PartyKey, PartySelector, PaymentComponents,
    PurchaseLot, SaleShipment, ShipmentPayment, Snapshot,
};
pub use lotledger_refresh as refresh;
pub use lotledger_statement::{Period, Statement, StatementRow};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
