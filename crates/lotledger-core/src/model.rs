//! Raw record types supplied by the data collaborator.
//!
//! These mirror what the persistence layer hands over on each refresh: plain
//! rows with no behaviour beyond derived accessors. The engine never mutates
//! them; every computation reads a [`Snapshot`] and produces fresh output.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bulk intake from a supplier.
///
/// A lot is referenced by zero or more [`SaleShipment`]s via `lot_id`. A
/// shipment whose `lot_id` does not resolve is *orphaned*, which is data,
/// not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLot {
    /// Record id.
    pub id: u64,
    /// Intake date.
    pub date: NaiveDate,
    /// Supplier id, when the master-data layer assigned one.
    #[serde(default)]
    pub supplier_id: Option<String>,
    /// Supplier display name.
    #[serde(default)]
    pub supplier_name: String,
    /// Site the lot originated from.
    #[serde(default)]
    pub origin_site: String,
    /// Transport reference (vehicle/waybill).
    #[serde(default)]
    pub transport_ref: String,
    /// Driver reference.
    #[serde(default)]
    pub driver_ref: String,
    /// Heads taken in.
    #[serde(default)]
    pub headcount: u32,
    /// Total intake weight, kg.
    #[serde(default)]
    pub weight: Decimal,
    /// Purchase price per kg.
    #[serde(default)]
    pub unit_cost: Decimal,
}

impl PurchaseLot {
    /// Total purchase cost of the lot.
    #[must_use]
    pub fn total_cost(&self) -> Decimal {
        self.weight * self.unit_cost
    }

    /// Average weight per head, zero when the lot has no headcount.
    #[must_use]
    pub fn avg_unit_weight(&self) -> Decimal {
        if self.headcount == 0 {
            Decimal::ZERO
        } else {
            self.weight / Decimal::from(self.headcount)
        }
    }
}

/// A payment sub-record embedded in a shipment (settled on delivery).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentPayment {
    /// Settlement date.
    pub date: NaiveDate,
    /// Amount paid.
    #[serde(default)]
    pub amount: Decimal,
    /// Free-text note.
    #[serde(default)]
    pub note: String,
}

/// One partial sale drawn from exactly one [`PurchaseLot`], to one customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleShipment {
    /// Record id.
    pub id: u64,
    /// Id of the originating lot. May not resolve (orphaned shipment).
    pub lot_id: u64,
    /// Customer id, when the master-data layer assigned one.
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Customer display name.
    #[serde(default)]
    pub customer_name: String,
    /// Shipment date.
    pub date: NaiveDate,
    /// Heads sold.
    #[serde(default)]
    pub sold_headcount: u32,
    /// Weight sold, kg.
    #[serde(default)]
    pub sold_weight: Decimal,
    /// Sell price per kg.
    #[serde(default)]
    pub unit_sell_price: Decimal,
    /// Heads lost during this shipment.
    #[serde(default)]
    pub mortality_headcount: u32,
    /// Weight lost during this shipment, kg.
    #[serde(default)]
    pub mortality_weight: Decimal,
    /// Unloading cost.
    #[serde(default)]
    pub unloading_cost: Decimal,
    /// Driver bonus.
    #[serde(default)]
    pub driver_bonus: Decimal,
    /// Operational cost.
    #[serde(default)]
    pub operational_cost: Decimal,
    /// Transport cost.
    #[serde(default)]
    pub transport_cost: Decimal,
    /// Payments settled on delivery.
    #[serde(default)]
    pub payments: Vec<ShipmentPayment>,
}

impl SaleShipment {
    /// Net billable weight: sold weight less mortality, floored at zero.
    #[must_use]
    pub fn net_weight(&self) -> Decimal {
        (self.sold_weight - self.mortality_weight).max(Decimal::ZERO)
    }

    /// Billed amount: net billable weight times the unit sell price.
    #[must_use]
    pub fn billed_amount(&self) -> Decimal {
        self.net_weight() * self.unit_sell_price
    }

    /// Mortality loss valued at sale price (lost revenue, not lost cost).
    #[must_use]
    pub fn mortality_loss(&self) -> Decimal {
        self.mortality_weight * self.unit_sell_price
    }

    /// Sum of the secondary costs carried by this shipment.
    #[must_use]
    pub fn secondary_costs(&self) -> Decimal {
        self.unloading_cost + self.driver_bonus + self.operational_cost + self.transport_cost
    }

    /// Total settled on delivery through embedded payments.
    #[must_use]
    pub fn paid_on_delivery(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount).sum()
    }
}

/// Amount of a payment broken down by method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentComponents {
    /// Cash component.
    #[serde(default)]
    pub cash: Decimal,
    /// Bank transfer component.
    #[serde(default)]
    pub transfer: Decimal,
    /// Cheque component.
    #[serde(default)]
    pub cheque: Decimal,
    /// Anything else.
    #[serde(default)]
    pub other: Decimal,
}

impl PaymentComponents {
    /// Sum of all components.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cash + self.transfer + self.cheque + self.other
    }
}

/// A standalone settlement entry against a counterparty's aggregate balance.
///
/// Not linked to a specific shipment or lot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartyPayment {
    /// Record id.
    pub id: u64,
    /// Settlement date.
    pub date: NaiveDate,
    /// Counterparty id, when assigned.
    #[serde(default)]
    pub counterparty_id: Option<String>,
    /// Counterparty display name.
    #[serde(default)]
    pub counterparty_name: String,
    /// Amount by method.
    #[serde(default)]
    pub components: PaymentComponents,
    /// Free-text note.
    #[serde(default)]
    pub note: String,
}

impl CounterpartyPayment {
    /// Total paid across all components.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.components.total()
    }
}

/// The full record set the engine computes over.
///
/// A snapshot is always replaced wholesale, never patched in place, so the
/// trade and payment streams can never drift apart mid-computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// All purchase lots.
    #[serde(default)]
    pub lots: Vec<PurchaseLot>,
    /// All sale shipments.
    #[serde(default)]
    pub shipments: Vec<SaleShipment>,
    /// Customer-side settlement entries.
    #[serde(default)]
    pub customer_payments: Vec<CounterpartyPayment>,
    /// Supplier-side settlement entries.
    #[serde(default)]
    pub supplier_payments: Vec<CounterpartyPayment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_lot_derived_values() {
        let lot = PurchaseLot {
            id: 1,
            date: date(2025, 1, 1),
            headcount: 50,
            weight: dec!(1000),
            unit_cost: dec!(10),
            ..PurchaseLot::default()
        };
        assert_eq!(lot.total_cost(), dec!(10000));
        assert_eq!(lot.avg_unit_weight(), dec!(20));
    }

    #[test]
    fn test_lot_avg_weight_zero_headcount() {
        let lot = PurchaseLot {
            weight: dec!(1000),
            ..PurchaseLot::default()
        };
        assert_eq!(lot.avg_unit_weight(), dec!(0));
    }

    #[test]
    fn test_shipment_net_weight_floors_at_zero() {
        let shipment = SaleShipment {
            sold_weight: dec!(100),
            mortality_weight: dec!(150),
            unit_sell_price: dec!(20),
            ..SaleShipment::default()
        };
        assert_eq!(shipment.net_weight(), dec!(0));
        assert_eq!(shipment.billed_amount(), dec!(0));
        // Mortality loss is still valued in full
        assert_eq!(shipment.mortality_loss(), dec!(3000));
    }

    #[test]
    fn test_shipment_billed_amount() {
        let shipment = SaleShipment {
            sold_weight: dec!(400),
            mortality_weight: dec!(20),
            unit_sell_price: dec!(20),
            ..SaleShipment::default()
        };
        assert_eq!(shipment.billed_amount(), dec!(7600));
        assert_eq!(shipment.mortality_loss(), dec!(400));
    }

    #[test]
    fn test_shipment_secondary_costs() {
        let shipment = SaleShipment {
            unloading_cost: dec!(50),
            driver_bonus: dec!(25),
            operational_cost: dec!(10),
            transport_cost: dec!(100),
            ..SaleShipment::default()
        };
        assert_eq!(shipment.secondary_costs(), dec!(185));
    }

    #[test]
    fn test_payment_components_total() {
        let payment = CounterpartyPayment {
            components: PaymentComponents {
                cash: dec!(1000),
                transfer: dec!(4000),
                ..PaymentComponents::default()
            },
            ..CounterpartyPayment::default()
        };
        assert_eq!(payment.total(), dec!(5000));
    }

    #[test]
    fn test_missing_numeric_fields_default_to_zero() {
        // The boundary fills in zeros, so the core never coalesces.
        let shipment: SaleShipment =
            serde_json::from_str(r#"{"id":1,"lotId":2,"date":"2025-01-05"}"#).unwrap();
        assert_eq!(shipment.sold_weight, dec!(0));
        assert_eq!(shipment.mortality_weight, dec!(0));
        assert_eq!(shipment.secondary_costs(), dec!(0));
        assert!(shipment.payments.is_empty());
        assert!(shipment.customer_id.is_none());
    }
}
