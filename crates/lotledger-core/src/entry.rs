//! Normalized transaction entries.
//!
//! Trade lots, partial shipments and payments arrive as three differently
//! shaped record streams. Statements work over one uniform shape: a dated
//! entry tagged [`EntryKind::Trade`] or [`EntryKind::Payment`], carrying a
//! debit or credit plus the display metadata the presentation layer shows
//! alongside it.
//!
//! Normalization also drops *ghost* records: placeholder rows with no
//! financial, quantity, or cost effect. They exist in the raw streams (saved
//! but never filled in) and would only add blank lines to a statement.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{CounterpartyPayment, PurchaseLot, SaleShipment, Snapshot};
use crate::party::PartySelector;

/// Which side of the ledger an entry sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// A trade: a shipment billed to a customer, or a lot bought from a
    /// supplier. Increases what the counterparty owes (debit).
    #[default]
    Trade,
    /// A settlement. Reduces what the counterparty owes (credit).
    Payment,
}

/// A normalized transaction entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Trade or payment.
    pub kind: EntryKind,
    /// Entry date.
    pub date: NaiveDate,
    /// Amount owed by the counterparty for this entry (trades).
    pub debit: Decimal,
    /// Amount settled by the counterparty (payments).
    pub credit: Decimal,
    /// Heads traded, for display.
    pub quantity: u32,
    /// Weight traded, kg, for display.
    pub weight: Decimal,
    /// Unit price applied, for display.
    pub unit_price: Decimal,
    /// Heads lost, for display.
    pub mortality_quantity: u32,
    /// Weight lost, kg, for display.
    pub mortality_weight: Decimal,
    /// Mortality loss valued at sale price, for display.
    pub mortality_value: Decimal,
    /// Unloading cost carried by the trade.
    pub unloading_cost: Decimal,
    /// Driver bonus carried by the trade.
    pub driver_bonus: Decimal,
    /// Operational cost carried by the trade.
    pub operational_cost: Decimal,
    /// Transport cost carried by the trade.
    pub transport_cost: Decimal,
    /// Free-text reference (payment note, transport ref).
    pub reference: String,
}

impl Entry {
    /// Signed balance effect of this entry: `credit - debit`.
    #[must_use]
    pub fn delta(&self) -> Decimal {
        self.credit - self.debit
    }

    /// Sum of the secondary costs carried by this entry.
    #[must_use]
    pub fn secondary_costs(&self) -> Decimal {
        self.unloading_cost + self.driver_bonus + self.operational_cost + self.transport_cost
    }

    fn from_shipment(shipment: &SaleShipment) -> Self {
        Self {
            kind: EntryKind::Trade,
            date: shipment.date,
            debit: shipment.billed_amount(),
            credit: Decimal::ZERO,
            quantity: shipment.sold_headcount,
            weight: shipment.sold_weight,
            unit_price: shipment.unit_sell_price,
            mortality_quantity: shipment.mortality_headcount,
            mortality_weight: shipment.mortality_weight,
            mortality_value: shipment.mortality_loss(),
            unloading_cost: shipment.unloading_cost,
            driver_bonus: shipment.driver_bonus,
            operational_cost: shipment.operational_cost,
            transport_cost: shipment.transport_cost,
            reference: String::new(),
        }
    }

    fn from_lot(lot: &PurchaseLot) -> Self {
        Self {
            kind: EntryKind::Trade,
            date: lot.date,
            debit: lot.total_cost(),
            quantity: lot.headcount,
            weight: lot.weight,
            unit_price: lot.unit_cost,
            reference: lot.transport_ref.clone(),
            ..Self::default()
        }
    }

    fn payment(date: NaiveDate, amount: Decimal, note: &str) -> Self {
        Self {
            kind: EntryKind::Payment,
            date,
            credit: amount,
            reference: note.to_string(),
            ..Self::default()
        }
    }
}

/// Conversion of raw record streams into ordered [`Entry`] lists.
pub mod normalize {
    use super::{
        CounterpartyPayment, Decimal, Entry, PartySelector, PurchaseLot, SaleShipment, Snapshot,
    };

    /// A trade entry is a ghost when it carries no billed amount, no
    /// quantity (sold or mortality, heads or weight) and no secondary costs.
    fn shipment_is_ghost(s: &SaleShipment) -> bool {
        s.billed_amount().is_zero()
            && s.sold_headcount == 0
            && s.sold_weight.is_zero()
            && s.mortality_headcount == 0
            && s.mortality_weight.is_zero()
            && s.secondary_costs().is_zero()
    }

    fn lot_is_ghost(lot: &PurchaseLot) -> bool {
        lot.total_cost().is_zero() && lot.headcount == 0 && lot.weight.is_zero()
    }

    /// A payment entry is a ghost only when it settles nothing and says
    /// nothing (a zero-amount payment with a note still shows on the
    /// statement).
    fn payment_is_ghost(total: Decimal, note: &str) -> bool {
        total.is_zero() && note.is_empty()
    }

    fn push_payments(
        entries: &mut Vec<Entry>,
        payments: &[CounterpartyPayment],
        selector: &PartySelector,
    ) {
        for payment in payments {
            if !selector.matches(payment.counterparty_id.as_deref(), &payment.counterparty_name) {
                continue;
            }
            let total = payment.total();
            if payment_is_ghost(total, &payment.note) {
                continue;
            }
            entries.push(Entry::payment(payment.date, total, &payment.note));
        }
    }

    /// Normalized entries for a customer statement.
    ///
    /// Trades come from the customer's shipments, credits from standalone
    /// customer payments and from payments embedded in those shipments
    /// (settled on delivery). Output is ordered date-ascending; entries
    /// sharing a date keep their stream order.
    #[must_use]
    pub fn customer_entries(snapshot: &Snapshot, selector: &PartySelector) -> Vec<Entry> {
        let mut entries = Vec::new();
        for shipment in &snapshot.shipments {
            if !selector.matches(shipment.customer_id.as_deref(), &shipment.customer_name) {
                continue;
            }
            if !shipment_is_ghost(shipment) {
                entries.push(Entry::from_shipment(shipment));
            }
            for paid in &shipment.payments {
                if !payment_is_ghost(paid.amount, &paid.note) {
                    entries.push(Entry::payment(paid.date, paid.amount, &paid.note));
                }
            }
        }
        push_payments(&mut entries, &snapshot.customer_payments, selector);
        entries.sort_by_key(|e| e.date);
        entries
    }

    /// Normalized entries for a supplier statement.
    ///
    /// Trades come from the supplier's purchase lots (debit = total lot
    /// cost), credits from standalone supplier payments.
    #[must_use]
    pub fn supplier_entries(snapshot: &Snapshot, selector: &PartySelector) -> Vec<Entry> {
        let mut entries = Vec::new();
        for lot in &snapshot.lots {
            if !selector.matches(lot.supplier_id.as_deref(), &lot.supplier_name) {
                continue;
            }
            if !lot_is_ghost(lot) {
                entries.push(Entry::from_lot(lot));
            }
        }
        push_payments(&mut entries, &snapshot.supplier_payments, selector);
        entries.sort_by_key(|e| e.date);
        entries
    }
}
