//! Top-N counterparty aggregations.
//!
//! All three lists group by the canonical [`PartyKey`] resolver, so a
//! customer referenced by id in one record and by name in another is split
//! or merged exactly the way the statement side does it, never differently.
//!
//! Sorting is value-descending with a name tie-break, so repeated
//! computation over an unchanged snapshot is bit-identical.

use lotledger_core::{PartyKey, Snapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Balances below this are display noise, not receivables.
pub const RECEIVABLE_EPSILON: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// One line of a top-N list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopEntry {
    /// Counterparty display name.
    pub name: String,
    /// Aggregated value (meaning depends on the list).
    pub value: Decimal,
}

#[derive(Default)]
struct Accum {
    name: String,
    value: Decimal,
}

fn add(map: &mut BTreeMap<PartyKey, Accum>, key: PartyKey, name: &str, amount: Decimal) {
    let accum = map.entry(key).or_default();
    if accum.name.is_empty() {
        accum.name = name.to_string();
    }
    accum.value += amount;
}

fn take_top(map: BTreeMap<PartyKey, Accum>, n: usize) -> Vec<TopEntry> {
    let mut entries: Vec<TopEntry> = map
        .into_values()
        .map(|a| TopEntry {
            name: a.name,
            value: a.value,
        })
        .collect();
    entries.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    entries.truncate(n);
    entries
}

/// Top customers by outstanding balance (lifetime billed minus lifetime
/// paid, including payments settled on delivery).
///
/// Balances at or below [`RECEIVABLE_EPSILON`] are dropped before taking
/// the top `n`.
#[must_use]
pub fn top_receivables(snapshot: &Snapshot, n: usize) -> Vec<TopEntry> {
    let mut map = BTreeMap::new();
    for shipment in &snapshot.shipments {
        let key = PartyKey::resolve(shipment.customer_id.as_deref(), &shipment.customer_name);
        add(
            &mut map,
            key,
            &shipment.customer_name,
            shipment.billed_amount() - shipment.paid_on_delivery(),
        );
    }
    for payment in &snapshot.customer_payments {
        let key = PartyKey::resolve(payment.counterparty_id.as_deref(), &payment.counterparty_name);
        add(&mut map, key, &payment.counterparty_name, -payment.total());
    }
    map.retain(|_, accum| accum.value > RECEIVABLE_EPSILON);
    take_top(map, n)
}

/// Top customers by lifetime billed value.
#[must_use]
pub fn top_sales(snapshot: &Snapshot, n: usize) -> Vec<TopEntry> {
    let mut map = BTreeMap::new();
    for shipment in &snapshot.shipments {
        let key = PartyKey::resolve(shipment.customer_id.as_deref(), &shipment.customer_name);
        add(&mut map, key, &shipment.customer_name, shipment.billed_amount());
    }
    take_top(map, n)
}

/// Top suppliers by lifetime purchase spend.
#[must_use]
pub fn top_supplier_spend(snapshot: &Snapshot, n: usize) -> Vec<TopEntry> {
    let mut map = BTreeMap::new();
    for lot in &snapshot.lots {
        let key = PartyKey::resolve(lot.supplier_id.as_deref(), &lot.supplier_name);
        add(&mut map, key, &lot.supplier_name, lot.total_cost());
    }
    take_top(map, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lotledger_core::{CounterpartyPayment, PaymentComponents, PurchaseLot, SaleShipment};
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn sale(customer: &str, id: Option<&str>, billed: Decimal) -> SaleShipment {
        SaleShipment {
            id: 1,
            lot_id: 1,
            customer_id: id.map(String::from),
            customer_name: customer.into(),
            date: date(5),
            sold_weight: billed,
            unit_sell_price: dec!(1),
            ..SaleShipment::default()
        }
    }

    fn paid(customer: &str, amount: Decimal) -> CounterpartyPayment {
        CounterpartyPayment {
            id: 1,
            date: date(6),
            counterparty_name: customer.into(),
            components: PaymentComponents {
                cash: amount,
                ..PaymentComponents::default()
            },
            ..CounterpartyPayment::default()
        }
    }

    #[test]
    fn test_receivables_ranked_descending() {
        let snapshot = Snapshot {
            shipments: vec![
                sale("Acme", None, dec!(5000)),
                sale("Burro", None, dec!(9000)),
            ],
            customer_payments: vec![paid("Burro", dec!(1000))],
            ..Snapshot::default()
        };
        let top = top_receivables(&snapshot, 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Burro");
        assert_eq!(top[0].value, dec!(8000));
        assert_eq!(top[1].value, dec!(5000));
    }

    #[test]
    fn test_receivables_settled_balance_excluded() {
        let snapshot = Snapshot {
            shipments: vec![sale("Acme", None, dec!(5000))],
            customer_payments: vec![paid("Acme", dec!(5000))],
            ..Snapshot::default()
        };
        assert!(top_receivables(&snapshot, 10).is_empty());
    }

    #[test]
    fn test_receivables_overpaid_excluded() {
        let snapshot = Snapshot {
            shipments: vec![sale("Acme", None, dec!(5000))],
            customer_payments: vec![paid("Acme", dec!(7000))],
            ..Snapshot::default()
        };
        assert!(top_receivables(&snapshot, 10).is_empty());
    }

    #[test]
    fn test_receivables_counts_delivery_payments() {
        let mut s = sale("Acme", None, dec!(5000));
        s.payments.push(lotledger_core::ShipmentPayment {
            date: date(5),
            amount: dec!(2000),
            note: String::new(),
        });
        let snapshot = Snapshot {
            shipments: vec![s],
            ..Snapshot::default()
        };
        let top = top_receivables(&snapshot, 10);
        assert_eq!(top[0].value, dec!(3000));
    }

    #[test]
    fn test_id_groups_across_renames() {
        // Same id under two display names aggregates as one customer
        let snapshot = Snapshot {
            shipments: vec![
                sale("Acme", Some("c-1"), dec!(100)),
                sale("Acme Ltd", Some("c-1"), dec!(200)),
            ],
            ..Snapshot::default()
        };
        let top = top_sales(&snapshot, 10);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].value, dec!(300));
        // First-seen name is the display name
        assert_eq!(top[0].name, "Acme");
    }

    #[test]
    fn test_truncation_and_tie_break() {
        let snapshot = Snapshot {
            shipments: vec![
                sale("Zeta", None, dec!(100)),
                sale("Alpha", None, dec!(100)),
                sale("Mid", None, dec!(500)),
            ],
            ..Snapshot::default()
        };
        let top = top_sales(&snapshot, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Mid");
        // Equal values tie-break by name ascending
        assert_eq!(top[1].name, "Alpha");
    }

    #[test]
    fn test_supplier_spend() {
        let snapshot = Snapshot {
            lots: vec![
                PurchaseLot {
                    id: 1,
                    date: date(1),
                    supplier_name: "Farm Co".into(),
                    weight: dec!(1000),
                    unit_cost: dec!(10),
                    ..PurchaseLot::default()
                },
                PurchaseLot {
                    id: 2,
                    date: date(2),
                    supplier_name: "Ranch".into(),
                    weight: dec!(100),
                    unit_cost: dec!(12),
                    ..PurchaseLot::default()
                },
            ],
            ..Snapshot::default()
        };
        let top = top_supplier_spend(&snapshot, 10);
        assert_eq!(top[0].name, "Farm Co");
        assert_eq!(top[0].value, dec!(10000));
        assert_eq!(top[1].value, dec!(1200));
    }
}
