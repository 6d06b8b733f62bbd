//! Accrual analytics for lotledger.
//!
//! Lot-linked computations over the full snapshot, independent of any
//! reporting period:
//!
//! - Accrual cost of goods sold, matched to the originating purchase lot
//! - Per-lot recaps with shrinkage and finished classification ([`lots`])
//! - Global dashboard metrics ([`dashboard`])
//! - The orphaned-shipment bucket ([`unlinked_summary`])
//! - Top-N counterparty aggregations ([`toplist`])
//!
//! Everything here is a pure, total function: orphaned shipments are data,
//! not errors, and every ratio defaults to zero when its denominator is
//! zero.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod lots;
pub mod toplist;

pub use lots::{lot_summaries, LotSummary, FINISHED_SHRINKAGE_PCT};
pub use toplist::{top_receivables, top_sales, top_supplier_spend, TopEntry};

use lotledger_core::{PurchaseLot, SaleShipment, Snapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lookup of purchase lots by id.
#[derive(Debug, Clone, Default)]
pub struct LotIndex<'a> {
    by_id: HashMap<u64, &'a PurchaseLot>,
}

impl<'a> LotIndex<'a> {
    /// Index the given lots by id.
    #[must_use]
    pub fn new(lots: &'a [PurchaseLot]) -> Self {
        Self {
            by_id: lots.iter().map(|lot| (lot.id, lot)).collect(),
        }
    }

    /// Resolve a shipment's originating lot, if it exists.
    #[must_use]
    pub fn get(&self, lot_id: u64) -> Option<&'a PurchaseLot> {
        self.by_id.get(&lot_id).copied()
    }
}

/// Accrual cost of goods sold for one shipment.
///
/// The full weight drawn from the lot (sold plus mortality) is charged at
/// the lot's unit cost. `None` when the shipment is orphaned; the caller
/// decides how to bucket it (see [`unlinked_summary`]).
#[must_use]
pub fn accrual_cogs(shipment: &SaleShipment, lots: &LotIndex<'_>) -> Option<Decimal> {
    lots.get(shipment.lot_id)
        .map(|lot| (shipment.sold_weight + shipment.mortality_weight) * lot.unit_cost)
}

/// `part / whole * 100`, or zero when `whole` is zero.
#[must_use]
pub fn ratio_pct(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part / whole * Decimal::ONE_HUNDRED
    }
}

/// Global accrual metrics for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    /// Net billed value over all shipments, orphans included.
    pub revenue: Decimal,
    /// Accrual COGS over lot-linked shipments.
    pub cogs: Decimal,
    /// Secondary costs over all shipments.
    pub ops_cost: Decimal,
    /// `revenue - cogs - ops_cost`.
    pub net_profit: Decimal,
    /// Net profit as a percentage of revenue, zero on zero revenue.
    pub margin_pct: Decimal,
    /// Weight unaccounted for across all lots, kg.
    pub shrinkage_kg: Decimal,
    /// Shrinkage relative to total intake weight.
    pub shrinkage_pct: Decimal,
    /// Weight lost to mortality across all shipments, kg.
    pub mortality_kg: Decimal,
    /// Mortality relative to total intake weight.
    pub mortality_pct: Decimal,
}

/// Compute the dashboard metrics over a snapshot.
///
/// Orphaned shipments contribute revenue and operational costs but no COGS
/// (no lot cost is known for them) and are excluded from shrinkage.
#[must_use]
pub fn dashboard(snapshot: &Snapshot) -> DashboardMetrics {
    let lots = LotIndex::new(&snapshot.lots);

    let mut revenue = Decimal::ZERO;
    let mut cogs = Decimal::ZERO;
    let mut ops_cost = Decimal::ZERO;
    let mut mortality_kg = Decimal::ZERO;

    for shipment in &snapshot.shipments {
        revenue += shipment.billed_amount();
        ops_cost += shipment.secondary_costs();
        mortality_kg += shipment.mortality_weight;
        if let Some(shipment_cogs) = accrual_cogs(shipment, &lots) {
            cogs += shipment_cogs;
        }
    }

    let intake_weight: Decimal = snapshot.lots.iter().map(|lot| lot.weight).sum();
    let shrinkage_kg: Decimal = lot_summaries(snapshot)
        .iter()
        .map(|summary| summary.shrinkage_kg)
        .sum();

    let net_profit = revenue - cogs - ops_cost;

    DashboardMetrics {
        revenue,
        cogs,
        ops_cost,
        net_profit,
        margin_pct: ratio_pct(net_profit, revenue),
        shrinkage_kg,
        shrinkage_pct: ratio_pct(shrinkage_kg, intake_weight),
        mortality_kg,
        mortality_pct: ratio_pct(mortality_kg, intake_weight),
    }
}

/// Aggregate of shipments whose lot reference does not resolve.
///
/// Carried as its own bucket: no COGS is charged (no lot cost is known), so
/// the bucket's profit is revenue less operational costs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlinkedSummary {
    /// Number of orphaned shipments.
    pub shipment_count: usize,
    /// Net billed value of the orphans.
    pub revenue: Decimal,
    /// Secondary costs of the orphans.
    pub ops_cost: Decimal,
    /// `revenue - ops_cost`.
    pub net_profit: Decimal,
}

/// Collect the orphaned-shipment bucket for a snapshot.
#[must_use]
pub fn unlinked_summary(snapshot: &Snapshot) -> UnlinkedSummary {
    let lots = LotIndex::new(&snapshot.lots);
    let mut summary = UnlinkedSummary::default();

    for shipment in &snapshot.shipments {
        if lots.get(shipment.lot_id).is_some() {
            continue;
        }
        summary.shipment_count += 1;
        summary.revenue += shipment.billed_amount();
        summary.ops_cost += shipment.secondary_costs();
    }
    summary.net_profit = summary.revenue - summary.ops_cost;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lot(id: u64, weight: Decimal, unit_cost: Decimal) -> PurchaseLot {
        PurchaseLot {
            id,
            date: date(2025, 1, 1),
            supplier_name: "Farm Co".into(),
            weight,
            unit_cost,
            ..PurchaseLot::default()
        }
    }

    fn shipment(lot_id: u64, sold: Decimal, mortality: Decimal, price: Decimal) -> SaleShipment {
        SaleShipment {
            id: 1,
            lot_id,
            customer_name: "Acme".into(),
            date: date(2025, 1, 5),
            sold_weight: sold,
            mortality_weight: mortality,
            unit_sell_price: price,
            ..SaleShipment::default()
        }
    }

    #[test]
    fn test_accrual_cogs_matches_lot() {
        let lots = vec![lot(1, dec!(1000), dec!(10))];
        let index = LotIndex::new(&lots);
        let s = shipment(1, dec!(400), dec!(20), dec!(20));
        assert_eq!(accrual_cogs(&s, &index), Some(dec!(4200)));
    }

    #[test]
    fn test_accrual_cogs_orphan_is_none() {
        let index = LotIndex::new(&[]);
        let s = shipment(99, dec!(400), dec!(20), dec!(20));
        assert_eq!(accrual_cogs(&s, &index), None);
    }

    #[test]
    fn test_ratio_pct_guards_zero() {
        assert_eq!(ratio_pct(dec!(10), dec!(0)), dec!(0));
        assert_eq!(ratio_pct(dec!(25), dec!(100)), dec!(25));
    }

    #[test]
    fn test_dashboard_core_scenario() {
        // One lot of 1000kg at 10, one shipment: 400kg sold, 20kg mortality,
        // sell price 20.
        let snapshot = Snapshot {
            lots: vec![lot(1, dec!(1000), dec!(10))],
            shipments: vec![shipment(1, dec!(400), dec!(20), dec!(20))],
            ..Snapshot::default()
        };
        let metrics = dashboard(&snapshot);

        assert_eq!(metrics.revenue, dec!(7600));
        assert_eq!(metrics.cogs, dec!(4200));
        assert_eq!(metrics.ops_cost, dec!(0));
        assert_eq!(metrics.net_profit, dec!(3400));
        assert_eq!(metrics.mortality_kg, dec!(20));
        // 1000 - (400 + 20) = 580kg unaccounted
        assert_eq!(metrics.shrinkage_kg, dec!(580));
        assert_eq!(metrics.shrinkage_pct, dec!(58));
        assert_eq!(metrics.mortality_pct, dec!(2));
    }

    #[test]
    fn test_dashboard_empty_snapshot_is_all_zero() {
        let metrics = dashboard(&Snapshot::default());
        assert_eq!(metrics, DashboardMetrics::default());
    }

    #[test]
    fn test_orphans_counted_in_revenue_not_cogs() {
        let snapshot = Snapshot {
            lots: vec![lot(1, dec!(1000), dec!(10))],
            shipments: vec![
                shipment(1, dec!(400), dec!(0), dec!(20)),
                // lot 99 does not exist
                shipment(99, dec!(100), dec!(0), dec!(30)),
            ],
            ..Snapshot::default()
        };
        let metrics = dashboard(&snapshot);
        assert_eq!(metrics.revenue, dec!(11000)); // 8000 + 3000
        assert_eq!(metrics.cogs, dec!(4000)); // linked shipment only
    }

    #[test]
    fn test_unlinked_summary_bucket() {
        let mut orphan = shipment(99, dec!(100), dec!(0), dec!(30));
        orphan.transport_cost = dec!(200);
        let snapshot = Snapshot {
            lots: vec![lot(1, dec!(1000), dec!(10))],
            shipments: vec![shipment(1, dec!(400), dec!(0), dec!(20)), orphan],
            ..Snapshot::default()
        };
        let bucket = unlinked_summary(&snapshot);
        assert_eq!(bucket.shipment_count, 1);
        assert_eq!(bucket.revenue, dec!(3000));
        assert_eq!(bucket.ops_cost, dec!(200));
        assert_eq!(bucket.net_profit, dec!(2800));
    }
}
