//! Per-lot recaps.
//!
//! A lot's shipments are matched back to it by id; the difference between
//! the intake weight and what the shipments account for (sold plus
//! mortality) is shrinkage. A lot whose shrinkage falls under the fixed
//! threshold is classified finished: nearly all of its weight has been
//! shipped out.

use lotledger_core::Snapshot;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{accrual_cogs, ratio_pct, LotIndex};

/// A lot is finished when its shrinkage percentage drops below this.
pub const FINISHED_SHRINKAGE_PCT: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Recap of one purchase lot against its shipments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotSummary {
    /// Lot id.
    pub lot_id: u64,
    /// Intake date.
    pub date: chrono::NaiveDate,
    /// Supplier display name.
    pub supplier_name: String,
    /// Intake weight, kg.
    pub intake_weight: Decimal,
    /// Purchase cost of the lot.
    pub intake_cost: Decimal,
    /// Weight sold across the lot's shipments, kg.
    pub sold_weight: Decimal,
    /// Weight lost to mortality across the lot's shipments, kg.
    pub mortality_weight: Decimal,
    /// Weight still unaccounted for, kg (never negative).
    pub shrinkage_kg: Decimal,
    /// Shrinkage relative to intake weight.
    pub shrinkage_pct: Decimal,
    /// Whether the lot is (nearly) fully shipped out.
    pub finished: bool,
    /// Net billed value of the lot's shipments.
    pub revenue: Decimal,
    /// Accrual COGS of the lot's shipments.
    pub cogs: Decimal,
    /// Secondary costs of the lot's shipments.
    pub ops_cost: Decimal,
    /// `revenue - cogs - ops_cost`.
    pub net_profit: Decimal,
}

/// Build one recap per lot, ordered by intake date then id.
///
/// Orphaned shipments belong to no lot and appear in no recap; see
/// [`crate::unlinked_summary`].
#[must_use]
pub fn lot_summaries(snapshot: &Snapshot) -> Vec<LotSummary> {
    let lots = LotIndex::new(&snapshot.lots);
    let mut summaries: Vec<LotSummary> = snapshot
        .lots
        .iter()
        .map(|lot| LotSummary {
            lot_id: lot.id,
            date: lot.date,
            supplier_name: lot.supplier_name.clone(),
            intake_weight: lot.weight,
            intake_cost: lot.total_cost(),
            ..LotSummary::default()
        })
        .collect();

    for shipment in &snapshot.shipments {
        let Some(summary) = summaries.iter_mut().find(|s| s.lot_id == shipment.lot_id) else {
            continue;
        };
        summary.sold_weight += shipment.sold_weight;
        summary.mortality_weight += shipment.mortality_weight;
        summary.revenue += shipment.billed_amount();
        summary.ops_cost += shipment.secondary_costs();
        if let Some(cogs) = accrual_cogs(shipment, &lots) {
            summary.cogs += cogs;
        }
    }

    for summary in &mut summaries {
        let accounted = summary.sold_weight + summary.mortality_weight;
        summary.shrinkage_kg = (summary.intake_weight - accounted).max(Decimal::ZERO);
        summary.shrinkage_pct = ratio_pct(summary.shrinkage_kg, summary.intake_weight);
        summary.finished = summary.shrinkage_pct < FINISHED_SHRINKAGE_PCT;
        summary.net_profit = summary.revenue - summary.cogs - summary.ops_cost;
    }

    summaries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.lot_id.cmp(&b.lot_id)));
    summaries
}
