//! Budget realization: planned allocations vs actual spend.

use std::collections::{HashMap, HashSet};

use dompet_shared::types::{CategoryId, percentage_of};
use rust_decimal::Decimal;

use super::types::{Allocation, RealizationItem, RealizationStatus, RealizationSummary};

/// Compares one category's allocation with its actual spend.
///
/// `variance = actual - allocated`. With no allocation, any spend counts as
/// 100% over and the category is `Unbudgeted`.
#[must_use]
pub fn evaluate(
    category_id: CategoryId,
    category_name: Option<String>,
    allocated: Decimal,
    actual: Decimal,
) -> RealizationItem {
    let variance = actual - allocated;

    let variance_percentage = if allocated > Decimal::ZERO {
        percentage_of(variance, allocated)
    } else if actual > Decimal::ZERO {
        Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    let status = if allocated.is_zero() && actual > Decimal::ZERO {
        RealizationStatus::Unbudgeted
    } else {
        match variance.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => RealizationStatus::Over,
            std::cmp::Ordering::Less => RealizationStatus::Under,
            std::cmp::Ordering::Equal => RealizationStatus::OnTrack,
        }
    };

    RealizationItem {
        category_id,
        category_name,
        allocated_amount: allocated,
        actual_spent: actual,
        variance,
        variance_percentage,
        status,
        children: Vec::new(),
    }
}

/// Builds realization items for every allocation.
///
/// Parents, children and standalone entries each look up their own spend
/// (zero when absent); a parent's spend is not derived from its children.
/// Categories with positive spend and no allocation are appended as
/// unbudgeted items, ordered by category ID.
#[must_use]
pub fn compute_realization(
    allocations: &[Allocation],
    actual_spend: &HashMap<CategoryId, Decimal>,
) -> Vec<RealizationItem> {
    let spent = |id: CategoryId| actual_spend.get(&id).copied().unwrap_or(Decimal::ZERO);

    let mut items: Vec<RealizationItem> = allocations
        .iter()
        .map(|allocation| match allocation {
            Allocation::Standalone(line) => evaluate(
                line.category_id,
                line.category_name.clone(),
                line.allocated_amount,
                spent(line.category_id),
            ),
            Allocation::Parent(parent) => {
                let mut item = evaluate(
                    parent.category_id,
                    parent.category_name.clone(),
                    parent.children_total(),
                    spent(parent.category_id),
                );
                item.children = parent
                    .children
                    .iter()
                    .map(|child| {
                        evaluate(
                            child.category_id,
                            child.category_name.clone(),
                            child.allocated_amount,
                            spent(child.category_id),
                        )
                    })
                    .collect();
                item
            }
        })
        .collect();

    let allocated: HashSet<CategoryId> = allocations
        .iter()
        .flat_map(Allocation::category_ids)
        .collect();
    let mut unbudgeted: Vec<(CategoryId, Decimal)> = actual_spend
        .iter()
        .filter(|(id, amount)| !allocated.contains(*id) && **amount > Decimal::ZERO)
        .map(|(id, amount)| (*id, *amount))
        .collect();
    unbudgeted.sort_by_key(|(id, _)| *id);

    items.extend(
        unbudgeted
            .into_iter()
            .map(|(id, amount)| evaluate(id, None, Decimal::ZERO, amount)),
    );

    items
}

/// Totals for a realization.
///
/// The budget counts leaf allocations only, since parents are sums of their
/// children. Spend counts every item once, parents' direct spend included.
#[must_use]
pub fn summarize_realization(items: &[RealizationItem], income: Decimal) -> RealizationSummary {
    let mut total_budgeted = Decimal::ZERO;
    let mut total_spent = Decimal::ZERO;

    for item in items {
        total_spent += item.actual_spent;
        if item.children.is_empty() {
            total_budgeted += item.allocated_amount;
        } else {
            for child in &item.children {
                total_budgeted += child.allocated_amount;
                total_spent += child.actual_spent;
            }
        }
    }

    let total_variance = total_spent - total_budgeted;

    RealizationSummary {
        total_budgeted,
        total_spent,
        total_variance,
        total_variance_percentage: percentage_of(total_variance, total_budgeted),
        remaining: income - total_spent,
    }
}
