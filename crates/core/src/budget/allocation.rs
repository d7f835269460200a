//! Allocation editing.
//!
//! Every edit is a pure function of the previous allocation list. Entries
//! that are not targeted are cloned unchanged, and a parent's total is
//! always recomputed from its children after an edit.

use dompet_shared::types::{CategoryId, round_rupiah};
use rust_decimal::Decimal;

use super::distribution::DistributionUtil;
use super::error::BudgetError;
use super::types::{Allocation, AllocationTotals};

/// Sets the amount of one allocation and clears its recommended flag.
///
/// With `child_id` set, the child under `parent_id` is updated and the
/// parent total is recomputed. Without it, `parent_id` names a standalone
/// entry. Negative amounts are clamped to zero.
///
/// # Errors
///
/// Returns `ParentNotFound`, `ChildNotFound` or `StandaloneNotFound` when
/// the target does not exist.
pub fn update_child_allocation(
    allocations: &[Allocation],
    parent_id: CategoryId,
    child_id: Option<CategoryId>,
    amount: Decimal,
) -> Result<Vec<Allocation>, BudgetError> {
    let amount = amount.max(Decimal::ZERO);
    let mut updated = allocations.to_vec();

    match child_id {
        Some(child_id) => {
            let parent = updated
                .iter_mut()
                .find_map(|entry| match entry {
                    Allocation::Parent(p) if p.category_id == parent_id => Some(p),
                    _ => None,
                })
                .ok_or(BudgetError::ParentNotFound(parent_id))?;

            let child = parent
                .children
                .iter_mut()
                .find(|c| c.category_id == child_id)
                .ok_or(BudgetError::ChildNotFound {
                    parent: parent_id,
                    child: child_id,
                })?;

            child.allocated_amount = amount;
            child.is_system_recommended = false;
            parent.recompute_total();
        }
        None => {
            let line = updated
                .iter_mut()
                .find_map(|entry| match entry {
                    Allocation::Standalone(line) if line.category_id == parent_id => Some(line),
                    _ => None,
                })
                .ok_or(BudgetError::StandaloneNotFound(parent_id))?;

            line.allocated_amount = amount;
            line.is_system_recommended = false;
        }
    }

    Ok(updated)
}

/// Sets a parent's share of income and redistributes it over the children.
///
/// The new parent total is `round(income * percentage / 100)`. Children keep
/// their current proportions (equal split when they are all zero) and the
/// largest remainder method absorbs rounding drift, so the children always
/// sum to the new total. Every child loses its recommended flag.
///
/// # Errors
///
/// Returns `InvalidPercentage`/`NegativeIncome` for negative inputs,
/// `AmountOutOfRange` when the share overflows, `ParentNotFound` when no
/// entry matches and `NotAParent` when the entry has no children.
pub fn update_parent_percentage(
    allocations: &[Allocation],
    parent_id: CategoryId,
    percentage: Decimal,
    income: Decimal,
) -> Result<Vec<Allocation>, BudgetError> {
    if percentage < Decimal::ZERO {
        return Err(BudgetError::InvalidPercentage(percentage));
    }
    if income < Decimal::ZERO {
        return Err(BudgetError::NegativeIncome(income));
    }

    let mut updated = allocations.to_vec();
    let entry = updated
        .iter_mut()
        .find(|entry| entry.category_id() == parent_id)
        .ok_or(BudgetError::ParentNotFound(parent_id))?;

    let Allocation::Parent(parent) = entry else {
        return Err(BudgetError::NotAParent(parent_id));
    };
    if parent.children.is_empty() {
        return Err(BudgetError::NotAParent(parent_id));
    }

    let new_total = income
        .checked_mul(percentage)
        .map(|share| round_rupiah(share / Decimal::ONE_HUNDRED))
        .ok_or(BudgetError::AmountOutOfRange { income, percentage })?;
    let weights: Vec<Decimal> = parent
        .children
        .iter()
        .map(|c| c.allocated_amount)
        .collect();
    let shares = DistributionUtil::split_by_weights(new_total, &weights, 0);

    for (child, share) in parent.children.iter_mut().zip(shares) {
        child.allocated_amount = share;
        child.is_system_recommended = false;
    }
    parent.allocated_amount = new_total;

    Ok(updated)
}

/// Current share of income held by an allocation, in percent (two decimals).
#[must_use]
pub fn allocation_percentage(allocation: &Allocation, income: Decimal) -> Decimal {
    dompet_shared::types::percentage_of(allocation.planned_amount(), income)
}

/// Sums the plan and computes what is left of the income.
#[must_use]
pub fn compute_totals(allocations: &[Allocation], income: Decimal) -> AllocationTotals {
    let total_allocated: Decimal = allocations.iter().map(Allocation::planned_amount).sum();
    AllocationTotals {
        total_allocated,
        remaining: income - total_allocated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::types::{AllocationLine, ParentAllocation};
    use rust_decimal_macros::dec;

    fn id(raw: i64) -> CategoryId {
        CategoryId::new(raw)
    }

    fn recommended(line: AllocationLine) -> AllocationLine {
        AllocationLine {
            is_system_recommended: true,
            ..line
        }
    }

    fn sample() -> Vec<Allocation> {
        vec![
            Allocation::Parent(
                ParentAllocation::new(
                    id(1),
                    vec![
                        recommended(AllocationLine::new(id(11), dec!(1000000))),
                        recommended(AllocationLine::new(id(12), dec!(500000))),
                    ],
                )
                .named("Kebutuhan"),
            ),
            Allocation::Standalone(recommended(AllocationLine::new(id(2), dec!(250000)))),
        ]
    }

    fn parent(allocations: &[Allocation], parent_id: CategoryId) -> &ParentAllocation {
        allocations
            .iter()
            .find_map(|a| match a {
                Allocation::Parent(p) if p.category_id == parent_id => Some(p),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_update_child_recomputes_parent() {
        let result = update_child_allocation(&sample(), id(1), Some(id(12)), dec!(750000)).unwrap();
        let parent = parent(&result, id(1));

        assert_eq!(parent.allocated_amount, dec!(1750000));
        assert_eq!(parent.children[1].allocated_amount, dec!(750000));
        assert!(!parent.children[1].is_system_recommended);
        assert!(parent.children[0].is_system_recommended);
        assert_eq!(result[1], sample()[1]);
    }

    #[test]
    fn test_update_standalone() {
        let result = update_child_allocation(&sample(), id(2), None, dec!(300000)).unwrap();
        match &result[1] {
            Allocation::Standalone(line) => {
                assert_eq!(line.allocated_amount, dec!(300000));
                assert!(!line.is_system_recommended);
            }
            Allocation::Parent(_) => panic!("expected standalone"),
        }
        assert_eq!(result[0], sample()[0]);
    }

    #[test]
    fn test_negative_amount_clamps_to_zero() {
        let result = update_child_allocation(&sample(), id(1), Some(id(11)), dec!(-5)).unwrap();
        assert_eq!(parent(&result, id(1)).children[0].allocated_amount, dec!(0));
        assert_eq!(parent(&result, id(1)).allocated_amount, dec!(500000));
    }

    #[test]
    fn test_update_missing_targets() {
        assert_eq!(
            update_child_allocation(&sample(), id(9), Some(id(11)), dec!(1)),
            Err(BudgetError::ParentNotFound(id(9)))
        );
        assert_eq!(
            update_child_allocation(&sample(), id(1), Some(id(99)), dec!(1)),
            Err(BudgetError::ChildNotFound {
                parent: id(1),
                child: id(99)
            })
        );
        // A parent id without a child id does not address the parent itself.
        assert_eq!(
            update_child_allocation(&sample(), id(1), None, dec!(1)),
            Err(BudgetError::StandaloneNotFound(id(1)))
        );
    }

    #[test]
    fn test_update_parent_percentage_proportional() {
        let result =
            update_parent_percentage(&sample(), id(1), dec!(60), dec!(3000000)).unwrap();
        let parent = parent(&result, id(1));

        assert_eq!(parent.allocated_amount, dec!(1800000));
        assert_eq!(parent.children[0].allocated_amount, dec!(1200000));
        assert_eq!(parent.children[1].allocated_amount, dec!(600000));
        assert!(parent.children.iter().all(|c| !c.is_system_recommended));
    }

    #[test]
    fn test_update_parent_percentage_equal_split_from_zero() {
        let allocations = vec![Allocation::Parent(ParentAllocation::new(
            id(1),
            vec![
                AllocationLine::new(id(11), dec!(0)),
                AllocationLine::new(id(12), dec!(0)),
                AllocationLine::new(id(13), dec!(0)),
            ],
        ))];

        let result =
            update_parent_percentage(&allocations, id(1), dec!(10), dec!(1000000)).unwrap();
        let parent = parent(&result, id(1));

        assert_eq!(parent.allocated_amount, dec!(100000));
        assert_eq!(parent.children_total(), dec!(100000));
        assert_eq!(parent.children[0].allocated_amount, dec!(33334));
        assert_eq!(parent.children[1].allocated_amount, dec!(33333));
    }

    #[test]
    fn test_update_parent_percentage_rounds_total() {
        let result = update_parent_percentage(&sample(), id(1), dec!(33.333), dec!(1000)).unwrap();
        assert_eq!(parent(&result, id(1)).allocated_amount, dec!(333));
        assert_eq!(parent(&result, id(1)).children_total(), dec!(333));
    }

    #[test]
    fn test_update_parent_percentage_rejects_standalone() {
        assert_eq!(
            update_parent_percentage(&sample(), id(2), dec!(10), dec!(1000)),
            Err(BudgetError::NotAParent(id(2)))
        );
        assert_eq!(
            update_parent_percentage(&sample(), id(1), dec!(-1), dec!(1000)),
            Err(BudgetError::InvalidPercentage(dec!(-1)))
        );
    }

    #[test]
    fn test_update_parent_percentage_with_huge_child() {
        let allocations = vec![Allocation::Parent(ParentAllocation::new(
            id(1),
            vec![
                AllocationLine::new(id(11), dec!(100000000000000000000000)),
                AllocationLine::new(id(12), dec!(0)),
            ],
        ))];

        let result =
            update_parent_percentage(&allocations, id(1), dec!(60), dec!(3000000)).unwrap();
        let parent = parent(&result, id(1));
        assert_eq!(parent.allocated_amount, dec!(1800000));
        assert_eq!(parent.children[0].allocated_amount, dec!(1800000));
        assert_eq!(parent.children[1].allocated_amount, dec!(0));
    }

    #[test]
    fn test_update_parent_percentage_out_of_range() {
        assert_eq!(
            update_parent_percentage(&sample(), id(1), dec!(60), Decimal::MAX),
            Err(BudgetError::AmountOutOfRange {
                income: Decimal::MAX,
                percentage: dec!(60)
            })
        );
    }

    #[test]
    fn test_compute_totals() {
        let totals = compute_totals(&sample(), dec!(3000000));
        assert_eq!(totals.total_allocated, dec!(1750000));
        assert_eq!(totals.remaining, dec!(1250000));
    }

    #[test]
    fn test_compute_totals_ignores_stale_parent_total() {
        let mut allocations = sample();
        if let Allocation::Parent(p) = &mut allocations[0] {
            p.allocated_amount = dec!(1);
        }
        assert_eq!(
            compute_totals(&allocations, dec!(0)).total_allocated,
            dec!(1750000)
        );
    }

    #[test]
    fn test_allocation_percentage() {
        let allocations = sample();
        assert_eq!(allocation_percentage(&allocations[0], dec!(3000000)), dec!(50));
        assert_eq!(allocation_percentage(&allocations[1], dec!(0)), dec!(0));
    }
}
