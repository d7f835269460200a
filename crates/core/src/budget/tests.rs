//! Property-based tests for budget module.

use std::collections::HashMap;

use dompet_shared::types::{CategoryId, round_rupiah};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::allocation::{compute_totals, update_child_allocation, update_parent_percentage};
use super::hierarchy::build_category_hierarchy;
use super::realization::evaluate;
use super::recommend::recommend_allocations;
use super::types::{
    Allocation, AllocationLine, Category, CategoryType, ParentAllocation, RealizationStatus,
};

fn parent_with(amounts: &[i64]) -> Allocation {
    let children = amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| {
            AllocationLine::new(CategoryId::new(100 + i as i64), Decimal::from(*amount))
        })
        .collect();
    Allocation::Parent(ParentAllocation::new(CategoryId::new(1), children))
}

fn mixed_plan(parents: &[Vec<i64>], standalone: &[i64]) -> Vec<Allocation> {
    let mut plan: Vec<Allocation> = parents
        .iter()
        .enumerate()
        .map(|(p, amounts)| {
            let parent_id = 1000 * (p as i64 + 1);
            let children = amounts
                .iter()
                .enumerate()
                .map(|(c, amount)| {
                    AllocationLine::new(
                        CategoryId::new(parent_id + c as i64 + 1),
                        Decimal::from(*amount),
                    )
                })
                .collect();
            Allocation::Parent(ParentAllocation::new(CategoryId::new(parent_id), children))
        })
        .collect();
    plan.extend(standalone.iter().enumerate().map(|(i, amount)| {
        Allocation::Standalone(AllocationLine::new(
            CategoryId::new(i as i64 + 1),
            Decimal::from(*amount),
        ))
    }));
    plan
}

proptest! {
    /// After a child edit the parent equals the sum of its children.
    #[test]
    fn test_child_edit_keeps_parent_invariant(
        amounts in prop::collection::vec(0i64..10_000_000, 1..8),
        pick in any::<prop::sample::Index>(),
        new_amount in -1_000_000i64..10_000_000,
    ) {
        let plan = vec![parent_with(&amounts)];
        let child = CategoryId::new(100 + pick.index(amounts.len()) as i64);

        let result = update_child_allocation(&plan, CategoryId::new(1), Some(child), Decimal::from(new_amount)).unwrap();

        let Allocation::Parent(parent) = &result[0] else {
            panic!("expected parent");
        };
        prop_assert_eq!(parent.allocated_amount, parent.children_total());
        prop_assert!(parent.children.iter().all(|c| c.allocated_amount >= Decimal::ZERO));
    }

    /// A percentage edit sets the parent to round(income * pct / 100) and
    /// the children follow exactly.
    #[test]
    fn test_percentage_edit_sets_rounded_total(
        amounts in prop::collection::vec(0i64..10_000_000, 1..8),
        income in 0i64..1_000_000_000,
        basis_points in 0i64..15_000,
    ) {
        let plan = vec![parent_with(&amounts)];
        let income = Decimal::from(income);
        let percentage = Decimal::new(basis_points, 2);

        let result = update_parent_percentage(&plan, CategoryId::new(1), percentage, income).unwrap();

        let Allocation::Parent(parent) = &result[0] else {
            panic!("expected parent");
        };
        let expected = round_rupiah(income * percentage / Decimal::ONE_HUNDRED);
        prop_assert_eq!(parent.allocated_amount, expected);
        prop_assert_eq!(parent.children_total(), expected);
        prop_assert!(parent.children.iter().all(|c| !c.is_system_recommended));
    }

    /// Totals do not depend on entry order.
    #[test]
    fn test_totals_order_independent(
        parents in prop::collection::vec(prop::collection::vec(0i64..5_000_000, 0..4), 0..4),
        standalone in prop::collection::vec(0i64..5_000_000, 0..4),
        income in 0i64..100_000_000,
        rotate in 0usize..8,
    ) {
        let plan = mixed_plan(&parents, &standalone);
        let income = Decimal::from(income);

        let mut shuffled = plan.clone();
        shuffled.reverse();
        if !shuffled.is_empty() {
            let by = rotate % shuffled.len();
            shuffled.rotate_left(by);
        }

        prop_assert_eq!(compute_totals(&plan, income), compute_totals(&shuffled, income));
    }

    /// Roots plus children always account for every input category.
    #[test]
    fn test_hierarchy_never_drops(
        parents in prop::collection::vec(prop::option::of(0i64..30), 0..30),
    ) {
        let categories: Vec<Category> = parents
            .iter()
            .enumerate()
            .map(|(i, parent)| Category {
                id: CategoryId::new(i as i64),
                name: format!("c{i}"),
                category_type: CategoryType::Expense,
                parent_id: parent.map(CategoryId::new),
            })
            .collect();

        let tree = build_category_hierarchy(&categories);
        let count: usize = tree.iter().map(|node| 1 + node.children.len()).sum();
        prop_assert_eq!(count, categories.len());
        prop_assert!(tree.iter().all(|node| node.children.iter().all(|c| c.parent_id == Some(node.category.id))));
    }

    /// Spend without an allocation is always unbudgeted and 100% over.
    #[test]
    fn test_unallocated_spend_is_unbudgeted(actual in 1i64..1_000_000_000) {
        let item = evaluate(CategoryId::new(1), None, Decimal::ZERO, Decimal::from(actual));
        prop_assert_eq!(item.status, RealizationStatus::Unbudgeted);
        prop_assert_eq!(item.variance_percentage, Decimal::ONE_HUNDRED);
        prop_assert_eq!(item.variance, Decimal::from(actual));
    }

    /// Local recommendations allocate exactly the income when a parent exists.
    #[test]
    fn test_recommendations_allocate_income(
        income in 1i64..1_000_000_000,
        child_counts in prop::collection::vec(1usize..4, 1..5),
        history in prop::collection::vec(0i64..5_000_000, 16),
    ) {
        let mut categories = Vec::new();
        let mut spend = HashMap::new();
        let mut next = 0i64;
        for (p, count) in child_counts.iter().enumerate() {
            let parent_id = 1000 + p as i64;
            categories.push(Category {
                id: CategoryId::new(parent_id),
                name: format!("Parent {p}"),
                category_type: CategoryType::Expense,
                parent_id: None,
            });
            for _ in 0..*count {
                next += 1;
                categories.push(Category {
                    id: CategoryId::new(next),
                    name: format!("Child {next}"),
                    category_type: CategoryType::Expense,
                    parent_id: Some(CategoryId::new(parent_id)),
                });
                let amount = history[usize::try_from(next).unwrap() % history.len()];
                spend.insert(CategoryId::new(next), Decimal::from(amount));
            }
        }

        let income = Decimal::from(income);
        for history in [HashMap::new(), spend] {
            let result = recommend_allocations(income, &categories, &history);
            let total: Decimal = result.iter().map(Allocation::planned_amount).sum();
            prop_assert_eq!(total, income);
            for entry in &result {
                prop_assert_eq!(entry.allocated_amount(), entry.planned_amount());
            }
        }
    }
}
