//! Allocation recommendations.
//!
//! The backend owns the recommendation weighting. The client validates the
//! request, tags what comes back, and can run the same weighting locally
//! when the backend is unavailable.

use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use dompet_shared::types::{CategoryId, round_rupiah};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::distribution::DistributionUtil;
use super::error::BudgetError;
use super::hierarchy::{build_category_hierarchy, expense_categories};
use super::types::{Allocation, AllocationLine, Category, CategoryNode, ParentAllocation};

/// Months of history used to average past spending.
pub const HISTORY_MONTHS: u32 = 3;

/// Weight for parents whose name matches no keyword.
const DEFAULT_WEIGHT: Decimal = dec!(0.05);

/// Keyword weights matched case-insensitively against parent names.
const KEYWORD_WEIGHTS: &[(&str, Decimal)] = &[
    ("makanan", dec!(0.25)),
    ("minum", dec!(0.25)),
    ("food", dec!(0.25)),
    ("transportasi", dec!(0.15)),
    ("transport", dec!(0.15)),
    ("tagihan", dec!(0.15)),
    ("utilitas", dec!(0.15)),
    ("kesehatan", dec!(0.10)),
    ("health", dec!(0.10)),
    ("pendidikan", dec!(0.10)),
    ("education", dec!(0.10)),
    ("hiburan", dec!(0.08)),
    ("entertainment", dec!(0.08)),
    ("shopping", dec!(0.07)),
    ("belanja", dec!(0.07)),
    ("tabungan", dec!(0.05)),
    ("saving", dec!(0.05)),
    ("investasi", dec!(0.05)),
    ("investment", dec!(0.05)),
];

/// Checks a recommendation request before anything is sent.
///
/// # Errors
///
/// Returns `MissingPeriod` when a date is unset, `InvalidPeriod` when the
/// start is after the end, and `NonPositiveIncome` when `income <= 0`.
pub fn validate_recommendation_request(
    income: Decimal,
    period_start: Option<NaiveDate>,
    period_end: Option<NaiveDate>,
) -> Result<(NaiveDate, NaiveDate), BudgetError> {
    let (Some(start), Some(end)) = (period_start, period_end) else {
        return Err(BudgetError::MissingPeriod);
    };
    if start > end {
        return Err(BudgetError::InvalidPeriod { start, end });
    }
    if income <= Decimal::ZERO {
        return Err(BudgetError::NonPositiveIncome(income));
    }
    Ok((start, end))
}

/// Marks every entry and child as a system recommendation.
#[must_use]
pub fn tag_recommended(allocations: Vec<Allocation>) -> Vec<Allocation> {
    allocations
        .into_iter()
        .map(|allocation| match allocation {
            Allocation::Standalone(mut line) => {
                line.is_system_recommended = true;
                Allocation::Standalone(line)
            }
            Allocation::Parent(mut parent) => {
                parent.is_system_recommended = true;
                for child in &mut parent.children {
                    child.is_system_recommended = true;
                }
                parent.recompute_total();
                Allocation::Parent(parent)
            }
        })
        .collect()
}

/// Half-open window `[start, period_start)` of past spending to average.
#[must_use]
pub fn history_window(period_start: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = period_start
        .checked_sub_months(Months::new(HISTORY_MONTHS))
        .unwrap_or(NaiveDate::MIN);
    (start, period_start)
}

/// Weight for a parent category, by keyword.
#[must_use]
pub fn keyword_weight(name: &str) -> Decimal {
    let name = name.to_lowercase();
    KEYWORD_WEIGHTS
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map_or(DEFAULT_WEIGHT, |(_, weight)| *weight)
}

/// Recommends allocations of `income` across expense categories.
///
/// `historical_spend` holds total spend per category over the
/// [`history_window`]. When no child category has history, parents are
/// weighted by keyword and children by rank (`1 / (i + 1)`). Otherwise the
/// income is shared across children in proportion to their history.
/// Categories without children receive a zero standalone entry. Every split
/// goes through [`DistributionUtil`], so the plan allocates exactly the
/// rounded income whenever at least one parent exists.
#[must_use]
pub fn recommend_allocations(
    income: Decimal,
    categories: &[Category],
    historical_spend: &HashMap<CategoryId, Decimal>,
) -> Vec<Allocation> {
    let tree = build_category_hierarchy(&expense_categories(categories));
    let (parents, standalone): (Vec<&CategoryNode>, Vec<&CategoryNode>) =
        tree.iter().partition(|node| node.has_children());

    let target = round_rupiah(income);
    let history: Vec<Vec<Decimal>> = parents
        .iter()
        .map(|node| {
            node.children
                .iter()
                .map(|child| {
                    historical_spend
                        .get(&child.id)
                        .copied()
                        .unwrap_or(Decimal::ZERO)
                        .max(Decimal::ZERO)
                })
                .collect()
        })
        .collect();
    let has_history = history.iter().flatten().any(|amount| *amount > Decimal::ZERO);

    let mut recommendations = if has_history {
        by_history(target, &parents, &history)
    } else {
        by_keyword(target, &parents)
    };

    recommendations.extend(standalone.into_iter().map(|node| {
        Allocation::Standalone(
            AllocationLine::new(node.category.id, Decimal::ZERO).named(node.category.name.clone()),
        )
    }));

    tag_recommended(recommendations)
}

fn parent_entry(node: &CategoryNode, amounts: Vec<Decimal>) -> Allocation {
    let children = node
        .children
        .iter()
        .zip(amounts)
        .map(|(child, amount)| AllocationLine::new(child.id, amount).named(child.name.clone()))
        .collect();
    Allocation::Parent(
        ParentAllocation::new(node.category.id, children).named(node.category.name.clone()),
    )
}

fn by_keyword(target: Decimal, parents: &[&CategoryNode]) -> Vec<Allocation> {
    let weights: Vec<Decimal> = parents
        .iter()
        .map(|node| keyword_weight(&node.category.name))
        .collect();
    let parent_totals = DistributionUtil::split_by_weights(target, &weights, 0);

    parents
        .iter()
        .zip(parent_totals)
        .map(|(node, total)| {
            let rank_weights: Vec<Decimal> = (1..=node.children.len())
                .map(|rank| Decimal::ONE / Decimal::from(rank))
                .collect();
            parent_entry(node, DistributionUtil::split_by_weights(total, &rank_weights, 0))
        })
        .collect()
}

/// Shares `target` across every child by history, then regroups by parent.
fn by_history(
    target: Decimal,
    parents: &[&CategoryNode],
    history: &[Vec<Decimal>],
) -> Vec<Allocation> {
    let flat: Vec<Decimal> = history.iter().flatten().copied().collect();
    let mut shares = DistributionUtil::split_by_weights(target, &flat, 0).into_iter();

    parents
        .iter()
        .map(|node| {
            let amounts = shares.by_ref().take(node.children.len()).collect();
            parent_entry(node, amounts)
        })
        .collect()
}
