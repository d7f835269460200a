//! Budget data types.

use chrono::NaiveDate;
use dompet_shared::types::{BudgetPlanId, CategoryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryType {
    /// Income category.
    Income,
    /// Expense category.
    Expense,
}

/// A workspace category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    /// Parent category, one level of nesting only.
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

/// A root category with its direct children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    /// The root category.
    #[serde(flatten)]
    pub category: Category,
    /// Children in input order.
    pub children: Vec<Category>,
}

impl CategoryNode {
    /// Returns true if the node has children.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Budget plan lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BudgetStatus {
    /// Income is recomputed from live transactions.
    Draft,
    /// Income is frozen.
    Active,
}

/// A leaf allocation: a spending cap for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationLine {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name, when the backend provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Allocated amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub allocated_amount: Decimal,
    /// True while the amount is the untouched system recommendation.
    #[serde(default)]
    pub is_system_recommended: bool,
    /// Optional notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AllocationLine {
    /// Creates a manual allocation line.
    #[must_use]
    pub fn new(category_id: CategoryId, allocated_amount: Decimal) -> Self {
        Self {
            category_id,
            category_name: None,
            allocated_amount,
            is_system_recommended: false,
            notes: None,
        }
    }

    /// Sets the category name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.category_name = Some(name.into());
        self
    }
}

/// An allocation for a category that has children.
///
/// `allocated_amount` always equals the sum of the children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentAllocation {
    /// Parent category ID.
    pub category_id: CategoryId,
    /// Parent category name.
    pub category_name: Option<String>,
    /// Sum of the children's amounts.
    pub allocated_amount: Decimal,
    /// True when the entry came from a recommendation.
    pub is_system_recommended: bool,
    /// Child allocations.
    pub children: Vec<AllocationLine>,
}

impl ParentAllocation {
    /// Creates a parent entry whose total is derived from `children`.
    #[must_use]
    pub fn new(category_id: CategoryId, children: Vec<AllocationLine>) -> Self {
        let mut parent = Self {
            category_id,
            category_name: None,
            allocated_amount: Decimal::ZERO,
            is_system_recommended: false,
            children,
        };
        parent.recompute_total();
        parent
    }

    /// Sets the category name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.category_name = Some(name.into());
        self
    }

    /// Sum of the children's amounts.
    #[must_use]
    pub fn children_total(&self) -> Decimal {
        self.children.iter().map(|c| c.allocated_amount).sum()
    }

    /// Restores the parent invariant.
    pub fn recompute_total(&mut self) {
        self.allocated_amount = self.children_total();
    }
}

/// A budget allocation entry.
///
/// On the wire this is a flat object distinguished by `is_parent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AllocationRecord", into = "AllocationRecord")]
pub enum Allocation {
    /// A category without children.
    Standalone(AllocationLine),
    /// A category whose budget is split across children.
    Parent(ParentAllocation),
}

impl Allocation {
    /// Category ID of the entry.
    #[must_use]
    pub const fn category_id(&self) -> CategoryId {
        match self {
            Self::Standalone(line) => line.category_id,
            Self::Parent(parent) => parent.category_id,
        }
    }

    /// Stored amount of the entry.
    #[must_use]
    pub const fn allocated_amount(&self) -> Decimal {
        match self {
            Self::Standalone(line) => line.allocated_amount,
            Self::Parent(parent) => parent.allocated_amount,
        }
    }

    /// Amount the entry contributes to the plan total.
    ///
    /// Parents contribute the sum of their children, never the stored total.
    #[must_use]
    pub fn planned_amount(&self) -> Decimal {
        match self {
            Self::Standalone(line) => line.allocated_amount,
            Self::Parent(parent) => parent.children_total(),
        }
    }

    /// Child lines (empty for standalone entries).
    #[must_use]
    pub fn children(&self) -> &[AllocationLine] {
        match self {
            Self::Standalone(_) => &[],
            Self::Parent(parent) => &parent.children,
        }
    }

    /// Every category ID held by this entry, parent first.
    pub fn category_ids(&self) -> impl Iterator<Item = CategoryId> + '_ {
        std::iter::once(self.category_id()).chain(self.children().iter().map(|c| c.category_id))
    }
}

/// Flat wire shape of an allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AllocationRecord {
    category_id: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category_name: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    allocated_amount: Decimal,
    #[serde(default)]
    is_system_recommended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(default)]
    is_parent: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<AllocationLine>,
}

impl From<AllocationRecord> for Allocation {
    fn from(record: AllocationRecord) -> Self {
        if record.is_parent {
            // Stored totals from older payloads may be stale.
            let mut parent = ParentAllocation {
                category_id: record.category_id,
                category_name: record.category_name,
                allocated_amount: record.allocated_amount,
                is_system_recommended: record.is_system_recommended,
                children: record.children,
            };
            parent.recompute_total();
            Self::Parent(parent)
        } else {
            Self::Standalone(AllocationLine {
                category_id: record.category_id,
                category_name: record.category_name,
                allocated_amount: record.allocated_amount,
                is_system_recommended: record.is_system_recommended,
                notes: record.notes,
            })
        }
    }
}

impl From<Allocation> for AllocationRecord {
    fn from(allocation: Allocation) -> Self {
        match allocation {
            Allocation::Standalone(line) => Self {
                category_id: line.category_id,
                category_name: line.category_name,
                allocated_amount: line.allocated_amount,
                is_system_recommended: line.is_system_recommended,
                notes: line.notes,
                is_parent: false,
                children: Vec::new(),
            },
            Allocation::Parent(parent) => Self {
                category_id: parent.category_id,
                category_name: parent.category_name,
                allocated_amount: parent.allocated_amount,
                is_system_recommended: parent.is_system_recommended,
                notes: None,
                is_parent: true,
                children: parent.children,
            },
        }
    }
}

/// A budget plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPlan {
    /// Plan ID.
    pub id: BudgetPlanId,
    /// Plan name.
    pub name: String,
    /// Stored income (frozen once active).
    #[serde(with = "rust_decimal::serde::float")]
    pub income_amount: Decimal,
    /// Income for display: live for drafts, frozen for active plans.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub actual_income: Option<Decimal>,
    /// First day of the period (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the period (inclusive).
    pub period_end: NaiveDate,
    /// Lifecycle status.
    pub status: BudgetStatus,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Allocations in display order.
    #[serde(default)]
    pub allocations: Vec<Allocation>,
    /// Creation timestamp as sent by the backend.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Fields submitted when creating or updating a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPlanInput {
    /// Plan name.
    pub name: String,
    /// First day of the period (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the period (inclusive).
    pub period_end: NaiveDate,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Allocations.
    #[serde(default)]
    pub allocations: Vec<Allocation>,
}

/// Allocation totals for the editing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationTotals {
    /// Sum of all planned amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_allocated: Decimal,
    /// Income minus the total allocated.
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining: Decimal,
}

/// Realization status for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealizationStatus {
    /// Spent less than allocated.
    Under,
    /// Spent more than allocated.
    Over,
    /// Spent exactly the allocation.
    #[serde(alias = "on-track")]
    OnTrack,
    /// Spent on a category with no allocation.
    Unbudgeted,
}

/// Planned vs actual spend for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizationItem {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name.
    #[serde(default)]
    pub category_name: Option<String>,
    /// Allocated amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub allocated_amount: Decimal,
    /// Actual spend in the period.
    #[serde(with = "rust_decimal::serde::float")]
    pub actual_spent: Decimal,
    /// `actual_spent - allocated_amount`.
    #[serde(with = "rust_decimal::serde::float")]
    pub variance: Decimal,
    /// Variance relative to the allocation, in percent.
    #[serde(with = "rust_decimal::serde::float")]
    pub variance_percentage: Decimal,
    /// Status classification.
    pub status: RealizationStatus,
    /// Child items for parent categories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RealizationItem>,
}

/// Realization totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizationSummary {
    /// Sum of leaf allocations.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_budgeted: Decimal,
    /// Sum of actual spend across every category.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
    /// `total_spent - total_budgeted`.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_variance: Decimal,
    /// Total variance relative to the budget, in percent.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_variance_percentage: Decimal,
    /// Income minus total spend.
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining: Decimal,
}

/// Plan header returned with a realization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanHeader {
    /// Plan ID.
    pub id: BudgetPlanId,
    /// Plan name.
    pub name: String,
    /// Income used for the realization.
    #[serde(with = "rust_decimal::serde::float")]
    pub income_amount: Decimal,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period.
    pub period_end: NaiveDate,
}

/// Budget vs actual report for one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizationReport {
    /// Plan header.
    pub budget_plan: PlanHeader,
    /// Totals.
    pub summary: RealizationSummary,
    /// Per-category items.
    pub realization: Vec<RealizationItem>,
}
