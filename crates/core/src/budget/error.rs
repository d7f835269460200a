//! Budget error types.

use chrono::NaiveDate;
use dompet_shared::AppError;
use dompet_shared::types::{BudgetPlanId, CategoryId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Period start or end is not set.
    #[error("Period start and end dates are required")]
    MissingPeriod,

    /// Period start is after period end.
    #[error("Period start {start} is after period end {end}")]
    InvalidPeriod {
        /// Period start.
        start: NaiveDate,
        /// Period end.
        end: NaiveDate,
    },

    /// Income must be positive to request recommendations.
    #[error("Income must be greater than zero, got {0}")]
    NonPositiveIncome(Decimal),

    /// Income cannot be negative.
    #[error("Income cannot be negative, got {0}")]
    NegativeIncome(Decimal),

    /// Percentage cannot be negative.
    #[error("Percentage cannot be negative, got {0}")]
    InvalidPercentage(Decimal),

    /// A computed amount does not fit in a `Decimal`.
    #[error("Amount out of range: {income} at {percentage}%")]
    AmountOutOfRange {
        /// Income the share was taken from.
        income: Decimal,
        /// Requested share.
        percentage: Decimal,
    },

    /// No parent allocation with this category.
    #[error("Parent allocation not found: {0}")]
    ParentNotFound(CategoryId),

    /// The parent has no child with this category.
    #[error("Child allocation {child} not found under parent {parent}")]
    ChildNotFound {
        /// Parent category.
        parent: CategoryId,
        /// Child category.
        child: CategoryId,
    },

    /// No standalone allocation with this category.
    #[error("Standalone allocation not found: {0}")]
    StandaloneNotFound(CategoryId),

    /// The entry is standalone but a parent was expected.
    #[error("Allocation {0} has no children")]
    NotAParent(CategoryId),

    /// The plan has not been created on the backend yet.
    #[error("Budget plan has not been saved yet")]
    PlanNotSaved,

    /// Plan is already active.
    #[error("Budget plan {0} is already active")]
    AlreadyActive(BudgetPlanId),

    /// Income of an active plan is frozen.
    #[error("Income of budget plan {0} is frozen")]
    IncomeFrozen(BudgetPlanId),

    /// Plan name is empty.
    #[error("Budget plan name is required")]
    EmptyName,

    /// Amount cannot be negative.
    #[error("Amount cannot be negative for category {0}")]
    NegativeAmount(CategoryId),

    /// Parent total does not match its children.
    #[error("Parent {category_id} total {stored} does not match children total {expected}")]
    ParentTotalMismatch {
        /// Parent category.
        category_id: CategoryId,
        /// Stored parent total.
        stored: Decimal,
        /// Sum of the children.
        expected: Decimal,
    },

    /// A category appears in more than one allocation.
    #[error("Category {0} is allocated more than once")]
    DuplicateCategory(CategoryId),
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::ParentNotFound(_)
            | BudgetError::ChildNotFound { .. }
            | BudgetError::StandaloneNotFound(_) => Self::NotFound(err.to_string()),
            BudgetError::AlreadyActive(_) | BudgetError::IncomeFrozen(_) => {
                Self::BusinessRule(err.to_string())
            }
            _ => Self::Validation(err.to_string()),
        }
    }
}
