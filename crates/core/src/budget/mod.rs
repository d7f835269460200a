//! Budget allocation planning and realization.

pub mod allocation;
pub mod distribution;
pub mod error;
pub mod hierarchy;
pub mod realization;
pub mod recommend;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use allocation::{
    allocation_percentage, compute_totals, update_child_allocation, update_parent_percentage,
};
pub use distribution::DistributionUtil;
pub use error::BudgetError;
pub use hierarchy::{build_category_hierarchy, expense_categories};
pub use realization::{compute_realization, evaluate, summarize_realization};
pub use recommend::{
    history_window, recommend_allocations, tag_recommended, validate_recommendation_request,
};
pub use service::BudgetService;
pub use types::{
    Allocation, AllocationLine, AllocationTotals, BudgetPlan, BudgetPlanInput, BudgetStatus,
    Category, CategoryNode, CategoryType, ParentAllocation, PlanHeader, RealizationItem,
    RealizationReport, RealizationStatus, RealizationSummary,
};
