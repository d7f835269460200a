//! Backend seam.
//!
//! Everything the client needs from the REST backend goes through
//! [`BudgetBackend`], so the planner can run against an in-memory backend.

use async_trait::async_trait;
use chrono::NaiveDate;
use dompet_core::analytics::{IncomeCategoryTotal, TransactionPage};
use dompet_core::budget::{
    Allocation, BudgetPlan, BudgetPlanInput, BudgetStatus, Category, RealizationReport,
};
use dompet_shared::types::{BudgetPlanId, PageRequest};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::error::ClientResult;

/// Inclusive date range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Response to creating a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedPlan {
    /// New plan ID.
    pub budget_plan_id: BudgetPlanId,
    /// Income computed for the period.
    #[serde(with = "rust_decimal::serde::float")]
    pub income_amount: Decimal,
    /// Initial status, always draft.
    pub status: BudgetStatus,
}

/// Response to activating a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivatedPlan {
    /// Frozen income.
    #[serde(with = "rust_decimal::serde::float")]
    pub income_amount: Decimal,
    /// New status.
    pub status: BudgetStatus,
}

/// Operations offered by the budget backend.
#[async_trait]
pub trait BudgetBackend: Send + Sync {
    /// Lists the workspace's plans.
    async fn list_plans(&self, ctx: &RequestContext) -> ClientResult<Vec<BudgetPlan>>;

    /// Creates a draft plan.
    async fn create_plan(
        &self,
        ctx: &RequestContext,
        input: &BudgetPlanInput,
    ) -> ClientResult<CreatedPlan>;

    /// Replaces a plan's fields and allocations.
    async fn update_plan(
        &self,
        ctx: &RequestContext,
        id: BudgetPlanId,
        input: &BudgetPlanInput,
    ) -> ClientResult<()>;

    /// Deletes a plan and its allocations.
    async fn delete_plan(&self, ctx: &RequestContext, id: BudgetPlanId) -> ClientResult<()>;

    /// Activates a draft plan.
    async fn activate_plan(
        &self,
        ctx: &RequestContext,
        id: BudgetPlanId,
    ) -> ClientResult<ActivatedPlan>;

    /// Sums INCOME transactions in the period.
    async fn calculate_income(&self, ctx: &RequestContext, period: DateRange)
    -> ClientResult<Decimal>;

    /// Recommended allocations for an income and period.
    async fn recommendations(
        &self,
        ctx: &RequestContext,
        income: Decimal,
        period: DateRange,
    ) -> ClientResult<Vec<Allocation>>;

    /// Planned vs actual for one plan.
    async fn realization(
        &self,
        ctx: &RequestContext,
        id: BudgetPlanId,
    ) -> ClientResult<RealizationReport>;

    /// All categories of the workspace.
    async fn categories(&self, ctx: &RequestContext) -> ClientResult<Vec<Category>>;

    /// One page of transactions.
    async fn transactions(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
        range: Option<DateRange>,
    ) -> ClientResult<TransactionPage>;

    /// Server-side income aggregation.
    async fn income_by_category(
        &self,
        ctx: &RequestContext,
        top_n: usize,
        range: Option<DateRange>,
    ) -> ClientResult<Vec<IncomeCategoryTotal>>;
}
