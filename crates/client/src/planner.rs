//! Budget plan editing session.
//!
//! A [`BudgetPlanner`] owns the form for one plan. Edits go through the pure
//! functions in `dompet_core::budget`; backend calls only replace form state
//! after they succeed.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Asia::Jakarta;
use dompet_core::access::BudgetAction;
use dompet_core::budget::{
    Allocation, AllocationTotals, BudgetError, BudgetPlan, BudgetPlanInput, BudgetService,
    BudgetStatus, RealizationReport, compute_totals, expense_categories, history_window,
    recommend_allocations, tag_recommended, update_child_allocation, update_parent_percentage,
    validate_recommendation_request,
};
use dompet_shared::types::{BudgetPlanId, CategoryId, parse_amount};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::analytics::expense_by_category;
use crate::backend::{BudgetBackend, DateRange};
use crate::context::RequestContext;
use crate::error::ClientResult;

/// Page size used when reading spending history.
const HISTORY_PAGE_SIZE: u32 = 200;

/// Today's date in Western Indonesia Time.
#[must_use]
pub fn local_today() -> NaiveDate {
    Utc::now().with_timezone(&Jakarta).date_naive()
}

/// Local form state for one plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanForm {
    /// Backend ID once the plan has been created.
    pub plan_id: Option<BudgetPlanId>,
    /// Lifecycle status.
    pub status: BudgetStatus,
    /// Plan name.
    pub name: String,
    /// First day of the period.
    pub period_start: Option<NaiveDate>,
    /// Last day of the period.
    pub period_end: Option<NaiveDate>,
    /// Optional notes.
    pub notes: Option<String>,
    /// Income the plan is measured against.
    pub income: Decimal,
    /// Allocations in display order.
    pub allocations: Vec<Allocation>,
}

impl PlanForm {
    fn period(&self) -> Option<DateRange> {
        Some(DateRange::new(self.period_start?, self.period_end?))
    }

    /// Builds the submission payload.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::MissingPeriod` when a date is unset.
    pub fn to_input(&self) -> Result<BudgetPlanInput, BudgetError> {
        let period = self.period().ok_or(BudgetError::MissingPeriod)?;
        Ok(BudgetPlanInput {
            name: self.name.trim().to_string(),
            period_start: period.start,
            period_end: period.end,
            notes: self.notes.clone().filter(|n| !n.trim().is_empty()),
            allocations: self.allocations.clone(),
        })
    }
}

/// Where the current recommendations came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationSource {
    /// The backend recommendation endpoint.
    Backend,
    /// The local engine, after the backend failed.
    Local,
}

/// Editing session for one budget plan.
pub struct BudgetPlanner {
    backend: Arc<dyn BudgetBackend>,
    ctx: RequestContext,
    form: PlanForm,
}

impl BudgetPlanner {
    /// Opens a new draft for the month after `today` and loads its income.
    pub async fn open_new(
        backend: Arc<dyn BudgetBackend>,
        ctx: RequestContext,
        today: NaiveDate,
    ) -> Self {
        let (start, end) = BudgetService::default_period(today);
        let mut planner = Self {
            backend,
            ctx,
            form: PlanForm {
                plan_id: None,
                status: BudgetStatus::Draft,
                name: String::new(),
                period_start: Some(start),
                period_end: Some(end),
                notes: None,
                income: Decimal::ZERO,
                allocations: Vec::new(),
            },
        };
        planner.refresh_income().await;
        planner
    }

    /// Opens an existing plan for editing.
    #[must_use]
    pub fn open_existing(
        backend: Arc<dyn BudgetBackend>,
        ctx: RequestContext,
        plan: BudgetPlan,
    ) -> Self {
        let income = BudgetService::effective_income(&plan, None);
        Self {
            backend,
            ctx,
            form: PlanForm {
                plan_id: Some(plan.id),
                status: plan.status,
                name: plan.name,
                period_start: Some(plan.period_start),
                period_end: Some(plan.period_end),
                notes: plan.notes,
                income,
                allocations: plan.allocations,
            },
        }
    }

    /// Current form state.
    #[must_use]
    pub const fn form(&self) -> &PlanForm {
        &self.form
    }

    /// Session context.
    #[must_use]
    pub const fn context(&self) -> &RequestContext {
        &self.ctx
    }

    /// Sets the plan name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.name = name.into();
    }

    /// Sets the notes.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.form.notes = notes;
    }

    /// Changes the period start and reloads income for drafts.
    pub async fn set_period_start(&mut self, start: NaiveDate) {
        self.form.period_start = Some(start);
        self.refresh_income().await;
    }

    /// Changes the period end and reloads income for drafts.
    pub async fn set_period_end(&mut self, end: NaiveDate) {
        self.form.period_end = Some(end);
        self.refresh_income().await;
    }

    /// Overrides the income by hand.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::IncomeFrozen` for active plans.
    pub fn set_income(&mut self, income: Decimal) -> Result<(), BudgetError> {
        if let Some(id) = self.form.plan_id {
            BudgetService::ensure_income_editable(id, self.form.status)?;
        }
        self.form.income = income.max(Decimal::ZERO);
        Ok(())
    }

    /// Reloads income for the period. Active plans keep their frozen
    /// income; a failed lookup resets income to zero.
    async fn refresh_income(&mut self) {
        if self.form.status == BudgetStatus::Active {
            return;
        }
        let Some(period) = self.form.period() else {
            return;
        };

        match self.backend.calculate_income(&self.ctx, period).await {
            Ok(income) => self.form.income = income,
            Err(e) => {
                warn!(
                    workspace_id = %self.ctx.workspace_id(),
                    error = %e,
                    "Failed to calculate income for period"
                );
                self.form.income = Decimal::ZERO;
            }
        }
    }

    /// Replaces the allocations with recommendations for the current income.
    ///
    /// Falls back to the local engine when the backend endpoint fails.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request is sent, or the
    /// category lookup error when the fallback cannot run either.
    pub async fn request_recommendations(&mut self) -> ClientResult<RecommendationSource> {
        self.ctx.ensure(BudgetAction::Recommend)?;
        let (start, end) = validate_recommendation_request(
            self.form.income,
            self.form.period_start,
            self.form.period_end,
        )?;
        let period = DateRange::new(start, end);

        match self
            .backend
            .recommendations(&self.ctx, self.form.income, period)
            .await
        {
            Ok(recommendations) => {
                self.form.allocations = tag_recommended(recommendations);
                Ok(RecommendationSource::Backend)
            }
            Err(e) => {
                warn!(
                    workspace_id = %self.ctx.workspace_id(),
                    error = %e,
                    "Recommendation request failed, using local engine"
                );
                self.form.allocations = self.local_recommendations(start).await?;
                Ok(RecommendationSource::Local)
            }
        }
    }

    async fn local_recommendations(
        &self,
        period_start: NaiveDate,
    ) -> ClientResult<Vec<Allocation>> {
        let categories = expense_categories(&self.backend.categories(&self.ctx).await?);

        let (from, until) = history_window(period_start);
        let history_range = DateRange::new(from, until.pred_opt().unwrap_or(until));
        let history = match expense_by_category(
            self.backend.as_ref(),
            &self.ctx,
            history_range,
            HISTORY_PAGE_SIZE,
        )
        .await
        {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "Spending history unavailable");
                HashMap::new()
            }
        };

        Ok(recommend_allocations(self.form.income, &categories, &history))
    }

    /// Sets a child or standalone amount.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the target is missing.
    pub fn set_child_amount(
        &mut self,
        parent_id: CategoryId,
        child_id: Option<CategoryId>,
        amount: Decimal,
    ) -> Result<(), BudgetError> {
        self.form.allocations =
            update_child_allocation(&self.form.allocations, parent_id, child_id, amount)?;
        Ok(())
    }

    /// Sets an amount from user text; blank or invalid input counts as zero.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the target is missing.
    pub fn set_child_amount_text(
        &mut self,
        parent_id: CategoryId,
        child_id: Option<CategoryId>,
        text: &str,
    ) -> Result<(), BudgetError> {
        self.set_child_amount(parent_id, child_id, parse_amount(text))
    }

    /// Sets a parent's share of income and redistributes its children.
    ///
    /// # Errors
    ///
    /// Returns an error for negative percentages or unknown parents.
    pub fn set_parent_percentage(
        &mut self,
        parent_id: CategoryId,
        percentage: Decimal,
    ) -> Result<(), BudgetError> {
        self.form.allocations = update_parent_percentage(
            &self.form.allocations,
            parent_id,
            percentage,
            self.form.income,
        )?;
        Ok(())
    }

    /// Totals for the current form.
    #[must_use]
    pub fn totals(&self) -> AllocationTotals {
        compute_totals(&self.form.allocations, self.form.income)
    }

    /// Creates or updates the plan on the backend.
    ///
    /// The form only changes after the backend accepts it.
    ///
    /// # Errors
    ///
    /// Returns a validation error before sending, or the backend error.
    pub async fn submit(&mut self) -> ClientResult<BudgetPlanId> {
        let action = if self.form.plan_id.is_some() {
            BudgetAction::Update
        } else {
            BudgetAction::Create
        };
        self.ctx.ensure(action)?;

        let input = self.form.to_input()?;
        BudgetService::validate_plan(&input)?;

        match self.form.plan_id {
            Some(id) => {
                self.backend.update_plan(&self.ctx, id, &input).await?;
                info!(workspace_id = %self.ctx.workspace_id(), plan_id = %id, "Budget plan updated");
                Ok(id)
            }
            None => {
                let created = self.backend.create_plan(&self.ctx, &input).await?;
                self.form.plan_id = Some(created.budget_plan_id);
                self.form.status = created.status;
                self.form.income = created.income_amount;
                info!(
                    workspace_id = %self.ctx.workspace_id(),
                    plan_id = %created.budget_plan_id,
                    "Budget plan created"
                );
                Ok(created.budget_plan_id)
            }
        }
    }

    fn saved_id(&self) -> Result<BudgetPlanId, BudgetError> {
        self.form.plan_id.ok_or(BudgetError::PlanNotSaved)
    }

    /// Activates the plan, freezing its income.
    ///
    /// # Errors
    ///
    /// Returns `PlanNotSaved`, `AlreadyActive` or the backend error.
    pub async fn activate(&mut self) -> ClientResult<()> {
        self.ctx.ensure(BudgetAction::Activate)?;
        let id = self.saved_id()?;
        if self.form.status == BudgetStatus::Active {
            return Err(BudgetError::AlreadyActive(id).into());
        }

        let activated = self.backend.activate_plan(&self.ctx, id).await?;
        self.form.status = activated.status;
        self.form.income = activated.income_amount;
        info!(workspace_id = %self.ctx.workspace_id(), plan_id = %id, "Budget plan activated");
        Ok(())
    }

    /// Deletes the plan and its allocations.
    ///
    /// # Errors
    ///
    /// Returns `PlanNotSaved` or the backend error.
    pub async fn delete(&self) -> ClientResult<()> {
        self.ctx.ensure(BudgetAction::Delete)?;
        let id = self.saved_id()?;
        self.backend.delete_plan(&self.ctx, id).await?;
        info!(workspace_id = %self.ctx.workspace_id(), plan_id = %id, "Budget plan deleted");
        Ok(())
    }

    /// Planned vs actual for the saved plan.
    ///
    /// # Errors
    ///
    /// Returns `PlanNotSaved` or the backend error.
    pub async fn realization(&self) -> ClientResult<RealizationReport> {
        self.ctx.ensure(BudgetAction::View)?;
        let id = self.saved_id()?;
        self.backend.realization(&self.ctx, id).await
    }
}
