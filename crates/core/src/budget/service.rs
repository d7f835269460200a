//! Budget plan lifecycle and validation.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Months, NaiveDate};
use dompet_shared::types::{BudgetPlanId, CategoryId};
use rust_decimal::Decimal;

use super::error::BudgetError;
use super::realization::{compute_realization, summarize_realization};
use super::types::{
    Allocation, BudgetPlan, BudgetPlanInput, BudgetStatus, PlanHeader, RealizationReport,
};

/// Budget service for lifecycle rules.
pub struct BudgetService;

impl BudgetService {
    /// Activates a draft plan, freezing `income` as its income.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::AlreadyActive` if the plan is already active.
    pub fn activate(plan: &BudgetPlan, income: Decimal) -> Result<BudgetPlan, BudgetError> {
        if plan.status == BudgetStatus::Active {
            return Err(BudgetError::AlreadyActive(plan.id));
        }

        Ok(BudgetPlan {
            income_amount: income,
            actual_income: Some(income),
            status: BudgetStatus::Active,
            ..plan.clone()
        })
    }

    /// Income the plan should be measured against.
    ///
    /// Drafts follow the live income when one is known; active plans always
    /// use the frozen amount.
    #[must_use]
    pub fn effective_income(plan: &BudgetPlan, live_income: Option<Decimal>) -> Decimal {
        match plan.status {
            BudgetStatus::Draft => live_income
                .or(plan.actual_income)
                .unwrap_or(plan.income_amount),
            BudgetStatus::Active => plan.income_amount,
        }
    }

    /// Checks that a saved plan's income may still change.
    ///
    /// Allocations stay editable in both states; only income is frozen.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::IncomeFrozen` for active plans.
    pub const fn ensure_income_editable(
        plan_id: BudgetPlanId,
        status: BudgetStatus,
    ) -> Result<(), BudgetError> {
        match status {
            BudgetStatus::Draft => Ok(()),
            BudgetStatus::Active => Err(BudgetError::IncomeFrozen(plan_id)),
        }
    }

    /// Validates a plan before it is submitted.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName`, `InvalidPeriod`, `NegativeAmount`,
    /// `ParentTotalMismatch` or `DuplicateCategory` for the first problem
    /// found.
    pub fn validate_plan(input: &BudgetPlanInput) -> Result<(), BudgetError> {
        if input.name.trim().is_empty() {
            return Err(BudgetError::EmptyName);
        }

        if input.period_start > input.period_end {
            return Err(BudgetError::InvalidPeriod {
                start: input.period_start,
                end: input.period_end,
            });
        }

        let mut seen: HashSet<CategoryId> = HashSet::new();
        for id in input.allocations.iter().flat_map(Allocation::category_ids) {
            if !seen.insert(id) {
                return Err(BudgetError::DuplicateCategory(id));
            }
        }

        for allocation in &input.allocations {
            match allocation {
                Allocation::Standalone(line) => {
                    if line.allocated_amount < Decimal::ZERO {
                        return Err(BudgetError::NegativeAmount(line.category_id));
                    }
                }
                Allocation::Parent(parent) => {
                    if let Some(child) = parent
                        .children
                        .iter()
                        .find(|c| c.allocated_amount < Decimal::ZERO)
                    {
                        return Err(BudgetError::NegativeAmount(child.category_id));
                    }
                    let expected = parent.children_total();
                    if parent.allocated_amount != expected {
                        return Err(BudgetError::ParentTotalMismatch {
                            category_id: parent.category_id,
                            stored: parent.allocated_amount,
                            expected,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Period of the month after `today`, first to last day.
    #[must_use]
    pub fn default_period(today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let this_month = today.with_day(1).unwrap_or(today);
        let start = this_month
            .checked_add_months(Months::new(1))
            .unwrap_or(this_month);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(start);
        (start, end)
    }

    /// Builds a realization report from a plan and its period's spend.
    #[must_use]
    pub fn realization_report(
        plan: &BudgetPlan,
        income: Decimal,
        actual_spend: &HashMap<CategoryId, Decimal>,
    ) -> RealizationReport {
        let realization = compute_realization(&plan.allocations, actual_spend);
        let summary = summarize_realization(&realization, income);

        RealizationReport {
            budget_plan: PlanHeader {
                id: plan.id,
                name: plan.name.clone(),
                income_amount: income,
                period_start: plan.period_start,
                period_end: plan.period_end,
            },
            summary,
            realization,
        }
    }
}
