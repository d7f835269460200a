//! In-memory backend for tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use dompet_core::analytics::{
    IncomeCategoryTotal, Transaction, TransactionCategory, TransactionPage, TransactionType,
};
use dompet_core::budget::{
    Allocation, BudgetPlan, BudgetPlanInput, BudgetService, BudgetStatus, Category,
    RealizationReport,
};
use dompet_shared::types::{BudgetPlanId, CategoryId, PageRequest, TransactionId};
use rust_decimal::Decimal;

use crate::backend::{ActivatedPlan, BudgetBackend, CreatedPlan, DateRange};
use crate::context::RequestContext;
use crate::error::{ClientError, ClientResult};

#[derive(Default)]
struct State {
    plans: Vec<BudgetPlan>,
    next_id: i64,
    income: Decimal,
    categories: Vec<Category>,
    recommendations: Vec<Allocation>,
    transactions: Vec<Transaction>,
    server_income: Vec<IncomeCategoryTotal>,
    spend: HashMap<CategoryId, Decimal>,
    fail_income: bool,
    fail_recommendations: bool,
    fail_writes: bool,
    fail_aggregation: bool,
    hide_total_pages: bool,
    income_calls: usize,
    recommendation_calls: usize,
    pages_served: usize,
}

/// Backend holding its state in memory.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

fn unavailable(what: &str) -> ClientError {
    ClientError::Status {
        status: 503,
        message: format!("{what} unavailable"),
    }
}

fn rejected(err: &dompet_core::budget::BudgetError) -> ClientError {
    ClientError::Status {
        status: 400,
        message: err.to_string(),
    }
}

fn not_found(id: BudgetPlanId) -> ClientError {
    ClientError::Status {
        status: 404,
        message: format!("Budget plan {id} not found"),
    }
}

/// An INCOME transaction in a named category.
pub fn income(id: i64, category: &str, amount: Decimal) -> Transaction {
    Transaction {
        id: TransactionId::new(id),
        transaction_type: TransactionType::Income,
        amount,
        transaction_date: NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
        description: None,
        category: Some(TransactionCategory {
            id: CategoryId::new(900 + id),
            name: category.to_string(),
            category_type: None,
        }),
        category_name: None,
    }
}

/// An EXPENSE transaction in a category.
pub fn expense(id: i64, category_id: i64, amount: Decimal) -> Transaction {
    Transaction {
        id: TransactionId::new(id),
        transaction_type: TransactionType::Expense,
        amount,
        transaction_date: NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
        description: None,
        category: Some(TransactionCategory {
            id: CategoryId::new(category_id),
            name: format!("Category {category_id}"),
            category_type: None,
        }),
        category_name: None,
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn set_income(&self, income: Decimal) {
        self.state().income = income;
    }

    pub fn fail_income(&self) {
        self.state().fail_income = true;
    }

    pub fn set_categories(&self, categories: Vec<Category>) {
        self.state().categories = categories;
    }

    pub fn set_recommendations(&self, recommendations: Vec<Allocation>) {
        self.state().recommendations = recommendations;
    }

    pub fn fail_recommendations(&self) {
        self.state().fail_recommendations = true;
    }

    pub fn fail_writes(&self) {
        self.state().fail_writes = true;
    }

    pub fn set_transactions(&self, transactions: Vec<Transaction>) {
        self.state().transactions = transactions;
    }

    pub fn hide_total_pages(&self) {
        self.state().hide_total_pages = true;
    }

    pub fn set_server_income(&self, totals: Vec<IncomeCategoryTotal>) {
        self.state().server_income = totals;
    }

    pub fn fail_aggregation(&self) {
        self.state().fail_aggregation = true;
    }

    pub fn set_spend(&self, spend: HashMap<CategoryId, Decimal>) {
        self.state().spend = spend;
    }

    pub fn plans(&self) -> Vec<BudgetPlan> {
        self.state().plans.clone()
    }

    pub fn income_calls(&self) -> usize {
        self.state().income_calls
    }

    pub fn recommendation_calls(&self) -> usize {
        self.state().recommendation_calls
    }

    pub fn transaction_pages_served(&self) -> usize {
        self.state().pages_served
    }
}

#[async_trait]
impl BudgetBackend for FakeBackend {
    async fn list_plans(&self, _ctx: &RequestContext) -> ClientResult<Vec<BudgetPlan>> {
        Ok(self.plans())
    }

    async fn create_plan(
        &self,
        _ctx: &RequestContext,
        input: &BudgetPlanInput,
    ) -> ClientResult<CreatedPlan> {
        let mut state = self.state();
        if state.fail_writes {
            return Err(unavailable("Database"));
        }
        BudgetService::validate_plan(input).map_err(|e| rejected(&e))?;

        state.next_id += 1;
        let id = BudgetPlanId::new(state.next_id);
        let income = state.income;
        state.plans.push(BudgetPlan {
            id,
            name: input.name.clone(),
            income_amount: income,
            actual_income: Some(income),
            period_start: input.period_start,
            period_end: input.period_end,
            status: BudgetStatus::Draft,
            notes: input.notes.clone(),
            allocations: input.allocations.clone(),
            created_at: None,
        });

        Ok(CreatedPlan {
            budget_plan_id: id,
            income_amount: income,
            status: BudgetStatus::Draft,
        })
    }

    async fn update_plan(
        &self,
        _ctx: &RequestContext,
        id: BudgetPlanId,
        input: &BudgetPlanInput,
    ) -> ClientResult<()> {
        let mut state = self.state();
        if state.fail_writes {
            return Err(unavailable("Database"));
        }
        let plan = state
            .plans
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;
        plan.name.clone_from(&input.name);
        plan.period_start = input.period_start;
        plan.period_end = input.period_end;
        plan.notes.clone_from(&input.notes);
        plan.allocations.clone_from(&input.allocations);
        Ok(())
    }

    async fn delete_plan(&self, _ctx: &RequestContext, id: BudgetPlanId) -> ClientResult<()> {
        let mut state = self.state();
        if state.fail_writes {
            return Err(unavailable("Database"));
        }
        let before = state.plans.len();
        state.plans.retain(|p| p.id != id);
        if state.plans.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn activate_plan(
        &self,
        _ctx: &RequestContext,
        id: BudgetPlanId,
    ) -> ClientResult<ActivatedPlan> {
        let mut state = self.state();
        let income = state.income;
        let plan = state
            .plans
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;
        *plan = BudgetService::activate(plan, income).map_err(|e| rejected(&e))?;
        Ok(ActivatedPlan {
            income_amount: plan.income_amount,
            status: plan.status,
        })
    }

    async fn calculate_income(
        &self,
        _ctx: &RequestContext,
        _period: DateRange,
    ) -> ClientResult<Decimal> {
        let mut state = self.state();
        state.income_calls += 1;
        if state.fail_income {
            return Err(unavailable("Income"));
        }
        Ok(state.income)
    }

    async fn recommendations(
        &self,
        _ctx: &RequestContext,
        _income: Decimal,
        _period: DateRange,
    ) -> ClientResult<Vec<Allocation>> {
        let mut state = self.state();
        state.recommendation_calls += 1;
        if state.fail_recommendations {
            return Err(unavailable("Recommendations"));
        }
        Ok(state.recommendations.clone())
    }

    async fn realization(
        &self,
        _ctx: &RequestContext,
        id: BudgetPlanId,
    ) -> ClientResult<RealizationReport> {
        let state = self.state();
        let plan = state
            .plans
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;
        let income = BudgetService::effective_income(plan, Some(state.income));
        Ok(BudgetService::realization_report(plan, income, &state.spend))
    }

    async fn categories(&self, _ctx: &RequestContext) -> ClientResult<Vec<Category>> {
        Ok(self.state().categories.clone())
    }

    async fn transactions(
        &self,
        _ctx: &RequestContext,
        page: PageRequest,
        _range: Option<DateRange>,
    ) -> ClientResult<TransactionPage> {
        let mut state = self.state();
        state.pages_served += 1;

        let per_page = page.per_page as usize;
        let start = (page.page as usize - 1) * per_page;
        let transactions: Vec<Transaction> = state
            .transactions
            .iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect();
        let total_pages = u32::try_from(state.transactions.len().div_ceil(per_page)).unwrap();

        Ok(TransactionPage {
            transactions,
            total_pages: (!state.hide_total_pages).then_some(total_pages),
        })
    }

    async fn income_by_category(
        &self,
        _ctx: &RequestContext,
        _top_n: usize,
        _range: Option<DateRange>,
    ) -> ClientResult<Vec<IncomeCategoryTotal>> {
        let state = self.state();
        if state.fail_aggregation {
            return Err(ClientError::Status {
                status: 404,
                message: "Not Found".into(),
            });
        }
        Ok(state.server_income.clone())
    }
}
