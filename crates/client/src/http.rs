//! reqwest implementation of [`BudgetBackend`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use dompet_core::analytics::{IncomeCategoryTotal, TransactionPage};
use dompet_core::budget::{Allocation, BudgetPlan, BudgetPlanInput, Category, RealizationReport};
use dompet_shared::config::ApiConfig;
use dompet_shared::types::{BudgetPlanId, PageRequest, WorkspaceId};
use reqwest::{Client, Method, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::{ActivatedPlan, BudgetBackend, CreatedPlan, DateRange};
use crate::context::RequestContext;
use crate::error::{ClientError, ClientResult};

/// HTTP client for the budget backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct PlansEnvelope {
    #[serde(default)]
    budget_plans: Vec<BudgetPlan>,
}

#[derive(Deserialize)]
struct IncomeEnvelope {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    income_amount: Option<Decimal>,
}

#[derive(Deserialize)]
struct RecommendationsEnvelope {
    #[serde(default)]
    recommendations: Vec<Allocation>,
}

#[derive(Deserialize)]
struct CategoriesEnvelope {
    #[serde(default)]
    categories: Vec<Category>,
}

#[derive(Deserialize)]
struct IncomeByCategoryEnvelope {
    #[serde(default)]
    income_by_category: Vec<IncomeCategoryTotal>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Serialize)]
struct PlanPayload<'a> {
    #[serde(flatten)]
    input: &'a BudgetPlanInput,
    workspace_id: WorkspaceId,
}

#[derive(Serialize)]
struct RecommendationRequest {
    workspace_id: WorkspaceId,
    #[serde(with = "rust_decimal::serde::float")]
    income_amount: Decimal,
    period_start: NaiveDate,
    period_end: NaiveDate,
}

impl HttpBackend {
    /// Creates a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` for an empty base URL and
    /// `ClientError::Http` if the TLS backend cannot be initialized.
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Config("api.base_url is not set".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .gzip(true)
            .build()?;

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, ctx: &RequestContext, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, self.url(path));
        match ctx.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
        let bytes = Self::checked(request).await?.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn send_empty(request: RequestBuilder) -> ClientResult<()> {
        Self::checked(request).await.map(drop)
    }

    async fn checked(request: RequestBuilder) -> ClientResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
        debug!(status = status.as_u16(), %message, "Backend request failed");

        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

/// Extracts `{"error": ...}` or `{"message": ...}` from an error body.
fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.error.or(parsed.message).filter(|m| !m.is_empty())
}

fn workspace_query(ctx: &RequestContext) -> [(&'static str, String); 1] {
    [("workspace_id", ctx.workspace_id().to_string())]
}

fn range_query(range: Option<DateRange>) -> Vec<(&'static str, String)> {
    range
        .map(|r| {
            vec![
                ("start_date", r.start.to_string()),
                ("end_date", r.end.to_string()),
            ]
        })
        .unwrap_or_default()
}

#[async_trait]
impl BudgetBackend for HttpBackend {
    async fn list_plans(&self, ctx: &RequestContext) -> ClientResult<Vec<BudgetPlan>> {
        let request = self
            .request(ctx, Method::GET, "budget/plans")
            .query(&workspace_query(ctx));
        let envelope: PlansEnvelope = Self::send(request).await?;
        Ok(envelope.budget_plans)
    }

    async fn create_plan(
        &self,
        ctx: &RequestContext,
        input: &BudgetPlanInput,
    ) -> ClientResult<CreatedPlan> {
        let request = self
            .request(ctx, Method::POST, "budget/plans")
            .json(&PlanPayload {
                input,
                workspace_id: ctx.workspace_id(),
            });
        Self::send(request).await
    }

    async fn update_plan(
        &self,
        ctx: &RequestContext,
        id: BudgetPlanId,
        input: &BudgetPlanInput,
    ) -> ClientResult<()> {
        let request = self
            .request(ctx, Method::PUT, &format!("budget/plans/{id}"))
            .json(&PlanPayload {
                input,
                workspace_id: ctx.workspace_id(),
            });
        Self::send_empty(request).await
    }

    async fn delete_plan(&self, ctx: &RequestContext, id: BudgetPlanId) -> ClientResult<()> {
        let request = self
            .request(ctx, Method::DELETE, &format!("budget/plans/{id}"))
            .query(&workspace_query(ctx));
        Self::send_empty(request).await
    }

    async fn activate_plan(
        &self,
        ctx: &RequestContext,
        id: BudgetPlanId,
    ) -> ClientResult<ActivatedPlan> {
        let request = self
            .request(ctx, Method::POST, &format!("budget/plans/{id}/activate"))
            .query(&workspace_query(ctx));
        Self::send(request).await
    }

    async fn calculate_income(
        &self,
        ctx: &RequestContext,
        period: DateRange,
    ) -> ClientResult<Decimal> {
        let request = self
            .request(ctx, Method::GET, "budget/calculate-income")
            .query(&workspace_query(ctx))
            .query(&[
                ("period_start", period.start.to_string()),
                ("period_end", period.end.to_string()),
            ]);
        let envelope: IncomeEnvelope = Self::send(request).await?;
        Ok(envelope.income_amount.unwrap_or(Decimal::ZERO))
    }

    async fn recommendations(
        &self,
        ctx: &RequestContext,
        income: Decimal,
        period: DateRange,
    ) -> ClientResult<Vec<Allocation>> {
        let request = self
            .request(ctx, Method::POST, "budget/recommendations")
            .json(&RecommendationRequest {
                workspace_id: ctx.workspace_id(),
                income_amount: income,
                period_start: period.start,
                period_end: period.end,
            });
        let envelope: RecommendationsEnvelope = Self::send(request).await?;
        Ok(envelope.recommendations)
    }

    async fn realization(
        &self,
        ctx: &RequestContext,
        id: BudgetPlanId,
    ) -> ClientResult<RealizationReport> {
        let request = self
            .request(ctx, Method::GET, &format!("budget/plans/{id}/realization"))
            .query(&workspace_query(ctx));
        Self::send(request).await
    }

    async fn categories(&self, ctx: &RequestContext) -> ClientResult<Vec<Category>> {
        let request = self
            .request(ctx, Method::GET, "categories")
            .query(&workspace_query(ctx));
        let envelope: CategoriesEnvelope = Self::send(request).await?;
        Ok(envelope.categories)
    }

    async fn transactions(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
        range: Option<DateRange>,
    ) -> ClientResult<TransactionPage> {
        let request = self
            .request(ctx, Method::GET, "transactions")
            .query(&workspace_query(ctx))
            .query(&page)
            .query(&range_query(range));
        Self::send(request).await
    }

    async fn income_by_category(
        &self,
        ctx: &RequestContext,
        top_n: usize,
        range: Option<DateRange>,
    ) -> ClientResult<Vec<IncomeCategoryTotal>> {
        let request = self
            .request(ctx, Method::GET, "analytics/income-by-category")
            .query(&workspace_query(ctx))
            .query(&[("top_n", top_n)])
            .query(&range_query(range));
        let envelope: IncomeByCategoryEnvelope = Self::send(request).await?;
        Ok(envelope.income_by_category)
    }
}
