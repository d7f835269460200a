//! Transaction aggregation with a paginated fallback.

use std::collections::HashMap;

use dompet_core::analytics::{IncomeByCategory, IncomeCategoryTotal, Transaction, TransactionType};
use dompet_shared::config::AnalyticsConfig;
use dompet_shared::types::{CategoryId, PageRequest};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::backend::{BudgetBackend, DateRange};
use crate::context::RequestContext;
use crate::error::ClientResult;

/// Upper bound on pages walked for one aggregation.
const MAX_PAGES: u32 = 1_000;

/// Walks `/transactions` page by page until the last page.
async fn for_each_page<F>(
    backend: &dyn BudgetBackend,
    ctx: &RequestContext,
    range: Option<DateRange>,
    per_page: u32,
    mut visit: F,
) -> ClientResult<()>
where
    F: FnMut(&[Transaction]),
{
    let mut page = PageRequest::first(per_page.max(1));
    loop {
        let batch = backend.transactions(ctx, page, range).await?;
        visit(&batch.transactions);

        if page.is_last(batch.total_pages, batch.transactions.len()) {
            return Ok(());
        }
        if page.page >= MAX_PAGES {
            warn!(
                workspace_id = %ctx.workspace_id(),
                pages = page.page,
                "Stopped paging transactions at the page limit"
            );
            return Ok(());
        }
        page = page.next();
    }
}

/// Income per category name, largest first.
///
/// Uses the backend aggregation when it returns data. On error or an empty
/// result, derives the same figures from paginated transactions.
///
/// # Errors
///
/// Returns the transaction listing error if the fallback also fails.
pub async fn income_by_category(
    backend: &dyn BudgetBackend,
    ctx: &RequestContext,
    range: Option<DateRange>,
    options: &AnalyticsConfig,
) -> ClientResult<Vec<IncomeCategoryTotal>> {
    match backend.income_by_category(ctx, options.top_n, range).await {
        Ok(totals) if !totals.is_empty() => return Ok(totals),
        Ok(_) => debug!(
            workspace_id = %ctx.workspace_id(),
            "Server aggregation returned nothing, deriving from transactions"
        ),
        Err(e) => debug!(
            workspace_id = %ctx.workspace_id(),
            error = %e,
            "Server aggregation not available, deriving from transactions"
        ),
    }

    let mut income = IncomeByCategory::new();
    for_each_page(backend, ctx, range, options.per_page, |page| {
        income.add_page(page);
    })
    .await?;

    if income.is_empty() {
        debug!(workspace_id = %ctx.workspace_id(), "No income transactions in range");
    }
    Ok(income.finish(options.top_n))
}

/// Total expense per category over a range.
///
/// # Errors
///
/// Returns the transaction listing error.
pub async fn expense_by_category(
    backend: &dyn BudgetBackend,
    ctx: &RequestContext,
    range: DateRange,
    per_page: u32,
) -> ClientResult<HashMap<CategoryId, Decimal>> {
    let mut totals: HashMap<CategoryId, Decimal> = HashMap::new();
    for_each_page(backend, ctx, Some(range), per_page, |page| {
        for transaction in page {
            if transaction.transaction_type != TransactionType::Expense {
                continue;
            }
            if let Some(category) = &transaction.category {
                *totals.entry(category.id).or_default() += transaction.amount;
            }
        }
    })
    .await?;

    Ok(totals)
}
