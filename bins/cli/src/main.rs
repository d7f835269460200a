//! Dompet command line client
//!
//! Budget planning against the Dompet backend from a terminal.

mod output;

use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dompet_client::analytics::income_by_category;
use dompet_client::{
    BudgetBackend, BudgetPlanner, ClientError, DateRange, HttpBackend, RequestContext,
    local_today,
};
use dompet_core::budget::BudgetPlan;
use dompet_shared::{AppConfig, AppError};
use dompet_shared::types::BudgetPlanId;

#[derive(Parser, Debug)]
#[command(name = "dompet", version, about = "Family budget planning from the command line")]
struct Cli {
    /// Workspace to operate in (overrides the configured one)
    #[arg(short, long, global = true)]
    workspace: Option<i64>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the workspace and what the configured role may do
    Whoami,
    /// List budget plans
    Plans,
    /// Income from INCOME transactions in a period
    Income {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
    },
    /// Recommend allocations for a period (next month by default)
    Recommend {
        /// First day (YYYY-MM-DD)
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,
        /// Last day (YYYY-MM-DD)
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
        /// Save the recommendation as a draft plan with this name
        #[arg(long)]
        save: Option<String>,
    },
    /// Planned vs actual spend for a plan
    Realization {
        /// Plan ID
        plan_id: i64,
    },
    /// Activate a draft plan, freezing its income
    Activate {
        /// Plan ID
        plan_id: i64,
    },
    /// Delete a plan and its allocations
    Delete {
        /// Plan ID
        plan_id: i64,
    },
    /// Income totals per category
    IncomeByCategory {
        /// First day (YYYY-MM-DD)
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,
        /// Last day (YYYY-MM-DD)
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
        /// Categories to list before folding the rest into one bucket
        #[arg(long)]
        top_n: Option<usize>,
    },
}

fn emit<T: serde::Serialize>(
    json: bool,
    value: &T,
    text: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

async fn find_plan(
    backend: &dyn BudgetBackend,
    ctx: &RequestContext,
    plan_id: i64,
) -> anyhow::Result<BudgetPlan> {
    let id = BudgetPlanId::new(plan_id);
    backend
        .list_plans(ctx)
        .await?
        .into_iter()
        .find(|plan| plan.id == id)
        .with_context(|| format!("Budget plan {id} not found"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dompet=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Backend failures are reported with their error code
    run(cli).await.map_err(|err| match err.downcast::<ClientError>() {
        Ok(client) => {
            let app = AppError::from(client);
            anyhow::anyhow!("[{}] {app}", app.error_code())
        }
        Err(other) => other,
    })
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load configuration
    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(workspace) = cli.workspace {
        config.session.workspace_id = Some(workspace);
    }

    let ctx = RequestContext::from_config(&config.session)?;
    let backend: Arc<dyn BudgetBackend> = Arc::new(HttpBackend::new(&config.api)?);
    info!(
        base_url = %config.api.base_url,
        workspace_id = %ctx.workspace_id(),
        "Backend configured"
    );

    match cli.command {
        Command::Whoami => {
            let summary = output::AccessSummary::new(ctx.workspace_id(), ctx.role());
            emit(cli.json, &summary, || output::access(&summary))?;
        }
        Command::Plans => {
            let plans = backend.list_plans(&ctx).await?;
            emit(cli.json, &plans, || output::plans(&plans))?;
        }
        Command::Income { start, end } => {
            if start > end {
                bail!("Period start {start} is after period end {end}");
            }
            let income = backend
                .calculate_income(&ctx, DateRange::new(start, end))
                .await?;
            emit(cli.json, &income, || output::rupiah(income))?;
        }
        Command::Recommend { start, end, save } => {
            let mut planner = BudgetPlanner::open_new(backend.clone(), ctx, local_today()).await;
            if let Some((start, end)) = start.zip(end) {
                planner.set_period_end(end).await;
                planner.set_period_start(start).await;
            }

            let source = planner.request_recommendations().await?;
            info!(?source, "Recommendations loaded");

            let form = planner.form();
            let totals = planner.totals();
            emit(cli.json, &form.allocations, || {
                output::allocations(&form.allocations, form.income, totals)
            })?;

            if let Some(name) = save {
                planner.set_name(name);
                let id = planner.submit().await?;
                eprintln!("Saved draft plan {id}");
            }
        }
        Command::Realization { plan_id } => {
            let report = backend
                .realization(&ctx, BudgetPlanId::new(plan_id))
                .await?;
            emit(cli.json, &report, || output::realization(&report))?;
        }
        Command::Activate { plan_id } => {
            let plan = find_plan(backend.as_ref(), &ctx, plan_id).await?;
            let mut planner = BudgetPlanner::open_existing(backend.clone(), ctx, plan);
            planner.activate().await?;
            eprintln!(
                "Activated plan {plan_id}, income frozen at {}",
                output::rupiah(planner.form().income)
            );
        }
        Command::Delete { plan_id } => {
            let plan = find_plan(backend.as_ref(), &ctx, plan_id).await?;
            let planner = BudgetPlanner::open_existing(backend.clone(), ctx, plan);
            planner.delete().await?;
            eprintln!("Deleted plan {plan_id}");
        }
        Command::IncomeByCategory { start, end, top_n } => {
            let range = start.zip(end).map(|(start, end)| DateRange::new(start, end));
            let mut options = config.analytics.clone();
            if let Some(top_n) = top_n {
                options.top_n = top_n;
            }
            let totals = income_by_category(backend.as_ref(), &ctx, range, &options).await?;
            emit(cli.json, &totals, || output::income_by_category(&totals))?;
        }
    }

    Ok(())
}
