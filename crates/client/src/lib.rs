//! Dompet backend client.
//!
//! This crate talks to the REST backend and hosts the budget editing
//! session. All domain rules come from `dompet-core`; this crate only moves
//! data between the backend and those rules.
//!
//! # Modules
//!
//! - `backend` - `BudgetBackend` trait and wire types
//! - `http` - reqwest implementation of the backend
//! - `planner` - `BudgetPlanner` editing session
//! - `analytics` - income by category with a paginated fallback

pub mod analytics;
pub mod backend;
pub mod context;
pub mod error;
pub mod http;
pub mod planner;

#[cfg(test)]
mod fake;

pub use backend::{ActivatedPlan, BudgetBackend, CreatedPlan, DateRange};
pub use context::RequestContext;
pub use error::{ClientError, ClientResult};
pub use http::HttpBackend;
pub use planner::{BudgetPlanner, PlanForm, RecommendationSource, local_today};
