//! Plain-text rendering for terminal output.

use dompet_core::access::{BudgetAction, Permission, Role};
use dompet_core::analytics::IncomeCategoryTotal;
use dompet_core::budget::{
    Allocation, AllocationTotals, BudgetPlan, RealizationItem, RealizationReport,
    RealizationStatus, allocation_percentage,
};
use dompet_shared::types::{WorkspaceId, round_rupiah};
use rust_decimal::Decimal;
use serde::Serialize;

/// Formats an amount as `Rp 1.500.000`.
pub fn rupiah(amount: Decimal) -> String {
    let whole = round_rupiah(amount).normalize();
    let digits = whole.abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if whole.is_sign_negative() && !whole.is_zero() {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

const fn status_label(status: RealizationStatus) -> &'static str {
    match status {
        RealizationStatus::Under => "under",
        RealizationStatus::Over => "OVER",
        RealizationStatus::OnTrack => "on track",
        RealizationStatus::Unbudgeted => "UNBUDGETED",
    }
}

fn category_label(name: Option<&str>, id: impl std::fmt::Display) -> String {
    name.map_or_else(|| format!("#{id}"), ToString::to_string)
}

pub fn plans(plans: &[BudgetPlan]) -> String {
    if plans.is_empty() {
        return "No budget plans.".to_string();
    }
    plans
        .iter()
        .map(|plan| {
            format!(
                "{:>5}  {:<24} {} .. {}  {:<6} {:>18}",
                plan.id,
                plan.name,
                plan.period_start,
                plan.period_end,
                format!("{:?}", plan.status).to_uppercase(),
                rupiah(plan.actual_income.unwrap_or(plan.income_amount)),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn allocations(allocations: &[Allocation], income: Decimal, totals: AllocationTotals) -> String {
    let mut lines = Vec::new();
    for allocation in allocations {
        let name = match allocation {
            Allocation::Standalone(line) => line.category_name.as_deref(),
            Allocation::Parent(parent) => parent.category_name.as_deref(),
        };
        lines.push(format!(
            "{:<28} {:>18} {:>7}%",
            category_label(name, allocation.category_id()),
            rupiah(allocation.planned_amount()),
            allocation_percentage(allocation, income),
        ));
        for child in allocation.children() {
            lines.push(format!(
                "  - {:<24} {:>18}",
                category_label(child.category_name.as_deref(), child.category_id),
                rupiah(child.allocated_amount),
            ));
        }
    }
    lines.push(String::new());
    lines.push(format!("Income:    {:>18}", rupiah(income)));
    lines.push(format!("Allocated: {:>18}", rupiah(totals.total_allocated)));
    lines.push(format!("Remaining: {:>18}", rupiah(totals.remaining)));
    lines.join("\n")
}

fn realization_line(item: &RealizationItem, indent: &str) -> String {
    format!(
        "{indent}{:<26} {:>16} {:>16} {:>8}%  {}",
        category_label(item.category_name.as_deref(), item.category_id),
        rupiah(item.allocated_amount),
        rupiah(item.actual_spent),
        item.variance_percentage,
        status_label(item.status),
    )
}

pub fn realization(report: &RealizationReport) -> String {
    let header = &report.budget_plan;
    let mut lines = vec![
        format!(
            "{} ({} .. {}), income {}",
            header.name,
            header.period_start,
            header.period_end,
            rupiah(header.income_amount)
        ),
        String::new(),
    ];
    for item in &report.realization {
        lines.push(realization_line(item, ""));
        for child in &item.children {
            lines.push(realization_line(child, "  - "));
        }
    }

    let summary = &report.summary;
    lines.push(String::new());
    lines.push(format!("Budgeted:  {:>18}", rupiah(summary.total_budgeted)));
    lines.push(format!("Spent:     {:>18}", rupiah(summary.total_spent)));
    lines.push(format!(
        "Variance:  {:>18} ({}%)",
        rupiah(summary.total_variance),
        summary.total_variance_percentage
    ));
    lines.push(format!("Remaining: {:>18}", rupiah(summary.remaining)));
    lines.join("\n")
}

pub fn income_by_category(totals: &[IncomeCategoryTotal]) -> String {
    if totals.is_empty() {
        return "No income in this period.".to_string();
    }
    totals
        .iter()
        .map(|entry| format!("{:<28} {:>18}", entry.category_name, rupiah(entry.total)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// What the configured role may do in the workspace.
#[derive(Debug, Serialize)]
pub struct AccessSummary {
    workspace_id: WorkspaceId,
    role: Option<Role>,
    can_manage_members: bool,
    budget: Vec<(BudgetAction, bool)>,
    permissions: Vec<(Permission, bool)>,
}

impl AccessSummary {
    pub fn new(workspace_id: WorkspaceId, role: Option<Role>) -> Self {
        Self {
            workspace_id,
            role,
            can_manage_members: role.is_some_and(|r| r.can_manage_members()),
            budget: role.map_or_else(Vec::new, |r| {
                BudgetAction::ALL
                    .iter()
                    .map(|action| (*action, r.can_budget(*action)))
                    .collect()
            }),
            permissions: role.map_or_else(Vec::new, |r| r.permissions()),
        }
    }
}

const fn mark(allowed: bool) -> &'static str {
    if allowed { "[x]" } else { "[ ]" }
}

pub fn access(summary: &AccessSummary) -> String {
    let Some(role) = summary.role else {
        return format!(
            "Workspace {}, no role configured; the backend checks every action.",
            summary.workspace_id
        );
    };

    let mut lines = vec![
        format!("Workspace {}, role {role}", summary.workspace_id),
        format!(
            "Manage members: {}",
            if summary.can_manage_members { "yes" } else { "no" }
        ),
        String::new(),
    ];
    for (action, allowed) in &summary.budget {
        lines.push(format!("{} {action}", mark(*allowed)));
    }
    lines.push(String::new());
    for (permission, allowed) in &summary.permissions {
        lines.push(format!("{} {}", mark(*allowed), permission.as_str()));
    }
    lines.join("\n")
}
