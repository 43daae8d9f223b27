use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::expense::ExpenseCategory;
use super::goal::GoalCategory;

/// Reporting window for expense statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    /// The last 7 days
    Week,
    /// Since the first of the current month
    Month,
    /// Since January 1st of the current year
    Year,
}

impl std::fmt::Display for StatsPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsPeriod::Week => write!(f, "week"),
            StatsPeriod::Month => write!(f, "month"),
            StatsPeriod::Year => write!(f, "year"),
        }
    }
}

// ── Portfolio ───────────────────────────────────────────────────────

/// One position's contribution to the performer rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    pub symbol: String,
    pub company_name: String,
    pub profit_loss: f64,
    pub profit_loss_percentage: f64,
    pub current_value: f64,
}

/// Per-sector aggregate within the portfolio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorStat {
    pub count: usize,
    pub invested: f64,
    pub current_value: f64,
}

/// Snapshot of the whole portfolio (positions with units held only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub total_positions: usize,
    pub total_invested: f64,
    pub current_value: f64,
    pub total_profit_loss: f64,
    /// Zero when nothing is invested
    pub total_profit_loss_percentage: f64,
    pub sector_breakdown: HashMap<String, SectorStat>,
    /// Gainers, best first, at most 5
    pub top_performers: Vec<PerformanceEntry>,
    /// Losers, worst first, at most 5
    pub worst_performers: Vec<PerformanceEntry>,
}

// ── Goals ───────────────────────────────────────────────────────────

/// Per-category aggregate across a user's goals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalCategoryStat {
    pub count: usize,
    pub total_target: f64,
    pub total_current: f64,
}

/// Snapshot across all of a user's goals, whatever their status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub paused: usize,
    pub total_target_amount: f64,
    pub total_current_amount: f64,
    pub total_remaining_amount: f64,
    /// Mean progress percentage; zero with no goals
    pub average_progress: f64,
    pub category_breakdown: HashMap<GoalCategory, GoalCategoryStat>,
}

// ── Expenses ────────────────────────────────────────────────────────

/// Per-category aggregate within the reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: ExpenseCategory,
    pub total_amount: f64,
    pub count: usize,
    pub avg_amount: f64,
}

/// One month's total in the spending trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrendPoint {
    pub year: i32,
    pub month: u32,
    pub total_amount: f64,
    pub count: usize,
}

/// Spending summary for a reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseStats {
    pub period: StatsPeriod,
    /// Sorted by total, largest first
    pub category_stats: Vec<CategoryStat>,
    pub total: f64,
    pub count: usize,
    /// The last 6 calendar months, oldest first
    pub monthly_trend: Vec<MonthlyTrendPoint>,
}
