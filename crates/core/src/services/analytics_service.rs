use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use crate::models::budget::{BudgetAllocation, BudgetBucket, BudgetUsage};
use crate::models::expense::{Expense, ExpenseCategory};
use crate::models::goal::{Goal, GoalStatus};
use crate::models::holding::Holding;
use crate::models::stats::{
    CategoryStat, ExpenseStats, GoalCategoryStat, GoalStats, MonthlyTrendPoint, PerformanceEntry,
    PortfolioStats, SectorStat, StatsPeriod,
};

/// Number of positions listed in each performer ranking.
const PERFORMER_LIMIT: usize = 5;

/// Number of calendar months covered by the expense trend.
const TREND_MONTHS: u32 = 6;

/// Computes read-only statistics over a user's holdings, goals, and
/// expenses. Pure aggregation — no I/O, no mutation.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    // ── Portfolio ───────────────────────────────────────────────────

    /// Aggregate statistics over positions with units held. Watchlist-only
    /// entries (zero quantity) are excluded.
    pub fn portfolio_stats(&self, holdings: &[Holding]) -> PortfolioStats {
        let mut stats = PortfolioStats {
            total_positions: 0,
            total_invested: 0.0,
            current_value: 0.0,
            total_profit_loss: 0.0,
            total_profit_loss_percentage: 0.0,
            sector_breakdown: HashMap::new(),
            top_performers: Vec::new(),
            worst_performers: Vec::new(),
        };

        for holding in holdings.iter().filter(|h| h.quantity > 0.0) {
            let invested = holding.total_invested();
            let current = holding.current_value();
            let profit_loss = holding.profit_loss();
            let profit_loss_percentage = holding.profit_loss_percentage();

            stats.total_positions += 1;
            stats.total_invested += invested;
            stats.current_value += current;
            stats.total_profit_loss += profit_loss;

            if let Some(sector) = &holding.sector {
                let entry: &mut SectorStat =
                    stats.sector_breakdown.entry(sector.clone()).or_default();
                entry.count += 1;
                entry.invested += invested;
                entry.current_value += current;
            }

            let performance = PerformanceEntry {
                symbol: holding.symbol.clone(),
                company_name: holding.company_name.clone(),
                profit_loss,
                profit_loss_percentage,
                current_value: current,
            };

            if profit_loss_percentage > 0.0 {
                stats.top_performers.push(performance);
            } else if profit_loss_percentage < 0.0 {
                stats.worst_performers.push(performance);
            }
        }

        if stats.total_invested > 0.0 {
            stats.total_profit_loss_percentage =
                stats.total_profit_loss / stats.total_invested * 100.0;
        }

        stats.top_performers.sort_by(|a, b| {
            b.profit_loss_percentage
                .partial_cmp(&a.profit_loss_percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        stats.worst_performers.sort_by(|a, b| {
            a.profit_loss_percentage
                .partial_cmp(&b.profit_loss_percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        stats.top_performers.truncate(PERFORMER_LIMIT);
        stats.worst_performers.truncate(PERFORMER_LIMIT);

        stats
    }

    // ── Goals ───────────────────────────────────────────────────────

    /// Aggregate statistics across all of a user's goals.
    pub fn goal_stats(&self, goals: &[Goal]) -> GoalStats {
        let mut stats = GoalStats {
            total: goals.len(),
            active: 0,
            completed: 0,
            paused: 0,
            total_target_amount: 0.0,
            total_current_amount: 0.0,
            total_remaining_amount: 0.0,
            average_progress: 0.0,
            category_breakdown: HashMap::new(),
        };

        let mut progress_sum = 0.0;

        for goal in goals {
            match goal.status {
                GoalStatus::Active => stats.active += 1,
                GoalStatus::Completed => stats.completed += 1,
                GoalStatus::Paused => stats.paused += 1,
                GoalStatus::Cancelled => {}
            }

            stats.total_target_amount += goal.target_amount;
            stats.total_current_amount += goal.current_amount;
            stats.total_remaining_amount += goal.remaining_amount();
            progress_sum += goal.progress_percentage();

            let entry: &mut GoalCategoryStat =
                stats.category_breakdown.entry(goal.category).or_default();
            entry.count += 1;
            entry.total_target += goal.target_amount;
            entry.total_current += goal.current_amount;
        }

        if !goals.is_empty() {
            stats.average_progress = progress_sum / goals.len() as f64;
        }

        stats
    }

    // ── Expenses ────────────────────────────────────────────────────

    /// Spending summary over a reporting window ending at `now`: per-category
    /// aggregates, overall totals, and a trend over the trailing calendar
    /// months (the trend window is fixed, independent of `period`).
    pub fn expense_stats(
        &self,
        expenses: &[Expense],
        period: StatsPeriod,
        now: DateTime<Utc>,
    ) -> ExpenseStats {
        let window_start = Self::period_start(period, now);

        let mut by_category: HashMap<ExpenseCategory, (f64, usize)> = HashMap::new();
        let mut total = 0.0;
        let mut count = 0;

        for expense in expenses {
            if expense.date < window_start || expense.date > now {
                continue;
            }
            let entry = by_category.entry(expense.category).or_insert((0.0, 0));
            entry.0 += expense.amount;
            entry.1 += 1;
            total += expense.amount;
            count += 1;
        }

        let mut category_stats: Vec<CategoryStat> = by_category
            .into_iter()
            .map(|(category, (total_amount, count))| CategoryStat {
                category,
                total_amount,
                count,
                avg_amount: total_amount / count as f64,
            })
            .collect();
        // Largest spend first; tie-break on the category name so the
        // ordering is deterministic.
        category_stats.sort_by(|a, b| {
            b.total_amount
                .partial_cmp(&a.total_amount)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.category.to_string().cmp(&b.category.to_string()))
        });

        ExpenseStats {
            period,
            category_stats,
            total,
            count,
            monthly_trend: Self::monthly_trend(expenses, now),
        }
    }

    /// Measure the current calendar month's spending against a budget
    /// allocation. Categories roll up into buckets through the
    /// [`ExpenseCategory::budget_bucket`] translation table.
    pub fn budget_usage(
        &self,
        expenses: &[Expense],
        allocation: BudgetAllocation,
        now: DateTime<Utc>,
    ) -> BudgetUsage {
        let month_start = Self::month_start(now.year(), now.month(), now);

        let mut usage = BudgetUsage {
            allocation,
            spent_needs: 0.0,
            spent_wants: 0.0,
            spent_savings: 0.0,
        };
        for expense in expenses {
            if expense.date < month_start || expense.date > now {
                continue;
            }
            match expense.category.budget_bucket() {
                BudgetBucket::Needs => usage.spent_needs += expense.amount,
                BudgetBucket::Wants => usage.spent_wants += expense.amount,
                BudgetBucket::Savings => usage.spent_savings += expense.amount,
            }
        }
        usage
    }

    /// Start of the reporting window for a period ending at `now`.
    fn period_start(period: StatsPeriod, now: DateTime<Utc>) -> DateTime<Utc> {
        match period {
            StatsPeriod::Week => now - Duration::days(7),
            StatsPeriod::Month => Self::month_start(now.year(), now.month(), now),
            StatsPeriod::Year => Self::month_start(now.year(), 1, now),
        }
    }

    /// Totals per calendar month over the trailing trend window, oldest
    /// first. Months without expenses produce no point.
    fn monthly_trend(expenses: &[Expense], now: DateTime<Utc>) -> Vec<MonthlyTrendPoint> {
        // First day of the month (TREND_MONTHS - 1) months before this one.
        let mut year = now.year();
        let mut month = now.month() as i32 - (TREND_MONTHS as i32 - 1);
        if month < 1 {
            month += 12;
            year -= 1;
        }
        let trend_start = Self::month_start(year, month as u32, now);

        let mut by_month: HashMap<(i32, u32), (f64, usize)> = HashMap::new();
        for expense in expenses {
            if expense.date < trend_start || expense.date > now {
                continue;
            }
            let key = (expense.date.year(), expense.date.month());
            let entry = by_month.entry(key).or_insert((0.0, 0));
            entry.0 += expense.amount;
            entry.1 += 1;
        }

        let mut trend: Vec<MonthlyTrendPoint> = by_month
            .into_iter()
            .map(|((year, month), (total_amount, count))| MonthlyTrendPoint {
                year,
                month,
                total_amount,
                count,
            })
            .collect();
        trend.sort_by_key(|p| (p.year, p.month));
        trend
    }

    /// Midnight UTC on the first of the given month. `fallback` guards the
    /// (unreachable) invalid-date path so this module stays panic-free.
    fn month_start(year: i32, month: u32, fallback: DateTime<Utc>) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
            .single()
            .unwrap_or(fallback)
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
