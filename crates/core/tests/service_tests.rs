// ═══════════════════════════════════════════════════════════════════
// Service Tests — BudgetService, LedgerService, AlertEvaluator,
// GoalService, AnalyticsService, RecommendationService, QuoteService
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use fintrack_core::errors::CoreError;
use fintrack_core::models::budget::{BudgetRule, CustomBudget};
use fintrack_core::models::expense::{Expense, ExpenseCategory, NewExpense};
use fintrack_core::models::goal::{Goal, GoalCategory, GoalPriority, GoalStatus, Milestone};
use fintrack_core::models::holding::{
    Alert, AlertKind, Holding, MarketCap, Transaction, TransactionKind,
};
use fintrack_core::models::recommendation::{Quote, RiskCategory, StockCandidate};
use fintrack_core::models::stats::StatsPeriod;
use fintrack_core::providers::catalog::StaticCatalog;
use fintrack_core::providers::registry::QuoteProviderRegistry;
use fintrack_core::providers::traits::QuoteProvider;
use fintrack_core::services::alert_service::AlertEvaluator;
use fintrack_core::services::analytics_service::AnalyticsService;
use fintrack_core::services::budget_service::BudgetService;
use fintrack_core::services::goal_service::GoalService;
use fintrack_core::services::ledger_service::LedgerService;
use fintrack_core::services::quote_service::QuoteService;
use fintrack_core::services::recommendation_service::RecommendationService;

const EPS: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

// ═══════════════════════════════════════════════════════════════════
// Mock Quote Providers
// ═══════════════════════════════════════════════════════════════════

struct MockQuoteProvider {
    quotes: HashMap<String, Quote>,
}

impl MockQuoteProvider {
    fn new() -> Self {
        let mut quotes = HashMap::new();
        quotes.insert(
            "AAPL".to_string(),
            Quote {
                price: 190.0,
                change: 2.0,
                change_percent: 1.06,
            },
        );
        quotes.insert(
            "MSFT".to_string(),
            Quote {
                price: 350.0,
                change: -3.5,
                change_percent: -0.99,
            },
        );
        Self { quotes }
    }

    fn with_quote(symbol: &str, quote: Quote) -> Self {
        let mut quotes = HashMap::new();
        quotes.insert(symbol.to_uppercase(), quote);
        Self { quotes }
    }
}

#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    fn name(&self) -> &str {
        "MockProvider"
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        self.quotes
            .get(&symbol.to_uppercase())
            .copied()
            .ok_or_else(|| CoreError::QuoteNotAvailable {
                symbol: symbol.to_uppercase(),
            })
    }
}

/// A mock that always fails (for testing fallback behavior).
struct FailingQuoteProvider;

#[async_trait]
impl QuoteProvider for FailingQuoteProvider {
    fn name(&self) -> &str {
        "FailingMock"
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        Err(CoreError::Api {
            provider: "FailingMock".into(),
            message: format!("always down ({symbol})"),
        })
    }
}

/// A mock that returns garbage prices (for testing price validation).
struct GarbageQuoteProvider;

#[async_trait]
impl QuoteProvider for GarbageQuoteProvider {
    fn name(&self) -> &str {
        "GarbageMock"
    }

    async fn get_quote(&self, _symbol: &str) -> Result<Quote, CoreError> {
        Ok(Quote {
            price: f64::NAN,
            change: 0.0,
            change_percent: 0.0,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════
// BudgetService
// ═══════════════════════════════════════════════════════════════════

mod budget_allocator {
    use super::*;

    #[test]
    fn fifty_thirty_twenty() {
        let alloc = BudgetService::new().allocate(50_000.0, BudgetRule::FiftyThirtyTwenty, None);
        assert_close(alloc.needs, 25_000.0);
        assert_close(alloc.wants, 15_000.0);
        assert_close(alloc.savings, 10_000.0);
    }

    #[test]
    fn sixty_twenty_twenty() {
        let alloc = BudgetService::new().allocate(50_000.0, BudgetRule::SixtyTwentyTwenty, None);
        assert_close(alloc.needs, 30_000.0);
        assert_close(alloc.wants, 10_000.0);
        assert_close(alloc.savings, 10_000.0);
    }

    #[test]
    fn custom_percentages() {
        let custom = CustomBudget {
            needs: 40.0,
            wants: 35.0,
            savings: 25.0,
        };
        let alloc = BudgetService::new().allocate(2000.0, BudgetRule::Custom, Some(&custom));
        assert_close(alloc.needs, 800.0);
        assert_close(alloc.wants, 700.0);
        assert_close(alloc.savings, 500.0);
    }

    #[test]
    fn custom_without_percentages_yields_zeros() {
        // Incomplete configuration signals "not set up yet", not an error.
        let alloc = BudgetService::new().allocate(2000.0, BudgetRule::Custom, None);
        assert_close(alloc.needs, 0.0);
        assert_close(alloc.wants, 0.0);
        assert_close(alloc.savings, 0.0);
    }

    #[test]
    fn named_rules_sum_to_income() {
        let service = BudgetService::new();
        for income in [0.0, 1.0, 999.99, 50_000.0, 123_456.78] {
            for rule in [BudgetRule::FiftyThirtyTwenty, BudgetRule::SixtyTwentyTwenty] {
                let alloc = service.allocate(income, rule, None);
                assert_close(alloc.total(), income);
            }
        }
    }

    #[test]
    fn zero_income_allocates_zero() {
        let alloc = BudgetService::new().allocate(0.0, BudgetRule::FiftyThirtyTwenty, None);
        assert_close(alloc.total(), 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// LedgerService
// ═══════════════════════════════════════════════════════════════════

mod ledger {
    use super::*;

    fn empty_holding() -> Holding {
        Holding::new(Uuid::new_v4(), "TEST", "Test Corp")
    }

    fn buy(quantity: f64, price: f64) -> Transaction {
        Transaction::new(TransactionKind::Buy, quantity, price, 0.0)
    }

    fn sell(quantity: f64, price: f64) -> Transaction {
        Transaction::new(TransactionKind::Sell, quantity, price, 0.0)
    }

    #[test]
    fn single_buy() {
        let ledger = LedgerService::new();
        let mut h = empty_holding();
        ledger.add_transaction(&mut h, buy(10.0, 100.0)).unwrap();
        assert_close(h.quantity, 10.0);
        assert_close(h.average_cost, 100.0);
    }

    #[test]
    fn two_buys_average_cost() {
        let ledger = LedgerService::new();
        let mut h = empty_holding();
        ledger.add_transaction(&mut h, buy(10.0, 100.0)).unwrap();
        ledger.add_transaction(&mut h, buy(10.0, 200.0)).unwrap();
        assert_close(h.quantity, 20.0);
        assert_close(h.average_cost, 150.0);
    }

    #[test]
    fn sell_depletes_proportionally() {
        // buy 10@100, buy 10@200, sell 5@250:
        // investment 3000, sell ratio 5/20 → investment 2250, quantity 15.
        // The depletion preserves the average: 2250 / 15 = 150.
        let ledger = LedgerService::new();
        let mut h = empty_holding();
        ledger.add_transaction(&mut h, buy(10.0, 100.0)).unwrap();
        ledger.add_transaction(&mut h, buy(10.0, 200.0)).unwrap();
        ledger.add_transaction(&mut h, sell(5.0, 250.0)).unwrap();
        assert_close(h.quantity, 15.0);
        assert_close(h.average_cost, 150.0);
        assert_close(h.total_invested(), 2250.0);
    }

    #[test]
    fn fees_are_part_of_the_cost_basis() {
        let ledger = LedgerService::new();
        let mut h = empty_holding();
        ledger
            .add_transaction(
                &mut h,
                Transaction::new(TransactionKind::Buy, 10.0, 100.0, 5.0),
            )
            .unwrap();
        assert_close(h.average_cost, 100.5);
    }

    #[test]
    fn selling_everything_returns_to_flat() {
        let ledger = LedgerService::new();
        let mut h = empty_holding();
        ledger.add_transaction(&mut h, buy(10.0, 100.0)).unwrap();
        ledger.add_transaction(&mut h, sell(10.0, 130.0)).unwrap();
        assert_close(h.quantity, 0.0);
        assert_close(h.average_cost, 0.0);
        assert_close(h.total_invested(), 0.0);
    }

    #[test]
    fn replay_is_deterministic() {
        let ledger = LedgerService::new();
        let mut h = empty_holding();
        ledger.add_transaction(&mut h, buy(10.0, 100.0)).unwrap();
        ledger.add_transaction(&mut h, buy(5.0, 120.0)).unwrap();
        ledger.add_transaction(&mut h, sell(3.0, 140.0)).unwrap();

        let (q1, a1) = (h.quantity, h.average_cost);
        ledger.recompute_averages(&mut h);
        assert_close(h.quantity, q1);
        assert_close(h.average_cost, a1);
        ledger.recompute_averages(&mut h);
        assert_close(h.quantity, q1);
        assert_close(h.average_cost, a1);
    }

    #[test]
    fn stored_state_always_matches_replay_from_empty() {
        let ledger = LedgerService::new();
        let mut h = empty_holding();
        let steps = [
            buy(10.0, 100.0),
            buy(10.0, 200.0),
            sell(5.0, 250.0),
            buy(2.0, 90.0),
            sell(10.0, 180.0),
        ];
        for tx in steps {
            ledger.add_transaction(&mut h, tx).unwrap();
            let (quantity, average_cost) = LedgerService::replay(&h.transactions);
            assert_close(h.quantity, quantity);
            assert_close(h.average_cost, average_cost);
        }
    }

    #[test]
    fn replay_depends_on_insertion_order() {
        // The depletion ratio is computed against the running pre-sell
        // quantity, so the same transactions in a different order give a
        // different cost basis. Insertion order is authoritative.
        let early_sell = [buy(10.0, 100.0), sell(5.0, 150.0), buy(10.0, 200.0)];
        let late_sell = [buy(10.0, 100.0), buy(10.0, 200.0), sell(5.0, 150.0)];

        let (q1, a1) = LedgerService::replay(&early_sell);
        let (q2, a2) = LedgerService::replay(&late_sell);

        assert_close(q1, 15.0);
        assert_close(q2, 15.0);
        // early sell: 1000 → 500 after selling half, + 2000 = 2500 / 15
        assert_close(a1, 2500.0 / 15.0);
        // late sell: 3000 − 25% = 2250 / 15
        assert_close(a2, 150.0);
        assert!((a1 - a2).abs() > EPS);
    }

    #[test]
    fn quantity_never_negative_for_valid_sequences() {
        let ledger = LedgerService::new();
        let mut h = empty_holding();
        ledger.add_transaction(&mut h, buy(8.0, 50.0)).unwrap();
        ledger.add_transaction(&mut h, sell(3.0, 60.0)).unwrap();
        ledger.add_transaction(&mut h, sell(5.0, 70.0)).unwrap();
        assert!(h.quantity >= 0.0);
        assert_close(h.quantity, 0.0);
    }

    #[test]
    fn sell_exceeding_position_is_rejected() {
        let ledger = LedgerService::new();
        let mut h = empty_holding();
        ledger.add_transaction(&mut h, buy(5.0, 100.0)).unwrap();

        let err = ledger
            .add_transaction(&mut h, sell(6.0, 100.0))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransaction(_)));
        // The rejected transaction must not have been appended.
        assert_eq!(h.transactions.len(), 1);
        assert_close(h.quantity, 5.0);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let ledger = LedgerService::new();
        let mut h = empty_holding();
        for tx in [
            buy(0.0, 100.0),
            buy(-1.0, 100.0),
            buy(1.0, 0.0),
            Transaction::new(TransactionKind::Buy, 1.0, 100.0, -0.5),
        ] {
            let err = ledger.add_transaction(&mut h, tx).unwrap_err();
            assert!(matches!(err, CoreError::InvalidTransaction(_)));
        }
        assert!(h.transactions.is_empty());
    }

    #[test]
    fn update_price_stamps_holding() {
        let ledger = LedgerService::new();
        let mut h = empty_holding();
        ledger.add_transaction(&mut h, buy(10.0, 100.0)).unwrap();

        let fired = ledger.update_price(&mut h, 120.0);
        assert_eq!(fired, 0);
        assert_eq!(h.current_price, Some(120.0));
        assert_close(h.current_value(), 1200.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// AlertEvaluator
// ═══════════════════════════════════════════════════════════════════

mod alerts {
    use super::*;

    #[test]
    fn price_above_triggers_at_threshold() {
        let evaluator = AlertEvaluator::new();
        let mut alerts = vec![Alert::price_above(200.0)];

        assert_eq!(evaluator.evaluate(&mut alerts, 150.0), 0);
        assert!(!alerts[0].triggered);

        assert_eq!(evaluator.evaluate(&mut alerts, 210.0), 1);
        assert!(alerts[0].triggered);
        assert!(alerts[0].triggered_date.is_some());
    }

    #[test]
    fn price_above_triggers_on_exact_value() {
        let evaluator = AlertEvaluator::new();
        let mut alerts = vec![Alert::price_above(200.0)];
        assert_eq!(evaluator.evaluate(&mut alerts, 200.0), 1);
    }

    #[test]
    fn price_below_triggers_under_threshold() {
        let evaluator = AlertEvaluator::new();
        let mut alerts = vec![Alert::price_below(90.0)];
        assert_eq!(evaluator.evaluate(&mut alerts, 95.0), 0);
        assert_eq!(evaluator.evaluate(&mut alerts, 85.0), 1);
    }

    #[test]
    fn triggered_alert_is_never_reevaluated() {
        // Once fired, an alert stays fired — even if the price crosses
        // the threshold again in either direction.
        let evaluator = AlertEvaluator::new();
        let mut alerts = vec![Alert::price_above(200.0)];
        evaluator.evaluate(&mut alerts, 210.0);
        let first_date = alerts[0].triggered_date;

        assert_eq!(evaluator.evaluate(&mut alerts, 100.0), 0);
        assert_eq!(evaluator.evaluate(&mut alerts, 250.0), 0);
        assert!(alerts[0].triggered);
        assert_eq!(alerts[0].triggered_date, first_date);
    }

    #[test]
    fn inactive_alerts_never_fire() {
        let evaluator = AlertEvaluator::new();
        let mut alert = Alert::price_above(200.0);
        alert.active = false;
        let mut alerts = vec![alert];
        assert_eq!(evaluator.evaluate(&mut alerts, 500.0), 0);
        assert!(!alerts[0].triggered);
    }

    #[test]
    fn volume_and_news_alerts_never_autofire() {
        let evaluator = AlertEvaluator::new();
        let mut alerts = vec![
            Alert {
                kind: AlertKind::VolumeSpike,
                value: None,
                triggered: false,
                triggered_date: None,
                active: true,
            },
            Alert {
                kind: AlertKind::News,
                value: None,
                triggered: false,
                triggered_date: None,
                active: true,
            },
        ];
        assert_eq!(evaluator.evaluate(&mut alerts, 1_000_000.0), 0);
        assert!(alerts.iter().all(|a| !a.triggered));
    }

    #[test]
    fn multiple_alerts_fire_independently() {
        let evaluator = AlertEvaluator::new();
        let mut alerts = vec![Alert::price_above(100.0), Alert::price_below(50.0)];
        assert_eq!(evaluator.evaluate(&mut alerts, 120.0), 1);
        assert!(alerts[0].triggered);
        assert!(!alerts[1].triggered);
    }
}

// ═══════════════════════════════════════════════════════════════════
// GoalService
// ═══════════════════════════════════════════════════════════════════

mod goal_tracker {
    use super::*;

    fn active_goal(target: f64) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Test goal".into(),
            description: None,
            target_amount: target,
            current_amount: 0.0,
            category: GoalCategory::Vacation,
            priority: GoalPriority::Medium,
            target_date: Utc::now() + Duration::days(180),
            start_date: Utc::now(),
            status: GoalStatus::Active,
            monthly_contribution: None,
            auto_contribute: false,
            contributions: Vec::new(),
            milestones: Goal::default_milestones(target),
            tags: Vec::new(),
            created_at: Utc::now(),
            revision: 0,
        }
    }

    #[test]
    fn contribution_accumulates_and_hits_first_milestone() {
        let service = GoalService::new();
        let mut goal = active_goal(10_000.0);

        service.add_contribution(&mut goal, 2500.0, None);

        assert_close(goal.current_amount, 2500.0);
        assert_close(goal.progress_percentage(), 25.0);
        assert_eq!(goal.status, GoalStatus::Active);
        assert!(goal.milestones[0].achieved);
        assert!(goal.milestones[0].achieved_date.is_some());
        assert!(!goal.milestones[1].achieved);
        assert!(!goal.milestones[2].achieved);
        assert!(!goal.milestones[3].achieved);
    }

    #[test]
    fn reaching_target_completes_goal_and_all_milestones() {
        let service = GoalService::new();
        let mut goal = active_goal(10_000.0);

        service.add_contribution(&mut goal, 2500.0, None);
        service.add_contribution(&mut goal, 7500.0, Some("final push".into()));

        assert_close(goal.current_amount, 10_000.0);
        assert_close(goal.progress_percentage(), 100.0);
        assert_eq!(goal.status, GoalStatus::Completed);
        assert!(goal.milestones.iter().all(|m| m.achieved));
        assert_eq!(goal.contributions.len(), 2);
        assert_eq!(goal.contributions[1].note.as_deref(), Some("final push"));
    }

    #[test]
    fn completion_happens_exactly_at_threshold_not_before() {
        let service = GoalService::new();
        let mut goal = active_goal(1000.0);

        service.add_contribution(&mut goal, 999.75, None);
        assert_eq!(goal.status, GoalStatus::Active);

        service.add_contribution(&mut goal, 0.25, None);
        assert_eq!(goal.status, GoalStatus::Completed);
    }

    #[test]
    fn progress_is_monotonic_and_milestones_stick() {
        let service = GoalService::new();
        let mut goal = active_goal(1000.0);
        let mut last_progress = 0.0;

        for amount in [100.0, 50.0, 400.0, 200.0, 250.0] {
            service.add_contribution(&mut goal, amount, None);
            let progress = goal.progress_percentage();
            assert!(progress >= last_progress);
            last_progress = progress;

            for milestone in &goal.milestones {
                if milestone.percentage <= progress {
                    assert!(milestone.achieved);
                }
            }
        }
        assert_eq!(goal.status, GoalStatus::Completed);
    }

    #[test]
    fn achieved_milestones_keep_their_date() {
        let service = GoalService::new();
        let mut goal = active_goal(1000.0);

        service.add_contribution(&mut goal, 250.0, None);
        let first_date = goal.milestones[0].achieved_date;
        assert!(first_date.is_some());

        service.add_contribution(&mut goal, 250.0, None);
        assert_eq!(goal.milestones[0].achieved_date, first_date);
    }

    #[test]
    fn overshoot_caps_progress_at_100() {
        let service = GoalService::new();
        let mut goal = active_goal(1000.0);
        service.add_contribution(&mut goal, 5000.0, None);
        assert_close(goal.progress_percentage(), 100.0);
        assert_eq!(goal.status, GoalStatus::Completed);
    }

    #[test]
    fn milestones_checked_in_stored_order() {
        // A goal with milestones stored out of numeric order: each is
        // judged against the progress independently, in stored order.
        let service = GoalService::new();
        let mut goal = active_goal(1000.0);
        goal.milestones = vec![Milestone::new(75.0, 750.0), Milestone::new(25.0, 250.0)];

        service.add_contribution(&mut goal, 300.0, None);
        assert!(!goal.milestones[0].achieved);
        assert!(goal.milestones[1].achieved);
    }
}

// ═══════════════════════════════════════════════════════════════════
// AnalyticsService
// ═══════════════════════════════════════════════════════════════════

mod analytics {
    use super::*;

    fn position(
        symbol: &str,
        sector: Option<&str>,
        quantity: f64,
        average_cost: f64,
        current_price: f64,
    ) -> Holding {
        let mut h = Holding::new(Uuid::new_v4(), symbol, format!("{symbol} Corp"));
        h.quantity = quantity;
        h.average_cost = average_cost;
        h.current_price = Some(current_price);
        h.sector = sector.map(str::to_string);
        h
    }

    #[test]
    fn portfolio_totals() {
        let service = AnalyticsService::new();
        let holdings = vec![
            position("AAA", Some("Tech"), 10.0, 100.0, 150.0), // +500, +50%
            position("BBB", Some("Tech"), 5.0, 200.0, 180.0),  // -100, -10%
        ];
        let stats = service.portfolio_stats(&holdings);

        assert_eq!(stats.total_positions, 2);
        assert_close(stats.total_invested, 2000.0);
        assert_close(stats.current_value, 2400.0);
        assert_close(stats.total_profit_loss, 400.0);
        assert_close(stats.total_profit_loss_percentage, 20.0);

        let tech = &stats.sector_breakdown["Tech"];
        assert_eq!(tech.count, 2);
        assert_close(tech.invested, 2000.0);
    }

    #[test]
    fn watchlist_entries_are_excluded() {
        let service = AnalyticsService::new();
        let mut watch = position("WWW", None, 0.0, 0.0, 50.0);
        watch.watchlist = true;
        let stats = service.portfolio_stats(&[watch]);
        assert_eq!(stats.total_positions, 0);
        assert_close(stats.total_invested, 0.0);
        assert_close(stats.total_profit_loss_percentage, 0.0);
    }

    #[test]
    fn performers_are_split_sorted_and_truncated() {
        let service = AnalyticsService::new();
        let mut holdings = Vec::new();
        // Seven gainers with increasing returns, two losers.
        for (i, pct) in [5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0].iter().enumerate() {
            let price = 100.0 + pct;
            holdings.push(position(&format!("G{i}"), None, 1.0, 100.0, price));
        }
        holdings.push(position("L0", None, 1.0, 100.0, 95.0)); // -5%
        holdings.push(position("L1", None, 1.0, 100.0, 80.0)); // -20%

        let stats = service.portfolio_stats(&holdings);

        assert_eq!(stats.top_performers.len(), 5);
        assert_eq!(stats.top_performers[0].symbol, "G6");
        assert_close(stats.top_performers[0].profit_loss_percentage, 35.0);
        assert!(stats
            .top_performers
            .windows(2)
            .all(|w| w[0].profit_loss_percentage >= w[1].profit_loss_percentage));

        assert_eq!(stats.worst_performers.len(), 2);
        assert_eq!(stats.worst_performers[0].symbol, "L1");
        assert_close(stats.worst_performers[0].profit_loss_percentage, -20.0);
    }

    #[test]
    fn flat_positions_appear_in_neither_ranking() {
        let service = AnalyticsService::new();
        let stats = service.portfolio_stats(&[position("FLT", None, 10.0, 100.0, 100.0)]);
        assert!(stats.top_performers.is_empty());
        assert!(stats.worst_performers.is_empty());
    }

    #[test]
    fn goal_stats_counts_and_averages() {
        let service = AnalyticsService::new();
        let mk = |target: f64, current: f64, status: GoalStatus, category: GoalCategory| Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "g".into(),
            description: None,
            target_amount: target,
            current_amount: current,
            category,
            priority: GoalPriority::Medium,
            target_date: Utc::now() + Duration::days(30),
            start_date: Utc::now(),
            status,
            monthly_contribution: None,
            auto_contribute: false,
            contributions: Vec::new(),
            milestones: Vec::new(),
            tags: Vec::new(),
            created_at: Utc::now(),
            revision: 0,
        };

        let goals = vec![
            mk(1000.0, 500.0, GoalStatus::Active, GoalCategory::Vacation),
            mk(2000.0, 2000.0, GoalStatus::Completed, GoalCategory::Vacation),
            mk(4000.0, 1000.0, GoalStatus::Paused, GoalCategory::EmergencyFund),
        ];
        let stats = service.goal_stats(&goals);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.paused, 1);
        assert_close(stats.total_target_amount, 7000.0);
        assert_close(stats.total_current_amount, 3500.0);
        assert_close(stats.total_remaining_amount, 3500.0);
        // (50 + 100 + 25) / 3
        assert_close(stats.average_progress, 175.0 / 3.0);

        let vacation = &stats.category_breakdown[&GoalCategory::Vacation];
        assert_eq!(vacation.count, 2);
        assert_close(vacation.total_target, 3000.0);
    }

    #[test]
    fn goal_stats_empty() {
        let stats = AnalyticsService::new().goal_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_close(stats.average_progress, 0.0);
    }

    fn expense_at(
        user_id: Uuid,
        category: ExpenseCategory,
        amount: f64,
        date: chrono::DateTime<Utc>,
    ) -> Expense {
        Expense::from_new(
            user_id,
            NewExpense {
                title: "e".into(),
                amount,
                category,
                subcategory: None,
                description: None,
                date: Some(date),
                is_recurring: false,
                recurring_frequency: None,
                payment_method: None,
                is_planned: false,
            },
        )
    }

    #[test]
    fn expense_stats_month_window_and_categories() {
        let service = AnalyticsService::new();
        let user = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

        let expenses = vec![
            expense_at(user, ExpenseCategory::Housing, 1200.0, now - Duration::days(3)),
            expense_at(user, ExpenseCategory::FoodAndDining, 80.0, now - Duration::days(2)),
            expense_at(user, ExpenseCategory::FoodAndDining, 120.0, now - Duration::days(1)),
            // Previous month: outside the month window, inside the trend.
            expense_at(user, ExpenseCategory::Shopping, 300.0, now - Duration::days(30)),
        ];

        let stats = service.expense_stats(&expenses, StatsPeriod::Month, now);
        assert_eq!(stats.count, 3);
        assert_close(stats.total, 1400.0);

        // Sorted by total, largest first.
        assert_eq!(stats.category_stats[0].category, ExpenseCategory::Housing);
        assert_close(stats.category_stats[0].total_amount, 1200.0);
        assert_eq!(
            stats.category_stats[1].category,
            ExpenseCategory::FoodAndDining
        );
        assert_eq!(stats.category_stats[1].count, 2);
        assert_close(stats.category_stats[1].avg_amount, 100.0);

        // Trend covers both months, oldest first.
        assert_eq!(stats.monthly_trend.len(), 2);
        assert_eq!((stats.monthly_trend[0].year, stats.monthly_trend[0].month), (2025, 5));
        assert_close(stats.monthly_trend[0].total_amount, 300.0);
        assert_eq!((stats.monthly_trend[1].year, stats.monthly_trend[1].month), (2025, 6));
        assert_close(stats.monthly_trend[1].total_amount, 1400.0);
    }

    #[test]
    fn expense_stats_week_window() {
        let service = AnalyticsService::new();
        let user = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

        let expenses = vec![
            expense_at(user, ExpenseCategory::Travel, 50.0, now - Duration::days(2)),
            expense_at(user, ExpenseCategory::Travel, 70.0, now - Duration::days(10)),
        ];
        let stats = service.expense_stats(&expenses, StatsPeriod::Week, now);
        assert_eq!(stats.count, 1);
        assert_close(stats.total, 50.0);
    }

    #[test]
    fn expense_stats_year_window() {
        let service = AnalyticsService::new();
        let user = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();

        let expenses = vec![
            expense_at(user, ExpenseCategory::Utilities, 90.0, Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap()),
            expense_at(user, ExpenseCategory::Utilities, 95.0, Utc.with_ymd_and_hms(2024, 12, 20, 0, 0, 0).unwrap()),
        ];
        let stats = service.expense_stats(&expenses, StatsPeriod::Year, now);
        assert_eq!(stats.count, 1);
        assert_close(stats.total, 90.0);
        // December 2024 still lands in the 6-month trend.
        assert_eq!(stats.monthly_trend.len(), 2);
        assert_eq!((stats.monthly_trend[0].year, stats.monthly_trend[0].month), (2024, 12));
    }

    #[test]
    fn budget_usage_rolls_categories_into_buckets() {
        let service = AnalyticsService::new();
        let user = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let allocation =
            BudgetService::new().allocate(3000.0, BudgetRule::FiftyThirtyTwenty, None);

        let expenses = vec![
            expense_at(user, ExpenseCategory::Housing, 900.0, now - Duration::days(3)),
            expense_at(user, ExpenseCategory::Utilities, 100.0, now - Duration::days(2)),
            expense_at(user, ExpenseCategory::Entertainment, 150.0, now - Duration::days(1)),
            expense_at(user, ExpenseCategory::Investment, 200.0, now - Duration::days(1)),
            // Last month: outside the usage window.
            expense_at(user, ExpenseCategory::Housing, 900.0, now - Duration::days(30)),
        ];

        let usage = service.budget_usage(&expenses, allocation, now);
        assert_close(usage.allocation.needs, 1500.0);
        assert_close(usage.spent_needs, 1000.0);
        assert_close(usage.spent_wants, 150.0);
        assert_close(usage.spent_savings, 200.0);
    }

    #[test]
    fn expense_stats_trend_spans_year_boundary() {
        let service = AnalyticsService::new();
        let user = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2025, 2, 10, 0, 0, 0).unwrap();

        let expenses = vec![
            // 6-month trend window starts 2024-09-01.
            expense_at(user, ExpenseCategory::Other, 10.0, Utc.with_ymd_and_hms(2024, 9, 2, 0, 0, 0).unwrap()),
            expense_at(user, ExpenseCategory::Other, 20.0, Utc.with_ymd_and_hms(2024, 8, 30, 0, 0, 0).unwrap()),
        ];
        let stats = service.expense_stats(&expenses, StatsPeriod::Month, now);
        assert_eq!(stats.monthly_trend.len(), 1);
        assert_eq!((stats.monthly_trend[0].year, stats.monthly_trend[0].month), (2024, 9));
    }
}

// ═══════════════════════════════════════════════════════════════════
// RecommendationService
// ═══════════════════════════════════════════════════════════════════

mod recommendations {
    use super::*;

    fn candidate(symbol: &str, cap: Option<MarketCap>, change_percent: f64) -> StockCandidate {
        StockCandidate {
            symbol: symbol.to_string(),
            name: format!("{symbol} Inc"),
            market_cap: cap,
            quote: Some(Quote {
                price: 100.0,
                change: change_percent,
                change_percent,
            }),
        }
    }

    #[test]
    fn conservative_filter_keeps_large_caps() {
        let service = RecommendationService::new();
        let pool = vec![
            candidate("MEGA", Some(MarketCap::MegaCap), 1.0),
            candidate("LARG", Some(MarketCap::LargeCap), 1.0),
            candidate("MIDC", Some(MarketCap::MidCap), 1.0),
            candidate("SMAL", Some(MarketCap::SmallCap), 1.0),
        ];
        let set = service.select(RiskCategory::Conservative, pool);
        let symbols: Vec<&str> = set.stocks.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["MEGA", "LARG"]);
    }

    #[test]
    fn aggressive_filter_keeps_small_and_mid_caps() {
        let service = RecommendationService::new();
        let pool = vec![
            candidate("MEGA", Some(MarketCap::MegaCap), 1.0),
            candidate("MIDC", Some(MarketCap::MidCap), 1.0),
            candidate("SMAL", Some(MarketCap::SmallCap), 1.0),
        ];
        let set = service.select(RiskCategory::Aggressive, pool);
        let symbols: Vec<&str> = set.stocks.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["MIDC", "SMAL"]);
    }

    #[test]
    fn unclassified_candidates_pass_every_filter() {
        let service = RecommendationService::new();
        let pool = vec![candidate("UNKN", None, 1.0)];
        let set = service.select(RiskCategory::Conservative, pool);
        assert_eq!(set.stocks.len(), 1);
    }

    #[test]
    fn pool_is_truncated_per_risk_category() {
        let service = RecommendationService::new();
        let pool: Vec<StockCandidate> = (0..20)
            .map(|i| candidate(&format!("S{i}"), None, 1.0))
            .collect();

        assert_eq!(
            service
                .select(RiskCategory::Conservative, pool.clone())
                .stocks
                .len(),
            5
        );
        assert_eq!(
            service.select(RiskCategory::Balanced, pool.clone()).stocks.len(),
            8
        );
        assert_eq!(
            service.select(RiskCategory::Aggressive, pool).stocks.len(),
            10
        );
    }

    #[test]
    fn performers_ranked_by_change_percent() {
        let service = RecommendationService::new();
        let pool = vec![
            candidate("UP1", None, 1.0),
            candidate("UP3", None, 3.0),
            candidate("UP2", None, 2.0),
            candidate("DN2", None, -2.0),
            candidate("DN1", None, -1.0),
        ];
        let set = service.select(RiskCategory::Conservative, pool);

        let top: Vec<&str> = set.top_performers.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(top, vec!["UP3", "UP2", "UP1"]);

        let worst: Vec<&str> = set
            .worst_performers
            .iter()
            .map(|c| c.symbol.as_str())
            .collect();
        assert_eq!(worst, vec!["DN2", "DN1"]);
    }

    #[test]
    fn catalog_tables_exist_for_every_risk_category() {
        for risk in [
            RiskCategory::Conservative,
            RiskCategory::Balanced,
            RiskCategory::Aggressive,
        ] {
            assert!(!StaticCatalog::stocks(risk).is_empty());
            assert!(!StaticCatalog::mutual_funds(risk).is_empty());
            assert!(!StaticCatalog::bonds(risk).is_empty());
            // Every catalog stock ships a usable snapshot quote.
            assert!(StaticCatalog::stocks(risk).iter().all(|c| c.quote.is_some()));
        }
    }

    #[test]
    fn balanced_catalog_selection_matches_snapshot_quotes() {
        let service = RecommendationService::new();
        let set = service.select(RiskCategory::Balanced, StaticCatalog::stocks(RiskCategory::Balanced));

        assert_eq!(set.stocks.len(), 8);
        // TSLA has the best snapshot day-change in the balanced table.
        assert_eq!(set.top_performers[0].symbol, "TSLA");
        // META has the worst.
        assert_eq!(set.worst_performers[0].symbol, "META");
        assert!(!set.mutual_funds.is_empty());
        assert!(!set.bonds.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// QuoteService
// ═══════════════════════════════════════════════════════════════════

mod quote_service {
    use super::*;

    #[tokio::test]
    async fn returns_quote_from_provider() {
        let mut registry = QuoteProviderRegistry::new();
        registry.register(Box::new(MockQuoteProvider::new()));
        let service = QuoteService::new(registry);

        let quote = service.get_quote("aapl").await.unwrap();
        assert_close(quote.price, 190.0);
    }

    #[tokio::test]
    async fn falls_back_to_next_provider_on_error() {
        let mut registry = QuoteProviderRegistry::new();
        registry.register(Box::new(FailingQuoteProvider));
        registry.register(Box::new(MockQuoteProvider::new()));
        let service = QuoteService::new(registry);

        let quote = service.get_quote("MSFT").await.unwrap();
        assert_close(quote.price, 350.0);
    }

    #[tokio::test]
    async fn invalid_prices_are_skipped() {
        let mut registry = QuoteProviderRegistry::new();
        registry.register(Box::new(GarbageQuoteProvider));
        registry.register(Box::new(MockQuoteProvider::with_quote(
            "AAPL",
            Quote {
                price: 191.5,
                change: 0.0,
                change_percent: 0.0,
            },
        )));
        let service = QuoteService::new(registry);

        let quote = service.get_quote("AAPL").await.unwrap();
        assert_close(quote.price, 191.5);
    }

    #[tokio::test]
    async fn empty_registry_reports_no_source() {
        let service = QuoteService::new(QuoteProviderRegistry::new());
        let err = service.get_quote("AAPL").await.unwrap_err();
        assert!(matches!(err, CoreError::NoQuoteSource(_)));
        assert!(!service.has_provider());
    }

    #[tokio::test]
    async fn surfaces_last_error_when_all_fail() {
        let mut registry = QuoteProviderRegistry::new();
        registry.register(Box::new(FailingQuoteProvider));
        let service = QuoteService::new(registry);

        let err = service.get_quote("AAPL").await.unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }

    #[test]
    fn provider_names_in_priority_order() {
        let mut registry = QuoteProviderRegistry::new();
        registry.register(Box::new(FailingQuoteProvider));
        registry.register(Box::new(MockQuoteProvider::new()));
        let service = QuoteService::new(registry);
        assert_eq!(service.provider_names(), vec!["FailingMock", "MockProvider"]);
    }
}
