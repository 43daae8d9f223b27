pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod store;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};
use uuid::Uuid;

use errors::CoreError;
use models::budget::{BudgetAllocation, BudgetRule, BudgetUsage, CustomBudget};
use models::expense::{Expense, ExpenseCategory, ExpenseUpdate, NewExpense};
use models::goal::{Goal, GoalCategory, GoalStatus, GoalUpdate, NewGoal};
use models::holding::{Alert, AlertKind, Holding, NewHolding, Transaction, TransactionKind};
use models::recommendation::{RecommendationSet, RiskCategory};
use models::stats::{ExpenseStats, GoalStats, PortfolioStats, StatsPeriod};
use models::user::{RiskAppetite, UserProfile};
use providers::catalog::StaticCatalog;
use providers::registry::QuoteProviderRegistry;
use services::analytics_service::AnalyticsService;
use services::budget_service::BudgetService;
use services::goal_service::GoalService;
use services::ledger_service::LedgerService;
use services::quote_service::QuoteService;
use services::recommendation_service::RecommendationService;
use store::traits::Store;

/// Maximum length of a ticker symbol.
const MAX_SYMBOL_LEN: usize = 10;

/// Maximum length of titles and company names.
const MAX_TITLE_LEN: usize = 100;

/// Main entry point for the FinTrack core library.
///
/// One instance serves the whole process: every method is scoped by the
/// authenticated `user_id` (verified upstream) and follows the same
/// shape — load the document, validate the request, run the domain
/// logic, persist, return the updated document. Collaborators (the
/// store and the quote providers) are injected at construction; nothing
/// here reaches for ambient globals.
pub struct FinanceTracker {
    store: Arc<dyn Store>,
    budget_service: BudgetService,
    ledger_service: LedgerService,
    goal_service: GoalService,
    analytics_service: AnalyticsService,
    recommendation_service: RecommendationService,
    quote_service: QuoteService,
}

impl std::fmt::Debug for FinanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceTracker")
            .field("quote_providers", &self.quote_service.provider_names())
            .finish()
    }
}

impl FinanceTracker {
    /// Create a tracker with the default quote providers (Yahoo Finance,
    /// plus Finnhub when a `"finnhub"` API key is supplied).
    pub fn new(store: Arc<dyn Store>, api_keys: &HashMap<String, String>) -> Self {
        let registry = QuoteProviderRegistry::new_with_defaults(api_keys);
        Self::with_registry(store, registry)
    }

    /// Create a tracker with an explicit provider registry (used by tests
    /// and embedders that bring their own market-data source).
    pub fn with_registry(store: Arc<dyn Store>, registry: QuoteProviderRegistry) -> Self {
        Self {
            store,
            budget_service: BudgetService::new(),
            ledger_service: LedgerService::new(),
            goal_service: GoalService::new(),
            analytics_service: AnalyticsService::new(),
            recommendation_service: RecommendationService::new(),
            quote_service: QuoteService::new(registry),
        }
    }

    // ── Profile & Budget ────────────────────────────────────────────

    /// Create a fresh profile. Registration credentials are handled by
    /// the identity layer; this only records the document.
    pub async fn create_profile(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<UserProfile, CoreError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(CoreError::Validation(format!(
                "'{email}' is not a valid email address"
            )));
        }
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(CoreError::Validation(
                "First and last name are required".into(),
            ));
        }

        let mut profile = UserProfile::new(email, first_name.trim(), last_name.trim());
        self.store.save_profile(&mut profile).await?;
        Ok(profile)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserProfile, CoreError> {
        self.store.load_profile(user_id).await
    }

    /// Record the budgeting and risk preferences gathered by the setup
    /// wizard. Supplying all of them marks the profile complete.
    pub async fn update_preferences(
        &self,
        user_id: Uuid,
        monthly_income: f64,
        budget_rule: BudgetRule,
        custom_budget: Option<CustomBudget>,
        risk_appetite: RiskAppetite,
    ) -> Result<UserProfile, CoreError> {
        if !monthly_income.is_finite() || monthly_income < 0.0 {
            return Err(CoreError::Validation(
                "Monthly income cannot be negative".into(),
            ));
        }
        if let Some(custom) = &custom_budget {
            for (label, pct) in [
                ("needs", custom.needs),
                ("wants", custom.wants),
                ("savings", custom.savings),
            ] {
                if !(0.0..=100.0).contains(&pct) {
                    return Err(CoreError::Validation(format!(
                        "Custom budget percentage for {label} must be between 0 and 100"
                    )));
                }
            }
        }

        let mut profile = self.store.load_profile(user_id).await?;
        profile.monthly_income = monthly_income;
        profile.budget_rule = budget_rule;
        if let Some(custom) = custom_budget {
            profile.custom_budget = custom;
        }
        profile.risk_appetite = risk_appetite;
        profile.profile_complete = true;
        self.store.save_profile(&mut profile).await?;
        Ok(profile)
    }

    /// Split the profile's monthly income per its budget rule. Computed
    /// on demand, never persisted.
    pub async fn budget_allocation(&self, user_id: Uuid) -> Result<BudgetAllocation, CoreError> {
        let profile = self.store.load_profile(user_id).await?;
        Ok(self.budget_service.allocate(
            profile.monthly_income,
            profile.budget_rule,
            Some(&profile.custom_budget),
        ))
    }

    /// Compare this month's spending against the budget allocation,
    /// bucket by bucket (the budgeting dashboard view).
    pub async fn budget_usage(&self, user_id: Uuid) -> Result<BudgetUsage, CoreError> {
        let allocation = self.budget_allocation(user_id).await?;
        let expenses = self.store.list_expenses(user_id).await?;
        Ok(self
            .analytics_service
            .budget_usage(&expenses, allocation, Utc::now()))
    }

    // ── Expenses ────────────────────────────────────────────────────

    pub async fn add_expense(
        &self,
        user_id: Uuid,
        new: NewExpense,
    ) -> Result<Expense, CoreError> {
        if new.title.trim().is_empty() || new.title.len() > MAX_TITLE_LEN {
            return Err(CoreError::Validation(format!(
                "Expense title is required and cannot exceed {MAX_TITLE_LEN} characters"
            )));
        }
        if !new.amount.is_finite() || new.amount <= 0.0 {
            return Err(CoreError::Validation(
                "Expense amount must be greater than 0".into(),
            ));
        }
        if new.is_recurring && new.recurring_frequency.is_none() {
            return Err(CoreError::Validation(
                "Recurring expenses need a recurring frequency".into(),
            ));
        }

        let mut expense = Expense::from_new(user_id, new);
        self.store.save_expense(&mut expense).await?;
        Ok(expense)
    }

    /// List expenses, newest first, optionally narrowed by category
    /// and/or an inclusive date range.
    pub async fn get_expenses(
        &self,
        user_id: Uuid,
        category: Option<ExpenseCategory>,
        from: Option<chrono::DateTime<Utc>>,
        to: Option<chrono::DateTime<Utc>>,
    ) -> Result<Vec<Expense>, CoreError> {
        let expenses = self.store.list_expenses(user_id).await?;
        Ok(expenses
            .into_iter()
            .filter(|e| category.map_or(true, |c| e.category == c))
            .filter(|e| from.map_or(true, |d| e.date >= d))
            .filter(|e| to.map_or(true, |d| e.date <= d))
            .collect())
    }

    /// Apply a partial update to an expense.
    pub async fn update_expense(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: ExpenseUpdate,
    ) -> Result<Expense, CoreError> {
        if let Some(title) = &update.title {
            if title.trim().is_empty() || title.len() > MAX_TITLE_LEN {
                return Err(CoreError::Validation(format!(
                    "Expense title is required and cannot exceed {MAX_TITLE_LEN} characters"
                )));
            }
        }
        if let Some(amount) = update.amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(CoreError::Validation(
                    "Expense amount must be greater than 0".into(),
                ));
            }
        }

        let mut expense = self.store.load_expense(user_id, id).await?;
        if let Some(title) = update.title {
            expense.title = title;
        }
        if let Some(amount) = update.amount {
            expense.amount = amount;
        }
        if let Some(category) = update.category {
            expense.category = category;
        }
        if let Some(subcategory) = update.subcategory {
            expense.subcategory = Some(subcategory);
        }
        if let Some(description) = update.description {
            expense.description = Some(description);
        }
        if let Some(date) = update.date {
            expense.date = date;
        }
        if let Some(payment_method) = update.payment_method {
            expense.payment_method = payment_method;
        }
        if let Some(is_planned) = update.is_planned {
            expense.is_planned = is_planned;
        }
        self.store.save_expense(&mut expense).await?;
        Ok(expense)
    }

    pub async fn delete_expense(&self, user_id: Uuid, id: Uuid) -> Result<(), CoreError> {
        self.store.delete_expense(user_id, id).await
    }

    /// Spending summary for the requested reporting window.
    pub async fn expense_stats(
        &self,
        user_id: Uuid,
        period: StatsPeriod,
    ) -> Result<ExpenseStats, CoreError> {
        let expenses = self.store.list_expenses(user_id).await?;
        Ok(self
            .analytics_service
            .expense_stats(&expenses, period, Utc::now()))
    }

    // ── Portfolio ───────────────────────────────────────────────────

    /// Add a symbol to the portfolio. A starting quantity seeds the
    /// transaction log with one synthetic buy; a zero quantity creates a
    /// pure watchlist entry. One document per `(user, symbol)` pair.
    pub async fn add_holding(&self, user_id: Uuid, new: NewHolding) -> Result<Holding, CoreError> {
        let symbol = new.symbol.trim().to_uppercase();
        if symbol.is_empty() || symbol.len() > MAX_SYMBOL_LEN {
            return Err(CoreError::Validation(format!(
                "Symbol is required and cannot exceed {MAX_SYMBOL_LEN} characters"
            )));
        }
        if new.company_name.trim().is_empty() || new.company_name.len() > MAX_TITLE_LEN {
            return Err(CoreError::Validation(format!(
                "Company name is required and cannot exceed {MAX_TITLE_LEN} characters"
            )));
        }
        if !new.quantity.is_finite() || new.quantity < 0.0 {
            return Err(CoreError::Validation("Quantity cannot be negative".into()));
        }
        if new.quantity > 0.0 && (!new.average_cost.is_finite() || new.average_cost <= 0.0) {
            return Err(CoreError::Validation(
                "A starting position needs a positive purchase price".into(),
            ));
        }

        if self
            .store
            .find_holding_by_symbol(user_id, &symbol)
            .await?
            .is_some()
        {
            return Err(CoreError::Validation(format!(
                "{symbol} is already in the portfolio — add a transaction instead"
            )));
        }

        let mut holding = Holding::new(user_id, symbol, new.company_name.trim());
        holding.sector = new.sector;
        holding.industry = new.industry;
        holding.market_cap = new.market_cap;
        holding.dividend_yield = new.dividend_yield;
        holding.tags = new.tags;
        holding.notes = new.notes;
        // A zero-quantity entry only makes sense on the watchlist.
        holding.watchlist = new.watchlist || new.quantity == 0.0;

        if new.quantity > 0.0 {
            let seed = Transaction::with_note(
                TransactionKind::Buy,
                new.quantity,
                new.average_cost,
                0.0,
                "Initial purchase",
            );
            self.ledger_service.add_transaction(&mut holding, seed)?;
        }

        self.store.save_holding(&mut holding).await?;
        Ok(holding)
    }

    /// Positions with units held; `include_watchlist` also returns
    /// zero-quantity watchlist entries. Sorted by symbol.
    pub async fn get_portfolio(
        &self,
        user_id: Uuid,
        include_watchlist: bool,
    ) -> Result<Vec<Holding>, CoreError> {
        let holdings = self.store.list_holdings(user_id).await?;
        Ok(holdings
            .into_iter()
            .filter(|h| include_watchlist || h.quantity > 0.0)
            .collect())
    }

    pub async fn get_holding(&self, user_id: Uuid, id: Uuid) -> Result<Holding, CoreError> {
        self.store.load_holding(user_id, id).await
    }

    /// Record a buy or sell. Validation happens here, before the ledger
    /// is invoked: amounts must be positive, and a sell can never exceed
    /// the held quantity.
    pub async fn add_transaction(
        &self,
        user_id: Uuid,
        holding_id: Uuid,
        kind: TransactionKind,
        quantity: f64,
        price: f64,
        fees: f64,
        note: Option<String>,
    ) -> Result<Holding, CoreError> {
        if !quantity.is_finite() || quantity <= 0.0 || !price.is_finite() || price <= 0.0 {
            return Err(CoreError::Validation(
                "Quantity and price must be greater than 0".into(),
            ));
        }
        if !fees.is_finite() || fees < 0.0 {
            return Err(CoreError::Validation("Fees cannot be negative".into()));
        }

        let mut holding = self.store.load_holding(user_id, holding_id).await?;

        if kind == TransactionKind::Sell && quantity > holding.quantity {
            return Err(CoreError::Validation(
                "Cannot sell more shares than owned".into(),
            ));
        }

        let transaction = Transaction {
            kind,
            quantity,
            price,
            fees,
            date: Utc::now(),
            note,
        };
        self.ledger_service
            .add_transaction(&mut holding, transaction)?;

        self.store.save_holding(&mut holding).await?;
        Ok(holding)
    }

    /// Record a new market price and evaluate the holding's alerts
    /// against it.
    pub async fn update_price(
        &self,
        user_id: Uuid,
        holding_id: Uuid,
        price: f64,
    ) -> Result<Holding, CoreError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(CoreError::Validation(
                "Valid current price is required".into(),
            ));
        }

        let mut holding = self.store.load_holding(user_id, holding_id).await?;
        let fired = self.ledger_service.update_price(&mut holding, price);
        if fired > 0 {
            debug!("{fired} alert(s) fired for {} at {price}", holding.symbol);
        }
        self.store.save_holding(&mut holding).await?;
        Ok(holding)
    }

    /// Fetch the latest market quote for the holding's symbol and feed it
    /// through the price-update path.
    pub async fn refresh_price(&self, user_id: Uuid, holding_id: Uuid) -> Result<Holding, CoreError> {
        let symbol = self.store.load_holding(user_id, holding_id).await?.symbol;
        let quote = self.quote_service.get_quote(&symbol).await?;
        self.update_price(user_id, holding_id, quote.price).await
    }

    pub async fn toggle_watchlist(&self, user_id: Uuid, holding_id: Uuid) -> Result<Holding, CoreError> {
        let mut holding = self.store.load_holding(user_id, holding_id).await?;
        holding.watchlist = !holding.watchlist;
        self.store.save_holding(&mut holding).await?;
        Ok(holding)
    }

    /// All holdings flagged for watching, regardless of quantity.
    pub async fn get_watchlist(&self, user_id: Uuid) -> Result<Vec<Holding>, CoreError> {
        let holdings = self.store.list_holdings(user_id).await?;
        Ok(holdings.into_iter().filter(|h| h.watchlist).collect())
    }

    pub async fn remove_holding(&self, user_id: Uuid, id: Uuid) -> Result<(), CoreError> {
        self.store.delete_holding(user_id, id).await
    }

    /// Attach an alert to a holding. Price alerts need a threshold.
    pub async fn add_alert(
        &self,
        user_id: Uuid,
        holding_id: Uuid,
        alert: Alert,
    ) -> Result<Holding, CoreError> {
        let needs_value = matches!(alert.kind, AlertKind::PriceAbove | AlertKind::PriceBelow);
        if needs_value && alert.value.is_none() {
            return Err(CoreError::Validation(
                "Price alerts need a threshold value".into(),
            ));
        }

        let mut holding = self.store.load_holding(user_id, holding_id).await?;
        holding.alerts.push(alert);
        self.store.save_holding(&mut holding).await?;
        Ok(holding)
    }

    pub async fn portfolio_stats(&self, user_id: Uuid) -> Result<PortfolioStats, CoreError> {
        let holdings = self.store.list_holdings(user_id).await?;
        Ok(self.analytics_service.portfolio_stats(&holdings))
    }

    // ── Goals ───────────────────────────────────────────────────────

    /// Create a goal. Quartile milestones (25/50/75/100%) are generated
    /// when the caller supplies none.
    pub async fn create_goal(&self, user_id: Uuid, new: NewGoal) -> Result<Goal, CoreError> {
        if new.title.trim().is_empty() || new.title.len() > MAX_TITLE_LEN {
            return Err(CoreError::Validation(format!(
                "Goal title is required and cannot exceed {MAX_TITLE_LEN} characters"
            )));
        }
        if !new.target_amount.is_finite() || new.target_amount < 0.0 {
            return Err(CoreError::Validation(
                "Target amount cannot be negative".into(),
            ));
        }
        if !new.current_amount.is_finite() || new.current_amount < 0.0 {
            return Err(CoreError::Validation(
                "Current amount cannot be negative".into(),
            ));
        }
        for milestone in &new.milestones {
            if !(0.0..=100.0).contains(&milestone.percentage) {
                return Err(CoreError::Validation(
                    "Milestone percentages must be between 0 and 100".into(),
                ));
            }
        }

        let milestones = if new.milestones.is_empty() {
            Goal::default_milestones(new.target_amount)
        } else {
            new.milestones
        };

        let now = Utc::now();
        let mut goal = Goal {
            id: Uuid::new_v4(),
            user_id,
            title: new.title.trim().to_string(),
            description: new.description,
            target_amount: new.target_amount,
            current_amount: new.current_amount,
            category: new.category,
            priority: new.priority,
            target_date: new.target_date,
            start_date: now,
            status: GoalStatus::Active,
            monthly_contribution: new.monthly_contribution,
            auto_contribute: new.auto_contribute,
            contributions: Vec::new(),
            milestones,
            tags: new.tags,
            created_at: now,
            revision: 0,
        };
        // A starting amount may already satisfy early milestones.
        self.goal_service.update_milestones(&mut goal);

        self.store.save_goal(&mut goal).await?;
        Ok(goal)
    }

    /// List goals, newest first, optionally narrowed by status and/or
    /// category.
    pub async fn get_goals(
        &self,
        user_id: Uuid,
        status: Option<GoalStatus>,
        category: Option<GoalCategory>,
    ) -> Result<Vec<Goal>, CoreError> {
        let goals = self.store.list_goals(user_id).await?;
        Ok(goals
            .into_iter()
            .filter(|g| status.map_or(true, |s| g.status == s))
            .filter(|g| category.map_or(true, |c| g.category == c))
            .collect())
    }

    pub async fn get_goal(&self, user_id: Uuid, id: Uuid) -> Result<Goal, CoreError> {
        self.store.load_goal(user_id, id).await
    }

    /// Contribute towards a goal. Only active goals accept contributions;
    /// reaching the target completes the goal on this very call.
    pub async fn add_contribution(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        amount: f64,
        note: Option<String>,
    ) -> Result<Goal, CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::Validation(
                "Contribution amount must be greater than 0".into(),
            ));
        }

        let mut goal = self.store.load_goal(user_id, goal_id).await?;
        if goal.status != GoalStatus::Active {
            return Err(CoreError::Validation(
                "Cannot contribute to inactive goal".into(),
            ));
        }

        self.goal_service.add_contribution(&mut goal, amount, note);
        self.store.save_goal(&mut goal).await?;
        Ok(goal)
    }

    /// Manual status transition (pause, cancel, reactivate). Automatic
    /// completion still only happens through contributions.
    pub async fn set_goal_status(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        status: GoalStatus,
    ) -> Result<Goal, CoreError> {
        let mut goal = self.store.load_goal(user_id, goal_id).await?;
        goal.status = status;
        self.store.save_goal(&mut goal).await?;
        Ok(goal)
    }

    /// Apply a partial update to a goal. Existing milestones are kept
    /// as-is even when the target amount changes.
    pub async fn update_goal(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: GoalUpdate,
    ) -> Result<Goal, CoreError> {
        if let Some(title) = &update.title {
            if title.trim().is_empty() || title.len() > MAX_TITLE_LEN {
                return Err(CoreError::Validation(format!(
                    "Goal title is required and cannot exceed {MAX_TITLE_LEN} characters"
                )));
            }
        }
        if let Some(target) = update.target_amount {
            if !target.is_finite() || target < 0.0 {
                return Err(CoreError::Validation(
                    "Target amount cannot be negative".into(),
                ));
            }
        }

        let mut goal = self.store.load_goal(user_id, id).await?;
        if let Some(title) = update.title {
            goal.title = title;
        }
        if let Some(description) = update.description {
            goal.description = Some(description);
        }
        if let Some(target_amount) = update.target_amount {
            goal.target_amount = target_amount;
        }
        if let Some(priority) = update.priority {
            goal.priority = priority;
        }
        if let Some(target_date) = update.target_date {
            goal.target_date = target_date;
        }
        if let Some(monthly) = update.monthly_contribution {
            goal.monthly_contribution = Some(monthly);
        }
        if let Some(auto) = update.auto_contribute {
            goal.auto_contribute = auto;
        }
        self.store.save_goal(&mut goal).await?;
        Ok(goal)
    }

    pub async fn delete_goal(&self, user_id: Uuid, id: Uuid) -> Result<(), CoreError> {
        self.store.delete_goal(user_id, id).await
    }

    pub async fn goal_stats(&self, user_id: Uuid) -> Result<GoalStats, CoreError> {
        let goals = self.store.list_goals(user_id).await?;
        Ok(self.analytics_service.goal_stats(&goals))
    }

    // ── Recommendations ─────────────────────────────────────────────

    /// Investment suggestions for the profile's risk appetite.
    ///
    /// The candidate pool starts from the built-in catalog; live quotes
    /// replace the baked snapshots wherever a provider answers. Provider
    /// failures degrade to the catalog data instead of failing the call.
    pub async fn recommendations(&self, user_id: Uuid) -> Result<RecommendationSet, CoreError> {
        let profile = self.store.load_profile(user_id).await?;
        let risk: RiskCategory = profile.risk_appetite.into();

        let mut pool = StaticCatalog::stocks(risk);
        if self.quote_service.has_provider() {
            for candidate in &mut pool {
                match self.quote_service.get_quote(&candidate.symbol).await {
                    Ok(quote) => candidate.quote = Some(quote),
                    Err(e) => {
                        warn!(
                            "quote refresh failed for {}, keeping catalog snapshot: {e}",
                            candidate.symbol
                        );
                    }
                }
            }
        }

        Ok(self.recommendation_service.select(risk, pool))
    }
}
