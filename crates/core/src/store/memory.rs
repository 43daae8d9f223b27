use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::traits::Store;
use crate::errors::CoreError;
use crate::models::expense::Expense;
use crate::models::goal::Goal;
use crate::models::holding::Holding;
use crate::models::user::UserProfile;

/// In-memory [`Store`] implementation.
///
/// Backs tests and single-process embedding; a real deployment plugs a
/// document database in behind the same trait. Documents are cloned on
/// the way in and out, so callers never alias stored state.
#[derive(Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<Uuid, UserProfile>>,
    holdings: RwLock<HashMap<(Uuid, Uuid), Holding>>,
    goals: RwLock<HashMap<(Uuid, Uuid), Goal>>,
    expenses: RwLock<HashMap<(Uuid, Uuid), Expense>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare-and-swap guard shared by every `save_*`.
    fn check_revision(
        stored: Option<u64>,
        incoming: u64,
        entity: &'static str,
        id: Uuid,
    ) -> Result<(), CoreError> {
        match stored {
            Some(revision) if revision != incoming => Err(CoreError::Conflict {
                entity,
                id: id.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    // ── Profiles ────────────────────────────────────────────────────

    async fn load_profile(&self, user_id: Uuid) -> Result<UserProfile, CoreError> {
        let profiles = self.profiles.read().unwrap_or_else(|e| e.into_inner());
        profiles
            .get(&user_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("profile", user_id))
    }

    async fn save_profile(&self, profile: &mut UserProfile) -> Result<(), CoreError> {
        let mut profiles = self.profiles.write().unwrap_or_else(|e| e.into_inner());
        let stored = profiles.get(&profile.id).map(|p| p.revision);
        Self::check_revision(stored, profile.revision, "profile", profile.id)?;
        profile.revision += 1;
        profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    // ── Holdings ────────────────────────────────────────────────────

    async fn load_holding(&self, user_id: Uuid, id: Uuid) -> Result<Holding, CoreError> {
        let holdings = self.holdings.read().unwrap_or_else(|e| e.into_inner());
        holdings
            .get(&(user_id, id))
            .cloned()
            .ok_or_else(|| CoreError::not_found("holding", id))
    }

    async fn find_holding_by_symbol(
        &self,
        user_id: Uuid,
        symbol: &str,
    ) -> Result<Option<Holding>, CoreError> {
        let upper = symbol.trim().to_uppercase();
        let holdings = self.holdings.read().unwrap_or_else(|e| e.into_inner());
        Ok(holdings
            .values()
            .find(|h| h.user_id == user_id && h.symbol == upper)
            .cloned())
    }

    async fn save_holding(&self, holding: &mut Holding) -> Result<(), CoreError> {
        let mut holdings = self.holdings.write().unwrap_or_else(|e| e.into_inner());
        let key = (holding.user_id, holding.id);
        let stored = holdings.get(&key).map(|h| h.revision);
        Self::check_revision(stored, holding.revision, "holding", holding.id)?;
        holding.revision += 1;
        holdings.insert(key, holding.clone());
        Ok(())
    }

    async fn delete_holding(&self, user_id: Uuid, id: Uuid) -> Result<(), CoreError> {
        let mut holdings = self.holdings.write().unwrap_or_else(|e| e.into_inner());
        holdings
            .remove(&(user_id, id))
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("holding", id))
    }

    async fn list_holdings(&self, user_id: Uuid) -> Result<Vec<Holding>, CoreError> {
        let holdings = self.holdings.read().unwrap_or_else(|e| e.into_inner());
        let mut result: Vec<Holding> = holdings
            .values()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(result)
    }

    // ── Goals ───────────────────────────────────────────────────────

    async fn load_goal(&self, user_id: Uuid, id: Uuid) -> Result<Goal, CoreError> {
        let goals = self.goals.read().unwrap_or_else(|e| e.into_inner());
        goals
            .get(&(user_id, id))
            .cloned()
            .ok_or_else(|| CoreError::not_found("goal", id))
    }

    async fn save_goal(&self, goal: &mut Goal) -> Result<(), CoreError> {
        let mut goals = self.goals.write().unwrap_or_else(|e| e.into_inner());
        let key = (goal.user_id, goal.id);
        let stored = goals.get(&key).map(|g| g.revision);
        Self::check_revision(stored, goal.revision, "goal", goal.id)?;
        goal.revision += 1;
        goals.insert(key, goal.clone());
        Ok(())
    }

    async fn delete_goal(&self, user_id: Uuid, id: Uuid) -> Result<(), CoreError> {
        let mut goals = self.goals.write().unwrap_or_else(|e| e.into_inner());
        goals
            .remove(&(user_id, id))
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("goal", id))
    }

    async fn list_goals(&self, user_id: Uuid) -> Result<Vec<Goal>, CoreError> {
        let goals = self.goals.read().unwrap_or_else(|e| e.into_inner());
        let mut result: Vec<Goal> = goals
            .values()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    // ── Expenses ────────────────────────────────────────────────────

    async fn load_expense(&self, user_id: Uuid, id: Uuid) -> Result<Expense, CoreError> {
        let expenses = self.expenses.read().unwrap_or_else(|e| e.into_inner());
        expenses
            .get(&(user_id, id))
            .cloned()
            .ok_or_else(|| CoreError::not_found("expense", id))
    }

    async fn save_expense(&self, expense: &mut Expense) -> Result<(), CoreError> {
        let mut expenses = self.expenses.write().unwrap_or_else(|e| e.into_inner());
        let key = (expense.user_id, expense.id);
        let stored = expenses.get(&key).map(|e| e.revision);
        Self::check_revision(stored, expense.revision, "expense", expense.id)?;
        expense.revision += 1;
        expenses.insert(key, expense.clone());
        Ok(())
    }

    async fn delete_expense(&self, user_id: Uuid, id: Uuid) -> Result<(), CoreError> {
        let mut expenses = self.expenses.write().unwrap_or_else(|e| e.into_inner());
        expenses
            .remove(&(user_id, id))
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("expense", id))
    }

    async fn list_expenses(&self, user_id: Uuid) -> Result<Vec<Expense>, CoreError> {
        let expenses = self.expenses.read().unwrap_or_else(|e| e.into_inner());
        let mut result: Vec<Expense> = expenses
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(result)
    }
}
