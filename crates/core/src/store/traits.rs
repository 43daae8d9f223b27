use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::expense::Expense;
use crate::models::goal::Goal;
use crate::models::holding::Holding;
use crate::models::user::UserProfile;

/// The document-database boundary.
///
/// Every lookup is scoped by the authenticated `user_id`; an entity that
/// exists under a different user is `NotFound`, never leaked.
///
/// `save_*` is a per-document compare-and-swap: the write succeeds only if
/// the stored revision still matches the entity's, and bumps the revision
/// on the way in. Two requests that load the same document concurrently
/// therefore race at last-write-wins granularity between load and save —
/// the second save gets `Conflict`. No application-level locking exists
/// on top of this.
#[async_trait]
pub trait Store: Send + Sync {
    // ── Profiles ────────────────────────────────────────────────────

    async fn load_profile(&self, user_id: Uuid) -> Result<UserProfile, CoreError>;
    async fn save_profile(&self, profile: &mut UserProfile) -> Result<(), CoreError>;

    // ── Holdings ────────────────────────────────────────────────────

    async fn load_holding(&self, user_id: Uuid, id: Uuid) -> Result<Holding, CoreError>;
    /// Case-insensitive symbol lookup, used for duplicate detection.
    async fn find_holding_by_symbol(
        &self,
        user_id: Uuid,
        symbol: &str,
    ) -> Result<Option<Holding>, CoreError>;
    async fn save_holding(&self, holding: &mut Holding) -> Result<(), CoreError>;
    async fn delete_holding(&self, user_id: Uuid, id: Uuid) -> Result<(), CoreError>;
    /// All of a user's holdings, sorted by symbol.
    async fn list_holdings(&self, user_id: Uuid) -> Result<Vec<Holding>, CoreError>;

    // ── Goals ───────────────────────────────────────────────────────

    async fn load_goal(&self, user_id: Uuid, id: Uuid) -> Result<Goal, CoreError>;
    async fn save_goal(&self, goal: &mut Goal) -> Result<(), CoreError>;
    async fn delete_goal(&self, user_id: Uuid, id: Uuid) -> Result<(), CoreError>;
    /// All of a user's goals, newest first.
    async fn list_goals(&self, user_id: Uuid) -> Result<Vec<Goal>, CoreError>;

    // ── Expenses ────────────────────────────────────────────────────

    async fn load_expense(&self, user_id: Uuid, id: Uuid) -> Result<Expense, CoreError>;
    async fn save_expense(&self, expense: &mut Expense) -> Result<(), CoreError>;
    async fn delete_expense(&self, user_id: Uuid, id: Uuid) -> Result<(), CoreError>;
    /// All of a user's expenses, newest first.
    async fn list_expenses(&self, user_id: Uuid) -> Result<Vec<Expense>, CoreError>;
}
