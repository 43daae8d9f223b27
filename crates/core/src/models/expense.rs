use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::budget::BudgetBucket;

/// Expense category, as the backend stores it.
///
/// The budgeting UI works in the informal needs/wants/savings buckets
/// instead; [`ExpenseCategory::budget_bucket`] is the translation table
/// between the two vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Housing,
    Transportation,
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    Healthcare,
    Entertainment,
    Shopping,
    Utilities,
    Education,
    Travel,
    Insurance,
    Investment,
    Savings,
    Other,
}

impl ExpenseCategory {
    /// Map the stored category onto the budgeting UI's bucket vocabulary.
    /// One-way and intentionally explicit: the two vocabularies are not
    /// in one-to-one correspondence.
    #[must_use]
    pub fn budget_bucket(&self) -> BudgetBucket {
        match self {
            ExpenseCategory::Housing
            | ExpenseCategory::Transportation
            | ExpenseCategory::FoodAndDining
            | ExpenseCategory::Healthcare
            | ExpenseCategory::Utilities
            | ExpenseCategory::Education
            | ExpenseCategory::Insurance => BudgetBucket::Needs,
            ExpenseCategory::Entertainment
            | ExpenseCategory::Shopping
            | ExpenseCategory::Travel
            | ExpenseCategory::Other => BudgetBucket::Wants,
            ExpenseCategory::Investment | ExpenseCategory::Savings => BudgetBucket::Savings,
        }
    }

    /// All categories, in display order.
    pub fn all() -> &'static [ExpenseCategory] {
        &[
            ExpenseCategory::Housing,
            ExpenseCategory::Transportation,
            ExpenseCategory::FoodAndDining,
            ExpenseCategory::Healthcare,
            ExpenseCategory::Entertainment,
            ExpenseCategory::Shopping,
            ExpenseCategory::Utilities,
            ExpenseCategory::Education,
            ExpenseCategory::Travel,
            ExpenseCategory::Insurance,
            ExpenseCategory::Investment,
            ExpenseCategory::Savings,
            ExpenseCategory::Other,
        ]
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExpenseCategory::Housing => "Housing",
            ExpenseCategory::Transportation => "Transportation",
            ExpenseCategory::FoodAndDining => "Food & Dining",
            ExpenseCategory::Healthcare => "Healthcare",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Education => "Education",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Insurance => "Insurance",
            ExpenseCategory::Investment => "Investment",
            ExpenseCategory::Savings => "Savings",
            ExpenseCategory::Other => "Other",
        };
        write!(f, "{name}")
    }
}

/// How the expense was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    BankTransfer,
    DigitalWallet,
    Other,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

/// Repetition cadence for recurring expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// A single logged expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,

    pub title: String,
    /// Always positive
    pub amount: f64,
    pub category: ExpenseCategory,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub description: Option<String>,

    pub date: DateTime<Utc>,

    #[serde(default)]
    pub is_recurring: bool,
    /// Required when `is_recurring` is set; validated by the caller
    #[serde(default)]
    pub recurring_frequency: Option<RecurringFrequency>,

    #[serde(default)]
    pub payment_method: PaymentMethod,

    /// Planned (budgeted ahead) rather than already incurred
    #[serde(default)]
    pub is_planned: bool,

    pub created_at: DateTime<Utc>,

    /// Document revision, bumped by the store on every successful save
    #[serde(default)]
    pub revision: u64,
}

/// Input for creating an expense; the facade fills in ids and timestamps.
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    pub title: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to now when absent
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurring_frequency: Option<RecurringFrequency>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub is_planned: bool,
}

/// Partial update for an existing expense; absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub category: Option<ExpenseCategory>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub is_planned: Option<bool>,
}

impl Expense {
    pub fn from_new(user_id: Uuid, new: NewExpense) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: new.title,
            amount: new.amount,
            category: new.category,
            subcategory: new.subcategory,
            description: new.description,
            date: new.date.unwrap_or_else(Utc::now),
            is_recurring: new.is_recurring,
            recurring_frequency: new.recurring_frequency,
            payment_method: new.payment_method.unwrap_or_default(),
            is_planned: new.is_planned,
            created_at: Utc::now(),
            revision: 0,
        }
    }
}
