use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the goal is saving towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalCategory {
    #[serde(rename = "Emergency Fund")]
    EmergencyFund,
    Vacation,
    #[serde(rename = "Home Purchase")]
    HomePurchase,
    #[serde(rename = "Car Purchase")]
    CarPurchase,
    Education,
    Retirement,
    Investment,
    #[serde(rename = "Debt Payoff")]
    DebtPayoff,
    Wedding,
    #[serde(rename = "Health & Fitness")]
    HealthAndFitness,
    Technology,
    Other,
}

impl std::fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GoalCategory::EmergencyFund => "Emergency Fund",
            GoalCategory::Vacation => "Vacation",
            GoalCategory::HomePurchase => "Home Purchase",
            GoalCategory::CarPurchase => "Car Purchase",
            GoalCategory::Education => "Education",
            GoalCategory::Retirement => "Retirement",
            GoalCategory::Investment => "Investment",
            GoalCategory::DebtPayoff => "Debt Payoff",
            GoalCategory::Wedding => "Wedding",
            GoalCategory::HealthAndFitness => "Health & Fitness",
            GoalCategory::Technology => "Technology",
            GoalCategory::Other => "Other",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    Medium,
    High,
}

impl Default for GoalPriority {
    fn default() -> Self {
        GoalPriority::Medium
    }
}

/// Goal lifecycle state. The only automatic transition is
/// `Active → Completed` when contributions reach the target; there is
/// deliberately no automatic way back out of `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Paused,
    Cancelled,
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalStatus::Active => write!(f, "active"),
            GoalStatus::Completed => write!(f, "completed"),
            GoalStatus::Paused => write!(f, "paused"),
            GoalStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One entry in a goal's append-only contribution log (always positive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub amount: f64,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
}

/// A fixed percentage checkpoint of the target amount, flipped to
/// achieved once progress reaches it. Never flipped back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Percentage of the target, in [0, 100]
    pub percentage: f64,
    /// Currency amount at that percentage
    pub amount: f64,
    #[serde(default)]
    pub achieved: bool,
    #[serde(default)]
    pub achieved_date: Option<DateTime<Utc>>,
    /// Optional self-promised reward for reaching this checkpoint
    #[serde(default)]
    pub reward: Option<String>,
}

impl Milestone {
    pub fn new(percentage: f64, amount: f64) -> Self {
        Self {
            percentage,
            amount,
            achieved: false,
            achieved_date: None,
            reward: None,
        }
    }
}

/// A savings goal with a target amount and date.
///
/// `current_amount` is the running sum of `contributions` (plus any
/// starting amount supplied at creation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,

    pub title: String,
    #[serde(default)]
    pub description: Option<String>,

    pub target_amount: f64,
    pub current_amount: f64,

    pub category: GoalCategory,
    #[serde(default)]
    pub priority: GoalPriority,

    pub target_date: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub status: GoalStatus,

    /// Intended monthly saving, informational only
    #[serde(default)]
    pub monthly_contribution: Option<f64>,
    #[serde(default)]
    pub auto_contribute: bool,

    /// Append-only, in insertion order
    #[serde(default)]
    pub contributions: Vec<Contribution>,

    /// Checked in stored order on every contribution
    #[serde(default)]
    pub milestones: Vec<Milestone>,

    #[serde(default)]
    pub tags: Vec<String>,

    pub created_at: DateTime<Utc>,

    /// Document revision, bumped by the store on every successful save
    #[serde(default)]
    pub revision: u64,
}

impl Goal {
    /// The standard quartile milestones for a target amount.
    pub fn default_milestones(target_amount: f64) -> Vec<Milestone> {
        [25.0, 50.0, 75.0, 100.0]
            .iter()
            .map(|&pct| Milestone::new(pct, target_amount * pct / 100.0))
            .collect()
    }

    // ── Derived values (computed, never stored) ─────────────────────

    /// Progress towards the target, capped at 100. Zero-target goals
    /// report zero rather than dividing by zero.
    #[must_use]
    pub fn progress_percentage(&self) -> f64 {
        if self.target_amount == 0.0 {
            return 0.0;
        }
        (self.current_amount / self.target_amount * 100.0).min(100.0)
    }

    /// How much is still missing, floored at zero.
    #[must_use]
    pub fn remaining_amount(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    /// Whole days until the target date. Negative means overdue — that
    /// is a signal for the caller, not an error.
    #[must_use]
    pub fn days_remaining(&self) -> i64 {
        let millis = (self.target_date - Utc::now()).num_milliseconds();
        (millis as f64 / 86_400_000.0).ceil() as i64
    }

    /// How much must be saved per month to hit the target on time,
    /// treating anything under a month as one month.
    #[must_use]
    pub fn monthly_required_savings(&self) -> f64 {
        let months_left = (self.days_remaining() as f64 / 30.0).max(1.0);
        (self.remaining_amount() / months_left).ceil()
    }
}

/// Partial update for an existing goal; absent fields stay unchanged.
/// Milestones are deliberately not rescaled when the target changes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_amount: Option<f64>,
    #[serde(default)]
    pub priority: Option<GoalPriority>,
    #[serde(default)]
    pub target_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub monthly_contribution: Option<f64>,
    #[serde(default)]
    pub auto_contribute: Option<bool>,
}

/// Input for creating a goal; the facade fills in ids, timestamps, and
/// default milestones.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGoal {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub target_amount: f64,
    /// Starting progress, defaults to zero
    #[serde(default)]
    pub current_amount: f64,
    pub category: GoalCategory,
    #[serde(default)]
    pub priority: GoalPriority,
    pub target_date: DateTime<Utc>,
    #[serde(default)]
    pub monthly_contribution: Option<f64>,
    #[serde(default)]
    pub auto_contribute: bool,
    /// Custom milestones; quartiles are generated when empty
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub tags: Vec<String>,
}
