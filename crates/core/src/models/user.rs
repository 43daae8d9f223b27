use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::budget::{BudgetRule, CustomBudget};

/// Self-declared investment risk tolerance, as stored on the profile.
///
/// This is the profile-facing vocabulary. The recommendation engine uses
/// its own category names — see
/// [`RiskCategory`](super::recommendation::RiskCategory) for the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskAppetite {
    Conservative,
    Moderate,
    Aggressive,
}

impl std::fmt::Display for RiskAppetite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskAppetite::Conservative => write!(f, "conservative"),
            RiskAppetite::Moderate => write!(f, "moderate"),
            RiskAppetite::Aggressive => write!(f, "aggressive"),
        }
    }
}

impl Default for RiskAppetite {
    fn default() -> Self {
        RiskAppetite::Moderate
    }
}

/// A user's profile document: identity basics plus the budgeting and risk
/// preferences that drive allocation and recommendations.
///
/// Credentials and session handling live outside this library; the
/// authenticated `id` arrives pre-verified with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier (the `user_id` scoping every other entity)
    pub id: Uuid,

    pub email: String,
    pub first_name: String,
    pub last_name: String,

    /// Gross monthly income used by the budget allocator
    pub monthly_income: f64,

    /// Which allocation rule applies
    pub budget_rule: BudgetRule,

    /// Percentages for the custom rule; ignored for the named rules
    pub custom_budget: CustomBudget,

    /// Risk tolerance driving recommendations
    pub risk_appetite: RiskAppetite,

    /// True once income, rule and risk appetite have all been supplied
    pub profile_complete: bool,

    pub created_at: DateTime<Utc>,

    /// Document revision, bumped by the store on every successful save
    #[serde(default)]
    pub revision: u64,
}

impl UserProfile {
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into().trim().to_lowercase(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            monthly_income: 0.0,
            budget_rule: BudgetRule::default(),
            custom_budget: CustomBudget::default(),
            risk_appetite: RiskAppetite::default(),
            profile_complete: false,
            created_at: Utc::now(),
            revision: 0,
        }
    }

    /// "First Last", for display.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
