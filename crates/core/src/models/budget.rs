use serde::{Deserialize, Serialize};

/// How monthly income is split into needs/wants/savings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetRule {
    /// 50% needs, 30% wants, 20% savings — the default for new profiles.
    #[serde(rename = "50-30-20")]
    FiftyThirtyTwenty,
    /// 60% needs, 20% wants, 20% savings.
    #[serde(rename = "60-20-20")]
    SixtyTwentyTwenty,
    /// User-declared percentages (see [`CustomBudget`]).
    #[serde(rename = "custom")]
    Custom,
}

impl std::fmt::Display for BudgetRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetRule::FiftyThirtyTwenty => write!(f, "50-30-20"),
            BudgetRule::SixtyTwentyTwenty => write!(f, "60-20-20"),
            BudgetRule::Custom => write!(f, "custom"),
        }
    }
}

impl Default for BudgetRule {
    fn default() -> Self {
        BudgetRule::FiftyThirtyTwenty
    }
}

/// User-declared budget split, in whole percentages of monthly income.
///
/// Not required to sum to 100 here — that check belongs to the caller
/// validating profile input, not to the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomBudget {
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
}

impl Default for CustomBudget {
    fn default() -> Self {
        Self {
            needs: 50.0,
            wants: 30.0,
            savings: 20.0,
        }
    }
}

/// A computed 3-way split of monthly income, in currency amounts.
/// Never persisted — recomputed on demand from the profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
}

impl BudgetAllocation {
    /// The all-zero allocation, returned when the profile configuration
    /// is incomplete (e.g. custom rule with no percentages).
    pub fn zero() -> Self {
        Self {
            needs: 0.0,
            wants: 0.0,
            savings: 0.0,
        }
    }

    /// Sum of the three buckets.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.needs + self.wants + self.savings
    }
}

/// This month's spending measured against the budget allocation,
/// bucket by bucket. Computed on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetUsage {
    pub allocation: BudgetAllocation,
    pub spent_needs: f64,
    pub spent_wants: f64,
    pub spent_savings: f64,
}

/// The informal bucket vocabulary used by the budgeting UI
/// (expenses are grouped into these when checked against an allocation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetBucket {
    Needs,
    Wants,
    Savings,
}

impl std::fmt::Display for BudgetBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetBucket::Needs => write!(f, "needs"),
            BudgetBucket::Wants => write!(f, "wants"),
            BudgetBucket::Savings => write!(f, "savings"),
        }
    }
}
