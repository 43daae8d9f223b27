use crate::models::budget::{BudgetAllocation, BudgetRule, CustomBudget};

/// Splits monthly income into needs/wants/savings amounts.
///
/// Pure arithmetic — no state, no I/O, no error paths. An incomplete
/// configuration (custom rule without percentages) yields the all-zero
/// allocation instead of an error, so callers can render "not configured
/// yet" rather than a failure.
pub struct BudgetService;

impl BudgetService {
    pub fn new() -> Self {
        Self
    }

    /// Allocate `monthly_income` according to `rule`.
    ///
    /// Named rules use fixed fractions; the custom rule multiplies by the
    /// user's declared percentages. The percentages are not checked to sum
    /// to 100 here — that is profile-input validation, one layer up.
    #[must_use]
    pub fn allocate(
        &self,
        monthly_income: f64,
        rule: BudgetRule,
        custom: Option<&CustomBudget>,
    ) -> BudgetAllocation {
        match rule {
            BudgetRule::FiftyThirtyTwenty => BudgetAllocation {
                needs: monthly_income * 0.5,
                wants: monthly_income * 0.3,
                savings: monthly_income * 0.2,
            },
            BudgetRule::SixtyTwentyTwenty => BudgetAllocation {
                needs: monthly_income * 0.6,
                wants: monthly_income * 0.2,
                savings: monthly_income * 0.2,
            },
            BudgetRule::Custom => match custom {
                Some(pct) => BudgetAllocation {
                    needs: monthly_income * (pct.needs / 100.0),
                    wants: monthly_income * (pct.wants / 100.0),
                    savings: monthly_income * (pct.savings / 100.0),
                },
                None => BudgetAllocation::zero(),
            },
        }
    }
}

impl Default for BudgetService {
    fn default() -> Self {
        Self::new()
    }
}
