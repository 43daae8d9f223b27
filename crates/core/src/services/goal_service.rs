use chrono::Utc;

use crate::models::goal::{Contribution, Goal, GoalStatus};

/// Applies contributions to goals and keeps milestones in step.
///
/// Preconditions (enforced one layer up, at the facade): the contribution
/// amount is positive and the goal is `active`.
pub struct GoalService;

impl GoalService {
    pub fn new() -> Self {
        Self
    }

    /// Append a contribution, accumulate progress, flip the goal to
    /// `completed` once the target is reached, and sweep milestones.
    ///
    /// Completion is one-way: nothing in this library moves a goal back
    /// out of `completed` automatically.
    pub fn add_contribution(&self, goal: &mut Goal, amount: f64, note: Option<String>) {
        goal.contributions.push(Contribution {
            amount,
            date: Utc::now(),
            note,
        });
        goal.current_amount += amount;

        if goal.current_amount >= goal.target_amount {
            goal.status = GoalStatus::Completed;
        }

        self.update_milestones(goal);
    }

    /// Mark every not-yet-achieved milestone whose percentage is within
    /// the current progress. Milestones are checked in stored order, and
    /// already-achieved ones are skipped — a milestone never fires twice.
    pub fn update_milestones(&self, goal: &mut Goal) {
        let progress = goal.progress_percentage();

        for milestone in &mut goal.milestones {
            if !milestone.achieved && progress >= milestone.percentage {
                milestone.achieved = true;
                milestone.achieved_date = Some(Utc::now());
            }
        }
    }
}

impl Default for GoalService {
    fn default() -> Self {
        Self::new()
    }
}
