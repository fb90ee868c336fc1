use serde::Serialize;

use crate::models::advice::{CareerAdviceResponse, Resource};
use crate::wizard::CompletionSet;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// Exact share of completed weeks, 0.0 to 100.0.
    pub percent: f64,
    /// `percent` rounded for display.
    pub display_percent: u32,
}

impl Progress {
    pub fn new(completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        Self {
            completed,
            total,
            percent,
            display_percent: percent.round() as u32,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeekView {
    pub week: u32,
    pub topic: String,
    pub learning_objectives: Vec<String>,
    pub project_idea: String,
    pub resources: Vec<Resource>,
    pub completed: bool,
    pub expanded: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanView {
    pub role_fit_score: Option<u32>,
    pub identified_skill_gaps: Vec<String>,
    pub suggested_portfolio_projects: Vec<String>,
    pub weeks: Vec<WeekView>,
    pub progress: Progress,
}

impl PlanView {
    pub fn build(
        advice: &CareerAdviceResponse,
        completed: &CompletionSet,
        expanded_week: Option<u32>,
    ) -> Self {
        let weeks: Vec<WeekView> = advice
            .weeks()
            .iter()
            .map(|w| WeekView {
                week: w.week,
                topic: w.topic.clone(),
                learning_objectives: w.learning_objectives.clone(),
                project_idea: w.project_idea.clone(),
                resources: w.resources.clone(),
                completed: completed.contains(w.week),
                expanded: expanded_week == Some(w.week),
            })
            .collect();
        let done = weeks.iter().filter(|w| w.completed).count();

        Self {
            role_fit_score: advice.role_fit_score,
            identified_skill_gaps: advice.career_advice.identified_skill_gaps.clone(),
            suggested_portfolio_projects: advice.career_advice.suggested_portfolio_projects.clone(),
            progress: Progress::new(done, weeks.len()),
            weeks,
        }
    }
}
