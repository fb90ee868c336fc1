use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub title: String,
    pub url: String,
}

/// One unit of the learning plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Week {
    pub week: u32,
    pub topic: String,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub project_idea: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareerAdvice {
    #[serde(default)]
    pub identified_skill_gaps: Vec<String>,
    #[serde(default)]
    pub suggested_portfolio_projects: Vec<String>,
    #[serde(default)]
    pub personalized_learning_path: Vec<Week>,
}

/// Advice as returned by the generator and persisted verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareerAdviceResponse {
    pub career_advice: CareerAdvice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_fit_score: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("learning path contains week {0} more than once")]
    DuplicateWeek(u32),
}

impl CareerAdviceResponse {
    pub fn weeks(&self) -> &[Week] {
        &self.career_advice.personalized_learning_path
    }

    pub fn week_numbers(&self) -> BTreeSet<u32> {
        self.weeks().iter().map(|w| w.week).collect()
    }

    pub fn contains_week(&self, week: u32) -> bool {
        self.weeks().iter().any(|w| w.week == week)
    }

    /// Orders the learning path by week number, rejecting duplicates.
    pub fn validated(mut self) -> Result<Self, PlanError> {
        let path = &mut self.career_advice.personalized_learning_path;
        path.sort_by_key(|w| w.week);
        if let Some(pair) = path.windows(2).find(|pair| pair[0].week == pair[1].week) {
            return Err(PlanError::DuplicateWeek(pair[0].week));
        }
        Ok(self)
    }
}

#[cfg(test)]
pub(crate) fn sample_advice(weeks: &[u32]) -> CareerAdviceResponse {
    CareerAdviceResponse {
        career_advice: CareerAdvice {
            identified_skill_gaps: vec!["Distributed systems".to_string()],
            suggested_portfolio_projects: vec!["Build a feature store".to_string()],
            personalized_learning_path: weeks
                .iter()
                .map(|&week| Week {
                    week,
                    topic: format!("Topic {week}"),
                    learning_objectives: vec![format!("Objective {week}")],
                    project_idea: format!("Project {week}"),
                    resources: vec![Resource {
                        title: format!("Reading {week}"),
                        url: format!("https://example.com/{week}"),
                    }],
                })
                .collect(),
        },
        role_fit_score: Some(72),
    }
}

/// A sorted set of plan weeks paired with a sorted subset of them.
#[cfg(test)]
pub(crate) fn weeks_with_subset() -> impl proptest::strategy::Strategy<Value = (Vec<u32>, Vec<u32>)> {
    use proptest::prelude::*;

    prop::collection::btree_set(1u32..=26, 1..10).prop_flat_map(|weeks| {
        let weeks: Vec<u32> = weeks.into_iter().collect();
        let len = weeks.len();
        (Just(weeks.clone()), prop::sample::subsequence(weeks, 0..=len))
    })
}
