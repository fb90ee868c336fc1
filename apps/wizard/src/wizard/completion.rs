use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Week numbers the user has marked done.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionSet(BTreeSet<u32>);

impl CompletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, week: u32) -> bool {
        self.0.contains(&week)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Symmetric difference with `{week}`.
    pub fn toggled(&self, week: u32) -> Self {
        let mut next = self.0.clone();
        if !next.remove(&week) {
            next.insert(week);
        }
        Self(next)
    }

    /// Drops every week that is not in `weeks`.
    pub fn clamped_to(&self, weeks: &BTreeSet<u32>) -> Self {
        Self(self.0.intersection(weeks).copied().collect())
    }
}

impl FromIterator<u32> for CompletionSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
