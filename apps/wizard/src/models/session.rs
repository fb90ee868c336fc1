use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared experience level for the target role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Student,
    Junior,
    Mid,
    Senior,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Student => "student",
            Level::Junior => "junior",
            Level::Mid => "mid",
            Level::Senior => "senior",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown level '{0}' (expected student, junior, mid or senior)")]
pub struct UnknownLevel(pub String);

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Level::Student),
            "junior" => Ok(Level::Junior),
            "mid" => Ok(Level::Mid),
            "senior" => Ok(Level::Senior),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}

/// The user's declared target role and level, shared by every wizard step.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionContext {
    pub role: Option<String>,
    pub level: Option<Level>,
}

impl SessionContext {
    pub fn new(role: impl Into<String>, level: Level) -> Self {
        Self {
            role: Some(role.into()),
            level: Some(level),
        }
    }

    /// Role and level, if both are set.
    pub fn committed(&self) -> Option<(&str, Level)> {
        match (&self.role, self.level) {
            (Some(role), Some(level)) => Some((role.as_str(), level)),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.committed().is_some()
    }
}
