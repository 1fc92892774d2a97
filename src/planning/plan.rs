//! Plan representation and per-trial records

use crate::puzzle::{Action, Board};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Result of a single plan-length trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialStatus {
    Satisfiable,
    Unsatisfiable,
    TimedOut,
}

/// What happened when one plan length was encoded and solved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialReport {
    pub plan_length: usize,
    pub variables: usize,
    pub clauses: usize,
    pub status: TrialStatus,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

/// A solution found by the planner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Initial board the plan starts from
    pub initial: Board,
    /// Moves of the blank, NoOps removed
    pub actions: Vec<Action>,
    /// Plan-length bound at which the encoding was first satisfiable
    pub bound: usize,
    /// Boards decoded from the model at each step `0..=bound`
    pub states: Vec<Board>,
    /// Every trial run, in order
    pub trials: Vec<TrialReport>,
    /// False if a shorter length timed out and was never decided
    pub proven_minimal: bool,
}

impl Plan {
    /// Number of real moves
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Total time spent across all trials
    pub fn total_time(&self) -> Duration {
        self.trials.iter().map(|t| t.elapsed).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.actions.is_empty() {
            return write!(f, "(already solved)");
        }
        let names: Vec<String> = self.actions.iter().map(|a| a.to_string()).collect();
        write!(f, "{}", names.join(" -> "))
    }
}

/// Final result of the planning loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    Found(Plan),
    /// Every length up to the maximum was unsatisfiable or timed out
    Exhausted {
        max_plan_length: usize,
        trials: Vec<TrialReport>,
    },
}

impl PlanOutcome {
    pub fn plan(&self) -> Option<&Plan> {
        match self {
            PlanOutcome::Found(plan) => Some(plan),
            PlanOutcome::Exhausted { .. } => None,
        }
    }

    pub fn into_plan(self) -> Option<Plan> {
        match self {
            PlanOutcome::Found(plan) => Some(plan),
            PlanOutcome::Exhausted { .. } => None,
        }
    }

    pub fn trials(&self) -> &[TrialReport] {
        match self {
            PlanOutcome::Found(plan) => &plan.trials,
            PlanOutcome::Exhausted { trials, .. } => trials,
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
