//! Independent replay of plans on the puzzle simulator

use crate::error::PlanError;
use crate::puzzle::{Action, Board};
use serde::Serialize;

/// Replays action sequences against a board
#[derive(Debug, Clone, Default)]
pub struct PlanVerifier {
    goal: Board,
}

/// Result of replaying a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub is_valid: bool,
    /// Initial board followed by the board after each applied move
    pub replay: Vec<Board>,
    /// Why the replay failed, if it did
    #[serde(serialize_with = "serialize_failure")]
    pub failure: Option<PlanError>,
}

impl PlanVerifier {
    pub fn new() -> Self {
        Self { goal: Board::goal() }
    }

    /// Replay `actions` from `initial` and check that the goal is reached
    ///
    /// An inapplicable move stops the replay. Neither outcome is an `Err`.
    pub fn verify(&self, initial: &Board, actions: &[Action]) -> VerificationResult {
        let mut replay = vec![*initial];
        let mut current = *initial;

        for (step, &action) in actions.iter().enumerate() {
            match current.apply(action, step) {
                Ok(next) => {
                    current = next;
                    replay.push(current);
                }
                Err(failure) => {
                    tracing::warn!("replay stopped: {}", failure);
                    return VerificationResult {
                        is_valid: false,
                        replay,
                        failure: Some(failure),
                    };
                }
            }
        }

        if current != self.goal {
            tracing::warn!("replay ended {} moves in without reaching the goal", actions.len());
            return VerificationResult {
                is_valid: false,
                replay,
                failure: Some(PlanError::VerificationMismatch),
            };
        }

        VerificationResult {
            is_valid: true,
            replay,
            failure: None,
        }
    }
}

fn serialize_failure<S: serde::Serializer>(
    failure: &Option<PlanError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match failure {
        Some(error) => serializer.serialize_some(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

impl std::fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Verification Result:")?;
        writeln!(f, "  Valid: {}", self.is_valid)?;
        writeln!(f, "  Moves replayed: {}", self.replay.len().saturating_sub(1))?;
        if let Some(failure) = &self.failure {
            writeln!(f, "  Failure: {}", failure)?;
        }
        Ok(())
    }
}
