//! Plan search, extraction and verification

pub mod extractor;
pub mod plan;
pub mod planner;
pub mod verifier;

pub use extractor::{decode_board, decode_boards, extract_actions};
pub use plan::{Plan, PlanOutcome, TrialReport, TrialStatus};
pub use planner::{Planner, PlannerConfig};
pub use verifier::{PlanVerifier, VerificationResult};
