//! Display and output formatting utilities

use crate::planning::{Plan, TrialReport, TrialStatus, VerificationResult};
use crate::puzzle::{Action, Board, BLANK};

/// Format boards, plans and replays for display
pub struct PlanFormatter;

impl PlanFormatter {
    /// Format a board as three rows, blank shown as `·`
    pub fn format_board(board: &Board) -> String {
        let mut output = String::new();
        for row in board.rows() {
            let cells: Vec<String> = row
                .iter()
                .map(|&tile| {
                    if tile == BLANK {
                        "·".to_string()
                    } else {
                        tile.to_string()
                    }
                })
                .collect();
            output.push_str(&cells.join(" "));
            output.push('\n');
        }
        output
    }

    /// Format several boards next to each other with a caption above each
    pub fn format_side_by_side(boards: &[(&str, &Board)]) -> String {
        let width = boards.iter().map(|(caption, _)| caption.chars().count()).max().unwrap_or(0).max(5);
        let mut output = String::new();

        let captions: Vec<String> = boards.iter().map(|(c, _)| format!("{:<width$}", c, width = width)).collect();
        output.push_str(captions.join("   ").trim_end());
        output.push('\n');

        let rendered: Vec<Vec<String>> = boards
            .iter()
            .map(|(_, board)| Self::format_board(board).lines().map(str::to_string).collect())
            .collect();
        for row in 0..rendered.first().map_or(0, Vec::len) {
            let line: Vec<String> = rendered
                .iter()
                .map(|lines| format!("{:<width$}", lines[row], width = width))
                .collect();
            output.push_str(line.join("   ").trim_end());
            output.push('\n');
        }
        output
    }

    /// `Left -> Up -> ...`
    pub fn format_actions(actions: &[Action]) -> String {
        if actions.is_empty() {
            return "(no moves)".to_string();
        }
        actions.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(" -> ")
    }

    /// One line per trial
    pub fn format_trials(trials: &[TrialReport]) -> String {
        let mut output = String::new();
        output.push_str("Length | Variables | Clauses | Result        | Time(ms)\n");
        output.push_str("-------|-----------|---------|---------------|---------\n");
        for trial in trials {
            let status = match trial.status {
                TrialStatus::Satisfiable => "satisfiable",
                TrialStatus::Unsatisfiable => "unsatisfiable",
                TrialStatus::TimedOut => "timed out",
            };
            output.push_str(&format!(
                "{:6} | {:9} | {:7} | {:13} | {:8}\n",
                trial.plan_length,
                trial.variables,
                trial.clauses,
                status,
                trial.elapsed.as_millis()
            ));
        }
        output
    }

    /// Summary of a found plan
    pub fn format_plan(plan: &Plan) -> String {
        let mut output = String::new();
        output.push_str("Move sequence:\n");
        output.push_str(&Self::format_actions(&plan.actions));
        output.push('\n');
        output.push_str(&format!("Total moves: {}\n", plan.len()));
        output.push_str(&format!(
            "Search time: {:.3}s over {} trials\n",
            plan.total_time().as_secs_f64(),
            plan.trials.len()
        ));
        if !plan.proven_minimal {
            output.push_str("Note: a shorter length timed out, the plan may not be minimal\n");
        }
        output
    }

    /// Step-by-step replay of a verification
    pub fn format_replay(actions: &[Action], result: &VerificationResult) -> String {
        let mut output = String::new();
        for (i, board) in result.replay.iter().enumerate() {
            if i == 0 {
                output.push_str("Initial state:\n");
            } else {
                output.push_str(&format!("Step {}: move {}\n", i, actions[i - 1]));
            }
            output.push_str(&Self::format_board(board));
            output.push('\n');
        }
        if let Some(failure) = &result.failure {
            output.push_str(&format!("Replay failed: {}\n", failure));
        }
        output
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
