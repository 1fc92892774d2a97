//! Main CLI application for the 8-puzzle SAT planner

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use eight_puzzle_sat::{
    config::{settings::MAX_ALLOWED_PLAN_LENGTH, CliOverrides, OutputFormat, Settings},
    planning::{PlanOutcome, PlanVerifier, Planner},
    puzzle::{create_example_boards, load_board_from_file, parse_actions, rng_from_seed, scramble, Board},
    sat::PlanEncoder,
    utils::{ColorOutput, PlanFormatter},
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eight_puzzle_sat")]
#[command(about = "8-puzzle solver using bounded SAT planning")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scramble (or load) a board and search for the shortest plan
    Solve(SolveArgs),

    /// Create example configuration and board files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Replay a move sequence on a board
    Verify {
        /// Initial board file
        #[arg(short, long)]
        initial: PathBuf,

        /// Moves, e.g. "Left,Up"
        #[arg(short, long)]
        plan: String,
    },

    /// Show encoding statistics for one plan length
    Analyze {
        /// Plan-length bound to encode
        #[arg(short, long, default_value_t = 1)]
        bound: usize,

        /// Initial board file (goal board if omitted)
        #[arg(short, long)]
        initial: Option<PathBuf>,

        /// Write the formula as DIMACS CNF
        #[arg(long)]
        dimacs: Option<PathBuf>,

        /// Leave out clauses forbidding off-board moves
        #[arg(long)]
        allow_illegal_moves: bool,
    },
}

#[derive(clap::Args, Default)]
struct SolveArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.yaml")]
    config: PathBuf,

    /// Initial board file (overrides scrambling)
    #[arg(short, long)]
    initial: Option<PathBuf>,

    /// Number of random scramble moves (overrides config)
    #[arg(short, long)]
    scramble_moves: Option<usize>,

    /// Seed for the scrambler
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum plan length to try (overrides config)
    #[arg(short, long)]
    max_length: Option<usize>,

    /// Per-trial solver timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Solve(args)) => solve_command(args),
        None => solve_command(SolveArgs {
            config: PathBuf::from("config/default.yaml"),
            ..SolveArgs::default()
        }),
        Some(Commands::Setup { directory, force }) => setup_command(directory, force),
        Some(Commands::Verify { initial, plan }) => verify_command(initial, plan),
        Some(Commands::Analyze {
            bound,
            initial,
            dimacs,
            allow_illegal_moves,
        }) => analyze_command(bound, initial, dimacs, allow_illegal_moves),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load_settings(config_path: &PathBuf) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        tracing::debug!("Config file {} not found, using defaults", config_path.display());
        Ok(Settings::default())
    }
}

fn solve_command(args: SolveArgs) -> Result<ExitCode> {
    let mut settings = load_settings(&args.config)?;
    settings.merge_with_cli(&CliOverrides {
        scramble_moves: args.scramble_moves,
        seed: args.seed,
        max_plan_length: args.max_length,
        trial_timeout_seconds: args.timeout,
        initial_state_file: args.initial.clone(),
        format: args.format,
    });
    settings.validate().context("Configuration validation failed")?;

    let initial = match settings.input.initial_state_file {
        Some(ref path) => load_board_from_file(path)
            .with_context(|| format!("Failed to load initial board from {}", path.display()))?,
        None => {
            let mut rng = rng_from_seed(settings.scramble.seed);
            let (board, _) = scramble(settings.scramble.moves, &mut rng);
            board
        }
    };
    let text = settings.output.format == OutputFormat::Text;

    if text {
        println!("{}", ColorOutput::info("Starting 8-puzzle SAT planner"));
        println!(
            "{}",
            PlanFormatter::format_side_by_side(&[("Initial", &initial), ("Goal", &Board::goal())])
        );
    }

    let planner = Planner::new(settings.planner_config());
    let outcome = planner.solve(&initial).context("SAT planning failed")?;

    let plan = match outcome {
        PlanOutcome::Found(plan) => plan,
        PlanOutcome::Exhausted { max_plan_length, trials } => {
            if text {
                println!("{}", PlanFormatter::format_trials(&trials));
                println!(
                    "{}",
                    ColorOutput::error(&format!("No solution found within {} moves", max_plan_length))
                );
            } else {
                let report = serde_json::json!({
                    "initial": initial,
                    "solved": false,
                    "max_plan_length": max_plan_length,
                    "trials": trials,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    let verification = PlanVerifier::new().verify(&initial, &plan.actions);

    if text {
        println!("{}", PlanFormatter::format_plan(&plan));
        if settings.output.show_replay {
            println!("Verifying solution:");
            println!("{}", PlanFormatter::format_replay(&plan.actions, &verification));
        }
        if verification.is_valid {
            println!("{}", ColorOutput::success("✓ Solution verified"));
        } else {
            println!("{}", ColorOutput::error("✗ Solution failed verification"));
        }
    } else {
        let report = serde_json::json!({
            "solved": true,
            "plan": plan,
            "verification": verification,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(if verification.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn setup_command(directory: PathBuf, force: bool) -> Result<ExitCode> {
    println!("{}", ColorOutput::info("Setting up project structure"));

    let config_path = directory.join("config/default.yaml");
    if config_path.exists() && !force {
        println!(
            "{}",
            ColorOutput::warning(&format!(
                "{} already exists, use --force to overwrite",
                config_path.display()
            ))
        );
    } else {
        Settings::default().to_file(&config_path)?;
        println!("Created {}", config_path.display());
    }

    let boards_dir = directory.join("input/boards");
    create_example_boards(&boards_dir)?;
    println!("Created example boards in {}", boards_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("Run: cargo run -- solve --initial {}", boards_dir.join("three_moves.txt").display());

    Ok(ExitCode::SUCCESS)
}

fn verify_command(initial_path: PathBuf, plan: String) -> Result<ExitCode> {
    let initial = load_board_from_file(&initial_path)
        .with_context(|| format!("Failed to load initial board from {}", initial_path.display()))?;
    let actions = parse_actions(&plan).map_err(anyhow::Error::msg).context("Invalid plan")?;

    let result = PlanVerifier::new().verify(&initial, &actions);
    println!("{}", PlanFormatter::format_replay(&actions, &result));
    println!("{}", result);

    if result.is_valid {
        println!("{}", ColorOutput::success("✓ Plan reaches the goal"));
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", ColorOutput::error("✗ Plan is invalid"));
        Ok(ExitCode::FAILURE)
    }
}

fn analyze_command(
    bound: usize,
    initial_path: Option<PathBuf>,
    dimacs: Option<PathBuf>,
    allow_illegal_moves: bool,
) -> Result<ExitCode> {
    if bound > MAX_ALLOWED_PLAN_LENGTH {
        bail!(
            "Plan length {} exceeds the maximum of {}",
            bound,
            MAX_ALLOWED_PLAN_LENGTH
        );
    }

    let initial = match initial_path {
        Some(ref path) => load_board_from_file(path)?,
        None => Board::goal(),
    };

    println!("Initial board:");
    println!("{}", PlanFormatter::format_board(&initial));
    println!("Blank distance from its goal cell: {}\n", initial.blank_distance());

    let encoder = PlanEncoder::new(initial, !allow_illegal_moves);
    let problem = encoder.encode(bound).context("Encoding failed")?;
    println!("{}", problem.statistics);

    if let Some(path) = dimacs {
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        problem
            .write_dimacs(std::io::BufWriter::new(file))
            .with_context(|| format!("Failed to write DIMACS to {}", path.display()))?;
        println!("Wrote DIMACS formula to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "eight_puzzle_sat",
            "solve",
            "--scramble-moves",
            "5",
            "--max-length",
            "8",
            "--format",
            "json",
        ]);
        assert!(cli.is_ok());

        let bare = Cli::try_parse_from(["eight_puzzle_sat"]).unwrap();
        assert!(bare.command.is_none());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("input/boards/two_moves.txt").exists());
    }

    #[test]
    fn test_analyze_writes_dimacs() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("plan.cnf");
        analyze_command(1, None, Some(path.clone()), false).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.lines().any(|l| l.starts_with("p cnf 167 ")));
    }

    #[test]
    fn test_analyze_rejects_oversized_bound() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("plan.cnf");
        let result = analyze_command(MAX_ALLOWED_PLAN_LENGTH + 1, None, Some(path.clone()), false);

        assert!(result.is_err());
        assert!(!path.exists());
        assert!(analyze_command(0, None, None, false).is_ok());
    }
}
