//! Configuration management for the 8-puzzle SAT planner

pub mod settings;

pub use settings::{
    CliOverrides, EncodingConfig, InputConfig, OutputConfig, OutputFormat, ScrambleConfig,
    SearchConfig, Settings,
};
