//! Configuration for the linksim driver.
//!
//! Handles parsing command-line arguments and resolving defaults (seeded so
//! every run can be reproduced).
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments. The seed is printed with the
//! resolved configuration so any run can be replayed with `--seed`.

use clap::{Parser, ValueEnum};
use linksim_core::error::{Error, Result};
use linksim_core::flow_control::DEFAULT_WINDOW;
use linksim_core::medium::{ConditionsConfig, ACK_PROBABILITY, COLLISION_PROBABILITY};
use std::path::PathBuf;

/// Which classroom scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Point-to-point connection and a six-port hub
    Physical,
    /// Five devices on a switch: parity, CSMA/CD, sliding window
    Datalink,
    /// Two hub stars joined by a switch
    Extended,
    /// A bridge between two segments
    Bridge,
    /// Everything, in order
    All,
}

/// Command-line interface.
#[derive(Debug, Parser)]
#[command(name = "linksim", version, about = "Teaching model of a physical + data-link network")]
pub struct Cli {
    /// Scenario to run
    #[arg(long, value_enum, default_value_t = Scenario::All)]
    pub scenario: Scenario,

    /// Random seed for determinism (default: time-based)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sliding window size
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,

    /// Collision probability per CSMA/CD attempt
    #[arg(long, default_value_t = COLLISION_PROBABILITY)]
    pub collision_probability: f64,

    /// Probability that a window is acknowledged
    #[arg(long, default_value_t = ACK_PROBABILITY)]
    pub ack_probability: f64,

    /// Bit-string payload gated by parity and sent through CSMA/CD
    #[arg(long, default_value = "1010101")]
    pub payload: String,

    /// Bit string transferred with the sliding window, one bit per frame
    #[arg(long, default_value = "110011001100")]
    pub frames: String,

    /// Characters per sliding-window frame
    #[arg(long, default_value_t = 1)]
    pub frame_len: usize,

    /// Write each scenario's topology as Graphviz DOT into this directory
    #[arg(long)]
    pub dot: Option<PathBuf>,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Don't print metrics summary
    #[arg(long)]
    pub no_metrics: bool,
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scenario selection
    pub scenario: Scenario,

    /// Collision / acknowledgment model
    pub conditions: ConditionsConfig,

    /// Sliding window size
    pub window: usize,

    /// Payload for the parity + CSMA/CD step
    pub payload: String,

    /// Sliding-window frames
    pub frames: Vec<String>,

    /// DOT output directory (None = no rendering)
    pub dot_dir: Option<PathBuf>,

    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Resolve parsed arguments into a configuration.
    ///
    /// # Errors
    /// `Error::InvalidWindow` or `Error::InvalidProbability` for values that
    /// would make a protocol loop unable to finish.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let seed = cli.seed.unwrap_or_else(time_seed);

        if cli.window == 0 {
            return Err(Error::InvalidWindow(cli.window));
        }

        let conditions = ConditionsConfig {
            collision_probability: cli.collision_probability,
            ack_probability: cli.ack_probability,
            seed,
        };
        conditions.validate()?;

        if cli.frame_len == 0 {
            return Err(Error::Config("--frame-len must be at least 1".to_string()));
        }

        Ok(Config {
            scenario: cli.scenario,
            conditions,
            window: cli.window,
            frames: linksim_core::flow_control::segment(&cli.frames, cli.frame_len),
            payload: cli.payload,
            dot_dir: cli.dot,
            print_config: cli.print_config,
            print_metrics: !cli.no_metrics,
        })
    }

    /// Should `scenario` run under this configuration?
    pub fn runs(&self, scenario: Scenario) -> bool {
        self.scenario == Scenario::All || self.scenario == scenario
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Scenario: {:?}", self.scenario);
        println!("Seed: {}", self.conditions.seed);
        println!();
        println!("=== Link Conditions ===");
        println!("Collision probability: {:.2}", self.conditions.collision_probability);
        println!("Ack probability: {:.2}", self.conditions.ack_probability);
        println!();
        println!("=== Protocols ===");
        println!("Payload: {}", self.payload);
        println!("Window size: {}", self.window);
        println!("Frames: {} ({})", self.frames.len(), self.frames.join(" "));
        println!(
            "DOT output: {}",
            self.dot_dir
                .as_ref()
                .map_or("(none)".to_string(), |p| p.display().to_string())
        );
        println!();
    }
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("linksim").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_cli(parse(&["--seed", "42"])).unwrap();
        assert_eq!(config.scenario, Scenario::All);
        assert_eq!(config.conditions.seed, 42);
        assert_eq!(config.window, 3);
        assert_eq!(config.conditions.collision_probability, 0.2);
        assert_eq!(config.conditions.ack_probability, 0.5);
        assert_eq!(config.frames.len(), 12);
        assert!(config.print_metrics);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_cli(parse(&[
            "--scenario",
            "datalink",
            "--window",
            "2",
            "--frames",
            "1100",
            "--frame-len",
            "2",
            "--no-metrics",
        ]))
        .unwrap();
        assert_eq!(config.scenario, Scenario::Datalink);
        assert_eq!(config.window, 2);
        assert_eq!(config.frames, vec!["11", "00"]);
        assert!(!config.print_metrics);
        assert!(config.runs(Scenario::Datalink));
        assert!(!config.runs(Scenario::Physical));
    }

    #[test]
    fn test_rejects_zero_window() {
        assert!(Config::from_cli(parse(&["--window", "0"])).is_err());
    }

    #[test]
    fn test_rejects_certain_collision() {
        assert!(Config::from_cli(parse(&["--collision-probability", "1.0"])).is_err());
    }
}
