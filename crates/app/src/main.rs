//! linksim: run the classroom network scenarios.

mod config;
mod render;
mod scenarios;

use clap::Parser;
use config::{Cli, Config, Scenario};
use linksim_core::medium::RandomConditions;
use linksim_core::metrics::Metrics;
use log::info;
use scenarios::Outcome;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = Config::from_cli(Cli::parse())?;
    if config.print_config {
        config.print();
    }

    let mut conditions = RandomConditions::new(config.conditions)?;
    let mut metrics = Metrics::new();

    if config.runs(Scenario::Physical) {
        println!("\n--- Physical Layer ---");
        report(&config, scenarios::physical())?;
    }
    if config.runs(Scenario::Datalink) {
        println!("\n--- Data Link Layer ---");
        report(&config, scenarios::datalink(&config, &mut conditions, &mut metrics)?)?;
    }
    if config.runs(Scenario::Extended) {
        println!("\n--- Extended Network with Two Star Topologies ---");
        report(&config, scenarios::extended(&mut conditions, &mut metrics)?)?;
    }
    if config.runs(Scenario::Bridge) {
        println!("\n--- Bridge Between Two Segments ---");
        report(&config, scenarios::bridge(&mut conditions, &mut metrics)?)?;
    }

    metrics.complete();
    let stats = conditions.stats();
    info!(
        "Link conditions drew {} collision checks ({:.1}% hit), {} ack checks ({:.1}% acked)",
        stats.attempts,
        stats.collision_rate() * 100.0,
        stats.ack_draws,
        stats.ack_rate() * 100.0
    );

    if config.print_metrics {
        metrics.print_summary();
    }

    Ok(())
}

/// Print domain counts and write the DOT file if requested.
fn report(config: &Config, outcome: Outcome) -> linksim_core::Result<()> {
    let topology = &outcome.topology;
    println!("{}", outcome.title);
    println!(
        "Nodes: {}  Links: {}",
        topology.nodes().len(),
        topology.links().len()
    );
    println!("Total Broadcast Domains: {}", topology.broadcast_domains());
    println!("Total Collision Domains: {}", topology.collision_domains());

    if let Some(dir) = &config.dot_dir {
        let path = render::write_dot(dir, outcome.file_stem, outcome.title, topology)?;
        info!("Topology written to {}", path.display());
    }
    Ok(())
}
