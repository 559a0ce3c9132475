//! Cave Simulation
//!
//! Headless run of the cave monster against a scripted player. Every state
//! change is logged as it happens and a summary is printed at the end.
//!
//! Run with: cargo run -p cave_sim -- [scenario.json]
//!       or: CAVE_SIM_CONFIG=scenario.json RUST_LOG=debug cargo run -p cave_sim

mod config;
mod error;
mod player;
mod stage;

use config::SimConfig;
use error::Result;
use stage::Stage;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = SimConfig::load()?;
    log::info!("Scenario: {}", config.summary());

    let mut stage = Stage::new(&config)?;
    stage.start();
    stage.run(config.duration, config.tick_rate);

    print_summary(&stage);
    Ok(())
}

fn print_summary(stage: &Stage) {
    let brain = stage.brain();
    let stats = stage.stats();

    println!();
    println!("=== Cave simulation summary ===");
    println!("  Simulated time:  {:.2}s ({} ticks)", stage.time(), stats.ticks);
    println!("  Final state:     {}", brain.current_state());
    println!("  Rage:            {:.1}", brain.rage());
    println!("  State changes:   {}", stats.state_changes);
    println!("  Rage overflows:  {}", stats.rage_full_signals);
    println!("  Player noises:   {}", stats.noises);
    for state in cave_ai::StateId::ALL {
        println!("  Entered {:<14} {}", format!("{state}:"), stats.times_entered(state));
    }
    println!(
        "  Player:          {} ({})",
        stage.player().position(),
        if stage.player().is_hidden() { "hidden" } else { "exposed" }
    );
}
