use anyhow::{Context, Result};
use clap::Parser;
use neatling_core::config::NeatConfig;
use neatling_lib::app::Evolution;
use neatling_lib::model::task::XorTask;

#[derive(Parser, Debug)]
#[command(author, version, about = "Evolve XOR networks with NEAT", long_about = None)]
struct Args {
    /// Config file path; defaults are written there when it is missing
    #[arg(short, long)]
    config: Option<String>,

    /// Override the number of generations to run
    #[arg(short, long)]
    generations: Option<u32>,

    /// Override the random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the champion genome as hex when the run ends
    #[arg(long)]
    dump_champion: bool,

    /// Print per-generation reports as JSON lines
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    neatling_core::init_logging();

    let mut config = match &args.config {
        Some(path) => NeatConfig::load(path).with_context(|| format!("loading config {path}"))?,
        None => XorTask::config(),
    };
    if let Some(generations) = args.generations {
        config.evolution.generations = generations;
    }
    if let Some(seed) = args.seed {
        config.evolution.seed = Some(seed);
    }

    let mut evolution = Evolution::new(config)?;
    let reports = evolution.run(&XorTask)?;

    if args.json {
        for report in &reports {
            println!("{}", serde_json::to_string(report)?);
        }
    }

    match (reports.last(), evolution.champion()) {
        (Some(last), Some(champion)) => {
            println!(
                "{} after {} generation(s): champion {} with fitness {:.4}",
                if last.solved { "Solved" } else { "Stopped" },
                reports.len(),
                champion.id,
                champion.fitness
            );
            if args.dump_champion {
                println!("{}", champion.to_hex()?);
            }
        }
        _ => println!("No generations were run."),
    }

    Ok(())
}
