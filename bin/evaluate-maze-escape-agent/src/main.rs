/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

//! Evaluate the maze escape agent.
//!
//! Runs the agent in the simulated maze from every open square with every facing and records
//! how each episode ends, in the spirit of AIMA chapter 2 exercise 12. With `--seed` a single
//! random episode is played instead, and `--replay` writes every percept and move of it to a
//! JSON file.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use intelligent_agents::{Simulation, Step};
use log::{info, warn};
use maze_escape_agent::{
    AgentConfig, Localizer, MazeEscapeAgent, MazeWorld, Outcome, TurnController, TurnError,
    WeightedScorer,
};
use maze_escape_logic::{Coord, Direction, Grid};
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "evaluate-maze-escape-agent",
    about = "Run the maze escape agent from every start and report how it does",
    version
)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Master maze layout, overriding the configuration file
    #[arg(short, long)]
    master: Option<PathBuf>,

    /// Moves allowed per episode, overriding the configuration file
    #[arg(long)]
    max_moves: Option<u32>,

    /// How far the bot sees in each direction
    #[arg(long, default_value_t = 1)]
    radius: usize,

    /// Play one episode from a random start chosen with this seed
    #[arg(long)]
    seed: Option<u64>,

    /// Write the seeded episode's percepts and moves to this JSON file
    #[arg(long, requires = "seed")]
    replay: Option<PathBuf>,
}

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ending {
    Escaped,
    Crashed,
    TimedOut,
    Failed,
}

#[derive(Debug, Clone, Copy)]
struct Episode {
    position: Coord,
    facing: Direction,
    ending: Ending,
    steps: i32,
}

#[derive(Serialize)]
struct Replay<'a> {
    position: Coord,
    facing: Direction,
    outcome: Outcome,
    error: Option<String>,
    steps: &'a [Step<String, Direction>],
}

fn agent(master: &Grid, config: &AgentConfig) -> MazeEscapeAgent {
    let localizer = Localizer::new(master.clone(), WeightedScorer::from(config.scoring));
    MazeEscapeAgent::from_controller(TurnController::with_localizer(localizer))
}

fn ending(result: &Result<(), TurnError>, outcome: Outcome) -> Ending {
    match (result, outcome) {
        (Err(_), _) => Ending::Failed,
        (Ok(()), Outcome::Escaped) => Ending::Escaped,
        (Ok(()), Outcome::Crashed) => Ending::Crashed,
        (Ok(()), Outcome::Running) => Ending::TimedOut,
    }
}

fn run_episode(world: MazeWorld, master: &Grid, config: &AgentConfig) -> Episode {
    let position = world.position();
    let facing = world.facing();
    let mut simulation = Simulation::new(world, agent(master, config), config.max_moves as i32);
    let result = simulation.run();
    if let Err(err) = &result {
        warn!("agent failed starting at {} facing {}: {}", position, facing, err);
    }
    Episode {
        position,
        facing,
        ending: ending(&result, simulation.environment().outcome()),
        steps: simulation.steps_taken(),
    }
}

fn evaluate_all(master: &Grid, config: &AgentConfig, radius: usize) -> anyhow::Result<()> {
    let starts = MazeWorld::starts(master);
    if starts.is_empty() {
        bail!("the master maze has no open floor to start from");
    }
    info!("running {} episodes of up to {} moves", starts.len(), config.max_moves);

    let episodes = starts
        .par_iter()
        .map(|(position, facing)| {
            MazeWorld::new(master.clone(), *position, *facing)
                .map(|world| run_episode(world.with_radius(radius), master, config))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let count = |ending: Ending| episodes.iter().filter(|e| e.ending == ending).count();
    for episode in episodes.iter().filter(|e| e.ending != Ending::Escaped) {
        info!(
            "{:?} starting at {} facing {} after {} moves",
            episode.ending, episode.position, episode.facing, episode.steps
        );
    }

    let escaped: Vec<&Episode> = episodes
        .iter()
        .filter(|e| e.ending == Ending::Escaped)
        .collect();
    let mean_steps = if escaped.is_empty() {
        0.0
    } else {
        escaped.iter().map(|e| e.steps as f64).sum::<f64>() / escaped.len() as f64
    };

    println!("episodes: {}", episodes.len());
    println!("escaped: {}", escaped.len());
    println!("crashed: {}", count(Ending::Crashed));
    println!("timed out: {}", count(Ending::TimedOut));
    println!("failed: {}", count(Ending::Failed));
    println!("mean moves to escape: {:.2}", mean_steps);
    Ok(())
}

fn evaluate_seeded(
    master: &Grid,
    config: &AgentConfig,
    radius: usize,
    seed: u64,
    replay: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
    let world = MazeWorld::random_start(master.clone(), &mut rng)?.with_radius(radius);
    let position = world.position();
    let facing = world.facing();
    info!("seed {} starts at {} facing {}", seed, position, facing);

    let mut simulation =
        Simulation::new(world, agent(master, config), config.max_moves as i32).with_history();
    let result = simulation.run();
    let outcome = simulation.environment().outcome();

    println!("start: {} facing {}", position, facing);
    println!(
        "ending: {:?} after {} moves",
        ending(&result, outcome),
        simulation.steps_taken()
    );
    println!("{}", simulation.environment().render());

    if let Some(path) = replay {
        let replay = Replay {
            position,
            facing,
            outcome,
            error: result.as_ref().err().map(|err| err.to_string()),
            steps: simulation.history(),
        };
        let json = serde_json::to_string_pretty(&replay).context("failed to serialise replay")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write replay {}", path.display()))?;
        info!("wrote replay to {}", path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AgentConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AgentConfig::default(),
    };
    if args.master.is_some() {
        config.master = args.master;
    }
    if let Some(max_moves) = args.max_moves {
        config.max_moves = max_moves;
    }
    let master = config
        .load_master()
        .context("failed to load master maze")?
        .context("no master maze given, use --master or set master in the config")?;

    match args.seed {
        Some(seed) => evaluate_seeded(&master, &config, args.radius, seed, args.replay),
        None => evaluate_all(&master, &config, args.radius),
    }
}
