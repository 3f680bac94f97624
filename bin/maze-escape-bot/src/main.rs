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

//! One turn of the maze escape bot.
//!
//! Reads the observation from stdin, loads the map saved by the previous turn, and prints the
//! chosen move (`UP`, `DOWN`, `LEFT` or `RIGHT`) to stdout. The game runs the binary once per
//! move, so everything it learns in between lives in the state file.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use maze_escape_agent::{AgentConfig, TurnController};

#[derive(Parser, Debug)]
#[command(name = "maze-escape-bot", about = "Play one turn of the maze escape game", version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Master maze layout, overriding the configuration file
    #[arg(short, long)]
    master: Option<PathBuf>,

    /// Where the map is kept between turns
    #[arg(short, long, default_value = "maze-escape.state")]
    state: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AgentConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AgentConfig::default(),
    };
    if args.master.is_some() {
        config.master = args.master;
    }
    let controller = TurnController::from_config(&config).context("failed to load master maze")?;

    let mut observation = String::new();
    std::io::stdin()
        .read_to_string(&mut observation)
        .context("failed to read observation from stdin")?;

    let previous = if args.state.exists() {
        Some(
            std::fs::read_to_string(&args.state)
                .with_context(|| format!("failed to read state {}", args.state.display()))?,
        )
    } else {
        info!("no state at {}, starting a new map", args.state.display());
        None
    };

    let turn = controller
        .take_turn(&observation, previous.as_deref())
        .context("failed to choose a move")?;
    debug!("{:?}", turn.decision);

    std::fs::write(&args.state, &turn.state)
        .with_context(|| format!("failed to write state {}", args.state.display()))?;
    println!("{}", turn.direction);
    Ok(())
}
