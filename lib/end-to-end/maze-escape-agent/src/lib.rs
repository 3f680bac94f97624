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

//! The maze escape bot, end to end.
//!
//! Each turn the [`TurnController`] loads the map it saved last turn, merges the new window into
//! it and picks a move: straight for the exit when the map already shows a route, otherwise the
//! move the [`Localizer`] rates best against the known master maze, otherwise towards the nearest
//! unexplored square. [`MazeWorld`] plays the part of the game so the bot can be run and scored
//! in-process.

pub mod agent;
pub mod config;
pub mod controller;
pub mod localizer;
pub mod scoring;
pub mod state;
pub mod world;

pub use agent::MazeEscapeAgent;
pub use config::{AgentConfig, ConfigError, ScoringConfig};
pub use controller::{Decision, Turn, TurnController};
pub use localizer::{Candidate, Localization, Localizer};
pub use scoring::{MoveScorer, MoveTally, WeightedScorer};
pub use state::AccumulatedState;
pub use world::{MazeWorld, Outcome};

use maze_escape_logic::MazeError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error(transparent)]
    Maze(#[from] MazeError),

    /// Every neighbouring square is a wall or unknown.
    #[error("boxed in: no move is valid from the current position")]
    BoxedIn,

    #[error("malformed saved state: {0}")]
    MalformedState(String),
}
