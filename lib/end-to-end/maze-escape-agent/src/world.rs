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

//! The game itself: a bot somewhere in a maze, facing some way, seeing only a small window.

use intelligent_agents::Environment;
use log::debug;
use maze_escape_logic::{Cell, Coord, Direction, Grid, MazeError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    Running,
    Escaped,
    Crashed,
}

#[derive(Debug, Clone)]
pub struct MazeWorld {
    /// The maze with the bot drawn in.
    maze: Grid,
    position: Coord,
    facing: Direction,
    radius: usize,
    outcome: Outcome,
}

impl MazeWorld {
    /// Start the bot on an open square of `maze`. Any bot marker already in the maze becomes open
    /// floor.
    pub fn new(mut maze: Grid, position: Coord, facing: Direction) -> Result<Self, MazeError> {
        maze.replace(Cell::Agent, Cell::Open);
        if maze.get(position)?.value != Cell::Open {
            return Err(MazeError::InvalidTarget(format!(
                "cannot start on {}, it is not open floor",
                position
            )));
        }
        maze.set(position, Cell::Agent)?;
        Ok(Self {
            maze,
            position,
            facing,
            radius: 1,
            outcome: Outcome::Running,
        })
    }

    /// Start where the maze's bot marker is, facing up.
    pub fn from_marked(maze: Grid) -> Result<Self, MazeError> {
        let position = maze.agent()?;
        Self::new(maze, position, Direction::Up)
    }

    /// Start on a random open square with a random facing.
    pub fn random_start<R: Rng>(maze: Grid, rng: &mut R) -> Result<Self, MazeError> {
        let (position, facing) = Self::starts(&maze)
            .choose(rng)
            .copied()
            .ok_or_else(|| MazeError::InvalidTarget("maze has no open floor".to_string()))?;
        Self::new(maze, position, facing)
    }

    /// Every open square with every facing.
    pub fn starts(maze: &Grid) -> Vec<(Coord, Direction)> {
        maze.filter(|cell| matches!(cell.value, Cell::Open | Cell::Agent))
            .flat_map(|cell| Direction::ALL.into_iter().map(move |facing| (cell.coord, facing)))
            .collect()
    }

    /// How far the bot sees in each direction. Defaults to 1, a 3x3 window.
    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// The maze with the bot drawn in, in absolute orientation. Once escaped the bot stands on
    /// the exit square.
    pub fn render(&self) -> Grid {
        self.maze.fork()
    }
}

impl Environment for MazeWorld {
    /// A move relative to the bot's facing.
    type Action = Direction;

    /// Turn input: the radius line, then the window turned so the bot faces up.
    type Percept = String;

    type Score = i32;

    fn percept(&self) -> Self::Percept {
        let window = self
            .maze
            .window(self.position, self.radius, Cell::Wall)
            .rotated(self.facing, false);
        format!("{}\n{}", self.radius, window)
    }

    fn execute_action(&mut self, action: &Self::Action) {
        if self.is_terminal() {
            return;
        }
        let heading = self.facing.turn(*action);
        let next = self.position.step(heading);
        let escaping = match self.maze.get(next).map(|cell| cell.value) {
            Ok(Cell::Exit) => true,
            Ok(Cell::Open) => false,
            _ => {
                debug!("bot at {} crashed moving {} into {}", self.position, heading, next);
                self.outcome = Outcome::Crashed;
                return;
            }
        };
        match self.maze.move_cell(self.position, heading, Cell::Open) {
            Ok(landing) => {
                self.position = landing;
                self.facing = heading;
                if escaping {
                    self.outcome = Outcome::Escaped;
                }
            }
            Err(err) => {
                debug!("bot at {} crashed: {}", self.position, err);
                self.outcome = Outcome::Crashed;
            }
        }
    }

    fn is_terminal(&self) -> bool {
        self.outcome != Outcome::Running
    }

    fn score(&self) -> Self::Score {
        match self.outcome {
            Outcome::Running => 0,
            Outcome::Escaped => 1,
            Outcome::Crashed => -1,
        }
    }
}
