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

//! The map carried from one turn to the next.
//!
//! Saved as the move that was just emitted followed by the map, in the frame the bot had when it
//! chose that move:
//!
//! ```text
//! RIGHT
//! ###
//! #b-
//! ###
//! ```

use std::str::FromStr;

use maze_escape_logic::{Cell, Direction, Grid};

use crate::TurnError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccumulatedState {
    pub last_move: Direction,
    pub grid: Grid,
}

impl AccumulatedState {
    pub fn new(last_move: Direction, grid: Grid) -> Self {
        Self { last_move, grid }
    }

    pub fn parse(text: &str) -> Result<Self, TurnError> {
        let text = text.trim_start();
        let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
        let last_move = first
            .trim()
            .parse::<Direction>()
            .map_err(|_| TurnError::MalformedState(format!("{:?} is not a move", first.trim())))?;
        if rest.trim().is_empty() {
            return Err(TurnError::MalformedState("no map after the move".to_string()));
        }
        let grid = Grid::from_text(rest)?;
        grid.agent()?;
        Ok(Self { last_move, grid })
    }

    pub fn to_text(&self) -> String {
        format!("{}\n{}", self.last_move, self.grid)
    }

    /// Re-express the map in the frame the bot has after making `moved`: turn it so `moved`
    /// points up, then step the bot one square up, leaving open floor behind.
    pub fn advance(&self, moved: Direction) -> Result<Grid, TurnError> {
        let mut grid = self.grid.rotated(moved, false);
        let agent = grid.agent()?;
        grid.move_cell(agent, Direction::Up, Cell::Open)?;
        Ok(grid)
    }
}

impl std::fmt::Display for AccumulatedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for AccumulatedState {
    type Err = TurnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
