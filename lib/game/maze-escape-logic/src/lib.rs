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

#![warn(missing_docs)]

//! Maze escape game logic.
//!
//! The maze is a text grid of walls `#`, open squares `-`, the exit `e` and the bot `b`. The bot
//! only ever sees a small window around itself, always turned so that the direction it last moved
//! in is "up". This library holds the pieces needed to turn those windows into a map and to plan
//! on it:
//!
//! - [`Grid`] is the character map, with [`Coord`], [`Direction`] and [`Cell`].
//! - [`rotation`] turns grids between the four orientations.
//! - [`Observation`] parses one turn's input.
//! - [`merge`] folds a window into the map built so far, growing the map when needed.
//! - [`search`] finds shortest paths with a breadth-first search.

pub mod grid;
pub mod merge;
pub mod observation;
pub mod rotation;
pub mod search;

pub use grid::{Cell, Coord, Destination, Dimensions, Direction, Grid, GridCell, Target};
pub use merge::{merge, MergeReport};
pub use observation::Observation;
pub use rotation::rotate;
pub use search::{distances_from, find_nearest, find_path, find_path_from};

/// Maze escape error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    /// A row of the grid text has a different length from the first row.
    #[error("malformed grid: row {row} has {found} columns, expected {expected}")]
    MalformedGrid {
        /// Zero-based index of the offending row, counting only non-empty lines.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },

    /// The grid text has no non-empty lines.
    #[error("grid is empty")]
    EmptyGrid,

    /// A character outside the maze alphabet.
    #[error("unknown cell character: {0:?}")]
    UnknownCell(char),

    /// A coordinate outside the grid, or a move into a wall.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// The grid has no bot marker.
    #[error("grid has no agent marker 'b'")]
    MissingAgent,

    /// The turn input does not have the expected header lines.
    #[error("malformed observation: {0}")]
    MalformedObservation(String),

    /// Not one of UP, DOWN, LEFT, RIGHT.
    #[error("unknown direction: {0:?}")]
    UnknownDirection(String),
}
