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

//! Folding a newly observed window into the accumulated map.

use log::trace;

use crate::{Cell, Coord, Direction, Grid, MazeError};

/// What a merge did to the accumulated grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// One entry per row or column of unknown cells added, in the order they were added.
    pub padded: Vec<Direction>,

    /// Number of unknown cells that became known.
    pub revealed: usize,
}

impl MergeReport {
    /// How many rows or columns were added on one side.
    pub fn padded_towards(&self, direction: Direction) -> usize {
        self.padded.iter().filter(|d| **d == direction).count()
    }
}

/// Distance from the bot to the edge of the grid in a direction.
fn margin(grid: &Grid, agent: Coord, direction: Direction) -> usize {
    let (row, col) = (agent.row as usize, agent.col as usize);
    match direction {
        Direction::Up => row,
        Direction::Down => grid.height() - 1 - row,
        Direction::Left => col,
        Direction::Right => grid.width() - 1 - col,
    }
}

/// Merge `window` into `accumulated`, aligning the two on their bot markers.
///
/// The accumulated grid is first padded with unknown cells on every side where the window sees
/// further than the map reaches. Then every unknown accumulated cell under the window takes the
/// window's value. Known cells are never overwritten, so a merge can only add knowledge.
pub fn merge(accumulated: &mut Grid, window: &Grid) -> Result<MergeReport, MazeError> {
    let mut report = MergeReport::default();
    let window_agent = window.agent()?;

    let agent = accumulated.agent()?;

    let pending: Vec<(Direction, usize)> = Direction::ALL
        .iter()
        .filter_map(|&direction| {
            let deficit = margin(window, window_agent, direction)
                .saturating_sub(margin(accumulated, agent, direction));
            (deficit > 0).then_some((direction, deficit))
        })
        .collect();
    for (direction, deficit) in pending {
        for _ in 0..deficit {
            accumulated.pad(direction);
            report.padded.push(direction);
        }
    }

    let offset = accumulated.agent()? - window_agent;
    for cell in window.cells() {
        let target = cell.coord + offset;
        if accumulated.get(target)?.value == Cell::Unknown && cell.value != Cell::Unknown {
            accumulated.set(target, cell.value)?;
            report.revealed += 1;
        }
    }

    trace!(
        "merged window, padded {:?}, revealed {}\n{}",
        report.padded,
        report.revealed,
        accumulated
    );
    Ok(report)
}
