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

//! Working out where in the master maze the bot could be, and which move best narrows it down.
//!
//! The bot's map is always drawn facing up, so a position in the master maze only makes sense
//! together with a facing. For each facing the master is rotated into the bot's frame once, up
//! front. A candidate is an open square of a rotated master where every known square of the
//! bot's map lines up with the master.

use log::{debug, trace};
use maze_escape_logic::{distances_from, Cell, Coord, Direction, Grid, GridCell, MazeError};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::scoring::{MoveScorer, MoveTally, WeightedScorer};

/// A position the bot could be at. `coord` is in the master rotated by `facing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Candidate {
    pub facing: Direction,
    pub coord: Coord,
}

/// The master as seen facing one way, with move counts to the exit for every reachable square.
struct Orientation {
    facing: Direction,
    grid: Grid,
    to_exit: FxHashMap<Coord, u32>,
}

impl Orientation {
    fn new(master: &Grid, facing: Direction) -> Self {
        let grid = master.rotated(facing, false);
        let to_exit = match grid.find(Cell::Exit) {
            Ok(Some(exit)) => distances_from(&grid, exit.coord),
            _ => FxHashMap::default(),
        };
        Self {
            facing,
            grid,
            to_exit,
        }
    }

    fn makes_progress(&self, from: Coord, to: Coord) -> bool {
        match (self.to_exit.get(&from), self.to_exit.get(&to)) {
            (Some(before), Some(after)) => after < before,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Localization {
    pub candidates: Vec<Candidate>,

    /// One per direction, in the order UP, RIGHT, DOWN, LEFT.
    pub tallies: Vec<MoveTally>,

    /// Every direction with its score, best first. Equal scores keep the order UP, RIGHT, DOWN,
    /// LEFT.
    pub ranking: Vec<(Direction, f64)>,

    /// Per facing, the rotated master with each feasible move's landing square marked with the
    /// move's arrow.
    pub scratch: Vec<(Direction, Grid)>,
}

impl Localization {
    pub fn tally(&self, direction: Direction) -> Option<&MoveTally> {
        self.tallies.iter().find(|tally| tally.direction == direction)
    }
}

pub struct Localizer<S = WeightedScorer> {
    master: Grid,
    orientations: Vec<Orientation>,
    scorer: S,
}

impl Localizer<WeightedScorer> {
    pub fn with_default_scorer(master: Grid) -> Self {
        Self::new(master, WeightedScorer::default())
    }
}

impl<S> Localizer<S>
where
    S: MoveScorer,
{
    /// Any bot marker in the master is treated as open floor.
    pub fn new(mut master: Grid, scorer: S) -> Self {
        master.replace(Cell::Agent, Cell::Open);
        let orientations = Direction::ALL
            .iter()
            .map(|facing| Orientation::new(&master, *facing))
            .collect();
        Self {
            master,
            orientations,
            scorer,
        }
    }

    pub fn master(&self) -> &Grid {
        &self.master
    }

    fn orientation(&self, facing: Direction) -> &Orientation {
        // One orientation per direction, built in `Direction::ALL` order.
        &self.orientations[Direction::ALL
            .iter()
            .position(|d| *d == facing)
            .unwrap_or_default()]
    }

    /// Every (facing, square) of the master consistent with the bot's map, by facing in the order
    /// UP, RIGHT, DOWN, LEFT and then row-major. Known squares of the map that land beyond the
    /// master only fit if they are walls.
    pub fn candidates(&self, accumulated: &Grid) -> Result<Vec<Candidate>, MazeError> {
        let agent = accumulated.agent()?;
        let known: Vec<GridCell> = accumulated
            .filter(|cell| cell.value.is_known() && cell.value != Cell::Agent)
            .collect();

        let mut candidates = Vec::new();
        for orientation in &self.orientations {
            for square in orientation.grid.filter(|cell| cell.value == Cell::Open) {
                let offset = square.coord - agent;
                // Beyond the edge of the master everything reads as wall.
                let consistent = known.iter().all(|cell| {
                    orientation
                        .grid
                        .get(cell.coord + offset)
                        .map_or(cell.value == Cell::Wall, |master| master.value == cell.value)
                });
                if consistent {
                    candidates.push(Candidate {
                        facing: orientation.facing,
                        coord: square.coord,
                    });
                }
            }
        }
        Ok(candidates)
    }

    /// Simulate every move from every candidate and rank the moves.
    ///
    /// A move is feasible for a candidate when it does not walk into a wall of the rotated master.
    /// What the bot would see afterwards is the `view_radius` window around the landing square,
    /// turned to the bot's new facing; candidates that would see the same window stay
    /// indistinguishable.
    pub fn localize(
        &self,
        accumulated: &Grid,
        view_radius: usize,
    ) -> Result<Localization, MazeError> {
        let candidates = self.candidates(accumulated)?;
        let mut scratch: Vec<(Direction, Grid)> = self
            .orientations
            .iter()
            .map(|orientation| (orientation.facing, orientation.grid.fork()))
            .collect();

        let mut tallies = Vec::with_capacity(Direction::ALL.len());
        for direction in Direction::ALL {
            let mut seen: FxHashMap<String, usize> = FxHashMap::default();
            let mut feasible = 0;
            let mut progress = 0;

            for candidate in &candidates {
                let orientation = self.orientation(candidate.facing);
                let mut simulated = orientation.grid.fork();
                simulated.set(candidate.coord, Cell::Agent)?;
                let landing = match simulated.move_cell(candidate.coord, direction, Cell::Open) {
                    Ok(landing) => landing,
                    Err(_) => continue,
                };

                feasible += 1;
                if orientation.makes_progress(candidate.coord, landing) {
                    progress += 1;
                }
                if let Some((_, map)) = scratch
                    .iter_mut()
                    .find(|(facing, _)| *facing == candidate.facing)
                {
                    map.set(landing, Cell::DirectionMark(direction))?;
                }

                let view = simulated
                    .window(landing, view_radius, Cell::Wall)
                    .rotated(direction, false)
                    .to_text();
                *seen.entry(view).or_default() += 1;
            }

            let expected_remaining = if feasible == 0 {
                0.0
            } else {
                seen.values().map(|group| (group * group) as f64).sum::<f64>() / feasible as f64
            };
            tallies.push(MoveTally {
                direction,
                candidates: candidates.len(),
                feasible,
                progress,
                outcomes: seen.len(),
                expected_remaining,
            });
        }

        let mut ranking: Vec<(Direction, f64)> = tallies
            .iter()
            .map(|tally| (tally.direction, self.scorer.score(tally)))
            .collect();
        ranking.sort_by(|a, b| b.1.total_cmp(&a.1));

        for (facing, map) in &scratch {
            trace!("scratch map facing {}\n{}", facing, map);
        }
        debug!(
            "{} candidates, ranking {:?}",
            candidates.len(),
            ranking
                .iter()
                .map(|(direction, score)| format!("{}={:.3}", direction, score))
                .collect::<Vec<_>>()
        );

        Ok(Localization {
            candidates,
            tallies,
            ranking,
            scratch,
        })
    }

    /// The best ranked move that is also open on the bot's own map, or `None` when no candidate
    /// fits the map or no ranked move is open.
    pub fn choose_move(
        &self,
        accumulated: &Grid,
        view_radius: usize,
    ) -> Result<Option<(Direction, Localization)>, MazeError> {
        let localization = self.localize(accumulated, view_radius)?;
        if localization.candidates.is_empty() {
            debug!("no position in the master maze matches the map");
            return Ok(None);
        }
        let agent = accumulated.agent()?;
        let chosen = localization
            .ranking
            .iter()
            .map(|(direction, _)| *direction)
            .find(|direction| accumulated.can_step(agent, *direction));
        Ok(chosen.map(|direction| (direction, localization)))
    }

    /// The unrotated master with each candidate's square marked by an arrow for its facing.
    pub fn candidate_map(&self, candidates: &[Candidate]) -> Result<Grid, MazeError> {
        let mut map = self.master.fork();
        for orientation in &self.orientations {
            let mut marked = orientation.grid.fork();
            let mut any = false;
            for candidate in candidates
                .iter()
                .filter(|candidate| candidate.facing == orientation.facing)
            {
                marked.set(candidate.coord, Cell::DirectionMark(orientation.facing))?;
                any = true;
            }
            if !any {
                continue;
            }
            for cell in marked
                .rotated(orientation.facing, true)
                .filter(|cell| matches!(cell.value, Cell::DirectionMark(_)))
            {
                map.set(cell.coord, cell.value)?;
            }
        }
        Ok(map)
    }
}
