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

//! Breadth-first shortest paths over a grid.
//!
//! The search runs on a fork of the grid. Each reached open cell is marked
//! [`Cell::Visited`] with the move that reached it, and a parent map records where it was reached
//! from; the path is read back by walking the parents from the goal. Neighbours are expanded in
//! the order UP, RIGHT, DOWN, LEFT, so among equally short paths the one whose moves come first
//! in that order wins.

use std::collections::VecDeque;

use log::trace;
use rustc_hash::FxHashMap;

use crate::{Cell, Coord, Direction, Grid, GridCell, Target};

type Parents = FxHashMap<Coord, (Coord, Direction)>;

fn reconstruct_path(parents: &Parents, start: Coord, goal: Coord) -> Vec<Direction> {
    let mut path = Vec::new();
    let mut current = goal;
    while current != start {
        match parents.get(&current) {
            Some((previous, direction)) => {
                path.push(*direction);
                current = *previous;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Search outwards from `start` until a cell satisfying `is_goal` is discovered. Only open cells
/// are expanded; a goal cell may hold any value.
fn breadth_first<G>(grid: &Grid, start: Coord, mut is_goal: G) -> Option<(Coord, Vec<Direction>)>
where
    G: FnMut(&GridCell) -> bool,
{
    let mut visited = grid.fork();
    let mut parents = Parents::default();
    let mut frontier = VecDeque::from([start]);

    while let Some(current) = frontier.pop_front() {
        for direction in Direction::ALL {
            let next = current.step(direction);
            if next == start {
                continue;
            }
            let cell = match visited.get(next) {
                Ok(cell) => cell,
                Err(_) => continue,
            };
            if is_goal(&cell) {
                parents.insert(next, (current, direction));
                return Some((next, reconstruct_path(&parents, start, next)));
            }
            if cell.value == Cell::Open {
                visited.set(next, Cell::Visited(direction)).ok()?;
                parents.insert(next, (current, direction));
                frontier.push_back(next);
            }
        }
    }
    trace!("search from {} exhausted\n{}", start, visited);
    None
}

/// Shortest moves from the bot to a target, or an empty list when the bot or the target is
/// missing or the target cannot be reached. A value target means the first cell holding that
/// value in row-major order.
pub fn find_path(grid: &Grid, target: impl Into<Target>) -> Vec<Direction> {
    match grid.agent() {
        Ok(start) => find_path_from(grid, start, target),
        Err(_) => Vec::new(),
    }
}

/// Like [`find_path`] but starting from any cell.
pub fn find_path_from(grid: &Grid, start: Coord, target: impl Into<Target>) -> Vec<Direction> {
    let goal = match grid.find(target) {
        Ok(Some(cell)) if cell.value != Cell::Wall => cell.coord,
        _ => return Vec::new(),
    };
    if goal == start {
        return Vec::new();
    }
    breadth_first(grid, start, |cell| cell.coord == goal)
        .map(|(_, path)| path)
        .unwrap_or_default()
}

/// The closest cell holding `value` and the shortest moves from the bot to it.
pub fn find_nearest(grid: &Grid, value: Cell) -> Option<(Coord, Vec<Direction>)> {
    let start = grid.agent().ok()?;
    breadth_first(grid, start, |cell| cell.value == value)
}

/// Number of moves from `start` to every cell reachable from it, `start` included. Moves may pass
/// over open cells, exits and the bot.
pub fn distances_from(grid: &Grid, start: Coord) -> FxHashMap<Coord, u32> {
    let mut distances = FxHashMap::default();
    if grid.is_valid(start) {
        distances.insert(start, 0);
    }
    let mut frontier = VecDeque::from([start]);
    while let Some(current) = frontier.pop_front() {
        let distance = distances.get(&current).copied().unwrap_or_default();
        for direction in Direction::ALL {
            let next = current.step(direction);
            if distances.contains_key(&next) {
                continue;
            }
            match grid.get(next) {
                Ok(cell) if cell.value.is_traversable() => {
                    distances.insert(next, distance + 1);
                    frontier.push_back(next);
                }
                _ => {}
            }
        }
    }
    distances
}
