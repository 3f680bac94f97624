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

use std::path::{Path, PathBuf};

use maze_escape_logic::{Grid, MazeError};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("bad master maze: {0}")]
    Master(#[from] MazeError),
}

/// Weights for [`crate::WeightedScorer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub feasibility: f64,
    pub progress: f64,
    pub disambiguation: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            feasibility: 1.0,
            progress: 2.0,
            disambiguation: 1.0,
        }
    }
}

/// Agent settings, usually read from a TOML file:
///
/// ```toml
/// master = "mazes/master.txt"
/// max_moves = 50
///
/// [scoring]
/// progress = 2.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// The full maze layout, if known. Without it the bot can only explore.
    pub master: Option<PathBuf>,

    pub scoring: ScoringConfig,

    /// Moves allowed per episode in the simulator.
    pub max_moves: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            master: None,
            scoring: ScoringConfig::default(),
            max_moves: 50,
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl AgentConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = read(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse the master maze, if one is configured.
    pub fn load_master(&self) -> Result<Option<Grid>, ConfigError> {
        match &self.master {
            Some(path) => Ok(Some(Grid::from_text(&read(path)?)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(AgentConfig::from_toml("").unwrap(), AgentConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = AgentConfig::from_toml(
            r#"
            master = "maze.txt"

            [scoring]
            progress = 5.0
            "#,
        )
        .expect("parse failed");
        assert_eq!(config.master, Some(PathBuf::from("maze.txt")));
        assert_eq!(config.max_moves, 50);
        assert_eq!(
            config.scoring,
            ScoringConfig {
                feasibility: 1.0,
                progress: 5.0,
                disambiguation: 1.0
            }
        );
    }

    #[test]
    fn test_bad_config_is_parse_error() {
        assert!(matches!(
            AgentConfig::from_toml("max_moves = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            AgentConfig::from_file("/nonexistent/maze-escape.toml"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_no_master_configured() {
        assert_eq!(AgentConfig::default().load_master().unwrap(), None);
    }
}
