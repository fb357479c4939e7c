/**
 * NeighborReco
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use crate::error::{Error, Result};

/// Parameters of a single recommendation query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecommenderConfig {
    /// Number of most similar users whose items become candidates (K).
    pub nearest_users: usize,
    /// Maximum number of items to return (N).
    pub max_items: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        RecommenderConfig { nearest_users: 3, max_items: 10 }
    }
}

impl RecommenderConfig {

    pub fn new(nearest_users: usize, max_items: usize) -> Result<Self> {
        let config = RecommenderConfig { nearest_users, max_items };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.nearest_users == 0 {
            return Err(Error::InvalidParameter("nearest_users"));
        }
        if self.max_items == 0 {
            return Err(Error::InvalidParameter("max_items"));
        }
        Ok(())
    }
}
