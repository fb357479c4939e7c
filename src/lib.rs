/*
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

//! User-based collaborative filtering: for a target user, find the most similar users by cosine
//! similarity of their interaction counts, and recommend the items those neighbors interacted
//! with, weighted by similarity and by how many neighbors share them.

#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod io;
pub mod labels;
pub mod rank;
pub mod recommend;
pub mod similarity;
pub mod types;


pub use crate::config::RecommenderConfig;
pub use crate::error::{Error, Result};
pub use crate::labels::{LabelResolver, Labels};
pub use crate::rank::ScoredItem;
pub use crate::recommend::{recommend, recommend_all};
pub use crate::similarity::compute_similarities;
pub use crate::types::InteractionMatrix;
