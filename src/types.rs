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

use fnv::FnvHashMap;

use crate::error::{Error, Result};

pub type DenseVector = Vec<f64>;

/// Accumulated scores of candidate items, keyed by item index.
pub type CandidateScores = FnvHashMap<usize, f64>;

pub fn new_dense_vector(dimensions: usize) -> DenseVector {
    vec![0.0; dimensions]
}

pub fn new_candidate_scores(capacity: usize) -> CandidateScores {
    FnvHashMap::with_capacity_and_hasher(capacity, Default::default())
}

/// Dense user-by-item matrix of interaction counts, stored row-major. Every entry is finite and
/// non-negative, which is checked once on construction.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionMatrix {
    num_users: usize,
    num_items: usize,
    values: Vec<f64>,
}

impl InteractionMatrix {

    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {

        let num_users = rows.len();
        let num_items = rows.first().map(|row| row.len()).unwrap_or(0);

        let mut values = Vec::with_capacity(num_users * num_items);

        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != num_items {
                return Err(Error::ShapeMismatch {
                    row: row_index,
                    expected: num_items,
                    found: row.len(),
                });
            }
            values.extend(row);
        }

        InteractionMatrix::from_row_major(num_users, num_items, values)
    }

    pub fn from_row_major(num_users: usize, num_items: usize, values: Vec<f64>) -> Result<Self> {

        if values.len() != num_users * num_items {
            return Err(Error::LengthMismatch {
                what: "matrix entries",
                expected: num_users * num_items,
                found: values.len(),
            });
        }

        for (index, value) in values.iter().enumerate() {
            let user = index / num_items;
            let item = index % num_items;

            if !value.is_finite() {
                return Err(Error::NonFiniteInteraction { user, item, value: *value });
            }
            if *value < 0.0 {
                return Err(Error::NegativeInteraction { user, item, value: *value });
            }
        }

        Ok(InteractionMatrix { num_users, num_items, values })
    }

    pub fn num_users(&self) -> usize {
        self.num_users
    }

    pub fn num_items(&self) -> usize {
        self.num_items
    }

    pub fn row(&self, user: usize) -> &[f64] {
        let start = user * self.num_items;
        &self.values[start..start + self.num_items]
    }

    pub fn get(&self, user: usize, item: usize) -> f64 {
        self.values[user * self.num_items + item]
    }

    pub fn check_user(&self, user: usize) -> Result<()> {
        if user < self.num_users {
            Ok(())
        } else {
            Err(Error::UserOutOfRange { user, num_users: self.num_users })
        }
    }

    /// Rescales every row by its maximum, so that all counts end up in [0, 1]. Rows without any
    /// interactions stay untouched. Cosine similarities between users do not change.
    pub fn scaled_per_user(&self) -> InteractionMatrix {

        let mut values = self.values.clone();

        if self.num_items > 0 {
            for row in values.chunks_mut(self.num_items) {
                let max = row.iter().cloned().fold(0.0, f64::max);
                if max > 0.0 {
                    for value in row.iter_mut() {
                        *value /= max;
                    }
                }
            }
        }

        InteractionMatrix { num_users: self.num_users, num_items: self.num_items, values }
    }
}
