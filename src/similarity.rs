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

use crate::error::Result;
use crate::types::{self, DenseVector, InteractionMatrix};

/// Cosine similarity of two interaction vectors of equal length. As counts are non-negative, the
/// result lies in [0, 1]. Vectors without any interactions have an undefined direction, we treat
/// them as completely dissimilar to everything, including themselves.
#[inline]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {

    debug_assert_eq!(a.len(), b.len());

    // Both vectors are divided by their largest entry first, so that squaring cannot overflow
    // (or underflow) for extreme counts. Cosine similarity is invariant to this scaling.
    let max_a = a.iter().cloned().fold(0.0, f64::max);
    let max_b = b.iter().cloned().fold(0.0, f64::max);

    if max_a == 0.0 || max_b == 0.0 {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut squared_norm_a = 0.0;
    let mut squared_norm_b = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = x / max_a;
        let y = y / max_b;
        dot += x * y;
        squared_norm_a += x * x;
        squared_norm_b += y * y;
    }

    let similarity = dot / (squared_norm_a.sqrt() * squared_norm_b.sqrt());

    // Round off error can push us slightly outside of [0, 1]
    similarity.max(0.0).min(1.0)
}

/// Similarity between `target_user` and every user of the matrix, indexed by user. The target
/// itself is not skipped here.
pub fn compute_similarities(matrix: &InteractionMatrix, target_user: usize) -> Result<DenseVector> {

    matrix.check_user(target_user)?;

    Ok(similarities_to(matrix, matrix.row(target_user)))
}

pub(crate) fn similarities_to(matrix: &InteractionMatrix, target: &[f64]) -> DenseVector {

    let mut similarities = types::new_dense_vector(matrix.num_users());

    for (user, similarity) in similarities.iter_mut().enumerate() {
        *similarity = cosine_similarity(target, matrix.row(user));
    }

    similarities
}
