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

use std::cmp::Ordering;
use std::sync::Mutex;
use std::time::Instant;

use fnv::FnvHashSet;
use scoped_pool::Pool;

use crate::config::RecommenderConfig;
use crate::error::{Error, Result};
use crate::rank::{self, ScoredItem};
use crate::similarity;
use crate::types::{self, CandidateScores, InteractionMatrix};

/// Picks the `k` users most similar to `target_user`. The target itself is never a neighbor,
/// regardless of its own similarity. Equal similarities are broken by user index, the lower index
/// wins. Returns fewer than `k` users if the matrix does not hold enough other users.
pub fn select_neighbors(similarities: &[f64], target_user: usize, k: usize) -> Vec<usize> {

    let mut others: Vec<usize> = (0..similarities.len())
        .filter(|user| *user != target_user)
        .collect();

    // Stable sort, so ties keep ascending user order
    others.sort_by(|user_a, user_b| {
        similarities[*user_b]
            .partial_cmp(&similarities[*user_a])
            .unwrap_or(Ordering::Equal)
    });

    others.truncate(k);
    others
}

/// Accumulates the raw score of every item some neighbor interacted with and the target user did
/// not, and weights it by the fraction of neighbors who interacted with the item. `similarities`
/// must hold one entry per user of the matrix.
pub fn score_candidates(
    matrix: &InteractionMatrix,
    target_user: usize,
    neighbors: &[usize],
    similarities: &[f64],
) -> Result<CandidateScores> {

    matrix.check_user(target_user)?;

    if similarities.len() != matrix.num_users() {
        return Err(Error::LengthMismatch {
            what: "similarities",
            expected: matrix.num_users(),
            found: similarities.len(),
        });
    }

    for neighbor in neighbors.iter() {
        matrix.check_user(*neighbor)?;
    }

    Ok(accumulate_candidates(matrix, target_user, neighbors, similarities))
}

fn accumulate_candidates(
    matrix: &InteractionMatrix,
    target_user: usize,
    neighbors: &[usize],
    similarities: &[f64],
) -> CandidateScores {

    let owned_items: FnvHashSet<usize> = matrix.row(target_user).iter()
        .enumerate()
        .filter(|(_, count)| **count > 0.0)
        .map(|(item, _)| item)
        .collect();

    let mut raw_scores = types::new_candidate_scores(10);
    let mut num_neighbors_per_item = types::new_candidate_scores(10);

    for neighbor in neighbors.iter() {
        let similarity = similarities[*neighbor];

        for (item, count) in matrix.row(*neighbor).iter().enumerate() {
            if *count > 0.0 && !owned_items.contains(&item) {
                *raw_scores.entry(item).or_insert(0.0) += count * similarity;
                *num_neighbors_per_item.entry(item).or_insert(0.0) += 1.0;
            }
        }
    }

    let num_neighbors = neighbors.len() as f64;

    for (item, raw_score) in raw_scores.iter_mut() {
        let coverage = num_neighbors_per_item[item] / num_neighbors;
        *raw_score *= coverage;
    }

    raw_scores
}

/// Recommends up to `config.max_items` items for `target_user`, based on the items of its
/// `config.nearest_users` most similar users. Scores are divided by the number of requested
/// neighbors, which bounds them to [0, 1] as long as all counts are in [0, 1] (see
/// `InteractionMatrix::scaled_per_user`). Items the target user already interacted with are never
/// recommended. The result is ordered best first.
pub fn recommend(
    matrix: &InteractionMatrix,
    target_user: usize,
    config: &RecommenderConfig,
) -> Result<Vec<ScoredItem>> {

    config.validate()?;
    matrix.check_user(target_user)?;

    Ok(recommend_validated(matrix, target_user, config))
}

/// Expects a valid config and an existing target user.
fn recommend_validated(
    matrix: &InteractionMatrix,
    target_user: usize,
    config: &RecommenderConfig,
) -> Vec<ScoredItem> {

    let similarities = similarity::similarities_to(matrix, matrix.row(target_user));
    let neighbors = select_neighbors(&similarities, target_user, config.nearest_users);

    if neighbors.len() < config.nearest_users {
        debug!("Only {} of {} requested neighbors available for user {}",
            neighbors.len(), config.nearest_users, target_user);
    }
    debug!("Neighbors of user {}: {:?}", target_user, neighbors);

    let candidate_scores = accumulate_candidates(matrix, target_user, &neighbors, &similarities);

    debug!("Found {} candidate items for user {}", candidate_scores.len(), target_user);

    const MIN_SCORE: f64 = 0.0;
    let max_score = config.nearest_users as f64;

    let normalized = candidate_scores.into_iter()
        .map(|(item, score)| {
            ScoredItem { item, score: (score - MIN_SCORE) / (max_score - MIN_SCORE) }
        });

    rank::top_n(normalized, config.max_items)
}

/// Computes recommendations for every user of the matrix on a pool of `pool_size` threads. The
/// result is indexed by user.
pub fn recommend_all(
    matrix: &InteractionMatrix,
    config: &RecommenderConfig,
    pool_size: usize,
) -> Result<Vec<Vec<ScoredItem>>> {

    config.validate()?;

    if pool_size == 0 {
        return Err(Error::InvalidParameter("pool_size"));
    }

    let num_users = matrix.num_users();

    // A slot stays empty if the job of its user did not finish
    let mut recommendations: Vec<Mutex<Option<Vec<ScoredItem>>>> = Vec::with_capacity(num_users);
    for _ in 0..num_users {
        recommendations.push(Mutex::new(None));
    }

    let start = Instant::now();
    let pool = Pool::new(pool_size);

    pool.scoped(|scope| {
        for (user, recommendations_for_user) in recommendations.iter().enumerate() {
            scope.execute(move || {
                let items = recommend_validated(matrix, user, config);

                if let Ok(mut slot) = recommendations_for_user.lock() {
                    *slot = Some(items);
                }
            });
        }
    });

    pool.shutdown();

    info!("Computed recommendations for {} users in {}ms using {} threads",
        num_users, start.elapsed().as_millis(), pool_size);

    recommendations.into_iter()
        .enumerate()
        .map(|(user, slot)| {
            slot.into_inner()
                .ok()
                .and_then(|items| items)
                .ok_or(Error::WorkerFailed { user })
        })
        .collect()
}

/// The items a user interacted with most, strongest first, at most `n` of them. Items without
/// interactions are left out.
pub fn most_interacted_items(
    matrix: &InteractionMatrix,
    user: usize,
    n: usize,
) -> Result<Vec<usize>> {

    matrix.check_user(user)?;

    let counts = matrix.row(user);

    let mut items: Vec<usize> = (0..counts.len())
        .filter(|item| counts[*item] > 0.0)
        .collect();

    items.sort_by(|item_a, item_b| {
        counts[*item_b].partial_cmp(&counts[*item_a]).unwrap_or(Ordering::Equal)
    });
    items.truncate(n);

    Ok(items)
}


#[cfg(test)]
mod tests {

    use rand::{Rng, XorShiftRng};

    use crate::config::RecommenderConfig;
    use crate::recommend::{most_interacted_items, recommend, recommend_all, score_candidates,
                           select_neighbors};
    use crate::similarity::{compute_similarities, cosine_similarity};
    use crate::types::InteractionMatrix;

    fn close_enough_to(value: f64, expected: f64) -> bool {
        (value - expected).abs() < 1e-9
    }

    fn small_matrix() -> InteractionMatrix {
        InteractionMatrix::new(vec![
            vec![5.0, 0.0, 0.0],
            vec![4.0, 1.0, 0.0],
            vec![0.0, 3.0, 2.0],
        ]).unwrap()
    }

    fn random_matrix(rng: &mut XorShiftRng, num_users: usize, num_items: usize) -> InteractionMatrix {
        let rows: Vec<Vec<f64>> = (0..num_users)
            .map(|_| {
                (0..num_items)
                    .map(|_| if rng.gen_range(0, 3) == 0 { rng.gen_range(0.0, 1.0) } else { 0.0 })
                    .collect()
            })
            .collect();

        InteractionMatrix::new(rows).unwrap()
    }

    #[test]
    fn neighbor_selection_excludes_target_by_identity() {
        // user 2 is a perfect copy of user 0
        let similarities = vec![1.0, 0.2, 1.0, 0.7];

        assert_eq!(select_neighbors(&similarities, 0, 2), vec![2, 3]);
        assert_eq!(select_neighbors(&similarities, 2, 2), vec![0, 3]);
    }

    #[test]
    fn neighbor_selection_breaks_ties_by_user_index() {
        let similarities = vec![0.0, 0.5, 0.5, 0.5, 0.9];

        assert_eq!(select_neighbors(&similarities, 0, 3), vec![4, 1, 2]);
        assert_eq!(select_neighbors(&similarities, 4, 10), vec![1, 2, 3, 0]);
    }

    #[test]
    fn neighbor_with_higher_similarity_determines_candidates() {
        let matrix = small_matrix();

        let similarity_to_user_1 = cosine_similarity(matrix.row(0), matrix.row(1));
        let similarity_to_user_2 = cosine_similarity(matrix.row(0), matrix.row(2));
        assert!(similarity_to_user_1 > similarity_to_user_2);

        let recommendations = recommend(&matrix, 0, &RecommenderConfig::new(1, 2).unwrap())
            .unwrap();

        // user 1 is the only neighbor and only adds item 1
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].item, 1);
        assert!(close_enough_to(recommendations[0].score, 1.0 * similarity_to_user_1));
    }

    #[test]
    fn scores_weight_counts_by_similarity_and_coverage() {
        let matrix = InteractionMatrix::new(vec![
            vec![1.0, 0.0, 0.0, 0.0],
            vec![1.0, 1.0, 0.0, 0.0],
            vec![1.0, 1.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0],
        ]).unwrap();

        let similarities = compute_similarities(&matrix, 0).unwrap();
        let neighbors = select_neighbors(&similarities, 0, 2);
        assert_eq!(neighbors, vec![1, 2]);

        let scores = score_candidates(&matrix, 0, &neighbors, &similarities).unwrap();

        let s1 = similarities[1];
        let s2 = similarities[2];

        assert_eq!(scores.len(), 2);
        assert!(close_enough_to(scores[&1], (s1 + s2) * 1.0));
        assert!(close_enough_to(scores[&2], s2 * 0.5));

        let recommendations = recommend(&matrix, 0, &RecommenderConfig::new(2, 10).unwrap())
            .unwrap();

        assert_eq!(recommendations.len(), 2);
        assert_eq!(recommendations[0].item, 1);
        assert!(close_enough_to(recommendations[0].score, (s1 + s2) / 2.0));
        assert_eq!(recommendations[1].item, 2);
        assert!(close_enough_to(recommendations[1].score, s2 * 0.5 / 2.0));
    }

    #[test]
    fn scoring_rejects_unknown_users() {
        let matrix = small_matrix();
        let similarities = compute_similarities(&matrix, 0).unwrap();

        assert!(score_candidates(&matrix, 5, &[1], &similarities).unwrap_err().is_invalid_input());
        assert!(score_candidates(&matrix, 0, &[1, 7], &similarities).is_err());
        assert!(score_candidates(&matrix, 0, &[1], &similarities[..2]).is_err());
        assert!(score_candidates(&matrix, 0, &[], &similarities).unwrap().is_empty());
    }

    #[test]
    fn extreme_counts_still_produce_scores() {
        let matrix = InteractionMatrix::new(vec![
            vec![1e308, 0.0],
            vec![1e308, 1e308],
            vec![1e308, 1e308],
        ]).unwrap();

        let recommendations = recommend(&matrix, 0, &RecommenderConfig::new(2, 10).unwrap())
            .unwrap();

        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].item, 1);
        assert!(recommendations[0].score > 0.0);
        assert!(recommendations[0].score.is_finite());
    }

    #[test]
    fn neighborhood_is_clamped_to_available_users() {
        let matrix = small_matrix();

        let recommendations = recommend(&matrix, 0, &RecommenderConfig::new(2, 10).unwrap())
            .unwrap();
        let more_than_available = recommend(&matrix, 0, &RecommenderConfig::new(50, 10).unwrap())
            .unwrap();

        assert_eq!(recommendations.len(), 2);
        assert_eq!(more_than_available.len(), 2);
        // normalization always divides by the requested number of neighbors
        assert!(close_enough_to(more_than_available[0].score * 50.0,
            recommendations[0].score * 2.0));
    }

    #[test]
    fn inactive_target_gets_items_of_its_neighbors() {
        let matrix = InteractionMatrix::new(vec![
            vec![0.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 1.0],
        ]).unwrap();

        let recommendations = recommend(&matrix, 0, &RecommenderConfig::new(2, 10).unwrap())
            .unwrap();

        let mut items: Vec<usize> = recommendations.iter().map(|scored| scored.item).collect();
        items.sort();

        assert_eq!(items, vec![0, 1, 2]);
        assert!(recommendations.iter().all(|scored| scored.score == 0.0));
        // ties are ordered by item index
        assert_eq!(recommendations[0].item, 0);
    }

    #[test]
    fn no_candidates_yields_empty_result() {
        let matrix = InteractionMatrix::new(vec![
            vec![1.0, 1.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
        ]).unwrap();

        let recommendations = recommend(&matrix, 0, &RecommenderConfig::default()).unwrap();

        assert!(recommendations.is_empty());
    }

    #[test]
    fn single_user_matrix_yields_empty_result() {
        let matrix = InteractionMatrix::new(vec![vec![1.0, 0.0]]).unwrap();

        assert!(recommend(&matrix, 0, &RecommenderConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn invalid_queries_fail() {
        let matrix = small_matrix();

        let zero_neighbors = RecommenderConfig { nearest_users: 0, max_items: 3 };
        let zero_items = RecommenderConfig { nearest_users: 1, max_items: 0 };

        assert!(recommend(&matrix, 3, &RecommenderConfig::default()).unwrap_err().is_invalid_input());
        assert!(recommend(&matrix, 0, &zero_neighbors).is_err());
        assert!(recommend(&matrix, 0, &zero_items).is_err());
        assert!(recommend_all(&matrix, &RecommenderConfig::default(), 0).is_err());
    }

    #[test]
    fn properties_hold_for_random_matrices() {

        let mut rng = XorShiftRng::new_unseeded();

        for _ in 0..25 {
            let num_users = rng.gen_range(2, 12);
            let num_items = rng.gen_range(1, 15);
            let matrix = random_matrix(&mut rng, num_users, num_items);

            let config = RecommenderConfig::new(rng.gen_range(1, num_users + 2), rng.gen_range(1, 8))
                .unwrap();

            for user in 0..num_users {

                let similarities = compute_similarities(&matrix, user).unwrap();
                assert_eq!(similarities.len(), num_users);
                assert!(similarities.iter().all(|s| *s >= 0.0 && *s <= 1.0));

                let owned: Vec<usize> = (0..num_items)
                    .filter(|item| matrix.get(user, *item) > 0.0)
                    .collect();

                if owned.is_empty() {
                    assert!(similarities.iter().all(|s| *s == 0.0));
                } else {
                    assert!(close_enough_to(similarities[user], 1.0));
                }

                let recommendations = recommend(&matrix, user, &config).unwrap();

                assert!(recommendations.len() <= config.max_items);
                assert!(recommendations.len() <= num_items - owned.len());

                for scored in recommendations.iter() {
                    assert!(!owned.contains(&scored.item));
                    assert!(scored.score >= 0.0 && scored.score <= 1.0);
                }

                for pair in recommendations.windows(2) {
                    assert!(pair[0].score >= pair[1].score);
                    assert_ne!(pair[0].item, pair[1].item);
                }

                assert_eq!(recommend(&matrix, user, &config).unwrap(), recommendations);
            }
        }
    }

    #[test]
    fn batch_matches_individual_queries() {
        let mut rng = XorShiftRng::new_unseeded();
        let matrix = random_matrix(&mut rng, 20, 10);
        let config = RecommenderConfig::new(3, 4).unwrap();

        let all = recommend_all(&matrix, &config, 4).unwrap();

        assert_eq!(all.len(), 20);
        for (user, recommendations) in all.iter().enumerate() {
            assert_eq!(*recommendations, recommend(&matrix, user, &config).unwrap());
        }
    }

    #[test]
    fn most_interacted_items_in_descending_order() {
        let matrix = InteractionMatrix::new(vec![
            vec![2.0, 0.0, 7.0, 2.0, 1.0],
        ]).unwrap();

        assert_eq!(most_interacted_items(&matrix, 0, 10).unwrap(), vec![2, 0, 3, 4]);
        assert_eq!(most_interacted_items(&matrix, 0, 2).unwrap(), vec![2, 0]);
        assert!(most_interacted_items(&matrix, 1, 2).is_err());
    }
}
