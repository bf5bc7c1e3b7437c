use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing::info;

use crate::io::{ItemId, UserId};
use crate::userknn::rating_matrix::RatingMatrix;

/// A test user whose liked books are split into the books we ask about and
/// the books we hope to see recommended.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldoutCase {
    pub user_id: UserId,
    pub query_items: Vec<ItemId>,
    pub held_out_items: Vec<ItemId>,
}

pub struct HoldoutSplit {
    pub training: RatingMatrix,
    pub cases: Vec<HoldoutCase>,
}

/// Moves a seeded random sample of users out of the matrix and turns each of
/// them into a `HoldoutCase`.
///
/// A user's liked books are the ones rated at least `like_threshold`. Users
/// with fewer than two liked books are still removed from the training data
/// but produce no case. At least one book ends up on each side of a case.
pub fn split(
    matrix: &RatingMatrix,
    test_user_fraction: f64,
    like_threshold: f64,
    query_fraction: f64,
    seed: u64,
) -> HoldoutSplit {
    let mut rng = Pcg64::seed_from_u64(seed);

    let mut user_indices: Vec<usize> = (0..matrix.qty_users()).collect();
    user_indices.shuffle(&mut rng);
    let qty_test_users = ((matrix.qty_users() as f64) * test_user_fraction.clamp(0.0, 1.0)).round() as usize;
    let (test_users, training_users) = user_indices.split_at(qty_test_users);

    let mut training_users = training_users.to_vec();
    training_users.sort_unstable();
    let training = matrix.select_users(&training_users);

    let mut test_users = test_users.to_vec();
    test_users.sort_unstable();

    let mut cases = Vec::with_capacity(test_users.len());
    for user_idx in test_users.into_iter() {
        let mut liked_items: Vec<ItemId> = matrix
            .ratings_for_user(user_idx)
            .iter()
            .filter(|(_, rating)| *rating >= like_threshold)
            .map(|(item_idx, _)| matrix.item_id(*item_idx as usize).clone())
            .collect();
        if liked_items.len() < 2 {
            continue;
        }
        liked_items.shuffle(&mut rng);

        let qty_query = ((liked_items.len() as f64) * query_fraction).round() as usize;
        let qty_query = qty_query.clamp(1, liked_items.len() - 1);
        let held_out_items = liked_items.split_off(qty_query);

        cases.push(HoldoutCase {
            user_id: matrix.user_id(user_idx),
            query_items: liked_items,
            held_out_items,
        });
    }

    info!(
        training_users = training.qty_users(),
        test_cases = cases.len(),
        "split rating data for evaluation"
    );

    HoldoutSplit { training, cases }
}

#[cfg(test)]
mod holdout_test {
    use super::*;

    fn matrix() -> RatingMatrix {
        let item_ids: Vec<ItemId> = (0..6).map(|idx| format!("isbn{}", idx)).collect();
        let rows = (0..20)
            .map(|user| {
                let row = (0..6)
                    .map(|item| {
                        if (user + item) % 3 == 0 {
                            None
                        } else {
                            Some(((user * 7 + item * 3) % 10 + 1) as f64)
                        }
                    })
                    .collect();
                (user as UserId, row)
            })
            .collect();
        RatingMatrix::from_dense(item_ids, rows).unwrap()
    }

    #[test]
    fn should_remove_test_users_from_training() {
        let matrix = matrix();
        let holdout = split(&matrix, 0.25, 6.0, 0.5, 7);

        assert_eq!(15, holdout.training.qty_users());
        assert_eq!(matrix.qty_items(), holdout.training.qty_items());
        for case in holdout.cases.iter() {
            assert!(!holdout.training.user_ids().contains(&case.user_id));
            assert!(!case.query_items.is_empty());
            assert!(!case.held_out_items.is_empty());
            assert!(case
                .query_items
                .iter()
                .all(|item_id| !case.held_out_items.contains(item_id)));
        }
    }

    #[test]
    fn should_be_reproducible_for_a_seed() {
        let matrix = matrix();
        let first = split(&matrix, 0.3, 5.0, 0.5, 11);
        let second = split(&matrix, 0.3, 5.0, 0.5, 11);
        assert_eq!(first.cases, second.cases);
        assert_eq!(first.training.user_ids(), second.training.user_ids());
    }

    #[test]
    fn should_only_use_liked_items() {
        let matrix = matrix();
        let holdout = split(&matrix, 1.0, 9.0, 0.5, 3);
        assert_eq!(0, holdout.training.qty_users());
        for case in holdout.cases.iter() {
            let user_idx = matrix.user_ids().iter().position(|id| *id == case.user_id).unwrap();
            for item_id in case.query_items.iter().chain(case.held_out_items.iter()) {
                let item_idx = matrix.item_index(item_id).unwrap();
                assert!(matrix.rating(user_idx, item_idx).unwrap() >= 9.0);
            }
        }
    }
}
