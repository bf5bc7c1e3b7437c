use crate::userknn::encoder::PreferenceVector;
use crate::userknn::similarity::{cosine_similarity, SimilarityComputation};
use crate::userknn::UserScore;

/// Scores every user row against the preference vector and keeps the `k`
/// most similar users with a strictly positive similarity.
///
/// Missing ratings are read as 0 here. Users with equal similarity keep their
/// row order.
pub fn select_neighbors<I: SimilarityComputation + ?Sized>(
    index: &I,
    preferences: &PreferenceVector,
    k: usize,
) -> Vec<UserScore> {
    let preferences_norm = preferences.norm();

    let mut neighbors: Vec<UserScore> = (0..index.qty_users())
        .filter_map(|user_idx| {
            let similarity = cosine_similarity(
                &preferences.values,
                preferences_norm,
                index.ratings_for_user(user_idx),
                index.row_norm(user_idx),
            );
            if similarity > 0.0 {
                Some(UserScore::new(user_idx, similarity))
            } else {
                None
            }
        })
        .collect();

    // reverse ordering by score and a stable sort, so ties stay in row order
    neighbors.sort();
    neighbors.truncate(k);
    neighbors
}
