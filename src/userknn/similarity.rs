use crate::io::Rating;
use crate::userknn::encoder::PreferenceVector;
use crate::userknn::neighbors::select_neighbors;
use crate::userknn::rating_matrix::RatingMatrix;
use crate::userknn::UserScore;

pub trait SimilarityComputation {
    fn qty_users(&self) -> usize;

    fn ratings_for_user(&self, user_idx: usize) -> &[(u32, Rating)];

    /// L2 norm of a user row with missing ratings counted as 0.
    fn row_norm(&self, user_idx: usize) -> f64;

    /// Mean over the ratings a user actually gave.
    fn mean_rating(&self, user_idx: usize) -> Option<f64>;

    /// find the top 'k' users with a strictly positive cosine similarity to the
    /// given preference vector, most similar first.
    fn find_neighbors(&self, preferences: &PreferenceVector, k: usize) -> Vec<UserScore>;
}

impl SimilarityComputation for RatingMatrix {
    fn qty_users(&self) -> usize {
        RatingMatrix::qty_users(self)
    }

    fn ratings_for_user(&self, user_idx: usize) -> &[(u32, Rating)] {
        RatingMatrix::ratings_for_user(self, user_idx)
    }

    fn row_norm(&self, user_idx: usize) -> f64 {
        RatingMatrix::row_norm(self, user_idx)
    }

    fn mean_rating(&self, user_idx: usize) -> Option<f64> {
        RatingMatrix::mean_rating(self, user_idx)
    }

    fn find_neighbors(&self, preferences: &PreferenceVector, k: usize) -> Vec<UserScore> {
        select_neighbors(self, preferences, k)
    }
}

/// Cosine similarity between a dense vector and a sparse row.
///
/// Entries absent from the row count as 0. Returns 0 when either side has a
/// zero norm.
pub fn cosine_similarity(
    dense: &[f64],
    dense_norm: f64,
    sparse_row: &[(u32, Rating)],
    sparse_norm: f64,
) -> f64 {
    if dense_norm == 0.0 || sparse_norm == 0.0 {
        return 0.0;
    }
    let dot: f64 = sparse_row
        .iter()
        .map(|(item_idx, rating)| dense[*item_idx as usize] * rating)
        .sum();
    dot / (dense_norm * sparse_norm)
}

#[cfg(test)]
mod similarity_test {
    use super::*;

    #[test]
    fn should_match_dense_cosine() {
        // dense [1, 0, 1] vs row [2, -, 2]
        let dense = vec![1.0, 0.0, 1.0];
        let row = vec![(0, 2.0), (2, 2.0)];
        let similarity = cosine_similarity(&dense, 2.0_f64.sqrt(), &row, 8.0_f64.sqrt());
        assert!((1.0 - similarity).abs() < 1e-12);
    }

    #[test]
    fn should_be_orthogonal_without_overlap() {
        let dense = vec![1.0, 0.0, 0.0];
        let row = vec![(1, 5.0), (2, 3.0)];
        let similarity = cosine_similarity(&dense, 1.0, &row, 34.0_f64.sqrt());
        assert!((0.0 - similarity).abs() < f64::EPSILON);
    }

    #[test]
    fn should_handle_zero_norms() {
        let dense = vec![0.0, 0.0];
        assert!((0.0 - cosine_similarity(&dense, 0.0, &[(0, 4.0)], 4.0)).abs() < f64::EPSILON);
        assert!((0.0 - cosine_similarity(&[1.0, 0.0], 1.0, &[], 0.0)).abs() < f64::EPSILON);
    }
}
