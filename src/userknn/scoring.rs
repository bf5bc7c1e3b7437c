use crate::userknn::encoder::PreferenceVector;
use crate::userknn::similarity::SimilarityComputation;
use crate::userknn::{ItemScore, NoRecommendation, UserScore};

/// Predicts a deviation-based score for every item that is not liked and was
/// rated by at least one neighbor.
///
/// Each neighbor contributes `similarity * (rating - own mean rating)` to the
/// items it rated; neighbors without a rating for an item contribute nothing
/// to it. Sums are divided by the total absolute similarity of all neighbors.
/// The result is in item axis order.
pub fn predict_scores<I: SimilarityComputation + ?Sized>(
    index: &I,
    preferences: &PreferenceVector,
    neighbors: &[UserScore],
) -> Result<Vec<ItemScore>, NoRecommendation> {
    let mut weighted_deviations: Vec<Option<f64>> = vec![None; preferences.values.len()];

    for neighbor in neighbors.iter() {
        let neighbor_mean = match index.mean_rating(neighbor.user_idx) {
            Some(mean) => mean,
            None => continue,
        };
        for (item_idx, rating) in index.ratings_for_user(neighbor.user_idx).iter() {
            let item_idx = *item_idx as usize;
            if preferences.is_liked(item_idx) {
                continue;
            }
            *weighted_deviations[item_idx].get_or_insert(0.0) +=
                neighbor.score * (rating - neighbor_mean);
        }
    }

    if weighted_deviations.iter().all(Option::is_none) {
        return Err(NoRecommendation::NoCandidateItems);
    }

    let sum_of_abs_similarities: f64 = neighbors.iter().map(|neighbor| neighbor.score.abs()).sum();
    if sum_of_abs_similarities == 0.0 {
        return Err(NoRecommendation::ZeroSimilarityWeight);
    }

    Ok(weighted_deviations
        .into_iter()
        .enumerate()
        .filter_map(|(item_idx, weighted_deviation)| {
            weighted_deviation.map(|sum| ItemScore::new(item_idx, sum / sum_of_abs_similarities))
        })
        .collect())
}

/// Keeps the strictly positive predictions, turns them into a softmax
/// distribution and returns the `how_many` best, highest first.
pub fn rank(
    predictions: Vec<ItemScore>,
    how_many: usize,
) -> Result<Vec<ItemScore>, NoRecommendation> {
    let positive: Vec<ItemScore> = predictions
        .into_iter()
        .filter(|scored| scored.score > 0.0)
        .collect();
    if positive.is_empty() {
        return Err(NoRecommendation::NoPositiveScores);
    }

    let raw_scores: Vec<f64> = positive.iter().map(|scored| scored.score).collect();
    let mut normalized: Vec<ItemScore> = positive
        .into_iter()
        .zip(softmax(&raw_scores))
        .map(|(scored, probability)| ItemScore::new(scored.item_idx, probability))
        .collect();

    // reverse ordering by score, stable on the incoming order
    normalized.sort();
    normalized.truncate(how_many);
    Ok(normalized)
}

/// Softmax with the maximum subtracted before exponentiation.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exponentials: Vec<f64> = scores.iter().map(|score| (score - max_score).exp()).collect();
    let total: f64 = exponentials.iter().sum();
    exponentials.into_iter().map(|value| value / total).collect()
}

#[cfg(test)]
mod scoring_test {
    use float_cmp::approx_eq;

    use super::*;
    use crate::userknn::encoder::encode_liked_items;
    use crate::userknn::rating_matrix::RatingMatrix;

    fn items(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn should_normalize_with_softmax() {
        let probabilities = softmax(&[1.0, 2.0, 3.0]);
        assert!(approx_eq!(f64, 1.0, probabilities.iter().sum::<f64>(), epsilon = 1e-12));
        assert!(approx_eq!(f64, 0.09003057317038046, probabilities[0], epsilon = 1e-12));
        assert!(approx_eq!(f64, 0.6652409557748219, probabilities[2], epsilon = 1e-12));
        assert!(softmax(&[]).is_empty());
    }

    #[test]
    fn should_not_overflow_on_large_scores() {
        let probabilities = softmax(&[1000.0, 1000.0]);
        assert!(approx_eq!(f64, 0.5, probabilities[0], epsilon = 1e-12));
        assert!(approx_eq!(f64, 0.5, probabilities[1], epsilon = 1e-12));
    }

    #[test]
    fn should_weight_deviations_from_neighbor_means() {
        // user 0: mean 7, rates "b" at 9 -> +2; user 1: mean 4, rates "b" at 2 -> -2
        let matrix = RatingMatrix::from_dense(
            items(&["a", "b", "c"]),
            vec![
                (1, vec![Some(5.0), Some(9.0), None]),
                (2, vec![Some(6.0), Some(2.0), None]),
            ],
        )
        .unwrap();
        let preferences = encode_liked_items(&matrix, &items(&["a"]));
        let neighbors = vec![UserScore::new(0, 0.75), UserScore::new(1, 0.25)];

        let predictions = predict_scores(&matrix, &preferences, &neighbors).unwrap();
        assert_eq!(1, predictions.len());
        assert_eq!(1, predictions[0].item_idx);
        // (0.75 * 2 + 0.25 * -2) / (0.75 + 0.25)
        assert!(approx_eq!(f64, 1.0, predictions[0].score, epsilon = 1e-12));
    }

    #[test]
    fn should_exclude_missing_ratings_instead_of_counting_zero_deviation() {
        let matrix = RatingMatrix::from_dense(
            items(&["a", "b", "c"]),
            vec![
                (1, vec![Some(4.0), None, Some(8.0)]),
                (2, vec![Some(4.0), Some(2.0), None]),
            ],
        )
        .unwrap();
        let preferences = encode_liked_items(&matrix, &items(&["a"]));
        let neighbors = vec![UserScore::new(0, 0.5), UserScore::new(1, 0.5)];

        let predictions = predict_scores(&matrix, &preferences, &neighbors).unwrap();
        let item_indices: Vec<usize> = predictions.iter().map(|scored| scored.item_idx).collect();
        assert_eq!(vec![1, 2], item_indices);
        // "b": only user 1 contributes 0.5 * (2 - 3)
        assert!(approx_eq!(f64, -0.5, predictions[0].score, epsilon = 1e-12));
        // "c": only user 0 contributes 0.5 * (8 - 6)
        assert!(approx_eq!(f64, 1.0, predictions[1].score, epsilon = 1e-12));
    }

    #[test]
    fn should_report_missing_candidates() {
        let matrix = RatingMatrix::from_dense(
            items(&["a", "b"]),
            vec![(1, vec![Some(7.0), None])],
        )
        .unwrap();
        let preferences = encode_liked_items(&matrix, &items(&["a"]));
        let neighbors = vec![UserScore::new(0, 1.0)];
        assert_eq!(
            Err(NoRecommendation::NoCandidateItems),
            predict_scores(&matrix, &preferences, &neighbors)
        );
    }

    #[test]
    fn should_report_zero_similarity_weight() {
        let matrix = RatingMatrix::from_dense(
            items(&["a", "b"]),
            vec![(1, vec![Some(7.0), Some(3.0)])],
        )
        .unwrap();
        let preferences = encode_liked_items(&matrix, &items(&["a"]));
        let neighbors = vec![UserScore::new(0, 0.0)];
        assert_eq!(
            Err(NoRecommendation::ZeroSimilarityWeight),
            predict_scores(&matrix, &preferences, &neighbors)
        );
    }

    #[test]
    fn should_rank_only_positive_predictions() {
        let predictions = vec![
            ItemScore::new(0, -1.0),
            ItemScore::new(1, 0.5),
            ItemScore::new(2, 0.0),
            ItemScore::new(3, 1.5),
            ItemScore::new(4, 0.5),
        ];
        let ranked = rank(predictions, 6).unwrap();
        let item_indices: Vec<usize> = ranked.iter().map(|scored| scored.item_idx).collect();
        // equal scores keep their incoming order
        assert_eq!(vec![3, 1, 4], item_indices);
        assert!(approx_eq!(f64, 1.0, ranked.iter().map(|scored| scored.score).sum::<f64>(), epsilon = 1e-12));
    }

    #[test]
    fn should_truncate_ranking() {
        let predictions = vec![ItemScore::new(0, 2.0), ItemScore::new(1, 1.0), ItemScore::new(2, 3.0)];
        let ranked = rank(predictions, 2).unwrap();
        assert_eq!(2, ranked.len());
        assert_eq!(2, ranked[0].item_idx);
        assert!(ranked.iter().map(|scored| scored.score).sum::<f64>() < 1.0);
    }

    #[test]
    fn should_report_no_positive_scores() {
        let predictions = vec![ItemScore::new(0, -0.1), ItemScore::new(1, 0.0)];
        assert_eq!(Err(NoRecommendation::NoPositiveScores), rank(predictions, 5));
    }
}
