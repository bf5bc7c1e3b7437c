use std::cmp::Ordering;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::catalog::BookCatalog;
use crate::io::ItemId;
use crate::userknn::encoder::encode_liked_items;
use crate::userknn::rating_matrix::RatingMatrix;
use crate::userknn::scoring::{predict_scores, rank};
use crate::userknn::similarity::SimilarityComputation;

pub mod encoder;
pub mod neighbors;
pub mod rating_matrix;
pub mod scoring;
pub mod similarity;

pub const DEFAULT_NEIGHBORHOOD_SIZE_K: usize = 30;
pub const DEFAULT_NUM_RECOMMENDATIONS: usize = 5;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

#[derive(PartialEq, Debug)]
pub struct UserScore {
    pub user_idx: usize,
    pub score: f64,
}

impl UserScore {
    pub fn new(user_idx: usize, score: f64) -> Self {
        UserScore { user_idx, score }
    }
}

impl Eq for UserScore {}

impl Ord for UserScore {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse order by score
        match self.score.partial_cmp(&other.score) {
            Some(Ordering::Less) => Ordering::Greater,
            Some(Ordering::Greater) => Ordering::Less,
            _ => Ordering::Equal,
        }
    }
}

impl PartialOrd for UserScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(PartialEq, Debug)]
pub struct ItemScore {
    pub item_idx: usize,
    pub score: f64,
}

impl ItemScore {
    pub fn new(item_idx: usize, score: f64) -> Self {
        ItemScore { item_idx, score }
    }
}

impl Eq for ItemScore {}

impl Ord for ItemScore {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse order by score
        match self.score.partial_cmp(&other.score) {
            Some(Ordering::Less) => Ordering::Greater,
            Some(Ordering::Greater) => Ordering::Less,
            _ => Ordering::Equal,
        }
    }
}

impl PartialOrd for ItemScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A recommended book with its softmax score relative to the other
/// recommendations of the same request.
#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct Recommendation {
    pub title: String,
    pub author: String,
    pub item_id: ItemId,
    pub score: f64,
}

/// Why a request produced no recommendations.
#[derive(Error, PartialEq, Eq, Debug, Clone, Copy)]
pub enum NoRecommendation {
    #[error("no liked items provided")]
    NoLikedItems,
    #[error("none of the liked items were found in the rating matrix")]
    NoLikedItemsInMatrix,
    #[error("no similar users found with positive similarity")]
    NoPositiveNeighbors,
    #[error("similar users have not rated any new items")]
    NoCandidateItems,
    #[error("sum of absolute similarities is zero")]
    ZeroSimilarityWeight,
    #[error("all candidate items had a predicted score of 0 or less")]
    NoPositiveScores,
}

/// Recommends up to `how_many` books for a synthetic user who likes
/// `liked_item_ids`, based on the `k` most similar users in `matrix`.
///
/// Every reason for not recommending anything results in an empty vector;
/// use [`try_recommend`] to find out which one applied.
pub fn recommend(
    liked_item_ids: &[ItemId],
    matrix: &RatingMatrix,
    catalog: &BookCatalog,
    k: usize,
    how_many: usize,
) -> Vec<Recommendation> {
    match try_recommend(liked_item_ids, matrix, catalog, k, how_many) {
        Ok(recommendations) => recommendations,
        Err(reason) => {
            debug!(%reason, "no recommendations generated");
            Vec::new()
        }
    }
}

pub fn try_recommend(
    liked_item_ids: &[ItemId],
    matrix: &RatingMatrix,
    catalog: &BookCatalog,
    k: usize,
    how_many: usize,
) -> Result<Vec<Recommendation>, NoRecommendation> {
    if liked_item_ids.is_empty() {
        return Err(NoRecommendation::NoLikedItems);
    }

    let preferences = encode_liked_items(matrix, liked_item_ids);
    if preferences.qty_liked_in_matrix() == 0 {
        return Err(NoRecommendation::NoLikedItemsInMatrix);
    }

    let neighbors = matrix.find_neighbors(&preferences, k);
    if neighbors.is_empty() {
        return Err(NoRecommendation::NoPositiveNeighbors);
    }
    debug!(
        qty_neighbors = neighbors.len(),
        top_similarity = neighbors[0].score,
        "selected neighbors"
    );

    let predictions = predict_scores(matrix, &preferences, &neighbors)?;
    let ranked = rank(predictions, how_many)?;

    let recommendations: Vec<Recommendation> = ranked
        .into_iter()
        .map(|scored| {
            let item_id = matrix.item_id(scored.item_idx);
            let (title, author) = match catalog.get(item_id) {
                Some(book) => (book.title.clone(), book.author_or_unknown().to_string()),
                None => (UNKNOWN_TITLE.to_string(), UNKNOWN_AUTHOR.to_string()),
            };
            Recommendation {
                title,
                author,
                item_id: item_id.clone(),
                score: scored.score,
            }
        })
        .collect();

    debug!(qty = recommendations.len(), "generated recommendations");
    Ok(recommendations)
}

#[cfg(test)]
mod userknn_test {
    use super::*;
    use crate::catalog::BookInfo;

    fn items(ids: &[&str]) -> Vec<ItemId> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn matrix() -> RatingMatrix {
        RatingMatrix::from_dense(
            items(&["i1", "i2", "i3", "i4", "i5"]),
            vec![
                (1, vec![Some(9.0), None, Some(3.0), Some(9.0), None]),
                (2, vec![Some(8.0), Some(2.0), None, Some(8.0), None]),
                (3, vec![None, Some(6.0), Some(6.0), None, None]),
            ],
        )
        .unwrap()
    }

    fn catalog() -> BookCatalog {
        BookCatalog::from_books(vec![(
            "i4".to_string(),
            BookInfo {
                title: "Dune".to_string(),
                author: Some("Frank Herbert".to_string()),
                publisher: None,
            },
        )])
    }

    #[test]
    fn should_recommend_with_metadata_and_placeholders() {
        let recommendations = recommend(&items(&["i1"]), &matrix(), &catalog(), 30, 5);

        assert_eq!(1, recommendations.len());
        assert_eq!("i4", recommendations[0].item_id);
        assert_eq!("Dune", recommendations[0].title);
        assert_eq!("Frank Herbert", recommendations[0].author);
        assert!((1.0 - recommendations[0].score).abs() < 1e-12);

        let empty_catalog = BookCatalog::from_books(Vec::new());
        let recommendations = recommend(&items(&["i1"]), &matrix(), &empty_catalog, 30, 5);
        assert_eq!(UNKNOWN_TITLE, recommendations[0].title);
        assert_eq!(UNKNOWN_AUTHOR, recommendations[0].author);
    }

    #[test]
    fn should_distinguish_empty_result_reasons() {
        let matrix = matrix();
        let catalog = catalog();
        assert_eq!(
            Err(NoRecommendation::NoLikedItems),
            try_recommend(&[], &matrix, &catalog, 30, 5)
        );
        assert_eq!(
            Err(NoRecommendation::NoLikedItemsInMatrix),
            try_recommend(&items(&["unknown"]), &matrix, &catalog, 30, 5)
        );
        assert_eq!(
            Err(NoRecommendation::NoPositiveNeighbors),
            try_recommend(&items(&["i5"]), &matrix, &catalog, 30, 5)
        );
        assert_eq!(
            Err(NoRecommendation::NoCandidateItems),
            try_recommend(&items(&["i1", "i2", "i3", "i4"]), &matrix, &catalog, 30, 5)
        );

        let flat_matrix = RatingMatrix::from_dense(
            items(&["a", "b"]),
            vec![(1, vec![Some(5.0), Some(5.0)])],
        )
        .unwrap();
        assert_eq!(
            Err(NoRecommendation::NoPositiveScores),
            try_recommend(&items(&["a"]), &flat_matrix, &catalog, 30, 5)
        );
        assert!(recommend(&items(&["unknown"]), &matrix, &catalog, 30, 5).is_empty());
    }

    #[test]
    fn handle_reverse_ordering_itemscore() {
        let mut scores = vec![
            ItemScore::new(123, 1.0),
            ItemScore::new(234, 5000.0),
            ItemScore::new(345, 100.0),
        ];
        scores.sort();
        let item_indices: Vec<usize> = scores.iter().map(|scored| scored.item_idx).collect();
        assert_eq!(vec![234, 345, 123], item_indices);
    }

    #[test]
    fn handle_reverse_ordering_userscore() {
        let mut scores = vec![
            UserScore::new(1, 0.2),
            UserScore::new(2, 0.9),
            UserScore::new(3, 0.2),
        ];
        scores.sort();
        let user_indices: Vec<usize> = scores.iter().map(|scored| scored.user_idx).collect();
        assert_eq!(vec![2, 1, 3], user_indices);
    }
}
