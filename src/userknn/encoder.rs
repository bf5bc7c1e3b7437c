use hashbrown::HashSet;
use tracing::warn;

use crate::io::ItemId;
use crate::userknn::rating_matrix::RatingMatrix;

/// One-shot preference vector of a synthetic user, aligned to the item axis
/// of a `RatingMatrix`. Liked items are 1.0, everything else 0.0.
pub struct PreferenceVector {
    pub values: Vec<f64>,
    pub liked_item_indices: HashSet<usize>,
}

impl PreferenceVector {
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|value| value * value).sum::<f64>().sqrt()
    }

    pub fn qty_liked_in_matrix(&self) -> usize {
        self.liked_item_indices.len()
    }

    pub fn is_liked(&self, item_idx: usize) -> bool {
        self.liked_item_indices.contains(&item_idx)
    }
}

/// Encodes liked item ids into a `PreferenceVector`. Ids that are not on the
/// item axis are skipped with a warning.
pub fn encode_liked_items(matrix: &RatingMatrix, liked_item_ids: &[ItemId]) -> PreferenceVector {
    let mut values = vec![0.0; matrix.qty_items()];
    let mut liked_item_indices = HashSet::with_capacity(liked_item_ids.len());

    for item_id in liked_item_ids.iter() {
        match matrix.item_index(item_id) {
            Some(item_idx) => {
                values[item_idx] = 1.0;
                liked_item_indices.insert(item_idx);
            }
            None => warn!(item_id = %item_id, "liked item not found in rating matrix columns"),
        }
    }

    PreferenceVector {
        values,
        liked_item_indices,
    }
}
