use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use rayon::prelude::*;

use crate::error::DataError;
use crate::io::{ItemId, Rating, UserId};

/// Sparse, read-only user by item rating matrix.
///
/// Rows only hold the ratings that are present, as `(item_index, rating)`
/// pairs sorted by item index. A missing entry means "not rated", which is
/// different from a rating of zero.
pub struct RatingMatrix {
    user_ids: Vec<UserId>,
    item_ids: Vec<ItemId>,
    item_to_index: HashMap<ItemId, usize>,
    user_to_ratings: Vec<Vec<(u32, Rating)>>,
    user_to_norm: Vec<f64>,
    user_to_mean: Vec<Option<f64>>,
}

impl RatingMatrix {
    /// Builds a matrix from dense rows aligned to `item_ids`.
    pub fn from_dense(
        item_ids: Vec<ItemId>,
        rows: Vec<(UserId, Vec<Option<Rating>>)>,
    ) -> Result<Self, DataError> {
        let qty_items = item_ids.len();
        let mut user_ids = Vec::with_capacity(rows.len());
        let mut user_to_ratings = Vec::with_capacity(rows.len());

        for (user_id, row) in rows.into_iter() {
            if row.len() != qty_items {
                return Err(DataError::RowLength {
                    user_id,
                    expected: qty_items,
                    actual: row.len(),
                });
            }
            let ratings: Vec<(u32, Rating)> = row
                .into_iter()
                .enumerate()
                .filter_map(|(item_idx, rating)| rating.map(|value| (item_idx as u32, value)))
                .collect();
            user_ids.push(user_id);
            user_to_ratings.push(ratings);
        }

        Self::assemble(user_ids, item_ids, user_to_ratings)
    }

    /// Pivots `(user, item, rating)` triples into a matrix. Both axes are
    /// sorted ascending and repeated `(user, item)` pairs are averaged.
    pub fn from_ratings(triples: Vec<(UserId, ItemId, Rating)>) -> Result<Self, DataError> {
        let mut user_ids: Vec<UserId> = triples.iter().map(|(user_id, _, _)| *user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        let mut item_ids: Vec<ItemId> = triples
            .iter()
            .map(|(_, item_id, _)| item_id.clone())
            .unique()
            .collect();
        item_ids.sort_unstable();

        // The index borrows `item_ids`, so it has to go before `assemble` takes them.
        let cells = {
            let item_to_index: HashMap<&ItemId, u32> = item_ids
                .iter()
                .enumerate()
                .map(|(idx, item_id)| (item_id, idx as u32))
                .collect();
            let user_to_index: HashMap<UserId, usize> = user_ids
                .iter()
                .enumerate()
                .map(|(idx, user_id)| (*user_id, idx))
                .collect();

            let mut cells: HashMap<(usize, u32), (f64, usize)> =
                HashMap::with_capacity(triples.len());
            for (user_id, item_id, rating) in triples.iter() {
                let key = (user_to_index[user_id], item_to_index[item_id]);
                let cell = cells.entry(key).or_insert((0.0, 0));
                cell.0 += rating;
                cell.1 += 1;
            }
            cells
        };

        let mut user_to_ratings: Vec<Vec<(u32, Rating)>> = vec![Vec::new(); user_ids.len()];
        for ((user_idx, item_idx), (sum, qty)) in cells.into_iter() {
            user_to_ratings[user_idx].push((item_idx, sum / qty as f64));
        }
        for ratings in user_to_ratings.iter_mut() {
            ratings.sort_unstable_by_key(|(item_idx, _)| *item_idx);
        }

        Self::assemble(user_ids, item_ids, user_to_ratings)
    }

    /// Returns a matrix with the same item axis holding only the given rows,
    /// in the given order.
    pub fn select_users(&self, user_indices: &[usize]) -> RatingMatrix {
        RatingMatrix {
            user_ids: user_indices.iter().map(|&idx| self.user_ids[idx]).collect(),
            item_ids: self.item_ids.clone(),
            item_to_index: self.item_to_index.clone(),
            user_to_ratings: user_indices
                .iter()
                .map(|&idx| self.user_to_ratings[idx].clone())
                .collect(),
            user_to_norm: user_indices.iter().map(|&idx| self.user_to_norm[idx]).collect(),
            user_to_mean: user_indices.iter().map(|&idx| self.user_to_mean[idx]).collect(),
        }
    }

    fn assemble(
        user_ids: Vec<UserId>,
        item_ids: Vec<ItemId>,
        user_to_ratings: Vec<Vec<(u32, Rating)>>,
    ) -> Result<Self, DataError> {
        let mut item_to_index = HashMap::with_capacity(item_ids.len());
        for (idx, item_id) in item_ids.iter().enumerate() {
            if item_to_index.insert(item_id.clone(), idx).is_some() {
                return Err(DataError::DuplicateItem(item_id.clone()));
            }
        }
        let mut seen_users: HashSet<UserId> = HashSet::with_capacity(user_ids.len());
        for user_id in user_ids.iter() {
            if !seen_users.insert(*user_id) {
                return Err(DataError::DuplicateUser(*user_id));
            }
        }

        // Missing ratings count as 0 for the norm but are ignored by the mean.
        let (user_to_norm, user_to_mean): (Vec<f64>, Vec<Option<f64>>) = user_to_ratings
            .par_iter()
            .map(|ratings| {
                let norm = ratings
                    .iter()
                    .map(|(_, rating)| rating * rating)
                    .sum::<f64>()
                    .sqrt();
                let mean = if ratings.is_empty() {
                    None
                } else {
                    Some(ratings.iter().map(|(_, rating)| rating).sum::<f64>() / ratings.len() as f64)
                };
                (norm, mean)
            })
            .unzip();

        Ok(RatingMatrix {
            user_ids,
            item_ids,
            item_to_index,
            user_to_ratings,
            user_to_norm,
            user_to_mean,
        })
    }

    pub fn qty_users(&self) -> usize {
        self.user_ids.len()
    }

    pub fn qty_items(&self) -> usize {
        self.item_ids.len()
    }

    pub fn qty_ratings(&self) -> usize {
        self.user_to_ratings.iter().map(|ratings| ratings.len()).sum()
    }

    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    pub fn item_id(&self, item_idx: usize) -> &ItemId {
        &self.item_ids[item_idx]
    }

    pub fn user_id(&self, user_idx: usize) -> UserId {
        self.user_ids[user_idx]
    }

    pub fn item_index(&self, item_id: &str) -> Option<usize> {
        self.item_to_index.get(item_id).copied()
    }

    pub fn ratings_for_user(&self, user_idx: usize) -> &[(u32, Rating)] {
        &self.user_to_ratings[user_idx]
    }

    pub fn rating(&self, user_idx: usize, item_idx: usize) -> Option<Rating> {
        let ratings = &self.user_to_ratings[user_idx];
        ratings
            .binary_search_by_key(&(item_idx as u32), |(idx, _)| *idx)
            .ok()
            .map(|pos| ratings[pos].1)
    }

    pub fn row_norm(&self, user_idx: usize) -> f64 {
        self.user_to_norm[user_idx]
    }

    pub fn mean_rating(&self, user_idx: usize) -> Option<f64> {
        self.user_to_mean[user_idx]
    }
}

#[cfg(test)]
mod rating_matrix_test {
    use super::*;

    fn isbns(ids: &[&str]) -> Vec<ItemId> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn should_keep_missing_ratings_out_of_rows() {
        let matrix = RatingMatrix::from_dense(
            isbns(&["a", "b", "c"]),
            vec![(7, vec![Some(8.0), None, Some(4.0)]), (9, vec![None, None, None])],
        )
        .unwrap();

        assert_eq!(2, matrix.qty_users());
        assert_eq!(3, matrix.qty_items());
        assert_eq!(2, matrix.qty_ratings());
        assert_eq!(&[(0, 8.0), (2, 4.0)], matrix.ratings_for_user(0));
        assert_eq!(None, matrix.rating(0, 1));
        assert_eq!(Some(4.0), matrix.rating(0, 2));
        assert_eq!(Some(6.0), matrix.mean_rating(0));
        assert_eq!(None, matrix.mean_rating(1));
        assert!((80.0_f64.sqrt() - matrix.row_norm(0)).abs() < f64::EPSILON);
        assert!((0.0 - matrix.row_norm(1)).abs() < f64::EPSILON);
    }

    #[test]
    fn should_reject_duplicate_axis_labels() {
        let duplicate_items =
            RatingMatrix::from_dense(isbns(&["a", "a"]), vec![(1, vec![None, None])]);
        assert!(matches!(duplicate_items, Err(DataError::DuplicateItem(item)) if item == "a"));

        let duplicate_users = RatingMatrix::from_dense(
            isbns(&["a"]),
            vec![(1, vec![Some(1.0)]), (1, vec![Some(2.0)])],
        );
        assert!(matches!(duplicate_users, Err(DataError::DuplicateUser(1))));
    }

    #[test]
    fn should_reject_rows_with_wrong_length() {
        let result = RatingMatrix::from_dense(isbns(&["a", "b"]), vec![(3, vec![Some(1.0)])]);
        assert!(matches!(
            result,
            Err(DataError::RowLength { user_id: 3, expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn should_pivot_triples_with_sorted_axes() {
        let matrix = RatingMatrix::from_ratings(vec![
            (20, "z".to_string(), 5.0),
            (10, "b".to_string(), 7.0),
            (20, "b".to_string(), 9.0),
            (20, "b".to_string(), 7.0),
        ])
        .unwrap();

        assert_eq!(&[10, 20], matrix.user_ids());
        assert_eq!(&isbns(&["b", "z"])[..], matrix.item_ids());
        assert_eq!(Some(8.0), matrix.rating(1, 0));
        assert_eq!(Some(5.0), matrix.rating(1, 1));
        assert_eq!(None, matrix.rating(0, 1));
        assert_eq!(Some(1), matrix.item_index("z"));
        assert_eq!(None, matrix.item_index("missing"));
    }

    #[test]
    fn should_select_users_and_keep_item_axis() {
        let matrix = RatingMatrix::from_dense(
            isbns(&["a", "b"]),
            vec![
                (1, vec![Some(1.0), None]),
                (2, vec![None, Some(2.0)]),
                (3, vec![Some(3.0), Some(3.0)]),
            ],
        )
        .unwrap();

        let selected = matrix.select_users(&[2, 0]);
        assert_eq!(&[3, 1], selected.user_ids());
        assert_eq!(2, selected.qty_items());
        assert_eq!(Some(3.0), selected.mean_rating(0));
        assert_eq!(Some(1.0), selected.rating(1, 0));
    }
}
