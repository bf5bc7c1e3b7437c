use std::sync::Arc;

use chrono::{DateTime, Utc};
use num_format::{Locale, ToFormattedString};
use tdigest::TDigest;
use tracing::info;

use crate::catalog::BookCatalog;
use crate::userknn::rating_matrix::RatingMatrix;

/// Process-wide, read-only handles shared by all request workers.
pub struct SharedHandlesAndConfig {
    pub rating_matrix: Arc<RatingMatrix>,
    pub book_catalog: Arc<BookCatalog>,
    pub rating_data_stats: Arc<RatingDataStats>,
    pub neighborhood_size_k: usize,
    pub num_items_to_recommend: usize,
    pub qty_workers: usize,
}

#[derive(Debug, Clone)]
pub struct RatingDataStats {
    pub descriptive_name: String,
    pub qty_users: usize,
    pub qty_items: usize,
    pub qty_ratings: usize,
    pub qty_books_in_catalog: usize,
    pub density: f64,
    pub min_rating: f64,
    pub max_rating: f64,
    pub mean_rating: f64,
    pub ratings_per_user_p50: f64,
    pub ratings_per_user_p90: f64,
    pub ratings_per_user_p99: f64,
    pub loaded_at: DateTime<Utc>,
}

pub fn determine_rating_data_statistics(
    descriptive_name: &str,
    matrix: &RatingMatrix,
    catalog: &BookCatalog,
) -> RatingDataStats {
    let qty_users = matrix.qty_users();
    let qty_items = matrix.qty_items();
    let qty_ratings = matrix.qty_ratings();

    let density = if qty_users > 0 && qty_items > 0 {
        qty_ratings as f64 / (qty_users as f64 * qty_items as f64)
    } else {
        0.0
    };

    let mut min_rating = f64::INFINITY;
    let mut max_rating = f64::NEG_INFINITY;
    let mut sum_of_ratings = 0.0;
    let mut ratings_per_user = Vec::with_capacity(qty_users);
    for user_idx in 0..qty_users {
        let ratings = matrix.ratings_for_user(user_idx);
        ratings_per_user.push(ratings.len() as f64);
        for (_, rating) in ratings.iter() {
            min_rating = min_rating.min(*rating);
            max_rating = max_rating.max(*rating);
            sum_of_ratings += rating;
        }
    }
    let (min_rating, max_rating, mean_rating) = if qty_ratings > 0 {
        (min_rating, max_rating, sum_of_ratings / qty_ratings as f64)
    } else {
        (0.0, 0.0, 0.0)
    };

    let (ratings_per_user_p50, ratings_per_user_p90, ratings_per_user_p99) =
        if ratings_per_user.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let digest = TDigest::new_with_size(100).merge_unsorted(ratings_per_user);
            (
                digest.estimate_quantile(0.5),
                digest.estimate_quantile(0.9),
                digest.estimate_quantile(0.99),
            )
        };

    let stats = RatingDataStats {
        descriptive_name: descriptive_name.to_string(),
        qty_users,
        qty_items,
        qty_ratings,
        qty_books_in_catalog: catalog.len(),
        density,
        min_rating,
        max_rating,
        mean_rating,
        ratings_per_user_p50,
        ratings_per_user_p90,
        ratings_per_user_p99,
        loaded_at: Utc::now(),
    };

    info!(
        name = %stats.descriptive_name,
        users = %stats.qty_users.to_formatted_string(&Locale::en),
        items = %stats.qty_items.to_formatted_string(&Locale::en),
        ratings = %stats.qty_ratings.to_formatted_string(&Locale::en),
        books = %stats.qty_books_in_catalog.to_formatted_string(&Locale::en),
        density = stats.density,
        "loaded rating data"
    );
    info!(
        p50 = stats.ratings_per_user_p50,
        p90 = stats.ratings_per_user_p90,
        p99 = stats.ratings_per_user_p99,
        "ratings per user percentiles"
    );

    stats
}
