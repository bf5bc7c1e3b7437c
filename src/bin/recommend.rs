extern crate bookrec;

use anyhow::{bail, Context};

use bookrec::config::AppConfig;
use bookrec::io::ItemId;
use bookrec::userknn::{try_recommend, NoRecommendation};
use bookrec::{io, logging};

// One-shot recommendations from the command line:
//   recommend <config> <isbn> [<isbn> ...]
fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_default();
    let liked_item_ids: Vec<ItemId> = args.collect();
    if liked_item_ids.is_empty() {
        bail!("usage: recommend <config> <isbn> [<isbn> ...]");
    }

    let config = AppConfig::new(&config_path)?;
    logging::init(&config.log);

    let rating_matrix = io::load_ratings(&config.data)?;
    let book_catalog = io::read_book_catalog(&config.data.books_path)
        .with_context(|| format!("loading books from {}", config.data.books_path))?;

    match try_recommend(
        &liked_item_ids,
        &rating_matrix,
        &book_catalog,
        config.model.neighborhood_size_k,
        config.model.num_items_to_recommend,
    ) {
        Ok(recommendations) => {
            for (rank, recommendation) in recommendations.iter().enumerate() {
                println!(
                    "{}. {} by {} (ISBN: {}, score: {:.4})",
                    rank + 1,
                    recommendation.title,
                    recommendation.author,
                    recommendation.item_id,
                    recommendation.score
                );
            }
        }
        Err(NoRecommendation::NoLikedItemsInMatrix) => {
            println!("None of the given ISBNs are rated in the data set.");
        }
        Err(reason) => {
            println!("No new recommendations: {}.", reason);
        }
    }
    Ok(())
}
