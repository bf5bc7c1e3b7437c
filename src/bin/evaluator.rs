extern crate bookrec;

use indicatif::ProgressBar;

use bookrec::config::AppConfig;
use bookrec::holdout;
use bookrec::metrics::evaluation_reporter::EvaluationReporter;
use bookrec::stopwatch::Stopwatch;
use bookrec::userknn;
use bookrec::{io, logging};

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(&config_path)?;
    logging::init(&config.log);

    let neighborhood_size_k = config.model.neighborhood_size_k;
    let num_items_to_recommend = config.model.num_items_to_recommend;
    let evaluation = &config.evaluation;

    let rating_matrix = io::load_ratings(&config.data)?;
    // Titles are irrelevant for scoring, placeholders are fine here.
    let book_catalog = bookrec::catalog::BookCatalog::from_books(Vec::new());

    let split = holdout::split(
        &rating_matrix,
        evaluation.test_user_fraction,
        evaluation.like_threshold,
        evaluation.query_fraction,
        evaluation.seed,
    );

    let mut reporter = EvaluationReporter::new(split.training.qty_items(), evaluation.metric_length);
    let mut stopwatch = Stopwatch::new();
    let mut qty_empty = 0_usize;

    let progress = ProgressBar::new(split.cases.len() as u64);
    for case in split.cases.iter() {
        progress.inc(1);
        stopwatch.start();
        let recommendations = userknn::recommend(
            &case.query_items,
            &split.training,
            &book_catalog,
            neighborhood_size_k,
            num_items_to_recommend.max(evaluation.metric_length),
        );
        stopwatch.stop();
        if recommendations.is_empty() {
            qty_empty += 1;
        }
        let recommended_items: Vec<_> = recommendations
            .into_iter()
            .map(|recommendation| recommendation.item_id)
            .collect();
        reporter.add(&recommended_items, &case.held_out_items);
    }
    progress.finish();

    println!("===============================================================");
    println!("===             START EVALUATING HOLD-OUT USERS            ====");
    println!("===============================================================");
    println!("{}", reporter.get_name());
    println!("{}", reporter.result());
    println!("Qty test evaluations: {}", stopwatch.get_n());
    println!("Qty empty recommendation lists: {}", qty_empty);
    println!("Prediction latency");
    println!("p90 (microseconds): {}", stopwatch.get_percentile_in_micros(0.90));
    println!("p95 (microseconds): {}", stopwatch.get_percentile_in_micros(0.95));
    println!("p99.5 (microseconds): {}", stopwatch.get_percentile_in_micros(0.995));
    Ok(())
}
