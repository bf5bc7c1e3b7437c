extern crate bookrec;

use actix_web::{http::ContentEncoding, middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use actix_web_prom::PrometheusMetrics;
use anyhow::Context;
use tracing::info;

use actix_web::http::header;
use std::sync::Arc;

use bookrec::config::AppConfig;
use bookrec::dataframeutils::{determine_rating_data_statistics, SharedHandlesAndConfig};
use bookrec::endpoints::book_resource::v1_books;
use bookrec::endpoints::index_resource::internal;
use bookrec::endpoints::recommend_resource::v1_recommend;
use bookrec::{io, logging};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(&config_path)?;
    logging::init(&config.log);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let neighborhood_size_k = config.model.neighborhood_size_k;
    let num_items_to_recommend = config.model.num_items_to_recommend;
    let qty_workers = config.server.num_workers;

    // Loaded once, read-only for every worker afterwards.
    let rating_matrix = Arc::new(
        io::load_ratings(&config.data)
            .with_context(|| format!("loading ratings from {}", config.data.ratings_path))?,
    );
    let book_catalog = Arc::new(
        io::read_book_catalog(&config.data.books_path)
            .with_context(|| format!("loading books from {}", config.data.books_path))?,
    );
    let rating_data_stats = Arc::new(determine_rating_data_statistics(
        &config.data.ratings_path,
        &rating_matrix,
        &book_catalog,
    ));

    info!("start metrics");
    let prometheus = PrometheusMetrics::new("api", Some("/internal/prometheus"), None);

    info!("Done. start httpd at http://{}", &bind_address);
    HttpServer::new(move || {
        let handles_and_config = SharedHandlesAndConfig {
            rating_matrix: rating_matrix.clone(),
            book_catalog: book_catalog.clone(),
            rating_data_stats: rating_data_stats.clone(),
            neighborhood_size_k,
            num_items_to_recommend,
            qty_workers,
        };

        App::new()
            .wrap(middleware::Compress::new(ContentEncoding::Identity))
            .wrap(prometheus.clone())
            .wrap(
                middleware::DefaultHeaders::new()
                    .header("Cache-Control", "no-cache, no-store, must-revalidate")
                    .header("Pragma", "no-cache")
                    .header("Expires", "0"),
            )
            .data(handles_and_config)
            .service(v1_recommend)
            .service(v1_books)
            .service(internal)
            .service(web::resource("/").route(web::get().to(|_req: HttpRequest| {
                HttpResponse::Found()
                    .header(header::LOCATION, "/internal")
                    .finish()
            })))
    })
    .workers(qty_workers)
    .bind(&bind_address)
    .with_context(|| format!("Could not bind server to address {}", &bind_address))?
    .run()
    .await?;

    Ok(())
}
