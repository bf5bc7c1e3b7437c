extern crate sys_info;

use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use num_format::{Locale, ToFormattedString};

use crate::dataframeutils::SharedHandlesAndConfig;
use web::Data;

#[get("/internal")]
pub async fn internal(config: Data<SharedHandlesAndConfig>) -> HttpResponse {
    let mut html = "<html>bookrec: book recommendations from similar readers.<br />".to_string();

    let data_stats = &config.rating_data_stats;
    html.push_str("<h3>Rating data</h3>");
    html.push_str("Loaded: ");
    html.push_str(&data_stats.descriptive_name);
    html.push_str("<br />Qty Users: ");
    html.push_str(&data_stats.qty_users.to_formatted_string(&Locale::en));
    html.push_str("<br />Qty Books (matrix columns): ");
    html.push_str(&data_stats.qty_items.to_formatted_string(&Locale::en));
    html.push_str("<br />Qty Ratings: ");
    html.push_str(&data_stats.qty_ratings.to_formatted_string(&Locale::en));
    html.push_str("<br />Qty Books in catalog: ");
    html.push_str(&data_stats.qty_books_in_catalog.to_formatted_string(&Locale::en));
    html.push_str(&format!("<br />Density: {:.6}", data_stats.density));
    html.push_str(&format!(
        "<br />Ratings: min={} max={} mean={:.3}",
        data_stats.min_rating, data_stats.max_rating, data_stats.mean_rating
    ));
    html.push_str(&format!(
        "<br />Ratings per user percentiles: p50={:.0} p90={:.0} p99={:.0}",
        data_stats.ratings_per_user_p50,
        data_stats.ratings_per_user_p90,
        data_stats.ratings_per_user_p99
    ));
    html.push_str("<br />Loaded at: ");
    html.push_str(&data_stats.loaded_at.to_rfc3339());
    html.push_str("<br />Age (hours): ");
    let age_hours = (Utc::now() - data_stats.loaded_at).num_hours();
    html.push_str(&age_hours.to_string());

    html.push_str("<h3>Model</h3>");
    html.push_str("hyperparameters");
    html.push_str("<br />k : ");
    html.push_str(&config.neighborhood_size_k.to_string());
    html.push_str(" (top `k` most similar users used for scoring)");
    html.push_str("<br />Qty items to recommend: ");
    html.push_str(&config.num_items_to_recommend.to_string());
    html.push_str("<br /><a href=\"/v1/books?query=harry\">search books</a>");
    html.push_str("<h3>Machine instance</h3>");
    html.push_str("<br />Qty CPU's detected: ");
    html.push_str(&sys_info::cpu_num().unwrap_or(0).to_string());
    html.push_str("<br />Qty actix workers set: ");
    html.push_str(&config.qty_workers.to_string());
    html.push_str("<br />CPU speed: ");
    html.push_str(&sys_info::cpu_speed().unwrap_or(0).to_string());
    html.push_str("MHz");
    html.push_str("<h3>Metrics</h3>");
    html.push_str("<a href=\"/internal/prometheus\">prometheus</a>");
    html.push_str("</html>");

    HttpResponse::Ok().content_type("text/html").body(html)
}
