use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::dataframeutils::SharedHandlesAndConfig;
use crate::io::ItemId;
use crate::userknn;

#[derive(Debug, Deserialize)]
pub struct V1QueryParams {
    isbns: String,
    how_many: Option<usize>,
}

// Main endpoint: `isbns` is a comma separated list of liked books.
// An empty JSON array means no recommendation could be made.
#[get("/v1/recommend")]
pub async fn v1_recommend(
    data: web::Data<SharedHandlesAndConfig>,
    query: web::Query<V1QueryParams>,
) -> HttpResponse {
    let liked_item_ids: Vec<ItemId> = query
        .isbns
        .split(',')
        .map(str::trim)
        .filter(|isbn| !isbn.is_empty())
        .map(String::from)
        .collect();
    if liked_item_ids.is_empty() {
        return HttpResponse::BadRequest().body("query parameter 'isbns' needs at least one ISBN");
    }

    let how_many = query.how_many.unwrap_or(data.num_items_to_recommend);
    let recommendations = userknn::recommend(
        &liked_item_ids,
        data.rating_matrix.as_ref(),
        data.book_catalog.as_ref(),
        data.neighborhood_size_k,
        how_many,
    );

    HttpResponse::Ok().json(recommendations)
}
