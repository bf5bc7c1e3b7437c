use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::dataframeutils::SharedHandlesAndConfig;

const MAX_BOOK_CHOICES: usize = 20;

#[derive(Debug, Deserialize)]
pub struct BookQueryParams {
    query: String,
}

// Lets a front-end turn typed text into "<title> by <author>" choices and
// the ISBNs to send to /v1/recommend.
#[get("/v1/books")]
pub async fn v1_books(
    data: web::Data<SharedHandlesAndConfig>,
    query: web::Query<BookQueryParams>,
) -> HttpResponse {
    let choices = data.book_catalog.search(&query.query, MAX_BOOK_CHOICES);
    HttpResponse::Ok().json(choices)
}

#[cfg(test)]
mod book_resource_test {
    use actix_web::{test, App};
    use serde_json::Value;

    use super::*;
    use crate::endpoints::recommend_resource::recommend_resource_test::handles;

    #[actix_rt::test]
    async fn should_search_books_by_display_string() {
        let mut app = test::init_service(App::new().data(handles()).service(v1_books)).await;
        let request = test::TestRequest::get().uri("/v1/books?query=austen").to_request();
        let response = test::call_service(&mut app, request).await;
        assert!(response.status().is_success());

        let body: Value = test::read_body_json(response).await;
        let choices = body.as_array().unwrap();
        assert_eq!(1, choices.len());
        assert_eq!("Emma by Jane Austen", choices[0]["display"]);
        assert_eq!("i2", choices[0]["isbn"]);
    }
}
