use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::catalog::{BookCatalog, BookInfo};
use crate::config::{DataConfig, RatingsLayout};
use crate::error::DataError;
use crate::userknn::rating_matrix::RatingMatrix;

pub type UserId = u64;
pub type ItemId = String;
pub type Rating = f64;

/// Reads a wide rating matrix: the first column holds user ids, every other
/// header cell is an item id and empty cells are missing ratings.
pub fn read_rating_matrix<P: AsRef<Path>>(path: P) -> Result<RatingMatrix, DataError> {
    let file = File::open(path.as_ref())?;
    let matrix = read_rating_matrix_from_reader(file)?;
    info!(
        path = %path.as_ref().display(),
        users = matrix.qty_users(),
        items = matrix.qty_items(),
        "loaded rating matrix"
    );
    Ok(matrix)
}

pub fn read_rating_matrix_from_reader<R: Read>(reader: R) -> Result<RatingMatrix, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(DataError::MissingUserColumn);
    }
    let item_ids: Vec<ItemId> = headers.iter().skip(1).map(|item| item.trim().to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let raw_user_id = record.get(0).unwrap_or_default().trim();
        let user_id = parse_user_id(raw_user_id, line)?;

        let mut ratings = Vec::with_capacity(item_ids.len());
        for raw_rating in record.iter().skip(1) {
            let raw_rating = raw_rating.trim();
            if raw_rating.is_empty() || raw_rating.eq_ignore_ascii_case("nan") {
                ratings.push(None);
            } else {
                let rating = raw_rating
                    .parse::<Rating>()
                    .ok()
                    .filter(|rating| rating.is_finite())
                    .ok_or_else(|| DataError::InvalidRating {
                        value: raw_rating.to_string(),
                        user_id,
                        line,
                    })?;
                ratings.push(Some(rating));
            }
        }
        rows.push((user_id, ratings));
    }

    RatingMatrix::from_dense(item_ids, rows)
}

fn parse_user_id(raw: &str, line: u64) -> Result<UserId, DataError> {
    // pandas writes integer indices as "276847" but may also write "276847.0"
    raw.parse::<UserId>()
        .or_else(|_| match raw.parse::<f64>() {
            Ok(value) if value.fract() == 0.0 && value >= 0.0 => Ok(value as UserId),
            _ => Err(()),
        })
        .map_err(|_| DataError::InvalidUserId {
            value: raw.to_string(),
            line,
        })
}

#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "User-ID")]
    user_id: UserId,
    #[serde(rename = "ISBN")]
    isbn: ItemId,
    #[serde(rename = "Book-Rating")]
    rating: Rating,
}

/// Reads long-format ratings (`User-ID,ISBN,Book-Rating`) and pivots them.
pub fn read_rating_triples<P: AsRef<Path>>(path: P) -> Result<RatingMatrix, DataError> {
    let file = File::open(path.as_ref())?;
    let matrix = read_rating_triples_from_reader(file)?;
    info!(
        path = %path.as_ref().display(),
        users = matrix.qty_users(),
        items = matrix.qty_items(),
        "pivoted rating triples"
    );
    Ok(matrix)
}

pub fn read_rating_triples_from_reader<R: Read>(reader: R) -> Result<RatingMatrix, DataError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut triples = Vec::new();
    for result in reader.records() {
        let raw_record = result?;
        let line = raw_record.position().map(|pos| pos.line()).unwrap_or_default();
        let record: RatingRecord = raw_record.deserialize(Some(&headers))?;
        // serde happily parses "nan" and "inf" into an f64
        if !record.rating.is_finite() {
            return Err(DataError::InvalidRating {
                value: record.rating.to_string(),
                user_id: record.user_id,
                line,
            });
        }
        triples.push((record.user_id, record.isbn, record.rating));
    }
    RatingMatrix::from_ratings(triples)
}

/// Loads the ratings in whichever layout the data section declares.
pub fn load_ratings(data: &DataConfig) -> Result<RatingMatrix, DataError> {
    match data.ratings_layout {
        RatingsLayout::Matrix => read_rating_matrix(&data.ratings_path),
        RatingsLayout::Triples => read_rating_triples(&data.ratings_path),
    }
}

#[derive(Debug, Deserialize)]
struct BookRecord {
    #[serde(rename = "ISBN")]
    isbn: Option<String>,
    #[serde(rename = "Book-Title")]
    title: Option<String>,
    #[serde(rename = "Book-Author")]
    author: Option<String>,
    #[serde(rename = "Publisher")]
    publisher: Option<String>,
}

/// Reads book metadata. Rows without an ISBN or a title are dropped.
pub fn read_book_catalog<P: AsRef<Path>>(path: P) -> Result<BookCatalog, DataError> {
    let file = File::open(path.as_ref())?;
    let catalog = read_book_catalog_from_reader(file)?;
    info!(path = %path.as_ref().display(), books = catalog.len(), "loaded book catalog");
    Ok(catalog)
}

pub fn read_book_catalog_from_reader<R: Read>(reader: R) -> Result<BookCatalog, DataError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut books = Vec::new();
    for result in reader.deserialize::<BookRecord>() {
        let record = result?;
        let isbn = non_blank(record.isbn);
        let title = non_blank(record.title);
        if let (Some(isbn), Some(title)) = (isbn, title) {
            books.push((
                isbn,
                BookInfo {
                    title,
                    author: non_blank(record.author),
                    publisher: non_blank(record.publisher),
                },
            ));
        }
    }
    Ok(BookCatalog::from_books(books))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
