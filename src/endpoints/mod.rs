pub mod book_resource;
pub mod index_resource;
pub mod recommend_resource;
