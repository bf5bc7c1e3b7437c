use hashbrown::HashMap;
use serde::Serialize;

use crate::io::ItemId;
use crate::userknn::UNKNOWN_AUTHOR;

#[derive(Debug, Clone, PartialEq)]
pub struct BookInfo {
    pub title: String,
    pub author: Option<String>,
    pub publisher: Option<String>,
}

impl BookInfo {
    pub fn author_or_unknown(&self) -> &str {
        self.author.as_deref().unwrap_or(UNKNOWN_AUTHOR)
    }

    /// "<title> by <author>", used to tell apart books sharing a title.
    pub fn display_string(&self) -> String {
        format!("{} by {}", self.title, self.author_or_unknown())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookChoice {
    pub display: String,
    pub isbn: ItemId,
}

/// Read-only ISBN to book metadata lookup, plus the display string index
/// used when picking liked books by name.
pub struct BookCatalog {
    isbn_to_book: HashMap<ItemId, BookInfo>,
    display_to_isbn: HashMap<String, ItemId>,
    display_strings_sorted: Vec<String>,
}

impl BookCatalog {
    /// Later entries for the same ISBN replace earlier ones. Display strings
    /// are derived from the surviving metadata; when several ISBNs share one,
    /// the ISBN that appeared first wins.
    pub fn from_books(books: Vec<(ItemId, BookInfo)>) -> Self {
        let mut isbns_in_order: Vec<ItemId> = Vec::with_capacity(books.len());
        let mut isbn_to_book: HashMap<ItemId, BookInfo> = HashMap::with_capacity(books.len());
        for (isbn, book) in books.into_iter() {
            if isbn_to_book.insert(isbn.clone(), book).is_none() {
                isbns_in_order.push(isbn);
            }
        }

        let mut display_to_isbn: HashMap<String, ItemId> = HashMap::with_capacity(isbn_to_book.len());
        for isbn in isbns_in_order.into_iter() {
            if let Some(book) = isbn_to_book.get(&isbn) {
                display_to_isbn.entry(book.display_string()).or_insert(isbn);
            }
        }
        let mut display_strings_sorted: Vec<String> = display_to_isbn.keys().cloned().collect();
        display_strings_sorted.sort_unstable();

        BookCatalog {
            isbn_to_book,
            display_to_isbn,
            display_strings_sorted,
        }
    }

    pub fn get(&self, isbn: &str) -> Option<&BookInfo> {
        self.isbn_to_book.get(isbn)
    }

    pub fn len(&self) -> usize {
        self.isbn_to_book.len()
    }

    pub fn is_empty(&self) -> bool {
        self.isbn_to_book.is_empty()
    }

    pub fn display_strings(&self) -> &[String] {
        &self.display_strings_sorted
    }

    pub fn isbn_for_display(&self, display: &str) -> Option<&ItemId> {
        self.display_to_isbn.get(display)
    }

    /// Maps selected display strings to ISBNs, dropping unknown selections.
    pub fn resolve_display_strings(&self, selections: &[String]) -> Vec<ItemId> {
        selections
            .iter()
            .filter_map(|display| self.isbn_for_display(display).cloned())
            .collect()
    }

    /// Case-insensitive substring search over display strings, in sorted
    /// order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<BookChoice> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.display_strings_sorted
            .iter()
            .filter(|display| display.to_lowercase().contains(&needle))
            .take(limit)
            .filter_map(|display| {
                self.display_to_isbn.get(display).map(|isbn| BookChoice {
                    display: display.clone(),
                    isbn: isbn.clone(),
                })
            })
            .collect()
    }
}
