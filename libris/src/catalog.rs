//! Book inventory with a category index.
//!
//! The inventory is keyed by ISBN. The index is a [`BinarySearchTree`] from
//! category to an ISBN. A category shared by several books holds one node
//! per book, and lookups return the first one on the search path, which is
//! the book indexed earliest among those still present.

use log::debug;

use crate::config::Config;
use crate::error::{LibraryError, Result};
use crate::map::ChainedHashMap;
use crate::recommend::BookNode;
use crate::tree::BinarySearchTree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub total_copies: u32,
    pub available_copies: u32,
}

impl Book {
    /// A book with every copy on the shelf.
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
        total_copies: u32,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            category: category.into(),
            total_copies,
            available_copies: total_copies,
        }
    }

    /// The graph-facing view of this book.
    pub fn node(&self) -> BookNode {
        BookNode::new(&*self.isbn, &*self.category, &*self.author)
    }

    fn matches(&self, needle: &str) -> bool {
        [&self.author, &self.title, &self.category, &self.isbn]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone)]
pub struct BookStore {
    inventory: ChainedHashMap<String, Book>,
    category_index: BinarySearchTree<String, String>,
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookStore {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            inventory: ChainedHashMap::with_policy(config.index_buckets, config.growth),
            category_index: BinarySearchTree::new(),
        }
    }

    /// Stores and indexes a new book and returns `true`. For a known ISBN
    /// only the copy counts are taken over and `false` is returned.
    pub fn add_book(&mut self, book: Book) -> bool {
        if let Some(stored) = self.inventory.get_mut(book.isbn.as_str()) {
            debug!("restocking {}", book.isbn);
            stored.total_copies = book.total_copies;
            stored.available_copies = book.available_copies;
            return false;
        }

        self.category_index
            .insert(book.category.clone(), book.isbn.clone());
        self.inventory.set(book.isbn.clone(), book);
        true
    }

    pub fn get_book(&self, isbn: &str) -> Result<&Book> {
        self.inventory
            .get(isbn)
            .ok_or_else(|| LibraryError::BookNotFound(isbn.to_owned()))
    }

    /// The representative book indexed under `category`.
    pub fn book_by_category(&self, category: &str) -> Result<&Book> {
        let isbn = self
            .category_index
            .search(&category.to_owned())
            .ok_or_else(|| LibraryError::CategoryNotFound(category.to_owned()))?;
        self.get_book(isbn)
    }

    /// Indexed ISBNs in level order of the category tree.
    pub fn books_by_category(&self) -> Vec<&String> {
        self.category_index.tree_to_vec()
    }

    pub fn all_books(&self) -> impl Iterator<Item = &Book> + '_ {
        self.inventory.values()
    }

    pub fn len(&self) -> usize {
        self.inventory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inventory.is_empty()
    }

    /// Case-insensitive substring search over author, title, category and ISBN.
    pub fn search(&self, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.all_books()
            .filter(|book| book.matches(&needle))
            .collect()
    }

    /// Moves a book to another category, re-pointing the index.
    pub fn update_category(&mut self, isbn: &str, category: &str) -> Result<&Book> {
        let previous = self.get_book(isbn)?.category.clone();
        if previous != category {
            self.unindex(&previous, isbn);
            self.category_index
                .insert(category.to_owned(), isbn.to_owned());
        }

        let book = self
            .inventory
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::BookNotFound(isbn.to_owned()))?;
        book.category = category.to_owned();
        Ok(&*book)
    }

    pub fn remove_book(&mut self, isbn: &str) -> Option<Book> {
        let book = self.inventory.take(isbn)?;
        self.unindex(&book.category, isbn);
        Some(book)
    }

    fn unindex(&mut self, category: &str, isbn: &str) {
        self.category_index
            .delete_where(&category.to_owned(), |indexed| indexed == isbn);
    }
}
