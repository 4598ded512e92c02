//! Borrow-graph recommendations.
//!
//! Users, books, categories and authors share one `Graph<String>`
//! namespace. A parallel kind map tags every identifier. Category and author
//! identifiers are synthesized with [`CATEGORY_PREFIX`] and [`AUTHOR_PREFIX`]
//! so they cannot collide with ISBNs or user ids. Edges only ever join
//! user-book, book-category and book-author.
//!
//! Nothing is cached: both strategies walk the graph as it is at query time.

use log::{debug, warn};

use crate::config::{Config, AUTHOR_PREFIX, CATEGORY_PREFIX};
use crate::error::{LibraryError, Result};
use crate::graph::Graph;
use crate::map::ChainedHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    User,
    Book,
    Category,
    Author,
}

/// The part of a book the graph cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookNode {
    pub isbn: String,
    pub category: String,
    pub author: String,
}

impl BookNode {
    pub fn new(
        isbn: impl Into<String>,
        category: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            category: category.into(),
            author: author.into(),
        }
    }
}

pub fn category_node_id(category: &str) -> String {
    format!("{CATEGORY_PREFIX}{category}")
}

pub fn author_node_id(author: &str) -> String {
    format!("{AUTHOR_PREFIX}{author}")
}

/// Whether `id` is a synthesized category or author identifier.
pub fn is_reserved_id(id: &str) -> bool {
    id.starts_with(CATEGORY_PREFIX) || id.starts_with(AUTHOR_PREFIX)
}

#[derive(Debug, Clone)]
pub struct RecommendationSystem {
    graph: Graph<String>,
    kinds: ChainedHashMap<String, NodeKind>,
}

impl Default for RecommendationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationSystem {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            graph: Graph::with_policy(config.graph_buckets, config.growth),
            kinds: ChainedHashMap::with_policy(config.index_buckets, config.growth),
        }
    }

    pub fn graph(&self) -> &Graph<String> {
        &self.graph
    }

    pub fn kind(&self, id: &str) -> Option<NodeKind> {
        self.kinds.get(id).copied()
    }

    fn is(&self, id: &str, kind: NodeKind) -> bool {
        self.kind(id) == Some(kind)
    }

    /// Registers `user_id` as a user. An id that already names another kind
    /// of node is retagged as a user, with a warning.
    pub fn add_user_node(&mut self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        if is_reserved_id(&user_id) {
            warn!("user id {} uses a reserved prefix", user_id);
        }
        if let Some(kind) = self.kind(&user_id).filter(|k| *k != NodeKind::User) {
            warn!("retagging {:?} node {} as a user", kind, user_id);
        }

        self.graph.add_node(user_id.clone());
        self.kinds.set(user_id, NodeKind::User);
    }

    /// Registers a book and links it to its category and author, creating
    /// those on first use. A known ISBN is left untouched, even when the
    /// category or author differ from the first registration.
    pub fn add_book_node(&mut self, book: &BookNode) -> bool {
        if self.kinds.has(book.isbn.as_str()) {
            debug!("book {} already registered", book.isbn);
            return false;
        }

        self.graph.add_node(book.isbn.clone());
        self.kinds.set(book.isbn.clone(), NodeKind::Book);

        let category = category_node_id(&book.category);
        self.ensure_node(&category, NodeKind::Category);
        self.graph.add_edges(&book.isbn, &category);

        let author = author_node_id(&book.author);
        self.ensure_node(&author, NodeKind::Author);
        self.graph.add_edges(&book.isbn, &author);
        true
    }

    fn ensure_node(&mut self, id: &str, kind: NodeKind) {
        if !self.kinds.has(id) {
            self.graph.add_node(id.to_owned());
            self.kinds.set(id.to_owned(), kind);
        }
    }

    /// Records that `user_id` borrowed `isbn`.
    pub fn add_relation(&mut self, user_id: &str, isbn: &str) -> Result<()> {
        if !self.is(user_id, NodeKind::User) || !self.is(isbn, NodeKind::Book) {
            return Err(LibraryError::InvalidRelation {
                user: user_id.to_owned(),
                isbn: isbn.to_owned(),
            });
        }

        self.graph.add_edges(&user_id.to_owned(), &isbn.to_owned());
        Ok(())
    }

    /// Drops every borrow edge between `user_id` and `isbn`. Only a user and
    /// a book can share a borrow edge, any other pair is refused.
    pub fn remove_relation(&mut self, user_id: &str, isbn: &str) -> bool {
        if !self.is(user_id, NodeKind::User) || !self.is(isbn, NodeKind::Book) {
            warn!("no borrow edge between {} and {}", user_id, isbn);
            return false;
        }
        self.graph
            .delete_edges(&user_id.to_owned(), &isbn.to_owned())
    }

    /// Users currently linked to `isbn`, once per stored edge.
    pub fn book_users(&self, isbn: &str) -> Vec<&str> {
        self.neighbors_of_kind(isbn, NodeKind::User).collect()
    }

    /// Removes a book with all of its edges. Category and author nodes left
    /// without neighbors are removed too.
    pub fn remove_book(&mut self, isbn: &str) -> bool {
        if !self.is(isbn, NodeKind::Book) {
            warn!("cannot remove {}: not a book", isbn);
            return false;
        }

        let hubs: Vec<String> = self
            .graph
            .get_neighbors(isbn)
            .iter()
            .filter(|id| {
                matches!(
                    self.kind(id),
                    Some(NodeKind::Category) | Some(NodeKind::Author)
                )
            })
            .cloned()
            .collect();

        self.drop_node(isbn);
        for hub in hubs {
            let orphaned = self.graph.has_node(hub.as_str())
                && self.graph.get_neighbors(hub.as_str()).is_empty();
            if orphaned {
                self.drop_node(&hub);
            }
        }
        true
    }

    pub fn remove_user(&mut self, user_id: &str) -> bool {
        if !self.is(user_id, NodeKind::User) {
            warn!("cannot remove {}: not a user", user_id);
            return false;
        }
        self.drop_node(user_id)
    }

    fn drop_node(&mut self, id: &str) -> bool {
        self.kinds.delete(id);
        self.graph.delete_node(&id.to_owned())
    }

    fn neighbors_of_kind<'a>(
        &'a self,
        id: &str,
        kind: NodeKind,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.graph
            .get_neighbors(id)
            .iter()
            .map(String::as_str)
            .filter(move |n| self.is(n, kind))
    }

    /// Collaborative strategy: books borrowed by users who share at least one
    /// borrowed book with `user_id`, ranked by how many such users borrowed
    /// them. Ties keep the order in which candidates were first met.
    pub fn user_book_recommendations(&self, user_id: &str, limit: usize) -> Vec<String> {
        let borrowed: Vec<&str> = self.neighbors_of_kind(user_id, NodeKind::Book).collect();

        let mut similar_users: Vec<&str> = Vec::new();
        let mut seen: ChainedHashMap<&str, ()> = ChainedHashMap::new();
        for isbn in &borrowed {
            for user in self.neighbors_of_kind(isbn, NodeKind::User) {
                if user != user_id && seen.set(user, ()).is_none() {
                    similar_users.push(user);
                }
            }
        }

        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut slots: ChainedHashMap<&str, usize> = ChainedHashMap::new();
        for user in &similar_users {
            for isbn in self.neighbors_of_kind(user, NodeKind::Book) {
                if borrowed.contains(&isbn) {
                    continue;
                }
                match slots.get(isbn) {
                    Some(&slot) => counts[slot].1 += 1,
                    None => {
                        slots.set(isbn, counts.len());
                        counts.push((isbn, 1));
                    }
                }
            }
        }

        // stable: equal counts stay in first-encounter order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        debug!(
            "user {}: {} borrowed, {} similar users, {} candidates",
            user_id,
            borrowed.len(),
            similar_users.len(),
            counts.len()
        );

        counts
            .into_iter()
            .take(limit)
            .map(|(isbn, _)| isbn.to_owned())
            .collect()
    }

    /// Content strategy: other books sharing a category, then other books
    /// sharing an author, in discovery order. No ranking.
    pub fn content_based_recommendations(&self, isbn: &str, limit: usize) -> Vec<String> {
        let hubs = self
            .neighbors_of_kind(isbn, NodeKind::Category)
            .chain(self.neighbors_of_kind(isbn, NodeKind::Author));

        let mut related: Vec<&str> = Vec::new();
        let mut seen: ChainedHashMap<&str, ()> = ChainedHashMap::new();
        for hub in hubs {
            for book in self.neighbors_of_kind(hub, NodeKind::Book) {
                if book != isbn && seen.set(book, ()).is_none() {
                    related.push(book);
                }
            }
        }
        debug!("book {}: {} related books", isbn, related.len());

        related.into_iter().take(limit).map(str::to_owned).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_RECOMMENDATION_LIMIT;

    fn system_with(books: &[(&str, &str, &str)], users: &[&str]) -> RecommendationSystem {
        let mut system = RecommendationSystem::new();
        for (isbn, category, author) in books {
            let book = BookNode::new(*isbn, *category, *author);
            assert!(system.add_book_node(&book));
        }
        for user in users {
            system.add_user_node(*user);
        }
        system
    }

    fn borrow(system: &mut RecommendationSystem, loans: &[(&str, &str)]) {
        for (user, isbn) in loans {
            system.add_relation(user, isbn).unwrap();
        }
    }

    #[test]
    fn book_registration_creates_tagged_hubs() {
        let system = system_with(&[("B1", "Fantasy", "Tolkien")], &[]);
        assert_eq!(system.kind("B1"), Some(NodeKind::Book));
        assert_eq!(system.kind("cat_Fantasy"), Some(NodeKind::Category));
        assert_eq!(system.kind("auth_Tolkien"), Some(NodeKind::Author));
        assert_eq!(
            system.graph().get_neighbors("B1"),
            &["cat_Fantasy", "auth_Tolkien"]
        );
        assert_eq!(system.graph().node_count(), 3);
        assert_eq!(system.graph().edge_count(), 2);
    }

    #[test]
    fn hubs_are_shared_between_books() {
        let system = system_with(&[("B1", "Fantasy", "X"), ("B2", "Fantasy", "Y")], &[]);
        assert_eq!(system.graph().get_neighbors("cat_Fantasy"), &["B1", "B2"]);
        assert_eq!(system.graph().node_count(), 5);
    }

    #[test]
    fn re_registering_an_isbn_is_a_no_op() {
        let mut system = system_with(&[("B1", "Fantasy", "X")], &[]);
        let (nodes, edges) = (system.graph().node_count(), system.graph().edge_count());

        assert!(!system.add_book_node(&BookNode::new("B1", "Fantasy", "X")));
        assert_eq!(system.graph().node_count(), nodes);
        assert_eq!(system.graph().edge_count(), edges);

        // Known quirk: different metadata for a known ISBN is ignored too.
        assert!(!system.add_book_node(&BookNode::new("B1", "Horror", "Z")));
        assert_eq!(system.kind("cat_Horror"), None);
        assert_eq!(system.graph().edge_count(), edges);
    }

    #[test]
    fn relations_require_a_user_and_a_book() {
        let mut system = system_with(&[("B1", "Fantasy", "X")], &["U1"]);
        assert!(system.add_relation("U1", "B1").is_ok());

        let err = system.add_relation("B1", "U1").unwrap_err();
        assert_eq!(
            err,
            LibraryError::InvalidRelation {
                user: "B1".into(),
                isbn: "U1".into()
            }
        );
        assert!(system.add_relation("U1", "cat_Fantasy").is_err());
        assert!(system.add_relation("ghost", "B1").is_err());
        assert_eq!(system.book_users("B1"), vec!["U1"]);
    }

    #[test]
    fn collaborative_recommends_co_borrowed_books() {
        let mut system = system_with(
            &[("B1", "A", "a"), ("B2", "B", "b"), ("B3", "C", "c")],
            &["U1", "U2", "U3"],
        );
        borrow(
            &mut system,
            &[
                ("U1", "B1"),
                ("U1", "B2"),
                ("U2", "B1"),
                ("U2", "B3"),
                ("U3", "B1"),
            ],
        );

        let recs = system.user_book_recommendations("U1", DEFAULT_RECOMMENDATION_LIMIT);
        assert_eq!(recs, vec!["B3"]);
        assert!(!recs.contains(&"B1".to_string()));
        assert!(!recs.contains(&"B2".to_string()));
    }

    #[test]
    fn collaborative_ranks_by_count_then_first_encounter() {
        let mut system = system_with(
            &[
                ("B1", "A", "a"),
                ("B2", "A", "a"),
                ("B3", "A", "a"),
                ("B4", "A", "a"),
            ],
            &["U1", "U2", "U3"],
        );
        borrow(
            &mut system,
            &[
                ("U1", "B1"),
                ("U2", "B1"),
                ("U2", "B4"),
                ("U2", "B2"),
                ("U2", "B3"),
                ("U3", "B1"),
                ("U3", "B3"),
            ],
        );
        assert_eq!(
            system.user_book_recommendations("U1", 5),
            vec!["B3", "B4", "B2"]
        );
        assert_eq!(system.user_book_recommendations("U1", 2), vec!["B3", "B4"]);
        assert!(system.user_book_recommendations("U1", 0).is_empty());
    }

    #[test]
    fn collaborative_counts_repeated_borrows() {
        let mut system = system_with(
            &[("B1", "A", "a"), ("B2", "A", "a"), ("B3", "A", "a")],
            &["U1", "U2", "U3"],
        );
        borrow(
            &mut system,
            &[
                ("U1", "B1"),
                ("U2", "B1"),
                ("U2", "B2"),
                ("U3", "B1"),
                ("U3", "B3"),
                ("U3", "B3"),
            ],
        );
        assert_eq!(system.user_book_recommendations("U1", 5), vec!["B3", "B2"]);
    }

    #[test]
    fn collaborative_is_empty_without_overlap() {
        let mut system = system_with(&[("B1", "A", "a"), ("B2", "A", "a")], &["U1", "U2", "U3"]);
        borrow(&mut system, &[("U2", "B1"), ("U3", "B2")]);
        assert!(system.user_book_recommendations("U1", 5).is_empty());
        assert!(system.user_book_recommendations("U2", 5).is_empty());
        assert!(system.user_book_recommendations("nobody", 5).is_empty());
    }

    #[test]
    fn content_based_follows_category_then_author() {
        let system = system_with(
            &[
                ("B1", "Fantasy", "X"),
                ("B2", "Fantasy", "Y"),
                ("B3", "Horror", "X"),
                ("B4", "Horror", "Z"),
            ],
            &[],
        );
        assert_eq!(
            system.content_based_recommendations("B1", 5),
            vec!["B2", "B3"]
        );
        assert_eq!(system.content_based_recommendations("B1", 1), vec!["B2"]);
        assert_eq!(system.content_based_recommendations("B4", 5), vec!["B3"]);
        let missing = system.content_based_recommendations("missing", 5);
        assert!(missing.is_empty());
    }

    #[test]
    fn content_based_ignores_borrowers() {
        let mut system = system_with(&[("B1", "Fantasy", "X"), ("B2", "Fantasy", "X")], &["U1"]);
        borrow(&mut system, &[("U1", "B1"), ("U1", "B2")]);
        // B2 is reachable through both hubs but listed once
        assert_eq!(system.content_based_recommendations("B1", 5), vec!["B2"]);
    }

    #[test]
    fn returning_a_book_drops_the_borrow_edge() {
        let mut system = system_with(&[("B1", "A", "a")], &["U1"]);
        borrow(&mut system, &[("U1", "B1"), ("U1", "B1")]);
        assert_eq!(system.book_users("B1"), vec!["U1", "U1"]);
        assert!(system.remove_relation("U1", "B1"));
        assert!(system.book_users("B1").is_empty());
        assert!(!system.remove_relation("U1", "ghost"));
    }

    #[test]
    fn returning_only_unlinks_users_from_books() {
        let mut system = system_with(&[("B1", "Fantasy", "X")], &["U1"]);
        borrow(&mut system, &[("U1", "B1")]);

        assert!(!system.remove_relation("B1", "cat_Fantasy"));
        assert!(!system.remove_relation("B1", "U1"));
        assert!(!system.remove_relation("auth_X", "B1"));
        assert_eq!(
            system.graph().get_neighbors("B1"),
            &["cat_Fantasy", "auth_X", "U1"]
        );
        assert_eq!(system.book_users("B1"), vec!["U1"]);
    }

    #[test]
    fn user_registration_retags_existing_ids() {
        let mut system = system_with(&[("B1", "Fantasy", "X")], &["U1"]);
        let nodes = system.graph().node_count();

        system.add_user_node("U1");
        assert_eq!(system.kind("U1"), Some(NodeKind::User));
        assert_eq!(system.graph().node_count(), nodes);

        system.add_user_node("cat_Fantasy");
        assert_eq!(system.kind("cat_Fantasy"), Some(NodeKind::User));
        assert_eq!(system.graph().get_neighbors("cat_Fantasy"), &["B1"]);
        assert_eq!(system.graph().node_count(), nodes);
    }

    #[test]
    fn removing_a_book_cleans_up_orphaned_hubs() {
        let mut system = system_with(&[("B1", "Fantasy", "X"), ("B2", "Fantasy", "Y")], &["U1"]);
        borrow(&mut system, &[("U1", "B1")]);

        assert!(system.remove_book("B1"));
        assert_eq!(system.kind("B1"), None);
        assert!(!system.graph().has_node("B1"));
        assert!(!system.graph().has_node("auth_X"));
        assert_eq!(system.kind("auth_X"), None);
        assert!(system.graph().has_node("cat_Fantasy"));
        assert_eq!(system.graph().get_neighbors("cat_Fantasy"), &["B2"]);
        assert!(system.graph().get_neighbors("U1").is_empty());

        assert!(!system.remove_book("B1"));
        assert!(!system.remove_book("U1"));
    }

    #[test]
    fn removing_a_user() {
        let mut system = system_with(&[("B1", "A", "a")], &["U1"]);
        borrow(&mut system, &[("U1", "B1")]);
        assert!(system.remove_user("U1"));
        assert!(!system.remove_user("U1"));
        assert!(!system.remove_user("B1"));
        assert!(system.book_users("B1").is_empty());
    }

    #[test]
    fn reserved_ids() {
        assert_eq!(category_node_id("Fantasy"), "cat_Fantasy");
        assert_eq!(author_node_id("X"), "auth_X");
        assert!(is_reserved_id("cat_Fantasy"));
        assert!(is_reserved_id("auth_X"));
        assert!(!is_reserved_id("9780451524935"));
    }

    #[test]
    fn growing_config_behaves_the_same() {
        let mut system = RecommendationSystem::with_config(Config::default().with_growth(1));
        for i in 0..50 {
            system.add_book_node(&BookNode::new(format!("B{i}"), "Shared", format!("A{i}")));
        }
        assert_eq!(system.content_based_recommendations("B0", 100).len(), 49);
    }
}
