//! Hand-rolled containers and a borrow-graph recommendation engine for a
//! small library catalog.
//!
//! Leaf first: [`ChainedHashMap`] backs everything, [`BinarySearchTree`]
//! indexes books by category, [`Graph`] holds the borrow graph and
//! [`RecommendationSystem`] answers "what to read next" by walking it.
//!
//! None of the containers synchronize. Wrap a whole structure in a single
//! lock if it has to be shared between threads.

pub mod catalog;
pub mod config;
pub mod error;
pub mod graph;
pub mod logger;
pub mod map;
pub mod recommend;
pub mod tree;

pub use catalog::{Book, BookStore};
pub use config::Config;
pub use error::{LibraryError, Result};
pub use graph::Graph;
pub use map::{CanonicalKey, ChainedHashMap, Growth, Map};
pub use recommend::{BookNode, NodeKind, RecommendationSystem};
pub use tree::BinarySearchTree;
