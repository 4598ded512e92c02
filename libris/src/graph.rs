//! Undirected adjacency-list graph over [`ChainedHashMap`].
//!
//! Every edge is stored twice, once in each endpoint's neighbor list. The
//! lists are sequences, not sets: adding the same edge twice records it
//! twice. Operations that name a missing node log a warning and return
//! `false` without touching the graph.

use std::borrow::Borrow;
use std::collections::VecDeque;

use log::{trace, warn};

use crate::map::{CanonicalKey, ChainedHashMap, Growth};

#[derive(Debug, Clone)]
pub struct Graph<T> {
    adjacents: ChainedHashMap<T, Vec<T>>,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self {
            adjacents: ChainedHashMap::new(),
        }
    }
}

impl<T> Graph<T>
where
    T: CanonicalKey + Clone,
{
    pub fn new() -> Self {
        Self {
            adjacents: ChainedHashMap::new(),
        }
    }

    pub fn with_buckets(num_buckets: usize) -> Self {
        Self::with_policy(num_buckets, Growth::Fixed)
    }

    pub fn with_policy(num_buckets: usize, growth: Growth) -> Self {
        Self {
            adjacents: ChainedHashMap::with_policy(num_buckets, growth),
        }
    }

    /// Ensures `node` exists. Existing neighbors are left alone.
    pub fn add_node(&mut self, node: T) {
        if !self.adjacents.has(&node) {
            trace!("add node {}", node.canonical());
            self.adjacents.set(node, Vec::new());
        }
    }

    pub fn add_nodes<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = T>,
    {
        for node in nodes {
            self.add_node(node);
        }
    }

    pub fn has_node<Q>(&self, node: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: CanonicalKey + ?Sized,
    {
        self.adjacents.has(node)
    }

    /// Links `a` and `b`. Both must already be nodes of the graph.
    pub fn add_edges(&mut self, a: &T, b: &T) -> bool {
        if !self.require_nodes(a, b) {
            return false;
        }

        if let Some(list) = self.adjacents.get_mut(a) {
            list.push(b.clone());
        }
        if let Some(list) = self.adjacents.get_mut(b) {
            list.push(a.clone());
        }
        trace!("add edge {} <-> {}", a.canonical(), b.canonical());
        true
    }

    /// Removes every occurrence of the edge between `a` and `b`.
    pub fn delete_edges(&mut self, a: &T, b: &T) -> bool {
        if !self.require_nodes(a, b) {
            return false;
        }

        if let Some(list) = self.adjacents.get_mut(a) {
            list.retain(|n| n != b);
        }
        if let Some(list) = self.adjacents.get_mut(b) {
            list.retain(|n| n != a);
        }
        trace!("delete edge {} <-> {}", a.canonical(), b.canonical());
        true
    }

    /// Removes `node` and scrubs it from the lists of all its neighbors.
    pub fn delete_node(&mut self, node: &T) -> bool {
        let neighbors = match self.adjacents.take(node) {
            Some(neighbors) => neighbors,
            None => {
                warn!("the node has to exist in the graph: {}", node.canonical());
                return false;
            }
        };

        for neighbor in &neighbors {
            if let Some(list) = self.adjacents.get_mut(neighbor) {
                list.retain(|n| n != node);
            }
        }
        trace!("delete node {}", node.canonical());
        true
    }

    /// Neighbors of `node`, empty when the node does not exist.
    pub fn get_neighbors<Q>(&self, node: &Q) -> &[T]
    where
        T: Borrow<Q>,
        Q: CanonicalKey + ?Sized,
    {
        self.adjacents.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes in the enumeration order of the backing map.
    pub fn nodes(&self) -> impl Iterator<Item = &T> + '_ {
        self.adjacents.keys()
    }

    pub fn node_count(&self) -> usize {
        self.adjacents.len()
    }

    /// Stored edges, counting repeated edges once per insertion.
    pub fn edge_count(&self) -> usize {
        self.adjacents.values().map(Vec::len).sum::<usize>() / 2
    }

    pub fn bfs(&self, start: &T) -> Vec<T> {
        let mut visited = Vec::new();
        let mut seen = self.visited_set();
        let mut queue = VecDeque::from([start.clone()]);
        seen.set(start.clone(), ());

        while let Some(current) = queue.pop_front() {
            for neighbor in self.get_neighbors(&current) {
                if !seen.has(neighbor) {
                    seen.set(neighbor.clone(), ());
                    queue.push_back(neighbor.clone());
                }
            }
            visited.push(current);
        }
        visited
    }

    pub fn dfs(&self, start: &T) -> Vec<T> {
        let mut visited = Vec::new();
        let mut seen = self.visited_set();
        self.dfs_visit(start, &mut seen, &mut visited);
        visited
    }

    fn dfs_visit(&self, node: &T, seen: &mut ChainedHashMap<T, ()>, visited: &mut Vec<T>) {
        seen.set(node.clone(), ());
        visited.push(node.clone());

        for neighbor in self.get_neighbors(node) {
            if !seen.has(neighbor) {
                self.dfs_visit(neighbor, seen, visited);
            }
        }
    }

    /// Whether `to` can be reached from `from`. A node always reaches itself.
    pub fn exist_path(&self, from: &T, to: &T) -> bool {
        let mut seen = self.visited_set();
        let mut queue = VecDeque::from([from.clone()]);

        while let Some(current) = queue.pop_front() {
            if current == *to {
                return true;
            }
            for neighbor in self.get_neighbors(&current) {
                if !seen.has(neighbor) {
                    seen.set(neighbor.clone(), ());
                    queue.push_back(neighbor.clone());
                }
            }
        }
        false
    }

    fn visited_set(&self) -> ChainedHashMap<T, ()> {
        ChainedHashMap::with_buckets(self.adjacents.len())
    }

    fn require_nodes(&self, a: &T, b: &T) -> bool {
        let present = self.adjacents.has(a) && self.adjacents.has(b);
        if !present {
            warn!(
                "the nodes have to exist in the graph: {}, {}",
                a.canonical(),
                b.canonical()
            );
        }
        present
    }
}
