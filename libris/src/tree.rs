//! Unbalanced binary search tree used as a secondary index.
//!
//! Keys smaller than a node go left, everything else (ties included) goes
//! right. Nothing rebalances the tree, so a sorted insert sequence produces
//! a chain of height `n` and every operation degrades to O(n).

use std::cmp::Ordering;
use std::collections::VecDeque;

type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Debug, Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn new_leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BinarySearchTree<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K, V> Default for BinarySearchTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> BinarySearchTree<K, V> {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level: Vec<&Node<K, V>> = self.root.as_deref().into_iter().collect();
        while !level.is_empty() {
            height += 1;
            level = level
                .into_iter()
                .flat_map(|n| n.left.as_deref().into_iter().chain(n.right.as_deref()))
                .collect();
        }
        height
    }

    /// Values in breadth-first order starting at the root.
    pub fn tree_to_vec(&self) -> Vec<&V> {
        let mut out = Vec::with_capacity(self.len);
        let mut queue: VecDeque<&Node<K, V>> = self.root.as_deref().into_iter().collect();

        while let Some(node) = queue.pop_front() {
            out.push(&node.value);
            if let Some(left) = &node.left {
                queue.push_back(left);
            }
            if let Some(right) = &node.right {
                queue.push_back(right);
            }
        }
        out
    }

    /// Entries in key order (left, node, right).
    pub fn in_order(&self) -> Vec<(&K, &V)> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack: Vec<&Node<K, V>> = Vec::new();
        let mut cursor = self.root.as_deref();

        loop {
            while let Some(node) = cursor {
                stack.push(node);
                cursor = node.left.as_deref();
            }
            match stack.pop() {
                Some(node) => {
                    out.push((&node.key, &node.value));
                    cursor = node.right.as_deref();
                }
                None => break,
            }
        }
        out
    }
}

impl<K: Ord, V> BinarySearchTree<K, V> {
    pub fn insert(&mut self, key: K, value: V) {
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = if key < node.key {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *link = Some(Box::new(Node::new_leaf(key, value)));
        self.len += 1;
    }

    /// Value of the first node on the search path whose key equals `key`.
    pub fn search(&self, key: &K) -> Option<&V> {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match key.cmp(&node.key) {
                Ordering::Equal => return Some(&node.value),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    pub fn search_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut cursor = self.root.as_deref_mut();
        while let Some(node) = cursor {
            cursor = match key.cmp(&node.key) {
                Ordering::Equal => return Some(&mut node.value),
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
            };
        }
        None
    }

    /// Removes the first node matching `key` and returns its value.
    ///
    /// A node with two children takes over the key and value of its in-order
    /// successor, which is then unlinked from the right subtree.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.delete_where(key, |_| true)
    }

    /// Like [`delete`](Self::delete), but skips nodes whose value fails
    /// `pred`. Equal keys live in right subtrees, so the walk keeps going
    /// right past a rejected duplicate.
    pub fn delete_where<F>(&mut self, key: &K, pred: F) -> Option<V>
    where
        F: Fn(&V) -> bool,
    {
        let removed = Self::delete_from(&mut self.root, key, &pred);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    fn delete_from<F>(link: &mut Link<K, V>, key: &K, pred: &F) -> Option<V>
    where
        F: Fn(&V) -> bool,
    {
        let node = link.as_mut()?;
        match key.cmp(&node.key) {
            Ordering::Less => Self::delete_from(&mut node.left, key, pred),
            Ordering::Greater => Self::delete_from(&mut node.right, key, pred),
            Ordering::Equal if !pred(&node.value) => Self::delete_from(&mut node.right, key, pred),
            Ordering::Equal => {
                let mut node = link.take()?;
                let value = match (node.left.take(), node.right.take()) {
                    (None, None) => node.value,
                    (Some(child), None) | (None, Some(child)) => {
                        *link = Some(child);
                        node.value
                    }
                    (Some(left), Some(right)) => {
                        let mut right = Some(right);
                        let (succ_key, succ_value) = Self::pop_min(&mut right)?;
                        node.key = succ_key;
                        let value = std::mem::replace(&mut node.value, succ_value);
                        node.left = Some(left);
                        node.right = right;
                        *link = Some(node);
                        value
                    }
                };
                Some(value)
            }
        }
    }

    fn pop_min(link: &mut Link<K, V>) -> Option<(K, V)> {
        if link.as_ref()?.left.is_some() {
            return Self::pop_min(&mut link.as_mut()?.left);
        }
        let node = link.take()?;
        let Node {
            key, value, right, ..
        } = *node;
        *link = right;
        Some((key, value))
    }
}
