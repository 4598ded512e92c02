use std::borrow::Borrow;
use std::fmt;

use super::{djb2, CanonicalKey, Map};
use crate::config::DEFAULT_NUM_BUCKETS;

type Bucket<K, V> = Vec<(K, V)>;

/// How a [`ChainedHashMap`] reacts to long chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Growth {
    /// The bucket count set at construction never changes. Long chains
    /// degrade lookups to O(bucket length).
    #[default]
    Fixed,
    /// Double the bucket count once the average chain reaches this length.
    /// Rehashing moves entries, so enumeration order changes after a resize.
    Grow { max_avg_bucket_size: usize },
}

/// A separately-chained hash map.
///
/// Keys are hashed with DJB2 over their canonical string form and reduced
/// modulo the bucket count. Each bucket keeps its entries in insertion
/// order, and enumeration walks bucket by bucket.
#[derive(Clone)]
pub struct ChainedHashMap<K, V> {
    buckets: Vec<Bucket<K, V>>,
    len: usize,
    growth: Growth,
}

impl<K, V> Default for ChainedHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ChainedHashMap<K, V> {
    pub fn new() -> Self {
        ChainedHashMap::with_buckets(DEFAULT_NUM_BUCKETS)
    }

    /// A zero bucket count is bumped to one.
    pub fn with_buckets(num_buckets: usize) -> Self {
        ChainedHashMap::build(num_buckets, Growth::Fixed)
    }

    pub fn with_growth(num_buckets: usize, max_avg_bucket_size: usize) -> Self {
        let growth = Growth::Grow {
            max_avg_bucket_size,
        };
        ChainedHashMap::build(num_buckets, growth)
    }

    pub fn with_policy(num_buckets: usize, growth: Growth) -> Self {
        ChainedHashMap::build(num_buckets, growth)
    }

    fn build(num_buckets: usize, growth: Growth) -> Self {
        let buckets = (0..num_buckets.max(1)).map(|_| vec![]).collect();
        ChainedHashMap {
            buckets,
            len: 0,
            growth,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub fn growth(&self) -> Growth {
        self.growth
    }

    /// Entries in bucket order, then insertion order within a bucket.
    pub fn entries(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|(k, v)| (k, v)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries().map(|(_, v)| v)
    }
}

impl<K, V> ChainedHashMap<K, V>
where
    K: CanonicalKey,
{
    fn bucket_index<Q>(&self, key: &Q) -> usize
    where
        Q: CanonicalKey + ?Sized,
    {
        let hash = djb2(&key.canonical());
        hash.unsigned_abs() as usize % self.buckets.len()
    }

    fn position<Q>(bucket: &Bucket<K, V>, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        bucket.iter().position(|(k, _)| k.borrow() == key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: CanonicalKey + ?Sized,
    {
        let bucket = &self.buckets[self.bucket_index(key)];
        Self::position(bucket, key).map(|i| &bucket[i].1)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: CanonicalKey + ?Sized,
    {
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        let i = Self::position(bucket, key)?;
        Some(&mut bucket[i].1)
    }

    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: CanonicalKey + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Upserts `key`, returning the value it replaced.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let idx = self.bucket_index(&key);
        let bucket = &mut self.buckets[idx];
        if let Some(i) = Self::position(bucket, &key) {
            return Some(std::mem::replace(&mut bucket[i].1, value));
        }

        bucket.push((key, value));
        self.len += 1;

        if self._should_resize() {
            self._resize();
        }
        None
    }

    /// Removes `key`, returning whether it was present.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: CanonicalKey + ?Sized,
    {
        self.take(key).is_some()
    }

    /// Removes `key` and hands back its value.
    pub fn take<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: CanonicalKey + ?Sized,
    {
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        let i = Self::position(bucket, key)?;
        self.len -= 1;
        // `remove` keeps the insertion order of the remaining chain.
        Some(bucket.remove(i).1)
    }

    fn _should_resize(&self) -> bool {
        match self.growth {
            Growth::Fixed => false,
            Growth::Grow {
                max_avg_bucket_size,
            } => self._avg_bucket_size() >= max_avg_bucket_size.max(1),
        }
    }

    fn _avg_bucket_size(&self) -> usize {
        self.len / self.buckets.len()
    }

    fn _resize(&mut self) {
        let new_len = self.buckets.len() * 2;
        let mut new_buckets: Vec<Bucket<K, V>> = (0..new_len).map(|_| Vec::new()).collect();

        let old_buckets = std::mem::take(&mut self.buckets);
        for bucket in old_buckets {
            for (k, v) in bucket {
                let hash = djb2(&k.canonical());
                let new_bucket_idx = hash.unsigned_abs() as usize % new_len;
                new_buckets[new_bucket_idx].push((k, v));
            }
        }

        log::trace!("rehashed chained map into {} buckets", new_len);
        self.buckets = new_buckets;
    }
}

impl<K, V> Map for ChainedHashMap<K, V>
where
    K: CanonicalKey,
{
    type Key = K;
    type Val = V;
    type ValueRef<'a> = &'a V
    where
        Self: 'a;

    fn get(&self, key: &K) -> Option<&V> {
        ChainedHashMap::get(self, key)
    }

    fn has(&self, key: &K) -> bool {
        ChainedHashMap::has(self, key)
    }

    fn set(&mut self, key: K, value: V) -> Option<V> {
        ChainedHashMap::set(self, key, value)
    }

    fn delete(&mut self, key: &K) -> bool {
        ChainedHashMap::delete(self, key)
    }
}

impl<K: CanonicalKey, V> FromIterator<(K, V)> for ChainedHashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ChainedHashMap::new();
        map.extend(iter);
        map
    }
}

impl<K: CanonicalKey, V> Extend<(K, V)> for ChainedHashMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ChainedHashMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}
