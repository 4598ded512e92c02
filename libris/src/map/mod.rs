//! This module contains the hash map every other structure is built on.

mod chained_map;

pub use chained_map::{ChainedHashMap, Growth};

use std::borrow::Cow;
use std::ops::Deref;

/// Common functionalities for hash maps.
pub trait Map {
    /// Key type for a HashMap implementation.
    type Key: CanonicalKey;
    /// Value type for a HashMap implementation.
    type Val;
    /// HashMap entry reference type.
    type ValueRef<'a>: Deref<Target = Self::Val>
    where
        Self: 'a;

    /// Get reference to a value associated with a key, if it exists.
    fn get(&self, key: &Self::Key) -> Option<Self::ValueRef<'_>>;

    /// Check whether the map contains a value mapped to the given key.
    fn has(&self, key: &Self::Key) -> bool;

    /// Emplaces a key-value pair into the map, returning the value it replaced.
    ///
    /// If there were a key-value pair associated with this provided key,
    /// it will be overwritten.
    fn set(&mut self, key: Self::Key, value: Self::Val) -> Option<Self::Val>;

    /// Attempts to remove a key-value pair based on the provided key, returning
    /// whether a key-value pair was found and removed.
    fn delete(&mut self, key: &Self::Key) -> bool;
}

/// A key with a deterministic string form. Two keys that compare equal must
/// produce the same canonical string, since that string is what gets hashed.
pub trait CanonicalKey: Eq {
    fn canonical(&self) -> Cow<'_, str>;
}

impl CanonicalKey for str {
    fn canonical(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl CanonicalKey for String {
    fn canonical(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl CanonicalKey for Box<str> {
    fn canonical(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl<'k> CanonicalKey for &'k str {
    fn canonical(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

macro_rules! canonical_by_display {
    ($($t:ty),*) => {
        $(
            impl CanonicalKey for $t {
                fn canonical(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

canonical_by_display!(char, bool, usize, isize);
canonical_by_display!(u8, u16, u32, u64, u128);
canonical_by_display!(i8, i16, i32, i64, i128);

/// DJB2 over the UTF-16 code units of `s`, in wrapping 32-bit signed arithmetic.
pub fn djb2(s: &str) -> i32 {
    let mut hash = 5381i32;
    for unit in s.encode_utf16() {
        hash = hash.wrapping_mul(33).wrapping_add(i32::from(unit));
    }
    hash
}
