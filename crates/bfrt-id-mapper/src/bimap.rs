//! Bijective map with conflict detection.
//!
//! `BiMap` keeps a forward and a reverse table that are always exact
//! inverses of each other. Inserting a pair that would associate a key with
//! a second value on either side is rejected instead of silently
//! overwriting, so a table can never become one-to-many.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Error type for BiMap operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BiMapError<L: Debug, R: Debug> {
    #[error("{left:?} is already mapped to {existing:?}, cannot map it to {requested:?}")]
    LeftConflict { left: L, existing: R, requested: R },

    #[error("{right:?} is already mapped from {existing:?}, cannot map it from {requested:?}")]
    RightConflict { right: R, existing: L, requested: L },
}

/// A one-to-one map between `L` and `R`.
///
/// # Example
///
/// ```
/// use bfrt_id_mapper::BiMap;
///
/// let mut map: BiMap<u32, u32> = BiMap::new();
/// map.insert(10, 77).unwrap();
///
/// assert_eq!(map.get_right(&10), Some(77));
/// assert_eq!(map.get_left(&77), Some(10));
///
/// // Re-inserting the same pair is fine, remapping is not.
/// assert!(map.insert(10, 77).is_ok());
/// assert!(map.insert(10, 78).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct BiMap<L, R> {
    forward: HashMap<L, R>,
    reverse: HashMap<R, L>,
}

impl<L, R> BiMap<L, R>
where
    L: Copy + Eq + Hash + Debug,
    R: Copy + Eq + Hash + Debug,
{
    /// Creates a new empty map.
    pub fn new() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    /// Returns the number of pairs in the map.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns true if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Returns the value paired with `left`.
    pub fn get_right(&self, left: &L) -> Option<R> {
        self.forward.get(left).copied()
    }

    /// Returns the key paired with `right`.
    pub fn get_left(&self, right: &R) -> Option<L> {
        self.reverse.get(right).copied()
    }

    /// Returns true if `left` is paired with anything.
    pub fn contains_left(&self, left: &L) -> bool {
        self.forward.contains_key(left)
    }

    /// Returns true if `right` is paired with anything.
    pub fn contains_right(&self, right: &R) -> bool {
        self.reverse.contains_key(right)
    }

    /// Inserts the pair `(left, right)`.
    ///
    /// Inserting a pair that is already present is a no-op. Inserting a
    /// pair where either side is already paired with something else fails
    /// and leaves the map unchanged.
    pub fn insert(&mut self, left: L, right: R) -> Result<(), BiMapError<L, R>> {
        if let Some(&existing) = self.forward.get(&left) {
            if existing == right {
                return Ok(());
            }
            return Err(BiMapError::LeftConflict {
                left,
                existing,
                requested: right,
            });
        }
        if let Some(&existing) = self.reverse.get(&right) {
            return Err(BiMapError::RightConflict {
                right,
                existing,
                requested: left,
            });
        }

        self.forward.insert(left, right);
        self.reverse.insert(right, left);
        Ok(())
    }

    /// Clears all pairs.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }

    /// Returns an iterator over `(left, right)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (L, R)> + '_ {
        self.forward.iter().map(|(l, r)| (*l, *r))
    }
}

impl<L, R> Default for BiMap<L, R>
where
    L: Copy + Eq + Hash + Debug,
    R: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
