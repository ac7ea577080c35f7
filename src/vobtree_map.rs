use core::borrow::Borrow;
use core::fmt;

use thiserror::Error;

use crate::raw::RawVOBTreeMap;

/// The error returned by [`VOBTreeMap::new`] for a branching factor that
/// cannot satisfy the occupancy invariants: an order-2 node would have to
/// hold zero pairs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("order must be at least 3, got {0}")]
pub struct OrderError(pub usize);

/// An ordered map based on a [B-tree] with a runtime-chosen branching
/// factor.
///
/// Given a key type with a [total order], the map stores its entries sorted
/// across nodes of bounded fan-out: a tree of *order* `m` holds at most
/// `m - 1` pairs per node and at most `m` children, and every non-root node
/// stays at least half full. The order is fixed at construction, so the same
/// map type serves both pointer-heavy small-node trees (order 3) and wide,
/// cache-friendly nodes sized like disk blocks (order 64 and up).
///
/// Two contracts differ deliberately from `std::collections::BTreeMap`:
///
/// - **Insertion is first-writer-wins.** Inserting a key that is already
///   present keeps the original value and reports `false`; nothing is
///   overwritten.
/// - **Absent keys are never errors.** Removing a key that is not present is
///   a no-op returning `None`.
///
/// It is a logic error for a key to be modified in such a way that its
/// ordering relative to any other key changes while it is in the map. The
/// behavior resulting from such a logic error may include panics, incorrect
/// results, or non-termination, but never undefined behavior.
///
/// # Examples
///
/// ```
/// use vobi_tree::VOBTreeMap;
///
/// // An order-16 tree: up to 15 pairs per node.
/// let mut movie_reviews = VOBTreeMap::new(16).unwrap();
///
/// // review some movies.
/// movie_reviews.insert("Office Space", "Deals with real issues in the workplace.");
/// movie_reviews.insert("Pulp Fiction", "Masterpiece.");
/// movie_reviews.insert("The Godfather", "Very enjoyable.");
///
/// // check for a specific one.
/// if !movie_reviews.contains_key(&"Les Miserables") {
///     println!("We've got {} reviews, but Les Miserables ain't one.", movie_reviews.len());
/// }
///
/// // a second review of the same movie is ignored.
/// assert!(!movie_reviews.insert("Pulp Fiction", "Overrated."));
/// assert_eq!(movie_reviews.get(&"Pulp Fiction"), Some(&"Masterpiece."));
///
/// movie_reviews.remove(&"The Godfather");
/// assert_eq!(movie_reviews.get(&"The Godfather"), None);
/// ```
///
/// [B-tree]: https://en.wikipedia.org/wiki/B-tree
/// [total order]: https://en.wikipedia.org/wiki/Total_order
#[derive(Clone)]
pub struct VOBTreeMap<K, V> {
    raw: RawVOBTreeMap<K, V>,
}

impl<K, V> VOBTreeMap<K, V> {
    /// The smallest usable branching factor.
    pub const MIN_ORDER: usize = 3;

    /// Creates an empty map with the given branching factor.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError`] if `order` is less than [`Self::MIN_ORDER`].
    ///
    /// # Examples
    ///
    /// ```
    /// use vobi_tree::VOBTreeMap;
    ///
    /// let map: VOBTreeMap<i32, &str> = VOBTreeMap::new(3).unwrap();
    /// assert!(map.is_empty());
    ///
    /// assert!(VOBTreeMap::<i32, &str>::new(2).is_err());
    /// ```
    pub const fn new(order: usize) -> Result<Self, OrderError> {
        if order < Self::MIN_ORDER {
            return Err(OrderError(order));
        }
        Ok(Self {
            raw: RawVOBTreeMap::new(order),
        })
    }

    /// Returns the branching factor the map was created with.
    ///
    /// # Examples
    ///
    /// ```
    /// use vobi_tree::VOBTreeMap;
    ///
    /// let map: VOBTreeMap<i32, i32> = VOBTreeMap::new(7).unwrap();
    /// assert_eq!(map.order(), 7);
    /// ```
    #[must_use]
    pub const fn order(&self) -> usize {
        self.raw.order()
    }

    /// Returns the number of elements in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use vobi_tree::VOBTreeMap;
    ///
    /// let mut a = VOBTreeMap::new(3).unwrap();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use vobi_tree::VOBTreeMap;
    ///
    /// let mut a = VOBTreeMap::new(3).unwrap();
    /// assert!(a.is_empty());
    /// a.insert(1, "a");
    /// assert!(!a.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all elements.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use vobi_tree::VOBTreeMap;
    ///
    /// let mut a = VOBTreeMap::new(3).unwrap();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: Ord, V> VOBTreeMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use vobi_tree::VOBTreeMap;
    ///
    /// let mut map = VOBTreeMap::new(3).unwrap();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use vobi_tree::VOBTreeMap;
    ///
    /// let mut map = VOBTreeMap::new(3).unwrap();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use vobi_tree::VOBTreeMap;
    ///
    /// let mut map = VOBTreeMap::new(3).unwrap();
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains_key(key)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// Insertion is first-writer-wins: if the key is already present the map
    /// is left untouched, `value` is dropped, and `false` is returned. The
    /// boolean may be ignored by callers that only need the permissive
    /// "insert if absent" behavior.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use vobi_tree::VOBTreeMap;
    ///
    /// let mut map = VOBTreeMap::new(3).unwrap();
    /// assert!(map.insert(37, "a"));
    /// assert!(!map.insert(37, "b"));
    /// assert_eq!(map.get(&37), Some(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.raw.insert(key, value)
    }

    /// Removes a key from the map, returning the value at the key if the
    /// key was previously in the map. Removing an absent key is a no-op.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use vobi_tree::VOBTreeMap;
    ///
    /// let mut map = VOBTreeMap::new(3).unwrap();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Checks every structural invariant of the tree: per-node sortedness,
    /// occupancy bounds, child counts, separator intervals, uniform leaf
    /// depth, and parent back-references.
    ///
    /// Intended for tests and debugging; a `false` result indicates a bug in
    /// this crate, not a usage error.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use vobi_tree::VOBTreeMap;
    ///
    /// let mut map = VOBTreeMap::new(3).unwrap();
    /// for key in 0..100 {
    ///     map.insert(key, key);
    /// }
    /// assert!(map.is_valid());
    /// ```
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.raw.validate().is_empty()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for VOBTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        self.raw.for_each_in_order(&mut |key, value| {
            map.entry(key, value);
        });
        map.finish()
    }
}

/// Renders the tree breadth-first, one line per depth level, with each
/// node's pairs bracketed as `[key|value ...]`. A diagnostic view of the
/// tree's shape, not a stable wire format.
///
/// # Examples
///
/// ```
/// use vobi_tree::VOBTreeMap;
///
/// let mut map = VOBTreeMap::new(3).unwrap();
/// for key in 1..=7 {
///     map.insert(key, key * 10);
/// }
/// let dump = map.to_string();
/// assert_eq!(dump.lines().count(), 3);
/// assert_eq!(dump.lines().next(), Some("[4|40]"));
/// ```
impl<K: fmt::Display, V: fmt::Display> fmt::Display for VOBTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.raw.root() else {
            return f.write_str("(empty)");
        };

        let mut level = alloc::vec![root];
        while !level.is_empty() {
            let mut next = alloc::vec::Vec::new();
            for (i, &handle) in level.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                let node = self.raw.node(handle);
                f.write_str("[")?;
                for j in 0..node.key_count() {
                    if j > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}|{}", node.key(j), self.raw.value(node.value(j)))?;
                }
                f.write_str("]")?;
                next.extend_from_slice(node.children());
            }
            writeln!(f)?;
            level = next;
        }
        Ok(())
    }
}
