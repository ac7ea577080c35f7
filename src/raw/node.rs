use core::borrow::Borrow;

use smallvec::SmallVec;

use super::handle::Handle;

/// Inline storage for node pairs. Orders up to `INLINE_PAIRS + 1` keep a
/// node's pairs and children out of the heap entirely; larger orders spill
/// into a per-node allocation.
pub(crate) const INLINE_PAIRS: usize = 7;
pub(crate) const INLINE_CHILDREN: usize = INLINE_PAIRS + 1;

/// A B-tree node: sorted key/value pairs plus, for internal nodes, one more
/// child than pairs.
///
/// Values are stored as handles into the map's value arena so that moving a
/// pair between nodes during a split, rotation, or merge never moves a `V`.
/// A node with no children is a leaf. The `parent` back-reference is a
/// non-owning cache kept consistent by every operation that re-parents a
/// node; ownership always flows through `children`.
#[derive(Clone)]
pub(crate) struct Node<K> {
    parent: Option<Handle>,
    keys: SmallVec<[K; INLINE_PAIRS]>,
    values: SmallVec<[Handle; INLINE_PAIRS]>,
    children: SmallVec<[Handle; INLINE_CHILDREN]>,
}

/// Result of searching for a key in a node.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is the split index, i.e. where the key would
    /// be inserted and the index of the child covering the gap.
    NotFound(usize),
}

impl<K> Node<K> {
    /// Creates a new empty leaf node.
    pub(crate) fn new_leaf() -> Self {
        Self {
            parent: None,
            keys: SmallVec::new(),
            values: SmallVec::new(),
            children: SmallVec::new(),
        }
    }

    /// Creates an internal node holding a single child and no pairs yet.
    /// Only used while growing the tree by a level; the follow-up split
    /// restores the `children == pairs + 1` invariant.
    pub(crate) fn new_root_over(child: Handle) -> Self {
        let mut node = Self::new_leaf();
        node.children.push(child);
        node
    }

    /// Returns true if this node has no children.
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the number of key/value pairs in this node.
    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Returns the number of children in this node (zero for a leaf).
    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    /// Returns the key at the given index.
    #[inline]
    pub(crate) fn key(&self, index: usize) -> &K {
        &self.keys[index]
    }

    /// Returns the value handle at the given index.
    #[inline]
    pub(crate) fn value(&self, index: usize) -> Handle {
        self.values[index]
    }

    /// Returns the child handle at the given index.
    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    /// Returns all children.
    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    /// Searches this node for `key`, returning either its position or the
    /// split index to descend through.
    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys.binary_search_by(|k| k.borrow().cmp(key)) {
            Ok(idx) => SearchResult::Found(idx),
            Err(idx) => SearchResult::NotFound(idx),
        }
    }

    /// Inserts a pair at the given position, shifting later pairs right.
    pub(crate) fn insert_pair(&mut self, index: usize, key: K, value: Handle) {
        self.keys.insert(index, key);
        self.values.insert(index, value);
    }

    /// Removes and returns the pair at the given position.
    pub(crate) fn remove_pair(&mut self, index: usize) -> (K, Handle) {
        let key = self.keys.remove(index);
        let value = self.values.remove(index);
        (key, value)
    }

    /// Replaces the pair at the given position, returning the old pair.
    pub(crate) fn replace_pair(&mut self, index: usize, key: K, value: Handle) -> (K, Handle) {
        let old_key = core::mem::replace(&mut self.keys[index], key);
        let old_value = core::mem::replace(&mut self.values[index], value);
        (old_key, old_value)
    }

    /// Pushes a pair to the end.
    pub(crate) fn push_pair(&mut self, key: K, value: Handle) {
        self.keys.push(key);
        self.values.push(value);
    }

    /// Pushes a pair to the front.
    pub(crate) fn push_pair_front(&mut self, key: K, value: Handle) {
        self.keys.insert(0, key);
        self.values.insert(0, value);
    }

    /// Pops the last pair.
    pub(crate) fn pop_pair(&mut self) -> Option<(K, Handle)> {
        let key = self.keys.pop()?;
        let value = self.values.pop().unwrap();
        Some((key, value))
    }

    /// Pops the first pair.
    pub(crate) fn pop_pair_front(&mut self) -> Option<(K, Handle)> {
        if self.keys.is_empty() {
            None
        } else {
            Some(self.remove_pair(0))
        }
    }

    /// Pushes a child to the end.
    pub(crate) fn push_child(&mut self, child: Handle) {
        self.children.push(child);
    }

    /// Pushes a child to the front.
    pub(crate) fn push_child_front(&mut self, child: Handle) {
        self.children.insert(0, child);
    }

    /// Pops the last child.
    pub(crate) fn pop_child(&mut self) -> Option<Handle> {
        self.children.pop()
    }

    /// Pops the first child.
    pub(crate) fn pop_child_front(&mut self) -> Option<Handle> {
        if self.children.is_empty() {
            None
        } else {
            Some(self.children.remove(0))
        }
    }

    /// Splices a promoted pair and its new right child into this node at
    /// `index`, shifting later pairs and children right by one.
    pub(crate) fn insert_split(&mut self, index: usize, key: K, value: Handle, right: Handle) {
        self.keys.insert(index, key);
        self.values.insert(index, value);
        self.children.insert(index + 1, right);
    }

    /// Removes the separator pair at `index` together with the child to its
    /// right. Returns `(key, value, right_child)`.
    pub(crate) fn remove_pair_and_child(&mut self, index: usize) -> (K, Handle, Handle) {
        let key = self.keys.remove(index);
        let value = self.values.remove(index);
        let child = self.children.remove(index + 1);
        (key, value, child)
    }

    /// Splits an overflowing node around its median pair. Returns the median
    /// pair and the new right sibling; `self` keeps everything strictly
    /// before the median.
    ///
    /// The median index `(pairs - 1) / 2` and the child midpoint
    /// `children / 2` bias toward the left for even counts, producing the
    /// canonical split layout.
    pub(crate) fn split(&mut self) -> (K, Handle, Node<K>) {
        let mid = (self.keys.len() - 1) / 2;
        let child_mid = self.children.len() / 2;

        let mut right = Node::new_leaf();
        right.keys = self.keys.drain(mid + 1..).collect();
        right.values = self.values.drain(mid + 1..).collect();
        right.children = self.children.drain(child_mid..).collect();

        let median_value = self.values.pop().unwrap();
        let median_key = self.keys.pop().unwrap();

        (median_key, median_value, right)
    }

    /// Fuses a right sibling into this node: the separator pair pulled down
    /// from the parent, then every pair and child of `right`.
    pub(crate) fn absorb(&mut self, separator_key: K, separator_value: Handle, mut right: Node<K>) {
        self.keys.push(separator_key);
        self.values.push(separator_value);
        self.keys.append(&mut right.keys);
        self.values.append(&mut right.values);
        self.children.append(&mut right.children);
    }
}
