use core::borrow::Borrow;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{INLINE_CHILDREN, Node, SearchResult};

/// The core B-tree implementation backing `VOBTreeMap`.
///
/// Keys and child links live in the node arena; values live in their own
/// arena so that rebalancing shuffles handles, never `V`s. The root slot is
/// replaced only by the top-level entry points: growth on insertion
/// overflow, collapse on deletion underflow, and emptying.
#[derive(Clone)]
pub(crate) struct RawVOBTreeMap<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Arena storing all values (separate from nodes for cache efficiency).
    values: Arena<V>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Branching factor: the maximum number of children per node.
    order: usize,
    /// Total number of key-value pairs in the tree.
    len: usize,
}

/// Path element for tracking the descent during deletions.
#[derive(Clone, Copy)]
struct PathElement {
    /// Handle to the node at this level.
    node: Handle,
    /// Index of the child we descended into.
    child_index: usize,
}

/// A recorded descent path (stack of path elements). Rebalancing consults
/// this instead of re-deriving "which child am I" from the parent, which
/// stays correct even after siblings are merged away.
type Path = SmallVec<[PathElement; 16]>;

impl<K, V> RawVOBTreeMap<K, V> {
    /// Creates a new, empty tree. The caller has already validated `order`.
    pub(crate) const fn new(order: usize) -> Self {
        assert!(order >= 3, "`RawVOBTreeMap::new()` - `order` < 3!");
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            order,
            len: 0,
        }
    }

    /// Returns the branching factor of the tree.
    pub(crate) const fn order(&self) -> usize {
        self.order
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum pairs any node may hold.
    pub(crate) const fn max_pairs(&self) -> usize {
        self.order - 1
    }

    /// Minimum pairs every non-root node must hold.
    pub(crate) const fn min_pairs(&self) -> usize {
        self.order.div_ceil(2) - 1
    }

    /// Clears all elements from the tree.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns the root handle, if the tree is non-empty.
    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    /// Returns a reference to a value by handle.
    pub(crate) fn value(&self, handle: Handle) -> &V {
        self.values.get(handle)
    }

    /// Returns true if `handle` refers to a live value.
    pub(crate) fn value_is_live(&self, handle: Handle) -> bool {
        self.values.contains(handle)
    }

    /// Number of live nodes in the node arena.
    pub(crate) fn live_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live values in the value arena.
    pub(crate) fn live_values(&self) -> usize {
        self.values.len()
    }

    /// Visits every pair in key order. Diagnostics only; the public surface
    /// deliberately exposes no iteration.
    pub(crate) fn for_each_in_order(&self, visit: &mut impl FnMut(&K, &V)) {
        if let Some(root) = self.root {
            self.visit_in_order(root, visit);
        }
    }

    fn visit_in_order(&self, handle: Handle, visit: &mut impl FnMut(&K, &V)) {
        let node = self.nodes.get(handle);
        for i in 0..node.key_count() {
            if !node.is_leaf() {
                self.visit_in_order(node.child(i), visit);
            }
            visit(node.key(i), self.values.get(node.value(i)));
        }
        if !node.is_leaf() {
            self.visit_in_order(node.child(node.key_count()), visit);
        }
    }
}

impl<K: Ord, V> RawVOBTreeMap<K, V> {
    /// Searches for a key and returns the holding node and pair index.
    /// Unlike a B+tree, the hit can be at any depth.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<(Handle, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root?;

        loop {
            let node = self.nodes.get(current);
            match node.search(key) {
                SearchResult::Found(idx) => return Some((current, idx)),
                SearchResult::NotFound(idx) => {
                    if node.is_leaf() {
                        return None;
                    }
                    // The split index is also the index of the unique child
                    // whose interval can contain the key.
                    current = node.child(idx);
                }
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (handle, idx) = self.search(key)?;
        Some(self.values.get(self.nodes.get(handle).value(idx)))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (handle, idx) = self.search(key)?;
        let value_handle = self.nodes.get(handle).value(idx);
        Some(self.values.get_mut(value_handle))
    }

    /// Returns true if the tree contains the specified key.
    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    /// Inserts a key-value pair into the tree. Returns false, dropping
    /// `value`, if the key is already present at any depth; the value from
    /// the first insertion is retained.
    pub(crate) fn insert(&mut self, key: K, value: V) -> bool {
        let Some(root) = self.root else {
            let value = self.values.alloc(value);
            let mut leaf = Node::new_leaf();
            leaf.push_pair(key, value);
            self.root = Some(self.nodes.alloc(leaf));
            self.len = 1;
            return true;
        };

        if !self.insert_at(root, key, value) {
            return false;
        }
        self.len += 1;

        // The tree gains height only here: an overflowing root is wrapped in
        // a fresh root and split as its first child.
        if self.nodes.get(root).key_count() > self.max_pairs() {
            let new_root = self.nodes.alloc(Node::new_root_over(root));
            self.nodes.get_mut(root).set_parent(Some(new_root));
            self.split_child(new_root, 0);
            self.root = Some(new_root);
        }
        true
    }

    /// Recursive insertion: place the pair in the leaf at the end of the
    /// split-index descent, then repair any overflow on the way back up.
    fn insert_at(&mut self, handle: Handle, key: K, value: V) -> bool {
        let (result, is_leaf) = {
            let node = self.nodes.get(handle);
            (node.search(&key), node.is_leaf())
        };

        match result {
            // Duplicate keys are detected on every node visited, not only at
            // the terminal leaf.
            SearchResult::Found(_) => false,
            SearchResult::NotFound(idx) => {
                if is_leaf {
                    let value = self.values.alloc(value);
                    self.nodes.get_mut(handle).insert_pair(idx, key, value);
                    true
                } else {
                    let child = self.nodes.get(handle).child(idx);
                    let inserted = self.insert_at(child, key, value);
                    if self.nodes.get(child).key_count() > self.max_pairs() {
                        self.split_child(handle, idx);
                    }
                    inserted
                }
            }
        }
    }

    /// Splits the overflowing child at `child_idx`: its median pair is
    /// promoted into `parent` and a new right sibling takes everything after
    /// the median. Both halves end at or above minimum occupancy.
    fn split_child(&mut self, parent: Handle, child_idx: usize) {
        let child = self.nodes.get(parent).child(child_idx);
        let (median_key, median_value, mut right) = self.nodes.get_mut(child).split();
        right.set_parent(Some(parent));
        let right_handle = self.nodes.alloc(right);

        // Children moved into the new sibling get their back-references
        // re-pointed.
        for i in 0..self.nodes.get(right_handle).child_count() {
            let grandchild = self.nodes.get(right_handle).child(i);
            self.nodes.get_mut(grandchild).set_parent(Some(right_handle));
        }

        self.nodes.get_mut(parent).insert_split(child_idx, median_key, median_value, right_handle);
    }

    /// Removes a key from the tree and returns its value. Absent keys are a
    /// no-op.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut path: Path = SmallVec::new();
        let mut current = self.root?;

        // Descend to the node holding the key, recording the child index
        // taken at every level.
        let found_idx = loop {
            let (result, is_leaf) = {
                let node = self.nodes.get(current);
                (node.search(key), node.is_leaf())
            };
            match result {
                SearchResult::Found(idx) => break idx,
                SearchResult::NotFound(_) if is_leaf => return None,
                SearchResult::NotFound(idx) => {
                    path.push(PathElement {
                        node: current,
                        child_index: idx,
                    });
                    current = self.nodes.get(current).child(idx);
                }
            }
        };

        let value_handle = if self.nodes.get(current).is_leaf() {
            let (_, value_handle) = self.nodes.get_mut(current).remove_pair(found_idx);
            self.repair_if_underflow(current, &mut path);
            value_handle
        } else {
            self.remove_from_internal(current, found_idx, &mut path)
        };

        let removed = self.values.take(value_handle);
        self.len -= 1;
        if self.len == 0 {
            self.nodes.clear();
            self.root = None;
        }
        Some(removed)
    }

    /// Removes the pair at `idx` of an internal node by substituting its
    /// in-order predecessor if that leaf has a pair to spare, otherwise its
    /// in-order successor, repairing the successor leaf when taking from it
    /// pushed it below minimum.
    fn remove_from_internal(&mut self, handle: Handle, idx: usize, path: &mut Path) -> Handle {
        // Predecessor: right-most leaf descendant of the left child.
        let mut pred = self.nodes.get(handle).child(idx);
        loop {
            let node = self.nodes.get(pred);
            if node.is_leaf() {
                break;
            }
            pred = node.child(node.child_count() - 1);
        }
        if self.nodes.get(pred).key_count() > self.min_pairs() {
            let (key, value) = self.nodes.get_mut(pred).pop_pair().unwrap();
            let (_, old_value) = self.nodes.get_mut(handle).replace_pair(idx, key, value);
            return old_value;
        }

        // Successor: left-most leaf descendant of the right child. The
        // recorded path is extended down to the donor leaf since the repair
        // phase may need it.
        path.push(PathElement {
            node: handle,
            child_index: idx + 1,
        });
        let mut succ = self.nodes.get(handle).child(idx + 1);
        loop {
            let node = self.nodes.get(succ);
            if node.is_leaf() {
                break;
            }
            path.push(PathElement {
                node: succ,
                child_index: 0,
            });
            succ = node.child(0);
        }

        let (key, value) = self.nodes.get_mut(succ).pop_pair_front().unwrap();
        let (_, old_value) = self.nodes.get_mut(handle).replace_pair(idx, key, value);
        self.repair_if_underflow(succ, path);
        old_value
    }

    /// Repairs `node` if it fell below minimum occupancy. The root is exempt
    /// from the minimum.
    fn repair_if_underflow(&mut self, node: Handle, path: &mut Path) {
        if !path.is_empty() && self.nodes.get(node).key_count() < self.min_pairs() {
            self.repair_underflow(node, path);
        }
    }

    /// Restores minimum occupancy for a non-root deficient node, in strict
    /// priority order: borrow from a sibling with spare pairs, otherwise
    /// pull the parent separator down and fuse with a sibling. The fusion
    /// costs the parent one pair and one child; a parent with spare
    /// occupancy absorbs that locally, otherwise the repair recurses up the
    /// recorded path and can shrink the tree by one level at the root.
    fn repair_underflow(&mut self, node: Handle, path: &mut Path) {
        debug_assert_eq!(Some(node), path.last().map(|e| self.nodes.get(e.node).child(e.child_index)));
        let PathElement {
            node: parent,
            child_index,
        } = *path.last().unwrap();

        if child_index > 0 {
            let left = self.nodes.get(parent).child(child_index - 1);
            if self.nodes.get(left).key_count() > self.min_pairs() {
                self.rotate_from_left(parent, child_index);
                return;
            }
        }
        if child_index + 1 < self.nodes.get(parent).child_count() {
            let right = self.nodes.get(parent).child(child_index + 1);
            if self.nodes.get(right).key_count() > self.min_pairs() {
                self.rotate_from_right(parent, child_index);
                return;
            }
        }

        // No sibling can lend. Fuse with the left sibling when there is one
        // so the surviving node keeps the leftward slot.
        let separator_idx = if child_index > 0 { child_index - 1 } else { child_index };
        self.merge_children(parent, separator_idx);
        path.pop();

        if path.is_empty() {
            // `parent` is the root. A root emptied by the merge hands the
            // tree to its only remaining child: height shrinks by one.
            if self.nodes.get(parent).key_count() == 0 {
                let survivor = self.nodes.get(parent).child(0);
                self.nodes.free(parent);
                self.nodes.get_mut(survivor).set_parent(None);
                self.root = Some(survivor);
            }
        } else if self.nodes.get(parent).key_count() < self.min_pairs() {
            self.repair_underflow(parent, path);
        }
    }

    /// Rotates the left sibling's last pair up into the parent separator
    /// slot and the old separator down to the front of the deficient node.
    /// For internal nodes the donor's last child crosses over too.
    fn rotate_from_left(&mut self, parent: Handle, child_index: usize) {
        let left = self.nodes.get(parent).child(child_index - 1);
        let node = self.nodes.get(parent).child(child_index);

        let (donor_key, donor_value) = self.nodes.get_mut(left).pop_pair().unwrap();
        let moved_child = self.nodes.get_mut(left).pop_child();
        let (separator_key, separator_value) =
            self.nodes.get_mut(parent).replace_pair(child_index - 1, donor_key, donor_value);

        let target = self.nodes.get_mut(node);
        target.push_pair_front(separator_key, separator_value);
        if let Some(child) = moved_child {
            target.push_child_front(child);
        }
        if let Some(child) = moved_child {
            self.nodes.get_mut(child).set_parent(Some(node));
        }
    }

    /// Mirror image of [`Self::rotate_from_left`]: the right sibling's first
    /// pair rotates up, the separator rotates down to the back of the
    /// deficient node, and the donor's first child crosses over.
    fn rotate_from_right(&mut self, parent: Handle, child_index: usize) {
        let right = self.nodes.get(parent).child(child_index + 1);
        let node = self.nodes.get(parent).child(child_index);

        let (donor_key, donor_value) = self.nodes.get_mut(right).pop_pair_front().unwrap();
        let moved_child = self.nodes.get_mut(right).pop_child_front();
        let (separator_key, separator_value) =
            self.nodes.get_mut(parent).replace_pair(child_index, donor_key, donor_value);

        let target = self.nodes.get_mut(node);
        target.push_pair(separator_key, separator_value);
        if let Some(child) = moved_child {
            target.push_child(child);
        }
        if let Some(child) = moved_child {
            self.nodes.get_mut(child).set_parent(Some(node));
        }
    }

    /// Fuses `children[separator_idx]` and `children[separator_idx + 1]`
    /// around their separator pair, which moves down out of the parent. The
    /// right node is destroyed; the caller settles the parent's occupancy.
    fn merge_children(&mut self, parent: Handle, separator_idx: usize) {
        let (separator_key, separator_value, right_handle) =
            self.nodes.get_mut(parent).remove_pair_and_child(separator_idx);
        let left_handle = self.nodes.get(parent).child(separator_idx);

        let right = self.nodes.take(right_handle);
        let moved: SmallVec<[Handle; INLINE_CHILDREN]> = right.children().iter().copied().collect();
        self.nodes.get_mut(left_handle).absorb(separator_key, separator_value, right);
        for child in moved {
            self.nodes.get_mut(child).set_parent(Some(left_handle));
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    /// Asserts that every structural invariant holds, with findings in the
    /// failure message.
    fn assert_valid<K: Ord, V>(tree: &RawVOBTreeMap<K, V>) {
        let findings = tree.validate();
        assert!(findings.is_empty(), "tree invariant violations:\n{}", findings.join("\n"));
    }

    /// Builds an order-3 tree from `keys`, each mapped to `key * 10`.
    fn tree_of(keys: &[i32]) -> RawVOBTreeMap<i32, i32> {
        let mut tree = RawVOBTreeMap::new(3);
        for &key in keys {
            assert!(tree.insert(key, key * 10));
            assert_valid(&tree);
        }
        tree
    }

    /// Collects the keys of a node for shape assertions.
    fn keys_of(tree: &RawVOBTreeMap<i32, i32>, handle: Handle) -> Vec<i32> {
        let node = tree.node(handle);
        (0..node.key_count()).map(|i| *node.key(i)).collect()
    }

    #[test]
    fn sequential_inserts_produce_canonical_shape() {
        // Order 3, keys 1..=7: two root splits leave a three-level tree with
        // the left-biased medians 4, 2 and 6 promoted.
        let tree = tree_of(&[1, 2, 3, 4, 5, 6, 7]);

        let root = tree.root().unwrap();
        assert_eq!(keys_of(&tree, root), [4]);

        let left = tree.node(root).child(0);
        let right = tree.node(root).child(1);
        assert_eq!(keys_of(&tree, left), [2]);
        assert_eq!(keys_of(&tree, right), [6]);

        let leaves: Vec<Vec<i32>> = [left, right]
            .iter()
            .flat_map(|&n| tree.node(n).children().to_vec())
            .map(|leaf| keys_of(&tree, leaf))
            .collect();
        assert_eq!(leaves, [[1], [3], [5], [7]]);
    }

    #[test]
    fn remove_merges_and_collapses_root() {
        let mut tree = tree_of(&[1, 2, 3, 4, 5, 6, 7]);

        // No sibling of the emptied leaf can lend, so the repair merges
        // twice and the root collapses: height shrinks by one.
        assert_eq!(tree.remove(&1), Some(10));
        assert_valid(&tree);

        let root = tree.root().unwrap();
        assert_eq!(keys_of(&tree, root), [4, 6]);
        let leaves: Vec<Vec<i32>> =
            tree.node(root).children().iter().map(|&leaf| keys_of(&tree, leaf)).collect();
        assert_eq!(leaves, [vec![2, 3], vec![5], vec![7]]);

        for key in 2..=7 {
            assert_eq!(tree.get(&key), Some(&(key * 10)));
        }
        assert_eq!(tree.get(&1), None);
    }

    #[test]
    fn underflow_borrows_from_left_sibling() {
        // Root [4] over leaves [1, 2] and [5]; removing 5 rotates 2 up
        // through the separator and 4 down.
        let mut tree = tree_of(&[1, 4, 5, 2]);

        assert_eq!(tree.remove(&5), Some(50));
        assert_valid(&tree);

        let root = tree.root().unwrap();
        assert_eq!(keys_of(&tree, root), [2]);
        assert_eq!(keys_of(&tree, tree.node(root).child(0)), [1]);
        assert_eq!(keys_of(&tree, tree.node(root).child(1)), [4]);
    }

    #[test]
    fn underflow_borrows_from_right_sibling() {
        // Root [2] over leaves [1] and [4, 5]; removing 1 rotates 4 up
        // through the separator and 2 down.
        let mut tree = tree_of(&[1, 2, 4, 5]);

        assert_eq!(tree.remove(&1), Some(10));
        assert_valid(&tree);

        let root = tree.root().unwrap();
        assert_eq!(keys_of(&tree, root), [4]);
        assert_eq!(keys_of(&tree, tree.node(root).child(0)), [2]);
        assert_eq!(keys_of(&tree, tree.node(root).child(1)), [5]);
    }

    #[test]
    fn internal_removal_substitutes_predecessor() {
        // The predecessor leaf [1, 2] has a pair to spare, so 2 replaces the
        // removed separator in place.
        let mut tree = tree_of(&[1, 4, 5, 2]);

        assert_eq!(tree.remove(&4), Some(40));
        assert_valid(&tree);

        let root = tree.root().unwrap();
        assert_eq!(keys_of(&tree, root), [2]);
        assert_eq!(keys_of(&tree, tree.node(root).child(0)), [1]);
        assert_eq!(keys_of(&tree, tree.node(root).child(1)), [5]);
    }

    #[test]
    fn internal_removal_substitutes_successor() {
        // The predecessor leaf [1] is at minimum but the successor leaf
        // [4, 5] can spare its front pair.
        let mut tree = tree_of(&[1, 2, 4, 5]);

        assert_eq!(tree.remove(&2), Some(20));
        assert_valid(&tree);

        let root = tree.root().unwrap();
        assert_eq!(keys_of(&tree, root), [4]);
        assert_eq!(keys_of(&tree, tree.node(root).child(0)), [1]);
        assert_eq!(keys_of(&tree, tree.node(root).child(1)), [5]);
    }

    #[test]
    fn internal_removal_repairs_drained_successor_leaf() {
        // Neither the predecessor nor the successor leaf can lend, so the
        // successor is taken anyway and the drained leaf repair cascades all
        // the way to a root collapse.
        let mut tree = tree_of(&[1, 2, 3, 4, 5, 6, 7]);

        assert_eq!(tree.remove(&4), Some(40));
        assert_valid(&tree);

        let root = tree.root().unwrap();
        assert_eq!(keys_of(&tree, root), [2, 5]);
        let leaves: Vec<Vec<i32>> =
            tree.node(root).children().iter().map(|&leaf| keys_of(&tree, leaf)).collect();
        assert_eq!(leaves, [vec![1], vec![3], vec![6, 7]]);

        assert_eq!(tree.get(&4), None);
        for key in [1, 2, 3, 5, 6, 7] {
            assert_eq!(tree.get(&key), Some(&(key * 10)));
        }
    }

    #[test]
    fn duplicate_insert_is_detected_at_any_depth() {
        let mut tree = tree_of(&[1, 2, 3, 4, 5, 6, 7]);

        // 4 sits in the root, 2 in an internal node, 5 in a leaf; none may
        // be overwritten.
        for key in [4, 2, 5] {
            assert!(!tree.insert(key, -1));
            assert_eq!(tree.get(&key), Some(&(key * 10)));
        }
        assert_eq!(tree.len(), 7);
        assert_valid(&tree);
    }

    #[test]
    fn removing_absent_key_is_a_no_op() {
        let mut tree = tree_of(&[1, 2, 3]);

        assert_eq!(tree.remove(&99), None);
        assert_eq!(tree.len(), 3);
        assert_valid(&tree);
    }

    #[test]
    fn removing_every_key_empties_the_tree() {
        let mut tree = tree_of(&[1, 2, 3, 4, 5, 6, 7]);

        for key in [4, 2, 6, 1, 7, 3, 5] {
            assert_eq!(tree.remove(&key), Some(key * 10));
            assert_valid(&tree);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        assert_eq!(tree.live_nodes(), 0);
        assert_eq!(tree.live_values(), 0);

        // An emptied tree accepts new pairs.
        assert!(tree.insert(42, 420));
        assert_eq!(tree.get(&42), Some(&420));
        assert_valid(&tree);
    }

    #[test]
    #[should_panic(expected = "`RawVOBTreeMap::new()` - `order` < 3!")]
    fn order_two_is_rejected() {
        let _ = RawVOBTreeMap::<i32, i32>::new(2);
    }

    // Test operations enum for property testing.
    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..1000).prop_map(Op::Insert),
            1 => (0i32..1000).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn tree_invariants_maintained_after_operations(
            order in 3usize..9,
            ops in prop::collection::vec(op_strategy(), 0..500),
        ) {
            let mut tree: RawVOBTreeMap<i32, i32> = RawVOBTreeMap::new(order);

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        tree.insert(key, key * 2);
                    }
                    Op::Remove(key) => {
                        tree.remove(&key);
                    }
                }
                let findings = tree.validate();
                prop_assert!(findings.is_empty(), "tree invariant violations:\n{}", findings.join("\n"));
            }
        }

        #[test]
        fn first_writer_wins(
            entries in prop::collection::vec((0i32..100, any::<i32>()), 1..200),
        ) {
            let mut tree: RawVOBTreeMap<i32, i32> = RawVOBTreeMap::new(3);
            let mut model: alloc::collections::BTreeMap<i32, i32> = alloc::collections::BTreeMap::new();

            for (key, value) in entries {
                prop_assert_eq!(tree.insert(key, value), !model.contains_key(&key));
                model.entry(key).or_insert(value);
            }

            prop_assert_eq!(tree.len(), model.len());
            for (key, value) in &model {
                prop_assert_eq!(tree.get(key), Some(value));
            }
        }
    }
}
