//! Structural validation for the tree.
//!
//! The validator is a read-only consumer of the finished structure: the
//! insertion and deletion engines never call it. It re-derives every
//! invariant from scratch and reports one human-readable finding per
//! violation, so a corrupted tree fails loudly in tests instead of
//! silently misbehaving later.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::handle::Handle;
use super::raw_vobtree_map::RawVOBTreeMap;

struct Walk {
    /// Depth of the first leaf encountered; every other leaf must match.
    leaf_depth: Option<usize>,
    nodes_visited: usize,
    pairs_counted: usize,
    findings: Vec<String>,
}

impl<K: Ord, V> RawVOBTreeMap<K, V> {
    /// Walks the whole tree and returns one finding per violated invariant.
    /// An empty result means the tree is structurally sound.
    pub(crate) fn validate(&self) -> Vec<String> {
        let Some(root) = self.root() else {
            let mut findings = Vec::new();
            if self.len() != 0 {
                findings.push(format!("empty tree has len {}", self.len()));
            }
            if self.live_nodes() != 0 {
                findings.push(format!("empty tree holds {} live nodes", self.live_nodes()));
            }
            if self.live_values() != 0 {
                findings.push(format!("empty tree holds {} live values", self.live_values()));
            }
            return findings;
        };

        let mut walk = Walk {
            leaf_depth: None,
            nodes_visited: 0,
            pairs_counted: 0,
            findings: Vec::new(),
        };
        self.validate_node(root, 0, None, None, None, &mut walk);

        if walk.pairs_counted != self.len() {
            walk.findings
                .push(format!("len mismatch: len={}, walk counted {}", self.len(), walk.pairs_counted));
        }
        if walk.nodes_visited != self.live_nodes() {
            walk.findings.push(format!(
                "node accounting mismatch: arena holds {}, walk visited {}",
                self.live_nodes(),
                walk.nodes_visited
            ));
        }
        if self.live_values() != self.len() {
            walk.findings.push(format!(
                "value accounting mismatch: arena holds {}, len={}",
                self.live_values(),
                self.len()
            ));
        }

        walk.findings
    }

    /// Checks one node and recurses into its children with narrowed key
    /// bounds. `lower`/`upper` are open interval ends; `None` at either end
    /// of the tree-wide range.
    fn validate_node(
        &self,
        handle: Handle,
        depth: usize,
        lower: Option<&K>,
        upper: Option<&K>,
        parent: Option<Handle>,
        walk: &mut Walk,
    ) {
        let node = self.node(handle);
        walk.nodes_visited += 1;
        walk.pairs_counted += node.key_count();

        if node.parent() != parent {
            walk.findings.push(format!(
                "parent back-reference mismatch at {handle:?}: expected {parent:?}, found {:?}",
                node.parent()
            ));
        }

        // Occupancy. The root is exempt from the minimum but may not be
        // empty: an empty tree has no root at all.
        if node.key_count() > self.max_pairs() {
            walk.findings.push(format!(
                "node {handle:?} holds {} pairs, maximum is {}",
                node.key_count(),
                self.max_pairs()
            ));
        }
        if parent.is_none() {
            if node.key_count() == 0 {
                walk.findings.push(format!("root {handle:?} holds no pairs"));
            }
        } else if node.key_count() < self.min_pairs() {
            walk.findings.push(format!(
                "non-root node {handle:?} holds {} pairs, minimum is {}",
                node.key_count(),
                self.min_pairs()
            ));
        }

        // Sortedness and the enclosing open interval.
        for i in 1..node.key_count() {
            if node.key(i - 1) >= node.key(i) {
                walk.findings
                    .push(format!("keys not sorted at {handle:?}, indices {} and {i}", i - 1));
            }
        }
        if let Some(lower) = lower
            && node.key_count() > 0
            && node.key(0) <= lower
        {
            walk.findings.push(format!("key below enclosing separator at {handle:?}, index 0"));
        }
        if let Some(upper) = upper
            && node.key_count() > 0
            && node.key(node.key_count() - 1) >= upper
        {
            walk.findings.push(format!(
                "key above enclosing separator at {handle:?}, index {}",
                node.key_count() - 1
            ));
        }

        for i in 0..node.key_count() {
            if !self.value_is_live(node.value(i)) {
                walk.findings.push(format!("dangling value handle at {handle:?}, index {i}"));
            }
        }

        if node.is_leaf() {
            match walk.leaf_depth {
                None => walk.leaf_depth = Some(depth),
                Some(expected) if depth != expected => {
                    walk.findings
                        .push(format!("leaf depth mismatch: expected {expected}, got {depth} at {handle:?}"));
                }
                Some(_) => {}
            }
            return;
        }

        if node.child_count() != node.key_count() + 1 {
            walk.findings.push(format!(
                "child count mismatch at {handle:?}: {} children for {} keys",
                node.child_count(),
                node.key_count()
            ));
            return;
        }

        for i in 0..node.child_count() {
            let child_lower = if i == 0 { lower } else { Some(node.key(i - 1)) };
            let child_upper = if i == node.key_count() { upper } else { Some(node.key(i)) };
            self.validate_node(node.child(i), depth + 1, child_lower, child_upper, Some(handle), walk);
        }
    }
}
