//! The whole-tree-locked B-tree.
//!
//! Insertion splits full nodes on the way down, so a single top-down pass
//! always finds room in the target leaf. Removal is the mirror image: every
//! child is topped up (by borrowing from a sibling or merging with one)
//! before it is entered, so the record can always be taken out in one pass.

use std::mem;
use std::ops::ControlFlow;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use pathdex_types::{IdentityKey, IndexedRecord};

use crate::error::{TreeError, TreeResult};
use crate::node::Node;

/// Minimum degree used by [`BTree::new`].
pub const DEFAULT_MIN_DEGREE: usize = 2;

/// Shape of the tree at one point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Number of records stored.
    pub records: usize,
    /// Number of reachable nodes, including the root.
    pub nodes: usize,
    /// Number of levels; a lone leaf root has height 1.
    pub height: usize,
}

struct Inner {
    root: Box<Node>,
    len: usize,
}

/// A B-tree of [`IndexedRecord`]s ordered by identity key.
///
/// Parameterized by a minimum degree `t >= 2`: every node except the root
/// holds between `t - 1` and `2t - 1` records. All structural access goes
/// through one `parking_lot` read/write lock covering the whole tree, which
/// is task-fair, so a steady stream of readers cannot starve an inserter.
pub struct BTree {
    min_degree: usize,
    inner: RwLock<Inner>,
}

impl std::fmt::Debug for BTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BTree")
            .field("min_degree", &self.min_degree)
            .field("len", &self.len())
            .finish()
    }
}

impl Default for BTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BTree {
    /// Create an empty tree with [`DEFAULT_MIN_DEGREE`].
    pub fn new() -> Self {
        Self {
            min_degree: DEFAULT_MIN_DEGREE,
            inner: RwLock::new(Inner {
                root: Box::new(Node::leaf()),
                len: 0,
            }),
        }
    }

    /// Create an empty tree with the given minimum degree.
    pub fn with_min_degree(min_degree: usize) -> TreeResult<Self> {
        if min_degree < 2 {
            return Err(TreeError::InvalidMinDegree(min_degree));
        }
        Ok(Self {
            min_degree,
            ..Self::new()
        })
    }

    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Number of records in the tree.
    pub fn len(&self) -> usize {
        self.inner.read().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn max_records(&self) -> usize {
        2 * self.min_degree - 1
    }

    // ---------------------------------------------------------------
    // Insertion
    // ---------------------------------------------------------------

    /// Insert a record, ordered by its identity key.
    ///
    /// Duplicate keys are accepted; a later duplicate is placed after every
    /// earlier record with the same key.
    pub fn insert(&self, record: IndexedRecord) {
        let mut inner = self.inner.write();
        self.insert_into(&mut inner.root, record);
        inner.len += 1;
    }

    fn insert_into(&self, root: &mut Box<Node>, record: IndexedRecord) {
        if root.len() == self.max_records() {
            let old_root = mem::replace(root, Box::new(Node::internal()));
            root.children.push(old_root);
            self.split_child(root, 0);
        }
        self.insert_non_full(root, record);
    }

    fn insert_non_full(&self, mut node: &mut Node, record: IndexedRecord) {
        loop {
            let key = record.identity_key();
            let mut i = node.records.partition_point(|r| r.identity_key() <= key);
            if node.leaf {
                node.records.insert(i, record);
                return;
            }
            if node.children[i].len() == self.max_records() {
                self.split_child(node, i);
                if key >= node.records[i].identity_key() {
                    i += 1;
                }
            }
            node = &mut *node.children[i];
        }
    }

    /// Split the full child `parent.children[i]` around its median.
    ///
    /// The median moves up into `parent` at index `i`; the upper `t - 1`
    /// records (and upper `t` children) move to a new right sibling.
    fn split_child(&self, parent: &mut Node, i: usize) {
        let t = self.min_degree;
        let (median, sibling) = {
            let child = &mut parent.children[i];
            debug_assert_eq!(child.len(), self.max_records(), "split of a non-full node");
            let mut sibling = Node::with_kind(child.leaf);
            sibling.records = child.records.split_off(t);
            let median = child.records.remove(t - 1);
            if !child.leaf {
                sibling.children = child.children.split_off(t);
            }
            (median, sibling)
        };
        parent.records.insert(i, median);
        parent.children.insert(i + 1, Box::new(sibling));
    }

    // ---------------------------------------------------------------
    // Lookup and traversal
    // ---------------------------------------------------------------

    /// Exact-match lookup by identity key.
    ///
    /// Returns a clone of the first matching record found on the search
    /// path. When several records share the key, which one is returned is
    /// unspecified.
    pub fn search(&self, key: &IdentityKey) -> Option<IndexedRecord> {
        let inner = self.inner.read();
        let mut node: &Node = &inner.root;
        loop {
            let i = node.records.partition_point(|r| r.identity_key() < key);
            if let Some(found) = node.records.get(i).filter(|r| r.identity_key() == key) {
                return Some(found.clone());
            }
            if node.leaf {
                return None;
            }
            node = &*node.children[i];
        }
    }

    /// Visit every record in ascending key order.
    ///
    /// The visitor returns [`ControlFlow::Break`] to stop; the traversal
    /// then ends immediately and the break is returned to the caller. The
    /// read lock is held for the whole traversal, so the visitor must not
    /// call back into a mutating method of the same tree.
    pub fn for_each<F>(&self, mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(&IndexedRecord) -> ControlFlow<()>,
    {
        let inner = self.inner.read();
        Self::walk_in_order(&inner.root, &mut visit)
    }

    fn walk_in_order<F>(node: &Node, visit: &mut F) -> ControlFlow<()>
    where
        F: FnMut(&IndexedRecord) -> ControlFlow<()>,
    {
        for (i, record) in node.records.iter().enumerate() {
            if !node.leaf {
                Self::walk_in_order(&node.children[i], visit)?;
            }
            visit(record)?;
        }
        if !node.leaf {
            Self::walk_in_order(&node.children[node.records.len()], visit)?;
        }
        ControlFlow::Continue(())
    }

    /// Clone every record out of the tree in key order.
    pub fn records(&self) -> Vec<IndexedRecord> {
        let mut out = Vec::with_capacity(self.len());
        let _ = self.for_each(|record| {
            out.push(record.clone());
            ControlFlow::Continue(())
        });
        out
    }

    // ---------------------------------------------------------------
    // Removal
    // ---------------------------------------------------------------

    /// Remove every record with `key` for which `matches` returns true.
    ///
    /// Records that share the key but do not match (hash collisions) stay
    /// in the tree. The whole operation runs under one write lock.
    pub fn remove_where<P>(&self, key: &IdentityKey, mut matches: P) -> Vec<IndexedRecord>
    where
        P: FnMut(&IndexedRecord) -> bool,
    {
        let mut inner = self.inner.write();
        let mut removed = Vec::new();
        let mut spared = Vec::new();

        while let Some(record) = self.remove_one(&mut inner.root, key) {
            if matches(&record) {
                removed.push(record);
            } else {
                spared.push(record);
            }
        }
        for record in spared {
            self.insert_into(&mut inner.root, record);
        }

        inner.len -= removed.len();
        removed
    }

    /// Remove every record with `key`.
    pub fn remove(&self, key: &IdentityKey) -> Vec<IndexedRecord> {
        self.remove_where(key, |_| true)
    }

    fn remove_one(&self, root: &mut Box<Node>, key: &IdentityKey) -> Option<IndexedRecord> {
        let removed = self.remove_from(root, key);
        if root.records.is_empty() && !root.leaf {
            let only_child = root.children.remove(0);
            *root = only_child;
        }
        removed
    }

    /// Remove one record with `key` from the subtree rooted at `node`.
    ///
    /// `node` must hold at least `t` records unless it is the root.
    fn remove_from(&self, node: &mut Node, key: &IdentityKey) -> Option<IndexedRecord> {
        let t = self.min_degree;
        let i = node.records.partition_point(|r| r.identity_key() < key);
        let found = node.records.get(i).is_some_and(|r| r.identity_key() == key);

        if node.leaf {
            return found.then(|| node.records.remove(i));
        }

        if found {
            if node.children[i].len() >= t {
                let predecessor = self.pop_max(&mut node.children[i])?;
                return Some(mem::replace(&mut node.records[i], predecessor));
            }
            if node.children[i + 1].len() >= t {
                let successor = self.pop_min(&mut node.children[i + 1])?;
                return Some(mem::replace(&mut node.records[i], successor));
            }
            Self::merge_children(node, i);
            return self.remove_from(&mut node.children[i], key);
        }

        let i = self.fill_child(node, i);
        self.remove_from(&mut node.children[i], key)
    }

    fn pop_max(&self, node: &mut Node) -> Option<IndexedRecord> {
        if node.leaf {
            return node.records.pop();
        }
        let last = node.children.len() - 1;
        let i = self.fill_child(node, last);
        self.pop_max(&mut node.children[i])
    }

    fn pop_min(&self, node: &mut Node) -> Option<IndexedRecord> {
        if node.leaf {
            return (!node.records.is_empty()).then(|| node.records.remove(0));
        }
        let i = self.fill_child(node, 0);
        self.pop_min(&mut node.children[i])
    }

    /// Make sure `node.children[i]` holds at least `t` records before the
    /// caller descends into it. Returns the index of the child to enter,
    /// which shifts left by one when the child is merged into its left
    /// sibling.
    fn fill_child(&self, node: &mut Node, i: usize) -> usize {
        let t = self.min_degree;
        if node.children[i].len() >= t {
            return i;
        }
        let has_right = i + 1 < node.children.len();
        if i > 0 && node.children[i - 1].len() >= t {
            Self::borrow_from_left(node, i);
            i
        } else if has_right && node.children[i + 1].len() >= t {
            Self::borrow_from_right(node, i);
            i
        } else if has_right {
            Self::merge_children(node, i);
            i
        } else {
            Self::merge_children(node, i - 1);
            i - 1
        }
    }

    fn borrow_from_left(node: &mut Node, i: usize) {
        let (before, after) = node.children.split_at_mut(i);
        let left = &mut before[i - 1];
        let child = &mut after[0];
        if let Some(moved) = left.records.pop() {
            let separator = mem::replace(&mut node.records[i - 1], moved);
            child.records.insert(0, separator);
        }
        if let Some(grandchild) = left.children.pop() {
            child.children.insert(0, grandchild);
        }
    }

    fn borrow_from_right(node: &mut Node, i: usize) {
        let (before, after) = node.children.split_at_mut(i + 1);
        let child = &mut before[i];
        let right = &mut after[0];
        if !right.records.is_empty() {
            let moved = right.records.remove(0);
            let separator = mem::replace(&mut node.records[i], moved);
            child.records.push(separator);
        }
        if !right.children.is_empty() {
            child.children.push(right.children.remove(0));
        }
    }

    /// Fold `children[i + 1]` and the separator between them into
    /// `children[i]`.
    fn merge_children(node: &mut Node, i: usize) {
        let Node {
            records, children, ..
        } = *node.children.remove(i + 1);
        let separator = node.records.remove(i);
        let left = &mut node.children[i];
        left.records.push(separator);
        left.records.extend(records);
        left.children.extend(children);
    }

    // ---------------------------------------------------------------
    // Reporting
    // ---------------------------------------------------------------

    /// Approximate memory footprint of every reachable node, in bytes.
    ///
    /// Each node contributes its own inline size plus the capacity of its
    /// record and child slabs. Heap data owned by records (path strings,
    /// hex keys) is not counted.
    pub fn estimate_size(&self) -> usize {
        let inner = self.inner.read();
        Self::estimate_node(&inner.root)
    }

    fn estimate_node(node: &Node) -> usize {
        node.footprint()
            + node
                .children
                .iter()
                .map(|child| Self::estimate_node(child))
                .sum::<usize>()
    }

    /// Record count, node count and height.
    pub fn stats(&self) -> TreeStats {
        let inner = self.inner.read();
        let mut height = 1;
        let mut node: &Node = &inner.root;
        while let Some(first) = node.children.first() {
            height += 1;
            node = &**first;
        }
        TreeStats {
            records: inner.len,
            nodes: Self::count_nodes(&inner.root),
            height,
        }
    }

    fn count_nodes(node: &Node) -> usize {
        1 + node
            .children
            .iter()
            .map(|child| Self::count_nodes(child))
            .sum::<usize>()
    }

    /// Check every structural invariant, returning a description of the
    /// first violation found.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        let inner = self.inner.read();
        let mut leaf_depth = None;
        let count = self.check_node(&inner.root, true, 0, &mut leaf_depth, None, None)?;
        if count != inner.len {
            return Err(format!("len is {} but {} records reachable", inner.len, count));
        }
        Ok(())
    }

    #[cfg(test)]
    fn check_node<'a>(
        &self,
        node: &'a Node,
        is_root: bool,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        lower: Option<&'a IdentityKey>,
        upper: Option<&'a IdentityKey>,
    ) -> Result<usize, String> {
        let t = self.min_degree;
        if node.len() > self.max_records() {
            return Err(format!("node at depth {depth} holds {} records", node.len()));
        }
        if !is_root && node.len() < t - 1 {
            return Err(format!("underfull node at depth {depth}: {}", node.len()));
        }
        if node.records.windows(2).any(|w| w[0].identity_key() > w[1].identity_key()) {
            return Err(format!("unsorted node at depth {depth}"));
        }
        for record in &node.records {
            let key = record.identity_key();
            if lower.is_some_and(|lo| key < lo) || upper.is_some_and(|hi| key > hi) {
                return Err(format!("key {key} outside separator bounds at depth {depth}"));
            }
        }

        if node.leaf {
            if !node.children.is_empty() {
                return Err(format!("leaf with children at depth {depth}"));
            }
            match *leaf_depth {
                Some(expected) if expected != depth => {
                    return Err(format!("leaf at depth {depth}, expected {expected}"));
                }
                Some(_) => {}
                None => *leaf_depth = Some(depth),
            }
            return Ok(node.len());
        }

        if node.records.is_empty() {
            return Err(format!("empty internal node at depth {depth}"));
        }
        if node.children.len() != node.len() + 1 {
            return Err(format!(
                "internal node at depth {depth} has {} records and {} children",
                node.len(),
                node.children.len()
            ));
        }

        let mut count = node.len();
        for (i, child) in node.children.iter().enumerate() {
            let lo = if i == 0 {
                lower
            } else {
                Some(node.records[i - 1].identity_key())
            };
            let hi = node.records.get(i).map(|r| r.identity_key()).or(upper);
            count += self.check_node(child, false, depth + 1, leaf_depth, lo, hi)?;
        }
        Ok(count)
    }
}
