use std::mem;

use pathdex_types::IndexedRecord;

/// One node of the B-tree.
///
/// A leaf holds only records. An internal node holds `records.len() + 1`
/// children, each exclusively owned; `children[i]` holds keys no greater
/// than `records[i]`, and `children[i + 1]` holds keys no less than it.
#[derive(Debug)]
pub struct Node {
    pub(crate) records: Vec<IndexedRecord>,
    pub(crate) children: Vec<Box<Node>>,
    pub(crate) leaf: bool,
}

impl Node {
    /// Create an empty leaf.
    pub fn leaf() -> Self {
        Self::with_kind(true)
    }

    /// Create an empty internal node.
    pub fn internal() -> Self {
        Self::with_kind(false)
    }

    pub(crate) fn with_kind(leaf: bool) -> Self {
        Self {
            records: Vec::new(),
            children: Vec::new(),
            leaf,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// Number of records held directly by this node.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records held directly by this node, in key order.
    pub fn records(&self) -> &[IndexedRecord] {
        &self.records
    }

    /// Approximate heap and inline footprint of this node alone.
    ///
    /// Uses slab capacities rather than lengths, since that is what the
    /// allocator actually handed out.
    pub(crate) fn footprint(&self) -> usize {
        mem::size_of::<Self>()
            + self.records.capacity() * mem::size_of::<IndexedRecord>()
            + self.children.capacity() * mem::size_of::<Box<Node>>()
    }
}
