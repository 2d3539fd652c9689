//! Forest node types
//!
//! Nodes live in an arena owned by [`crate::tree::Forest`] and refer to each other by
//! [`NodeId`]. The `parent` links are plain indices, so dropping a forest never
//! has to untangle references.

/// Index of a node inside its forest's arena.
///
/// Only meaningful for the forest that produced it; a reload invalidates every id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named container of sub-buckets and pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub name: String,
    /// UI-only flag; never persisted.
    pub expanded: bool,
    /// Sub-buckets in storage order
    pub buckets: Vec<NodeId>,
    /// Pairs in storage order
    pub pairs: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Set when part of this bucket could not be read during reload.
    pub error: Option<String>,
}

impl Bucket {
    pub fn new(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            expanded: false,
            buckets: Vec::new(),
            pairs: Vec::new(),
            parent,
            error: None,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.buckets.is_empty() || !self.pairs.is_empty()
    }
}

/// A key/value leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub key: String,
    pub value: Vec<u8>,
    pub parent: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Bucket(Bucket),
    Pair(Pair),
}

impl Node {
    /// Bucket name or pair key.
    pub fn name(&self) -> &str {
        match self {
            Node::Bucket(b) => &b.name,
            Node::Pair(p) => &p.key,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Bucket(b) => b.parent,
            Node::Pair(p) => Some(p.parent),
        }
    }

    pub fn as_bucket(&self) -> Option<&Bucket> {
        match self {
            Node::Bucket(b) => Some(b),
            Node::Pair(_) => None,
        }
    }

    pub fn as_pair(&self) -> Option<&Pair> {
        match self {
            Node::Pair(p) => Some(p),
            Node::Bucket(_) => None,
        }
    }

    pub fn is_bucket(&self) -> bool {
        matches!(self, Node::Bucket(_))
    }
}
